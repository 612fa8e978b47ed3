//! Tag lists: ordered, duplicate-free sequences of non-empty tokens.
//!
//! In memory a tag list is always a real sequence. The comma-joined string
//! exists only at the wire boundary (`from_wire` / `to_wire`).
//!
//! Tokens containing the delimiter are rejected rather than escaped: the
//! server stores the joined string verbatim and has no escape syntax.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DELIMITER: &str = ",";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("Tags cannot be empty")]
    Empty,

    #[error("Tag '{0}' contains a comma; commas separate tags")]
    ContainsDelimiter(String),

    #[error("Tag '{0}' appears more than once")]
    Duplicate(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TagList(Vec<String>);

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes a wire value: split on commas, trim, drop empty tokens.
    /// Repeated tokens keep their first position.
    pub fn from_wire(raw: Option<&str>) -> Self {
        let mut list = Self::new();
        for token in raw.unwrap_or_default().split(DELIMITER) {
            let token = token.trim();
            if !token.is_empty() && !list.contains(token) {
                list.0.push(token.to_string());
            }
        }
        list
    }

    pub fn to_wire(&self) -> String {
        self.0.join(DELIMITER)
    }

    /// Builds a list from caller-supplied tokens, trimming each one.
    /// Fails on empty tokens, tokens containing a comma, and duplicates.
    pub fn try_from_tokens<I, S>(tokens: I) -> Result<Self, TagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for token in tokens {
            let token = validate(token.as_ref())?;
            if list.contains(token) {
                return Err(TagError::Duplicate(token.to_string()));
            }
            list.0.push(token.to_string());
        }
        Ok(list)
    }

    /// Appends `token` (trimmed) unless it is empty or already present.
    /// Returns whether the list grew.
    pub fn insert(&mut self, token: &str) -> Result<bool, TagError> {
        let token = match validate(token) {
            Ok(t) => t,
            Err(TagError::Empty) => return Ok(false),
            Err(e) => return Err(e),
        };
        if self.contains(token) {
            return Ok(false);
        }
        self.0.push(token.to_string());
        Ok(true)
    }

    /// Removes `token` by exact match. Returns whether anything was removed.
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != token);
        self.0.len() != before
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }
}

#[cfg(test)]
impl TagList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn validate(token: &str) -> Result<&str, TagError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TagError::Empty);
    }
    if token.contains(DELIMITER) {
        return Err(TagError::ContainsDelimiter(token.to_string()));
    }
    Ok(token)
}

impl TryFrom<Vec<String>> for TagList {
    type Error = TagError;

    fn try_from(tokens: Vec<String>) -> Result<Self, Self::Error> {
        Self::try_from_tokens(tokens)
    }
}

impl From<TagList> for Vec<String> {
    fn from(list: TagList) -> Self {
        list.0
    }
}

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

//! Tag List Editor: a controlled widget over a caller-owned `TagList`.
//!
//! The only state it keeps is the uncommitted free-text input. Every change to
//! the committed list goes out through `on_change`, so one editor per list
//! field can run side by side without sharing anything.

use super::tags::{TagError, TagList};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCommit {
    /// The token was appended and the input cleared.
    Added(String),
    /// The token is already in the list; the input is cleared, the list untouched.
    Duplicate,
    /// Nothing but whitespace was typed.
    Empty,
    /// The token cannot be stored; the input is kept for correction.
    Rejected(TagError),
}

#[derive(Debug, Clone, Default)]
pub struct TagListEditor {
    input: String,
}

impl TagListEditor {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Commits the current input against `value`. `on_change` is called with the
    /// new list only when a token is actually appended.
    pub fn commit(&mut self, value: &TagList, on_change: impl FnOnce(TagList)) -> TagCommit {
        let token = self.input.trim().to_string();
        if token.is_empty() {
            return TagCommit::Empty;
        }

        let mut next = value.clone();
        match next.insert(&token) {
            Ok(true) => {
                self.input.clear();
                on_change(next);
                TagCommit::Added(token)
            }
            Ok(false) => {
                self.input.clear();
                TagCommit::Duplicate
            }
            Err(e) => TagCommit::Rejected(e),
        }
    }

    /// Sets the input to `text` and commits it in one step.
    pub fn commit_text(
        &mut self,
        text: &str,
        value: &TagList,
        on_change: impl FnOnce(TagList),
    ) -> TagCommit {
        self.set_input(text);
        self.commit(value, on_change)
    }

    /// Removes `token` from `value` by exact match. Removing an absent token
    /// does not call `on_change`.
    pub fn remove(&self, value: &TagList, token: &str, on_change: impl FnOnce(TagList)) -> bool {
        let mut next = value.clone();
        if next.remove(token) {
            on_change(next);
            true
        } else {
            false
        }
    }
}

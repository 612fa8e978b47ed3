use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::profile::tags::TagError;

/// Client-level error type for every call made against the automation service.
/// Status-derived variants carry the server's `detail` text verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Maps a non-success HTTP status and its body onto the error taxonomy.
    /// Only a FastAPI `detail` becomes the message; any other body (a proxy's
    /// HTML error page, plain text) is logged and dropped.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_detail(body).unwrap_or_else(|| {
            if !body.trim().is_empty() {
                debug!(status, "Error response without detail: {}", body.trim());
            }
            String::new()
        });
        match status {
            401 => ClientError::Auth(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            400 | 409 | 422 => ClientError::Validation(message),
            _ => ClientError::Server { status, message },
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }

    /// The server-provided detail, if the failure came from a response that carried one.
    pub fn detail(&self) -> Option<&str> {
        let text = match self {
            ClientError::Auth(msg)
            | ClientError::Forbidden(msg)
            | ClientError::Validation(msg)
            | ClientError::NotFound(msg) => msg.as_str(),
            ClientError::Server { message, .. } => message.as_str(),
            _ => return None,
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Text shown to the user in a notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Auth(_) => "Session expired. Please log in again.".to_string(),
            ClientError::Validation(msg) if !msg.is_empty() => msg.clone(),
            ClientError::InvalidInput(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    /// Download URLs carry the token in the query, so the URL is dropped.
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.without_url().to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

/// FastAPI error bodies are `{"detail": "..."}`, or for request validation
/// failures `{"detail": [{"msg": "...", ...}, ...]}`.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

/// Failures of the Profile Model's load and two-phase save.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Could not fetch profile data: {0}")]
    Fetch(#[source] ClientError),

    #[error("Failed to upload resume: {0}")]
    ResumeUpload(#[source] ClientError),

    #[error("Failed to save profile data: {0}")]
    ProfileSave(#[source] ClientError),

    #[error("Another profile operation is already in progress")]
    Busy,

    #[error(transparent)]
    InvalidTag(#[from] TagError),
}

impl ProfileError {
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            ProfileError::Fetch(e) | ProfileError::ResumeUpload(e) | ProfileError::ProfileSave(e) => {
                Some(e)
            }
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self.client_error() {
            Some(e) if e.is_auth() => e.user_message(),
            Some(ClientError::Validation(detail)) if !detail.is_empty() => detail.clone(),
            Some(ClientError::InvalidInput(msg)) => msg.clone(),
            _ => match self {
                ProfileError::Fetch(_) => "Could not fetch profile data.".to_string(),
                ProfileError::ResumeUpload(_) => "Failed to upload resume.".to_string(),
                ProfileError::ProfileSave(_) => "Failed to save profile data.".to_string(),
                other => other.to_string(),
            },
        }
    }
}

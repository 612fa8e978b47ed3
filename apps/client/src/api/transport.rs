use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
    Multipart {
        field: String,
        filename: String,
        bytes: Bytes,
    },
}

/// A fully resolved request. `path` is the endpoint path relative to the API base,
/// `url` the absolute URL it resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub url: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body).map_err(ClientError::from)
    }

    /// Converts a non-success status into the matching `ClientError`.
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_status(self.status, &self.text()))
        }
    }
}

/// The HTTP seam. Carried as `Arc<dyn Transport>` so tests can script responses.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one round trip. Only failures to complete the call are errors;
    /// any status code the server returns comes back as an `ApiResponse`.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError>;
}

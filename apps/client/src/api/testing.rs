//! Scripted in-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use super::client::ApiClient;
use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::errors::ClientError;
use crate::session::routes::{Navigator, Route};
use crate::session::storage::testing::MemoryTokenStorage;
use crate::session::SessionStore;

pub const TEST_BASE_URL: &str = "http://api.test/api";

#[derive(Default)]
struct Script {
    responses: VecDeque<Result<ApiResponse, ClientError>>,
    requests: Vec<ApiRequest>,
}

/// Replays queued responses in order and records every request it receives.
/// Running out of responses is reported as a network error.
#[derive(Clone, Default)]
pub struct FakeTransport {
    script: Arc<Mutex<Script>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, status: u16, body: &str) {
        self.script.lock().responses.push_back(Ok(ApiResponse {
            status,
            body: Bytes::copy_from_slice(body.as_bytes()),
        }));
    }

    pub fn push_error(&self, error: ClientError) {
        self.script.lock().responses.push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.script.lock().requests.clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut script = self.script.lock();
        script.requests.push(request);
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no scripted response".into())))
    }
}

/// Builds an `ApiClient` over `transport` with an in-memory session.
pub fn client_with<T: Transport + 'static>(transport: T, token: Option<&str>) -> ApiClient {
    let storage = match token {
        Some(t) => MemoryTokenStorage::with_token(t),
        None => MemoryTokenStorage::default(),
    };
    let session = SessionStore::open(Arc::new(storage), Navigator::new(Route::Dashboard))
        .expect("memory storage never fails");
    ApiClient::new(TEST_BASE_URL, Arc::new(transport), session)
}

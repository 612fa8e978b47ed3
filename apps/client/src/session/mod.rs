//! Session Store: the process-wide holder of the auth token.
//!
//! One `SessionStore` is created at startup and cloned into every component
//! that makes authenticated calls. Clearing the session also navigates to the
//! login screen, so logout and expiry look the same to the user.

pub mod guard;
pub mod routes;
pub mod storage;

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::errors::ClientError;
use routes::{Navigator, Route};
use storage::TokenStorage;

struct SessionInner {
    token: RwLock<Option<String>>,
    storage: Arc<dyn TokenStorage>,
    navigator: Navigator,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl SessionStore {
    /// Opens the store, restoring any token already persisted in `storage`.
    pub fn open(storage: Arc<dyn TokenStorage>, navigator: Navigator) -> Result<Self, ClientError> {
        let token = storage
            .load()
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        if token.is_some() {
            info!("Restored persisted session");
        }
        Ok(Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(token),
                storage,
                navigator,
            }),
        })
    }

    /// Replaces the current token. There is never more than one session.
    pub fn set_token(&self, token: &str) -> Result<(), ClientError> {
        self.inner
            .storage
            .save(token)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        *self.inner.token.write() = Some(token.to_string());
        info!("Session established");
        Ok(())
    }

    pub fn get_token(&self) -> Option<String> {
        self.inner.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.token.read().is_some()
    }

    /// Drops the token from memory and storage, then navigates to the login screen.
    pub fn clear_token(&self) {
        let had_token = self.inner.token.write().take().is_some();
        if let Err(e) = self.inner.storage.clear() {
            warn!("Failed to clear persisted token: {e}");
        }
        if had_token {
            info!("Session cleared");
        }
        self.inner.navigator.navigate(Route::Login);
    }

    pub fn navigator(&self) -> &Navigator {
        &self.inner.navigator
    }
}

//! Typed client for the automation service's endpoints.
//!
//! Every authenticated call reads the token from the shared `SessionStore` at
//! send time. A 401 on an authenticated call clears the session (which also
//! navigates to the login screen) before the `ClientError::Auth` is returned.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport};
use crate::errors::ClientError;
use crate::models::job::JobRecord;
use crate::models::profile::ProfileWire;
use crate::models::user::{ActionReply, RegisterRequest, TokenResponse, UserRecord};
use crate::session::routes::Route;
use crate::session::SessionStore;

pub mod endpoints {
    pub const LOGIN: &str = "auth/token";
    pub const REGISTER: &str = "auth/register";
    pub const PROFILE: &str = "auth/profile";
    pub const UPLOAD_RESUME: &str = "auth/upload-resume";
    pub const RUN_BOT: &str = "bot/run";
    pub const APPLIED_JOBS: &str = "bot/applied-jobs";
    pub const RECOMMEND: &str = "bot/recommend";
    pub const DOWNLOAD_EXCEL: &str = "bot/download-excel";
    pub const DOWNLOAD_PDF: &str = "bot/download-pdf";
    pub const SEND_EMAIL: &str = "bot/send-email";
    pub const ADMIN_USERS: &str = "admin/users";
}

/// Query parameter carrying the token on download navigations.
pub const DOWNLOAD_TOKEN_PARAM: &str = "token";

/// Multipart field name of the resume upload.
pub const RESUME_FIELD: &str = "resume";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, body: RequestBody) -> ApiRequest {
        ApiRequest {
            method,
            path: path.to_string(),
            url: self.url_for(path),
            bearer: None,
            body,
        }
    }

    /// Sends a request with the current bearer token and applies the session
    /// invalidation policy on authentication failures.
    async fn send_authed(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<ApiResponse, ClientError> {
        let Some(token) = self.session.get_token() else {
            debug!("No session for {path}");
            self.session.clear_token();
            return Err(ClientError::Auth("Not logged in".to_string()));
        };

        let mut request = self.request(method, path, body);
        request.bearer = Some(token);

        let response = self.transport.send(request).await?;
        response
            .error_for_status()
            .map_err(|err| self.reject_session(path, err))
    }

    /// Clears the session when `err` is an authentication failure. Calls that
    /// bypass `send_authed`, like download navigations, route their errors here.
    pub fn reject_session(&self, path: &str, err: ClientError) -> ClientError {
        if err.is_auth() {
            warn!("Authentication rejected on {path}, clearing session");
            self.session.clear_token();
        }
        err
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send_authed(Method::Get, path, RequestBody::Empty)
            .await?
            .json()
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiResponse, ClientError> {
        let value = serde_json::to_value(body)?;
        self.send_authed(Method::Post, path, RequestBody::Json(value))
            .await
    }

    // ── Authentication ─────────────────────────────────────────────────────

    /// Exchanges credentials for a token, stores it, and moves to the dashboard.
    /// A rejected login is a credential problem, not a session expiry: the session
    /// is left alone and the server's detail comes back as a validation error.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let form = vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        let request = self.request(Method::Post, endpoints::LOGIN, RequestBody::Form(form));
        let response = self.transport.send(request).await?;

        let response = response.error_for_status().map_err(|err| match err {
            ClientError::Auth(detail) => ClientError::Validation(if detail.is_empty() {
                "Incorrect username or password".to_string()
            } else {
                detail
            }),
            other => other,
        })?;

        let token: TokenResponse = response.json()?;
        self.session.set_token(&token.access_token)?;
        info!("Logged in as {username}");
        self.session.navigator().navigate(Route::Dashboard);
        Ok(())
    }

    /// Creates an account and moves to the login screen.
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserRecord, ClientError> {
        let body = serde_json::to_value(request)?;
        let response = self
            .transport
            .send(self.request(Method::Post, endpoints::REGISTER, RequestBody::Json(body)))
            .await?
            .error_for_status()?;
        let user: UserRecord = response.json()?;
        info!("Registered account {}", user.username);
        self.session.navigator().navigate(Route::Login);
        Ok(user)
    }

    pub fn logout(&self) {
        self.session.clear_token();
    }

    // ── Profile ────────────────────────────────────────────────────────────

    pub async fn fetch_profile(&self) -> Result<ProfileWire, ClientError> {
        self.get_json(endpoints::PROFILE).await
    }

    pub async fn save_profile(&self, profile: &ProfileWire) -> Result<(), ClientError> {
        self.post_json(endpoints::PROFILE, profile).await?;
        Ok(())
    }

    pub async fn upload_resume(&self, filename: &str, bytes: Bytes) -> Result<(), ClientError> {
        let body = RequestBody::Multipart {
            field: RESUME_FIELD.to_string(),
            filename: filename.to_string(),
            bytes,
        };
        self.send_authed(Method::Post, endpoints::UPLOAD_RESUME, body)
            .await?;
        Ok(())
    }

    // ── Bot & reports ──────────────────────────────────────────────────────

    pub async fn applied_jobs(&self) -> Result<Vec<JobRecord>, ClientError> {
        self.get_json(endpoints::APPLIED_JOBS).await
    }

    pub async fn recommendations(&self) -> Result<Vec<JobRecord>, ClientError> {
        self.get_json(endpoints::RECOMMEND).await
    }

    /// Triggers a server-side action and returns its reply message, if any.
    /// An empty or non-JSON success body is still a success.
    pub async fn post_action(&self, path: &str) -> Result<ActionReply, ClientError> {
        let response = self
            .send_authed(Method::Post, path, RequestBody::Empty)
            .await?;
        Ok(response.json().unwrap_or_default())
    }

    /// URL a download navigation is sent to. The token rides along as a query
    /// parameter because a navigation cannot carry an `Authorization` header.
    pub fn download_url(&self, path: &str) -> Result<Url, ClientError> {
        let Some(token) = self.session.get_token() else {
            self.session.clear_token();
            return Err(ClientError::Auth("Not logged in".to_string()));
        };
        let mut url = Url::parse(&self.url_for(path))
            .map_err(|e| ClientError::InvalidInput(format!("bad download URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair(DOWNLOAD_TOKEN_PARAM, &token);
        Ok(url)
    }

    // ── Admin ──────────────────────────────────────────────────────────────

    pub async fn users(&self) -> Result<Vec<UserRecord>, ClientError> {
        self.get_json(endpoints::ADMIN_USERS).await
    }
}

/// Renders a URL with the token parameter masked, for logs.
pub fn redact_token(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == DOWNLOAD_TOKEN_PARAM {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

//! Action Dispatcher: one path for every server-triggered operation.
//!
//! Each invocation shows exactly one pending notification and resolves it with
//! exactly one terminal notification, including when the operation panics.
//! Side effects are not inferred from the endpoint: the caller names them in
//! the `ActionDescriptor` and gets them back in the `ActionOutcome`.

pub mod dashboard;
pub mod launcher;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{info, warn};

use crate::api::client::redact_token;
use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::notify::Notifier;
use launcher::Launcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Authenticated POST; the reply's `message` becomes the success text.
    Post,
    /// Navigation to the endpoint with the token as a query parameter.
    Download,
}

/// Typed follow-on effect a caller applies when the action succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessEffect {
    None,
    MarkBotRunning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMessages {
    pub pending: String,
    pub success: String,
    pub failure: String,
}

impl ActionMessages {
    pub fn new(pending: &str, success: &str, failure: &str) -> Self {
        Self {
            pending: pending.to_string(),
            success: success.to_string(),
            failure: failure.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub kind: ActionKind,
    pub endpoint: String,
    pub messages: ActionMessages,
    pub on_success: SuccessEffect,
}

impl ActionDescriptor {
    pub fn post(endpoint: &str, messages: ActionMessages) -> Self {
        Self {
            kind: ActionKind::Post,
            endpoint: endpoint.to_string(),
            messages,
            on_success: SuccessEffect::None,
        }
    }

    pub fn download(endpoint: &str, messages: ActionMessages) -> Self {
        Self {
            kind: ActionKind::Download,
            endpoint: endpoint.to_string(),
            messages,
            on_success: SuccessEffect::None,
        }
    }

    pub fn with_effect(mut self, effect: SuccessEffect) -> Self {
        self.on_success = effect;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded {
        message: String,
        effect: SuccessEffect,
    },
    Failed {
        message: String,
        error: ClientError,
    },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded { .. })
    }
}

#[derive(Clone)]
pub struct ActionDispatcher {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    launcher: Arc<dyn Launcher>,
}

impl ActionDispatcher {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            api,
            notifier,
            launcher,
        }
    }

    pub async fn invoke(&self, action: &ActionDescriptor) -> ActionOutcome {
        let toast = self.notifier.pending(&action.messages.pending);

        let result = AssertUnwindSafe(self.perform(action))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(ClientError::Internal(panic_message(panic.as_ref()))));

        match result {
            Ok(reply) => {
                let message = reply
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| action.messages.success.clone());
                info!("Action {} succeeded", action.endpoint);
                self.notifier.success(toast, &message);
                ActionOutcome::Succeeded {
                    message,
                    effect: action.on_success,
                }
            }
            Err(error) => {
                let message = if error.is_auth() {
                    error.user_message()
                } else {
                    error
                        .detail()
                        .map(str::to_string)
                        .unwrap_or_else(|| action.messages.failure.clone())
                };
                warn!("Action {} failed: {error}", action.endpoint);
                self.notifier.failure(toast, &message);
                ActionOutcome::Failed { message, error }
            }
        }
    }

    async fn perform(&self, action: &ActionDescriptor) -> Result<Option<String>, ClientError> {
        match action.kind {
            ActionKind::Post => {
                let reply = self.api.post_action(&action.endpoint).await?;
                Ok(reply.message)
            }
            ActionKind::Download => {
                let url = self.api.download_url(&action.endpoint)?;
                info!("Opening download {}", redact_token(&url));
                self.launcher
                    .open(url)
                    .await
                    .map_err(|e| self.api.reject_session(&action.endpoint, e))?;
                Ok(None)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "action panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use reqwest::Url;

    use super::launcher::testing::RecordingLauncher;
    use super::*;
    use crate::api::endpoints;
    use crate::api::testing::{client_with, FakeTransport};
    use crate::notify::testing::RecordingNotifier;
    use crate::notify::NotificationKind;
    use crate::session::routes::Route;

    struct PanickingLauncher;

    #[async_trait]
    impl Launcher for PanickingLauncher {
        async fn open(&self, _url: Url) -> Result<(), ClientError> {
            panic!("launcher exploded");
        }
    }

    fn messages() -> ActionMessages {
        ActionMessages::new("Working...", "Done.", "Failed.")
    }

    fn dispatcher(
        transport: &FakeTransport,
        token: Option<&str>,
        launcher: Arc<dyn Launcher>,
    ) -> (ActionDispatcher, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let api = client_with(transport.clone(), token);
        (ActionDispatcher::new(api, notifier.clone(), launcher), notifier)
    }

    fn assert_single_terminal(notifier: &RecordingNotifier, kind: NotificationKind) -> String {
        let all = notifier.all();
        assert_eq!(all.len(), 2, "{all:?}");
        assert_eq!(all[0].kind, NotificationKind::Pending);
        assert_eq!(all[1].kind, kind);
        assert_eq!(all[0].id, all[1].id);
        all[1].message.clone()
    }

    #[tokio::test]
    async fn test_post_uses_server_message() {
        let transport = FakeTransport::new();
        transport.push_json(200, r#"{"message":"started"}"#);
        let (dispatcher, notifier) =
            dispatcher(&transport, Some("tok"), Arc::new(RecordingLauncher::default()));

        let action = ActionDescriptor::post(endpoints::RUN_BOT, messages())
            .with_effect(SuccessEffect::MarkBotRunning);
        let outcome = dispatcher.invoke(&action).await;

        assert_eq!(
            outcome,
            ActionOutcome::Succeeded {
                message: "started".into(),
                effect: SuccessEffect::MarkBotRunning
            }
        );
        assert_eq!(assert_single_terminal(&notifier, NotificationKind::Success), "started");
    }

    #[tokio::test]
    async fn test_post_without_message_uses_default() {
        let transport = FakeTransport::new();
        transport.push_json(200, "");
        let (dispatcher, notifier) =
            dispatcher(&transport, Some("tok"), Arc::new(RecordingLauncher::default()));

        let outcome = dispatcher
            .invoke(&ActionDescriptor::post(endpoints::SEND_EMAIL, messages()))
            .await;

        assert!(outcome.is_success());
        assert_eq!(assert_single_terminal(&notifier, NotificationKind::Success), "Done.");
    }

    #[tokio::test]
    async fn test_failure_prefers_server_detail() {
        let transport = FakeTransport::new();
        transport.push_json(400, r#"{"detail":"Profile incomplete"}"#);
        transport.push_error(ClientError::Network("connection refused".into()));
        let (dispatcher, notifier) =
            dispatcher(&transport, Some("tok"), Arc::new(RecordingLauncher::default()));
        let action = ActionDescriptor::post(endpoints::RUN_BOT, messages())
            .with_effect(SuccessEffect::MarkBotRunning);

        let first = dispatcher.invoke(&action).await;
        let second = dispatcher.invoke(&action).await;

        assert!(matches!(first, ActionOutcome::Failed { ref message, .. } if message == "Profile incomplete"));
        assert!(matches!(second, ActionOutcome::Failed { ref message, .. } if message == "Failed."));
        assert_eq!(notifier.of_kind(NotificationKind::Failure).len(), 2);
        assert!(notifier.of_kind(NotificationKind::Success).is_empty());
    }

    #[tokio::test]
    async fn test_proxy_error_page_uses_default_failure() {
        let transport = FakeTransport::new();
        transport.push_json(502, "<html><body><h1>502 Bad Gateway</h1></body></html>");
        let (dispatcher, notifier) =
            dispatcher(&transport, Some("tok"), Arc::new(RecordingLauncher::default()));

        let outcome = dispatcher
            .invoke(&ActionDescriptor::post(endpoints::RUN_BOT, messages()))
            .await;

        assert!(matches!(outcome, ActionOutcome::Failed { ref message, .. } if message == "Failed."));
        assert_eq!(assert_single_terminal(&notifier, NotificationKind::Failure), "Failed.");
    }

    #[tokio::test]
    async fn test_terminal_matches_call_status() {
        for (status, body, success) in [
            (200, r#"{"message":"ok"}"#, true),
            (201, "{}", true),
            (404, "", false),
            (422, r#"{"detail":"bad"}"#, false),
            (503, "unavailable", false),
        ] {
            let transport = FakeTransport::new();
            transport.push_json(status, body);
            let (dispatcher, notifier) =
                dispatcher(&transport, Some("tok"), Arc::new(RecordingLauncher::default()));

            let outcome = dispatcher
                .invoke(&ActionDescriptor::post(endpoints::RUN_BOT, messages()))
                .await;

            assert_eq!(outcome.is_success(), success, "status {status}");
            let terminal = notifier.terminal();
            assert_eq!(terminal.len(), 1, "status {status}");
            let expected = if success {
                NotificationKind::Success
            } else {
                NotificationKind::Failure
            };
            assert_eq!(terminal[0].kind, expected);
        }
    }

    #[tokio::test]
    async fn test_download_navigates_with_token() {
        let transport = FakeTransport::new();
        let launcher = Arc::new(RecordingLauncher::default());
        let (dispatcher, notifier) = dispatcher(&transport, Some("tok"), launcher.clone());

        let outcome = dispatcher
            .invoke(&ActionDescriptor::download(endpoints::DOWNLOAD_EXCEL, messages()))
            .await;

        assert!(outcome.is_success());
        assert!(transport.requests().is_empty());
        let opened = launcher.opened.lock();
        assert_eq!(opened[0].path(), "/api/bot/download-excel");
        assert_eq!(opened[0].query(), Some("token=tok"));
        assert_single_terminal(&notifier, NotificationKind::Success);
    }

    #[tokio::test]
    async fn test_download_without_session_fails_once() {
        let transport = FakeTransport::new();
        let launcher = Arc::new(RecordingLauncher::default());
        let (dispatcher, notifier) = dispatcher(&transport, None, launcher.clone());

        let outcome = dispatcher
            .invoke(&ActionDescriptor::download(endpoints::DOWNLOAD_PDF, messages()))
            .await;

        assert!(!outcome.is_success());
        assert!(launcher.opened.lock().is_empty());
        assert_eq!(
            assert_single_terminal(&notifier, NotificationKind::Failure),
            "Session expired. Please log in again."
        );
    }

    #[tokio::test]
    async fn test_download_rejected_token_clears_session() {
        let transport = FakeTransport::new();
        let launcher = Arc::new(RecordingLauncher {
            fail_with: Some(ClientError::from_status(
                401,
                r#"{"detail":"Could not validate credentials"}"#,
            )),
            ..Default::default()
        });
        let notifier = Arc::new(RecordingNotifier::default());
        let api = client_with(transport, Some("expired"));
        let dispatcher = ActionDispatcher::new(api.clone(), notifier.clone(), launcher.clone());

        let outcome = dispatcher
            .invoke(&ActionDescriptor::download(endpoints::DOWNLOAD_EXCEL, messages()))
            .await;

        assert!(!outcome.is_success());
        assert_eq!(launcher.opened.lock().len(), 1);
        assert_eq!(api.session().get_token(), None);
        assert_eq!(api.session().navigator().current(), Route::Login);
        assert_eq!(
            assert_single_terminal(&notifier, NotificationKind::Failure),
            "Session expired. Please log in again."
        );
    }

    #[tokio::test]
    async fn test_download_server_error_keeps_session() {
        let transport = FakeTransport::new();
        let launcher = Arc::new(RecordingLauncher {
            fail_with: Some(ClientError::from_status(500, r#"{"detail":"report failed"}"#)),
            ..Default::default()
        });
        let (dispatcher, notifier) = dispatcher(&transport, Some("tok"), launcher);

        let outcome = dispatcher
            .invoke(&ActionDescriptor::download(endpoints::DOWNLOAD_PDF, messages()))
            .await;

        assert!(!outcome.is_success());
        assert!(dispatcher.api.session().is_authenticated());
        assert_eq!(
            assert_single_terminal(&notifier, NotificationKind::Failure),
            "report failed"
        );
    }

    #[tokio::test]
    async fn test_panic_still_resolves_notification() {
        let transport = FakeTransport::new();
        let (dispatcher, notifier) = dispatcher(&transport, Some("tok"), Arc::new(PanickingLauncher));

        let outcome = dispatcher
            .invoke(&ActionDescriptor::download(endpoints::DOWNLOAD_PDF, messages()))
            .await;

        match outcome {
            ActionOutcome::Failed { message, error } => {
                assert_eq!(message, "Failed.");
                assert_eq!(error, ClientError::Internal("launcher exploded".into()));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_single_terminal(&notifier, NotificationKind::Failure);
    }
}

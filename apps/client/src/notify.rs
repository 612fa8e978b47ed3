//! Notifications: the user-visible feedback surface.
//!
//! A pending notification and the terminal notification that resolves it share
//! one `ToastId`, so a front end can replace the spinner in place.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl ToastId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ToastId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Pending,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: ToastId,
    pub kind: NotificationKind,
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            NotificationKind::Pending => "…",
            NotificationKind::Success => "✔",
            NotificationKind::Failure => "✖",
        };
        write!(f, "{marker} {}", self.message)
    }
}

/// Sink for notifications. Carried in `AppState` as `Arc<dyn Notifier>`.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn pending(&self, message: &str) -> ToastId {
        let id = ToastId::new();
        self.notify(Notification {
            id,
            kind: NotificationKind::Pending,
            message: message.to_string(),
        });
        id
    }

    fn success(&self, id: ToastId, message: &str) {
        self.notify(Notification {
            id,
            kind: NotificationKind::Success,
            message: message.to_string(),
        });
    }

    fn failure(&self, id: ToastId, message: &str) {
        self.notify(Notification {
            id,
            kind: NotificationKind::Failure,
            message: message.to_string(),
        });
    }

    /// A standalone failure with no preceding pending state.
    fn error(&self, message: &str) {
        self.failure(ToastId::new(), message);
    }
}

/// Writes notifications to the terminal; pending states go to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(kind = ?notification.kind, "notification: {}", notification.message);
        match notification.kind {
            NotificationKind::Pending | NotificationKind::Failure => eprintln!("{notification}"),
            NotificationKind::Success => println!("{notification}"),
        }
    }
}

pub type SharedNotifier = Arc<dyn Notifier>;

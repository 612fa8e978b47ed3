//! Read-only list screens: `Loading -> Loaded | Errored`, once per activation.
//!
//! No retries and no pagination. Leaving a screen bumps its epoch; a response
//! for an older epoch does not change the screen. A failure is still reported.

pub mod admin;
pub mod jobs;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::errors::ClientError;
use crate::notify::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    Loaded(Vec<T>),
    Errored,
}

/// What a list screen shows. The two empty states are deliberately distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScreen<T> {
    Loading(&'static str),
    Records(Vec<T>),
    NoData(&'static str),
    LoadFailed(&'static str),
}

/// Fixed texts of one list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCopy {
    pub loading: &'static str,
    pub no_data: &'static str,
    pub load_failed: &'static str,
}

pub struct ListView<T> {
    state: Mutex<LoadState<T>>,
    epoch: AtomicU64,
    notifier: Arc<dyn Notifier>,
    copy: ListCopy,
}

impl<T: Clone> ListView<T> {
    pub fn new(notifier: Arc<dyn Notifier>, copy: ListCopy) -> Self {
        Self {
            state: Mutex::new(LoadState::Loading),
            epoch: AtomicU64::new(0),
            notifier,
            copy,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> LoadState<T> {
        self.state.lock().clone()
    }

    /// Enters the screen: resets to `Loading` and runs `fetch` once.
    pub async fn activate<F, Fut>(&self, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ClientError>>,
    {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        *self.state.lock() = LoadState::Loading;

        let result = fetch().await;

        if let Err(e) = &result {
            let message = if e.is_auth() {
                e.user_message()
            } else {
                e.detail()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.copy.load_failed.to_string())
            };
            self.notifier.error(&message);
        }

        if self.epoch.load(Ordering::Acquire) != epoch {
            debug!("Discarding list response for an inactive screen");
            return;
        }

        *self.state.lock() = match result {
            Ok(records) => LoadState::Loaded(records),
            Err(_) => LoadState::Errored,
        };
    }

    pub fn deactivate(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    pub fn render(&self) -> ListScreen<T> {
        self.render_with(|records| records.to_vec())
    }

    /// Renders after narrowing the loaded records; an empty result is `NoData`.
    pub fn render_with(&self, select: impl FnOnce(&[T]) -> Vec<T>) -> ListScreen<T> {
        match &*self.state.lock() {
            LoadState::Loading => ListScreen::Loading(self.copy.loading),
            LoadState::Errored => ListScreen::LoadFailed(self.copy.load_failed),
            LoadState::Loaded(records) => {
                let selected = select(records);
                if selected.is_empty() {
                    ListScreen::NoData(self.copy.no_data)
                } else {
                    ListScreen::Records(selected)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;
    use crate::notify::NotificationKind;

    const COPY: ListCopy = ListCopy {
        loading: "Loading...",
        no_data: "Nothing here yet.",
        load_failed: "Could not load.",
    };

    fn view() -> (ListView<u32>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (ListView::new(notifier.clone(), COPY), notifier)
    }

    #[tokio::test]
    async fn test_starts_loading_then_loaded() {
        let (view, notifier) = view();
        assert_eq!(view.render(), ListScreen::Loading("Loading..."));

        view.activate(|| async { Ok(vec![1, 2]) }).await;

        assert_eq!(view.render(), ListScreen::Records(vec![1, 2]));
        assert!(notifier.all().is_empty());
    }

    #[tokio::test]
    async fn test_empty_and_error_states_differ() {
        let (empty, _) = view();
        empty.activate(|| async { Ok(vec![]) }).await;

        let (failed, notifier) = view();
        failed
            .activate(|| async { Err(ClientError::Network("down".into())) })
            .await;

        let empty_screen = empty.render();
        let failed_screen = failed.render();
        assert_eq!(empty_screen, ListScreen::NoData("Nothing here yet."));
        assert_eq!(failed_screen, ListScreen::LoadFailed("Could not load."));
        assert_ne!(COPY.no_data, COPY.load_failed);

        let failures = notifier.of_kind(NotificationKind::Failure);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "Could not load.");
    }

    #[tokio::test]
    async fn test_stale_response_does_not_change_screen() {
        let (view, _) = view();
        view.activate(|| async { Ok(vec![7]) }).await;

        view.activate(|| async {
            view.deactivate();
            Ok(vec![8, 9])
        })
        .await;

        assert_eq!(view.state(), LoadState::Loading);
    }

    #[tokio::test]
    async fn test_stale_failure_is_still_reported() {
        let (view, notifier) = view();
        view.activate(|| async {
            view.deactivate();
            Err(ClientError::from_status(500, r#"{"detail":"db down"}"#))
        })
        .await;

        assert_eq!(notifier.terminal()[0].message, "db down");
        assert_eq!(view.state(), LoadState::Loading);
    }
}

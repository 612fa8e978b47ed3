use std::sync::Arc;

use super::{ListCopy, ListScreen, ListView};
use crate::api::ApiClient;
use crate::models::user::UserRecord;
use crate::notify::Notifier;

const COPY: ListCopy = ListCopy {
    loading: "Loading users...",
    no_data: "No users found.",
    load_failed: "Failed to fetch users.",
};

/// The admin user table with its email/username search.
pub struct AdminUsersView {
    api: ApiClient,
    view: ListView<UserRecord>,
}

impl AdminUsersView {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            view: ListView::new(notifier, COPY),
        }
    }

    pub async fn activate(&self) {
        self.view.activate(|| self.api.users()).await;
    }

    #[allow(dead_code)]
    pub fn deactivate(&self) {
        self.view.deactivate();
    }

    /// Case-insensitive match on email or username; an empty term shows everyone.
    pub fn render(&self, search: &str) -> ListScreen<UserRecord> {
        let term = search.trim().to_lowercase();
        self.view.render_with(|users| {
            users
                .iter()
                .filter(|u| {
                    term.is_empty()
                        || u.email.to_lowercase().contains(&term)
                        || u.username.to_lowercase().contains(&term)
                })
                .cloned()
                .collect()
        })
    }
}

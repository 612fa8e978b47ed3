use std::sync::Arc;

use super::{ListCopy, ListScreen, ListView};
use crate::api::ApiClient;
use crate::models::job::JobRecord;
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobList {
    Applied,
    Recommended,
}

impl JobList {
    fn copy(self) -> ListCopy {
        match self {
            JobList::Applied => ListCopy {
                loading: "Loading your applications...",
                no_data: "No applications yet. Run the bot to start applying.",
                load_failed: "Could not load your applications.",
            },
            JobList::Recommended => ListCopy {
                loading: "Finding the best jobs for you...",
                no_data: "No Recommendations Yet. Make sure your keywords are up to date in your profile!",
                load_failed: "Failed to fetch recommendations.",
            },
        }
    }
}

/// Applied jobs or recommendations, as served.
pub struct JobListView {
    kind: JobList,
    api: ApiClient,
    view: ListView<JobRecord>,
}

impl JobListView {
    pub fn new(kind: JobList, api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            kind,
            api,
            view: ListView::new(notifier, kind.copy()),
        }
    }

    pub async fn activate(&self) {
        match self.kind {
            JobList::Applied => self.view.activate(|| self.api.applied_jobs()).await,
            JobList::Recommended => self.view.activate(|| self.api.recommendations()).await,
        }
    }

    #[allow(dead_code)]
    pub fn deactivate(&self) {
        self.view.deactivate();
    }

    pub fn render(&self) -> ListScreen<JobRecord> {
        self.view.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints;
    use crate::api::testing::{client_with, FakeTransport};
    use crate::notify::testing::RecordingNotifier;
    use crate::session::guard::{Guarded, RouteGuard};
    use crate::session::routes::Route;

    const RECOMMENDATIONS: &str = r#"[
        {"id":1,"user_id":1,"job_title":"Backend Engineer","company_name":"Acme",
         "job_link":"https://jobs.example/1","matched_keyword":"rust","recommended_date":"2024-05-01T09:00:00"},
        {"id":2,"user_id":1,"job_title":"Platform Engineer","company_name":"Globex",
         "job_link":"https://jobs.example/2","matched_keyword":"go","recommended_date":"2024-05-01T09:00:00"}
    ]"#;

    fn view(kind: JobList, transport: &FakeTransport, token: Option<&str>) -> JobListView {
        JobListView::new(
            kind,
            client_with(transport.clone(), token),
            Arc::new(RecordingNotifier::default()),
        )
    }

    #[tokio::test]
    async fn test_recommendations_keep_server_order() {
        let transport = FakeTransport::new();
        transport.push_json(200, RECOMMENDATIONS);
        let view = view(JobList::Recommended, &transport, Some("tok"));

        view.activate().await;

        let ListScreen::Records(jobs) = view.render() else {
            panic!("expected records");
        };
        assert_eq!(jobs[0].company, "Acme");
        assert_eq!(jobs[1].matched_keyword.as_deref(), Some("go"));
        assert_eq!(transport.paths(), [endpoints::RECOMMEND]);
    }

    #[tokio::test]
    async fn test_applied_empty_state() {
        let transport = FakeTransport::new();
        transport.push_json(200, "[]");
        let view = view(JobList::Applied, &transport, Some("tok"));

        view.activate().await;

        assert!(matches!(view.render(), ListScreen::NoData(_)));
        assert_eq!(transport.paths(), [endpoints::APPLIED_JOBS]);
    }

    #[tokio::test]
    async fn test_refetch_replaces_whole_list() {
        let transport = FakeTransport::new();
        transport.push_json(200, RECOMMENDATIONS);
        transport.push_json(
            200,
            r#"[{"job_title":"Only","company_name":"One","job_link":"l"}]"#,
        );
        let view = view(JobList::Recommended, &transport, Some("tok"));

        view.activate().await;
        view.activate().await;

        let ListScreen::Records(jobs) = view.render() else {
            panic!("expected records");
        };
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Only");
    }

    #[tokio::test]
    async fn test_expired_token_passes_guard_then_fails_fetch() {
        let transport = FakeTransport::new();
        transport.push_json(401, r#"{"detail":"Could not validate credentials"}"#);
        let notifier = Arc::new(RecordingNotifier::default());
        let api = client_with(transport.clone(), Some("expired"));
        let guard = RouteGuard::new(api.session().clone());
        let view = JobListView::new(JobList::Recommended, api.clone(), notifier.clone());

        let entered = guard.enter(Route::Recommend, || &view);
        let Guarded::Rendered(view) = entered else {
            panic!("a present token must pass the guard");
        };
        assert_eq!(api.session().navigator().current(), Route::Recommend);

        view.activate().await;

        assert_eq!(transport.requests()[0].bearer.as_deref(), Some("expired"));
        assert!(matches!(view.render(), ListScreen::LoadFailed(_)));
        assert!(!api.session().is_authenticated());
        assert_eq!(api.session().navigator().current(), Route::Login);
        let terminal = notifier.terminal();
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].message, "Session expired. Please log in again.");
    }

    #[test]
    fn test_empty_texts_differ_from_error_texts() {
        for kind in [JobList::Applied, JobList::Recommended] {
            let copy = kind.copy();
            assert_ne!(copy.no_data, copy.load_failed);
        }
    }
}

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::http::HttpTransport;
use crate::api::ApiClient;
use crate::config::Config;
use crate::dispatch::dashboard::Dashboard;
use crate::dispatch::launcher::FileLauncher;
use crate::dispatch::ActionDispatcher;
use crate::notify::{ConsoleNotifier, SharedNotifier};
use crate::session::guard::RouteGuard;
use crate::session::routes::{Navigator, Route};
use crate::session::storage::FileTokenStorage;
use crate::session::SessionStore;

/// Shared client context handed to every command.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: SessionStore,
    pub api: ApiClient,
    /// Toast surface. The console notifier prints to stderr.
    pub notifier: SharedNotifier,
    pub guard: RouteGuard,
    pub dispatcher: ActionDispatcher,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let storage = Arc::new(FileTokenStorage::new(&config.token_file));
        let session = SessionStore::open(storage, Navigator::new(Route::Landing))
            .with_context(|| format!("Cannot read token file {}", config.token_file.display()))?;

        let transport = HttpTransport::new(config.request_timeout)
            .context("Failed to build HTTP transport")?;
        let api = ApiClient::new(&config.api_url, Arc::new(transport), session.clone());

        let notifier: SharedNotifier = Arc::new(ConsoleNotifier);
        let launcher = FileLauncher::new(&config.download_dir, config.request_timeout)
            .context("Failed to build download client")?;
        let dispatcher = ActionDispatcher::new(api.clone(), notifier.clone(), Arc::new(launcher));

        Ok(Self {
            guard: RouteGuard::new(session.clone()),
            config,
            session,
            api,
            notifier,
            dispatcher,
        })
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.dispatcher.clone())
    }
}

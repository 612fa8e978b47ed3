mod api;
mod cli;
mod config;
mod dispatch;
mod errors;
mod models;
mod notify;
mod profile;
mod session;
mod state;
mod views;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(token_file) = cli.token_file {
        config.token_file = token_file;
    }

    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::registry()
        .with(log_filter(cli.log_level.as_deref(), &config.rust_log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("applybot v{} against {}", env!("CARGO_PKG_VERSION"), config.api_url);

    let state = AppState::from_config(config)?;
    cli::run(cli.command, &state).await
}

/// `--log-level` wins over `RUST_LOG`, which wins over the configured default.
fn log_filter(flag: Option<&str>, default_level: &str) -> EnvFilter {
    let scoped = |level: &str| EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level));
    match flag {
        Some(level) => scoped(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| scoped(default_level)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(filter: EnvFilter) -> String {
        filter.to_string().to_lowercase()
    }

    #[test]
    fn test_log_level_flag_overrides_env() {
        std::env::set_var("RUST_LOG", "error");
        assert_eq!(rendered(log_filter(Some("debug"), "warn")), "applybot=debug");
        assert_eq!(rendered(log_filter(None, "warn")), "error");
        std::env::remove_var("RUST_LOG");

        assert_eq!(rendered(log_filter(None, "warn")), "applybot=warn");
    }
}

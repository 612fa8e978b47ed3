use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Client configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token_file: PathBuf,
    pub request_timeout: Duration,
    pub download_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let token_file = match optional_env("APPLYBOT_TOKEN_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_token_file()?,
        };

        let download_dir = match optional_env("APPLYBOT_DOWNLOAD_DIR") {
            Some(path) => PathBuf::from(path),
            None => std::env::current_dir().context("Cannot resolve the current directory")?,
        };

        let timeout_secs = optional_env("APPLYBOT_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("APPLYBOT_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            api_url: optional_env("APPLYBOT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token_file,
            request_timeout: Duration::from_secs(timeout_secs),
            download_dir,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_token_file() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("No config directory on this platform; set APPLYBOT_TOKEN_FILE")?;
    Ok(dir.join("applybot").join("token"))
}

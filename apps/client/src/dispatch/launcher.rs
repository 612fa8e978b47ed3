//! Launchers carry out download navigations.
//!
//! A browser would simply navigate to the URL. `FileLauncher` plays that role
//! for the terminal: it follows the URL and writes the response body to disk.
//! Failures are only visible if the server fails before sending the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Client, Url};
use tracing::info;

use crate::api::client::redact_token;
use crate::errors::ClientError;

#[async_trait]
pub trait Launcher: Send + Sync {
    async fn open(&self, url: Url) -> Result<(), ClientError>;
}

pub struct FileLauncher {
    client: Client,
    dir: PathBuf,
}

impl FileLauncher {
    pub fn new(dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            dir: dir.into(),
        })
    }
}

#[async_trait]
impl Launcher for FileLauncher {
    async fn open(&self, url: Url) -> Result<(), ClientError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), &body));
        }

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| fallback_filename(&url));
        let bytes = response.bytes().await?;

        let target = self.dir.join(&filename);
        write_file(&target, &bytes).await?;
        info!(
            "Saved {} ({} bytes) from {}",
            target.display(),
            bytes.len(),
            redact_token(&url)
        );
        Ok(())
    }
}

async fn write_file(target: &Path, bytes: &[u8]) -> Result<(), ClientError> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ClientError::Storage(e.to_string()))?;
    }
    tokio::fs::write(target, bytes)
        .await
        .map_err(|e| ClientError::Storage(format!("{}: {e}", target.display())))
}

/// Extracts `filename` from a `Content-Disposition` header value. Only the
/// final path component is kept.
fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"'))
        .and_then(|name| Path::new(name).file_name()?.to_str().map(str::to_string))
        .filter(|name| !name.is_empty())
}

fn fallback_filename(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut s| s.next_back())
        .unwrap_or_default();
    match segment {
        "download-excel" => "applied_jobs.xlsx".to_string(),
        "download-pdf" => "applied_jobs.pdf".to_string(),
        "" => "download".to_string(),
        other => other.to_string(),
    }
}

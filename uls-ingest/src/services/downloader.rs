//! Bulk archive downloader
//!
//! Retrieves a named remote resource into the download area with bounded
//! retries and exponential backoff. Every attempt re-establishes the
//! connection from scratch; a response only counts as success once the
//! destination file exists with non-zero size.

use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use uls_common::Config;

// The bulk export servers reject default library user agents
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Progress log granularity while streaming a body to disk
const PROGRESS_CHUNK_BYTES: u64 = 64 * 1024 * 1024;

/// Transport failures
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    /// Some upstreams answer 200 with an HTML apology page
    #[error("Server returned an error page instead of data")]
    ErrorPage,

    #[error("Downloaded file is empty or missing: {0}")]
    EmptyDownload(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A completed transfer
#[derive(Debug, Clone)]
pub struct Download {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Remote dataset metadata from a HEAD probe
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatasetInfo {
    pub url: String,
    pub size_bytes: Option<u64>,
    pub last_modified: Option<String>,
}

/// What an old-download cleanup removed
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupReport {
    pub items_removed: usize,
    pub bytes_freed: u64,
}

/// Retry an operation with exponential backoff.
///
/// No wait before the first attempt; the first retry waits `base_delay`,
/// each subsequent retry doubles the previous wait. Returns the last
/// error once `attempts` is exhausted.
pub async fn retry_with_backoff<T, E, F, Fut>(
    label: &str,
    attempts: u32,
    base_delay: Duration,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = base_delay;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(label, attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!("Attempt {}/{} failed for {}: {}", attempt, attempts, label, e);
                if attempt >= attempts {
                    tracing::error!("All {} attempts failed for {}", attempts, label);
                    return Err(e);
                }
                tracing::info!(
                    "Waiting {} seconds before retry attempt {}",
                    delay.as_secs(),
                    attempt + 1
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
        }
    }
}

/// Downloads dataset archives into the download area
pub struct Downloader {
    client: reqwest::Client,
    download_dir: PathBuf,
    attempts: u32,
    base_delay: Duration,
}

impl Downloader {
    pub fn new(
        download_dir: PathBuf,
        attempts: u32,
        base_delay: Duration,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            client,
            download_dir,
            attempts,
            base_delay,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(
            config.download_path(),
            config.retry_attempts,
            Duration::from_secs(config.retry_base_delay_secs),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Fetch `url` into `<download_dir>/<file_name>`, retrying per the
    /// configured schedule. The error returned is the last attempt's.
    pub async fn fetch(&self, url: &str, file_name: &str) -> Result<Download, TransportError> {
        std::fs::create_dir_all(&self.download_dir)?;
        let path = self.download_dir.join(file_name);

        tracing::info!("Downloading {} from {}", file_name, url);

        let download = retry_with_backoff(file_name, self.attempts, self.base_delay, || {
            self.attempt_fetch(url, &path)
        })
        .await?;

        tracing::info!(
            "Downloaded {} successfully ({} bytes)",
            file_name,
            download.bytes
        );
        Ok(download)
    }

    /// One attempt: fresh request, stream to disk, verify non-empty.
    async fn attempt_fetch(&self, url: &str, path: &Path) -> Result<Download, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if content_type.starts_with("text/html") {
            return Err(TransportError::ErrorPage);
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut bytes: u64 = 0;
        let mut next_progress = PROGRESS_CHUNK_BYTES;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| TransportError::Network(e.to_string()))?;
            file.write_all(&chunk).await?;
            bytes += chunk.len() as u64;
            if bytes >= next_progress {
                tracing::debug!("{}: {} bytes transferred", path.display(), bytes);
                next_progress += PROGRESS_CHUNK_BYTES;
            }
        }
        file.flush().await?;
        drop(file);

        // Trust the filesystem, not the transport layer's word
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(TransportError::EmptyDownload(path.to_path_buf()));
        }

        Ok(Download {
            path: path.to_path_buf(),
            bytes: size,
        })
    }

    /// HEAD probe for dataset size and freshness
    pub async fn probe(&self, url: &str) -> Result<DatasetInfo, TransportError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let size_bytes = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let last_modified = response
            .headers()
            .get(reqwest::header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(DatasetInfo {
            url: url.to_string(),
            size_bytes,
            last_modified,
        })
    }

    /// Remove archives and working directories older than `days`.
    pub fn cleanup_old_downloads(&self, days: u64) -> Result<CleanupReport, std::io::Error> {
        let mut report = CleanupReport::default();
        if !self.download_dir.exists() {
            return Ok(report);
        }

        let cutoff = std::time::SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);

        for entry in std::fs::read_dir(&self.download_dir)? {
            let entry = entry?;
            let path = entry.path();
            let metadata = entry.metadata()?;
            let modified = metadata.modified()?;
            if modified >= cutoff {
                continue;
            }

            if metadata.is_file() && path.extension().is_some_and(|e| e == "zip") {
                report.bytes_freed += metadata.len();
                std::fs::remove_file(&path)?;
                report.items_removed += 1;
                tracing::info!("Cleaned up old download: {}", path.display());
            } else if metadata.is_dir()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("extracted_"))
            {
                report.bytes_freed += dir_size(&path);
                std::fs::remove_dir_all(&path)?;
                report.items_removed += 1;
                tracing::info!("Cleaned up old working directory: {}", path.display());
            }
        }

        if report.items_removed > 0 {
            tracing::info!(
                "Cleanup removed {} items, freed {:.1} MB",
                report.items_removed,
                report.bytes_freed as f64 / (1024.0 * 1024.0)
            );
        }
        Ok(report)
    }
}

fn dir_size(dir: &Path) -> u64 {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .map(|m| m.len())
        .sum()
}

//! Time-tracker submission client.
//!
//! Posts one project-log record per [`TimeEntry`] to the tracker API. The
//! caller decides submission order; the core recommends sequential submission
//! in list order since the backend reconstructs a day's timeline from it.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wl_core::TimeEntry;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const LOG_PATH: &str = "/api/project_logs/";

/// Tracker adapter errors.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The configured auth value was unusable.
    #[error("invalid tracker auth: {reason}")]
    InvalidAuth { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API rejected the submission.
    #[error("tracker API error: status {status}: {body}")]
    Api { status: u16, body: String },
}

/// Connection settings for the tracker API.
#[derive(Clone, Deserialize)]
pub struct TrackerConfig {
    /// API base URL, e.g. `https://tracker.example.com`.
    pub base_url: String,
    /// Opaque Authorization header value.
    pub auth: String,
    pub project_id: i64,
}

impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("base_url", &self.base_url)
            .field("auth", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// One project-log record as the tracker expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub description: String,
    pub minutes: i64,
    /// ISO date the entry belongs to.
    pub when: String,
    /// Event kind wire code.
    #[serde(rename = "type")]
    pub kind: i64,
    pub project: i64,
}

impl LogRecord {
    /// Builds the wire record for a time entry.
    #[must_use]
    pub fn from_entry(entry: &TimeEntry, project_id: i64) -> Self {
        Self {
            description: entry.title.clone(),
            minutes: entry.minutes(),
            when: entry.start.date_naive().to_string(),
            kind: entry.kind.code(),
            project: project_id,
        }
    }
}

/// Tracker API client.
///
/// # Thread Safety
///
/// Safe to clone and share across threads; clones share the underlying HTTP
/// connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: TrackerConfig,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the auth value is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        if config.auth.trim().is_empty() {
            return Err(TrackerError::InvalidAuth {
                reason: "auth cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(TrackerError::ClientBuild)?;

        Ok(Self { http, config })
    }

    /// Submits one time entry as a project-log record.
    pub async fn submit(&self, entry: &TimeEntry) -> Result<(), TrackerError> {
        let record = LogRecord::from_entry(entry, self.config.project_id);
        let url = format!("{}{LOG_PATH}", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(%url, description = %record.description, minutes = record.minutes, "submitting entry");

        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.config.auth)
            .json(&record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

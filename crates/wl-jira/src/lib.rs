//! Jira issue-status adapter for the work logger.
//!
//! Fetches the user's issues with their changelogs and scans status
//! transitions to find when the day's work session ended. The network client
//! is thin; all changelog interpretation is in pure functions that are
//! unit-tested against JSON fixtures.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const SEARCH_PATH: &str = "/rest/api/3/search";
const SEARCH_PAGE_SIZE: u32 = 100;

/// Jira adapter errors.
#[derive(Debug, Error)]
pub enum JiraError {
    /// The configured credentials were unusable.
    #[error("invalid Jira credentials: {reason}")]
    InvalidCredentials { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("Jira API error: status {status}: {body}")]
    Api { status: u16, body: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Connection and status-mapping settings for Jira.
#[derive(Clone, Deserialize)]
pub struct JiraConfig {
    /// Instance base URL, e.g. `https://example.atlassian.net`.
    pub base_url: String,
    pub username: String,
    pub api_token: String,
    /// Assignee name the issue search and changelog scan are restricted to.
    pub assignee_name: String,
    pub project_key: String,
    /// Changelog field whose transitions mark session boundaries.
    #[serde(default = "default_status_field")]
    pub status_field: String,
    pub stop_work_status_primary: String,
    pub stop_work_status_secondary: String,
}

fn default_status_field() -> String {
    "status".to_string()
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_token", &"[REDACTED]")
            .field("assignee_name", &self.assignee_name)
            .field("project_key", &self.project_key)
            .finish_non_exhaustive()
    }
}

/// Jira search API client.
///
/// # Thread Safety
///
/// Safe to clone and share across threads; clones share the underlying HTTP
/// connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: JiraConfig,
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
    /// Returns an error if the username or API token is empty or
    /// whitespace-only, or if the HTTP client fails to build.
    pub fn new(config: JiraConfig) -> Result<Self, JiraError> {
        if config.username.trim().is_empty() {
            return Err(JiraError::InvalidCredentials {
                reason: "username cannot be empty",
            });
        }
        if config.api_token.trim().is_empty() {
            return Err(JiraError::InvalidCredentials {
                reason: "API token cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(JiraError::ClientBuild)?;

        Ok(Self { http, config })
    }

    /// Fetches the user's issues with changelogs expanded.
    pub async fn search_issues(&self) -> Result<SearchResponse, JiraError> {
        let url = format!("{}{SEARCH_PATH}", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(%url, project = %self.config.project_key, "searching Jira issues");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.api_token))
            .json(&search_payload(&self.config))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(JiraError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| JiraError::InvalidResponse(err.to_string()))
    }

    /// Returns when the work session ended on `date`, if Jira observed it.
    pub async fn work_session_end(
        &self,
        date: NaiveDate,
        tz: Tz,
    ) -> Result<Option<DateTime<Utc>>, JiraError> {
        let response = self.search_issues().await?;
        Ok(work_session_end(&response, date, tz, &self.config))
    }
}

fn search_payload(config: &JiraConfig) -> serde_json::Value {
    serde_json::json!({
        "expand": ["changelog"],
        "jql": format!(
            "project = {} AND assignee = {}",
            config.project_key, config.assignee_name
        ),
        "maxResults": SEARCH_PAGE_SIZE,
        "fields": ["summary", "status", "assignee"],
        "startAt": 0,
    })
}

// ========== Wire Types ==========

/// Response of the issue search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
    #[serde(default)]
    pub changelog: Option<Changelog>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Assignee {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<History>,
}

/// One changelog entry: a set of field changes at a single timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct History {
    #[serde(deserialize_with = "de_jira_timestamp")]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryItem {
    pub field: String,
    #[serde(rename = "toString", default)]
    pub to_value: Option<String>,
}

/// Jira emits offsets without a colon ("+0100"), which RFC 3339 rejects.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.3f%z"))
        .map(|dt| dt.with_timezone(&Utc))
}

fn de_jira_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

// ========== Changelog Scanning ==========

/// Finds when the work session ended on `date`, judged in timezone `tz`.
///
/// Scans transitions of the configured status field into the primary stop
/// status; only when no primary transition happened that day does the
/// secondary stop status count. Returns the newest matching timestamp.
pub fn work_session_end(
    response: &SearchResponse,
    date: NaiveDate,
    tz: Tz,
    config: &JiraConfig,
) -> Option<DateTime<Utc>> {
    newest_transition(response, date, tz, config, &config.stop_work_status_primary)
        .or_else(|| newest_transition(response, date, tz, config, &config.stop_work_status_secondary))
}

/// Newest transition into `status` on `date` across the user's issues.
fn newest_transition(
    response: &SearchResponse,
    date: NaiveDate,
    tz: Tz,
    config: &JiraConfig,
    status: &str,
) -> Option<DateTime<Utc>> {
    response
        .issues
        .iter()
        .filter(|issue| assigned_to(issue, &config.assignee_name))
        .filter_map(|issue| issue.changelog.as_ref())
        .flat_map(|changelog| changelog.histories.iter())
        .filter(|history| history.created.with_timezone(&tz).date_naive() == date)
        .filter(|history| moved_to(history, &config.status_field, status))
        .map(|history| history.created)
        .max()
}

fn assigned_to(issue: &Issue, assignee_name: &str) -> bool {
    issue
        .fields
        .assignee
        .as_ref()
        .is_some_and(|assignee| assignee.name == assignee_name)
}

/// A history counts as a transition when its first item changes the status
/// field to the given value.
fn moved_to(history: &History, field: &str, status: &str) -> bool {
    history
        .items
        .first()
        .is_some_and(|item| item.field == field && item.to_value.as_deref() == Some(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Warsaw;
    use serde_json::json;

    fn config() -> JiraConfig {
        JiraConfig {
            base_url: "https://example.atlassian.net".to_string(),
            username: "user@example.com".to_string(),
            api_token: "token-123".to_string(),
            assignee_name: "jdoe".to_string(),
            project_key: "WL".to_string(),
            status_field: "status".to_string(),
            stop_work_status_primary: "Code Review".to_string(),
            stop_work_status_secondary: "Done".to_string(),
        }
    }

    fn issue(key: &str, assignee: &str, histories: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "key": key,
            "fields": {
                "summary": "Test issue",
                "assignee": {"name": assignee},
            },
            "changelog": {"histories": histories},
        })
    }

    fn transition(created: &str, status: &str) -> serde_json::Value {
        json!({
            "created": created,
            "items": [{"field": "status", "toString": status}],
        })
    }

    fn response(issues: Vec<serde_json::Value>) -> SearchResponse {
        serde_json::from_value(json!({"issues": issues})).expect("valid fixture")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn parses_jira_offset_without_colon() {
        let parsed = parse_timestamp("2019-01-16T17:35:02.000+0100").unwrap();
        let expected = Utc.with_ymd_and_hms(2019, 1, 16, 16, 35, 2).unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parses_rfc3339_offset() {
        assert!(parse_timestamp("2019-01-16T17:35:02+01:00").is_ok());
    }

    #[test]
    fn finds_newest_primary_stop_transition() {
        let response = response(vec![issue(
            "WL-1",
            "jdoe",
            vec![
                transition("2019-01-16T12:00:00.000+0100", "Code Review"),
                transition("2019-01-16T17:35:00.000+0100", "Code Review"),
            ],
        )]);

        let end = work_session_end(&response, date(2019, 1, 16), Warsaw, &config()).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2019, 1, 16, 16, 35, 0).unwrap());
    }

    #[test]
    fn primary_stop_status_wins_over_secondary() {
        let response = response(vec![issue(
            "WL-1",
            "jdoe",
            vec![
                transition("2019-01-16T12:00:00.000+0100", "Code Review"),
                transition("2019-01-16T18:00:00.000+0100", "Done"),
            ],
        )]);

        // "Done" is newer, but a primary transition exists for the day.
        let end = work_session_end(&response, date(2019, 1, 16), Warsaw, &config()).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2019, 1, 16, 11, 0, 0).unwrap());
    }

    #[test]
    fn falls_back_to_secondary_stop_status() {
        let response = response(vec![issue(
            "WL-1",
            "jdoe",
            vec![transition("2019-01-16T18:00:00.000+0100", "Done")],
        )]);

        let end = work_session_end(&response, date(2019, 1, 16), Warsaw, &config()).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2019, 1, 16, 17, 0, 0).unwrap());
    }

    #[test]
    fn transitions_on_other_dates_are_ignored() {
        let response = response(vec![issue(
            "WL-1",
            "jdoe",
            vec![transition("2019-01-15T17:00:00.000+0100", "Code Review")],
        )]);

        assert!(work_session_end(&response, date(2019, 1, 16), Warsaw, &config()).is_none());
    }

    #[test]
    fn date_is_judged_in_the_given_timezone() {
        // 00:30 local on the 17th is still 23:30 UTC on the 16th; the scan
        // must judge dates in local time.
        let response = response(vec![issue(
            "WL-1",
            "jdoe",
            vec![transition("2019-01-17T00:30:00.000+0100", "Code Review")],
        )]);

        assert!(work_session_end(&response, date(2019, 1, 16), Warsaw, &config()).is_none());
        assert!(work_session_end(&response, date(2019, 1, 17), Warsaw, &config()).is_some());
    }

    #[test]
    fn other_assignees_are_ignored() {
        let response = response(vec![issue(
            "WL-1",
            "someone-else",
            vec![transition("2019-01-16T17:00:00.000+0100", "Code Review")],
        )]);

        assert!(work_session_end(&response, date(2019, 1, 16), Warsaw, &config()).is_none());
    }

    #[test]
    fn only_the_first_item_of_a_history_counts() {
        let history: History = serde_json::from_value(json!({
            "created": "2019-01-16T17:00:00.000+0100",
            "items": [
                {"field": "labels", "toString": "backend"},
                {"field": "status", "toString": "Code Review"},
            ],
        }))
        .unwrap();

        assert!(!moved_to(&history, "status", "Code Review"));
    }

    #[test]
    fn issue_without_changelog_deserializes() {
        let response: SearchResponse = serde_json::from_value(json!({
            "issues": [{"key": "WL-2", "fields": {"summary": "No changelog"}}],
        }))
        .unwrap();
        assert!(response.issues[0].changelog.is_none());
    }

    #[test]
    fn client_rejects_empty_username() {
        let config = JiraConfig {
            username: String::new(),
            ..config()
        };
        assert!(matches!(
            Client::new(config),
            Err(JiraError::InvalidCredentials { .. })
        ));
    }

    #[test]
    fn client_rejects_whitespace_token() {
        let config = JiraConfig {
            api_token: "   ".to_string(),
            ..config()
        };
        assert!(matches!(
            Client::new(config),
            Err(JiraError::InvalidCredentials { .. })
        ));
    }

    #[test]
    fn config_debug_redacts_token() {
        let debug = format!("{:?}", config());
        assert!(!debug.contains("token-123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn search_payload_expands_changelog() {
        let payload = search_payload(&config());
        assert_eq!(payload["expand"][0], "changelog");
        assert_eq!(payload["jql"], "project = WL AND assignee = jdoe");
    }
}

//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use wl_core::ScheduleSpec;
use wl_jira::JiraConfig;
use wl_tracker::TrackerConfig;

/// Application configuration.
///
/// Loaded once per run and treated as immutable. The nested adapter configs
/// redact their secrets in `Debug` output.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Timezone all local times are interpreted in.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// Hour of day the workday starts at (0-23).
    #[serde(default = "default_start_work_at")]
    pub start_work_at: u32,

    /// Default workday length in hours, used when Jira has not observed a
    /// work-session end for the day.
    #[serde(default = "default_work_hours")]
    pub work_hours: i64,

    /// Raw meeting schedule; validated into a `MeetingSchedule` before use.
    pub meetings: ScheduleSpec,

    pub jira: JiraConfig,
    pub tracker: TrackerConfig,
}

fn default_timezone() -> Tz {
    Tz::UTC
}

const fn default_start_work_at() -> u32 {
    9
}

const fn default_work_hours() -> i64 {
    8
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Merge order: default config location, then the given file, then
    /// `WL_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new();

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("WL_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for the work logger.
///
/// On Linux: `~/.config/worklog`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("worklog"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG_TOML: &str = r#"
timezone = "Europe/Warsaw"
start_work_at = 8

[meetings]
sprint = "weekly"
daily_events = [{ title = "Standup", work_time = 15 }]
weekly_events = [
    { title = "Planning", work_time = 60 },
    { title = "", work_time = 0 },
    { title = "Grooming", work_time = 45 },
    { title = "", work_time = 0 },
    { title = "Retro", work_time = 45 },
]

[jira]
base_url = "https://example.atlassian.net"
username = "user@example.com"
api_token = "token-123"
assignee_name = "jdoe"
project_key = "WL"
stop_work_status_primary = "Code Review"
stop_work_status_secondary = "Done"

[tracker]
base_url = "https://tracker.example.com"
auth = "Token abc"
project_id = 42
"#;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (temp, path)
    }

    #[test]
    fn loads_full_config_from_toml() {
        let (_temp, path) = write_config(CONFIG_TOML);
        let config = Config::load_from(Some(&path)).unwrap();

        assert_eq!(config.timezone, Tz::Europe__Warsaw);
        assert_eq!(config.start_work_at, 8);
        assert_eq!(config.work_hours, 8);
        assert_eq!(config.meetings.sprint, "weekly");
        assert_eq!(config.meetings.daily_events.len(), 1);
        assert_eq!(config.meetings.weekly_events.len(), 5);
        assert_eq!(config.jira.status_field, "status");
        assert_eq!(config.tracker.project_id, 42);
    }

    #[test]
    fn loaded_spec_validates_into_a_schedule() {
        let (_temp, path) = write_config(CONFIG_TOML);
        let config = Config::load_from(Some(&path)).unwrap();
        assert!(wl_core::MeetingSchedule::try_from(config.meetings).is_ok());
    }

    #[test]
    fn missing_jira_section_fails_to_load() {
        let truncated = CONFIG_TOML.replace("[jira]", "[jira_disabled]");
        let (_temp, path) = write_config(&truncated);
        assert!(Config::load_from(Some(&path)).is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let (_temp, path) = write_config(CONFIG_TOML);
        let config = Config::load_from(Some(&path)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("token-123"));
        assert!(!debug.contains("Token abc"));
    }
}

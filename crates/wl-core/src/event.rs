//! Event definitions shared by the schedule resolver and entry builder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What an event represents, with the tracker's wire code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Catch-all, including the remainder "work" entry.
    Other,
    /// A tracked issue.
    Task,
    /// A recurring or ad-hoc meeting. The default: events deserialized from
    /// the meeting configuration are meetings.
    #[default]
    Meeting,
}

impl EventKind {
    /// Numeric code the tracker API expects.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Other => 1,
            Self::Task => 2,
            Self::Meeting => 3,
        }
    }
}

/// A named block of work time.
///
/// An event with an empty title or zero minutes is a placeholder meaning
/// "no event in this slot"; placeholders are kept in the configured lists so
/// weekday indexing stays aligned, but they never produce a time entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,

    /// Duration in minutes.
    pub work_time: u32,

    #[serde(default)]
    pub kind: EventKind,
}

impl Event {
    /// Creates a meeting event.
    pub fn meeting(title: impl Into<String>, work_time: u32) -> Self {
        Self {
            title: title.into(),
            work_time,
            kind: EventKind::Meeting,
        }
    }

    /// Returns true if this event stands for "no event in this slot".
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.title.is_empty() || self.work_time == 0
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m - {}", self.work_time, self.title)
    }
}

//! Schedule resolution.
//!
//! Determines which recurring events apply to a given calendar date under a
//! weekly or biweekly sprint cadence. Biweekly cadence is anchored to a
//! reference Monday: week A covers days 0-6 after the anchor (mod 14),
//! week B days 7-13.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Event;

/// Slots in the weekly event list (Monday..Friday).
pub const WEEKLY_SLOTS: usize = 5;

/// Slots in the biweekly event list (week A Mon..Fri, then week B Mon..Fri).
pub const BIWEEKLY_SLOTS: usize = 10;

/// Malformed or inconsistent meeting configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The sprint value was neither "weekly" nor "biweekly".
    #[error("unexpected sprint cadence: {value}")]
    UnknownCadence { value: String },

    /// An event list did not have the required number of slots.
    #[error("{list} must contain exactly {expected} events, got {actual}")]
    EventListLength {
        list: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Biweekly cadence was configured without an anchor date.
    #[error("biweekly_start_date is required for biweekly cadence")]
    MissingAnchor,

    /// The anchor date string did not parse as YYYY-MM-DD.
    #[error("could not parse biweekly_start_date: {value}")]
    InvalidAnchor { value: String },

    /// The anchor date was not a Monday.
    #[error("biweekly_start_date {anchor} is not a Monday")]
    AnchorNotMonday { anchor: NaiveDate },

    /// The anchor date lies after the date being resolved.
    #[error("biweekly_start_date {anchor} is after the target date {date}")]
    AnchorAfterDate { anchor: NaiveDate, date: NaiveDate },
}

/// Sprint cadence governing which event list applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintCadence {
    Weekly,
    Biweekly,
}

impl SprintCadence {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
        }
    }
}

impl fmt::Display for SprintCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SprintCadence {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            _ => Err(ConfigError::UnknownCadence {
                value: s.to_string(),
            }),
        }
    }
}

/// Raw shape of the configuration's `meetings` table.
///
/// Deserialized as-is and validated into a [`MeetingSchedule`] once at load
/// time, so bad cadence values and short event lists surface before any
/// lookup happens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// "weekly" or "biweekly".
    #[serde(default)]
    pub sprint: String,

    /// Events applying to every resolved day, in order.
    #[serde(default)]
    pub daily_events: Vec<Event>,

    /// Exactly 5 slots, Monday..Friday. Required for weekly cadence.
    #[serde(default)]
    pub weekly_events: Vec<Event>,

    /// Exactly 10 slots. Required for biweekly cadence.
    #[serde(default)]
    pub biweekly_events: Vec<Event>,

    /// Anchor Monday (YYYY-MM-DD). Required for biweekly cadence.
    #[serde(default)]
    pub biweekly_start_date: Option<String>,
}

/// Validated cadence with its slot table.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cadence {
    Weekly {
        slots: Box<[Event; WEEKLY_SLOTS]>,
    },
    Biweekly {
        slots: Box<[Event; BIWEEKLY_SLOTS]>,
        anchor: NaiveDate,
    },
}

/// A validated meeting schedule for one user.
///
/// Constructed from a [`ScheduleSpec`] via `TryFrom`; immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingSchedule {
    daily: Vec<Event>,
    cadence: Cadence,
}

impl TryFrom<ScheduleSpec> for MeetingSchedule {
    type Error = ConfigError;

    fn try_from(spec: ScheduleSpec) -> Result<Self, Self::Error> {
        let cadence = match spec.sprint.parse::<SprintCadence>()? {
            SprintCadence::Weekly => Cadence::Weekly {
                slots: fixed_slots(spec.weekly_events, "weekly_events")?,
            },
            SprintCadence::Biweekly => Cadence::Biweekly {
                slots: fixed_slots(spec.biweekly_events, "biweekly_events")?,
                anchor: parse_anchor(spec.biweekly_start_date.as_deref())?,
            },
        };
        Ok(Self {
            daily: spec.daily_events,
            cadence,
        })
    }
}

impl MeetingSchedule {
    /// Returns the cadence this schedule was configured with.
    #[must_use]
    pub const fn cadence(&self) -> SprintCadence {
        match self.cadence {
            Cadence::Weekly { .. } => SprintCadence::Weekly,
            Cadence::Biweekly { .. } => SprintCadence::Biweekly,
        }
    }

    /// Resolves the events applicable to one calendar date.
    ///
    /// Daily events come first, in configured order, for every day of the
    /// week; weekend policy belongs to the caller. The weekday's slot event
    /// is appended last when present and non-placeholder.
    #[allow(
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation,
        reason = "day offsets are checked non-negative and stay below 10"
    )]
    pub fn resolve(&self, date: NaiveDate) -> Result<Vec<Event>, ConfigError> {
        let mut events = self.daily.clone();

        let slot = match &self.cadence {
            Cadence::Weekly { slots } => weekday_slot(date.weekday()).map(|index| &slots[index]),
            Cadence::Biweekly { slots, anchor } => {
                let days_elapsed = (date - *anchor).num_days();
                if days_elapsed < 0 {
                    return Err(ConfigError::AnchorAfterDate {
                        anchor: *anchor,
                        date,
                    });
                }
                let week_index = ((days_elapsed / 7) % 2) as usize;
                let weekday = (days_elapsed % 7) as usize;
                (weekday < WEEKLY_SLOTS).then(|| &slots[week_index * WEEKLY_SLOTS + weekday])
            }
        };

        if let Some(event) = slot {
            if !event.is_placeholder() {
                events.push(event.clone());
            }
        }

        tracing::debug!(%date, cadence = %self.cadence(), count = events.len(), "resolved day");
        Ok(events)
    }
}

/// Maps a weekday to its slot index; weekends have no slot.
fn weekday_slot(weekday: Weekday) -> Option<usize> {
    let index = weekday.num_days_from_monday() as usize;
    (index < WEEKLY_SLOTS).then_some(index)
}

fn fixed_slots<const N: usize>(
    events: Vec<Event>,
    list: &'static str,
) -> Result<Box<[Event; N]>, ConfigError> {
    let actual = events.len();
    events
        .try_into()
        .map(Box::new)
        .map_err(|_| ConfigError::EventListLength {
            list,
            expected: N,
            actual,
        })
}

fn parse_anchor(value: Option<&str>) -> Result<NaiveDate, ConfigError> {
    let value = value.ok_or(ConfigError::MissingAnchor)?;
    let anchor =
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ConfigError::InvalidAnchor {
            value: value.to_string(),
        })?;
    if anchor.weekday() != Weekday::Mon {
        return Err(ConfigError::AnchorNotMonday { anchor });
    }
    Ok(anchor)
}

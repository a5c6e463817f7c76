//! Time-entry building.
//!
//! Lays out a resolved day's events as contiguous, non-overlapping intervals
//! starting at the configured workday start, then closes the day with a
//! single remainder entry up to the end-of-day boundary.

use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

use crate::event::{Event, EventKind};

/// Title of the remainder entry that absorbs unscheduled time.
pub const WORK_ENTRY_TITLE: &str = "work";

/// Entry-building failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// The scheduled events consume the entire workday, leaving no room for
    /// the remainder entry.
    #[error(
        "meetings fill the workday: {minutes_scheduled} minutes scheduled, boundary at {end_of_day}"
    )]
    ScheduleOverflow {
        minutes_scheduled: i64,
        end_of_day: DateTime<Tz>,
    },

    /// The configured start hour was not a valid hour of day.
    #[error("start hour must be between 0 and 23, got {hour}")]
    StartHourOutOfRange { hour: u32 },

    /// The local start time does not exist in the configured timezone
    /// (DST spring-forward gap).
    #[error("{date} {hour:02}:00 does not exist in {tz}")]
    InvalidLocalStart {
        date: NaiveDate,
        hour: u32,
        tz: Tz,
    },
}

/// One logged interval of the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub title: String,
    pub kind: EventKind,
}

impl TimeEntry {
    /// Entry length in whole minutes.
    #[must_use]
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Resolves `date` at `hour:00:00` in `tz`.
///
/// Ambiguous local times (DST fall-back) pick the earlier instant.
pub fn workday_start(date: NaiveDate, hour: u32, tz: Tz) -> Result<DateTime<Tz>, EntryError> {
    let naive = date
        .and_hms_opt(hour, 0, 0)
        .ok_or(EntryError::StartHourOutOfRange { hour })?;
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or(EntryError::InvalidLocalStart { date, hour, tz })
}

/// Builds the day's time entries.
///
/// Each non-placeholder event, in order, occupies `[cursor, cursor + minutes)`
/// and advances the cursor; the final entry is titled [`WORK_ENTRY_TITLE`] and
/// spans `[cursor, end_of_day)`. The result covers `[start, end_of_day)`
/// exactly once, with no gaps and no overlaps.
pub fn build_entries(
    start: DateTime<Tz>,
    end_of_day: DateTime<Tz>,
    events: &[Event],
) -> Result<Vec<TimeEntry>, EntryError> {
    let mut entries = Vec::with_capacity(events.len() + 1);
    let mut cursor = start;

    for event in events {
        if event.is_placeholder() {
            continue;
        }
        let end = cursor + Duration::minutes(i64::from(event.work_time));
        entries.push(TimeEntry {
            start: cursor,
            end,
            title: event.title.clone(),
            kind: event.kind,
        });
        cursor = end;
    }

    if end_of_day <= cursor {
        return Err(EntryError::ScheduleOverflow {
            minutes_scheduled: (cursor - start).num_minutes(),
            end_of_day,
        });
    }

    entries.push(TimeEntry {
        start: cursor,
        end: end_of_day,
        title: WORK_ENTRY_TITLE.to_string(),
        kind: EventKind::Other,
    });
    Ok(entries)
}

//! Shared helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::{Context, bail};
use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use wl_core::{Event, MeetingSchedule, TimeEntry};

use crate::cli::DayArgs;

/// Parses an ad-hoc meeting argument of the form "title:minutes".
pub fn parse_meeting_arg(raw: &str) -> anyhow::Result<Event> {
    let Some((title, minutes)) = raw.rsplit_once(':') else {
        bail!("expected \"title:minutes\", got {raw:?}");
    };
    if title.is_empty() {
        bail!("meeting title cannot be empty in {raw:?}");
    }
    let work_time: u32 = minutes
        .parse()
        .with_context(|| format!("invalid minutes in {raw:?}"))?;
    Ok(Event::meeting(title, work_time))
}

/// Resolves the target date: the `--when` argument, or today in `tz`.
pub fn target_date(when: Option<&str>, tz: Tz) -> anyhow::Result<NaiveDate> {
    match when {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid date {raw:?}, expected YYYY-MM-DD")),
        None => Ok(Utc::now().with_timezone(&tz).date_naive()),
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() >= 5
}

/// Collects the day's events, honoring the override/ad-hoc meeting flags.
///
/// `--override-meeting` replaces the resolved meetings entirely, in which
/// case `--meeting` is ignored.
pub fn day_events(
    schedule: &MeetingSchedule,
    date: NaiveDate,
    day: &DayArgs,
) -> anyhow::Result<Vec<Event>> {
    if let Some(raw) = &day.override_meeting {
        return Ok(vec![parse_meeting_arg(raw)?]);
    }

    let mut events = schedule
        .resolve(date)
        .with_context(|| format!("failed to resolve schedule for {date}"))?;
    if let Some(raw) = &day.meeting {
        events.push(parse_meeting_arg(raw)?);
    }
    Ok(events)
}

/// Renders entries as a local-time timeline, one line per entry.
pub fn render_entries(entries: &[TimeEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{} - {}  {:>4}m  {}",
            entry.start.format("%H:%M"),
            entry.end.format("%H:%M"),
            entry.minutes(),
            entry.title,
        );
    }
    out
}

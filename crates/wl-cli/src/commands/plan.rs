//! Plan command: offline preview of a day's entries.
//!
//! Uses the configured default workday length for the end-of-day boundary,
//! so it never needs the network.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Duration;
use wl_core::{MeetingSchedule, build_entries, workday_start};

use super::util;
use crate::Config;
use crate::cli::DayArgs;

pub fn run<W: Write>(writer: &mut W, config: &Config, day: &DayArgs) -> Result<()> {
    let schedule = MeetingSchedule::try_from(config.meetings.clone())
        .context("invalid meeting configuration")?;
    let date = util::target_date(day.when.as_deref(), config.timezone)?;
    let events = util::day_events(&schedule, date, day)?;

    let start = workday_start(date, config.start_work_at, config.timezone)?;
    let end_of_day = start + Duration::hours(config.work_hours);
    let entries = build_entries(start, end_of_day, &events)
        .with_context(|| format!("failed to build entries for {date}"))?;

    writeln!(writer, "Plan for {date} ({})", config.timezone)?;
    write!(writer, "{}", util::render_entries(&entries))?;
    Ok(())
}

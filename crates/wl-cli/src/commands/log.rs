//! Log command: build a day's entries and submit them to the tracker.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::Duration;
use wl_core::{MeetingSchedule, TimeEntry, build_entries, workday_start};

use super::util;
use crate::Config;
use crate::cli::DayArgs;

pub async fn run(config: &Config, day: &DayArgs, assume_yes: bool) -> Result<()> {
    let schedule = MeetingSchedule::try_from(config.meetings.clone())
        .context("invalid meeting configuration")?;
    let date = util::target_date(day.when.as_deref(), config.timezone)?;
    if util::is_weekend(date) {
        bail!("cannot log work on a weekend ({date})");
    }

    let events = util::day_events(&schedule, date, day)?;
    let start = workday_start(date, config.start_work_at, config.timezone)?;

    let jira = wl_jira::Client::new(config.jira.clone()).context("invalid Jira configuration")?;
    let session_end = jira
        .work_session_end(date, config.timezone)
        .await
        .context("failed to query Jira for the work-session end")?;
    let end_of_day = match session_end {
        Some(end) => {
            let end = end.with_timezone(&config.timezone);
            tracing::debug!(%end, "using Jira-observed session end");
            end
        }
        None => start + Duration::hours(config.work_hours),
    };

    let entries = build_entries(start, end_of_day, &events)
        .with_context(|| format!("failed to build entries for {date}"))?;

    println!("Entries for {date}:");
    print!("{}", util::render_entries(&entries));

    if !assume_yes && !confirm()? {
        println!("Aborted");
        return Ok(());
    }

    submit_all(config, &entries).await
}

fn confirm() -> Result<bool> {
    print!("\nProceed with logging? [Y/n] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("failed to read answer")?;
    Ok(matches!(answer.trim(), "" | "y" | "Y" | "yes" | "Yes"))
}

/// Submits entries sequentially in list order; the tracker reconstructs the
/// day's timeline from submission order.
async fn submit_all(config: &Config, entries: &[TimeEntry]) -> Result<()> {
    let tracker =
        wl_tracker::Client::new(config.tracker.clone()).context("invalid tracker configuration")?;

    let mut failed = 0usize;
    for entry in entries {
        if let Err(err) = tracker.submit(entry).await {
            tracing::warn!(title = %entry.title, %err, "submission failed");
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} entries failed to submit", entries.len());
    }
    println!("Logged {} entries", entries.len());
    Ok(())
}

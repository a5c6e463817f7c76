//! Core domain logic for the work logger.
//!
//! This crate contains the fundamental types and logic for:
//! - Schedule resolution: which recurring events apply to a calendar date
//! - Entry building: laying out a day's contiguous time entries
//!
//! Everything here is pure: no I/O, no hidden state. The Jira and tracker
//! adapters live in their own crates and consume these types.

pub mod entry;
pub mod event;
pub mod schedule;

pub use entry::{EntryError, TimeEntry, WORK_ENTRY_TITLE, build_entries, workday_start};
pub use event::{Event, EventKind};
pub use schedule::{ConfigError, MeetingSchedule, ScheduleSpec, SprintCadence};

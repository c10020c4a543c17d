//! Progress Tracking
//!
//! Weekly max-weight and volume series per body part, workout streaks,
//! month calendars, and a storage-backed tracker that ties them together.

#![warn(missing_docs)]

pub mod aggregator;
pub mod calendar;
pub mod tracker;

pub use aggregator::{aggregate_by_week_and_body_part, compute_streak, compute_weekly_windows};
pub use calendar::{month_bounds, month_calendar, CalendarDay, MonthCalendar};
pub use tracker::{BasicProgressTracker, ProgressConfig, ProgressReport, ProgressTracker};

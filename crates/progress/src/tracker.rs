//! Progress tracking service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Weekday};
use liftlog_core::{Metric, ProgressPoint, WeekWindow, WorkoutFilter};
use liftlog_storage::{flatten_workouts, Result, Storage};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregator::{aggregate_by_week_and_body_part, compute_streak, compute_weekly_windows};
use crate::calendar::{month_bounds, month_calendar, MonthCalendar};

/// Aggregation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressConfig {
    /// Trailing weeks shown in the series
    pub week_count: usize,
    /// First day of the week
    pub week_start: Weekday,
    /// Window for the recent-workouts count, in days
    pub recent_days: i64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            week_count: 4,
            week_start: Weekday::Sun,
            recent_days: 30,
        }
    }
}

/// Everything the dashboard shows, computed for one reference day.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    /// Reference day
    pub today: NaiveDate,
    /// Weeks covered by the series
    pub windows: Vec<WeekWindow>,
    /// Heaviest weight per week and body part
    pub max_weight: Vec<ProgressPoint>,
    /// Volume per week and body part
    pub total_volume: Vec<ProgressPoint>,
    /// Consecutive workout days ending at the latest workout
    pub streak: u32,
    /// Workouts in the trailing `recent_days`
    pub recent_workouts: usize,
    /// All workouts on record
    pub total_workouts: usize,
    /// Body parts seen in any workout, sorted
    pub body_parts: Vec<String>,
}

impl ProgressReport {
    /// Series for one metric.
    pub fn series(&self, metric: Metric) -> &[ProgressPoint] {
        match metric {
            Metric::MaxWeight => &self.max_weight,
            Metric::TotalVolume => &self.total_volume,
        }
    }

    /// Whether there is anything to chart.
    pub fn is_empty(&self) -> bool {
        self.body_parts.is_empty()
    }
}

/// Progress tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Build the progress report for `today`.
    async fn report(&self, today: NaiveDate) -> Result<ProgressReport>;

    /// Month calendar, or `None` for an invalid month.
    async fn calendar(&self, year: i32, month: u32) -> Result<Option<MonthCalendar>>;
}

/// Progress tracker backed by a [`Storage`].
pub struct BasicProgressTracker<S: Storage> {
    storage: Arc<S>,
    config: ProgressConfig,
}

impl<S: Storage> BasicProgressTracker<S> {
    /// Create a new progress tracker with default settings.
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
            config: ProgressConfig::default(),
        }
    }

    /// Override the aggregation settings.
    pub fn with_config(mut self, config: ProgressConfig) -> Self {
        self.config = config;
        self
    }

    /// Active settings.
    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }
}

#[async_trait]
impl<S: Storage + 'static> ProgressTracker for BasicProgressTracker<S> {
    async fn report(&self, today: NaiveDate) -> Result<ProgressReport> {
        let workouts = self.storage.list_workouts(&WorkoutFilter::default()).await?;
        let records = flatten_workouts(&workouts);

        let windows = compute_weekly_windows(today, self.config.week_count, self.config.week_start);
        let max_weight = aggregate_by_week_and_body_part(&records, &windows, Metric::MaxWeight);
        let total_volume = aggregate_by_week_and_body_part(&records, &windows, Metric::TotalVolume);

        let streak = compute_streak(workouts.iter().map(|w| w.date));

        let recent_from = today - Duration::days(self.config.recent_days);
        let recent_workouts = workouts
            .iter()
            .filter(|w| w.date >= recent_from && w.date <= today)
            .count();

        let mut body_parts: Vec<String> = records
            .iter()
            .flat_map(|r| r.body_parts.iter().cloned())
            .collect();
        body_parts.sort();
        body_parts.dedup();

        info!(
            workouts = workouts.len(),
            records = records.len(),
            streak,
            "Computed progress report"
        );

        Ok(ProgressReport {
            today,
            windows,
            max_weight,
            total_volume,
            streak,
            recent_workouts,
            total_workouts: workouts.len(),
            body_parts,
        })
    }

    async fn calendar(&self, year: i32, month: u32) -> Result<Option<MonthCalendar>> {
        let Some((first, last)) = month_bounds(year, month) else {
            return Ok(None);
        };
        let workouts = self.storage.list_workouts(&WorkoutFilter::between(first, last)).await?;
        debug!(year, month, workouts = workouts.len(), "Building month calendar");
        Ok(month_calendar(&workouts, year, month))
    }
}

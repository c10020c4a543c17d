//! Aggregation inputs and outputs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{ExerciseId, WorkoutId};

/// One or more identical sets of an exercise, flattened for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// Workout the sets belong to
    pub workout_id: WorkoutId,

    /// Exercise performed
    pub exercise_id: ExerciseId,

    /// Body parts credited; empty means unresolved
    pub body_parts: BTreeSet<String>,

    /// Load per rep
    pub weight: f64,

    /// Number of sets sharing this weight and rep count
    pub sets_count: u32,

    /// Reps per set
    pub reps_count: u32,

    /// Day of the parent workout
    pub performed_on: NaiveDate,
}

impl SetRecord {
    /// Weight usable for aggregation: non-finite or negative loads count as `0`.
    pub fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            0.0
        }
    }

    /// Training volume: weight x sets x reps, never negative.
    pub fn volume(&self) -> f64 {
        self.effective_weight() * f64::from(self.sets_count) * f64::from(self.reps_count)
    }
}

/// One calendar week, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    /// "Week N", oldest week first
    pub label: String,

    /// First day of the week
    pub start: NaiveDate,

    /// Last day of the week
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Whether a day falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Aggregated value per body part for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    /// Week label
    pub week: String,

    /// Value per body part; every observed body part is present
    pub per_body_part: BTreeMap<String, f64>,
}

/// Which reduction to apply per week and body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Heaviest weight lifted
    MaxWeight,
    /// Sum of weight x sets x reps
    TotalVolume,
}

impl Metric {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::MaxWeight => "max_weight",
            Metric::TotalVolume => "total_volume",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(weight: f64, sets_count: u32, reps_count: u32) -> SetRecord {
        SetRecord {
            workout_id: WorkoutId::new(),
            exercise_id: ExerciseId::new(),
            body_parts: BTreeSet::from(["Legs".to_string()]),
            weight,
            sets_count,
            reps_count,
            performed_on: date(2024, 5, 1),
        }
    }

    #[test]
    fn test_volume() {
        assert_eq!(record(50.0, 3, 10).volume(), 1500.0);
    }

    #[test]
    fn test_bad_weights_count_as_zero() {
        for weight in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -20.0] {
            let record = record(weight, 0, 10);
            assert_eq!(record.effective_weight(), 0.0);
            assert_eq!(record.volume(), 0.0);
        }
    }

    #[test]
    fn test_week_window_contains_is_inclusive() {
        let window = WeekWindow {
            label: "Week 1".to_string(),
            start: date(2024, 4, 28),
            end: date(2024, 5, 4),
        };
        assert!(window.contains(date(2024, 4, 28)));
        assert!(window.contains(date(2024, 5, 4)));
        assert!(!window.contains(date(2024, 5, 5)));
        assert!(!window.contains(date(2024, 4, 27)));
    }

    #[test]
    fn test_metric_serde_names() {
        assert_eq!(serde_json::to_string(&Metric::MaxWeight).unwrap(), "\"max_weight\"");
        assert_eq!(Metric::TotalVolume.to_string(), "total_volume");
    }
}

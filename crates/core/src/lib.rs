//! liftlog core data models.
//!
//! Workouts, the exercise library, and the flattened records the progress
//! aggregator works on.

#![warn(missing_docs)]

// Identities
mod id;

// Logged data
mod workout;
mod exercise;

// Aggregation shapes
mod record;

// Re-exports
pub use id::*;

pub use workout::{Workout, WorkoutExercise, WorkoutSet, WorkoutFilter};
pub use exercise::{
    Exercise, CatalogEntry, BODY_PARTS, CATALOG, exercises_for_body_parts, search,
};
pub use record::{SetRecord, WeekWindow, ProgressPoint, Metric};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

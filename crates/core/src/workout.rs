//! Workout model - a logged training session.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::id::{ExerciseId, WorkoutId};
use crate::Time;

/// A workout is one training session on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: WorkoutId,

    /// Optional session name ("Push day")
    pub name: Option<String>,

    /// Calendar day the session took place
    pub date: NaiveDate,

    /// When the session started
    pub start_time: Option<NaiveTime>,

    /// Length of the session in minutes
    pub duration_minutes: Option<u32>,

    /// Exercises performed, in order
    pub exercises: Vec<WorkoutExercise>,

    /// When created
    pub created_at: Time,
}

impl Workout {
    /// Create an empty workout on the given day.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: WorkoutId::new(),
            name: None,
            date,
            start_time: None,
            duration_minutes: None,
            exercises: Vec::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Distinct body parts trained across all exercises.
    pub fn body_parts(&self) -> BTreeSet<String> {
        self.exercises
            .iter()
            .flat_map(|e| e.body_parts.iter().cloned())
            .collect()
    }

    /// Session name derived from the trained body parts, e.g.
    /// `"Chest & Triceps Workout"`, or `"Workout <date>"` when there are none.
    pub fn default_name<S: AsRef<str>>(body_parts: &[S], date: NaiveDate) -> String {
        if body_parts.is_empty() {
            return format!("Workout {}", date);
        }
        let parts: Vec<&str> = body_parts.iter().map(AsRef::as_ref).collect();
        format!("{} Workout", parts.join(" & "))
    }

    /// Total number of performed sets.
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}

/// One exercise performed within a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    /// Library exercise this refers to
    pub exercise_id: ExerciseId,

    /// Exercise name at the time of logging
    pub name: String,

    /// Body parts the exercise is classified under
    pub body_parts: Vec<String>,

    /// Performed sets
    pub sets: Vec<WorkoutSet>,
}

/// A single performed set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// Load, in whatever unit the user logs
    pub weight: f64,

    /// Repetitions
    pub reps: u32,
}

impl WorkoutSet {
    /// Create a set.
    pub fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps }
    }
}

impl std::str::FromStr for WorkoutSet {
    type Err = String;

    /// Parse `<weight>x<reps>`, e.g. `135x8` or `62.5x10`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (weight, reps) = s
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(|| format!("expected <weight>x<reps>, got '{}'", s))?;
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|_| format!("invalid weight '{}'", weight))?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(format!("weight must be a non-negative number, got '{}'", weight));
        }
        let reps: u32 = reps
            .trim()
            .parse()
            .map_err(|_| format!("invalid reps '{}'", reps))?;
        Ok(Self { weight, reps })
    }
}

/// Filter for listing workouts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutFilter {
    /// Earliest day, inclusive
    pub from: Option<NaiveDate>,

    /// Latest day, inclusive
    pub to: Option<NaiveDate>,

    /// Maximum number of workouts returned (most recent first)
    pub limit: Option<usize>,
}

impl WorkoutFilter {
    /// Filter for an inclusive date range.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            limit: None,
        }
    }

    /// Whether a workout falls inside the date bounds.
    pub fn matches(&self, workout: &Workout) -> bool {
        self.from.map_or(true, |from| workout.date >= from)
            && self.to.map_or(true, |to| workout.date <= to)
    }
}

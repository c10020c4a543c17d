//! Unique identifiers for liftlog entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a Workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkoutId(Ulid);

impl WorkoutId {
    /// Generate a new WorkoutId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for WorkoutId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for WorkoutId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for an Exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExerciseId(Ulid);

impl ExerciseId {
    /// Generate a new ExerciseId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ExerciseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ExerciseId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_id_display_round_trip() {
        let id = WorkoutId::new();
        let parsed: WorkoutId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_exercise_id_rejects_garbage() {
        assert!("not-a-ulid".parse::<ExerciseId>().is_err());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(WorkoutId::new(), WorkoutId::new());
        assert_ne!(ExerciseId::new(), ExerciseId::new());
    }
}

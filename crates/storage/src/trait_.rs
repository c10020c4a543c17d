//! Storage trait abstraction.

use async_trait::async_trait;
use liftlog_core::{Exercise, ExerciseId, Workout, WorkoutFilter, WorkoutId, CATALOG};
use tracing::info;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Storage abstraction for workouts and the exercise library.
///
/// This trait allows different storage backends to be plugged in.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Workout operations ===

    /// Save a workout (create or update).
    async fn save_workout(&mut self, workout: &Workout) -> Result<()>;

    /// Load a workout by ID.
    async fn load_workout(&self, id: WorkoutId) -> Result<Option<Workout>>;

    /// List workouts matching the filter, most recent first.
    async fn list_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>>;

    /// Load a workout that must exist.
    async fn require_workout(&self, id: WorkoutId) -> Result<Workout> {
        self.load_workout(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("workout {}", id)))
    }

    /// Delete a workout.
    async fn delete_workout(&mut self, id: WorkoutId) -> Result<()>;

    // === Exercise operations ===

    /// Save an exercise (create or update).
    async fn save_exercise(&mut self, exercise: &Exercise) -> Result<()>;

    /// Load an exercise by ID.
    async fn load_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>>;

    /// List all exercises, sorted by body part then name.
    async fn list_exercises(&self) -> Result<Vec<Exercise>>;

    /// Find an exercise by name, ignoring case.
    async fn find_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>> {
        let exercises = self.list_exercises().await?;
        Ok(exercises.into_iter().find(|e| e.name.eq_ignore_ascii_case(name)))
    }
}

/// Insert every catalog exercise not already stored. Returns how many were added.
pub async fn seed_library<S: Storage + ?Sized>(storage: &mut S) -> Result<usize> {
    let existing = storage.list_exercises().await?;
    let mut added = 0;

    for entry in CATALOG {
        if existing.iter().any(|e| e.name.eq_ignore_ascii_case(entry.name)) {
            continue;
        }
        storage.save_exercise(&entry.to_exercise()).await?;
        added += 1;
    }

    if added > 0 {
        info!("Seeded {} catalog exercises", added);
    }
    Ok(added)
}

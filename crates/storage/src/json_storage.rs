//! JSON file storage implementation.
//!
//! Stores one pretty-printed JSON file per workout and per exercise under a
//! root directory (`.liftlog` by default in the CLI).

use std::path::{Path, PathBuf};

use liftlog_core::{Exercise, ExerciseId, Workout, WorkoutFilter, WorkoutId};
use tokio::fs;
use tracing::{debug, warn};

use super::{Result, Storage};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage, creating the `workouts/` and `exercises/` directories
    /// under `root` if they do not exist yet.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("workouts")).await?;
        fs::create_dir_all(root.join("exercises")).await?;
        debug!(root = %root.display(), "Opened JSON storage");

        Ok(Self { root })
    }

    fn workout_path(&self, id: WorkoutId) -> PathBuf {
        self.root.join("workouts").join(format!("{}.json", id))
    }

    fn exercise_path(&self, id: ExerciseId) -> PathBuf {
        self.root.join("exercises").join(format!("{}.json", id))
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_workout(&mut self, workout: &Workout) -> Result<()> {
        let json = serde_json::to_string_pretty(workout)?;
        fs::write(self.workout_path(workout.id), json.as_bytes()).await?;
        debug!(id = %workout.id, date = %workout.date, "Saved workout");
        Ok(())
    }

    async fn load_workout(&self, id: WorkoutId) -> Result<Option<Workout>> {
        read_json(&self.workout_path(id)).await
    }

    async fn list_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>> {
        let all: Vec<Workout> = list_dir(&self.root.join("workouts")).await?;
        let mut workouts: Vec<Workout> = all.into_iter().filter(|w| filter.matches(w)).collect();

        // Newest first; same-day workouts by start time, then creation
        workouts.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.start_time.cmp(&a.start_time))
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        if let Some(limit) = filter.limit {
            workouts.truncate(limit);
        }
        Ok(workouts)
    }

    async fn delete_workout(&mut self, id: WorkoutId) -> Result<()> {
        match fs::remove_file(self.workout_path(id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        debug!(id = %id, "Deleted workout");
        Ok(())
    }

    async fn save_exercise(&mut self, exercise: &Exercise) -> Result<()> {
        let json = serde_json::to_string_pretty(exercise)?;
        fs::write(self.exercise_path(exercise.id), json.as_bytes()).await?;
        debug!(id = %exercise.id, name = %exercise.name, "Saved exercise");
        Ok(())
    }

    async fn load_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>> {
        read_json(&self.exercise_path(id)).await
    }

    async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let mut exercises: Vec<Exercise> = list_dir(&self.root.join("exercises")).await?;
        exercises.sort_by(|a, b| a.body_part.cmp(&b.body_part).then_with(|| a.name.cmp(&b.name)));
        Ok(exercises)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable file"),
        }
    }
    Ok(items)
}

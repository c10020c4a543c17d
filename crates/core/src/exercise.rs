//! Exercise library - stored exercises and the built-in catalog.

use serde::{Deserialize, Serialize};

use crate::id::ExerciseId;
use crate::Time;

/// An exercise available for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: ExerciseId,

    /// Display name
    pub name: String,

    /// Body part the exercise is filed under
    pub body_part: String,

    /// Main muscle worked
    pub primary_muscle: String,

    /// Assisting muscles
    pub secondary_muscles: Vec<String>,

    /// Added by the user rather than seeded from the catalog
    pub custom: bool,

    /// When created
    pub created_at: Time,
}

impl Exercise {
    /// Create a user-defined exercise.
    pub fn custom(
        name: impl Into<String>,
        body_part: impl Into<String>,
        primary_muscle: impl Into<String>,
        secondary_muscles: Vec<String>,
    ) -> Self {
        Self {
            id: ExerciseId::new(),
            name: name.into(),
            body_part: body_part.into(),
            primary_muscle: primary_muscle.into(),
            secondary_muscles,
            custom: true,
            created_at: chrono::Utc::now(),
        }
    }

    /// Case-insensitive match against name or muscles.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.primary_muscle.to_lowercase().contains(&query)
            || self
                .secondary_muscles
                .iter()
                .any(|m| m.to_lowercase().contains(&query))
    }
}

/// A built-in catalog exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Display name
    pub name: &'static str,
    /// Body part the exercise is filed under
    pub body_part: &'static str,
    /// Main muscle worked
    pub primary_muscle: &'static str,
    /// Assisting muscles
    pub secondary_muscles: &'static [&'static str],
}

impl CatalogEntry {
    /// Materialize the entry as a stored exercise with a fresh id.
    pub fn to_exercise(&self) -> Exercise {
        Exercise {
            id: ExerciseId::new(),
            name: self.name.to_string(),
            body_part: self.body_part.to_string(),
            primary_muscle: self.primary_muscle.to_string(),
            secondary_muscles: self.secondary_muscles.iter().map(|m| m.to_string()).collect(),
            custom: false,
            created_at: chrono::Utc::now(),
        }
    }
}

macro_rules! entry {
    ($part:literal, $name:literal, $primary:literal, [$($secondary:literal),*]) => {
        CatalogEntry {
            name: $name,
            body_part: $part,
            primary_muscle: $primary,
            secondary_muscles: &[$($secondary),*],
        }
    };
}

/// Body parts covered by the catalog, in display order.
pub const BODY_PARTS: &[&str] = &[
    "Chest", "Back", "Legs", "Shoulders", "Biceps", "Triceps", "Abs", "Calves", "Forearms",
    "Glutes", "Traps", "Full Body",
];

/// Built-in exercises grouped by body part.
pub const CATALOG: &[CatalogEntry] = &[
    entry!("Chest", "Bench Press", "Chest", ["Triceps", "Shoulders"]),
    entry!("Chest", "Incline Bench Press", "Upper Chest", ["Shoulders", "Triceps"]),
    entry!("Chest", "Decline Bench Press", "Lower Chest", ["Triceps"]),
    entry!("Chest", "Dumbbell Flyes", "Chest", ["Shoulders"]),
    entry!("Chest", "Cable Crossovers", "Chest", ["Shoulders"]),
    entry!("Chest", "Push-ups", "Chest", ["Triceps", "Shoulders", "Core"]),
    entry!("Back", "Pull-ups", "Lats", ["Biceps", "Middle Back"]),
    entry!("Back", "Lat Pulldowns", "Lats", ["Biceps", "Middle Back"]),
    entry!("Back", "Barbell Rows", "Middle Back", ["Lats", "Biceps"]),
    entry!("Back", "T-Bar Rows", "Middle Back", ["Lats", "Biceps"]),
    entry!("Back", "Seated Cable Rows", "Middle Back", ["Lats", "Biceps"]),
    entry!("Back", "Deadlifts", "Lower Back", ["Glutes", "Hamstrings", "Traps"]),
    entry!("Legs", "Squats", "Quadriceps", ["Glutes", "Hamstrings", "Calves"]),
    entry!("Legs", "Leg Press", "Quadriceps", ["Glutes", "Hamstrings"]),
    entry!("Legs", "Lunges", "Quadriceps", ["Glutes", "Hamstrings"]),
    entry!("Legs", "Leg Extensions", "Quadriceps", []),
    entry!("Legs", "Romanian Deadlifts", "Hamstrings", ["Glutes", "Lower Back"]),
    entry!("Legs", "Leg Curls", "Hamstrings", []),
    entry!("Legs", "Calf Raises", "Calves", []),
    entry!("Shoulders", "Overhead Press", "Shoulders", ["Triceps"]),
    entry!("Shoulders", "Lateral Raises", "Side Deltoids", []),
    entry!("Shoulders", "Front Raises", "Front Deltoids", []),
    entry!("Shoulders", "Reverse Flyes", "Rear Deltoids", ["Traps"]),
    entry!("Shoulders", "Shrugs", "Traps", []),
    entry!("Shoulders", "Face Pulls", "Rear Deltoids", ["Traps", "Rotator Cuff"]),
    entry!("Biceps", "Bicep Curls", "Biceps", ["Forearms"]),
    entry!("Biceps", "Hammer Curls", "Biceps", ["Forearms"]),
    entry!("Biceps", "Preacher Curls", "Biceps", []),
    entry!("Biceps", "Concentration Curls", "Biceps", []),
    entry!("Biceps", "Spider Curls", "Biceps", []),
    entry!("Triceps", "Tricep Pushdowns", "Triceps", []),
    entry!("Triceps", "Skull Crushers", "Triceps", []),
    entry!("Triceps", "Overhead Tricep Extensions", "Triceps", []),
    entry!("Triceps", "Dips", "Triceps", ["Chest", "Shoulders"]),
    entry!("Triceps", "Close-Grip Bench Press", "Triceps", ["Chest", "Shoulders"]),
    entry!("Abs", "Crunches", "Abs", []),
    entry!("Abs", "Leg Raises", "Lower Abs", ["Hip Flexors"]),
    entry!("Abs", "Planks", "Core", ["Shoulders"]),
    entry!("Abs", "Russian Twists", "Obliques", ["Abs"]),
    entry!("Abs", "Hanging Leg Raises", "Lower Abs", ["Hip Flexors"]),
    entry!("Abs", "Ab Wheel Rollouts", "Abs", ["Shoulders", "Lower Back"]),
    entry!("Calves", "Standing Calf Raises", "Calves", []),
    entry!("Calves", "Seated Calf Raises", "Calves", []),
    entry!("Calves", "Calf Press on Leg Press", "Calves", []),
    entry!("Forearms", "Wrist Curls", "Forearms", []),
    entry!("Forearms", "Reverse Wrist Curls", "Forearms", []),
    entry!("Forearms", "Farmers Walk", "Forearms", ["Traps", "Core"]),
    entry!("Glutes", "Hip Thrusts", "Glutes", ["Hamstrings"]),
    entry!("Glutes", "Glute Bridges", "Glutes", ["Hamstrings"]),
    entry!("Glutes", "Bulgarian Split Squats", "Glutes", ["Quadriceps", "Hamstrings"]),
    entry!("Traps", "Barbell Shrugs", "Traps", []),
    entry!("Traps", "Upright Rows", "Traps", ["Shoulders"]),
    entry!("Traps", "Rack Pulls", "Traps", ["Lower Back"]),
    entry!("Full Body", "Burpees", "Full Body", ["Chest", "Shoulders", "Quads", "Core"]),
    entry!("Full Body", "Thrusters", "Full Body", ["Shoulders", "Quads", "Core"]),
    entry!("Full Body", "Clean and Press", "Full Body", ["Shoulders", "Back", "Legs"]),
];

/// Catalog exercises for the selected body parts, deduplicated by name.
///
/// Body part names match case-insensitively.
pub fn exercises_for_body_parts(body_parts: &[&str]) -> Vec<&'static CatalogEntry> {
    let mut seen = std::collections::HashSet::new();
    body_parts
        .iter()
        .flat_map(|part| CATALOG.iter().filter(move |e| e.body_part.eq_ignore_ascii_case(part)))
        .filter(|e| seen.insert(e.name))
        .collect()
}

/// Filter exercises by an optional free-text query and body part.
///
/// Both filters are case-insensitive; `None` disables a filter.
pub fn search<'a>(
    exercises: &'a [Exercise],
    query: Option<&str>,
    body_part: Option<&str>,
) -> Vec<&'a Exercise> {
    exercises
        .iter()
        .filter(|e| body_part.map_or(true, |p| e.body_part.eq_ignore_ascii_case(p)))
        .filter(|e| query.map_or(true, |q| e.matches(q)))
        .collect()
}

//! Adapter between stored or exported rows and aggregation records.
//!
//! The hosted backend hands back `workout_exercises` rows whose numeric
//! fields may be numbers, numeric strings, empty strings or null, and whose
//! `body_parts` relation may be a single object or a list. Everything is
//! normalized here so the aggregator only ever sees clean [`SetRecord`]s.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate};
use liftlog_core::{ExerciseId, SetRecord, Workout, WorkoutExercise, WorkoutId, WorkoutSet};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

/// Rows claiming more sets than this are rejected on import.
pub const MAX_SETS_PER_ROW: u32 = 100;

/// A numeric field that tolerates strings, blanks and nulls.
///
/// Anything that is not a finite, non-negative number reads as `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LooseNumber(f64);

impl LooseNumber {
    /// The parsed value.
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// The value as a whole count, truncated.
    pub fn as_count(self) -> u32 {
        // Saturating float-to-int cast
        self.0 as u32
    }

    fn sanitize(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self(0.0)
        }
    }
}

impl<'de> Deserialize<'de> for LooseNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let parsed = match value {
            serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
            serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        };
        Ok(Self::sanitize(parsed))
    }
}

/// A relation that may arrive as one object or a list of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A list of objects
    Many(Vec<T>),
    /// A single object
    One(T),
}

impl<T> OneOrMany<T> {
    /// Flatten into a vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// External identifier, numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    /// Integer key
    Number(i64),
    /// Text key (uuid etc.)
    Text(String),
}

/// `body_parts(name)` relation row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawBodyPart {
    /// Body part name
    #[serde(default)]
    pub name: Option<String>,
}

/// `workouts(date)` relation row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWorkoutRef {
    /// Workout date, `YYYY-MM-DD` or RFC 3339
    #[serde(default)]
    pub date: Option<String>,
}

/// `exercises(name, body_parts(name))` relation row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawExerciseRef {
    /// Exercise name
    #[serde(default)]
    pub name: Option<String>,

    /// Body part classification
    #[serde(default)]
    pub body_parts: Option<OneOrMany<RawBodyPart>>,
}

/// One exported `workout_exercises` row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSetRow {
    /// Parent workout key
    pub workout_id: ExternalId,

    /// Exercise key
    #[serde(default)]
    pub exercise_id: Option<ExternalId>,

    /// Load
    #[serde(default)]
    pub weight: LooseNumber,

    /// Number of sets
    #[serde(default)]
    pub sets: LooseNumber,

    /// Reps per set
    #[serde(default)]
    pub reps: LooseNumber,

    /// Parent workout
    #[serde(default)]
    pub workouts: Option<RawWorkoutRef>,

    /// Exercise and its body parts
    #[serde(default)]
    pub exercises: Option<RawExerciseRef>,
}

impl RawSetRow {
    /// Calendar day of the parent workout, if it can be resolved.
    pub fn performed_on(&self) -> Option<NaiveDate> {
        let raw = self.workouts.as_ref()?.date.as_deref()?.trim();
        parse_date(raw)
    }

    /// Normalized body-part names.
    pub fn body_parts(&self) -> BTreeSet<String> {
        self.exercises
            .as_ref()
            .and_then(|e| e.body_parts.clone())
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|bp| bp.name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Exercise name, if the relation carried one.
    pub fn exercise_name(&self) -> Option<&str> {
        self.exercises.as_ref()?.name.as_deref()
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Assigns local ids to external keys, stable within one conversion.
#[derive(Default)]
struct IdMap {
    workouts: HashMap<ExternalId, WorkoutId>,
    exercises: HashMap<Option<ExternalId>, ExerciseId>,
}

impl IdMap {
    fn workout(&mut self, key: &ExternalId) -> WorkoutId {
        *self.workouts.entry(key.clone()).or_default()
    }

    fn exercise(&mut self, key: &Option<ExternalId>) -> ExerciseId {
        *self.exercises.entry(key.clone()).or_default()
    }
}

/// Convert exported rows straight into set records.
///
/// Rows without a resolvable date or with more than [`MAX_SETS_PER_ROW`]
/// sets are dropped; everything else is kept, including rows whose body
/// part is unknown.
pub fn rows_to_set_records(rows: &[RawSetRow]) -> Vec<SetRecord> {
    let mut ids = IdMap::default();
    let mut skipped = 0usize;

    let records: Vec<SetRecord> = rows
        .iter()
        .filter_map(|row| {
            let Some(performed_on) = row.performed_on() else {
                skipped += 1;
                return None;
            };
            if row.sets.as_count() > MAX_SETS_PER_ROW {
                warn!(
                    workout = ?row.workout_id,
                    sets = row.sets.as_count(),
                    "Dropping row with too many sets"
                );
                return None;
            }
            Some(SetRecord {
                workout_id: ids.workout(&row.workout_id),
                exercise_id: ids.exercise(&row.exercise_id),
                body_parts: row.body_parts(),
                weight: row.weight.as_f64(),
                sets_count: row.sets.as_count(),
                reps_count: row.reps.as_count(),
                performed_on,
            })
        })
        .collect();

    if skipped > 0 {
        warn!("Dropped {} rows without a workout date", skipped);
    }
    records
}

/// Group exported rows into workouts, one exercise per row.
///
/// Rows without a date or with more than [`MAX_SETS_PER_ROW`] sets are
/// skipped. Workouts keep the order in which their first row appears.
pub fn rows_to_workouts(rows: &[RawSetRow]) -> Vec<Workout> {
    let mut ids = IdMap::default();
    let mut workouts: Vec<Workout> = Vec::new();
    let mut index: HashMap<WorkoutId, usize> = HashMap::new();

    for row in rows {
        let Some(date) = row.performed_on() else {
            warn!(workout = ?row.workout_id, "Skipping row without a workout date");
            continue;
        };
        let sets = row.sets.as_count();
        if sets > MAX_SETS_PER_ROW {
            warn!(workout = ?row.workout_id, sets, "Skipping row with too many sets");
            continue;
        }

        let workout_id = ids.workout(&row.workout_id);
        let slot = *index.entry(workout_id).or_insert_with(|| {
            let mut workout = Workout::new(date);
            workout.id = workout_id;
            workouts.push(workout);
            workouts.len() - 1
        });

        let set = WorkoutSet::new(row.weight.as_f64(), row.reps.as_count());
        workouts[slot].exercises.push(WorkoutExercise {
            exercise_id: ids.exercise(&row.exercise_id),
            name: row.exercise_name().unwrap_or("Unknown exercise").to_string(),
            body_parts: row.body_parts().into_iter().collect(),
            sets: vec![set; sets as usize],
        });
    }

    debug!("Grouped {} rows into {} workouts", rows.len(), workouts.len());
    workouts
}

/// Flatten workouts into set records.
///
/// Sets of the same exercise sharing a weight and rep count collapse into
/// one record whose `sets_count` is the number of such sets.
pub fn flatten_workouts(workouts: &[Workout]) -> Vec<SetRecord> {
    let mut records = Vec::new();

    for workout in workouts {
        for exercise in &workout.exercises {
            let body_parts: BTreeSet<String> = exercise
                .body_parts
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();

            // (weight, reps, count) in first-appearance order
            let mut groups: Vec<(f64, u32, u32)> = Vec::new();
            for set in &exercise.sets {
                let weight = LooseNumber::sanitize(set.weight).as_f64();
                match groups.iter_mut().find(|(w, r, _)| *w == weight && *r == set.reps) {
                    Some(group) => group.2 += 1,
                    None => groups.push((weight, set.reps, 1)),
                }
            }

            records.extend(groups.into_iter().map(|(weight, reps, count)| SetRecord {
                workout_id: workout.id,
                exercise_id: exercise.exercise_id,
                body_parts: body_parts.clone(),
                weight,
                sets_count: count,
                reps_count: reps,
                performed_on: workout.date,
            }));
        }
    }

    debug!("Flattened {} workouts into {} set records", workouts.len(), records.len());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(value: serde_json::Value) -> RawSetRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_loose_number_parsing() {
        let parse = |v: serde_json::Value| serde_json::from_value::<LooseNumber>(v).unwrap().as_f64();
        assert_eq!(parse(json!(42.5)), 42.5);
        assert_eq!(parse(json!("42.5")), 42.5);
        assert_eq!(parse(json!(" 10 ")), 10.0);
        assert_eq!(parse(json!("")), 0.0);
        assert_eq!(parse(json!(null)), 0.0);
        assert_eq!(parse(json!("abc")), 0.0);
        assert_eq!(parse(json!(-5)), 0.0);
        assert_eq!(parse(json!(true)), 0.0);
    }

    #[test]
    fn test_one_or_many_body_parts() {
        let single = row(json!({
            "workout_id": 1,
            "exercises": { "name": "Bench Press", "body_parts": { "name": "Chest" } }
        }));
        assert_eq!(single.body_parts(), BTreeSet::from(["Chest".to_string()]));

        let many = row(json!({
            "workout_id": 1,
            "exercises": { "name": "Dips", "body_parts": [{ "name": "Triceps" }, { "name": "Chest" }, { "name": " " }] }
        }));
        assert_eq!(
            many.body_parts(),
            BTreeSet::from(["Chest".to_string(), "Triceps".to_string()])
        );

        let none = row(json!({ "workout_id": 1 }));
        assert!(none.body_parts().is_empty());
    }

    #[test]
    fn test_missing_numeric_fields_default_to_zero() {
        let r = row(json!({ "workout_id": "w1", "workouts": { "date": "2024-05-01" } }));
        assert_eq!(r.weight.as_f64(), 0.0);
        assert_eq!(r.sets.as_count(), 0);
        assert_eq!(r.reps.as_count(), 0);
        assert_eq!(r.performed_on(), Some(date(2024, 5, 1)));
    }

    #[test]
    fn test_date_formats() {
        let iso = row(json!({ "workout_id": 1, "workouts": { "date": "2024-05-01T09:30:00Z" } }));
        assert_eq!(iso.performed_on(), Some(date(2024, 5, 1)));

        let bad = row(json!({ "workout_id": 1, "workouts": { "date": "yesterday" } }));
        assert_eq!(bad.performed_on(), None);
    }

    #[test]
    fn test_rows_to_set_records() {
        let rows = vec![
            row(json!({
                "workout_id": 7, "exercise_id": 1, "weight": "50", "sets": 3, "reps": "10",
                "workouts": { "date": "2024-05-01" },
                "exercises": { "name": "Squats", "body_parts": [{ "name": "Legs" }] }
            })),
            row(json!({ "workout_id": 8, "weight": 100 })),
        ];

        let records = rows_to_set_records(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].volume(), 1500.0);
        assert_eq!(records[0].performed_on, date(2024, 5, 1));
    }

    #[test]
    fn test_rows_to_workouts_groups_by_workout() {
        let rows = vec![
            row(json!({
                "workout_id": "a", "exercise_id": 1, "weight": 135, "sets": 2, "reps": 8,
                "workouts": { "date": "2024-05-01" },
                "exercises": { "name": "Bench Press", "body_parts": { "name": "Chest" } }
            })),
            row(json!({
                "workout_id": "b", "exercise_id": 2, "weight": 225, "sets": 1, "reps": 5,
                "workouts": { "date": "2024-05-02" },
                "exercises": { "name": "Squats", "body_parts": { "name": "Legs" } }
            })),
            row(json!({
                "workout_id": "a", "exercise_id": 3, "weight": 50, "sets": 3, "reps": 12,
                "workouts": { "date": "2024-05-01" },
                "exercises": { "name": "Dumbbell Flyes", "body_parts": { "name": "Chest" } }
            })),
        ];

        let workouts = rows_to_workouts(&rows);
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].date, date(2024, 5, 1));
        assert_eq!(workouts[0].exercises.len(), 2);
        assert_eq!(workouts[0].exercises[0].sets, vec![WorkoutSet::new(135.0, 8); 2]);
        assert_eq!(workouts[1].exercises[0].name, "Squats");

        // Flattening an imported workout gives back one record per row
        let records = flatten_workouts(&workouts);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].sets_count, 2);
        assert_eq!(records[0].reps_count, 8);
    }

    #[test]
    fn test_rows_with_absurd_set_counts_are_rejected() {
        let rows = vec![
            row(json!({
                "workout_id": 1, "weight": 100, "sets": 4000000000u64, "reps": 5,
                "workouts": { "date": "2024-05-01" },
                "exercises": { "name": "Squats", "body_parts": { "name": "Legs" } }
            })),
            row(json!({
                "workout_id": 1, "weight": 100, "sets": MAX_SETS_PER_ROW, "reps": 5,
                "workouts": { "date": "2024-05-01" },
                "exercises": { "name": "Squats", "body_parts": { "name": "Legs" } }
            })),
        ];

        let workouts = rows_to_workouts(&rows);
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].exercises.len(), 1);
        assert_eq!(workouts[0].exercises[0].sets.len(), MAX_SETS_PER_ROW as usize);

        let records = rows_to_set_records(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sets_count, MAX_SETS_PER_ROW);
    }

    #[test]
    fn test_flatten_groups_identical_sets() {
        let mut workout = Workout::new(date(2024, 5, 1));
        workout.exercises.push(WorkoutExercise {
            exercise_id: ExerciseId::new(),
            name: "Deadlifts".to_string(),
            body_parts: vec!["Back".to_string(), "".to_string()],
            sets: vec![
                WorkoutSet::new(100.0, 5),
                WorkoutSet::new(120.0, 3),
                WorkoutSet::new(100.0, 5),
                WorkoutSet::new(100.0, 5),
            ],
        });

        let records = flatten_workouts(&[workout.clone()]);
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].weight, records[0].reps_count, records[0].sets_count), (100.0, 5, 3));
        assert_eq!((records[1].weight, records[1].reps_count, records[1].sets_count), (120.0, 3, 1));
        assert_eq!(records[0].body_parts, BTreeSet::from(["Back".to_string()]));
        assert!(records.iter().all(|r| r.workout_id == workout.id && r.performed_on == workout.date));
    }

    #[test]
    fn test_flatten_sanitizes_bad_weights() {
        let mut workout = Workout::new(date(2024, 5, 1));
        workout.exercises.push(WorkoutExercise {
            exercise_id: ExerciseId::new(),
            name: "Planks".to_string(),
            body_parts: vec!["Abs".to_string()],
            sets: vec![WorkoutSet::new(f64::NAN, 1), WorkoutSet::new(-10.0, 1)],
        });

        let records = flatten_workouts(&[workout]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].weight, 0.0);
        assert_eq!(records[0].sets_count, 2);
    }
}

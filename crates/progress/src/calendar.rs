//! Month calendar of logged workouts.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use liftlog_core::{Workout, WorkoutId};
use serde::Serialize;

/// One day in a month calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    /// The day
    pub date: NaiveDate,
    /// Workouts logged on this day
    pub workouts: Vec<WorkoutId>,
    /// Body parts trained across those workouts
    pub body_parts: BTreeSet<String>,
}

impl CalendarDay {
    /// Whether anything was logged on this day.
    pub fn has_workout(&self) -> bool {
        !self.workouts.is_empty()
    }
}

/// All days of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCalendar {
    /// Year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
    /// Every day of the month in order
    pub days: Vec<CalendarDay>,
}

impl MonthCalendar {
    /// Number of days with at least one workout.
    pub fn active_days(&self) -> usize {
        self.days.iter().filter(|d| d.has_workout()).count()
    }
}

/// First and last day of a month, or `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

/// Lay out `workouts` over the days of `year`-`month`.
///
/// Workouts outside the month are ignored.
pub fn month_calendar(workouts: &[Workout], year: i32, month: u32) -> Option<MonthCalendar> {
    let (first, last) = month_bounds(year, month)?;

    let mut days: Vec<CalendarDay> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| CalendarDay {
            date,
            workouts: Vec::new(),
            body_parts: BTreeSet::new(),
        })
        .collect();

    for workout in workouts {
        if workout.date < first || workout.date > last {
            continue;
        }
        let day = &mut days[workout.date.day0() as usize];
        day.workouts.push(workout.id);
        day.body_parts.extend(workout.body_parts());
    }

    Some(MonthCalendar { year, month, days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftlog_core::{ExerciseId, WorkoutExercise, WorkoutSet};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn workout(day: NaiveDate, part: &str) -> Workout {
        let mut workout = Workout::new(day);
        workout.exercises.push(WorkoutExercise {
            exercise_id: ExerciseId::new(),
            name: "Anything".to_string(),
            body_parts: vec![part.to_string()],
            sets: vec![WorkoutSet::new(20.0, 10)],
        });
        workout
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(2024, 2), Some((date(2024, 2, 1), date(2024, 2, 29))));
        assert_eq!(month_bounds(2023, 12), Some((date(2023, 12, 1), date(2023, 12, 31))));
        assert_eq!(month_bounds(2024, 13), None);
        assert_eq!(month_bounds(2024, 0), None);
    }

    #[test]
    fn test_month_calendar_has_every_day() {
        let calendar = month_calendar(&[], 2024, 4).unwrap();
        assert_eq!(calendar.days.len(), 30);
        assert_eq!(calendar.days[0].date, date(2024, 4, 1));
        assert_eq!(calendar.days[29].date, date(2024, 4, 30));
        assert_eq!(calendar.active_days(), 0);
    }

    #[test]
    fn test_month_calendar_places_workouts() {
        let workouts = vec![
            workout(date(2024, 5, 3), "Chest"),
            workout(date(2024, 5, 3), "Triceps"),
            workout(date(2024, 5, 20), "Legs"),
            workout(date(2024, 6, 1), "Back"),
        ];
        let calendar = month_calendar(&workouts, 2024, 5).unwrap();

        let third = &calendar.days[2];
        assert_eq!(third.date, date(2024, 5, 3));
        assert_eq!(third.workouts.len(), 2);
        assert_eq!(
            third.body_parts,
            BTreeSet::from(["Chest".to_string(), "Triceps".to_string()])
        );
        assert_eq!(calendar.active_days(), 2);
        assert!(!calendar.days.iter().any(|d| d.body_parts.contains("Back")));
    }

    #[test]
    fn test_invalid_month() {
        assert!(month_calendar(&[], 2024, 13).is_none());
    }
}

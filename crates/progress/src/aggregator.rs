//! Weekly per-body-part progress series and workout streaks.
//!
//! Every function here is pure and total: empty inputs give empty or zero
//! results, and malformed weights count as `0`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use liftlog_core::{Metric, ProgressPoint, SetRecord, WeekWindow};

/// The `week_count` calendar weeks ending with the week that contains `now`,
/// oldest first and labeled `Week 1..=week_count`.
///
/// Weeks that would start before [`NaiveDate::MIN`] are left out, and the
/// last window's end is capped at [`NaiveDate::MAX`].
pub fn compute_weekly_windows(
    now: NaiveDate,
    week_count: usize,
    week_start: Weekday,
) -> Vec<WeekWindow> {
    let offset = (7 + now.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    let Some(current_start) = now.checked_sub_days(Days::new(u64::from(offset))) else {
        return Vec::new();
    };

    let available = (current_start - NaiveDate::MIN).num_weeks();
    let count = week_count.min(usize::try_from(available).unwrap_or(usize::MAX).saturating_add(1));

    (0..count)
        .filter_map(|i| {
            let weeks_back = (count - 1 - i) as u64;
            let start = current_start.checked_sub_days(Days::new(weeks_back * 7))?;
            Some(WeekWindow {
                label: format!("Week {}", i + 1),
                start,
                end: start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX),
            })
        })
        .collect()
}

/// Reduce `records` into one [`ProgressPoint`] per window.
///
/// Every point carries the same key set: all body parts seen anywhere in
/// `records`. A record with several body parts counts in full for each.
pub fn aggregate_by_week_and_body_part(
    records: &[SetRecord],
    windows: &[WeekWindow],
    metric: Metric,
) -> Vec<ProgressPoint> {
    let body_parts: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.body_parts.iter().map(String::as_str))
        .collect();

    windows
        .iter()
        .map(|window| {
            let in_window: Vec<&SetRecord> =
                records.iter().filter(|r| window.contains(r.performed_on)).collect();

            let per_body_part: BTreeMap<String, f64> = body_parts
                .iter()
                .map(|part| {
                    let matching = in_window.iter().filter(|r| r.body_parts.contains(*part));
                    let value = match metric {
                        Metric::MaxWeight => {
                            matching.map(|r| r.effective_weight()).fold(0.0, f64::max)
                        }
                        Metric::TotalVolume => matching.map(|r| r.volume()).sum::<f64>(),
                    };
                    (part.to_string(), value)
                })
                .collect();

            ProgressPoint {
                week: window.label.clone(),
                per_body_part,
            }
        })
        .collect()
}

/// Consecutive workout days counted back from the most recent one.
///
/// Duplicate days count once; an empty input has no streak.
pub fn compute_streak<I>(workout_dates: I) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = workout_dates.into_iter().collect();
    let mut descending = days.iter().rev();

    let Some(mut current) = descending.next().copied() else {
        return 0;
    };

    let mut streak = 1;
    for &day in descending {
        if current.pred_opt() != Some(day) {
            break;
        }
        streak += 1;
        current = day;
    }
    streak
}

//! liftlog CLI - log workouts and track progress.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveTime, Weekday};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use liftlog_core::{
    exercises_for_body_parts, search, Exercise, Metric, ProgressPoint, Workout, WorkoutExercise,
    WorkoutFilter, WorkoutId, WorkoutSet,
};
use liftlog_progress::{
    aggregate_by_week_and_body_part, compute_streak, compute_weekly_windows, BasicProgressTracker,
    MonthCalendar, ProgressConfig, ProgressTracker,
};
use liftlog_storage::{
    rows_to_set_records, rows_to_workouts, seed_library, JsonStorage, RawSetRow, Storage,
};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Workout log and progress tracker", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, global = true, default_value = ".liftlog")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout
    Log {
        /// Workout day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Body part trained; repeat for each. Exercises must belong to one of them
        #[arg(long = "body-part")]
        body_parts: Vec<String>,
        /// Exercise and its sets as <name>=<weight>x<reps>,...; repeat for each exercise
        #[arg(long = "entry", required = true)]
        entries: Vec<LogEntry>,
        /// Session name, defaults to "<body parts> Workout"
        #[arg(long)]
        name: Option<String>,
        /// Start time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        /// Duration in minutes
        #[arg(long)]
        duration: Option<u32>,
    },
    /// List workouts, most recent first
    List {
        /// Earliest day
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest day
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Maximum number shown
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show workout details
    Show {
        /// Workout ID
        id: String,
    },
    /// Delete a workout
    Delete {
        /// Workout ID
        id: String,
    },
    /// Browse the exercise library
    Exercises {
        /// Match name or muscle
        #[arg(long)]
        search: Option<String>,
        /// Restrict to one body part
        #[arg(long)]
        body_part: Option<String>,
    },
    /// Add a custom exercise to the library
    AddExercise {
        /// Exercise name
        #[arg(long)]
        name: String,
        /// Body part
        #[arg(long)]
        body_part: String,
        /// Primary muscle
        #[arg(long)]
        primary: String,
        /// Secondary muscles
        #[arg(long)]
        secondary: Vec<String>,
    },
    /// Import an exported JSON array of workout_exercises rows
    Import {
        /// Export file
        file: PathBuf,
    },
    /// Weekly progress per body part
    Progress {
        /// Trailing weeks
        #[arg(long, default_value = "4", value_parser = clap::value_parser!(u16).range(1..=520))]
        weeks: u16,
        /// Series to show
        #[arg(long, value_enum, default_value = "max-weight")]
        metric: MetricArg,
        /// First day of the week
        #[arg(long, value_enum, default_value = "sun")]
        week_start: WeekStartArg,
        /// Reference day, defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Aggregate an export file instead of stored workouts
        #[arg(long)]
        from_export: Option<PathBuf>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Streak and workout counts
    Stats {
        /// Reference day, defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Month calendar of workouts
    Calendar {
        /// Month as YYYY-MM, defaults to the current month
        #[arg(long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },
}

/// One `--entry` of the log command.
#[derive(Debug, Clone, PartialEq)]
struct LogEntry {
    exercise: String,
    sets: Vec<WorkoutSet>,
}

impl FromStr for LogEntry {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (exercise, sets) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected <exercise>=<weight>x<reps>,..., got '{}'", s))?;
        let exercise = exercise.trim();
        if exercise.is_empty() {
            return Err(format!("missing exercise name in '{}'", s));
        }
        let sets = sets
            .split(',')
            .map(|set| set.parse::<WorkoutSet>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            exercise: exercise.to_string(),
            sets,
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    MaxWeight,
    TotalVolume,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::MaxWeight => Metric::MaxWeight,
            MetricArg::TotalVolume => Metric::TotalVolume,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum WeekStartArg {
    Sun,
    Mon,
}

impl From<WeekStartArg> for Weekday {
    fn from(arg: WeekStartArg) -> Self {
        match arg {
            WeekStartArg::Sun => Weekday::Sun,
            WeekStartArg::Mon => Weekday::Mon,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Open storage
    let mut storage = JsonStorage::new(&cli.data_dir)
        .await
        .with_context(|| format!("opening {}", cli.data_dir.display()))?;

    match cli.command {
        Commands::Log { date, body_parts, entries, name, time, duration } => {
            seed_library(&mut storage).await?;

            let mut workout = Workout::new(date.unwrap_or_else(today));
            let mut trained = body_parts.clone();
            for entry in entries {
                let found = resolve_exercise(&storage, &entry.exercise, &body_parts).await?;
                if !trained.iter().any(|p| p.eq_ignore_ascii_case(&found.body_part)) {
                    trained.push(found.body_part.clone());
                }
                workout.exercises.push(WorkoutExercise {
                    exercise_id: found.id,
                    name: found.name,
                    body_parts: vec![found.body_part],
                    sets: entry.sets,
                });
            }

            let name = name.unwrap_or_else(|| Workout::default_name(&trained, workout.date));
            workout.name = Some(name.clone());
            workout.start_time = time;
            workout.duration_minutes = duration;

            storage.save_workout(&workout).await?;
            println!(
                "Logged workout: {} - {} on {} ({} exercise(s), {} set(s))",
                workout.id,
                name,
                workout.date,
                workout.exercises.len(),
                workout.total_sets(),
            );
        }
        Commands::List { from, to, limit } => {
            let workouts = storage.list_workouts(&WorkoutFilter { from, to, limit }).await?;

            println!("Workouts ({})", workouts.len());
            for workout in workouts {
                println!(
                    "  {} | {} | {} | {} | {} set(s)",
                    workout.id,
                    workout.date,
                    workout.name.as_deref().unwrap_or("-"),
                    join(workout.body_parts()),
                    workout.total_sets(),
                );
            }
        }
        Commands::Show { id } => {
            let workout = storage.require_workout(parse_workout_id(&id)?).await?;

            println!("Workout: {}", workout.id);
            println!("  Name: {}", workout.name.as_deref().unwrap_or("-"));
            println!("  Date: {}", workout.date);
            if let Some(time) = workout.start_time {
                println!("  Start: {}", time.format("%H:%M"));
            }
            if let Some(minutes) = workout.duration_minutes {
                println!("  Duration: {} min", minutes);
            }
            println!("  Body parts: {}", join(workout.body_parts()));
            for exercise in &workout.exercises {
                println!("  {}", exercise.name);
                for (i, set) in exercise.sets.iter().enumerate() {
                    println!("    Set {}: {} x {}", i + 1, set.weight, set.reps);
                }
            }
        }
        Commands::Delete { id } => {
            let workout = storage.require_workout(parse_workout_id(&id)?).await?;
            storage.delete_workout(workout.id).await?;
            println!("Deleted workout: {} ({})", workout.id, workout.date);
        }
        Commands::Exercises { search: query, body_part } => {
            seed_library(&mut storage).await?;
            let exercises = storage.list_exercises().await?;
            let matches = search(&exercises, query.as_deref(), body_part.as_deref());

            println!("Exercises ({})", matches.len());
            for exercise in matches {
                print_exercise(exercise);
            }
        }
        Commands::AddExercise { name, body_part, primary, secondary } => {
            if storage.find_exercise_by_name(&name).await?.is_some() {
                bail!("Exercise '{}' already exists", name);
            }
            let exercise = Exercise::custom(name, body_part, primary, secondary);
            storage.save_exercise(&exercise).await?;
            println!("Added exercise: {} - {}", exercise.id, exercise.name);
        }
        Commands::Import { file } => {
            let rows = read_export(&file).await?;
            let workouts = rows_to_workouts(&rows);
            for workout in &workouts {
                storage.save_workout(workout).await?;
            }
            info!("Imported {} rows", rows.len());
            println!("Imported {} workouts", workouts.len());
        }
        Commands::Progress { weeks, metric, week_start, today: day, from_export, json } => {
            let metric = Metric::from(metric);
            let day = day.unwrap_or_else(today);

            let series = match from_export {
                Some(file) => {
                    let records = rows_to_set_records(&read_export(&file).await?);
                    let windows =
                        compute_weekly_windows(day, usize::from(weeks), week_start.into());
                    aggregate_by_week_and_body_part(&records, &windows, metric)
                }
                None => {
                    let tracker = BasicProgressTracker::new(storage).with_config(ProgressConfig {
                        week_count: usize::from(weeks),
                        week_start: week_start.into(),
                        ..Default::default()
                    });
                    let report = tracker.report(day).await?;
                    report.series(metric).to_vec()
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else {
                print_series(metric, &series);
            }
        }
        Commands::Stats { today: day, json } => {
            let tracker = BasicProgressTracker::new(storage);
            let report = tracker.report(day.unwrap_or_else(today)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("liftlog stats ({})", report.today);
                println!("  Streak: {} day(s)", report.streak);
                println!(
                    "  Last {} days: {} workout(s)",
                    tracker.config().recent_days,
                    report.recent_workouts
                );
                println!("  Total: {} workout(s)", report.total_workouts);
                println!("  Body parts: {}", join(report.body_parts.iter()));
            }
        }
        Commands::Calendar { month } => {
            let (year, month) = month.unwrap_or_else(|| {
                let now = today();
                (now.year(), now.month())
            });
            let tracker = BasicProgressTracker::new(storage);
            let Some(calendar) = tracker.calendar(year, month).await? else {
                bail!("Invalid month {}-{:02}", year, month);
            };
            print_calendar(&calendar);
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_workout_id(id: &str) -> Result<WorkoutId> {
    id.parse().map_err(|_| anyhow::anyhow!("Invalid workout ID"))
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {}", e))
}

fn parse_month(s: &str) -> std::result::Result<(i32, u32), String> {
    let (year, month) = s.split_once('-').ok_or("expected YYYY-MM")?;
    let year = year.parse().map_err(|_| format!("invalid year '{}'", year))?;
    let month: u32 = month.parse().map_err(|_| format!("invalid month '{}'", month))?;
    if !(1..=12).contains(&month) {
        return Err(format!("month must be 1-12, got {}", month));
    }
    Ok((year, month))
}

async fn read_export(file: &Path) -> Result<Vec<RawSetRow>> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", file.display()))
}

/// Look up a library exercise for the log command.
///
/// When body parts were selected the exercise must train one of them.
async fn resolve_exercise(
    storage: &JsonStorage,
    name: &str,
    body_parts: &[String],
) -> Result<Exercise> {
    let Some(found) = storage.find_exercise_by_name(name).await? else {
        bail!("Unknown exercise '{}'{}", name, suggestions(body_parts));
    };
    let selected = body_parts.iter().any(|p| p.eq_ignore_ascii_case(&found.body_part));
    if !body_parts.is_empty() && !selected {
        bail!(
            "'{}' trains {}, not {}{}",
            found.name,
            found.body_part,
            body_parts.join(" & "),
            suggestions(body_parts)
        );
    }
    Ok(found)
}

fn suggestions(body_parts: &[String]) -> String {
    let parts: Vec<&str> = body_parts.iter().map(String::as_str).collect();
    let names: Vec<&str> = exercises_for_body_parts(&parts).iter().map(|e| e.name).collect();
    if names.is_empty() {
        "; add it with `liftlog add-exercise`".to_string()
    } else {
        format!("; try one of: {}", names.join(", "))
    }
}

fn join<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let joined: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined.join(", ")
    }
}

fn print_exercise(exercise: &Exercise) {
    let secondary = if exercise.secondary_muscles.is_empty() {
        String::new()
    } else {
        format!(" (+ {})", exercise.secondary_muscles.join(", "))
    };
    println!(
        "  {:<10} | {}{} | {}{}",
        exercise.body_part,
        exercise.name,
        if exercise.custom { " *" } else { "" },
        exercise.primary_muscle,
        secondary,
    );
}

fn print_series(metric: Metric, series: &[ProgressPoint]) {
    let parts: Vec<&String> = series
        .first()
        .map(|p| p.per_body_part.keys().collect())
        .unwrap_or_default();

    if parts.is_empty() {
        println!("No workout data available yet. Log workouts to see your progress!");
        return;
    }

    println!("Progress: {}", metric);
    print!("  {:<8}", "");
    for part in &parts {
        print!(" {:>10}", part);
    }
    println!();
    for point in series {
        print!("  {:<8}", point.week);
        for part in &parts {
            print!(" {:>10.1}", point.per_body_part.get(*part).copied().unwrap_or(0.0));
        }
        println!();
    }
}

fn print_calendar(calendar: &MonthCalendar) {
    println!(
        "{}-{:02}: {} active day(s), streak in month {}",
        calendar.year,
        calendar.month,
        calendar.active_days(),
        compute_streak(calendar.days.iter().filter(|d| d.has_workout()).map(|d| d.date)),
    );
    for day in calendar.days.iter().filter(|d| d.has_workout()) {
        println!(
            "  {} {} | {} workout(s) | {}",
            day.date,
            day.date.weekday(),
            day.workouts.len(),
            join(day.body_parts.iter()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-05"), Ok((2024, 5)));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("May").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("18:30"), Ok(NaiveTime::from_hms_opt(18, 30, 0).unwrap()));
        assert!(parse_time("6pm").is_err());
    }

    #[test]
    fn test_join() {
        assert_eq!(join(Vec::<String>::new()), "-");
        assert_eq!(join(["Chest", "Back"]), "Chest, Back");
    }

    #[test]
    fn test_parse_log_entry() {
        let entry: LogEntry = "Bench Press=135x8, 155x5".parse().unwrap();
        assert_eq!(entry.exercise, "Bench Press");
        assert_eq!(entry.sets, vec![WorkoutSet::new(135.0, 8), WorkoutSet::new(155.0, 5)]);

        assert!("Bench Press".parse::<LogEntry>().is_err());
        assert!("=135x8".parse::<LogEntry>().is_err());
        assert!("Squats=".parse::<LogEntry>().is_err());
        assert!("Squats=100x5,heavy".parse::<LogEntry>().is_err());
    }

    #[test]
    fn test_suggestions_come_from_selected_body_parts() {
        let chest = suggestions(&["chest".to_string()]);
        assert!(chest.contains("Bench Press"));
        assert!(!chest.contains("Squats"));
        assert!(suggestions(&[]).contains("add-exercise"));
    }

    #[test]
    fn test_cli_parses_log_command() {
        let cli = Cli::try_parse_from([
            "liftlog", "log", "--date", "2024-05-01",
            "--body-part", "Chest", "--body-part", "Triceps",
            "--entry", "Bench Press=135x8,155x5",
            "--entry", "Tricep Dips=0x12",
        ])
        .unwrap();
        match cli.command {
            Commands::Log { date, body_parts, entries, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 1));
                assert_eq!(body_parts, vec!["Chest", "Triceps"]);
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[1].sets, vec![WorkoutSet::new(0.0, 12)]);
            }
            _ => panic!("expected log command"),
        }
    }

    #[tokio::test]
    async fn test_resolve_exercise_checks_body_parts() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        seed_library(&mut storage).await.unwrap();

        let chest = vec!["Chest".to_string()];
        let found = resolve_exercise(&storage, "bench press", &chest).await.unwrap();
        assert_eq!(found.name, "Bench Press");

        assert!(resolve_exercise(&storage, "Squats", &chest).await.is_err());
        assert!(resolve_exercise(&storage, "Squats", &[]).await.is_ok());
        assert!(resolve_exercise(&storage, "Moon Walk", &[]).await.is_err());
    }

    #[test]
    fn test_weeks_are_bounded() {
        assert!(Cli::try_parse_from(["liftlog", "progress", "--weeks", "20000000"]).is_err());
        assert!(Cli::try_parse_from(["liftlog", "progress", "--weeks", "0"]).is_err());
        let cli = Cli::try_parse_from(["liftlog", "progress", "--weeks", "12"]).unwrap();
        match cli.command {
            Commands::Progress { weeks, .. } => assert_eq!(weeks, 12),
            _ => panic!("expected progress command"),
        }
    }
}

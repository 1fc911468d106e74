//! liftlog - Local workout log
//!
//! Sessions, exercises and sets in a local SQLite file, with
//! auto-repeat, per-exercise history and PR lookups.

use anyhow::Result;
use clap::{Parser, Subcommand};

use liftlog::Store;
use liftlog::exercises::config_for_name;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(author, version, about = "Local workout log")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, env = "LIFTLOG_DB", default_value = "liftlog.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List workouts, newest first
    Workouts,

    /// Create a new workout session
    AddWorkout {
        /// Workout name (e.g., "Leg Day")
        name: String,
    },

    /// Rename a workout
    RenameWorkout { workout_id: i64, name: String },

    /// Delete a workout and everything it owns
    DeleteWorkout { workout_id: i64 },

    /// List the exercises of a workout
    Exercises { workout_id: i64 },

    /// Add an exercise, prefilled from its last occurrence
    AddExercise { workout_id: i64, name: String },

    /// Copy the last same-named session into an empty workout
    Repeat { workout_id: i64 },

    /// Log a set for an exercise
    Log {
        workout_id: i64,
        exercise_id: i64,

        /// Rep count (seconds for timed holds)
        #[arg(short, long, default_value = "0")]
        reps: i32,

        /// Weight, unit-less
        #[arg(short, long, default_value = "0")]
        weight: f32,

        /// Left-side reps for unilateral work
        #[arg(long)]
        left: Option<i32>,

        /// Right-side reps for unilateral work
        #[arg(long)]
        right: Option<i32>,
    },

    /// List the sets of an exercise
    Sets { exercise_id: i64 },

    /// Show the all-time best set for an exercise name
    Pr { name: String },

    /// Show per-session history for an exercise name
    History { name: String },

    /// Search exercise names for the picker
    Names {
        /// Prefix to match; blank lists everything
        #[arg(default_value = "")]
        prefix: String,
    },

    /// Dump the whole log as JSON
    Export,
}

fn format_set(set: &liftlog::db::SetEntry) -> String {
    match (set.reps_left, set.reps_right) {
        (None, None) => format!("{} x {}", set.reps, set.weight),
        (left, right) => format!(
            "L{}/R{} x {}",
            left.unwrap_or(0),
            right.unwrap_or(0),
            set.weight
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = Store::open(&cli.db)?;

    match cli.command {
        Commands::Workouts => {
            let workouts = store.workouts().await?;
            println!("Workouts:");
            println!("{:-<50}", "");
            for w in &workouts {
                println!(
                    "{:4} | {:24} | {}",
                    w.id.unwrap_or(0),
                    w.name,
                    w.last_date
                );
            }
        }

        Commands::AddWorkout { name } => {
            let id = store.add_workout(&name).await?;
            println!("Added workout: {} (id: {})", name, id);
        }

        Commands::RenameWorkout { workout_id, name } => {
            store.rename_workout(workout_id, &name).await?;
            println!("Renamed workout {} to {}", workout_id, name);
        }

        Commands::DeleteWorkout { workout_id } => {
            store.delete_workout(workout_id).await?;
            println!("Deleted workout {}", workout_id);
        }

        Commands::Exercises { workout_id } => {
            match store.workout_by_id(workout_id).await? {
                Some(workout) => println!("{}:", workout.name),
                None => {
                    println!("Workout {} not found", workout_id);
                    return Ok(());
                }
            }
            let exercises = store.exercises_for_workout(workout_id).await?;
            if exercises.is_empty() {
                println!("  No exercises yet");
            }
            for e in &exercises {
                let done = if e.completed_at.is_some() { "x" } else { " " };
                println!(
                    "  [{}] {:4} | {:24} | last {}",
                    done,
                    e.id.unwrap_or(0),
                    e.name,
                    if e.last_date.is_empty() { "-" } else { e.last_date.as_str() }
                );
            }
        }

        Commands::AddExercise { workout_id, name } => {
            let id = store.add_exercise(workout_id, &name).await?;
            println!("Added exercise: {} (id: {})", name, id);
        }

        Commands::Repeat { workout_id } => {
            if store.repeat_last_if_empty(workout_id).await? {
                println!("Repeated last session into workout {}", workout_id);
            } else {
                println!("Nothing to repeat for workout {}", workout_id);
            }
        }

        Commands::Log {
            workout_id,
            exercise_id,
            reps,
            weight,
            left,
            right,
        } => {
            match (left, right) {
                (None, None) => {
                    store.add_set(exercise_id, reps, weight).await?;
                }
                (left, right) => {
                    store
                        .add_unilateral_set(
                            exercise_id,
                            left.unwrap_or(0),
                            right.unwrap_or(0),
                            weight,
                        )
                        .await?;
                }
            }
            store.mark_workout_active(workout_id).await?;
            store.mark_exercise_performed(exercise_id).await?;
            println!("Logged set for exercise {}", exercise_id);
        }

        Commands::Sets { exercise_id } => {
            let sets = store.sets_for_exercise(exercise_id).await?;
            for (index, set) in sets.iter().enumerate() {
                println!("{:3} | {}", index, format_set(set));
            }
        }

        Commands::Pr { name } => match store.pr_for_exercise_name(&name).await? {
            Some(pr) => println!("PR for {}: {}", name, format_set(&pr)),
            None => println!("No history yet for {}", name),
        },

        Commands::History { name } => {
            let history = store.exercise_history_for_name(&name).await?;
            if history.is_empty() {
                println!("No history yet for {}", name);
                return Ok(());
            }
            let config = config_for_name(&name);
            for entry in &history {
                let top = entry
                    .top_set
                    .as_ref()
                    .map(format_set)
                    .unwrap_or_else(|| "-".to_string());
                print!(
                    "{} | {:24} | top {}",
                    entry.date.as_deref().unwrap_or("????-??-??"),
                    entry.workout_name,
                    top
                );
                if config.tracks_weight {
                    print!(" | volume {}", entry.volume);
                }
                println!();
            }
        }

        Commands::Names { prefix } => {
            for name in store.search_exercise_names(&prefix).await? {
                println!("{}", name);
            }
        }

        Commands::Export => {
            let dump = store.dump().await?;
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }

    Ok(())
}

// src/cli.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track workouts, sessions and progress from the terminal", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output lists as CSV instead of tables
    #[arg(long, global = true)]
    pub export_csv: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasurementCli {
    Reps,
    Time,
    Distance,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DifficultyCli {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the exercise catalog (built-ins first, then your own)
    ListExercises {
        /// Only exercises tagged with this category
        #[arg(long, conflicts_with_all = &["muscle", "favorites"])]
        category: Option<String>,
        /// Only exercises working this muscle group
        #[arg(long, conflicts_with = "favorites")]
        muscle: Option<String>,
        /// Only your favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Search the catalog by name, alternate name or category
    SearchExercises {
        query: String,
    },
    /// Show one exercise in full
    ShowExercise {
        /// Exercise id or (alternate) name
        identifier: String,
    },
    /// Define a custom exercise
    CreateExercise {
        /// Name of the exercise (e.g., "Paused Bench Press")
        #[arg(short, long)]
        name: String,
        /// Alternate or translated name
        #[arg(long)]
        alt_name: Option<String>,
        /// Comma-separated categories (e.g., "chest,arms")
        #[arg(short, long)]
        categories: Option<String>,
        /// Comma-separated muscle groups (e.g., "pectorals,triceps")
        #[arg(short, long)]
        muscles: Option<String>,
        /// Comma-separated equipment (e.g., "barbell,bench")
        #[arg(long)]
        equipment: Option<String>,
        /// How to perform the exercise
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long, value_enum)]
        difficulty: Option<DifficultyCli>,
        /// How the exercise is quantified
        #[arg(long, value_enum, default_value = "reps")]
        measurement: MeasurementCli,
    },
    /// Edit a custom exercise you own
    EditExercise {
        /// Exercise id or name
        identifier: String,
        #[arg(long)]
        name: Option<String>,
        /// New alternate name; pass an empty string to clear it
        #[arg(long)]
        alt_name: Option<String>,
        /// Comma-separated categories
        #[arg(long)]
        categories: Option<String>,
        /// Comma-separated muscle groups
        #[arg(long)]
        muscles: Option<String>,
        /// Comma-separated equipment; pass an empty string to clear it
        #[arg(long)]
        equipment: Option<String>,
        /// New instructions; pass an empty string to clear them
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long, value_enum)]
        difficulty: Option<DifficultyCli>,
        #[arg(long, value_enum)]
        measurement: Option<MeasurementCli>,
    },
    /// Delete a custom exercise you own
    DeleteExercise {
        identifier: String,
    },
    /// Toggle an exercise as favorite
    Favorite {
        identifier: String,
    },
    /// List every category used across the catalog
    ListCategories,
    /// List every muscle group used across the catalog
    ListMuscles,
    /// Create an empty workout plan
    CreateWorkout {
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated tags (e.g., "push,heavy")
        #[arg(long)]
        tags: Option<String>,
    },
    /// List workout plans in display order
    ListWorkouts,
    /// Show a workout plan with its exercises and sets
    ShowWorkout {
        /// Workout id or name
        identifier: String,
    },
    /// Edit a workout plan's details
    EditWorkout {
        identifier: String,
        #[arg(long)]
        name: Option<String>,
        /// New notes; pass an empty string to clear them
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated tags; pass an empty string to clear them
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a workout plan and everything recorded under it
    DeleteWorkout {
        identifier: String,
    },
    /// Append an exercise with planned sets to a workout
    AddToWorkout {
        /// Workout id or name
        workout: String,
        /// Exercise id or (alternate) name
        exercise: String,
        /// Number of identical sets to plan
        #[arg(short, long, default_value_t = 1)]
        sets: u32,
        /// Planned reps per set (rep-measured exercises)
        #[arg(short, long)]
        reps: Option<i64>,
        /// Planned duration per set in seconds (time-measured exercises)
        #[arg(short, long)]
        duration: Option<i64>,
        /// Planned distance per set, km or mi depending on units
        #[arg(long)]
        distance: Option<f64>,
        /// Planned weight, kg or lb depending on units
        #[arg(short, long)]
        weight: Option<f64>,
        /// Target RPE
        #[arg(long)]
        rpe: Option<f64>,
        /// Rest after each set in seconds (defaults to the configured rest)
        #[arg(long)]
        rest: Option<i64>,
        /// Superset group label shared with other exercises
        #[arg(long)]
        superset: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove an exercise from a workout
    RemoveFromWorkout {
        workout: String,
        exercise: String,
    },
    /// Rewrite the display order of the workouts
    ReorderWorkouts {
        /// Workout ids or names in the desired order
        #[arg(required = true, num_args = 1..)]
        workouts: Vec<String>,
    },
    /// Make a workout the active session
    StartWorkout {
        identifier: String,
    },
    /// Show the active session
    CurrentWorkout,
    /// Abandon the active session without recording anything
    CancelWorkout,
    /// Finish the active session, recording history and progress
    FinishWorkout {
        /// Session length in minutes
        #[arg(short, long)]
        duration: i64,
        /// How the session went
        #[arg(long)]
        notes: Option<String>,
        /// Complete only these sets, as EXERCISE:SET pairs with 1-based set
        /// numbers (e.g., "Pull-Up:1"); by default every set is completed
        #[arg(long, value_name = "EXERCISE:SET")]
        only: Vec<String>,
    },
    /// List completed sessions, most recent first
    History {
        /// Show only the last N sessions
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show one completed session in full
    HistoryDetails {
        /// History entry id
        id: String,
    },
    /// Show recorded progress for an exercise
    Progress {
        /// Exercise id or (alternate) name
        identifier: String,
    },
    /// Show dashboard statistics (week, month, streak)
    Stats,
    /// Show the path to the database file
    DbPath,
    /// Show the path to the config file
    ConfigPath,
    /// Generate shell completion script
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Used by completion generation, which needs the command structure itself
pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

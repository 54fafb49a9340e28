//src/main.rs
mod cli; // Keep cli module for parsing args

use csv;
use anyhow::{bail, Context, Result};
use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table, Attribute};
use std::io::stdout;
use std::io;

use fortivo_lib::{
    db::generate_id, AppService, Config, DashboardStats, DbError, Difficulty, Exercise,
    ExerciseEntry, ExerciseUpdate, HistoryDetails, Measurement, NewExercise, ProgressEntry,
    SessionSummary, SetTarget, Units, Workout, WorkoutDraft, WorkoutHistoryEntry, WorkoutSet,
    WorkoutUpdate, KG_TO_LB, KM_TO_MILE,
};

fn main() -> Result<()> {
    env_logger::init();

    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args(); // Parse arguments once
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command(); // Get the command structure
        let bin_name = cmd.get_name().to_string(); // Get the binary name

        eprintln!("Generating completion script for {}...", shell); // Print to stderr
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout()); // Print script to stdout
        return Ok(()); // Exit after generating script
    }

    // Initialize the application service (loads config, connects to DB, seeds the catalog)
    let service = AppService::initialize().context("Failed to initialize application service")?;

    // --- Execute Commands using AppService ---
    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            // This case is handled above, but keep it exhaustive
            unreachable!("Completion generation should have exited already");
        }
        // --- Exercise Catalog Commands ---
        cli::Commands::ListExercises { category, muscle, favorites } => {
            let result = if favorites {
                service.favorite_exercises()
            } else if let Some(ref cat) = category {
                service.exercises_by_category(cat)
            } else if let Some(ref m) = muscle {
                service.exercises_by_muscle(m)
            } else {
                service.list_exercises()
            };

            match result {
                Ok(exercises) if exercises.is_empty() => {
                    println!("No exercises found matching the criteria.");
                }
                Ok(exercises) => {
                    if export_csv {
                        print_exercise_csv(exercises)?;
                    } else {
                        let favorite_ids = service.favorite_exercise_ids()?;
                        print_exercise_table(exercises, &favorite_ids, header_color(&service));
                    }
                }
                Err(e) => bail!("Error listing exercises: {}", e),
            }
        }
        cli::Commands::SearchExercises { query } => {
            match service.search_exercises(&query) {
                Ok(exercises) if exercises.is_empty() => {
                    println!("No exercises match '{}'.", query);
                }
                Ok(exercises) => {
                    if export_csv {
                        print_exercise_csv(exercises)?;
                    } else {
                        let favorite_ids = service.favorite_exercise_ids()?;
                        print_exercise_table(exercises, &favorite_ids, header_color(&service));
                    }
                }
                Err(e) => bail!("Error searching exercises: {}", e),
            }
        }
        cli::Commands::ShowExercise { identifier } => {
            match service.resolve_exercise(&identifier) {
                Ok(Some(exercise)) => {
                    let favorite = service.is_favorite(&exercise.id)?;
                    print_exercise_details(&exercise, favorite);
                }
                Ok(None) => println!("Exercise '{}' not found.", identifier),
                Err(e) => bail!("Error resolving exercise '{}': {}", identifier, e),
            }
        }
        cli::Commands::CreateExercise {
            name, alt_name, categories, muscles, equipment, instructions, difficulty, measurement,
        } => {
            let params = NewExercise {
                name: &name,
                alt_name: alt_name.filter(|s| !s.trim().is_empty()),
                categories: parse_list(categories.as_deref()),
                muscle_groups: parse_list(muscles.as_deref()),
                instructions: instructions.filter(|s| !s.trim().is_empty()),
                equipment: equipment
                    .as_deref()
                    .map(|e| parse_list(Some(e)))
                    .filter(|v| !v.is_empty()),
                difficulty: difficulty.map(cli_difficulty_to_db),
                measurement: cli_measurement_to_db(measurement),
            };
            match service.create_exercise(params) {
                Ok(exercise) => println!(
                    "Successfully defined exercise '{}' (measured in {}) ID: {}",
                    exercise.name, exercise.measurement, exercise.id
                ),
                Err(e) => bail!("Error creating exercise: {}", e),
            }
        }
        cli::Commands::EditExercise {
            identifier, name, alt_name, categories, muscles, equipment, instructions,
            difficulty, measurement,
        } => {
            let update = ExerciseUpdate {
                name,
                alt_name: clear_or_set(alt_name),
                categories: categories.as_deref().map(|c| parse_list(Some(c))),
                muscle_groups: muscles.as_deref().map(|m| parse_list(Some(m))),
                instructions: clear_or_set(instructions),
                equipment: match equipment {
                    Some(ref s) if s.trim().is_empty() => Some(None), // Clear
                    Some(ref s) => Some(Some(parse_list(Some(s)))),   // Set
                    None => None,                                     // Don't change
                },
                difficulty: difficulty.map(|d| Some(cli_difficulty_to_db(d))),
                measurement: measurement.map(cli_measurement_to_db),
            };
            match service.update_custom_exercise(&identifier, &update) {
                Ok(rows) => println!(
                    "Successfully updated exercise '{}' ({} row(s) affected).",
                    identifier, rows
                ),
                Err(e) => bail!("Error editing exercise '{}': {}", identifier, e),
            }
        }
        cli::Commands::DeleteExercise { identifier } => {
            match service.delete_custom_exercise(&identifier) {
                Ok(rows) => println!(
                    "Successfully deleted exercise '{}' ({} row(s) affected).",
                    identifier, rows
                ),
                Err(e) => bail!("Error deleting exercise '{}': {}", identifier, e),
            }
        }
        cli::Commands::Favorite { identifier } => {
            match service.toggle_favorite(&identifier) {
                Ok(true) => println!("Added '{}' to favorites.", identifier),
                Ok(false) => println!("Removed '{}' from favorites.", identifier),
                Err(e) => bail!("Error toggling favorite '{}': {}", identifier, e),
            }
        }
        cli::Commands::ListCategories => {
            match service.list_categories() {
                Ok(categories) if categories.is_empty() => println!("No categories defined."),
                Ok(categories) => {
                    for category in categories {
                        println!("{}", category);
                    }
                }
                Err(e) => bail!("Error listing categories: {}", e),
            }
        }
        cli::Commands::ListMuscles => {
            match service.list_muscle_groups() {
                Ok(muscles) if muscles.is_empty() => println!("No muscle groups defined."),
                Ok(muscles) => {
                    for muscle in muscles {
                        println!("{}", muscle);
                    }
                }
                Err(e) => bail!("Error listing muscle groups: {}", e),
            }
        }
        // --- Workout Plan Commands ---
        cli::Commands::CreateWorkout { name, notes, tags } => {
            let tag_list = tags
                .as_deref()
                .map(|t| parse_list(Some(t)))
                .filter(|v| !v.is_empty());
            match service.create_workout(&name, notes, tag_list) {
                Ok(workout) => println!(
                    "Successfully created workout '{}' ID: {}",
                    workout.name, workout.id
                ),
                Err(e) => bail!("Error creating workout: {}", e),
            }
        }
        cli::Commands::ListWorkouts => {
            match service.list_workouts() {
                Ok(workouts) if workouts.is_empty() => println!("No workouts defined yet."),
                Ok(workouts) => {
                    if export_csv {
                        print_workout_csv(workouts)?;
                    } else {
                        print_workout_table(workouts, header_color(&service));
                    }
                }
                Err(e) => bail!("Error listing workouts: {}", e),
            }
        }
        cli::Commands::ShowWorkout { identifier } => {
            let workout = match service.resolve_workout(&identifier)? {
                Some(w) => w,
                None => {
                    println!("Workout '{}' not found.", identifier);
                    return Ok(());
                }
            };
            let entries = service.workout_exercises(&workout.id)?;
            print_workout_details(&workout, &entries, service.config.units, header_color(&service));
        }
        cli::Commands::EditWorkout { identifier, name, notes, tags } => {
            let workout = match service.resolve_workout(&identifier)? {
                Some(w) => w,
                None => {
                    println!("Workout '{}' not found.", identifier);
                    return Ok(());
                }
            };
            let update = WorkoutUpdate {
                name,
                date: None,
                duration_minutes: None,
                notes: clear_or_set(notes),
                tags: match tags {
                    Some(ref s) if s.trim().is_empty() => Some(None), // Clear
                    Some(ref s) => Some(Some(parse_list(Some(s)))),   // Set
                    None => None,                                     // Don't change
                },
                completed: None,
            };
            match service.update_workout(&workout.id, &update) {
                Ok(rows) => println!(
                    "Successfully updated workout '{}' ({} row(s) affected).",
                    workout.name, rows
                ),
                Err(e) => bail!("Error editing workout '{}': {}", workout.name, e),
            }
        }
        cli::Commands::DeleteWorkout { identifier } => {
            let workout = match service.resolve_workout(&identifier)? {
                Some(w) => w,
                None => {
                    println!("Workout '{}' not found.", identifier);
                    return Ok(());
                }
            };
            match service.delete_workout(&workout.id) {
                Ok(rows) => println!(
                    "Successfully deleted workout '{}' ({} row(s) affected).",
                    workout.name, rows
                ),
                Err(e) => bail!("Error deleting workout '{}': {}", workout.name, e),
            }
        }
        cli::Commands::AddToWorkout {
            workout, exercise, sets, reps, duration, distance, weight, rpe, rest, superset, notes,
        } => {
            let plan = match service.resolve_workout(&workout)? {
                Some(w) => w,
                None => {
                    println!("Workout '{}' not found.", workout);
                    return Ok(());
                }
            };
            let exercise_def = match service.resolve_exercise(&exercise)? {
                Some(e) => e,
                None => {
                    println!("Exercise '{}' not found.", exercise);
                    return Ok(());
                }
            };

            // The planned amount must match how the exercise is measured.
            let target = match exercise_def.measurement {
                Measurement::Reps => {
                    if duration.is_some() || distance.is_some() {
                        bail!("'{}' is measured in reps; plan it with --reps.", exercise_def.name);
                    }
                    SetTarget::Reps(reps.unwrap_or(8))
                }
                Measurement::Time => {
                    if reps.is_some() || distance.is_some() {
                        bail!(
                            "'{}' is measured in time; plan it with --duration.",
                            exercise_def.name
                        );
                    }
                    SetTarget::Time(duration.unwrap_or(30))
                }
                Measurement::Distance => {
                    if reps.is_some() || duration.is_some() {
                        bail!(
                            "'{}' is measured in distance; plan it with --distance.",
                            exercise_def.name
                        );
                    }
                    let meters = distance.map_or(1000.0, |d| service.input_distance_to_meters(d));
                    SetTarget::Distance(meters)
                }
            };
            let weight_kg = weight.map(|w| service.input_weight_to_kg(w));
            let rest_secs = rest.or(Some(service.config.default_rest_secs));

            let mut entries = service.workout_exercises(&plan.id)?;
            let set_count = sets.max(1) as usize;
            let planned_sets: Vec<WorkoutSet> = (0..set_count)
                .map(|_| WorkoutSet {
                    id: generate_id("ws"),
                    target,
                    weight: weight_kg,
                    rpe,
                    tempo: None,
                    rest_secs,
                    completed: false,
                    notes: None,
                    actual: None,
                    actual_weight: None,
                })
                .collect();
            entries.push(ExerciseEntry {
                exercise: exercise_def.clone(),
                superset_group: superset,
                notes,
                sets: planned_sets,
            });

            match service.save_workout_exercises(&plan.id, &entries) {
                Ok(()) => println!(
                    "Successfully added {} set(s) of '{}' to workout '{}'.",
                    set_count, exercise_def.name, plan.name
                ),
                Err(e) => bail!(
                    "Error adding '{}' to workout '{}': {}",
                    exercise_def.name, plan.name, e
                ),
            }
        }
        cli::Commands::RemoveFromWorkout { workout, exercise } => {
            let plan = match service.resolve_workout(&workout)? {
                Some(w) => w,
                None => {
                    println!("Workout '{}' not found.", workout);
                    return Ok(());
                }
            };
            let exercise_def = match service.resolve_exercise(&exercise)? {
                Some(e) => e,
                None => {
                    println!("Exercise '{}' not found.", exercise);
                    return Ok(());
                }
            };
            let mut entries = service.workout_exercises(&plan.id)?;
            let before = entries.len();
            entries.retain(|entry| entry.exercise.id != exercise_def.id);
            if entries.len() == before {
                println!("'{}' is not part of workout '{}'.", exercise_def.name, plan.name);
            } else {
                match service.save_workout_exercises(&plan.id, &entries) {
                    Ok(()) => println!(
                        "Successfully removed '{}' from workout '{}'.",
                        exercise_def.name, plan.name
                    ),
                    Err(e) => bail!(
                        "Error removing '{}' from workout '{}': {}",
                        exercise_def.name, plan.name, e
                    ),
                }
            }
        }
        cli::Commands::ReorderWorkouts { workouts } => {
            let mut ordered_ids = Vec::with_capacity(workouts.len());
            for identifier in &workouts {
                let workout = service
                    .resolve_workout(identifier)?
                    .with_context(|| format!("Workout '{}' not found.", identifier))?;
                ordered_ids.push(workout.id);
            }
            match service.reorder_workouts(&ordered_ids) {
                Ok(()) => println!("Successfully reordered {} workout(s).", ordered_ids.len()),
                Err(e) => bail!("Error reordering workouts: {}", e),
            }
        }
        // --- Session Commands ---
        cli::Commands::StartWorkout { identifier } => {
            match service.start_workout(&identifier) {
                Ok(workout) => println!(
                    "Started workout '{}'. Finish it with 'finish-workout'.",
                    workout.name
                ),
                Err(e) => bail!("Error starting workout '{}': {}", identifier, e),
            }
        }
        cli::Commands::CurrentWorkout => {
            match service.load_session() {
                Ok((workout, draft)) => {
                    println!(
                        "Active workout: '{}' ({}/{} set(s) completed)",
                        workout.name,
                        draft.completed_sets(),
                        draft.total_sets()
                    );
                    print_entries_table(
                        &draft.exercises,
                        service.config.units,
                        header_color(&service),
                        true,
                    );
                }
                Err(e) => {
                    if let Some(DbError::NoActiveWorkout) = e.downcast_ref::<DbError>() {
                        println!("No workout is currently active. Start one with 'start-workout'.");
                        return Ok(());
                    }
                    bail!("Error loading the active workout: {}", e);
                }
            }
        }
        cli::Commands::CancelWorkout => {
            match service.active_workout()? {
                Some(workout) => {
                    service.cancel_active_workout()?;
                    println!("Cancelled workout '{}'. Nothing was recorded.", workout.name);
                }
                None => println!("No workout is currently active."),
            }
        }
        cli::Commands::FinishWorkout { duration, notes, only } => {
            let (_, mut draft) = match service.load_session() {
                Ok(pair) => pair,
                Err(e) => {
                    if let Some(DbError::NoActiveWorkout) = e.downcast_ref::<DbError>() {
                        println!("No workout is currently active. Start one with 'start-workout'.");
                        return Ok(());
                    }
                    bail!("Error loading the active workout: {}", e);
                }
            };

            if only.is_empty() {
                draft.complete_all_sets();
            } else {
                for spec in &only {
                    complete_chosen_set(&service, &mut draft, spec)?;
                }
            }

            match service.finish_session(draft, duration, notes) {
                Ok(summary) => {
                    print_session_summary(&summary, &service.config);
                    if service.config.notify_pr && summary.personal_records() > 0 {
                        print_pr_banner(&service, &summary)?;
                    }
                }
                Err(e) => bail!("Error finishing the workout: {}", e),
            }
        }
        // --- History and Progress Commands ---
        cli::Commands::History { limit } => {
            match service.workout_history(limit) {
                Ok(entries) if entries.is_empty() => println!("No completed sessions yet."),
                Ok(entries) => {
                    if export_csv {
                        print_history_csv(entries)?;
                    } else {
                        print_history_table(entries, header_color(&service));
                    }
                }
                Err(e) => bail!("Error listing history: {}", e),
            }
        }
        cli::Commands::HistoryDetails { id } => {
            match service.history_details(&id) {
                Ok(details) => {
                    print_history_details(&details, service.config.units, header_color(&service));
                }
                Err(e) => {
                    if let Some(DbError::HistoryNotFound(ident)) = e.downcast_ref::<DbError>() {
                        println!("History entry '{}' not found.", ident);
                        return Ok(());
                    }
                    bail!("Error loading history entry '{}': {}", id, e);
                }
            }
        }
        cli::Commands::Progress { identifier } => {
            match service.exercise_progress(&identifier) {
                Ok(entries) if entries.is_empty() => {
                    println!("No progress recorded for '{}' yet.", identifier);
                }
                Ok(entries) => {
                    if export_csv {
                        print_progress_csv(entries, service.config.units)?;
                    } else {
                        print_progress_table(entries, service.config.units, header_color(&service));
                    }
                }
                Err(e) => {
                    if let Some(DbError::ExerciseNotFound(ident)) = e.downcast_ref::<DbError>() {
                        println!("Exercise '{}' not found. No progress listed.", ident);
                        return Ok(());
                    }
                    bail!("Error listing progress for '{}': {}", identifier, e);
                }
            }
        }
        cli::Commands::Stats => {
            match service.dashboard_stats() {
                Ok(stats) => print_dashboard(&stats),
                Err(e) => bail!("Error computing statistics: {}", e),
            }
        }
        // --- Config/Path Commands ---
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
    }

    Ok(())
}

// --- CLI Specific Helper Functions ---

/// Converts CLI Measurement enum to DB Measurement enum (from lib)
fn cli_measurement_to_db(cli_measurement: cli::MeasurementCli) -> Measurement {
    match cli_measurement {
        cli::MeasurementCli::Reps => Measurement::Reps,
        cli::MeasurementCli::Time => Measurement::Time,
        cli::MeasurementCli::Distance => Measurement::Distance,
    }
}

/// Converts CLI Difficulty enum to DB Difficulty enum (from lib)
fn cli_difficulty_to_db(cli_difficulty: cli::DifficultyCli) -> Difficulty {
    match cli_difficulty {
        cli::DifficultyCli::Beginner => Difficulty::Beginner,
        cli::DifficultyCli::Intermediate => Difficulty::Intermediate,
        cli::DifficultyCli::Advanced => Difficulty::Advanced,
    }
}

fn header_color(service: &AppService) -> Color {
    fortivo_lib::parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Green) // Fallback
}

/// Splits a comma-separated argument into trimmed, non-empty values.
fn parse_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn clear_or_set(value: Option<String>) -> Option<Option<String>> {
    match value {
        Some(ref s) if s.trim().is_empty() => Some(None), // Clear
        Some(s) => Some(Some(s)),                         // Set
        None => None,                                     // Don't change
    }
}

/// Parses an "EXERCISE:SET" pair with a 1-based set number.
fn parse_set_spec(spec: &str) -> Result<(&str, usize)> {
    let (exercise, set_str) = spec
        .rsplit_once(':')
        .with_context(|| format!("Invalid set spec '{}'; expected EXERCISE:SET.", spec))?;
    let set_number: usize = set_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid set number in '{}'", spec))?;
    if set_number == 0 {
        bail!("Set numbers start at 1 (got '{}').", spec);
    }
    Ok((exercise.trim(), set_number))
}

/// Marks one set of the draft completed, resolving the exercise part of the spec.
fn complete_chosen_set(service: &AppService, draft: &mut WorkoutDraft, spec: &str) -> Result<()> {
    let (identifier, set_number) = parse_set_spec(spec)?;
    let exercise = service
        .resolve_exercise(identifier)?
        .with_context(|| format!("Exercise '{}' not found.", identifier))?;
    let entry = draft
        .exercises
        .iter_mut()
        .find(|e| e.exercise.id == exercise.id)
        .with_context(|| format!("'{}' is not part of the active workout.", exercise.name))?;
    let set = entry
        .sets
        .get_mut(set_number - 1)
        .with_context(|| format!("'{}' has no set {}.", exercise.name, set_number))?;
    set.completed = true;
    Ok(())
}

// --- Display Conversion Helpers ---

fn display_weight_value(kg: f64, units: Units) -> f64 {
    match units {
        Units::Metric => kg,
        Units::Imperial => kg * KG_TO_LB,
    }
}

fn format_weight(weight: Option<f64>, units: Units) -> String {
    match weight {
        Some(kg) => format!("{:.1} {}", display_weight_value(kg, units), units.weight_unit()),
        None => "-".to_string(),
    }
}

fn format_target(target: SetTarget, units: Units) -> String {
    match target {
        SetTarget::Reps(reps) => format!("{} reps", reps),
        SetTarget::Time(secs) => format!("{} s", secs),
        SetTarget::Distance(meters) => {
            let km = meters / 1000.0;
            match units {
                Units::Metric => format!("{:.2} km", km),
                Units::Imperial => format!("{:.2} mi", km * KM_TO_MILE),
            }
        }
    }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

// --- Table Printing Functions (Remain in CLI) ---

/// Prints exercise catalog rows in a formatted table.
fn print_exercise_table(exercises: Vec<Exercise>, favorite_ids: &[String], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Name").fg(header_color),
            Cell::new("Categories").fg(header_color),
            Cell::new("Muscles").fg(header_color),
            Cell::new("Difficulty").fg(header_color),
            Cell::new("Measurement").fg(header_color),
            Cell::new("Source").fg(header_color),
            Cell::new("Fav").fg(header_color),
        ]);

    for exercise in exercises {
        let favorite = if favorite_ids.contains(&exercise.id) { "*" } else { "" };
        table.add_row(vec![
            Cell::new(&exercise.id),
            Cell::new(&exercise.name),
            Cell::new(join_or_dash(&exercise.categories)),
            Cell::new(join_or_dash(&exercise.muscle_groups)),
            Cell::new(exercise.difficulty.map_or("-".to_string(), |d| d.to_string())),
            Cell::new(exercise.measurement.to_string()),
            Cell::new(if exercise.is_custom { "custom" } else { "built-in" }),
            Cell::new(favorite),
        ]);
    }
    println!("{table}");
}

/// Prints a single exercise as a key-value table.
fn print_exercise_details(exercise: &Exercise, favorite: bool) {
    println!("\n--- Exercise '{}' ---", exercise.name);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic); // No headers needed for key-value

    table.add_row(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new(&exercise.id),
    ]);
    table.add_row(vec![
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new(&exercise.name),
    ]);
    table.add_row(vec![
        Cell::new("Alternate Name").add_attribute(Attribute::Bold),
        Cell::new(exercise.alt_name.as_deref().unwrap_or("-")),
    ]);
    table.add_row(vec![
        Cell::new("Categories").add_attribute(Attribute::Bold),
        Cell::new(join_or_dash(&exercise.categories)),
    ]);
    table.add_row(vec![
        Cell::new("Muscles").add_attribute(Attribute::Bold),
        Cell::new(join_or_dash(&exercise.muscle_groups)),
    ]);
    table.add_row(vec![
        Cell::new("Equipment").add_attribute(Attribute::Bold),
        Cell::new(
            exercise
                .equipment
                .as_ref()
                .map_or("-".to_string(), |e| e.join(", ")),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Difficulty").add_attribute(Attribute::Bold),
        Cell::new(exercise.difficulty.map_or("-".to_string(), |d| d.to_string())),
    ]);
    table.add_row(vec![
        Cell::new("Measurement").add_attribute(Attribute::Bold),
        Cell::new(exercise.measurement.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Source").add_attribute(Attribute::Bold),
        Cell::new(if exercise.is_custom { "custom" } else { "built-in" }),
    ]);
    table.add_row(vec![
        Cell::new("Favorite").add_attribute(Attribute::Bold),
        Cell::new(if favorite { "yes" } else { "no" }),
    ]);
    if let Some(ref instructions) = exercise.instructions {
        table.add_row(vec![
            Cell::new("Instructions").add_attribute(Attribute::Bold),
            Cell::new(instructions),
        ]);
    }
    println!("{table}");
}

/// Prints workout plans in a formatted table.
fn print_workout_table(workouts: Vec<Workout>, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Name").fg(header_color),
            Cell::new("Active").fg(header_color),
            Cell::new("Tags").fg(header_color),
            Cell::new("Notes").fg(header_color),
            Cell::new("Created").fg(header_color),
        ]);

    for workout in workouts {
        table.add_row(vec![
            Cell::new(&workout.id),
            Cell::new(&workout.name),
            Cell::new(if workout.is_active { "yes" } else { "" }),
            Cell::new(workout.tags.as_ref().map_or("-".to_string(), |t| t.join(", "))),
            Cell::new(workout.notes.as_deref().unwrap_or("-")),
            Cell::new(
                workout
                    .created_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            ),
        ]);
    }
    println!("{table}");
}

/// Prints a workout plan header followed by its planned sets.
fn print_workout_details(
    workout: &Workout,
    entries: &[ExerciseEntry],
    units: Units,
    header_color: Color,
) {
    println!("\n--- Workout '{}' ---", workout.name);
    if let Some(ref notes) = workout.notes {
        println!("Notes: {}", notes);
    }
    if let Some(ref tags) = workout.tags {
        println!("Tags: {}", tags.join(", "));
    }
    if workout.is_active {
        println!("This workout is currently active.");
    }
    if entries.is_empty() {
        println!("No exercises planned yet. Add one with 'add-to-workout'.");
        return;
    }
    print_entries_table(entries, units, header_color, false);
}

/// Prints one row per planned set; `show_results` adds the completion columns.
fn print_entries_table(
    entries: &[ExerciseEntry],
    units: Units,
    header_color: Color,
    show_results: bool,
) {
    let mut table = Table::new();
    let mut header = vec![
        Cell::new("Exercise").fg(header_color),
        Cell::new("Set").fg(header_color),
        Cell::new("Target").fg(header_color),
        Cell::new(format!("Weight ({})", units.weight_unit())).fg(header_color),
        Cell::new("RPE").fg(header_color),
        Cell::new("Rest (s)").fg(header_color),
        Cell::new("Superset").fg(header_color),
    ];
    if show_results {
        header.push(Cell::new("Done").fg(header_color));
        header.push(Cell::new("Actual").fg(header_color));
        header.push(Cell::new("Actual Weight").fg(header_color));
    }
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for entry in entries {
        for (index, set) in entry.sets.iter().enumerate() {
            let mut row = vec![
                Cell::new(&entry.exercise.name),
                Cell::new((index + 1).to_string()),
                Cell::new(format_target(set.target, units)),
                Cell::new(format_weight(set.weight, units)),
                Cell::new(set.rpe.map_or("-".to_string(), |r| format!("{:.1}", r))),
                Cell::new(set.rest_secs.map_or("-".to_string(), |r| r.to_string())),
                Cell::new(entry.superset_group.as_deref().unwrap_or("-")),
            ];
            if show_results {
                row.push(Cell::new(if set.completed { "x" } else { "" }));
                row.push(Cell::new(
                    set.actual.map_or("-".to_string(), |a| format_target(a, units)),
                ));
                row.push(Cell::new(format_weight(set.actual_weight, units)));
            }
            table.add_row(row);
        }
    }
    println!("{table}");
}

/// Prints completed sessions in a formatted table.
fn print_history_table(entries: Vec<WorkoutHistoryEntry>, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Workout").fg(header_color),
            Cell::new("Completed").fg(header_color),
            Cell::new("Duration (min)").fg(header_color),
            Cell::new("Notes").fg(header_color),
        ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.id),
            Cell::new(&entry.workout_name),
            Cell::new(
                entry
                    .completed_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            ),
            Cell::new(entry.duration_minutes.to_string()),
            Cell::new(entry.performance_notes.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

/// Prints one completed session: a key-value summary, then the recorded sets.
fn print_history_details(details: &HistoryDetails, units: Units, header_color: Color) {
    println!("\n--- Session '{}' ---", details.entry.workout_name);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic); // No headers needed for key-value

    table.add_row(vec![
        Cell::new("Completed").add_attribute(Attribute::Bold),
        Cell::new(
            details
                .entry
                .completed_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Duration").add_attribute(Attribute::Bold),
        Cell::new(format!("{} min", details.entry.duration_minutes)),
    ]);
    table.add_row(vec![
        Cell::new("Sets").add_attribute(Attribute::Bold),
        Cell::new(format!("{}/{}", details.completed_sets, details.total_sets)),
    ]);
    table.add_row(vec![
        Cell::new("Total Volume").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{:.1} {}",
            display_weight_value(details.total_volume, units),
            units.weight_unit()
        )),
    ]);
    table.add_row(vec![
        Cell::new("Notes").add_attribute(Attribute::Bold),
        Cell::new(details.entry.performance_notes.as_deref().unwrap_or("-")),
    ]);
    println!("{}", table);

    if !details.exercises.is_empty() {
        print_entries_table(&details.exercises, units, header_color, true);
    }
}

/// Prints progress rows for one exercise, most recent first.
fn print_progress_table(entries: Vec<ProgressEntry>, units: Units, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Date").fg(header_color),
            Cell::new("Workout").fg(header_color),
            Cell::new(format!("Max Weight ({})", units.weight_unit())).fg(header_color),
            Cell::new(format!("Volume ({})", units.weight_unit())).fg(header_color),
            Cell::new("Est. 1RM").fg(header_color),
            Cell::new("PR").fg(header_color),
        ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(
                entry
                    .date
                    .with_timezone(&Local)
                    .format("%Y-%m-%d")
                    .to_string(),
            ),
            Cell::new(entry.workout_name.as_deref().unwrap_or("-")),
            Cell::new(format!("{:.1}", display_weight_value(entry.max_weight, units))),
            Cell::new(format!("{:.1}", display_weight_value(entry.total_volume, units))),
            Cell::new(
                entry
                    .estimated_one_rep_max
                    .map_or("-".to_string(), |e| format_weight(Some(e), units)),
            ),
            Cell::new(if entry.personal_record { "PR" } else { "" }),
        ]);
    }
    println!("{table}");
}

/// Prints dashboard statistics as a key-value table.
fn print_dashboard(stats: &DashboardStats) {
    println!("\n--- Dashboard ---");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic); // No headers needed for key-value

    table.add_row(vec![
        Cell::new("Total Sessions").add_attribute(Attribute::Bold),
        Cell::new(stats.total_sessions),
    ]);
    table.add_row(vec![
        Cell::new("This Week").add_attribute(Attribute::Bold),
        Cell::new(stats.workouts_this_week),
    ]);
    table.add_row(vec![
        Cell::new("This Month").add_attribute(Attribute::Bold),
        Cell::new(stats.workouts_this_month),
    ]);
    table.add_row(vec![
        Cell::new("Current Streak (Daily)").add_attribute(Attribute::Bold),
        Cell::new(if stats.current_streak > 0 {
            format!("{} day(s)", stats.current_streak)
        } else {
            "0".to_string()
        }),
    ]);
    println!("{}", table);
}

fn print_session_summary(summary: &SessionSummary, config: &Config) {
    println!(
        "Successfully finished '{}': {}/{} set(s) completed, total volume {:.1} {}.",
        summary.workout_name,
        summary.completed_sets,
        summary.total_sets,
        display_weight_value(summary.total_volume, config.units),
        config.units.weight_unit(),
    );
    println!("Recorded history entry ID: {}", summary.history_id);
}

/// Prints the boxed banner listing each personal record of the session.
fn print_pr_banner(service: &AppService, summary: &SessionSummary) -> Result<()> {
    println!("*********************************");
    println!("*     🎉 Personal Best! 🎉     *");
    for entry in summary.progress.iter().filter(|p| p.personal_record) {
        let name = service
            .resolve_exercise(&entry.exercise_id)?
            .map(|e| e.name)
            .unwrap_or_else(|| entry.exercise_id.clone());
        println!(
            "* {}: new max weight {}",
            name,
            format_weight(Some(entry.max_weight), service.config.units)
        );
    }
    println!("*********************************");
    Ok(())
}

// --- CSV Printing Functions ---

fn print_exercise_csv(exercises: Vec<Exercise>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());

    // Write header
    writer.write_record(&[
        "ID",
        "Name",
        "Alt_Name",
        "Categories",
        "Muscles",
        "Equipment",
        "Difficulty",
        "Measurement",
        "Source",
    ])?;

    for exercise in exercises {
        writer.write_record(&[
            exercise.id,
            exercise.name,
            exercise.alt_name.unwrap_or_default(),
            exercise.categories.join(","),
            exercise.muscle_groups.join(","),
            exercise.equipment.map_or(String::new(), |e| e.join(",")),
            exercise.difficulty.map_or(String::new(), |d| d.to_string()),
            exercise.measurement.to_string(),
            if exercise.is_custom { "custom" } else { "built-in" }.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_workout_csv(workouts: Vec<Workout>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());

    // Write header
    writer.write_record(&["ID", "Name", "Active", "Tags", "Notes", "Created"])?;

    for workout in workouts {
        writer.write_record(&[
            workout.id,
            workout.name,
            if workout.is_active { "yes" } else { "no" }.to_string(),
            workout.tags.map_or(String::new(), |t| t.join(",")),
            workout.notes.unwrap_or_default(),
            workout.created_at.to_rfc3339(), // Use ISO 8601/RFC3339 for CSV
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_history_csv(entries: Vec<WorkoutHistoryEntry>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());

    // Write header
    writer.write_record(&["ID", "Workout", "Completed_UTC", "Duration_min", "Notes"])?;

    for entry in entries {
        writer.write_record(&[
            entry.id,
            entry.workout_name,
            entry.completed_at.to_rfc3339(),
            entry.duration_minutes.to_string(),
            entry.performance_notes.unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_progress_csv(entries: Vec<ProgressEntry>, units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    let weight_unit_str = units.weight_unit();

    // Write header
    writer.write_record(&[
        "Date_UTC",
        "Workout",
        &format!("Max_Weight_{}", weight_unit_str),
        &format!("Volume_{}", weight_unit_str),
        &format!("Est_1RM_{}", weight_unit_str),
        "PR",
    ])?;

    for entry in entries {
        writer.write_record(&[
            entry.date.to_rfc3339(),
            entry.workout_name.unwrap_or_default(),
            format!("{:.1}", display_weight_value(entry.max_weight, units)),
            format!("{:.1}", display_weight_value(entry.total_volume, units)),
            entry
                .estimated_one_rep_max
                .map_or(String::new(), |e| format!("{:.1}", display_weight_value(e, units))),
            if entry.personal_record { "yes" } else { "no" }.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

use anyhow::{bail, Context, Result};
// Use anyhow::Result as standard Result for service layer
use chrono::{Datelike, Duration, Local, NaiveDate, Utc};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

// --- Declare modules ---
pub mod config;
pub mod db;
pub mod seed;
pub mod session;

// --- Expose public types ---
pub use config::{
    get_config_path, load_config, parse_color, save_config, Config, ConfigError, StandardColor,
    ThemeConfig, Units,
};

pub use db::{
    get_db_path, DbError, Difficulty, Exercise, ExerciseFilters, ExerciseUpdate, Measurement,
    ProgressEntry, Workout, WorkoutHistoryEntry, WorkoutUpdate,
};

pub use session::{
    estimate_one_rep_max, ExerciseEntry, SessionError, SetTarget, WorkoutDraft, WorkoutSet,
};

pub const KM_TO_MILE: f64 = 0.621_371;
pub const MILE_TO_KM: f64 = 1.60934;
pub const KG_TO_LB: f64 = 2.204_62;
pub const LB_TO_KG: f64 = 0.453_592;

/// Parameters for defining a custom exercise.
#[derive(Default, Debug)]
pub struct NewExercise<'a> {
    pub name: &'a str,
    pub alt_name: Option<String>,
    pub categories: Vec<String>,
    pub muscle_groups: Vec<String>,
    pub instructions: Option<String>,
    pub equipment: Option<Vec<String>>,
    pub difficulty: Option<Difficulty>,
    pub measurement: Measurement,
}

/// What came out of finishing a session: the stored history row id plus the
/// progress rows written for each exercise that had completed sets.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub history_id: String,
    pub workout_name: String,
    pub completed_sets: usize,
    pub total_sets: usize,
    pub total_volume: f64,
    pub progress: Vec<ProgressEntry>,
}

impl SessionSummary {
    pub fn personal_records(&self) -> usize {
        self.progress.iter().filter(|p| p.personal_record).count()
    }
}

/// A stored session expanded with the workout's current composition.
#[derive(Debug, Clone)]
pub struct HistoryDetails {
    pub entry: WorkoutHistoryEntry,
    pub exercises: Vec<ExerciseEntry>,
    pub total_volume: f64,
    pub completed_sets: usize,
    pub total_sets: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub workouts_this_week: usize,
    pub workouts_this_month: usize,
    pub current_streak: u32,
    pub total_sessions: usize,
}

pub struct AppService {
    pub config: Config,
    pub conn: Connection,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service: loads config, opens the database,
    /// creates the schema and brings the built-in catalog up to date.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load_config(&config_path)
            .context(format!("Failed to load config from {config_path:?}"))?;

        let db_path = db::get_db_path().context("Failed to determine database path")?;
        let conn = db::open_db(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        db::init_db(&conn).context("Failed to initialize database schema")?;

        let service = Self {
            config,
            conn,
            db_path,
            config_path,
        };
        service
            .seed_builtin_exercises()
            .context("Failed to seed built-in exercise catalog")?;
        Ok(service)
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save_config(&self.config_path, &self.config)
    }

    // --- Exercise catalog ---

    /// Brings the stored built-in catalog in line with the bundled dataset.
    /// A matching row count means the catalog is current and nothing is
    /// touched; any drift replaces all built-in rows. Returns the number of
    /// rows written.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn seed_builtin_exercises(&self) -> Result<usize> {
        let stored = db::count_builtin_exercises(&self.conn)
            .context("Failed to count built-in exercises")?;
        let bundled = seed::BUILTIN_EXERCISES.len();
        if stored == bundled as i64 {
            debug!("Exercise catalog up to date ({stored} built-ins)");
            return Ok(0);
        }
        info!("Reseeding exercise catalog: {stored} stored, {bundled} bundled");
        db::replace_builtin_exercises(&self.conn, seed::BUILTIN_EXERCISES)
            .context("Failed to replace built-in exercises")
            .map_err(Into::into)
    }

    /// Lists every exercise visible to the configured user: all built-ins
    /// first, then the user's custom exercises, alphabetically within each.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn list_exercises(&self) -> Result<Vec<Exercise>> {
        db::list_exercises_filtered(
            &self.conn,
            ExerciseFilters {
                user_id: Some(&self.config.user_id),
                ..Default::default()
            },
        )
        .context("Failed to list exercises")
        .map_err(Into::into)
    }

    /// Lists visible exercises tagged with the given category.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn exercises_by_category(&self, category: &str) -> Result<Vec<Exercise>> {
        db::list_exercises_filtered(
            &self.conn,
            ExerciseFilters {
                user_id: Some(&self.config.user_id),
                category: Some(category),
                ..Default::default()
            },
        )
        .with_context(|| format!("Failed to list exercises for category '{category}'"))
        .map_err(Into::into)
    }

    /// Lists visible exercises working the given muscle group.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn exercises_by_muscle(&self, muscle: &str) -> Result<Vec<Exercise>> {
        db::list_exercises_filtered(
            &self.conn,
            ExerciseFilters {
                user_id: Some(&self.config.user_id),
                muscle: Some(muscle),
                ..Default::default()
            },
        )
        .with_context(|| format!("Failed to list exercises for muscle '{muscle}'"))
        .map_err(Into::into)
    }

    /// Case-insensitive search over names, alternate names and categories.
    /// An empty query falls back to the full visible list.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn search_exercises(&self, query: &str) -> Result<Vec<Exercise>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return self.list_exercises();
        }
        db::list_exercises_filtered(
            &self.conn,
            ExerciseFilters {
                user_id: Some(&self.config.user_id),
                search: Some(trimmed),
                ..Default::default()
            },
        )
        .with_context(|| format!("Failed to search exercises for '{trimmed}'"))
        .map_err(Into::into)
    }

    /// The configured user's favorite exercises, kept in list order.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn favorite_exercises(&self) -> Result<Vec<Exercise>> {
        db::list_exercises_filtered(
            &self.conn,
            ExerciseFilters {
                user_id: Some(&self.config.user_id),
                favorites_of: Some(&self.config.user_id),
                ..Default::default()
            },
        )
        .context("Failed to list favorite exercises")
        .map_err(Into::into)
    }

    /// Resolves an identifier (exact id, name or alternate name) to an
    /// exercise visible to the configured user.
    /// # Errors
    /// Returns `anyhow::Error` if the identifier is empty or resolution fails.
    pub fn resolve_exercise(&self, identifier: &str) -> Result<Option<Exercise>> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            bail!("Exercise identifier cannot be empty.");
        }
        if let Some(exercise) = db::get_exercise_by_id(&self.conn, trimmed)
            .with_context(|| format!("Failed to look up exercise id '{trimmed}'"))?
        {
            return Ok(Some(exercise));
        }
        db::get_exercise_by_name(&self.conn, trimmed, Some(&self.config.user_id))
            .with_context(|| format!("Failed to resolve exercise '{trimmed}'"))
            .map_err(Into::into)
    }

    /// Defines a custom exercise owned by the configured user.
    /// # Errors
    /// Returns `anyhow::Error` if the name is empty or DB insertion fails.
    pub fn create_exercise(&self, params: NewExercise) -> Result<Exercise> {
        let trimmed_name = params.name.trim();
        if trimmed_name.is_empty() {
            bail!("Exercise name cannot be empty.");
        }
        let exercise = Exercise {
            id: db::generate_id("ex"),
            name: trimmed_name.to_string(),
            alt_name: params.alt_name,
            categories: params.categories,
            muscle_groups: params.muscle_groups,
            instructions: params.instructions,
            equipment: params.equipment,
            difficulty: params.difficulty,
            measurement: params.measurement,
            is_custom: true,
            user_id: Some(self.config.user_id.clone()),
            created_at: Utc::now(),
        };
        db::insert_exercise(&self.conn, &exercise)
            .with_context(|| format!("Failed to create exercise '{trimmed_name}'"))?;
        Ok(exercise)
    }

    fn require_owned_exercise(&self, identifier: &str) -> Result<Exercise> {
        let exercise = self
            .resolve_exercise(identifier)?
            .ok_or_else(|| DbError::ExerciseNotFound(identifier.to_string()))?;
        if !exercise.is_custom || exercise.user_id.as_deref() != Some(&self.config.user_id) {
            bail!(DbError::ExerciseNotOwned(exercise.name));
        }
        Ok(exercise)
    }

    /// Edits a custom exercise owned by the configured user. Built-in rows
    /// and other users' exercises are rejected.
    /// # Errors
    /// Returns `anyhow::Error` if the exercise is missing, not owned, a
    /// provided name is empty, or the DB update fails.
    pub fn update_custom_exercise(
        &self,
        identifier: &str,
        update: &ExerciseUpdate,
    ) -> Result<u64> {
        let exercise = self.require_owned_exercise(identifier)?;
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                bail!("New exercise name cannot be empty if provided.");
            }
        }
        db::update_exercise(&self.conn, &exercise.id, update).map_err(|db_err| match db_err {
            DbError::ExerciseNotFound(_) => {
                anyhow::anyhow!("Exercise '{identifier}' not found to edit.")
            }
            _ => anyhow::Error::new(db_err)
                .context(format!("Failed to update exercise '{identifier}'")),
        })
    }

    /// Deletes a custom exercise owned by the configured user. Progress,
    /// favorites and workout slots referencing it cascade away.
    /// # Errors
    /// Returns `anyhow::Error` if the exercise is missing, not owned, or the
    /// DB deletion fails.
    pub fn delete_custom_exercise(&self, identifier: &str) -> Result<u64> {
        let exercise = self.require_owned_exercise(identifier)?;
        db::delete_exercise(&self.conn, &exercise.id).map_err(|db_err| match db_err {
            DbError::ExerciseNotFound(_) => {
                anyhow::anyhow!("Exercise '{identifier}' not found or already deleted.")
            }
            _ => anyhow::Error::new(db_err)
                .context(format!("Failed to delete exercise '{}'", exercise.name)),
        })
    }

    /// Every distinct category across the visible catalog, sorted.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn list_categories(&self) -> Result<Vec<String>> {
        db::list_categories(&self.conn, Some(&self.config.user_id))
            .context("Failed to list categories")
            .map_err(Into::into)
    }

    /// Every distinct muscle group across the visible catalog, sorted.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn list_muscle_groups(&self) -> Result<Vec<String>> {
        db::list_muscle_groups(&self.conn, Some(&self.config.user_id))
            .context("Failed to list muscle groups")
            .map_err(Into::into)
    }

    /// Flips the favorite mark on an exercise. Returns the new state.
    /// # Errors
    /// Returns `anyhow::Error` if the identifier does not resolve or the DB
    /// write fails.
    pub fn toggle_favorite(&self, identifier: &str) -> Result<bool> {
        let exercise = self
            .resolve_exercise(identifier)?
            .ok_or_else(|| DbError::ExerciseNotFound(identifier.to_string()))?;
        let user = &self.config.user_id;
        if db::is_favorite(&self.conn, user, &exercise.id)? {
            db::remove_favorite(&self.conn, user, &exercise.id)
                .with_context(|| format!("Failed to unfavorite '{}'", exercise.name))?;
            Ok(false)
        } else {
            db::add_favorite(&self.conn, user, &exercise.id)
                .with_context(|| format!("Failed to favorite '{}'", exercise.name))?;
            Ok(true)
        }
    }

    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn is_favorite(&self, exercise_id: &str) -> Result<bool> {
        db::is_favorite(&self.conn, &self.config.user_id, exercise_id)
            .context("Failed to check favorite state")
            .map_err(Into::into)
    }

    /// Favorite exercise ids, most recently marked first.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn favorite_exercise_ids(&self) -> Result<Vec<String>> {
        db::list_favorite_ids(&self.conn, &self.config.user_id)
            .context("Failed to list favorite ids")
            .map_err(Into::into)
    }

    // --- Workout plans ---

    /// Creates an empty workout plan appended to the end of the list.
    /// # Errors
    /// Returns `anyhow::Error` if the name is empty or DB insertion fails.
    pub fn create_workout(
        &self,
        name: &str,
        notes: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Result<Workout> {
        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            bail!("Workout name cannot be empty.");
        }
        let display_order = db::count_workouts(&self.conn)?;
        let now = Utc::now();
        let workout = Workout {
            id: db::generate_id("workout"),
            name: trimmed_name.to_string(),
            date: now,
            duration_minutes: None,
            notes,
            tags,
            completed: false,
            template_id: None,
            display_order,
            is_active: false,
            created_at: now,
        };
        db::insert_workout(&self.conn, &workout)
            .with_context(|| format!("Failed to create workout '{trimmed_name}'"))?;
        Ok(workout)
    }

    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn list_workouts(&self) -> Result<Vec<Workout>> {
        db::list_workouts(&self.conn)
            .context("Failed to list workouts")
            .map_err(Into::into)
    }

    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn get_workout(&self, id: &str) -> Result<Option<Workout>> {
        db::get_workout_by_id(&self.conn, id)
            .with_context(|| format!("Failed to look up workout '{id}'"))
            .map_err(Into::into)
    }

    /// Resolves an identifier (exact id or name) to a workout.
    /// # Errors
    /// Returns `anyhow::Error` if the identifier is empty or resolution fails.
    pub fn resolve_workout(&self, identifier: &str) -> Result<Option<Workout>> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            bail!("Workout identifier cannot be empty.");
        }
        if let Some(workout) = db::get_workout_by_id(&self.conn, trimmed)
            .with_context(|| format!("Failed to look up workout id '{trimmed}'"))?
        {
            return Ok(Some(workout));
        }
        db::get_workout_by_name(&self.conn, trimmed)
            .with_context(|| format!("Failed to resolve workout '{trimmed}'"))
            .map_err(Into::into)
    }

    /// Applies the present fields of the update to a workout.
    /// # Errors
    /// Returns `anyhow::Error` if the workout is missing, a provided name is
    /// empty, or the DB update fails.
    pub fn update_workout(&self, id: &str, update: &WorkoutUpdate) -> Result<u64> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                bail!("New workout name cannot be empty if provided.");
            }
        }
        db::update_workout(&self.conn, id, update).map_err(|db_err| match db_err {
            DbError::WorkoutNotFound(_) => anyhow::anyhow!("Workout '{id}' not found to edit."),
            _ => anyhow::Error::new(db_err).context(format!("Failed to update workout '{id}'")),
        })
    }

    /// Deletes a workout plan with its composition and history.
    /// # Errors
    /// Returns `anyhow::Error` if the workout is missing or deletion fails.
    pub fn delete_workout(&self, id: &str) -> Result<u64> {
        db::delete_workout(&self.conn, id).map_err(|db_err| match db_err {
            DbError::WorkoutNotFound(_) => {
                anyhow::anyhow!("Workout '{id}' not found or already deleted.")
            }
            _ => anyhow::Error::new(db_err).context(format!("Failed to delete workout '{id}'")),
        })
    }

    /// Persists a manual ordering: each workout's display position becomes its
    /// index in the given list.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn reorder_workouts(&self, ordered_ids: &[String]) -> Result<()> {
        db::reorder_workouts(&self.conn, ordered_ids)
            .context("Failed to reorder workouts")
            .map_err(Into::into)
    }

    /// Marks the workout as the single active session, displacing any other.
    /// # Errors
    /// Returns `anyhow::Error` if the identifier does not resolve or the DB
    /// write fails.
    pub fn start_workout(&self, identifier: &str) -> Result<Workout> {
        let workout = self
            .resolve_workout(identifier)?
            .ok_or_else(|| DbError::WorkoutNotFound(identifier.to_string()))?;
        db::set_active_workout(&self.conn, &workout.id)
            .with_context(|| format!("Failed to start workout '{}'", workout.name))?;
        Ok(workout)
    }

    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn active_workout(&self) -> Result<Option<Workout>> {
        db::get_active_workout(&self.conn)
            .context("Failed to look up the active workout")
            .map_err(Into::into)
    }

    /// Abandons the active session without recording anything.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn cancel_active_workout(&self) -> Result<()> {
        db::clear_active_workout(&self.conn)
            .context("Failed to cancel the active workout")
            .map_err(Into::into)
    }

    /// Replaces a workout's whole exercise list with the given entries.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn save_workout_exercises(
        &self,
        workout_id: &str,
        entries: &[ExerciseEntry],
    ) -> Result<()> {
        db::save_workout_exercises(&self.conn, workout_id, entries)
            .with_context(|| format!("Failed to save exercises for workout '{workout_id}'"))
            .map_err(Into::into)
    }

    /// Loads a workout's ordered exercise entries with their sets.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn workout_exercises(&self, workout_id: &str) -> Result<Vec<ExerciseEntry>> {
        db::get_workout_exercises(&self.conn, workout_id)
            .with_context(|| format!("Failed to load exercises for workout '{workout_id}'"))
            .map_err(Into::into)
    }

    // --- Session execution ---

    /// Loads the active workout and its composition as an editable draft.
    /// # Errors
    /// Returns `anyhow::Error` with `DbError::NoActiveWorkout` when no session
    /// is running.
    pub fn load_session(&self) -> Result<(Workout, WorkoutDraft)> {
        let workout = self.active_workout()?.ok_or(DbError::NoActiveWorkout)?;
        let exercises = self.workout_exercises(&workout.id)?;
        let draft = WorkoutDraft {
            name: workout.name.clone(),
            exercises,
        };
        Ok((workout, draft))
    }

    /// Finishes the active session: persists each set's actual results,
    /// records a history row, writes one progress row per exercise with at
    /// least one completed set, and releases the active slot.
    /// # Errors
    /// Returns `anyhow::Error` with `DbError::NoActiveWorkout` when no session
    /// is running, or wrapping DB errors from the writes.
    pub fn finish_session(
        &self,
        mut draft: WorkoutDraft,
        duration_minutes: i64,
        performance_notes: Option<String>,
    ) -> Result<SessionSummary> {
        let workout = self.active_workout()?.ok_or(DbError::NoActiveWorkout)?;
        draft.prefill_actuals();

        for entry in &draft.exercises {
            for set in &entry.sets {
                db::update_set_results(&self.conn, set)
                    .with_context(|| format!("Failed to save results for set '{}'", set.id))?;
            }
        }

        let now = Utc::now();
        let history_id = db::generate_id("hist");
        db::insert_workout_history(
            &self.conn,
            &history_id,
            &workout.id,
            &self.config.user_id,
            now,
            duration_minutes,
            performance_notes.as_deref(),
        )
        .context("Failed to record workout history")?;

        let mut progress = Vec::new();
        for entry in &draft.exercises {
            if entry.completed_set_count() == 0 {
                continue;
            }
            let max_weight = entry.max_completed_weight();
            let total_volume = entry.completed_volume();
            let estimated_one_rep_max = entry.best_estimated_one_rep_max();
            let previous_best = db::max_recorded_weight(&self.conn, &entry.exercise.id)
                .with_context(|| {
                    format!("Failed to fetch prior best for '{}'", entry.exercise.name)
                })?;
            // Strictly beating the old best counts; matching it does not.
            let personal_record = max_weight > previous_best.unwrap_or(0.0);

            let progress_id = db::generate_id("prog");
            db::insert_exercise_progress(
                &self.conn,
                &progress_id,
                &entry.exercise.id,
                &self.config.user_id,
                now,
                max_weight,
                total_volume,
                estimated_one_rep_max,
                personal_record,
            )
            .with_context(|| format!("Failed to record progress for '{}'", entry.exercise.name))?;

            if personal_record {
                info!("New personal record on {}: {max_weight} kg", entry.exercise.name);
            }
            progress.push(ProgressEntry {
                id: progress_id,
                exercise_id: entry.exercise.id.clone(),
                date: now,
                max_weight,
                total_volume,
                estimated_one_rep_max,
                personal_record,
                workout_name: Some(workout.name.clone()),
            });
        }

        db::clear_active_workout(&self.conn).context("Failed to release the active workout")?;

        Ok(SessionSummary {
            history_id,
            workout_name: workout.name,
            completed_sets: draft.completed_sets(),
            total_sets: draft.total_sets(),
            total_volume: draft.total_volume(),
            progress,
        })
    }

    // --- History and statistics ---

    /// Completed sessions, most recent first.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn workout_history(&self, limit: Option<u32>) -> Result<Vec<WorkoutHistoryEntry>> {
        db::list_workout_history(&self.conn, limit)
            .context("Failed to list workout history")
            .map_err(Into::into)
    }

    /// One session with the owning workout's composition and set totals.
    /// # Errors
    /// Returns `anyhow::Error` with `DbError::HistoryNotFound` when the id is
    /// unknown.
    pub fn history_details(&self, history_id: &str) -> Result<HistoryDetails> {
        let entry = db::get_workout_history_entry(&self.conn, history_id)
            .with_context(|| format!("Failed to look up history entry '{history_id}'"))?
            .ok_or_else(|| DbError::HistoryNotFound(history_id.to_string()))?;
        let exercises = self.workout_exercises(&entry.workout_id)?;
        let total_volume = exercises.iter().map(ExerciseEntry::completed_volume).sum();
        let completed_sets = exercises
            .iter()
            .map(ExerciseEntry::completed_set_count)
            .sum();
        let total_sets = exercises.iter().map(|e| e.sets.len()).sum();
        Ok(HistoryDetails {
            entry,
            exercises,
            total_volume,
            completed_sets,
            total_sets,
        })
    }

    /// Progress rows for one exercise, most recent first.
    /// # Errors
    /// Returns `anyhow::Error` if the identifier does not resolve or the DB
    /// query fails.
    pub fn exercise_progress(&self, identifier: &str) -> Result<Vec<ProgressEntry>> {
        let exercise = self
            .resolve_exercise(identifier)?
            .ok_or_else(|| DbError::ExerciseNotFound(identifier.to_string()))?;
        db::list_progress_for_exercise(&self.conn, &exercise.id)
            .with_context(|| format!("Failed to list progress for '{}'", exercise.name))
            .map_err(Into::into)
    }

    fn history_local_dates(&self) -> Result<Vec<NaiveDate>> {
        let timestamps = db::list_history_timestamps(&self.conn)
            .context("Failed to fetch history timestamps")?;
        Ok(timestamps
            .iter()
            .map(|ts| ts.with_timezone(&Local).date_naive())
            .collect())
    }

    /// Sessions completed since the most recent Sunday (local time).
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn workouts_this_week(&self) -> Result<usize> {
        let dates = self.history_local_dates()?;
        Ok(count_in_week(&dates, Local::now().date_naive()))
    }

    /// Sessions completed in the current calendar month (local time).
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn workouts_this_month(&self) -> Result<usize> {
        let dates = self.history_local_dates()?;
        Ok(count_in_month(&dates, Local::now().date_naive()))
    }

    /// Consecutive training days ending today or yesterday (local time).
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn current_streak(&self) -> Result<u32> {
        let dates = self.history_local_dates()?;
        Ok(streak_from_dates(&dates, Local::now().date_naive()))
    }

    /// All dashboard numbers from a single history fetch.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn dashboard_stats(&self) -> Result<DashboardStats> {
        let dates = self.history_local_dates()?;
        let today = Local::now().date_naive();
        Ok(DashboardStats {
            workouts_this_week: count_in_week(&dates, today),
            workouts_this_month: count_in_month(&dates, today),
            current_streak: streak_from_dates(&dates, today),
            total_sessions: dates.len(),
        })
    }

    // --- Unit conversion ---

    /// Converts a weight entered in the configured units to kilograms.
    pub fn input_weight_to_kg(&self, weight: f64) -> f64 {
        match self.config.units {
            Units::Metric => weight,
            Units::Imperial => weight * LB_TO_KG,
        }
    }

    /// Converts a distance entered in the configured units (km or mi) to meters.
    pub fn input_distance_to_meters(&self, distance: f64) -> f64 {
        match self.config.units {
            Units::Metric => distance * 1000.0,
            Units::Imperial => distance * MILE_TO_KM * 1000.0,
        }
    }
}

// --- Helper Functions ---

/// Most recent Sunday at or before the given date.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// First day of the date's month and first day of the following month.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    let next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .unwrap_or(start);
    (start, next)
}

/// Sessions falling in the week containing `today` (Sunday-based). Every
/// session counts, including several on the same day.
pub fn count_in_week(dates: &[NaiveDate], today: NaiveDate) -> usize {
    let week_start = start_of_week(today);
    let week_end = week_start + Duration::days(7);
    dates
        .iter()
        .filter(|d| **d >= week_start && **d < week_end)
        .count()
}

/// Sessions falling in the calendar month containing `today`.
pub fn count_in_month(dates: &[NaiveDate], today: NaiveDate) -> usize {
    let (start, next) = month_bounds(today);
    dates.iter().filter(|d| **d >= start && **d < next).count()
}

/// Length of the run of consecutive training days ending today or yesterday.
/// Several sessions on one day count once; a day without training before
/// yesterday breaks the run.
pub fn streak_from_dates(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut unique: Vec<NaiveDate> = dates.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let latest = match unique.last() {
        Some(date) => *date,
        None => return 0,
    };
    if today - latest > Duration::days(1) {
        return 0;
    }

    let mut streak = 1u32;
    let mut expected = latest - Duration::days(1);
    for date in unique.iter().rev().skip(1) {
        if *date == expected {
            streak += 1;
            expected -= Duration::days(1);
        } else {
            break;
        }
    }
    streak
}

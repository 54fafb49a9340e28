// src/db.rs
use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::{named_params, params, Connection, OptionalExtension, Row, ToSql};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::seed::SeedExercise;
use crate::session::{ExerciseEntry, SetTarget, WorkoutSet};

/// How an exercise is quantified: repetitions, elapsed time, or covered distance.
/// Decides which planned/actual column of a set row is authoritative.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Measurement {
    #[default]
    Reps,
    Time,
    Distance,
}

impl TryFrom<&str> for Measurement {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "reps" => Ok(Measurement::Reps),
            "time" => Ok(Measurement::Time),
            "distance" => Ok(Measurement::Distance),
            _ => anyhow::bail!("Invalid measurement string from DB: {}", value),
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Reps => write!(f, "reps"),
            Measurement::Time => write!(f, "time"),
            Measurement::Distance => write!(f, "distance"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl TryFrom<&str> for Difficulty {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => anyhow::bail!("Invalid difficulty string from DB: {}", value),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

/// A catalog entry: either a bundled built-in row or a user-created custom row.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub alt_name: Option<String>,
    pub categories: Vec<String>,
    pub muscle_groups: Vec<String>,
    pub instructions: Option<String>,
    pub equipment: Option<Vec<String>>,
    pub difficulty: Option<Difficulty>,
    pub measurement: Measurement,
    pub is_custom: bool,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub duration_minutes: Option<i64>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub completed: bool,
    pub template_id: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// One completed session, joined to its workout's current name for display.
#[derive(Debug, Clone)]
pub struct WorkoutHistoryEntry {
    pub id: String,
    pub workout_id: String,
    pub workout_name: String,
    pub completed_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub performance_notes: Option<String>,
}

/// Per-exercise result row written when a session finishes.
#[derive(Debug, Clone)]
pub struct ProgressEntry {
    pub id: String,
    pub exercise_id: String,
    pub date: DateTime<Utc>,
    pub max_weight: f64,
    pub total_volume: f64,
    pub estimated_one_rep_max: Option<f64>,
    pub personal_record: bool,
    pub workout_name: Option<String>,
}

// Custom Error type for DB operations
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode array column as JSON")]
    Serialization(#[from] serde_json::Error),
    #[error("Exercise not found: {0}")]
    ExerciseNotFound(String),
    #[error("Exercise '{0}' is not a custom exercise owned by the current user")]
    ExerciseNotOwned(String),
    #[error("Workout not found: {0}")]
    WorkoutNotFound(String),
    #[error("Workout history entry not found: {0}")]
    HistoryNotFound(String),
    #[error("No workout is currently active")]
    NoActiveWorkout,
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database update failed: {0}")]
    UpdateFailed(rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(rusqlite::Error),
    #[error("Database delete failed: {0}")]
    DeleteFailed(rusqlite::Error),
}

const DB_FILE_NAME: &str = "fortivo.sqlite";
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a client-side row id: `{prefix}_{unix_millis}_{random9}`.
pub fn generate_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix)
}

/// Gets the path to the SQLite database file within the app's data directory.
pub fn get_db_path() -> Result<PathBuf, DbError> {
    let data_dir = dirs::data_dir().ok_or(DbError::DataDir)?;
    let app_dir = data_dir.join("fortivo"); // Same dir name as config
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

/// Opens a connection to the SQLite database with the pragmas the schema relies on.
pub fn open_db<P: AsRef<Path>>(path: P) -> Result<Connection, DbError> {
    let conn = Connection::open(path).map_err(DbError::Connection)?;
    // Cascading deletes depend on foreign_keys being on for this connection.
    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
        .map_err(DbError::Connection)?;
    Ok(conn)
}

/// Initializes the database tables if they don't exist.
pub fn init_db(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS exercises (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            alt_name TEXT,
            categories TEXT NOT NULL, -- JSON array
            muscle_groups TEXT NOT NULL, -- JSON array
            instructions TEXT,
            equipment TEXT, -- JSON array
            difficulty TEXT CHECK(difficulty IN ('beginner', 'intermediate', 'advanced')),
            measurement TEXT NOT NULL DEFAULT 'reps' CHECK(measurement IN ('reps', 'time', 'distance')),
            is_custom INTEGER NOT NULL DEFAULT 0,
            user_id TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS workout_templates (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            user_id TEXT NOT NULL,
            is_public INTEGER NOT NULL DEFAULT 0,
            tags TEXT, -- JSON array
            created_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS workouts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            date TEXT NOT NULL, -- RFC3339 string
            duration_minutes INTEGER,
            notes TEXT,
            tags TEXT, -- JSON array
            completed INTEGER NOT NULL DEFAULT 0,
            template_id TEXT REFERENCES workout_templates(id) ON DELETE SET NULL,
            display_order INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS workout_exercises (
            id TEXT PRIMARY KEY,
            workout_id TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
            exercise_id TEXT NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
            exercise_order INTEGER NOT NULL,
            superset_group TEXT,
            notes TEXT
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS workout_sets (
            id TEXT PRIMARY KEY,
            workout_exercise_id TEXT NOT NULL REFERENCES workout_exercises(id) ON DELETE CASCADE,
            set_order INTEGER NOT NULL,
            reps INTEGER,
            duration_secs INTEGER,
            distance_m REAL,
            weight REAL,
            rpe REAL,
            tempo TEXT,
            rest_secs INTEGER,
            completed INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            actual_reps INTEGER,
            actual_duration_secs INTEGER,
            actual_distance_m REAL,
            actual_weight REAL
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS workout_history (
            id TEXT PRIMARY KEY,
            workout_id TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            completed_at TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            performance_notes TEXT
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS exercise_progress (
            id TEXT PRIMARY KEY,
            exercise_id TEXT NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,
            max_weight REAL NOT NULL,
            total_volume REAL NOT NULL,
            estimated_one_rep_max REAL,
            personal_record INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS favorites (
            user_id TEXT NOT NULL,
            exercise_id TEXT NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            PRIMARY KEY (user_id, exercise_id)
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    // Planning tables: referenced by workouts.template_id and reserved for the
    // template/weekly-plan features; no service operation writes them yet.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS template_exercises (
            id TEXT PRIMARY KEY,
            template_id TEXT NOT NULL REFERENCES workout_templates(id) ON DELETE CASCADE,
            exercise_id TEXT NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
            exercise_order INTEGER NOT NULL,
            superset_group TEXT,
            notes TEXT
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS template_sets (
            id TEXT PRIMARY KEY,
            template_exercise_id TEXT NOT NULL REFERENCES template_exercises(id) ON DELETE CASCADE,
            set_order INTEGER NOT NULL,
            reps INTEGER,
            duration_secs INTEGER,
            distance_m REAL,
            weight REAL,
            rpe REAL,
            tempo TEXT,
            rest_secs INTEGER,
            notes TEXT
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS weekly_plans (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            week_number INTEGER,
            notes TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS weekly_plan_days (
            id TEXT PRIMARY KEY,
            weekly_plan_id TEXT NOT NULL REFERENCES weekly_plans(id) ON DELETE CASCADE,
            day_of_week INTEGER NOT NULL CHECK(day_of_week BETWEEN 0 AND 6),
            day_name TEXT,
            workout_id TEXT REFERENCES workouts(id) ON DELETE SET NULL,
            is_rest_day INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS training_plans (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            user_id TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 0,
            start_date TEXT,
            end_date TEXT,
            goal TEXT,
            tags TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS training_plan_weeks (
            id TEXT PRIMARY KEY,
            training_plan_id TEXT NOT NULL REFERENCES training_plans(id) ON DELETE CASCADE,
            week_number INTEGER NOT NULL,
            weekly_plan_id TEXT NOT NULL REFERENCES weekly_plans(id) ON DELETE CASCADE,
            notes TEXT,
            intensity_multiplier REAL NOT NULL DEFAULT 1.0,
            volume_multiplier REAL NOT NULL DEFAULT 1.0
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS periodization_blocks (
            id TEXT PRIMARY KEY,
            training_plan_id TEXT NOT NULL REFERENCES training_plans(id) ON DELETE CASCADE,
            phase TEXT CHECK(phase IN ('hypertrophy', 'strength', 'power', 'deload', 'peaking')),
            weeks INTEGER NOT NULL,
            description TEXT,
            block_order INTEGER NOT NULL
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    // Indexes for the hot lookups
    const INDEXES: &[&str] = &[
        "CREATE INDEX IF NOT EXISTS idx_exercises_is_custom ON exercises(is_custom)",
        "CREATE INDEX IF NOT EXISTS idx_exercises_user ON exercises(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_workouts_date ON workouts(date)",
        "CREATE INDEX IF NOT EXISTS idx_workouts_display_order ON workouts(display_order)",
        "CREATE INDEX IF NOT EXISTS idx_workouts_is_active ON workouts(is_active)",
        "CREATE INDEX IF NOT EXISTS idx_workout_exercises_workout ON workout_exercises(workout_id)",
        "CREATE INDEX IF NOT EXISTS idx_workout_exercises_exercise ON workout_exercises(exercise_id)",
        "CREATE INDEX IF NOT EXISTS idx_workout_sets_entry ON workout_sets(workout_exercise_id)",
        "CREATE INDEX IF NOT EXISTS idx_workout_history_workout ON workout_history(workout_id)",
        "CREATE INDEX IF NOT EXISTS idx_workout_history_completed ON workout_history(user_id, completed_at)",
        "CREATE INDEX IF NOT EXISTS idx_exercise_progress_exercise ON exercise_progress(exercise_id, date)",
        "CREATE INDEX IF NOT EXISTS idx_favorites_exercise ON favorites(exercise_id)",
    ];
    for sql in INDEXES {
        conn.execute(sql, []).map_err(DbError::Connection)?;
    }

    Ok(())
}

// --- Row mapping helpers ---

fn parse_timestamp(idx: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_string_list(idx: usize, value: &str) -> Result<Vec<String>, rusqlite::Error> {
    serde_json::from_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn map_row_to_exercise(row: &Row) -> Result<Exercise, rusqlite::Error> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let alt_name: Option<String> = row.get(2)?;
    let categories_str: String = row.get(3)?;
    let muscle_groups_str: String = row.get(4)?;
    let instructions: Option<String> = row.get(5)?;
    let equipment_str: Option<String> = row.get(6)?;
    let difficulty_str: Option<String> = row.get(7)?;
    let measurement_str: String = row.get(8)?;
    let is_custom: bool = row.get(9)?;
    let user_id: Option<String> = row.get(10)?;
    let created_at_str: String = row.get(11)?;

    let categories = parse_string_list(3, &categories_str)?;
    let muscle_groups = parse_string_list(4, &muscle_groups_str)?;
    let equipment = match equipment_str {
        Some(s) => Some(parse_string_list(6, &s)?),
        None => None,
    };
    // Unknown difficulty strings are dropped rather than failing the whole row.
    let difficulty = difficulty_str.and_then(|s| Difficulty::try_from(s.as_str()).ok());
    let measurement = Measurement::try_from(measurement_str.as_str()).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            rusqlite::types::Type::Text,
            Box::<dyn std::error::Error + Send + Sync>::from(e.to_string()),
        )
    })?;
    let created_at = parse_timestamp(11, &created_at_str)?;

    Ok(Exercise {
        id,
        name,
        alt_name,
        categories,
        muscle_groups,
        instructions,
        equipment,
        difficulty,
        measurement,
        is_custom,
        user_id,
        created_at,
    })
}

const EXERCISE_COLUMNS: &str = "id, name, alt_name, categories, muscle_groups, instructions, \
     equipment, difficulty, measurement, is_custom, user_id, created_at";

// --- Seeding ---

/// Counts the stored built-in (non-custom) catalog rows.
pub fn count_builtin_exercises(conn: &Connection) -> Result<i64, DbError> {
    conn.query_row(
        "SELECT COUNT(*) FROM exercises WHERE is_custom = 0",
        [],
        |row| row.get(0),
    )
    .map_err(DbError::QueryFailed)
}

/// Replaces every built-in row with the bundled dataset. Custom rows are untouched.
/// One prepared statement reused across the whole batch.
pub fn replace_builtin_exercises(
    conn: &Connection,
    dataset: &[SeedExercise],
) -> Result<usize, DbError> {
    conn.execute("DELETE FROM exercises WHERE is_custom = 0", [])
        .map_err(DbError::DeleteFailed)?;

    let now_str = Utc::now().to_rfc3339();
    let mut stmt = conn
        .prepare(
            "INSERT INTO exercises (id, name, alt_name, categories, muscle_groups, instructions, \
             equipment, difficulty, measurement, is_custom, user_id, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, NULL, ?10)",
        )
        .map_err(DbError::QueryFailed)?;

    for seed in dataset {
        let categories = serde_json::to_string(seed.categories)?;
        let muscle_groups = serde_json::to_string(seed.muscle_groups)?;
        let equipment = if seed.equipment.is_empty() {
            None
        } else {
            Some(serde_json::to_string(seed.equipment)?)
        };
        stmt.execute(params![
            seed.id,
            seed.name,
            seed.alt_name,
            categories,
            muscle_groups,
            seed.instructions,
            equipment,
            seed.difficulty.to_string(),
            seed.measurement.to_string(),
            now_str,
        ])
        .map_err(DbError::InsertFailed)?;
    }

    Ok(dataset.len())
}

// --- Exercise catalog functions ---

/// Inserts a fully built exercise row (the caller generates the id).
pub fn insert_exercise(conn: &Connection, exercise: &Exercise) -> Result<(), DbError> {
    let categories = serde_json::to_string(&exercise.categories)?;
    let muscle_groups = serde_json::to_string(&exercise.muscle_groups)?;
    let equipment = match &exercise.equipment {
        Some(list) => Some(serde_json::to_string(list)?),
        None => None,
    };
    conn.execute(
        "INSERT INTO exercises (id, name, alt_name, categories, muscle_groups, instructions, \
         equipment, difficulty, measurement, is_custom, user_id, created_at) \
         VALUES (:id, :name, :alt_name, :categories, :muscle_groups, :instructions, \
         :equipment, :difficulty, :measurement, :is_custom, :user_id, :created_at)",
        named_params! {
            ":id": exercise.id,
            ":name": exercise.name,
            ":alt_name": exercise.alt_name,
            ":categories": categories,
            ":muscle_groups": muscle_groups,
            ":instructions": exercise.instructions,
            ":equipment": equipment,
            ":difficulty": exercise.difficulty.map(|d| d.to_string()),
            ":measurement": exercise.measurement.to_string(),
            ":is_custom": exercise.is_custom,
            ":user_id": exercise.user_id,
            ":created_at": exercise.created_at.to_rfc3339(),
        },
    )
    .map_err(DbError::InsertFailed)?;
    Ok(())
}

#[derive(Default, Debug)]
pub struct ExerciseFilters<'a> {
    pub user_id: Option<&'a str>,
    pub category: Option<&'a str>,
    pub muscle: Option<&'a str>,
    pub search: Option<&'a str>,
    pub favorites_of: Option<&'a str>,
}

/// Lists catalog rows visible to the (optional) user, built-ins first, then
/// alphabetically by name. Category/muscle filters match inside the JSON
/// arrays; search matches name, alternate name and categories.
pub fn list_exercises_filtered(
    conn: &Connection,
    filters: ExerciseFilters,
) -> Result<Vec<Exercise>, DbError> {
    let mut sql = format!(
        "SELECT {} FROM exercises WHERE (is_custom = 0",
        EXERCISE_COLUMNS
    );
    let mut params_map: HashMap<String, Box<dyn ToSql>> = HashMap::new();

    if let Some(user) = filters.user_id {
        sql.push_str(" OR (is_custom = 1 AND user_id = :user)");
        params_map.insert(":user".into(), Box::new(user.to_string()));
    }
    sql.push(')');

    if let Some(cat) = filters.category {
        // JSON arrays are stored without spaces, so the quoted value matches exactly.
        sql.push_str(" AND categories LIKE :category");
        params_map.insert(":category".into(), Box::new(format!("%\"{}\"%", cat)));
    }
    if let Some(m) = filters.muscle {
        sql.push_str(" AND muscle_groups LIKE :muscle");
        params_map.insert(":muscle".into(), Box::new(format!("%\"{}\"%", m)));
    }
    if let Some(text) = filters.search {
        sql.push_str(" AND (name LIKE :search OR alt_name LIKE :search OR categories LIKE :search)");
        params_map.insert(":search".into(), Box::new(format!("%{}%", text)));
    }
    if let Some(fav_user) = filters.favorites_of {
        sql.push_str(" AND id IN (SELECT exercise_id FROM favorites WHERE user_id = :fav_user)");
        params_map.insert(":fav_user".into(), Box::new(fav_user.to_string()));
    }

    sql.push_str(" ORDER BY is_custom ASC, name COLLATE NOCASE ASC");

    let params_for_query: Vec<(&str, &dyn ToSql)> = params_map
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_ref()))
        .collect();

    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    let exercise_iter = stmt
        .query_map(params_for_query.as_slice(), map_row_to_exercise)
        .map_err(DbError::QueryFailed)?;

    exercise_iter
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

/// Retrieves an exercise by its exact id.
pub fn get_exercise_by_id(conn: &Connection, id: &str) -> Result<Option<Exercise>, DbError> {
    let sql = format!("SELECT {} FROM exercises WHERE id = ?1", EXERCISE_COLUMNS);
    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    stmt.query_row(params![id], map_row_to_exercise)
        .optional()
        .map_err(DbError::QueryFailed)
}

/// Retrieves an exercise by name or alternate name (case-insensitive) among
/// the rows visible to the user. Built-ins win over same-named custom rows.
pub fn get_exercise_by_name(
    conn: &Connection,
    name: &str,
    user_id: Option<&str>,
) -> Result<Option<Exercise>, DbError> {
    let mut sql = format!(
        "SELECT {} FROM exercises \
         WHERE (name = :name COLLATE NOCASE OR alt_name = :name COLLATE NOCASE) \
         AND (is_custom = 0",
        EXERCISE_COLUMNS
    );
    let mut params_map: HashMap<String, Box<dyn ToSql>> = HashMap::new();
    params_map.insert(":name".into(), Box::new(name.to_string()));
    if let Some(user) = user_id {
        sql.push_str(" OR (is_custom = 1 AND user_id = :user)");
        params_map.insert(":user".into(), Box::new(user.to_string()));
    }
    sql.push_str(") ORDER BY is_custom ASC, created_at ASC LIMIT 1");

    let params_for_query: Vec<(&str, &dyn ToSql)> = params_map
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_ref()))
        .collect();

    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    stmt.query_row(params_for_query.as_slice(), map_row_to_exercise)
        .optional()
        .map_err(DbError::QueryFailed)
}

#[derive(Default, Debug)]
pub struct ExerciseUpdate {
    pub name: Option<String>,
    pub alt_name: Option<Option<String>>,
    pub categories: Option<Vec<String>>,
    pub muscle_groups: Option<Vec<String>>,
    pub instructions: Option<Option<String>>,
    pub equipment: Option<Option<Vec<String>>>,
    pub difficulty: Option<Option<Difficulty>>,
    pub measurement: Option<Measurement>,
}

/// Applies the present fields of the update to an exercise row.
/// Ownership checks live in the service layer.
pub fn update_exercise(
    conn: &Connection,
    id: &str,
    update: &ExerciseUpdate,
) -> Result<u64, DbError> {
    let mut params_map: HashMap<String, Box<dyn ToSql>> = HashMap::new();
    let mut updates = Vec::new();

    if let Some(name) = &update.name {
        updates.push("name = :name");
        params_map.insert(":name".into(), Box::new(name.clone()));
    }
    if let Some(alt) = &update.alt_name {
        updates.push("alt_name = :alt_name");
        params_map.insert(":alt_name".into(), Box::new(alt.clone()));
    }
    if let Some(categories) = &update.categories {
        updates.push("categories = :categories");
        params_map.insert(
            ":categories".into(),
            Box::new(serde_json::to_string(categories)?),
        );
    }
    if let Some(muscles) = &update.muscle_groups {
        updates.push("muscle_groups = :muscle_groups");
        params_map.insert(
            ":muscle_groups".into(),
            Box::new(serde_json::to_string(muscles)?),
        );
    }
    if let Some(instructions) = &update.instructions {
        updates.push("instructions = :instructions");
        params_map.insert(":instructions".into(), Box::new(instructions.clone()));
    }
    if let Some(equipment) = &update.equipment {
        let encoded = match equipment {
            Some(list) => Some(serde_json::to_string(list)?),
            None => None,
        };
        updates.push("equipment = :equipment");
        params_map.insert(":equipment".into(), Box::new(encoded));
    }
    if let Some(difficulty) = &update.difficulty {
        updates.push("difficulty = :difficulty");
        params_map.insert(
            ":difficulty".into(),
            Box::new(difficulty.map(|d| d.to_string())),
        );
    }
    if let Some(measurement) = &update.measurement {
        updates.push("measurement = :measurement");
        params_map.insert(":measurement".into(), Box::new(measurement.to_string()));
    }

    if updates.is_empty() {
        return Ok(0);
    }

    let sql = format!("UPDATE exercises SET {} WHERE id = :id", updates.join(", "));
    params_map.insert(":id".into(), Box::new(id.to_string()));

    let params_for_exec: Vec<(&str, &dyn ToSql)> = params_map
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_ref()))
        .collect();

    let rows_affected = conn
        .execute(&sql, params_for_exec.as_slice())
        .map_err(DbError::UpdateFailed)?;

    if rows_affected == 0 {
        Err(DbError::ExerciseNotFound(id.to_string()))
    } else {
        Ok(rows_affected as u64)
    }
}

/// Deletes an exercise row; dependent progress/favorite/composition rows cascade.
pub fn delete_exercise(conn: &Connection, id: &str) -> Result<u64, DbError> {
    let rows_affected = conn
        .execute("DELETE FROM exercises WHERE id = ?1", params![id])
        .map_err(DbError::DeleteFailed)?;
    if rows_affected == 0 {
        Err(DbError::ExerciseNotFound(id.to_string()))
    } else {
        Ok(rows_affected as u64)
    }
}

/// Distinct sorted union of one JSON-array column over the rows visible to the user.
fn collect_distinct_list_values(
    conn: &Connection,
    column: &str,
    user_id: Option<&str>,
) -> Result<Vec<String>, DbError> {
    let mut sql = format!("SELECT {} FROM exercises WHERE (is_custom = 0", column);
    let mut params_map: HashMap<String, Box<dyn ToSql>> = HashMap::new();
    if let Some(user) = user_id {
        sql.push_str(" OR (is_custom = 1 AND user_id = :user)");
        params_map.insert(":user".into(), Box::new(user.to_string()));
    }
    sql.push(')');

    let params_for_query: Vec<(&str, &dyn ToSql)> = params_map
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_ref()))
        .collect();

    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    let list_iter = stmt
        .query_map(params_for_query.as_slice(), |row| {
            let raw: String = row.get(0)?;
            parse_string_list(0, &raw)
        })
        .map_err(DbError::QueryFailed)?;

    let mut values: Vec<String> = Vec::new();
    for list in list_iter {
        for value in list.map_err(DbError::QueryFailed)? {
            if !values.contains(&value) {
                values.push(value);
            }
        }
    }
    values.sort();
    Ok(values)
}

pub fn list_categories(conn: &Connection, user_id: Option<&str>) -> Result<Vec<String>, DbError> {
    collect_distinct_list_values(conn, "categories", user_id)
}

pub fn list_muscle_groups(
    conn: &Connection,
    user_id: Option<&str>,
) -> Result<Vec<String>, DbError> {
    collect_distinct_list_values(conn, "muscle_groups", user_id)
}

// --- Favorite functions ---

/// Marks an exercise as a favorite; inserting twice leaves a single row.
pub fn add_favorite(conn: &Connection, user_id: &str, exercise_id: &str) -> Result<bool, DbError> {
    let rows = conn
        .execute(
            "INSERT OR IGNORE INTO favorites (user_id, exercise_id, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, exercise_id, Utc::now().to_rfc3339()],
        )
        .map_err(DbError::InsertFailed)?;
    Ok(rows > 0)
}

/// Removes a favorite mark; removing an absent one is a no-op.
pub fn remove_favorite(
    conn: &Connection,
    user_id: &str,
    exercise_id: &str,
) -> Result<bool, DbError> {
    let rows = conn
        .execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND exercise_id = ?2",
            params![user_id, exercise_id],
        )
        .map_err(DbError::DeleteFailed)?;
    Ok(rows > 0)
}

pub fn is_favorite(conn: &Connection, user_id: &str, exercise_id: &str) -> Result<bool, DbError> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = ?1 AND exercise_id = ?2)",
        params![user_id, exercise_id],
        |row| row.get(0),
    )
    .map_err(DbError::QueryFailed)
}

/// Favorite exercise ids for a user, most recently marked first.
pub fn list_favorite_ids(conn: &Connection, user_id: &str) -> Result<Vec<String>, DbError> {
    let mut stmt = conn
        .prepare("SELECT exercise_id FROM favorites WHERE user_id = ?1 ORDER BY created_at DESC")
        .map_err(DbError::QueryFailed)?;
    let id_iter = stmt
        .query_map(params![user_id], |row| row.get(0))
        .map_err(DbError::QueryFailed)?;
    id_iter
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

// --- Workout functions ---

fn map_row_to_workout(row: &Row) -> Result<Workout, rusqlite::Error> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let date_str: String = row.get(2)?;
    let duration_minutes: Option<i64> = row.get(3)?;
    let notes: Option<String> = row.get(4)?;
    let tags_str: Option<String> = row.get(5)?;
    let completed: bool = row.get(6)?;
    let template_id: Option<String> = row.get(7)?;
    let display_order: i64 = row.get(8)?;
    let is_active: bool = row.get(9)?;
    let created_at_str: String = row.get(10)?;

    let date = parse_timestamp(2, &date_str)?;
    let tags = match tags_str {
        Some(s) => Some(parse_string_list(5, &s)?),
        None => None,
    };
    let created_at = parse_timestamp(10, &created_at_str)?;

    Ok(Workout {
        id,
        name,
        date,
        duration_minutes,
        notes,
        tags,
        completed,
        template_id,
        display_order,
        is_active,
        created_at,
    })
}

const WORKOUT_COLUMNS: &str = "id, name, date, duration_minutes, notes, tags, completed, \
     template_id, display_order, is_active, created_at";

/// Inserts a fully built workout row.
pub fn insert_workout(conn: &Connection, workout: &Workout) -> Result<(), DbError> {
    let tags = match &workout.tags {
        Some(list) => Some(serde_json::to_string(list)?),
        None => None,
    };
    conn.execute(
        "INSERT INTO workouts (id, name, date, duration_minutes, notes, tags, completed, \
         template_id, display_order, is_active, created_at) \
         VALUES (:id, :name, :date, :duration, :notes, :tags, :completed, :template_id, \
         :display_order, :is_active, :created_at)",
        named_params! {
            ":id": workout.id,
            ":name": workout.name,
            ":date": workout.date.to_rfc3339(),
            ":duration": workout.duration_minutes,
            ":notes": workout.notes,
            ":tags": tags,
            ":completed": workout.completed,
            ":template_id": workout.template_id,
            ":display_order": workout.display_order,
            ":is_active": workout.is_active,
            ":created_at": workout.created_at.to_rfc3339(),
        },
    )
    .map_err(DbError::InsertFailed)?;
    Ok(())
}

/// Lists every workout in manual display order; ties fall back to newest first.
pub fn list_workouts(conn: &Connection) -> Result<Vec<Workout>, DbError> {
    let sql = format!(
        "SELECT {} FROM workouts ORDER BY display_order ASC, created_at DESC",
        WORKOUT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    let workout_iter = stmt
        .query_map([], map_row_to_workout)
        .map_err(DbError::QueryFailed)?;
    workout_iter
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

pub fn get_workout_by_id(conn: &Connection, id: &str) -> Result<Option<Workout>, DbError> {
    let sql = format!("SELECT {} FROM workouts WHERE id = ?1", WORKOUT_COLUMNS);
    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    stmt.query_row(params![id], map_row_to_workout)
        .optional()
        .map_err(DbError::QueryFailed)
}

/// Retrieves the most recently created workout with the given name (case-insensitive).
pub fn get_workout_by_name(conn: &Connection, name: &str) -> Result<Option<Workout>, DbError> {
    let sql = format!(
        "SELECT {} FROM workouts WHERE name = ?1 COLLATE NOCASE \
         ORDER BY created_at DESC LIMIT 1",
        WORKOUT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    stmt.query_row(params![name], map_row_to_workout)
        .optional()
        .map_err(DbError::QueryFailed)
}

#[derive(Default, Debug)]
pub struct WorkoutUpdate {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<Option<i64>>,
    pub notes: Option<Option<String>>,
    pub tags: Option<Option<Vec<String>>>,
    pub completed: Option<bool>,
}

/// Applies the present fields of the update to a workout row.
pub fn update_workout(conn: &Connection, id: &str, update: &WorkoutUpdate) -> Result<u64, DbError> {
    let mut params_map: HashMap<String, Box<dyn ToSql>> = HashMap::new();
    let mut updates = Vec::new();

    if let Some(name) = &update.name {
        updates.push("name = :name");
        params_map.insert(":name".into(), Box::new(name.clone()));
    }
    if let Some(date) = &update.date {
        updates.push("date = :date");
        params_map.insert(":date".into(), Box::new(date.to_rfc3339()));
    }
    if let Some(duration) = &update.duration_minutes {
        updates.push("duration_minutes = :duration");
        params_map.insert(":duration".into(), Box::new(*duration));
    }
    if let Some(notes) = &update.notes {
        updates.push("notes = :notes");
        params_map.insert(":notes".into(), Box::new(notes.clone()));
    }
    if let Some(tags) = &update.tags {
        let encoded = match tags {
            Some(list) => Some(serde_json::to_string(list)?),
            None => None,
        };
        updates.push("tags = :tags");
        params_map.insert(":tags".into(), Box::new(encoded));
    }
    if let Some(completed) = update.completed {
        updates.push("completed = :completed");
        params_map.insert(":completed".into(), Box::new(completed));
    }

    if updates.is_empty() {
        return Ok(0);
    }

    let sql = format!("UPDATE workouts SET {} WHERE id = :id", updates.join(", "));
    params_map.insert(":id".into(), Box::new(id.to_string()));

    let params_for_exec: Vec<(&str, &dyn ToSql)> = params_map
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_ref()))
        .collect();

    let rows_affected = conn
        .execute(&sql, params_for_exec.as_slice())
        .map_err(DbError::UpdateFailed)?;

    if rows_affected == 0 {
        Err(DbError::WorkoutNotFound(id.to_string()))
    } else {
        Ok(rows_affected as u64)
    }
}

/// Deletes a workout; composition, set and history rows fall to cascades.
pub fn delete_workout(conn: &Connection, id: &str) -> Result<u64, DbError> {
    let rows_affected = conn
        .execute("DELETE FROM workouts WHERE id = ?1", params![id])
        .map_err(DbError::DeleteFailed)?;
    if rows_affected == 0 {
        Err(DbError::WorkoutNotFound(id.to_string()))
    } else {
        Ok(rows_affected as u64)
    }
}

pub fn count_workouts(conn: &Connection) -> Result<i64, DbError> {
    conn.query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))
        .map_err(DbError::QueryFailed)
}

/// Rewrites display_order as the position of each id in the given full ordering.
/// Ids that no longer exist are skipped silently.
pub fn reorder_workouts(conn: &Connection, ordered_ids: &[String]) -> Result<(), DbError> {
    let mut stmt = conn
        .prepare("UPDATE workouts SET display_order = ?1 WHERE id = ?2")
        .map_err(DbError::QueryFailed)?;
    for (index, id) in ordered_ids.iter().enumerate() {
        stmt.execute(params![index as i64, id])
            .map_err(DbError::UpdateFailed)?;
    }
    Ok(())
}

/// Makes the given workout the single active one: clears every active flag,
/// then sets the target's.
pub fn set_active_workout(conn: &Connection, id: &str) -> Result<(), DbError> {
    conn.execute("UPDATE workouts SET is_active = 0 WHERE is_active = 1", [])
        .map_err(DbError::UpdateFailed)?;
    let rows = conn
        .execute(
            "UPDATE workouts SET is_active = 1 WHERE id = ?1",
            params![id],
        )
        .map_err(DbError::UpdateFailed)?;
    if rows == 0 {
        Err(DbError::WorkoutNotFound(id.to_string()))
    } else {
        Ok(())
    }
}

pub fn get_active_workout(conn: &Connection) -> Result<Option<Workout>, DbError> {
    let sql = format!(
        "SELECT {} FROM workouts WHERE is_active = 1 LIMIT 1",
        WORKOUT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    stmt.query_row([], map_row_to_workout)
        .optional()
        .map_err(DbError::QueryFailed)
}

pub fn clear_active_workout(conn: &Connection) -> Result<(), DbError> {
    conn.execute("UPDATE workouts SET is_active = 0 WHERE is_active = 1", [])
        .map_err(DbError::UpdateFailed)?;
    Ok(())
}

// --- Workout composition (exercise entries + sets) ---

fn target_columns(target: SetTarget) -> (Option<i64>, Option<i64>, Option<f64>) {
    match target {
        SetTarget::Reps(reps) => (Some(reps), None, None),
        SetTarget::Time(secs) => (None, Some(secs), None),
        SetTarget::Distance(meters) => (None, None, Some(meters)),
    }
}

fn assemble_target(
    kind: Measurement,
    reps: Option<i64>,
    duration: Option<i64>,
    distance: Option<f64>,
) -> SetTarget {
    match kind {
        Measurement::Reps => SetTarget::Reps(reps.unwrap_or(0)),
        Measurement::Time => SetTarget::Time(duration.unwrap_or(0)),
        Measurement::Distance => SetTarget::Distance(distance.unwrap_or(0.0)),
    }
}

fn assemble_actual(
    kind: Measurement,
    reps: Option<i64>,
    duration: Option<i64>,
    distance: Option<f64>,
) -> Option<SetTarget> {
    match kind {
        Measurement::Reps => reps.map(SetTarget::Reps),
        Measurement::Time => duration.map(SetTarget::Time),
        Measurement::Distance => distance.map(SetTarget::Distance),
    }
}

/// Replaces the full exercise list of a workout: deletes every prior entry
/// (sets cascade) and reinserts the given ordered entries with fresh ids.
/// Deliberately not transactional; a mid-batch failure leaves earlier inserts
/// in place.
pub fn save_workout_exercises(
    conn: &Connection,
    workout_id: &str,
    entries: &[ExerciseEntry],
) -> Result<(), DbError> {
    conn.execute(
        "DELETE FROM workout_exercises WHERE workout_id = ?1",
        params![workout_id],
    )
    .map_err(DbError::DeleteFailed)?;

    let mut entry_stmt = conn
        .prepare(
            "INSERT INTO workout_exercises (id, workout_id, exercise_id, exercise_order, \
             superset_group, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .map_err(DbError::QueryFailed)?;
    let mut set_stmt = conn
        .prepare(
            "INSERT INTO workout_sets (id, workout_exercise_id, set_order, reps, duration_secs, \
             distance_m, weight, rpe, tempo, rest_secs, completed, notes, actual_reps, \
             actual_duration_secs, actual_distance_m, actual_weight) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )
        .map_err(DbError::QueryFailed)?;

    for (order, entry) in entries.iter().enumerate() {
        let entry_id = generate_id("we");
        entry_stmt
            .execute(params![
                entry_id,
                workout_id,
                entry.exercise.id,
                order as i64,
                entry.superset_group,
                entry.notes,
            ])
            .map_err(DbError::InsertFailed)?;

        for (set_order, set) in entry.sets.iter().enumerate() {
            let set_id = generate_id("ws");
            let (reps, duration, distance) = target_columns(set.target);
            let (actual_reps, actual_duration, actual_distance) = match set.actual {
                Some(actual) => target_columns(actual),
                None => (None, None, None),
            };
            set_stmt
                .execute(params![
                    set_id,
                    entry_id,
                    set_order as i64,
                    reps,
                    duration,
                    distance,
                    set.weight,
                    set.rpe,
                    set.tempo,
                    set.rest_secs,
                    set.completed,
                    set.notes,
                    actual_reps,
                    actual_duration,
                    actual_distance,
                    set.actual_weight,
                ])
                .map_err(DbError::InsertFailed)?;
        }
    }

    Ok(())
}

fn map_row_to_set(kind: Measurement, row: &Row) -> Result<WorkoutSet, rusqlite::Error> {
    let reps: Option<i64> = row.get(1)?;
    let duration: Option<i64> = row.get(2)?;
    let distance: Option<f64> = row.get(3)?;
    let actual_reps: Option<i64> = row.get(10)?;
    let actual_duration: Option<i64> = row.get(11)?;
    let actual_distance: Option<f64> = row.get(12)?;

    Ok(WorkoutSet {
        id: row.get(0)?,
        target: assemble_target(kind, reps, duration, distance),
        weight: row.get(4)?,
        rpe: row.get(5)?,
        tempo: row.get(6)?,
        rest_secs: row.get(7)?,
        completed: row.get(8)?,
        notes: row.get(9)?,
        actual: assemble_actual(kind, actual_reps, actual_duration, actual_distance),
        actual_weight: row.get(13)?,
    })
}

fn list_sets_for_entry(
    conn: &Connection,
    workout_exercise_id: &str,
    kind: Measurement,
) -> Result<Vec<WorkoutSet>, DbError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, reps, duration_secs, distance_m, weight, rpe, tempo, rest_secs, \
             completed, notes, actual_reps, actual_duration_secs, actual_distance_m, \
             actual_weight FROM workout_sets WHERE workout_exercise_id = ?1 \
             ORDER BY set_order ASC",
        )
        .map_err(DbError::QueryFailed)?;
    let set_iter = stmt
        .query_map(params![workout_exercise_id], |row| map_row_to_set(kind, row))
        .map_err(DbError::QueryFailed)?;
    set_iter
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

/// Loads a workout's ordered entries with their exercises and sets.
/// An entry whose exercise row has vanished is skipped.
pub fn get_workout_exercises(
    conn: &Connection,
    workout_id: &str,
) -> Result<Vec<ExerciseEntry>, DbError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, exercise_id, superset_group, notes FROM workout_exercises \
             WHERE workout_id = ?1 ORDER BY exercise_order ASC",
        )
        .map_err(DbError::QueryFailed)?;
    let row_iter = stmt
        .query_map(params![workout_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })
        .map_err(DbError::QueryFailed)?;
    let rows = row_iter
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)?;

    let mut entries = Vec::with_capacity(rows.len());
    for (entry_id, exercise_id, superset_group, notes) in rows {
        let exercise = match get_exercise_by_id(conn, &exercise_id)? {
            Some(exercise) => exercise,
            None => continue,
        };
        let sets = list_sets_for_entry(conn, &entry_id, exercise.measurement)?;
        entries.push(ExerciseEntry {
            exercise,
            superset_group,
            notes,
            sets,
        });
    }
    Ok(entries)
}

/// Point-writes one set's actual values and completed flag by set id.
/// A stale (regenerated) id affects zero rows, which is fine.
pub fn update_set_results(conn: &Connection, set: &WorkoutSet) -> Result<u64, DbError> {
    let (actual_reps, actual_duration, actual_distance) = match set.actual {
        Some(actual) => target_columns(actual),
        None => (None, None, None),
    };
    let rows = conn
        .execute(
            "UPDATE workout_sets SET actual_reps = :a_reps, actual_duration_secs = :a_duration, \
             actual_distance_m = :a_distance, actual_weight = :a_weight, completed = :completed \
             WHERE id = :id",
            named_params! {
                ":a_reps": actual_reps,
                ":a_duration": actual_duration,
                ":a_distance": actual_distance,
                ":a_weight": set.actual_weight,
                ":completed": set.completed,
                ":id": set.id,
            },
        )
        .map_err(DbError::UpdateFailed)?;
    Ok(rows as u64)
}

// --- History functions ---

fn map_row_to_history(row: &Row) -> Result<WorkoutHistoryEntry, rusqlite::Error> {
    let completed_at_str: String = row.get(3)?;
    Ok(WorkoutHistoryEntry {
        id: row.get(0)?,
        workout_id: row.get(1)?,
        workout_name: row.get(2)?,
        completed_at: parse_timestamp(3, &completed_at_str)?,
        duration_minutes: row.get(4)?,
        performance_notes: row.get(5)?,
    })
}

pub fn insert_workout_history(
    conn: &Connection,
    id: &str,
    workout_id: &str,
    user_id: &str,
    completed_at: DateTime<Utc>,
    duration_minutes: i64,
    performance_notes: Option<&str>,
) -> Result<(), DbError> {
    conn.execute(
        "INSERT INTO workout_history (id, workout_id, user_id, completed_at, duration_minutes, \
         performance_notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            workout_id,
            user_id,
            completed_at.to_rfc3339(),
            duration_minutes,
            performance_notes,
        ],
    )
    .map_err(DbError::InsertFailed)?;
    Ok(())
}

/// Completed sessions, most recent first.
pub fn list_workout_history(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<WorkoutHistoryEntry>, DbError> {
    let mut sql = "SELECT h.id, h.workout_id, w.name, h.completed_at, h.duration_minutes, \
         h.performance_notes FROM workout_history h \
         JOIN workouts w ON w.id = h.workout_id \
         ORDER BY h.completed_at DESC"
        .to_string();
    let mut params_map: HashMap<String, Box<dyn ToSql>> = HashMap::new();
    if let Some(limit) = limit {
        sql.push_str(" LIMIT :limit");
        params_map.insert(":limit".into(), Box::new(limit));
    }

    let params_for_query: Vec<(&str, &dyn ToSql)> = params_map
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_ref()))
        .collect();

    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    let history_iter = stmt
        .query_map(params_for_query.as_slice(), map_row_to_history)
        .map_err(DbError::QueryFailed)?;
    history_iter
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

pub fn get_workout_history_entry(
    conn: &Connection,
    id: &str,
) -> Result<Option<WorkoutHistoryEntry>, DbError> {
    let mut stmt = conn
        .prepare(
            "SELECT h.id, h.workout_id, w.name, h.completed_at, h.duration_minutes, \
             h.performance_notes FROM workout_history h \
             JOIN workouts w ON w.id = h.workout_id WHERE h.id = ?1",
        )
        .map_err(DbError::QueryFailed)?;
    stmt.query_row(params![id], map_row_to_history)
        .optional()
        .map_err(DbError::QueryFailed)
}

/// Every session completion timestamp, oldest first. Feeds the derived stats.
pub fn list_history_timestamps(conn: &Connection) -> Result<Vec<DateTime<Utc>>, DbError> {
    let mut stmt = conn
        .prepare("SELECT completed_at FROM workout_history ORDER BY completed_at ASC")
        .map_err(DbError::QueryFailed)?;
    let timestamp_iter = stmt
        .query_map([], |row| {
            let timestamp_str: String = row.get(0)?;
            parse_timestamp(0, &timestamp_str)
        })
        .map_err(DbError::QueryFailed)?;
    timestamp_iter
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

// --- Exercise progress functions ---

#[allow(clippy::too_many_arguments)]
pub fn insert_exercise_progress(
    conn: &Connection,
    id: &str,
    exercise_id: &str,
    user_id: &str,
    date: DateTime<Utc>,
    max_weight: f64,
    total_volume: f64,
    estimated_one_rep_max: Option<f64>,
    personal_record: bool,
) -> Result<(), DbError> {
    conn.execute(
        "INSERT INTO exercise_progress (id, exercise_id, user_id, date, max_weight, \
         total_volume, estimated_one_rep_max, personal_record) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            exercise_id,
            user_id,
            date.to_rfc3339(),
            max_weight,
            total_volume,
            estimated_one_rep_max,
            personal_record,
        ],
    )
    .map_err(DbError::InsertFailed)?;
    Ok(())
}

/// Highest max_weight recorded for an exercise across all progress rows.
pub fn max_recorded_weight(conn: &Connection, exercise_id: &str) -> Result<Option<f64>, DbError> {
    conn.query_row(
        "SELECT MAX(max_weight) FROM exercise_progress WHERE exercise_id = ?1",
        params![exercise_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(DbError::QueryFailed)
    // The query returns Option<Option<f64>>, flatten it
    .map(|opt_opt| opt_opt.flatten())
}

/// Progress rows for an exercise, most recent first, each joined to the name
/// of the workout completed on the same calendar day (if any).
pub fn list_progress_for_exercise(
    conn: &Connection,
    exercise_id: &str,
) -> Result<Vec<ProgressEntry>, DbError> {
    let mut stmt = conn
        .prepare(
            "SELECT p.id, p.exercise_id, p.date, p.max_weight, p.total_volume, \
             p.estimated_one_rep_max, p.personal_record, \
             (SELECT w.name FROM workout_history h \
                JOIN workouts w ON w.id = h.workout_id \
                WHERE h.user_id = p.user_id AND date(h.completed_at) = date(p.date) \
                ORDER BY h.completed_at DESC LIMIT 1) AS workout_name \
             FROM exercise_progress p WHERE p.exercise_id = ?1 ORDER BY p.date DESC",
        )
        .map_err(DbError::QueryFailed)?;
    let progress_iter = stmt
        .query_map(params![exercise_id], |row| {
            let date_str: String = row.get(2)?;
            Ok(ProgressEntry {
                id: row.get(0)?,
                exercise_id: row.get(1)?,
                date: parse_timestamp(2, &date_str)?,
                max_weight: row.get(3)?,
                total_volume: row.get(4)?,
                estimated_one_rep_max: row.get(5)?,
                personal_record: row.get(6)?,
                workout_name: row.get(7)?,
            })
        })
        .map_err(DbError::QueryFailed)?;
    progress_iter
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use fortivo_lib::{
    AppService, Config, DbError, Exercise, ExerciseUpdate, Measurement, NewExercise, SessionError,
    SetTarget, StandardColor, Units, WorkoutDraft, WorkoutUpdate,
};

// Helper function to create a test service with in-memory database
fn create_test_service() -> Result<AppService> {
    // Create an in-memory database for testing
    let conn = rusqlite::Connection::open_in_memory()?;
    fortivo_lib::db::init_db(&conn)?;

    // Create a default config for testing
    let config = Config {
        units: Units::Metric,
        notify_pr: true,
        ..Default::default()
    };

    let service = AppService {
        config,
        conn,
        db_path: ":memory:".into(),
        config_path: "test_config.toml".into(),
    };
    service.seed_builtin_exercises()?;
    Ok(service)
}

#[test]
fn test_seed_catalog_idempotent() -> Result<()> {
    let service = create_test_service()?;

    // Seeding ran during setup; running it again must not touch anything
    let reseeded = service.seed_builtin_exercises()?;
    assert_eq!(reseeded, 0);

    let exercises = service.list_exercises()?;
    assert_eq!(exercises.len(), fortivo_lib::seed::BUILTIN_EXERCISES.len());
    assert!(exercises.iter().all(|e| !e.is_custom));

    Ok(())
}

#[test]
fn test_reseed_restores_missing_builtins() -> Result<()> {
    let service = create_test_service()?;

    // Keep a custom exercise around to prove reseeding leaves it alone
    let custom = service.create_exercise(NewExercise {
        name: "Paused Bench Press",
        ..Default::default()
    })?;

    // Simulate a catalog that no longer matches the bundled dataset
    service
        .conn
        .execute("DELETE FROM exercises WHERE id = 'ex_barbell_bench_press'", [])?;

    let reseeded = service.seed_builtin_exercises()?;
    assert_eq!(reseeded, fortivo_lib::seed::BUILTIN_EXERCISES.len());

    // The built-in is back and the custom one survived
    assert!(service.resolve_exercise("ex_barbell_bench_press")?.is_some());
    assert!(service.resolve_exercise(&custom.id)?.is_some());

    Ok(())
}

#[test]
fn test_list_exercises_order() -> Result<()> {
    let service = create_test_service()?;

    service.create_exercise(NewExercise {
        name: "Archer Push-Up",
        ..Default::default()
    })?;

    let exercises = service.list_exercises()?;
    // Built-ins come first even though "Archer Push-Up" sorts before them
    assert!(!exercises[0].is_custom);
    let last = exercises.last().unwrap();
    assert_eq!(last.name, "Archer Push-Up");
    assert!(last.is_custom);

    Ok(())
}

#[test]
fn test_category_and_muscle_filters() -> Result<()> {
    let service = create_test_service()?;

    let chest = service.exercises_by_category("chest")?;
    assert!(!chest.is_empty());
    assert!(chest
        .iter()
        .all(|e| e.categories.iter().any(|c| c == "chest")));

    let quads = service.exercises_by_muscle("quadriceps")?;
    assert!(!quads.is_empty());
    assert!(quads
        .iter()
        .all(|e| e.muscle_groups.iter().any(|m| m == "quadriceps")));

    Ok(())
}

#[test]
fn test_search_matches_alternate_names() -> Result<()> {
    let service = create_test_service()?;

    // Polish alternate names are searchable too
    let results = service.search_exercises("martwy")?;
    assert!(results.iter().any(|e| e.name == "Deadlift"));
    assert!(results.iter().all(|e| {
        e.alt_name
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains("martwy"))
    }));

    // An empty query falls back to the full listing
    let all = service.search_exercises("  ")?;
    assert_eq!(all.len(), fortivo_lib::seed::BUILTIN_EXERCISES.len());

    Ok(())
}

#[test]
fn test_resolve_exercise_by_id_name_and_alt() -> Result<()> {
    let service = create_test_service()?;

    // Name matching is case-insensitive
    let by_name = service.resolve_exercise("deadlift")?.unwrap();
    assert_eq!(by_name.id, "ex_deadlift");

    let by_id = service.resolve_exercise("ex_deadlift")?.unwrap();
    assert_eq!(by_id.name, "Deadlift");

    let by_alt = service.resolve_exercise("Martwy ciąg")?.unwrap();
    assert_eq!(by_alt.name, "Deadlift");

    assert!(service.resolve_exercise("No Such Movement")?.is_none());

    // Blank identifiers are rejected outright
    assert!(service.resolve_exercise("   ").is_err());

    Ok(())
}

#[test]
fn test_create_exercise_requires_name() -> Result<()> {
    let service = create_test_service()?;

    let result = service.create_exercise(NewExercise {
        name: "   ",
        ..Default::default()
    });
    assert!(result.is_err());

    Ok(())
}

#[test]
fn test_edit_custom_exercise() -> Result<()> {
    let service = create_test_service()?;

    service.create_exercise(NewExercise {
        name: "Paused Bench Press",
        categories: vec!["chest".to_string()],
        muscle_groups: vec!["pectorals".to_string()],
        ..Default::default()
    })?;

    // Edit the exercise
    let update = ExerciseUpdate {
        name: Some("Paused Barbell Bench Press".to_string()),
        muscle_groups: Some(vec!["pectorals".to_string(), "triceps".to_string()]),
        ..Default::default()
    };
    let rows = service.update_custom_exercise("Paused Bench Press", &update)?;
    assert_eq!(rows, 1);

    // Verify changes; untouched fields keep their values
    let exercise = service
        .resolve_exercise("Paused Barbell Bench Press")?
        .unwrap();
    assert_eq!(
        exercise.muscle_groups,
        vec!["pectorals".to_string(), "triceps".to_string()]
    );
    assert_eq!(exercise.categories, vec!["chest".to_string()]);

    Ok(())
}

#[test]
fn test_builtin_exercises_cannot_be_edited_or_deleted() -> Result<()> {
    let service = create_test_service()?;

    let update = ExerciseUpdate {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let result = service.update_custom_exercise("Deadlift", &update);
    assert!(result.is_err());
    match result.unwrap_err().downcast_ref::<DbError>() {
        Some(DbError::ExerciseNotOwned(_)) => (),
        _ => panic!("Expected ExerciseNotOwned error"),
    }

    let result = service.delete_custom_exercise("Deadlift");
    assert!(result.is_err());

    Ok(())
}

#[test]
fn test_foreign_custom_exercise_cannot_be_edited_or_deleted() -> Result<()> {
    let service = create_test_service()?;

    // A custom exercise owned by somebody else, reachable only by id
    let foreign = Exercise {
        id: fortivo_lib::db::generate_id("ex"),
        name: "Partner Carry".to_string(),
        alt_name: None,
        categories: vec!["full body".to_string()],
        muscle_groups: vec!["core".to_string()],
        instructions: None,
        equipment: None,
        difficulty: None,
        measurement: Measurement::Reps,
        is_custom: true,
        user_id: Some("someone-else".to_string()),
        created_at: Utc::now(),
    };
    fortivo_lib::db::insert_exercise(&service.conn, &foreign)?;

    let update = ExerciseUpdate {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let result = service.update_custom_exercise(&foreign.id, &update);
    assert!(result.is_err());
    match result.unwrap_err().downcast_ref::<DbError>() {
        Some(DbError::ExerciseNotOwned(_)) => (),
        _ => panic!("Expected ExerciseNotOwned error"),
    }

    let result = service.delete_custom_exercise(&foreign.id);
    assert!(result.is_err());
    match result.unwrap_err().downcast_ref::<DbError>() {
        Some(DbError::ExerciseNotOwned(_)) => (),
        _ => panic!("Expected ExerciseNotOwned error"),
    }

    // The row itself is untouched
    let stored = fortivo_lib::db::get_exercise_by_id(&service.conn, &foreign.id)?;
    assert_eq!(stored.map(|e| e.name), Some("Partner Carry".to_string()));

    Ok(())
}

#[test]
fn test_delete_custom_exercise() -> Result<()> {
    let service = create_test_service()?;

    service.create_exercise(NewExercise {
        name: "Paused Bench Press",
        ..Default::default()
    })?;

    let rows = service.delete_custom_exercise("Paused Bench Press")?;
    assert_eq!(rows, 1);

    // Verify it's gone
    assert!(service.resolve_exercise("Paused Bench Press")?.is_none());

    Ok(())
}

#[test]
fn test_favorites_toggle() -> Result<()> {
    let service = create_test_service()?;
    let deadlift = service.resolve_exercise("Deadlift")?.unwrap();

    // First toggle adds, second removes
    assert!(service.toggle_favorite("Deadlift")?);
    assert!(service.is_favorite(&deadlift.id)?);

    let favorites = service.favorite_exercises()?;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].name, "Deadlift");

    assert!(!service.toggle_favorite("Deadlift")?);
    assert!(!service.is_favorite(&deadlift.id)?);
    assert!(service.favorite_exercises()?.is_empty());

    Ok(())
}

#[test]
fn test_favorite_double_insert_leaves_one_row() -> Result<()> {
    let service = create_test_service()?;
    let bench = service.resolve_exercise("Barbell Bench Press")?.unwrap();
    let user = service.config.user_id.clone();

    // Only the first insert writes a row
    assert!(fortivo_lib::db::add_favorite(&service.conn, &user, &bench.id)?);
    assert!(!fortivo_lib::db::add_favorite(&service.conn, &user, &bench.id)?);

    let rows: i64 = service.conn.query_row(
        "SELECT COUNT(*) FROM favorites WHERE user_id = ?1 AND exercise_id = ?2",
        rusqlite::params![user, bench.id],
        |row| row.get(0),
    )?;
    assert_eq!(rows, 1);
    assert!(service.is_favorite(&bench.id)?);

    Ok(())
}

#[test]
fn test_list_categories_and_muscles() -> Result<()> {
    let service = create_test_service()?;

    let categories = service.list_categories()?;
    assert!(categories.iter().any(|c| c == "chest"));
    // Sorted and deduplicated
    let mut sorted = categories.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(categories, sorted);

    // Custom exercises contribute their values too
    service.create_exercise(NewExercise {
        name: "Neck Curl",
        categories: vec!["neck".to_string()],
        muscle_groups: vec!["neck".to_string()],
        ..Default::default()
    })?;
    assert!(service.list_categories()?.iter().any(|c| c == "neck"));
    assert!(service.list_muscle_groups()?.iter().any(|m| m == "neck"));

    Ok(())
}

#[test]
fn test_create_and_list_workouts() -> Result<()> {
    let service = create_test_service()?;

    let push = service.create_workout(
        "Push Day",
        Some("Heavy pressing".to_string()),
        Some(vec!["push".to_string()]),
    )?;
    let pull = service.create_workout("Pull Day", None, None)?;

    // New workouts are appended to the end of the list
    assert_eq!(push.display_order, 0);
    assert_eq!(pull.display_order, 1);

    let workouts = service.list_workouts()?;
    assert_eq!(workouts.len(), 2);
    assert_eq!(workouts[0].name, "Push Day");
    assert_eq!(workouts[1].name, "Pull Day");

    Ok(())
}

#[test]
fn test_edit_workout() -> Result<()> {
    let service = create_test_service()?;

    let workout = service.create_workout("Push Day", Some("old notes".to_string()), None)?;

    let update = WorkoutUpdate {
        name: Some("Push A".to_string()),
        notes: Some(None), // Clear the notes
        ..Default::default()
    };
    let rows = service.update_workout(&workout.id, &update)?;
    assert_eq!(rows, 1);

    let reloaded = service.get_workout(&workout.id)?.unwrap();
    assert_eq!(reloaded.name, "Push A");
    assert!(reloaded.notes.is_none());

    Ok(())
}

#[test]
fn test_workout_not_found() -> Result<()> {
    let service = create_test_service()?;

    let update = WorkoutUpdate {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let result = service.update_workout("workout_missing", &update);
    assert!(result.is_err());

    let result = service.delete_workout("workout_missing");
    assert!(result.is_err());

    Ok(())
}

#[test]
fn test_workout_composition_round_trip() -> Result<()> {
    let service = create_test_service()?;

    let workout = service.create_workout("Full Body", None, None)?;
    let bench = service.resolve_exercise("Barbell Bench Press")?.unwrap();
    let plank = service.resolve_exercise("Plank")?.unwrap();
    let run = service.resolve_exercise("Running")?.unwrap();

    let mut draft = WorkoutDraft::default();
    draft.add_exercise(bench.clone());
    draft.add_exercise(plank.clone());
    draft.add_exercise(run.clone());

    // Customize the bench plan, then grow it to three sets
    {
        let entry = &mut draft.exercises[0];
        entry.sets[0].target = SetTarget::Reps(5);
        entry.sets[0].weight = Some(100.0);
    }
    draft.add_set(&bench.id)?;
    draft.add_set(&bench.id)?;

    service.save_workout_exercises(&workout.id, &draft.exercises)?;

    let entries = service.workout_exercises(&workout.id)?;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].exercise.name, "Barbell Bench Press");
    assert_eq!(entries[0].sets.len(), 3);
    // Added sets clone the plan of the last one
    assert_eq!(entries[0].sets[1].target, SetTarget::Reps(5));
    assert_eq!(entries[0].sets[1].weight, Some(100.0));
    // Each measurement kind persists through its own column
    assert_eq!(entries[1].sets[0].target, SetTarget::Time(30));
    assert_eq!(entries[2].sets[0].target, SetTarget::Distance(1000.0));

    // Saving replaces the whole composition
    service.save_workout_exercises(&workout.id, &entries[..1])?;
    assert_eq!(service.workout_exercises(&workout.id)?.len(), 1);

    Ok(())
}

#[test]
fn test_reorder_workouts() -> Result<()> {
    let service = create_test_service()?;

    let a = service.create_workout("A", None, None)?;
    let b = service.create_workout("B", None, None)?;
    let c = service.create_workout("C", None, None)?;

    service.reorder_workouts(&[c.id.clone(), a.id.clone(), b.id.clone()])?;

    let workouts = service.list_workouts()?;
    let names: Vec<&str> = workouts.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["C", "A", "B"]);
    assert_eq!(workouts[0].display_order, 0);
    assert_eq!(workouts[2].display_order, 2);

    Ok(())
}

#[test]
fn test_active_workout_is_exclusive() -> Result<()> {
    let service = create_test_service()?;

    let push = service.create_workout("Push", None, None)?;
    let pull = service.create_workout("Pull", None, None)?;

    service.start_workout(&push.id)?;
    assert_eq!(service.active_workout()?.unwrap().id, push.id);

    // Starting another workout displaces the first
    service.start_workout(&pull.id)?;
    assert_eq!(service.active_workout()?.unwrap().id, pull.id);
    assert!(!service.get_workout(&push.id)?.unwrap().is_active);

    service.cancel_active_workout()?;
    assert!(service.active_workout()?.is_none());

    Ok(())
}

#[test]
fn test_finish_session_records_everything() -> Result<()> {
    let service = create_test_service()?;

    let workout = service.create_workout("Push Day", None, None)?;
    let bench = service.resolve_exercise("Barbell Bench Press")?.unwrap();

    let mut draft = WorkoutDraft::default();
    draft.add_exercise(bench.clone());
    {
        let entry = &mut draft.exercises[0];
        entry.sets[0].target = SetTarget::Reps(10);
        entry.sets[0].weight = Some(60.0);
    }
    draft.add_set(&bench.id)?;
    service.save_workout_exercises(&workout.id, &draft.exercises)?;

    service.start_workout(&workout.id)?;
    let (_, mut session) = service.load_session()?;
    session.complete_all_sets();
    // The second set went heavier than planned
    let second_id = session.exercises[0].sets[1].id.clone();
    session.record_actual(&bench.id, &second_id, 8.0, Some(70.0))?;

    let summary = service.finish_session(session, 45, Some("Solid".to_string()))?;

    assert_eq!(summary.completed_sets, 2);
    assert_eq!(summary.total_sets, 2);
    // 10 x 60 (plan carried over as actual) + 8 x 70
    assert!((summary.total_volume - 1160.0).abs() < f64::EPSILON);

    assert_eq!(summary.progress.len(), 1);
    let progress = &summary.progress[0];
    assert_eq!(progress.exercise_id, bench.id);
    assert!((progress.max_weight - 70.0).abs() < f64::EPSILON);
    assert!(progress.estimated_one_rep_max.is_some());
    // The first recorded weight beats the empty history
    assert!(progress.personal_record);

    // A history entry exists and the session is closed
    let history = service.workout_history(None)?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].workout_name, "Push Day");
    assert_eq!(history[0].duration_minutes, 45);
    assert_eq!(history[0].performance_notes.as_deref(), Some("Solid"));
    assert!(service.active_workout()?.is_none());

    // Actual results were written back to the stored sets
    let entries = service.workout_exercises(&workout.id)?;
    assert!(entries[0].sets[0].completed);
    assert_eq!(entries[0].sets[0].actual, Some(SetTarget::Reps(10)));
    assert_eq!(entries[0].sets[0].actual_weight, Some(60.0));
    assert_eq!(entries[0].sets[1].actual, Some(SetTarget::Reps(8)));
    assert_eq!(entries[0].sets[1].actual_weight, Some(70.0));

    Ok(())
}

#[test]
fn test_finish_without_active_session_fails() -> Result<()> {
    let service = create_test_service()?;

    assert!(service.load_session().is_err());

    let result = service.finish_session(WorkoutDraft::default(), 30, None);
    assert!(result.is_err());
    match result.unwrap_err().downcast_ref::<DbError>() {
        Some(DbError::NoActiveWorkout) => (),
        _ => panic!("Expected NoActiveWorkout error"),
    }

    Ok(())
}

#[test]
fn test_finish_without_completed_sets_skips_progress() -> Result<()> {
    let service = create_test_service()?;

    let workout = service.create_workout("Push Day", None, None)?;
    let bench = service.resolve_exercise("Barbell Bench Press")?.unwrap();
    let mut draft = WorkoutDraft::default();
    draft.add_exercise(bench);
    service.save_workout_exercises(&workout.id, &draft.exercises)?;

    service.start_workout(&workout.id)?;
    let (_, session) = service.load_session()?;
    // Nothing marked completed
    let summary = service.finish_session(session, 20, None)?;

    assert_eq!(summary.completed_sets, 0);
    assert!(summary.progress.is_empty());
    // A history row is still written
    assert_eq!(service.workout_history(None)?.len(), 1);

    Ok(())
}

#[test]
fn test_prefill_fills_uncompleted_sets() -> Result<()> {
    let service = create_test_service()?;

    let workout = service.create_workout("Push Day", None, None)?;
    let bench = service.resolve_exercise("Barbell Bench Press")?.unwrap();

    let mut draft = WorkoutDraft::default();
    draft.add_exercise(bench.clone());
    {
        let entry = &mut draft.exercises[0];
        entry.sets[0].target = SetTarget::Reps(10);
        entry.sets[0].weight = Some(60.0);
    }
    draft.add_set(&bench.id)?;
    service.save_workout_exercises(&workout.id, &draft.exercises)?;

    service.start_workout(&workout.id)?;
    let (_, mut session) = service.load_session()?;
    let first_id = session.exercises[0].sets[0].id.clone();
    session.toggle_set_completed(&bench.id, &first_id)?;
    session.record_actual(&bench.id, &first_id, 9.0, None)?;

    // Prefill fills every unset actual, even on sets never marked completed,
    // and leaves recorded values alone
    session.prefill_actuals();
    assert_eq!(session.exercises[0].sets[0].actual, Some(SetTarget::Reps(9)));
    assert_eq!(session.exercises[0].sets[0].actual_weight, Some(60.0));
    assert_eq!(session.exercises[0].sets[1].actual, Some(SetTarget::Reps(10)));
    assert_eq!(session.exercises[0].sets[1].actual_weight, Some(60.0));

    let summary = service.finish_session(session, 25, None)?;
    assert_eq!(summary.completed_sets, 1);

    // The skipped set keeps its planned numbers as actuals in storage
    let entries = service.workout_exercises(&workout.id)?;
    assert!(!entries[0].sets[1].completed);
    assert_eq!(entries[0].sets[1].actual, Some(SetTarget::Reps(10)));
    assert_eq!(entries[0].sets[1].actual_weight, Some(60.0));

    Ok(())
}

#[test]
fn test_personal_record_requires_strict_improvement() -> Result<()> {
    let service = create_test_service()?;

    let workout = service.create_workout("Squat Day", None, None)?;
    let squat = service.resolve_exercise("Barbell Back Squat")?.unwrap();
    let mut draft = WorkoutDraft::default();
    draft.add_exercise(squat.clone());
    {
        let entry = &mut draft.exercises[0];
        entry.sets[0].target = SetTarget::Reps(5);
        entry.sets[0].weight = Some(100.0);
    }
    service.save_workout_exercises(&workout.id, &draft.exercises)?;

    // Session 1 at 100 kg sets the bar
    service.start_workout(&workout.id)?;
    let (_, mut session) = service.load_session()?;
    session.complete_all_sets();
    let summary = service.finish_session(session, 30, None)?;
    assert!(summary.progress[0].personal_record);

    // Session 2 matching 100 kg is not a new record
    service.start_workout(&workout.id)?;
    let (_, session) = service.load_session()?;
    let summary = service.finish_session(session, 30, None)?;
    assert!(!summary.progress[0].personal_record);

    // Session 3 beating it is
    service.start_workout(&workout.id)?;
    let (_, mut session) = service.load_session()?;
    let set_id = session.exercises[0].sets[0].id.clone();
    session.record_actual(&squat.id, &set_id, 5.0, Some(102.5))?;
    let summary = service.finish_session(session, 30, None)?;
    assert!(summary.progress[0].personal_record);
    assert!((summary.progress[0].max_weight - 102.5).abs() < f64::EPSILON);

    // All three sessions left a progress row, most recent first
    let rows = service.exercise_progress("Barbell Back Squat")?;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].workout_name.as_deref(), Some("Squat Day"));

    Ok(())
}

#[test]
fn test_history_details() -> Result<()> {
    let service = create_test_service()?;

    let workout = service.create_workout("Push Day", None, None)?;
    let bench = service.resolve_exercise("Barbell Bench Press")?.unwrap();
    let mut draft = WorkoutDraft::default();
    draft.add_exercise(bench);
    service.save_workout_exercises(&workout.id, &draft.exercises)?;

    service.start_workout(&workout.id)?;
    let (_, mut session) = service.load_session()?;
    session.complete_all_sets();
    service.finish_session(session, 40, None)?;

    let history = service.workout_history(None)?;
    let details = service.history_details(&history[0].id)?;
    assert_eq!(details.entry.workout_name, "Push Day");
    assert_eq!(details.entry.duration_minutes, 40);
    assert_eq!(details.completed_sets, 1);
    assert_eq!(details.total_sets, 1);
    assert_eq!(details.exercises.len(), 1);

    let missing = service.history_details("hist_missing");
    assert!(missing.is_err());
    match missing.unwrap_err().downcast_ref::<DbError>() {
        Some(DbError::HistoryNotFound(_)) => (),
        _ => panic!("Expected HistoryNotFound error"),
    }

    Ok(())
}

#[test]
fn test_history_limit() -> Result<()> {
    let service = create_test_service()?;

    let workout = service.create_workout("Push Day", None, None)?;
    for _ in 0..3 {
        service.start_workout(&workout.id)?;
        let (_, session) = service.load_session()?;
        service.finish_session(session, 30, None)?;
    }

    assert_eq!(service.workout_history(None)?.len(), 3);
    assert_eq!(service.workout_history(Some(1))?.len(), 1);

    Ok(())
}

#[test]
fn test_delete_workout_cascades() -> Result<()> {
    let service = create_test_service()?;

    let workout = service.create_workout("Push Day", None, None)?;
    let bench = service.resolve_exercise("Barbell Bench Press")?.unwrap();
    let mut draft = WorkoutDraft::default();
    draft.add_exercise(bench.clone());
    service.save_workout_exercises(&workout.id, &draft.exercises)?;

    service.start_workout(&workout.id)?;
    let (_, mut session) = service.load_session()?;
    session.complete_all_sets();
    service.finish_session(session, 30, None)?;

    service.delete_workout(&workout.id)?;

    // Composition and history rows went with it
    let sets: i64 =
        service
            .conn
            .query_row("SELECT COUNT(*) FROM workout_sets", [], |row| row.get(0))?;
    assert_eq!(sets, 0);
    let history: i64 =
        service
            .conn
            .query_row("SELECT COUNT(*) FROM workout_history", [], |row| row.get(0))?;
    assert_eq!(history, 0);

    // Progress belongs to the exercise and survives
    assert_eq!(service.exercise_progress(&bench.id)?.len(), 1);

    Ok(())
}

#[test]
fn test_planning_tables_present() -> Result<()> {
    let service = create_test_service()?;

    // Templates and plan tables ship with the schema even though no service
    // call writes them yet
    for table in [
        "workout_templates",
        "template_exercises",
        "template_sets",
        "weekly_plans",
        "weekly_plan_days",
        "training_plans",
        "training_plan_weeks",
        "periodization_blocks",
    ] {
        let count: i64 = service.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        assert_eq!(count, 1, "missing table {table}");
    }

    Ok(())
}

#[test]
fn test_dashboard_stats_counts_todays_session() -> Result<()> {
    let service = create_test_service()?;

    let workout = service.create_workout("Push Day", None, None)?;
    service.start_workout(&workout.id)?;
    let (_, session) = service.load_session()?;
    service.finish_session(session, 30, None)?;

    let stats = service.dashboard_stats()?;
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.workouts_this_week, 1);
    assert_eq!(stats.workouts_this_month, 1);
    assert_eq!(stats.current_streak, 1);

    Ok(())
}

#[test]
fn test_streak_from_dates() -> Result<()> {
    let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
    let d = |days_ago: i64| today - Duration::days(days_ago);

    // Today plus the two days before it
    assert_eq!(fortivo_lib::streak_from_dates(&[d(0), d(1), d(2)], today), 3);
    // A streak that ended yesterday still counts
    assert_eq!(fortivo_lib::streak_from_dates(&[d(1), d(2)], today), 2);
    // Two days without training breaks it
    assert_eq!(fortivo_lib::streak_from_dates(&[d(2), d(3)], today), 0);
    // Several sessions on one day count once
    assert_eq!(fortivo_lib::streak_from_dates(&[d(0), d(0), d(1)], today), 2);
    // A gap further back ends the walk
    assert_eq!(
        fortivo_lib::streak_from_dates(&[d(0), d(1), d(3), d(4)], today),
        2
    );
    assert_eq!(fortivo_lib::streak_from_dates(&[], today), 0);

    Ok(())
}

#[test]
fn test_week_and_month_boundaries() -> Result<()> {
    // 2024-05-15 was a Wednesday; its week began on Sunday the 12th
    let wednesday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
    assert_eq!(
        fortivo_lib::start_of_week(wednesday),
        NaiveDate::from_ymd_opt(2024, 5, 12).unwrap()
    );
    // A Sunday starts its own week
    let sunday = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
    assert_eq!(fortivo_lib::start_of_week(sunday), sunday);

    // December wraps into the next year
    let (start, next) = fortivo_lib::month_bounds(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
    assert_eq!(next, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

    let dates = vec![
        NaiveDate::from_ymd_opt(2024, 5, 11).unwrap(), // Saturday, previous week
        NaiveDate::from_ymd_opt(2024, 5, 12).unwrap(), // Sunday, this week
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
        NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(), // Previous month
    ];
    assert_eq!(fortivo_lib::count_in_week(&dates, wednesday), 2);
    assert_eq!(fortivo_lib::count_in_month(&dates, wednesday), 3);

    Ok(())
}

#[test]
fn test_draft_set_operations() -> Result<()> {
    let service = create_test_service()?;
    let bench = service.resolve_exercise("Barbell Bench Press")?.unwrap();
    let squat = service.resolve_exercise("Barbell Back Squat")?.unwrap();

    let mut draft = WorkoutDraft::default();
    draft.add_exercise(bench.clone());
    draft.add_exercise(squat.clone());
    assert_eq!(draft.total_sets(), 2);

    draft.add_set(&bench.id)?;
    assert_eq!(draft.exercises[0].sets.len(), 2);

    // The last set of an exercise cannot be removed
    let squat_set = draft.exercises[1].sets[0].id.clone();
    let result = draft.remove_set(&squat.id, &squat_set);
    assert_eq!(result.unwrap_err(), SessionError::LastSet);

    // Completion toggles per set
    let bench_set = draft.exercises[0].sets[0].id.clone();
    assert!(draft.toggle_set_completed(&bench.id, &bench_set)?);
    assert!(!draft.toggle_set_completed(&bench.id, &bench_set)?);

    // Reordering stops at the edges
    assert!(!draft.move_exercise_up(&bench.id));
    assert!(draft.move_exercise_up(&squat.id));
    assert_eq!(draft.exercises[0].exercise.name, "Barbell Back Squat");
    assert!(!draft.move_exercise_down(&bench.id));

    // Unknown exercises are rejected
    let result = draft.add_set("ex_missing");
    assert!(matches!(result, Err(SessionError::UnknownExercise(_))));

    Ok(())
}

#[test]
fn test_unit_conversions() -> Result<()> {
    let mut service = create_test_service()?;

    // Metric input is stored as-is
    assert!((service.input_weight_to_kg(100.0) - 100.0).abs() < f64::EPSILON);
    assert!((service.input_distance_to_meters(5.0) - 5000.0).abs() < 1e-9);

    // Imperial input converts to kilograms and meters
    service.config.units = Units::Imperial;
    assert!((service.input_weight_to_kg(100.0) - 45.3592).abs() < 1e-4);
    assert!((service.input_distance_to_meters(1.0) - 1609.34).abs() < 1e-2);

    Ok(())
}

#[test]
fn test_parse_color_names() -> Result<()> {
    // Names match the standard palette, case-insensitively
    assert_eq!(fortivo_lib::parse_color("green")?, StandardColor::Green);
    assert_eq!(fortivo_lib::parse_color("DARKCYAN")?, StandardColor::DarkCyan);
    assert!(fortivo_lib::parse_color("chartreuse").is_err());

    Ok(())
}

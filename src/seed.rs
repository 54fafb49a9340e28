// src/seed.rs
//! Bundled exercise catalog. Inserted on first run and whenever the stored
//! built-in rows drift from this dataset; custom exercises are never touched.

use crate::db::{Difficulty, Measurement};

/// One bundled catalog row. Slices are JSON-encoded at insert time; an empty
/// equipment slice becomes NULL.
pub struct SeedExercise {
    pub id: &'static str,
    pub name: &'static str,
    pub alt_name: Option<&'static str>,
    pub categories: &'static [&'static str],
    pub muscle_groups: &'static [&'static str],
    pub instructions: Option<&'static str>,
    pub equipment: &'static [&'static str],
    pub difficulty: Difficulty,
    pub measurement: Measurement,
}

pub const BUILTIN_EXERCISES: &[SeedExercise] = &[
    // Chest
    SeedExercise {
        id: "ex_barbell_bench_press",
        name: "Barbell Bench Press",
        alt_name: Some("Wyciskanie sztangi na ławce płaskiej"),
        categories: &["chest"],
        muscle_groups: &["pectorals", "triceps", "deltoids"],
        instructions: Some(
            "Lie flat with feet planted, grip slightly wider than shoulders. Lower the bar \
             to mid-chest and press back up without bouncing.",
        ),
        equipment: &["barbell", "bench"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_incline_dumbbell_press",
        name: "Incline Dumbbell Press",
        alt_name: Some("Wyciskanie hantli na ławce skośnej"),
        categories: &["chest"],
        muscle_groups: &["pectorals", "deltoids", "triceps"],
        instructions: Some(
            "Set the bench to roughly 30 degrees. Press the dumbbells up and slightly \
             together, then lower under control.",
        ),
        equipment: &["dumbbells", "bench"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_push_up",
        name: "Push-Up",
        alt_name: Some("Pompki"),
        categories: &["chest"],
        muscle_groups: &["pectorals", "triceps", "abdominals"],
        instructions: Some(
            "Hands under shoulders, body in one line. Lower until the chest nearly touches \
             the floor, then push back up.",
        ),
        equipment: &[],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_dumbbell_fly",
        name: "Dumbbell Fly",
        alt_name: Some("Rozpiętki z hantlami"),
        categories: &["chest"],
        muscle_groups: &["pectorals"],
        instructions: Some(
            "With a slight elbow bend, open the arms wide until you feel a chest stretch, \
             then bring the dumbbells back together above you.",
        ),
        equipment: &["dumbbells", "bench"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_cable_crossover",
        name: "Cable Crossover",
        alt_name: Some("Krzyżowanie linek wyciągu"),
        categories: &["chest"],
        muscle_groups: &["pectorals"],
        instructions: None,
        equipment: &["cable machine"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_chest_dip",
        name: "Chest Dip",
        alt_name: Some("Pompki na poręczach"),
        categories: &["chest"],
        muscle_groups: &["pectorals", "triceps"],
        instructions: Some(
            "Lean slightly forward on the bars, lower until the shoulders drop below the \
             elbows, then press up.",
        ),
        equipment: &["dip bars"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    // Back
    SeedExercise {
        id: "ex_deadlift",
        name: "Deadlift",
        alt_name: Some("Martwy ciąg"),
        categories: &["back", "legs"],
        muscle_groups: &["lower back", "glutes", "hamstrings", "trapezius"],
        instructions: Some(
            "Bar over mid-foot, hinge down with a flat back and stand up by driving through \
             the legs. Keep the bar close to the body throughout.",
        ),
        equipment: &["barbell"],
        difficulty: Difficulty::Advanced,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_pull_up",
        name: "Pull-Up",
        alt_name: Some("Podciąganie na drążku"),
        categories: &["back"],
        muscle_groups: &["lats", "biceps", "forearms"],
        instructions: Some(
            "Hang with an overhand grip and pull until the chin clears the bar, then lower \
             to a full hang.",
        ),
        equipment: &["pull-up bar"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_chin_up",
        name: "Chin-Up",
        alt_name: Some("Podciąganie podchwytem"),
        categories: &["back"],
        muscle_groups: &["lats", "biceps"],
        instructions: None,
        equipment: &["pull-up bar"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_barbell_row",
        name: "Barbell Row",
        alt_name: Some("Wiosłowanie sztangą w opadzie"),
        categories: &["back"],
        muscle_groups: &["lats", "trapezius", "biceps"],
        instructions: Some(
            "Hinge to about 45 degrees with a flat back and row the bar to the lower ribs.",
        ),
        equipment: &["barbell"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_lat_pulldown",
        name: "Lat Pulldown",
        alt_name: Some("Ściąganie drążka wyciągu górnego"),
        categories: &["back"],
        muscle_groups: &["lats", "biceps"],
        instructions: Some("Pull the bar to the upper chest while keeping the torso tall."),
        equipment: &["cable machine"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_seated_cable_row",
        name: "Seated Cable Row",
        alt_name: Some("Przyciąganie linki wyciągu siedząc"),
        categories: &["back"],
        muscle_groups: &["lats", "trapezius", "biceps"],
        instructions: None,
        equipment: &["cable machine"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_single_arm_dumbbell_row",
        name: "Single-Arm Dumbbell Row",
        alt_name: Some("Wiosłowanie hantlem jednorącz"),
        categories: &["back"],
        muscle_groups: &["lats", "trapezius"],
        instructions: Some(
            "Support yourself on a bench with one hand and row the dumbbell to the hip \
             without twisting the torso.",
        ),
        equipment: &["dumbbells", "bench"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_back_extension",
        name: "Back Extension",
        alt_name: Some("Skłony rzymskie"),
        categories: &["back"],
        muscle_groups: &["lower back", "glutes", "hamstrings"],
        instructions: None,
        equipment: &["machine"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    // Legs
    SeedExercise {
        id: "ex_barbell_back_squat",
        name: "Barbell Back Squat",
        alt_name: Some("Przysiad ze sztangą na plecach"),
        categories: &["legs"],
        muscle_groups: &["quadriceps", "glutes", "hamstrings"],
        instructions: Some(
            "Bar on the upper back, feet shoulder width. Sit down until the hips pass knee \
             level, then drive back up.",
        ),
        equipment: &["barbell", "squat rack"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_front_squat",
        name: "Front Squat",
        alt_name: Some("Przysiad przedni"),
        categories: &["legs"],
        muscle_groups: &["quadriceps", "glutes", "abdominals"],
        instructions: Some(
            "Rack the bar on the front delts with elbows high and squat while keeping the \
             torso upright.",
        ),
        equipment: &["barbell", "squat rack"],
        difficulty: Difficulty::Advanced,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_goblet_squat",
        name: "Goblet Squat",
        alt_name: Some("Przysiad z odważnikiem przy klatce"),
        categories: &["legs"],
        muscle_groups: &["quadriceps", "glutes"],
        instructions: Some("Hold the weight at the chest and squat between the knees."),
        equipment: &["kettlebell"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_romanian_deadlift",
        name: "Romanian Deadlift",
        alt_name: Some("Rumuński martwy ciąg"),
        categories: &["legs"],
        muscle_groups: &["hamstrings", "glutes", "lower back"],
        instructions: Some(
            "From standing, push the hips back with soft knees until the hamstrings \
             stretch, then return to lockout.",
        ),
        equipment: &["barbell"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_leg_press",
        name: "Leg Press",
        alt_name: Some("Wypychanie na suwnicy"),
        categories: &["legs"],
        muscle_groups: &["quadriceps", "glutes"],
        instructions: None,
        equipment: &["machine"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_walking_lunge",
        name: "Walking Lunge",
        alt_name: Some("Wykroki chodzone"),
        categories: &["legs"],
        muscle_groups: &["quadriceps", "glutes", "hamstrings"],
        instructions: Some(
            "Step forward into a lunge until the rear knee nearly touches the floor, then \
             step through into the next rep.",
        ),
        equipment: &[],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_bulgarian_split_squat",
        name: "Bulgarian Split Squat",
        alt_name: Some("Przysiad bułgarski"),
        categories: &["legs"],
        muscle_groups: &["quadriceps", "glutes"],
        instructions: Some(
            "Rear foot elevated on a bench, lower straight down until the front thigh is \
             parallel to the floor.",
        ),
        equipment: &["bench"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_leg_curl",
        name: "Leg Curl",
        alt_name: Some("Uginanie nóg na maszynie"),
        categories: &["legs"],
        muscle_groups: &["hamstrings"],
        instructions: None,
        equipment: &["machine"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_leg_extension",
        name: "Leg Extension",
        alt_name: Some("Prostowanie nóg na maszynie"),
        categories: &["legs"],
        muscle_groups: &["quadriceps"],
        instructions: None,
        equipment: &["machine"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_standing_calf_raise",
        name: "Standing Calf Raise",
        alt_name: Some("Wspięcia na palce stojąc"),
        categories: &["legs"],
        muscle_groups: &["calves"],
        instructions: Some("Rise onto the toes, pause at the top, lower to a full stretch."),
        equipment: &[],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_hip_thrust",
        name: "Hip Thrust",
        alt_name: Some("Unoszenie bioder ze sztangą"),
        categories: &["legs", "glutes"],
        muscle_groups: &["glutes", "hamstrings"],
        instructions: Some(
            "Upper back on a bench, bar over the hips. Drive the hips up to a straight \
             line from knees to shoulders.",
        ),
        equipment: &["barbell", "bench"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    // Shoulders
    SeedExercise {
        id: "ex_overhead_press",
        name: "Overhead Press",
        alt_name: Some("Wyciskanie żołnierskie"),
        categories: &["shoulders"],
        muscle_groups: &["deltoids", "triceps"],
        instructions: Some(
            "Press the bar from the collarbone to lockout overhead, keeping the glutes and \
             abs braced.",
        ),
        equipment: &["barbell"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_seated_dumbbell_press",
        name: "Seated Dumbbell Press",
        alt_name: Some("Wyciskanie hantli siedząc"),
        categories: &["shoulders"],
        muscle_groups: &["deltoids", "triceps"],
        instructions: None,
        equipment: &["dumbbells", "bench"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_lateral_raise",
        name: "Lateral Raise",
        alt_name: Some("Unoszenie hantli bokiem"),
        categories: &["shoulders"],
        muscle_groups: &["deltoids"],
        instructions: Some(
            "With a slight elbow bend, raise the dumbbells out to shoulder height and \
             lower slowly.",
        ),
        equipment: &["dumbbells"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_rear_delt_fly",
        name: "Rear Delt Fly",
        alt_name: Some("Odwrotne rozpiętki"),
        categories: &["shoulders"],
        muscle_groups: &["deltoids", "trapezius"],
        instructions: None,
        equipment: &["dumbbells"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_face_pull",
        name: "Face Pull",
        alt_name: Some("Przyciąganie linki do twarzy"),
        categories: &["shoulders"],
        muscle_groups: &["deltoids", "trapezius"],
        instructions: Some(
            "Pull the rope towards the forehead while spreading the ends apart, elbows \
             high.",
        ),
        equipment: &["cable machine"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_barbell_shrug",
        name: "Barbell Shrug",
        alt_name: Some("Wzruszanie ramion ze sztangą"),
        categories: &["shoulders"],
        muscle_groups: &["trapezius"],
        instructions: None,
        equipment: &["barbell"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    // Arms
    SeedExercise {
        id: "ex_barbell_curl",
        name: "Barbell Curl",
        alt_name: Some("Uginanie ramion ze sztangą"),
        categories: &["arms"],
        muscle_groups: &["biceps", "forearms"],
        instructions: Some(
            "Curl the bar with elbows pinned to the sides, lower all the way to full \
             extension.",
        ),
        equipment: &["barbell"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_dumbbell_curl",
        name: "Dumbbell Curl",
        alt_name: Some("Uginanie ramion z hantlami"),
        categories: &["arms"],
        muscle_groups: &["biceps"],
        instructions: None,
        equipment: &["dumbbells"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_hammer_curl",
        name: "Hammer Curl",
        alt_name: Some("Uginanie młotkowe"),
        categories: &["arms"],
        muscle_groups: &["biceps", "forearms"],
        instructions: None,
        equipment: &["dumbbells"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_triceps_pushdown",
        name: "Triceps Pushdown",
        alt_name: Some("Prostowanie ramion na wyciągu"),
        categories: &["arms"],
        muscle_groups: &["triceps"],
        instructions: Some("Elbows at the sides, press the attachment down to full extension."),
        equipment: &["cable machine"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_skull_crusher",
        name: "Skull Crusher",
        alt_name: Some("Wyciskanie francuskie leżąc"),
        categories: &["arms"],
        muscle_groups: &["triceps"],
        instructions: Some(
            "Lying on a bench, lower the bar to just above the forehead by bending only \
             the elbows, then extend.",
        ),
        equipment: &["barbell", "bench"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_close_grip_bench_press",
        name: "Close-Grip Bench Press",
        alt_name: Some("Wyciskanie sztangi wąskim chwytem"),
        categories: &["arms", "chest"],
        muscle_groups: &["triceps", "pectorals"],
        instructions: None,
        equipment: &["barbell", "bench"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    // Core
    SeedExercise {
        id: "ex_plank",
        name: "Plank",
        alt_name: Some("Deska"),
        categories: &["core"],
        muscle_groups: &["abdominals", "lower back"],
        instructions: Some(
            "Forearms on the floor, body in one rigid line from head to heels. Hold \
             without letting the hips sag.",
        ),
        equipment: &[],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Time,
    },
    SeedExercise {
        id: "ex_side_plank",
        name: "Side Plank",
        alt_name: Some("Deska boczna"),
        categories: &["core"],
        muscle_groups: &["obliques", "abdominals"],
        instructions: None,
        equipment: &[],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Time,
    },
    SeedExercise {
        id: "ex_crunch",
        name: "Crunch",
        alt_name: Some("Spięcia brzucha"),
        categories: &["core"],
        muscle_groups: &["abdominals"],
        instructions: None,
        equipment: &[],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_hanging_leg_raise",
        name: "Hanging Leg Raise",
        alt_name: Some("Unoszenie nóg w zwisie"),
        categories: &["core"],
        muscle_groups: &["abdominals", "hip flexors"],
        instructions: Some(
            "Hang from a bar and raise the legs to horizontal without swinging.",
        ),
        equipment: &["pull-up bar"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_russian_twist",
        name: "Russian Twist",
        alt_name: Some("Skręty tułowia"),
        categories: &["core"],
        muscle_groups: &["obliques", "abdominals"],
        instructions: None,
        equipment: &[],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_ab_wheel_rollout",
        name: "Ab Wheel Rollout",
        alt_name: Some("Rolowanie kółkiem"),
        categories: &["core"],
        muscle_groups: &["abdominals", "lower back"],
        instructions: Some(
            "From the knees, roll the wheel forward as far as the trunk can stay braced, \
             then pull back.",
        ),
        equipment: &["ab wheel"],
        difficulty: Difficulty::Advanced,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_dead_bug",
        name: "Dead Bug",
        alt_name: Some("Martwy robak"),
        categories: &["core"],
        muscle_groups: &["abdominals"],
        instructions: Some(
            "On your back with arms and knees up, lower one arm and the opposite leg while \
             keeping the lower back pressed to the floor.",
        ),
        equipment: &[],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Reps,
    },
    // Cardio and conditioning
    SeedExercise {
        id: "ex_running",
        name: "Running",
        alt_name: Some("Bieganie"),
        categories: &["cardio"],
        muscle_groups: &["quadriceps", "hamstrings", "calves"],
        instructions: None,
        equipment: &[],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Distance,
    },
    SeedExercise {
        id: "ex_cycling",
        name: "Cycling",
        alt_name: Some("Jazda na rowerze"),
        categories: &["cardio"],
        muscle_groups: &["quadriceps", "calves"],
        instructions: None,
        equipment: &[],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Distance,
    },
    SeedExercise {
        id: "ex_rowing_machine",
        name: "Rowing Machine",
        alt_name: Some("Ergometr wioślarski"),
        categories: &["cardio", "back"],
        muscle_groups: &["lats", "quadriceps", "glutes"],
        instructions: Some(
            "Drive with the legs first, then swing the trunk and finish with the arms. \
             Reverse the order on the way back.",
        ),
        equipment: &["rowing machine"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Distance,
    },
    SeedExercise {
        id: "ex_jump_rope",
        name: "Jump Rope",
        alt_name: Some("Skakanka"),
        categories: &["cardio"],
        muscle_groups: &["calves", "forearms"],
        instructions: None,
        equipment: &["jump rope"],
        difficulty: Difficulty::Beginner,
        measurement: Measurement::Time,
    },
    SeedExercise {
        id: "ex_burpee",
        name: "Burpee",
        alt_name: Some("Burpees"),
        categories: &["cardio", "full body"],
        muscle_groups: &["quadriceps", "pectorals", "abdominals"],
        instructions: Some(
            "Drop to a push-up, snap the feet back in and jump with arms overhead.",
        ),
        equipment: &[],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Reps,
    },
    SeedExercise {
        id: "ex_farmers_carry",
        name: "Farmer's Carry",
        alt_name: Some("Spacer farmera"),
        categories: &["full body"],
        muscle_groups: &["forearms", "trapezius", "abdominals"],
        instructions: Some(
            "Pick up a heavy weight in each hand and walk tall with short quick steps.",
        ),
        equipment: &["dumbbells"],
        difficulty: Difficulty::Intermediate,
        measurement: Measurement::Distance,
    },
];

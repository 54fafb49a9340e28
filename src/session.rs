// src/session.rs
use thiserror::Error;

use crate::db::{generate_id, Exercise, Measurement};

/// Planned (or performed) quantity of a single set. The variant always matches
/// the owning exercise's measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetTarget {
    Reps(i64),
    /// Seconds.
    Time(i64),
    /// Meters.
    Distance(f64),
}

impl SetTarget {
    pub fn kind(&self) -> Measurement {
        match self {
            SetTarget::Reps(_) => Measurement::Reps,
            SetTarget::Time(_) => Measurement::Time,
            SetTarget::Distance(_) => Measurement::Distance,
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            SetTarget::Reps(reps) => *reps as f64,
            SetTarget::Time(secs) => *secs as f64,
            SetTarget::Distance(meters) => *meters,
        }
    }
}

/// One set of one exercise inside a workout: the plan, and (once performed)
/// the actual result.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub id: String,
    pub target: SetTarget,
    /// Kilograms.
    pub weight: Option<f64>,
    pub rpe: Option<f64>,
    pub tempo: Option<String>,
    pub rest_secs: Option<i64>,
    pub completed: bool,
    pub notes: Option<String>,
    pub actual: Option<SetTarget>,
    pub actual_weight: Option<f64>,
}

impl WorkoutSet {
    /// Weight that counts for aggregation: the actual if recorded, else the plan.
    pub fn effective_weight(&self) -> f64 {
        self.actual_weight.or(self.weight).unwrap_or(0.0)
    }

    /// Amount that counts for aggregation: the actual if recorded, else the plan.
    pub fn effective_amount(&self) -> SetTarget {
        self.actual.unwrap_or(self.target)
    }
}

/// One exercise slot in a workout, with its ordered sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    pub exercise: Exercise,
    pub superset_group: Option<String>,
    pub notes: Option<String>,
    pub sets: Vec<WorkoutSet>,
}

impl ExerciseEntry {
    pub fn completed_set_count(&self) -> usize {
        self.sets.iter().filter(|s| s.completed).count()
    }

    /// Heaviest weight among the completed sets (0.0 when nothing counts).
    pub fn max_completed_weight(&self) -> f64 {
        self.sets
            .iter()
            .filter(|s| s.completed)
            .map(WorkoutSet::effective_weight)
            .fold(0.0, f64::max)
    }

    /// Sum of reps x weight over the completed sets. Timed and distance sets
    /// carry no volume.
    pub fn completed_volume(&self) -> f64 {
        self.sets
            .iter()
            .filter(|s| s.completed)
            .map(|s| match s.effective_amount() {
                SetTarget::Reps(reps) => reps as f64 * s.effective_weight(),
                SetTarget::Time(_) | SetTarget::Distance(_) => 0.0,
            })
            .sum()
    }

    /// Best Epley estimate over the completed weighted rep sets.
    pub fn best_estimated_one_rep_max(&self) -> Option<f64> {
        self.sets
            .iter()
            .filter(|s| s.completed)
            .filter_map(|s| match s.effective_amount() {
                SetTarget::Reps(reps) if reps > 0 => {
                    let weight = s.effective_weight();
                    (weight > 0.0).then(|| estimate_one_rep_max(weight, reps))
                }
                _ => None,
            })
            .fold(None, |best, e1rm| match best {
                Some(current) if current >= e1rm => Some(current),
                _ => Some(e1rm),
            })
    }
}

/// Epley estimate: weight x (1 + reps / 30).
pub fn estimate_one_rep_max(weight: f64, reps: i64) -> f64 {
    weight * (1.0 + reps as f64 / 30.0)
}

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("Exercise '{0}' is not part of this workout")]
    UnknownExercise(String),
    #[error("Set '{0}' not found")]
    UnknownSet(String),
    #[error("An exercise must keep at least one set")]
    LastSet,
}

/// In-memory editing state for one workout's exercise list. Built from the
/// stored rows, mutated freely, then saved back as a whole.
#[derive(Debug, Clone, Default)]
pub struct WorkoutDraft {
    pub name: String,
    pub exercises: Vec<ExerciseEntry>,
}

fn default_set(measurement: Measurement) -> WorkoutSet {
    let (target, weight) = match measurement {
        Measurement::Reps => (SetTarget::Reps(8), Some(0.0)),
        Measurement::Time => (SetTarget::Time(30), None),
        Measurement::Distance => (SetTarget::Distance(1000.0), None),
    };
    WorkoutSet {
        id: generate_id("ws"),
        target,
        weight,
        rpe: None,
        tempo: None,
        rest_secs: None,
        completed: false,
        notes: None,
        actual: None,
        actual_weight: None,
    }
}

impl WorkoutDraft {
    /// Appends an exercise with one starter set matching its measurement.
    pub fn add_exercise(&mut self, exercise: Exercise) {
        let set = default_set(exercise.measurement);
        self.exercises.push(ExerciseEntry {
            exercise,
            superset_group: None,
            notes: None,
            sets: vec![set],
        });
    }

    /// Removes an exercise slot. Returns false when the id was not present.
    pub fn remove_exercise(&mut self, exercise_id: &str) -> bool {
        let before = self.exercises.len();
        self.exercises.retain(|e| e.exercise.id != exercise_id);
        self.exercises.len() < before
    }

    fn entry_mut(&mut self, exercise_id: &str) -> Result<&mut ExerciseEntry, SessionError> {
        self.exercises
            .iter_mut()
            .find(|e| e.exercise.id == exercise_id)
            .ok_or_else(|| SessionError::UnknownExercise(exercise_id.to_string()))
    }

    fn set_mut(&mut self, exercise_id: &str, set_id: &str) -> Result<&mut WorkoutSet, SessionError> {
        self.entry_mut(exercise_id)?
            .sets
            .iter_mut()
            .find(|s| s.id == set_id)
            .ok_or_else(|| SessionError::UnknownSet(set_id.to_string()))
    }

    /// Appends a set to an exercise, copying the last set's plan. The copy
    /// starts uncompleted with no actuals.
    pub fn add_set(&mut self, exercise_id: &str) -> Result<(), SessionError> {
        let entry = self.entry_mut(exercise_id)?;
        let mut set = match entry.sets.last() {
            Some(last) => last.clone(),
            None => default_set(entry.exercise.measurement),
        };
        set.id = generate_id("ws");
        set.completed = false;
        set.actual = None;
        set.actual_weight = None;
        entry.sets.push(set);
        Ok(())
    }

    /// Removes one set. An exercise never ends up with zero sets; remove the
    /// exercise instead.
    pub fn remove_set(&mut self, exercise_id: &str, set_id: &str) -> Result<(), SessionError> {
        let entry = self.entry_mut(exercise_id)?;
        if entry.sets.len() == 1 {
            return Err(SessionError::LastSet);
        }
        let before = entry.sets.len();
        entry.sets.retain(|s| s.id != set_id);
        if entry.sets.len() == before {
            return Err(SessionError::UnknownSet(set_id.to_string()));
        }
        Ok(())
    }

    pub fn update_set(
        &mut self,
        exercise_id: &str,
        set_id: &str,
        apply: impl FnOnce(&mut WorkoutSet),
    ) -> Result<(), SessionError> {
        let set = self.set_mut(exercise_id, set_id)?;
        apply(set);
        Ok(())
    }

    /// Flips one set's completed flag, returning the new state.
    pub fn toggle_set_completed(
        &mut self,
        exercise_id: &str,
        set_id: &str,
    ) -> Result<bool, SessionError> {
        let set = self.set_mut(exercise_id, set_id)?;
        set.completed = !set.completed;
        Ok(set.completed)
    }

    /// Records what was actually performed for one set. The recorded variant
    /// follows the set's planned measurement.
    pub fn record_actual(
        &mut self,
        exercise_id: &str,
        set_id: &str,
        amount: f64,
        actual_weight: Option<f64>,
    ) -> Result<(), SessionError> {
        let set = self.set_mut(exercise_id, set_id)?;
        set.actual = Some(match set.target {
            SetTarget::Reps(_) => SetTarget::Reps(amount.round() as i64),
            SetTarget::Time(_) => SetTarget::Time(amount.round() as i64),
            SetTarget::Distance(_) => SetTarget::Distance(amount),
        });
        if actual_weight.is_some() {
            set.actual_weight = actual_weight;
        }
        Ok(())
    }

    pub fn complete_all_sets(&mut self) {
        for entry in &mut self.exercises {
            for set in &mut entry.sets {
                set.completed = true;
            }
        }
    }

    /// Fills every unset actual from its plan, completed or not. Recorded
    /// values are left untouched.
    pub fn prefill_actuals(&mut self) {
        for entry in &mut self.exercises {
            for set in &mut entry.sets {
                if set.actual.is_none() {
                    set.actual = Some(set.target);
                }
                if set.actual_weight.is_none() {
                    set.actual_weight = set.weight;
                }
            }
        }
    }

    /// Swaps the exercise with its predecessor. Returns false at the top edge
    /// or for an unknown id.
    pub fn move_exercise_up(&mut self, exercise_id: &str) -> bool {
        match self.exercises.iter().position(|e| e.exercise.id == exercise_id) {
            Some(index) if index > 0 => {
                self.exercises.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    /// Swaps the exercise with its successor. Returns false at the bottom edge
    /// or for an unknown id.
    pub fn move_exercise_down(&mut self, exercise_id: &str) -> bool {
        match self.exercises.iter().position(|e| e.exercise.id == exercise_id) {
            Some(index) if index + 1 < self.exercises.len() => {
                self.exercises.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    pub fn completed_sets(&self) -> usize {
        self.exercises.iter().map(ExerciseEntry::completed_set_count).sum()
    }

    /// Volume of every completed set across the whole draft.
    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(ExerciseEntry::completed_volume).sum()
    }
}

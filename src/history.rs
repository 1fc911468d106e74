//! History engine - cross-workout derivations over the store
//!
//! Features:
//! - Most-recent-by-name exercise lookup
//! - Prefill of a new exercise from its last occurrence
//! - Auto-repeat of an empty workout from its last same-named session
//! - PR computation and per-session history aggregation

use anyhow::Result;
use tracing::{debug, info};

use crate::db::{Database, Exercise, SetEntry};
use crate::exercises::{ExerciseTypeConfig, config_for_name};

/// One history entry per (workout, exercise name) occurrence
#[derive(Debug, Clone)]
pub struct ExerciseHistoryEntry {
    pub workout_id: i64,
    pub workout_name: String,
    pub date: Option<String>,
    pub top_set: Option<SetEntry>,
    pub volume: f32,
    pub sets: Vec<SetEntry>,
}

/// Derivations over the workout/exercise/set store. Reads everything,
/// mutates only through insert-style prefill operations.
pub struct HistoryEngine<'a> {
    db: &'a Database,
}

/// Reps that count for ranking and volume: both sides summed for
/// unilateral sets, the plain rep count otherwise.
fn effective_reps(set: &SetEntry) -> i32 {
    match (set.reps_left, set.reps_right) {
        (None, None) => set.reps,
        (left, right) => left.unwrap_or(0) + right.unwrap_or(0),
    }
}

/// Kind-aware ranking: weight-tracking kinds compare by weight then reps,
/// the rest by reps alone (seconds for timed holds).
fn beats(config: &ExerciseTypeConfig, a: &SetEntry, b: &SetEntry) -> bool {
    if config.tracks_weight {
        if a.weight != b.weight {
            return a.weight > b.weight;
        }
    }
    effective_reps(a) > effective_reps(b)
}

fn best_of<'s>(
    config: &ExerciseTypeConfig,
    sets: impl IntoIterator<Item = &'s SetEntry>,
) -> Option<&'s SetEntry> {
    let mut best: Option<&SetEntry> = None;
    for set in sets {
        match best {
            None => best = Some(set),
            Some(current) if beats(config, set, current) => best = Some(set),
            Some(_) => {}
        }
    }
    best
}

/// Session volume: sum of effective reps x weight. Weight counts as zero
/// for kinds that do not track it, so their volume is zero.
fn session_volume(config: &ExerciseTypeConfig, sets: &[SetEntry]) -> f32 {
    sets.iter()
        .map(|set| {
            let weight = if config.tracks_weight { set.weight } else { 0.0 };
            effective_reps(set) as f32 * weight
        })
        .sum()
}

impl<'a> HistoryEngine<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Most recent prior occurrence of an exercise name across all workouts
    pub fn last_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>> {
        self.db.last_exercise_by_name(name)
    }

    /// Insert a new exercise at the end of a workout. When the name has
    /// been logged before, the new row remembers the previous session:
    /// its last date and notes are carried over and its sets are deep
    /// copied (fresh ids, new ownership). Duplicate names are permitted;
    /// each row is its own temporal session.
    pub fn add_exercise(&self, workout_id: i64, name: &str) -> Result<i64> {
        let previous = self.db.last_exercise_by_name(name)?;
        let next_pos = self.db.max_position_for_workout(workout_id)? + 1;

        let tx = self.db.transaction()?;
        let exercise_id = self.db.add_exercise(&Exercise {
            id: None,
            workout_id,
            name: name.to_string(),
            last_date: previous
                .as_ref()
                .map(|p| p.last_date.clone())
                .unwrap_or_default(),
            notes: previous.as_ref().and_then(|p| p.notes.clone()),
            position: next_pos,
            completed_at: None,
        })?;

        if let Some(prev) = previous {
            if let Some(prev_id) = prev.id {
                let copied = self.copy_sets(prev_id, exercise_id)?;
                debug!(
                    "Prefilled exercise {} ({}) with {} sets from exercise {}",
                    exercise_id, name, copied, prev_id
                );
            }
        }
        tx.commit()?;
        Ok(exercise_id)
    }

    /// Auto-repeat: populate an empty workout from the most recent earlier
    /// workout sharing its name. Copies every exercise in position order;
    /// each exercise's sets are re-resolved through the name lookup, which
    /// may pick an even newer session of that exercise. Atomic: either the
    /// whole prior workout is copied or nothing is. Returns false without
    /// side effects when the workout already has exercises or no earlier
    /// same-named workout exists.
    pub fn repeat_last_if_empty(&self, workout_id: i64) -> Result<bool> {
        if self.db.exercise_count_for_workout(workout_id)? > 0 {
            return Ok(false);
        }
        let Some(current) = self.db.workout_by_id(workout_id)? else {
            return Ok(false);
        };
        let Some(prev) = self
            .db
            .last_workout_by_name_before(&current.name, current.timestamp)?
        else {
            return Ok(false);
        };
        let Some(prev_id) = prev.id else {
            return Ok(false);
        };
        let prev_exercises = self.db.exercises_for_workout(prev_id)?;
        if prev_exercises.is_empty() {
            return Ok(false);
        }

        let tx = self.db.transaction()?;
        let mut position = self.db.max_position_for_workout(workout_id)? + 1;
        for prev_exercise in &prev_exercises {
            let new_id = self.db.add_exercise(&Exercise {
                id: None,
                workout_id,
                name: prev_exercise.name.clone(),
                last_date: prev_exercise.last_date.clone(),
                notes: prev_exercise.notes.clone(),
                position,
                completed_at: None,
            })?;
            position += 1;

            // Name lookup rather than the repeated workout: the freshest
            // session of this exercise wins, wherever it was logged. The
            // target workout is excluded so the row just inserted cannot
            // shadow the real history.
            if let Some(latest) = self
                .db
                .last_exercise_by_name_excluding_workout(&prev_exercise.name, workout_id)?
            {
                if let Some(latest_id) = latest.id {
                    self.copy_sets(latest_id, new_id)?;
                }
            }
        }
        tx.commit()?;

        info!(
            "Repeated workout {} ({}) into workout {}: {} exercises",
            prev_id,
            current.name,
            workout_id,
            prev_exercises.len()
        );
        Ok(true)
    }

    /// Deep-copy every set of one exercise onto another, preserving
    /// insertion order. Rows get fresh ids and new ownership.
    fn copy_sets(&self, from_exercise: i64, to_exercise: i64) -> Result<usize> {
        let sets = self.db.sets_for_exercise(from_exercise)?;
        let count = sets.len();
        for set in sets {
            self.db.add_set(&SetEntry {
                id: None,
                exercise_id: to_exercise,
                reps: set.reps,
                weight: set.weight,
                reps_left: set.reps_left,
                reps_right: set.reps_right,
            })?;
        }
        Ok(count)
    }

    /// All-time best set for an exercise name by its kind-aware ranking,
    /// or None if the name has never been logged
    pub fn pr_for_exercise_name(&self, name: &str) -> Result<Option<SetEntry>> {
        let config = config_for_name(name);
        let mut all_sets = Vec::new();
        for occurrence in self.db.exercises_by_name(name)? {
            if let Some(exercise_id) = occurrence.id {
                all_sets.extend(self.db.sets_for_exercise(exercise_id)?);
            }
        }
        Ok(best_of(&config, &all_sets).cloned())
    }

    /// Per-session history for an exercise name, newest workout first.
    /// Same-named rows within one workout collapse into a single entry.
    pub fn exercise_history_for_name(&self, name: &str) -> Result<Vec<ExerciseHistoryEntry>> {
        let config = config_for_name(name);
        let mut entries: Vec<ExerciseHistoryEntry> = Vec::new();

        for occurrence in self.db.exercises_by_name(name)? {
            let Some(exercise_id) = occurrence.id else {
                continue;
            };
            let sets = self.db.sets_for_exercise(exercise_id)?;

            // exercises_by_name keeps same-workout rows adjacent
            if let Some(last) = entries.last_mut() {
                if last.workout_id == occurrence.workout_id {
                    last.sets.extend(sets);
                    continue;
                }
            }

            let Some(workout) = self.db.workout_by_id(occurrence.workout_id)? else {
                continue;
            };
            entries.push(ExerciseHistoryEntry {
                workout_id: occurrence.workout_id,
                workout_name: workout.name,
                date: (!workout.last_date.is_empty()).then_some(workout.last_date),
                top_set: None,
                volume: 0.0,
                sets,
            });
        }

        for entry in &mut entries {
            entry.top_set = best_of(&config, &entry.sets).cloned();
            entry.volume = session_volume(&config, &entry.sets);
        }
        Ok(entries)
    }

    /// Remove one workout's session of an exercise from history. Deletes the
    /// matching exercise rows (sets cascade) in that workout only.
    pub fn delete_exercise_session(&self, name: &str, workout_id: i64) -> Result<()> {
        self.db.delete_exercises_by_name_in_workout(name, workout_id)
    }

    /// Drop all-zero sets left behind by the "add set" affordance.
    /// No-op when the exercise does not belong to the workout.
    pub fn remove_empty_sets(&self, workout_id: i64, exercise_id: i64) -> Result<usize> {
        if self.db.exercise_by_id(workout_id, exercise_id)?.is_none() {
            return Ok(0);
        }
        let removed = self.db.delete_empty_sets(exercise_id)?;
        if removed > 0 {
            debug!("Removed {} empty sets from exercise {}", removed, exercise_id);
        }
        Ok(removed)
    }
}

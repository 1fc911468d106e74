//! Store module - shared async facade over the database
//!
//! Wraps the database in a cheaply clonable handle, serializes writers
//! through a mutex, and pushes change notifications to live subscriptions
//! so observers always see a fresh snapshot.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tracing::info;

use crate::db::{Database, Exercise, SetEntry, Workout};
use crate::exercises::BUILT_IN_NAMES;
use crate::history::{ExerciseHistoryEntry, HistoryEngine};

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn today_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

fn local_date_of_millis(millis: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.date_naive())
}

/// Case-insensitive merge keeping the first occurrence of each name
fn dedup_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect()
}

/// A live query: re-runs against the store whenever anything changes.
/// Dropping it is the unsubscribe.
pub struct Live<T> {
    changes: watch::Receiver<u64>,
    store: Store,
    query: Box<dyn Fn(&Database) -> Result<T> + Send + Sync>,
}

impl<T> Live<T> {
    /// Current snapshot, without waiting for a change
    pub async fn snapshot(&self) -> Result<T> {
        let db = self.store.db.lock().await;
        (self.query)(&db)
    }

    /// Wait for the next store change, then return a fresh snapshot.
    /// Returns None once the store itself is gone.
    pub async fn next(&mut self) -> Option<Result<T>> {
        if self.changes.changed().await.is_err() {
            return None;
        }
        Some(self.snapshot().await)
    }
}

/// Shared handle to the workout store
#[derive(Clone)]
pub struct Store {
    db: Arc<Mutex<Database>>,
    changes: Arc<watch::Sender<u64>>,
}

impl Store {
    /// Open or create the store at the given path
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self::wrap(Database::open(path)?))
    }

    /// In-memory store, used by tests
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::wrap(Database::open_in_memory()?))
    }

    fn wrap(db: Database) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            db: Arc::new(Mutex::new(db)),
            changes: Arc::new(changes),
        }
    }

    fn notify(&self) {
        self.changes.send_modify(|revision| *revision += 1);
    }

    fn live<T>(&self, query: impl Fn(&Database) -> Result<T> + Send + Sync + 'static) -> Live<T> {
        Live {
            changes: self.changes.subscribe(),
            store: self.clone(),
            query: Box::new(query),
        }
    }

    // -------- Live subscriptions --------

    /// All workouts, newest first
    pub fn subscribe_workouts(&self) -> Live<Vec<Workout>> {
        self.live(|db| db.workouts())
    }

    pub fn subscribe_workout(&self, workout_id: i64) -> Live<Option<Workout>> {
        self.live(move |db| db.workout_by_id(workout_id))
    }

    /// Exercises of one workout in display order
    pub fn subscribe_exercises(&self, workout_id: i64) -> Live<Vec<Exercise>> {
        self.live(move |db| db.exercises_for_workout(workout_id))
    }

    pub fn subscribe_exercise(&self, workout_id: i64, exercise_id: i64) -> Live<Option<Exercise>> {
        self.live(move |db| db.exercise_by_id(workout_id, exercise_id))
    }

    /// Sets of one exercise in insertion order
    pub fn subscribe_sets(&self, exercise_id: i64) -> Live<Vec<SetEntry>> {
        self.live(move |db| db.sets_for_exercise(exercise_id))
    }

    // -------- Workouts --------

    pub async fn add_workout(&self, name: &str) -> Result<i64> {
        let id = {
            let db = self.db.lock().await;
            db.add_workout(&Workout {
                id: None,
                name: name.to_string(),
                timestamp: now_millis(),
                last_date: today_string(),
                notes: None,
            })?
        };
        info!("Added workout {} ({})", id, name);
        self.notify();
        Ok(id)
    }

    pub async fn workouts(&self) -> Result<Vec<Workout>> {
        self.db.lock().await.workouts()
    }

    pub async fn workout_by_id(&self, workout_id: i64) -> Result<Option<Workout>> {
        self.db.lock().await.workout_by_id(workout_id)
    }

    pub async fn rename_workout(&self, workout_id: i64, name: &str) -> Result<()> {
        self.db.lock().await.rename_workout(workout_id, name)?;
        self.notify();
        Ok(())
    }

    pub async fn delete_workout(&self, workout_id: i64) -> Result<()> {
        self.db.lock().await.delete_workout(workout_id)?;
        info!("Deleted workout {}", workout_id);
        self.notify();
        Ok(())
    }

    /// Refresh the workout's activity timestamp and propagate today's date
    /// to it and its exercises. Called when a set gets logged.
    pub async fn mark_workout_active(&self, workout_id: i64) -> Result<()> {
        {
            let db = self.db.lock().await;
            let date = today_string();
            db.touch_workout(workout_id, now_millis(), &date)?;
            db.touch_exercises_for_workout(workout_id, &date)?;
        }
        self.notify();
        Ok(())
    }

    // -------- Exercises --------

    /// Add an exercise, prefilled from its most recent prior occurrence
    pub async fn add_exercise(&self, workout_id: i64, name: &str) -> Result<i64> {
        let id = {
            let db = self.db.lock().await;
            HistoryEngine::new(&db).add_exercise(workout_id, name)?
        };
        self.notify();
        Ok(id)
    }

    pub async fn exercises_for_workout(&self, workout_id: i64) -> Result<Vec<Exercise>> {
        self.db.lock().await.exercises_for_workout(workout_id)
    }

    pub async fn exercise_by_id(
        &self,
        workout_id: i64,
        exercise_id: i64,
    ) -> Result<Option<Exercise>> {
        self.db.lock().await.exercise_by_id(workout_id, exercise_id)
    }

    pub async fn update_exercise_notes(&self, exercise_id: i64, notes: &str) -> Result<()> {
        self.db.lock().await.update_exercise_notes(exercise_id, notes)?;
        self.notify();
        Ok(())
    }

    pub async fn set_exercise_completed(&self, exercise_id: i64, completed: bool) -> Result<()> {
        let completed_at = completed.then(now_millis);
        self.db
            .lock()
            .await
            .set_exercise_completed(exercise_id, completed_at)?;
        self.notify();
        Ok(())
    }

    /// Clear completion marks that were set on an earlier day, so each
    /// session starts with a clean checklist
    pub async fn reset_completed_if_new_day(&self, workout_id: i64) -> Result<()> {
        let mut changed = false;
        {
            let db = self.db.lock().await;
            let today = Local::now().date_naive();
            for exercise in db.exercises_for_workout(workout_id)? {
                let Some(completed_at) = exercise.completed_at else {
                    continue;
                };
                let same_day = local_date_of_millis(completed_at) == Some(today);
                if !same_day {
                    if let Some(id) = exercise.id {
                        db.set_exercise_completed(id, None)?;
                        changed = true;
                    }
                }
            }
        }
        if changed {
            self.notify();
        }
        Ok(())
    }

    /// Stamp today's date on one exercise after it was worked
    pub async fn mark_exercise_performed(&self, exercise_id: i64) -> Result<()> {
        self.db
            .lock()
            .await
            .touch_exercise(exercise_id, &today_string())?;
        self.notify();
        Ok(())
    }

    pub async fn delete_exercise(&self, exercise_id: i64) -> Result<()> {
        self.db.lock().await.delete_exercise(exercise_id)?;
        self.notify();
        Ok(())
    }

    // -------- Sets --------

    /// Append a blank set, to be filled in by edits
    pub async fn add_empty_set(&self, exercise_id: i64) -> Result<i64> {
        self.add_set(exercise_id, 0, 0.0).await
    }

    pub async fn add_set(&self, exercise_id: i64, reps: i32, weight: f32) -> Result<i64> {
        let id = {
            let db = self.db.lock().await;
            db.add_set(&SetEntry {
                id: None,
                exercise_id,
                reps,
                weight,
                reps_left: None,
                reps_right: None,
            })?
        };
        self.notify();
        Ok(id)
    }

    pub async fn add_unilateral_set(
        &self,
        exercise_id: i64,
        reps_left: i32,
        reps_right: i32,
        weight: f32,
    ) -> Result<i64> {
        let id = {
            let db = self.db.lock().await;
            db.add_set(&SetEntry {
                id: None,
                exercise_id,
                reps: 0,
                weight,
                reps_left: Some(reps_left),
                reps_right: Some(reps_right),
            })?
        };
        self.notify();
        Ok(id)
    }

    pub async fn sets_for_exercise(&self, exercise_id: i64) -> Result<Vec<SetEntry>> {
        self.db.lock().await.sets_for_exercise(exercise_id)
    }

    /// Update the nth displayed set of an exercise. Out-of-range indices
    /// are a silent no-op; the row may have been removed by another view.
    pub async fn update_set(
        &self,
        exercise_id: i64,
        index: usize,
        reps: i32,
        weight: f32,
    ) -> Result<()> {
        let updated = {
            let db = self.db.lock().await;
            let sets = db.sets_for_exercise(exercise_id)?;
            match sets.into_iter().nth(index) {
                Some(set) => {
                    db.update_set(&SetEntry { reps, weight, ..set })?;
                    true
                }
                None => false,
            }
        };
        if updated {
            self.notify();
        }
        Ok(())
    }

    pub async fn update_unilateral_set(
        &self,
        exercise_id: i64,
        index: usize,
        reps_left: i32,
        reps_right: i32,
        weight: f32,
    ) -> Result<()> {
        let updated = {
            let db = self.db.lock().await;
            let sets = db.sets_for_exercise(exercise_id)?;
            match sets.into_iter().nth(index) {
                Some(set) => {
                    db.update_set(&SetEntry {
                        weight,
                        reps_left: Some(reps_left),
                        reps_right: Some(reps_right),
                        ..set
                    })?;
                    true
                }
                None => false,
            }
        };
        if updated {
            self.notify();
        }
        Ok(())
    }

    pub async fn remove_set(&self, exercise_id: i64, index: usize) -> Result<()> {
        let removed = {
            let db = self.db.lock().await;
            let sets = db.sets_for_exercise(exercise_id)?;
            match sets.into_iter().nth(index).and_then(|set| set.id) {
                Some(set_id) => {
                    db.delete_set(set_id)?;
                    true
                }
                None => false,
            }
        };
        if removed {
            self.notify();
        }
        Ok(())
    }

    pub async fn clear_all_sets(&self, exercise_id: i64) -> Result<()> {
        self.db.lock().await.clear_sets_for_exercise(exercise_id)?;
        self.notify();
        Ok(())
    }

    /// Drop all-zero leftovers, typically on leaving the edit view
    pub async fn remove_empty_sets(&self, workout_id: i64, exercise_id: i64) -> Result<()> {
        let removed = {
            let db = self.db.lock().await;
            HistoryEngine::new(&db).remove_empty_sets(workout_id, exercise_id)?
        };
        if removed > 0 {
            self.notify();
        }
        Ok(())
    }

    // -------- History --------

    /// Auto-repeat an empty workout from its last same-named session
    pub async fn repeat_last_if_empty(&self, workout_id: i64) -> Result<bool> {
        let repeated = {
            let db = self.db.lock().await;
            HistoryEngine::new(&db).repeat_last_if_empty(workout_id)?
        };
        if repeated {
            self.notify();
        }
        Ok(repeated)
    }

    /// All-time best set for an exercise name
    pub async fn pr_for_exercise_name(&self, name: &str) -> Result<Option<SetEntry>> {
        let db = self.db.lock().await;
        HistoryEngine::new(&db).pr_for_exercise_name(name)
    }

    /// Per-session history for an exercise name, newest first
    pub async fn exercise_history_for_name(&self, name: &str) -> Result<Vec<ExerciseHistoryEntry>> {
        let db = self.db.lock().await;
        HistoryEngine::new(&db).exercise_history_for_name(name)
    }

    pub async fn delete_exercise_session(&self, name: &str, workout_id: i64) -> Result<()> {
        {
            let db = self.db.lock().await;
            HistoryEngine::new(&db).delete_exercise_session(name, workout_id)?;
        }
        self.notify();
        Ok(())
    }

    // -------- Name picker --------

    /// Built-in catalog merged with every logged name, deduplicated
    /// case-insensitively, alphabetical
    pub async fn all_exercise_names(&self) -> Result<Vec<String>> {
        let logged = self.db.lock().await.all_exercise_names()?;
        let mut names = dedup_names(
            BUILT_IN_NAMES
                .iter()
                .map(|name| (*name).to_string())
                .chain(logged),
        );
        names.sort();
        Ok(names)
    }

    /// Prefix search for the picker: logged names by recency of use first,
    /// then matching built-ins alphabetically. Blank input lists everything.
    pub async fn search_exercise_names(&self, prefix: &str) -> Result<Vec<String>> {
        let trimmed = prefix.trim();
        if trimmed.is_empty() {
            return self.all_exercise_names().await;
        }

        let logged = self.db.lock().await.search_exercise_names(trimmed)?;
        let pattern = trimmed.to_lowercase();
        let mut built_in: Vec<String> = BUILT_IN_NAMES
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&pattern))
            .map(|name| (*name).to_string())
            .collect();
        built_in.sort();

        Ok(dedup_names(logged.into_iter().chain(built_in)))
    }

    // -------- Export --------

    /// Full nested dump of the store, for the JSON export command
    pub async fn dump(&self) -> Result<Vec<WorkoutDump>> {
        let db = self.db.lock().await;
        let mut dumps = Vec::new();
        for workout in db.workouts()? {
            let Some(workout_id) = workout.id else {
                continue;
            };
            let mut exercises = Vec::new();
            for exercise in db.exercises_for_workout(workout_id)? {
                let sets = match exercise.id {
                    Some(exercise_id) => db.sets_for_exercise(exercise_id)?,
                    None => Vec::new(),
                };
                exercises.push(ExerciseDump { exercise, sets });
            }
            dumps.push(WorkoutDump { workout, exercises });
        }
        Ok(dumps)
    }
}

/// One exercise with its sets, as exported
#[derive(Debug, Serialize)]
pub struct ExerciseDump {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub sets: Vec<SetEntry>,
}

/// One workout with its exercises, as exported
#[derive(Debug, Serialize)]
pub struct WorkoutDump {
    #[serde(flatten)]
    pub workout: Workout,
    pub exercises: Vec<ExerciseDump>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_workout_visible_in_snapshot() {
        let store = Store::open_in_memory().unwrap();
        store.add_workout("Leg Day").await.unwrap();

        let workouts = store.subscribe_workouts().snapshot().await.unwrap();
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].name, "Leg Day");
        assert!(!workouts[0].last_date.is_empty());
    }

    #[tokio::test]
    async fn test_live_subscription_sees_mutation() {
        let store = Store::open_in_memory().unwrap();
        let mut live = store.subscribe_workouts();

        store.add_workout("Push Day").await.unwrap();

        let workouts = live.next().await.unwrap().unwrap();
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].name, "Push Day");
    }

    #[tokio::test]
    async fn test_exercise_subscription_tracks_one_workout() {
        let store = Store::open_in_memory().unwrap();
        let a = store.add_workout("Push Day").await.unwrap();
        let b = store.add_workout("Pull Day").await.unwrap();
        store.add_exercise(a, "Bench Press").await.unwrap();
        store.add_exercise(b, "Barbell Row").await.unwrap();

        let exercises = store.subscribe_exercises(a).snapshot().await.unwrap();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].name, "Bench Press");
    }

    #[tokio::test]
    async fn test_update_set_by_index() {
        let store = Store::open_in_memory().unwrap();
        let w = store.add_workout("Leg Day").await.unwrap();
        let e = store.add_exercise(w, "Back Squat").await.unwrap();
        store.add_empty_set(e).await.unwrap();
        store.add_empty_set(e).await.unwrap();

        store.update_set(e, 1, 5, 185.0).await.unwrap();

        let sets = store.sets_for_exercise(e).await.unwrap();
        assert_eq!((sets[0].reps, sets[0].weight), (0, 0.0));
        assert_eq!((sets[1].reps, sets[1].weight), (5, 185.0));

        // Out of range: no-op
        store.update_set(e, 9, 9, 9.0).await.unwrap();
        assert_eq!(store.sets_for_exercise(e).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unilateral_set_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let w = store.add_workout("Leg Day").await.unwrap();
        let e = store.add_exercise(w, "Walking Lunge").await.unwrap();
        store.add_unilateral_set(e, 8, 8, 40.0).await.unwrap();
        store.update_unilateral_set(e, 0, 10, 9, 45.0).await.unwrap();

        let sets = store.sets_for_exercise(e).await.unwrap();
        assert_eq!(sets[0].reps_left, Some(10));
        assert_eq!(sets[0].reps_right, Some(9));
        assert_eq!(sets[0].weight, 45.0);
    }

    #[tokio::test]
    async fn test_remove_set_by_index() {
        let store = Store::open_in_memory().unwrap();
        let w = store.add_workout("Leg Day").await.unwrap();
        let e = store.add_exercise(w, "Back Squat").await.unwrap();
        store.add_set(e, 5, 185.0).await.unwrap();
        store.add_set(e, 3, 205.0).await.unwrap();

        store.remove_set(e, 0).await.unwrap();
        let sets = store.sets_for_exercise(e).await.unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].weight, 205.0);
    }

    #[tokio::test]
    async fn test_completion_resets_on_a_new_day() {
        let store = Store::open_in_memory().unwrap();
        let w = store.add_workout("Leg Day").await.unwrap();
        let today_done = store.add_exercise(w, "Back Squat").await.unwrap();
        let old_done = store.add_exercise(w, "Leg Press").await.unwrap();

        store.set_exercise_completed(today_done, true).await.unwrap();
        // Completed long ago (1970-01-01)
        store
            .db
            .lock()
            .await
            .set_exercise_completed(old_done, Some(1_000))
            .unwrap();

        store.reset_completed_if_new_day(w).await.unwrap();

        let exercises = store.exercises_for_workout(w).await.unwrap();
        let by_id = |id: i64| {
            exercises
                .iter()
                .find(|e| e.id == Some(id))
                .unwrap()
                .completed_at
        };
        assert!(by_id(today_done).is_some());
        assert!(by_id(old_done).is_none());
    }

    #[tokio::test]
    async fn test_search_merges_built_ins_after_logged_names() {
        let store = Store::open_in_memory().unwrap();
        let w = store.add_workout("Push Day").await.unwrap();
        store.add_exercise(w, "Bench Press").await.unwrap();

        let names = store.search_exercise_names("  be").await.unwrap();
        // Logged name first, no case-insensitive duplicate from the catalog
        assert_eq!(names[0], "Bench Press");
        assert_eq!(
            names.iter().filter(|n| n.to_lowercase() == "bench press").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_all_names_include_catalog_and_logged() {
        let store = Store::open_in_memory().unwrap();
        let w = store.add_workout("Leg Day").await.unwrap();
        store.add_exercise(w, "Zercher Squat").await.unwrap();

        let names = store.all_exercise_names().await.unwrap();
        assert!(names.iter().any(|n| n == "Zercher Squat"));
        assert!(names.iter().any(|n| n == "Deadlift"));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_dump_nests_exercises_and_sets() {
        let store = Store::open_in_memory().unwrap();
        let w = store.add_workout("Leg Day").await.unwrap();
        let e = store.add_exercise(w, "Back Squat").await.unwrap();
        store.add_set(e, 5, 185.0).await.unwrap();

        let dump = store.dump().await.unwrap();
        assert_eq!(dump.len(), 1);
        assert_eq!(dump[0].exercises.len(), 1);
        assert_eq!(dump[0].exercises[0].sets.len(), 1);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json[0]["exercises"][0]["sets"][0]["reps"], 5);
    }
}

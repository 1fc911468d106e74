//! Database module - SQLite storage for workouts, exercises and sets

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use serde::{Deserialize, Serialize};

/// A named training session. Owns an ordered list of exercises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: Option<i64>,
    pub name: String,
    /// Last-activity time in Unix milliseconds. Drives "most recent by name" queries.
    pub timestamp: i64,
    /// Display-only date string (`%Y-%m-%d`), refreshed when the workout is touched.
    pub last_date: String,
    pub notes: Option<String>,
}

/// One movement performed within a specific workout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Option<i64>,
    pub workout_id: i64,
    pub name: String,
    pub last_date: String,
    pub notes: Option<String>,
    /// Display order within the workout, assigned `max(existing)+1` on insert.
    pub position: i32,
    /// Unix milliseconds when marked done, `None` = not completed today.
    pub completed_at: Option<i64>,
}

/// One logged set. Reps may mean seconds for timed holds;
/// left/right reps are present only for unilateral work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub id: Option<i64>,
    pub exercise_id: i64,
    pub reps: i32,
    pub weight: f32,
    pub reps_left: Option<i32>,
    pub reps_right: Option<i32>,
}

impl SetEntry {
    /// A set with no data in any field. Candidates for silent cleanup.
    pub fn is_empty(&self) -> bool {
        self.reps == 0
            && self.weight == 0.0
            && self.reps_left.unwrap_or(0) == 0
            && self.reps_right.unwrap_or(0) == 0
    }
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // Cascade deletes (workouts -> exercises -> sets) need this per connection
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                last_date TEXT NOT NULL DEFAULT '',
                notes TEXT
            )",
            [],
        )?;
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                last_date TEXT NOT NULL DEFAULT '',
                notes TEXT,
                position INTEGER NOT NULL DEFAULT 0,
                completed_at INTEGER
            )",
            [],
        )?;
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
                reps INTEGER NOT NULL DEFAULT 0,
                weight REAL NOT NULL DEFAULT 0,
                reps_left INTEGER,
                reps_right INTEGER
            )",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_exercises_workout ON exercises(workout_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sets_exercise ON sets(exercise_id)",
            [],
        )?;

        // Migration: add completed_at column if missing
        let has_completed: bool = self
            .conn
            .prepare("SELECT completed_at FROM exercises LIMIT 1")
            .is_ok();
        if !has_completed {
            let _ = self.conn.execute(
                "ALTER TABLE exercises ADD COLUMN completed_at INTEGER",
                [],
            );
        }

        // Migration: add left/right rep columns if missing
        let has_sides: bool = self
            .conn
            .prepare("SELECT reps_left FROM sets LIMIT 1")
            .is_ok();
        if !has_sides {
            let _ = self.conn.execute(
                "ALTER TABLE sets ADD COLUMN reps_left INTEGER",
                [],
            );
            let _ = self.conn.execute(
                "ALTER TABLE sets ADD COLUMN reps_right INTEGER",
                [],
            );
        }

        Ok(())
    }

    /// BEGIN a transaction on the shared connection. Rolls back on drop
    /// unless committed.
    pub(crate) fn transaction(&self) -> Result<Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }

    // -------- Workouts --------

    /// Insert a new workout record
    pub fn add_workout(&self, workout: &Workout) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO workouts (name, timestamp, last_date, notes) VALUES (?1, ?2, ?3, ?4)",
            params![
                workout.name,
                workout.timestamp,
                workout.last_date,
                workout.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All workouts, newest activity first
    pub fn workouts(&self) -> Result<Vec<Workout>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, timestamp, last_date, notes FROM workouts
             ORDER BY timestamp DESC, id DESC",
        )?;
        let workouts = stmt
            .query_map([], row_to_workout)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(workouts)
    }

    pub fn workout_by_id(&self, id: i64) -> Result<Option<Workout>> {
        let workout = self
            .conn
            .query_row(
                "SELECT id, name, timestamp, last_date, notes FROM workouts WHERE id = ?1",
                params![id],
                row_to_workout,
            )
            .optional()?;
        Ok(workout)
    }

    /// Newest workout with the same name strictly before a given time.
    /// Name match is case-insensitive. Used by auto-repeat.
    pub fn last_workout_by_name_before(
        &self,
        name: &str,
        before_millis: i64,
    ) -> Result<Option<Workout>> {
        let workout = self
            .conn
            .query_row(
                "SELECT id, name, timestamp, last_date, notes FROM workouts
                 WHERE LOWER(name) = LOWER(?1) AND timestamp < ?2
                 ORDER BY timestamp DESC, id DESC
                 LIMIT 1",
                params![name, before_millis],
                row_to_workout,
            )
            .optional()?;
        Ok(workout)
    }

    pub fn rename_workout(&self, id: i64, name: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE workouts SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        Ok(())
    }

    /// Refresh a workout's activity timestamp and display date
    pub fn touch_workout(&self, id: i64, timestamp: i64, date: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE workouts SET timestamp = ?1, last_date = ?2 WHERE id = ?3",
            params![timestamp, date, id],
        )?;
        Ok(())
    }

    pub fn delete_workout(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM workouts WHERE id = ?1", params![id])?;
        Ok(())
    }

    // -------- Exercises --------

    /// Insert a new exercise record
    pub fn add_exercise(&self, exercise: &Exercise) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO exercises (workout_id, name, last_date, notes, position, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                exercise.workout_id,
                exercise.name,
                exercise.last_date,
                exercise.notes,
                exercise.position,
                exercise.completed_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Exercises of one workout in display order
    pub fn exercises_for_workout(&self, workout_id: i64) -> Result<Vec<Exercise>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workout_id, name, last_date, notes, position, completed_at
             FROM exercises WHERE workout_id = ?1
             ORDER BY position ASC, id ASC",
        )?;
        let exercises = stmt
            .query_map(params![workout_id], row_to_exercise)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(exercises)
    }

    pub fn exercise_by_id(&self, workout_id: i64, exercise_id: i64) -> Result<Option<Exercise>> {
        let exercise = self
            .conn
            .query_row(
                "SELECT id, workout_id, name, last_date, notes, position, completed_at
                 FROM exercises WHERE id = ?1 AND workout_id = ?2",
                params![exercise_id, workout_id],
                row_to_exercise,
            )
            .optional()?;
        Ok(exercise)
    }

    pub fn exercise_count_for_workout(&self, workout_id: i64) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM exercises WHERE workout_id = ?1",
            params![workout_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Next insert position is this plus one; -1 for an empty workout
    pub fn max_position_for_workout(&self, workout_id: i64) -> Result<i32> {
        let max = self.conn.query_row(
            "SELECT COALESCE(MAX(position), -1) FROM exercises WHERE workout_id = ?1",
            params![workout_id],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    /// Most recent occurrence of an exercise name across all workouts,
    /// ranked by the owning workout's activity time. Case-insensitive.
    pub fn last_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>> {
        let exercise = self
            .conn
            .query_row(
                "SELECT e.id, e.workout_id, e.name, e.last_date, e.notes, e.position, e.completed_at
                 FROM exercises e
                 INNER JOIN workouts w ON w.id = e.workout_id
                 WHERE LOWER(e.name) = LOWER(?1)
                 ORDER BY w.timestamp DESC, e.id DESC
                 LIMIT 1",
                params![name],
                row_to_exercise,
            )
            .optional()?;
        Ok(exercise)
    }

    /// Same lookup as [`Self::last_exercise_by_name`] but ignoring one
    /// workout. Auto-repeat inserts into the target before resolving sets,
    /// so the target's own rows must not win the recency race.
    pub fn last_exercise_by_name_excluding_workout(
        &self,
        name: &str,
        workout_id: i64,
    ) -> Result<Option<Exercise>> {
        let exercise = self
            .conn
            .query_row(
                "SELECT e.id, e.workout_id, e.name, e.last_date, e.notes, e.position, e.completed_at
                 FROM exercises e
                 INNER JOIN workouts w ON w.id = e.workout_id
                 WHERE LOWER(e.name) = LOWER(?1) AND e.workout_id != ?2
                 ORDER BY w.timestamp DESC, e.id DESC
                 LIMIT 1",
                params![name, workout_id],
                row_to_exercise,
            )
            .optional()?;
        Ok(exercise)
    }

    /// Every occurrence of an exercise name, newest workout first.
    /// Rows of the same workout come out adjacent so callers can group them.
    pub fn exercises_by_name(&self, name: &str) -> Result<Vec<Exercise>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.id, e.workout_id, e.name, e.last_date, e.notes, e.position, e.completed_at
             FROM exercises e
             INNER JOIN workouts w ON w.id = e.workout_id
             WHERE LOWER(e.name) = LOWER(?1)
             ORDER BY w.timestamp DESC, e.workout_id DESC, e.id ASC",
        )?;
        let exercises = stmt
            .query_map(params![name], row_to_exercise)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(exercises)
    }

    pub fn update_exercise_notes(&self, exercise_id: i64, notes: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE exercises SET notes = ?1 WHERE id = ?2",
            params![notes, exercise_id],
        )?;
        Ok(())
    }

    pub fn set_exercise_completed(
        &self,
        exercise_id: i64,
        completed_at: Option<i64>,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE exercises SET completed_at = ?1 WHERE id = ?2",
            params![completed_at, exercise_id],
        )?;
        Ok(())
    }

    pub fn touch_exercise(&self, exercise_id: i64, date: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE exercises SET last_date = ?1 WHERE id = ?2",
            params![date, exercise_id],
        )?;
        Ok(())
    }

    pub fn touch_exercises_for_workout(&self, workout_id: i64, date: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE exercises SET last_date = ?1 WHERE workout_id = ?2",
            params![date, workout_id],
        )?;
        Ok(())
    }

    pub fn delete_exercise(&self, exercise_id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM exercises WHERE id = ?1", params![exercise_id])?;
        Ok(())
    }

    /// Delete all same-named exercise rows in one workout (sets cascade).
    /// Other workouts' occurrences are untouched.
    pub fn delete_exercises_by_name_in_workout(
        &self,
        name: &str,
        workout_id: i64,
    ) -> Result<()> {
        self.conn.execute(
            "DELETE FROM exercises WHERE workout_id = ?1 AND LOWER(name) = LOWER(?2)",
            params![workout_id, name],
        )?;
        Ok(())
    }

    /// Distinct logged exercise names
    pub fn all_exercise_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM exercises GROUP BY LOWER(name) ORDER BY name ASC",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Prefix search over logged names, most recently used first,
    /// then alphabetical
    pub fn search_exercise_names(&self, prefix: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.name
             FROM exercises e
             INNER JOIN workouts w ON w.id = e.workout_id
             WHERE e.name LIKE ?1 || '%'
             GROUP BY LOWER(e.name)
             ORDER BY MAX(w.timestamp) DESC, e.name ASC",
        )?;
        let names = stmt
            .query_map(params![prefix], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    // -------- Sets --------

    /// Insert a new set record
    pub fn add_set(&self, set: &SetEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sets (exercise_id, reps, weight, reps_left, reps_right)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                set.exercise_id,
                set.reps,
                set.weight,
                set.reps_left,
                set.reps_right,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Sets of one exercise in insertion order
    pub fn sets_for_exercise(&self, exercise_id: i64) -> Result<Vec<SetEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, exercise_id, reps, weight, reps_left, reps_right
             FROM sets WHERE exercise_id = ?1 ORDER BY id ASC",
        )?;
        let sets = stmt
            .query_map(params![exercise_id], row_to_set)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sets)
    }

    /// Update a set in place by its primary key
    pub fn update_set(&self, set: &SetEntry) -> Result<()> {
        self.conn.execute(
            "UPDATE sets SET reps = ?1, weight = ?2, reps_left = ?3, reps_right = ?4
             WHERE id = ?5",
            params![set.reps, set.weight, set.reps_left, set.reps_right, set.id],
        )?;
        Ok(())
    }

    pub fn delete_set(&self, set_id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM sets WHERE id = ?1", params![set_id])?;
        Ok(())
    }

    pub fn clear_sets_for_exercise(&self, exercise_id: i64) -> Result<()> {
        self.conn.execute(
            "DELETE FROM sets WHERE exercise_id = ?1",
            params![exercise_id],
        )?;
        Ok(())
    }

    /// Delete all-zero sets under an exercise. Idempotent.
    pub fn delete_empty_sets(&self, exercise_id: i64) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM sets
             WHERE exercise_id = ?1
               AND reps = 0 AND weight = 0
               AND COALESCE(reps_left, 0) = 0
               AND COALESCE(reps_right, 0) = 0",
            params![exercise_id],
        )?;
        Ok(deleted)
    }
}

fn row_to_workout(row: &rusqlite::Row) -> rusqlite::Result<Workout> {
    Ok(Workout {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        timestamp: row.get(2)?,
        last_date: row.get(3)?,
        notes: row.get(4)?,
    })
}

fn row_to_exercise(row: &rusqlite::Row) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: Some(row.get(0)?),
        workout_id: row.get(1)?,
        name: row.get(2)?,
        last_date: row.get(3)?,
        notes: row.get(4)?,
        position: row.get(5)?,
        completed_at: row.get(6)?,
    })
}

fn row_to_set(row: &rusqlite::Row) -> rusqlite::Result<SetEntry> {
    Ok(SetEntry {
        id: Some(row.get(0)?),
        exercise_id: row.get(1)?,
        reps: row.get(2)?,
        weight: row.get(3)?,
        reps_left: row.get(4)?,
        reps_right: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout(name: &str, timestamp: i64) -> Workout {
        Workout {
            id: None,
            name: name.to_string(),
            timestamp,
            last_date: String::new(),
            notes: None,
        }
    }

    fn exercise(workout_id: i64, name: &str, position: i32) -> Exercise {
        Exercise {
            id: None,
            workout_id,
            name: name.to_string(),
            last_date: String::new(),
            notes: None,
            position,
            completed_at: None,
        }
    }

    fn set(exercise_id: i64, reps: i32, weight: f32) -> SetEntry {
        SetEntry {
            id: None,
            exercise_id,
            reps,
            weight,
            reps_left: None,
            reps_right: None,
        }
    }

    #[test]
    fn test_workouts_ordered_by_recency() {
        let db = Database::open_in_memory().unwrap();
        db.add_workout(&workout("Push Day", 100)).unwrap();
        db.add_workout(&workout("Pull Day", 300)).unwrap();
        db.add_workout(&workout("Leg Day", 200)).unwrap();

        let names: Vec<String> = db.workouts().unwrap().into_iter().map(|w| w.name).collect();
        assert_eq!(names, vec!["Pull Day", "Leg Day", "Push Day"]);
    }

    #[test]
    fn test_workout_by_id_missing_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.workout_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_last_workout_by_name_before_is_strict() {
        let db = Database::open_in_memory().unwrap();
        let first = db.add_workout(&workout("Leg Day", 100)).unwrap();
        db.add_workout(&workout("Leg Day", 300)).unwrap();

        // The workout at t=300 must not see itself or anything later
        let prev = db.last_workout_by_name_before("Leg Day", 300).unwrap();
        assert_eq!(prev.unwrap().id, Some(first));

        assert!(
            db.last_workout_by_name_before("Leg Day", 100)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_last_workout_by_name_case_insensitive() {
        let db = Database::open_in_memory().unwrap();
        let id = db.add_workout(&workout("Leg Day", 100)).unwrap();
        let prev = db.last_workout_by_name_before("LEG DAY", 200).unwrap();
        assert_eq!(prev.unwrap().id, Some(id));
    }

    #[test]
    fn test_exercises_ordered_by_position_then_id() {
        let db = Database::open_in_memory().unwrap();
        let w = db.add_workout(&workout("Push Day", 100)).unwrap();
        db.add_exercise(&exercise(w, "Dips", 2)).unwrap();
        db.add_exercise(&exercise(w, "Bench Press", 0)).unwrap();
        db.add_exercise(&exercise(w, "Overhead Press", 1)).unwrap();

        let names: Vec<String> = db
            .exercises_for_workout(w)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Bench Press", "Overhead Press", "Dips"]);
    }

    #[test]
    fn test_max_position_empty_workout() {
        let db = Database::open_in_memory().unwrap();
        let w = db.add_workout(&workout("Push Day", 100)).unwrap();
        assert_eq!(db.max_position_for_workout(w).unwrap(), -1);
        db.add_exercise(&exercise(w, "Bench Press", 3)).unwrap();
        assert_eq!(db.max_position_for_workout(w).unwrap(), 3);
    }

    #[test]
    fn test_last_exercise_by_name_ranks_by_workout_timestamp() {
        let db = Database::open_in_memory().unwrap();
        let old = db.add_workout(&workout("Leg Day", 100)).unwrap();
        let new = db.add_workout(&workout("Leg Day", 200)).unwrap();
        db.add_exercise(&exercise(old, "Back Squat", 0)).unwrap();
        let newer = db.add_exercise(&exercise(new, "Back Squat", 0)).unwrap();

        let found = db.last_exercise_by_name("back squat").unwrap().unwrap();
        assert_eq!(found.id, Some(newer));
    }

    #[test]
    fn test_delete_workout_cascades_to_exercises_and_sets() {
        let db = Database::open_in_memory().unwrap();
        let w = db.add_workout(&workout("Leg Day", 100)).unwrap();
        let e = db.add_exercise(&exercise(w, "Back Squat", 0)).unwrap();
        db.add_set(&set(e, 5, 185.0)).unwrap();

        db.delete_workout(w).unwrap();
        assert!(db.exercises_for_workout(w).unwrap().is_empty());
        assert!(db.sets_for_exercise(e).unwrap().is_empty());
    }

    #[test]
    fn test_delete_exercise_removes_only_own_sets() {
        let db = Database::open_in_memory().unwrap();
        let w = db.add_workout(&workout("Leg Day", 100)).unwrap();
        let a = db.add_exercise(&exercise(w, "Back Squat", 0)).unwrap();
        let b = db.add_exercise(&exercise(w, "Leg Press", 1)).unwrap();
        db.add_set(&set(a, 5, 185.0)).unwrap();
        db.add_set(&set(b, 10, 90.0)).unwrap();

        db.delete_exercise(a).unwrap();
        assert!(db.sets_for_exercise(a).unwrap().is_empty());
        assert_eq!(db.sets_for_exercise(b).unwrap().len(), 1);
    }

    #[test]
    fn test_search_names_prefix_and_recency() {
        let db = Database::open_in_memory().unwrap();
        let old = db.add_workout(&workout("A", 100)).unwrap();
        let new = db.add_workout(&workout("B", 200)).unwrap();
        db.add_exercise(&exercise(old, "Bench Press", 0)).unwrap();
        db.add_exercise(&exercise(new, "Barbell Row", 0)).unwrap();
        db.add_exercise(&exercise(old, "Deadlift", 1)).unwrap();

        let names = db.search_exercise_names("b").unwrap();
        // Most recently used first, prefix-matched only
        assert_eq!(names, vec!["Barbell Row", "Bench Press"]);
    }

    #[test]
    fn test_empty_set_predicate() {
        let blank = set(1, 0, 0.0);
        assert!(blank.is_empty());
        assert!(!SetEntry { reps: 5, ..blank.clone() }.is_empty());
        assert!(!SetEntry { weight: 20.0, ..blank.clone() }.is_empty());
        assert!(!SetEntry { reps_left: Some(8), ..blank.clone() }.is_empty());
        assert!(
            SetEntry {
                reps_left: Some(0),
                reps_right: Some(0),
                ..blank.clone()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_delete_empty_sets_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let w = db.add_workout(&workout("Leg Day", 100)).unwrap();
        let e = db.add_exercise(&exercise(w, "Back Squat", 0)).unwrap();
        db.add_set(&set(e, 0, 0.0)).unwrap();
        db.add_set(&set(e, 5, 185.0)).unwrap();
        db.add_set(&set(e, 0, 0.0)).unwrap();

        assert_eq!(db.delete_empty_sets(e).unwrap(), 2);
        assert_eq!(db.delete_empty_sets(e).unwrap(), 0);
        assert_eq!(db.sets_for_exercise(e).unwrap().len(), 1);
    }
}

//! Exercise definitions - kind classification and built-in catalog

use serde::{Deserialize, Serialize};

/// Conceptual shape of an exercise: which fields a set of it tracks.
/// Derived from the name alone, never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExerciseKind {
    WeightReps,     // standard: bench, squat, rows
    TimedHold,      // plank, wall sit (reps field holds seconds)
    UnilateralReps, // lunges, curls where L/R reps can differ
    RepsOnly,       // push-ups, sit-ups (no weight)
}

/// What kind of data an exercise tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseTypeConfig {
    pub kind: ExerciseKind,
    pub tracks_weight: bool,
    pub tracks_reps: bool,
    pub tracks_time: bool,
    pub tracks_sides: bool,
}

pub const WEIGHT_REPS: ExerciseTypeConfig = ExerciseTypeConfig {
    kind: ExerciseKind::WeightReps,
    tracks_weight: true,
    tracks_reps: true,
    tracks_time: false,
    tracks_sides: false,
};

pub const TIMED_HOLD: ExerciseTypeConfig = ExerciseTypeConfig {
    kind: ExerciseKind::TimedHold,
    tracks_weight: false,
    tracks_reps: false,
    tracks_time: true,
    tracks_sides: false,
};

pub const UNILATERAL_REPS: ExerciseTypeConfig = ExerciseTypeConfig {
    kind: ExerciseKind::UnilateralReps,
    tracks_weight: true,
    tracks_reps: true,
    tracks_time: false,
    tracks_sides: true,
};

pub const REPS_ONLY: ExerciseTypeConfig = ExerciseTypeConfig {
    kind: ExerciseKind::RepsOnly,
    tracks_weight: false,
    tracks_reps: true,
    tracks_time: false,
    tracks_sides: false,
};

/// The single normalization point for name keys: trim + lowercase.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalized name -> non-default kind. Everything else is weight x reps.
const KIND_TABLE: &[(&str, ExerciseTypeConfig)] = &[
    // Timed holds
    ("plank", TIMED_HOLD),
    ("side plank", TIMED_HOLD),
    ("wall sit", TIMED_HOLD),
    // Unilateral: lunges, curls, single-leg work
    ("lunge", UNILATERAL_REPS),
    ("walking lunge", UNILATERAL_REPS),
    ("reverse lunge", UNILATERAL_REPS),
    ("bulgarian split squat", UNILATERAL_REPS),
    ("single-leg romanian deadlift", UNILATERAL_REPS),
    ("single-arm row", UNILATERAL_REPS),
    ("dumbbell curl", UNILATERAL_REPS),
    ("hammer curl", UNILATERAL_REPS),
    // Reps-only bodyweight
    ("push-up", REPS_ONLY),
    ("pull-up", REPS_ONLY),
    ("chin-up", REPS_ONLY),
    ("sit-up", REPS_ONLY),
    ("air squat", REPS_ONLY),
];

/// Configuration for a given exercise name, falling back to weight x reps
pub fn config_for_name(name: &str) -> ExerciseTypeConfig {
    let key = normalize(name);
    KIND_TABLE
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, config)| *config)
        .unwrap_or(WEIGHT_REPS)
}

pub fn kind_for_name(name: &str) -> ExerciseKind {
    config_for_name(name).kind
}

pub fn is_timed_hold(name: &str) -> bool {
    kind_for_name(name) == ExerciseKind::TimedHold
}

pub fn is_unilateral(name: &str) -> bool {
    kind_for_name(name) == ExerciseKind::UnilateralReps
}

/// Built-in suggestions for the exercise picker, merged with logged names.
/// Kept in Title Case.
pub const BUILT_IN_NAMES: &[&str] = &[
    // Big compounds
    "Barbell Squat",
    "Front Squat",
    "Romanian Deadlift",
    "Deadlift",
    "Bench Press",
    "Incline Bench Press",
    "Overhead Press",
    "Barbell Row",
    "Pull-Up",
    "Chin-Up",
    // Dumbbell variants
    "Dumbbell Bench Press",
    "Dumbbell Shoulder Press",
    "Dumbbell Row",
    "Dumbbell Flye",
    "Dumbbell Lateral Raise",
    "Dumbbell Curl",
    "Hammer Curl",
    "Dumbbell Triceps Extension",
    // Machines / cables
    "Lat Pulldown",
    "Seated Cable Row",
    "Leg Press",
    "Leg Curl",
    "Leg Extension",
    "Calf Raise",
    "Cable Curl",
    "Cable Triceps Pushdown",
    "Face Pull",
    // Bodyweight
    "Push-Up",
    "Dips",
    "Plank",
    "Side Plank",
    "Hip Thrust",
    "Glute Bridge",
    "Russian Twists",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Back Squat "), "back squat");
    }

    #[test]
    fn test_unknown_name_defaults_to_weight_reps() {
        let config = config_for_name("Zercher Squat");
        assert_eq!(config.kind, ExerciseKind::WeightReps);
        assert!(config.tracks_weight);
        assert!(config.tracks_reps);
    }

    #[test]
    fn test_classification_ignores_case_and_whitespace() {
        assert_eq!(kind_for_name(" PLANK "), ExerciseKind::TimedHold);
        assert_eq!(kind_for_name("plank"), ExerciseKind::TimedHold);
    }

    #[test]
    fn test_timed_hold_tracks_time_only() {
        let config = config_for_name("Plank");
        assert!(is_timed_hold("Plank"));
        assert!(config.tracks_time);
        assert!(!config.tracks_weight);
        assert!(!config.tracks_reps);
    }

    #[test]
    fn test_unilateral_tracks_sides_and_weight() {
        let config = config_for_name("Walking Lunge");
        assert!(is_unilateral("Walking Lunge"));
        assert!(config.tracks_sides);
        assert!(config.tracks_weight);
    }

    #[test]
    fn test_reps_only_has_no_weight() {
        let config = config_for_name("Push-Up");
        assert_eq!(config.kind, ExerciseKind::RepsOnly);
        assert!(!config.tracks_weight);
        assert!(config.tracks_reps);
    }
}

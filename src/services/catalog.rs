//! Static exercise and muscle-group catalog, plus the recovery tuning table.
//!
//! All of the fixed domain data lives here: which muscle groups exist, which
//! muscles each exercise trains (and whether as the main target or as
//! supporting work), per-muscle base recovery windows, and the tunable
//! constants of the fatigue model. Loaded once at startup and immutable
//! thereafter, so fixture tables can be swapped in tests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors raised when the tuning table is missing required entries.
///
/// A missing base cooldown must never silently default — an incorrect
/// recovery window would misinform training decisions.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("no base cooldown configured for muscle group '{0}'")]
    MissingBaseCooldown(MuscleGroup),
}

/// The muscle groups tracked by the recovery engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Core,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    LowerBack,
}

impl MuscleGroup {
    /// All muscle groups, in catalog order.
    pub const ALL: [MuscleGroup; 12] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Biceps,
        MuscleGroup::Triceps,
        MuscleGroup::Forearms,
        MuscleGroup::Core,
        MuscleGroup::Quads,
        MuscleGroup::Hamstrings,
        MuscleGroup::Glutes,
        MuscleGroup::Calves,
        MuscleGroup::LowerBack,
    ];

    /// Stable snake_case identifier, matching the JSON serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Forearms => "forearms",
            MuscleGroup::Core => "core",
            MuscleGroup::Quads => "quads",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Calves => "calves",
            MuscleGroup::LowerBack => "lower_back",
        }
    }

    /// Parse a snake_case identifier (as used in URL path segments).
    pub fn parse(s: &str) -> Option<MuscleGroup> {
        MuscleGroup::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an exercise trains a muscle as its main target or as
/// supporting/indirect work. Secondary work fatigues a muscle less than
/// direct training (see [`RecoveryTuning::secondary_discount`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MuscleRole {
    Primary,
    Secondary,
}

/// A catalog exercise and the muscle groups it trains.
#[derive(Debug, Clone)]
pub struct ExerciseDef {
    pub id: &'static str,
    pub name: &'static str,
    pub muscles: &'static [(MuscleGroup, MuscleRole)],
}

use MuscleGroup::*;
use MuscleRole::{Primary, Secondary};

/// The exercise catalog. Invariant: every exercise has at least one
/// primary muscle (checked by tests).
pub static EXERCISES: &[ExerciseDef] = &[
    ExerciseDef {
        id: "back_squat",
        name: "Back Squat",
        muscles: &[
            (Quads, Primary),
            (Glutes, Secondary),
            (Hamstrings, Secondary),
            (LowerBack, Secondary),
            (Core, Secondary),
        ],
    },
    ExerciseDef {
        id: "front_squat",
        name: "Front Squat",
        muscles: &[(Quads, Primary), (Glutes, Secondary), (Core, Secondary)],
    },
    ExerciseDef {
        id: "leg_press",
        name: "Leg Press",
        muscles: &[(Quads, Primary), (Glutes, Secondary)],
    },
    ExerciseDef {
        id: "leg_extension",
        name: "Leg Extension",
        muscles: &[(Quads, Primary)],
    },
    ExerciseDef {
        id: "deadlift",
        name: "Deadlift",
        muscles: &[
            (Hamstrings, Primary),
            (LowerBack, Primary),
            (Glutes, Secondary),
            (Back, Secondary),
            (Forearms, Secondary),
        ],
    },
    ExerciseDef {
        id: "romanian_deadlift",
        name: "Romanian Deadlift",
        muscles: &[
            (Hamstrings, Primary),
            (Glutes, Secondary),
            (LowerBack, Secondary),
        ],
    },
    ExerciseDef {
        id: "leg_curl",
        name: "Leg Curl",
        muscles: &[(Hamstrings, Primary)],
    },
    ExerciseDef {
        id: "hip_thrust",
        name: "Hip Thrust",
        muscles: &[(Glutes, Primary), (Hamstrings, Secondary)],
    },
    ExerciseDef {
        id: "walking_lunge",
        name: "Walking Lunge",
        muscles: &[
            (Quads, Primary),
            (Glutes, Secondary),
            (Hamstrings, Secondary),
        ],
    },
    ExerciseDef {
        id: "standing_calf_raise",
        name: "Standing Calf Raise",
        muscles: &[(Calves, Primary)],
    },
    ExerciseDef {
        id: "bench_press",
        name: "Bench Press",
        muscles: &[
            (Chest, Primary),
            (Shoulders, Secondary),
            (Triceps, Secondary),
        ],
    },
    ExerciseDef {
        id: "incline_bench_press",
        name: "Incline Bench Press",
        muscles: &[
            (Chest, Primary),
            (Shoulders, Secondary),
            (Triceps, Secondary),
        ],
    },
    ExerciseDef {
        id: "dumbbell_fly",
        name: "Dumbbell Fly",
        muscles: &[(Chest, Primary), (Shoulders, Secondary)],
    },
    ExerciseDef {
        id: "push_up",
        name: "Push-Up",
        muscles: &[
            (Chest, Primary),
            (Triceps, Secondary),
            (Shoulders, Secondary),
            (Core, Secondary),
        ],
    },
    ExerciseDef {
        id: "overhead_press",
        name: "Overhead Press",
        muscles: &[(Shoulders, Primary), (Triceps, Secondary), (Core, Secondary)],
    },
    ExerciseDef {
        id: "lateral_raise",
        name: "Lateral Raise",
        muscles: &[(Shoulders, Primary)],
    },
    ExerciseDef {
        id: "pull_up",
        name: "Pull-Up",
        muscles: &[(Back, Primary), (Biceps, Secondary), (Forearms, Secondary)],
    },
    ExerciseDef {
        id: "lat_pulldown",
        name: "Lat Pulldown",
        muscles: &[(Back, Primary), (Biceps, Secondary)],
    },
    ExerciseDef {
        id: "barbell_row",
        name: "Barbell Row",
        muscles: &[
            (Back, Primary),
            (Biceps, Secondary),
            (LowerBack, Secondary),
            (Forearms, Secondary),
        ],
    },
    ExerciseDef {
        id: "barbell_curl",
        name: "Barbell Curl",
        muscles: &[(Biceps, Primary), (Forearms, Secondary)],
    },
    ExerciseDef {
        id: "hammer_curl",
        name: "Hammer Curl",
        muscles: &[(Biceps, Primary), (Forearms, Secondary)],
    },
    ExerciseDef {
        id: "triceps_pushdown",
        name: "Triceps Pushdown",
        muscles: &[(Triceps, Primary)],
    },
    ExerciseDef {
        id: "skullcrusher",
        name: "Skullcrusher",
        muscles: &[(Triceps, Primary)],
    },
    ExerciseDef {
        id: "wrist_curl",
        name: "Wrist Curl",
        muscles: &[(Forearms, Primary)],
    },
    ExerciseDef {
        id: "plank",
        name: "Plank",
        muscles: &[(Core, Primary)],
    },
    ExerciseDef {
        id: "cable_crunch",
        name: "Cable Crunch",
        muscles: &[(Core, Primary)],
    },
    ExerciseDef {
        id: "back_extension",
        name: "Back Extension",
        muscles: &[
            (LowerBack, Primary),
            (Glutes, Secondary),
            (Hamstrings, Secondary),
        ],
    },
];

static EXERCISE_INDEX: LazyLock<BTreeMap<&'static str, &'static ExerciseDef>> =
    LazyLock::new(|| EXERCISES.iter().map(|e| (e.id, e)).collect());

/// Look up an exercise by catalog id.
///
/// Unknown ids return `None`; callers in the fatigue engine skip such sets
/// silently (a deleted exercise must not fail the whole computation).
pub fn find_exercise(id: &str) -> Option<&'static ExerciseDef> {
    EXERCISE_INDEX.get(id).copied()
}

// --- Recovery tuning ---

/// Secondary (indirect) work counts at half the rate of direct training.
pub const DEFAULT_SECONDARY_DISCOUNT: f64 = 0.5;

/// Effective sets in a "normal" session; the volume multiplier is measured
/// against this baseline.
pub const DEFAULT_VOLUME_BASELINE: f64 = 3.0;

/// Upper cap on the volume multiplier, so extreme-volume sessions cannot
/// produce runaway cooldowns.
pub const DEFAULT_VOLUME_CAP: f64 = 2.0;

/// How far back logged sets contribute to fatigue, bounded by the longest
/// plausible cooldown (7 days).
pub const DEFAULT_LOOKBACK_HOURS: i64 = 7 * 24;

/// Age-bucket recovery modifiers. Buckets are inclusive-lower /
/// exclusive-upper; a missing age falls back to the under-30 modifier.
pub const AGE_MODIFIER_UNDER_30: f64 = 1.0;
pub const AGE_MODIFIER_30_TO_40: f64 = 1.15;
pub const AGE_MODIFIER_40_TO_50: f64 = 1.3;
pub const AGE_MODIFIER_50_PLUS: f64 = 1.5;

/// Which recovery decay curve to apply.
///
/// Both curves satisfy: percent(0) = 100, percent(final) = 0, monotonically
/// non-increasing in elapsed time. Linear matches the progress-bar behavior
/// the client renders; the front-loaded curve drops faster early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayCurve {
    Linear,
    FrontLoaded,
}

/// Immutable per-process recovery model configuration.
#[derive(Debug, Clone)]
pub struct RecoveryTuning {
    /// Base recovery window per muscle group, before volume/age adjustment.
    pub base_cooldown_hours: BTreeMap<MuscleGroup, i64>,
    pub secondary_discount: f64,
    pub volume_baseline: f64,
    pub volume_cap: f64,
    pub lookback_hours: i64,
    pub decay: DecayCurve,
}

impl Default for RecoveryTuning {
    fn default() -> Self {
        // Large muscle groups and spinal loaders recover slowest; small
        // accessory muscles fastest.
        let base_cooldown_hours = BTreeMap::from([
            (Chest, 72),
            (Hamstrings, 72),
            (LowerBack, 72),
            (Back, 60),
            (Glutes, 60),
            (Quads, 48),
            (Shoulders, 48),
            (Biceps, 36),
            (Triceps, 36),
            (Forearms, 24),
            (Calves, 24),
            (Core, 24),
        ]);

        Self {
            base_cooldown_hours,
            secondary_discount: DEFAULT_SECONDARY_DISCOUNT,
            volume_baseline: DEFAULT_VOLUME_BASELINE,
            volume_cap: DEFAULT_VOLUME_CAP,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
            decay: DecayCurve::Linear,
        }
    }
}

impl RecoveryTuning {
    /// Base cooldown hours for a muscle group.
    ///
    /// A muscle absent from the table is a configuration error for that
    /// muscle only; callers isolate the failure per muscle group.
    pub fn base_cooldown_hours(&self, muscle: MuscleGroup) -> Result<i64, TuningError> {
        self.base_cooldown_hours
            .get(&muscle)
            .copied()
            .ok_or(TuningError::MissingBaseCooldown(muscle))
    }

    /// Step-function recovery modifier from user age.
    /// `None` (unknown age) is treated as the default under-30 bucket.
    pub fn age_modifier(&self, age: Option<u32>) -> f64 {
        match age {
            None => AGE_MODIFIER_UNDER_30,
            Some(a) if a < 30 => AGE_MODIFIER_UNDER_30,
            Some(a) if a < 40 => AGE_MODIFIER_30_TO_40,
            Some(a) if a < 50 => AGE_MODIFIER_40_TO_50,
            Some(_) => AGE_MODIFIER_50_PLUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_exercise_has_a_primary_muscle() {
        for exercise in EXERCISES {
            assert!(
                exercise
                    .muscles
                    .iter()
                    .any(|(_, role)| *role == MuscleRole::Primary),
                "exercise '{}' has no primary muscle",
                exercise.id
            );
        }
    }

    #[test]
    fn test_exercise_muscles_are_unique() {
        for exercise in EXERCISES {
            let mut seen = std::collections::BTreeSet::new();
            for (muscle, _) in exercise.muscles {
                assert!(
                    seen.insert(muscle),
                    "exercise '{}' maps muscle '{}' twice",
                    exercise.id,
                    muscle
                );
            }
        }
    }

    #[test]
    fn test_exercise_ids_are_unique() {
        assert_eq!(EXERCISE_INDEX.len(), EXERCISES.len());
    }

    #[test]
    fn test_find_exercise_known() {
        let squat = find_exercise("back_squat").expect("back_squat in catalog");
        assert_eq!(squat.name, "Back Squat");
        assert!(squat
            .muscles
            .iter()
            .any(|&(m, r)| m == MuscleGroup::Quads && r == MuscleRole::Primary));
    }

    #[test]
    fn test_find_exercise_unknown() {
        assert!(find_exercise("underwater_basket_press").is_none());
    }

    #[test]
    fn test_base_cooldown_covers_all_muscles() {
        let tuning = RecoveryTuning::default();
        for muscle in MuscleGroup::ALL {
            assert!(
                tuning.base_cooldown_hours(muscle).is_ok(),
                "no base cooldown for '{}'",
                muscle
            );
        }
    }

    #[test]
    fn test_base_cooldown_observed_values() {
        let tuning = RecoveryTuning::default();
        assert_eq!(tuning.base_cooldown_hours(MuscleGroup::Chest).unwrap(), 72);
        assert_eq!(
            tuning.base_cooldown_hours(MuscleGroup::Hamstrings).unwrap(),
            72
        );
        assert_eq!(tuning.base_cooldown_hours(MuscleGroup::Quads).unwrap(), 48);
        assert_eq!(
            tuning.base_cooldown_hours(MuscleGroup::Shoulders).unwrap(),
            48
        );
        assert_eq!(tuning.base_cooldown_hours(MuscleGroup::Biceps).unwrap(), 36);
        assert_eq!(
            tuning.base_cooldown_hours(MuscleGroup::Triceps).unwrap(),
            36
        );
    }

    #[test]
    fn test_missing_base_cooldown_is_an_error() {
        let mut tuning = RecoveryTuning::default();
        tuning.base_cooldown_hours.remove(&MuscleGroup::Calves);
        assert!(matches!(
            tuning.base_cooldown_hours(MuscleGroup::Calves),
            Err(TuningError::MissingBaseCooldown(MuscleGroup::Calves))
        ));
    }

    #[test]
    fn test_age_modifier_buckets() {
        let tuning = RecoveryTuning::default();
        assert_eq!(tuning.age_modifier(Some(25)), AGE_MODIFIER_UNDER_30);
        // Bucket boundaries are inclusive-lower.
        assert_eq!(tuning.age_modifier(Some(29)), AGE_MODIFIER_UNDER_30);
        assert_eq!(tuning.age_modifier(Some(30)), AGE_MODIFIER_30_TO_40);
        assert_eq!(tuning.age_modifier(Some(39)), AGE_MODIFIER_30_TO_40);
        assert_eq!(tuning.age_modifier(Some(40)), AGE_MODIFIER_40_TO_50);
        assert_eq!(tuning.age_modifier(Some(49)), AGE_MODIFIER_40_TO_50);
        assert_eq!(tuning.age_modifier(Some(50)), AGE_MODIFIER_50_PLUS);
        assert_eq!(tuning.age_modifier(Some(75)), AGE_MODIFIER_50_PLUS);
    }

    #[test]
    fn test_age_modifier_missing_age_defaults() {
        let tuning = RecoveryTuning::default();
        assert_eq!(tuning.age_modifier(None), AGE_MODIFIER_UNDER_30);
    }

    #[test]
    fn test_muscle_group_parse_roundtrip() {
        for muscle in MuscleGroup::ALL {
            assert_eq!(MuscleGroup::parse(muscle.as_str()), Some(muscle));
        }
        assert_eq!(MuscleGroup::parse("spleen"), None);
    }
}

//! Muscle fatigue aggregation and recovery computation.
//!
//! The engine is a pure function over a snapshot of logged sets: the caller
//! pre-fetches workout history and the user's age, and everything here is
//! synchronous, side-effect-free, and deterministic for a fixed `as_of`.
//! Given identical inputs the output is bit-identical, which the client
//! relies on between polls.
//!
//! Pipeline per muscle group: collect contributing sets in the lookback
//! window → aggregate into a [`FatigueBreakdown`] → resolve the final
//! cooldown duration (volume and age adjusted) → apply the decay curve at
//! `as_of` → assemble a [`MuscleCooldownStatus`].

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::catalog::{
    find_exercise, DecayCurve, MuscleGroup, MuscleRole, RecoveryTuning, TuningError,
};
use crate::services::effort::{effective_contribution, set_intensity, LoggedSet};

/// Shape parameter for the front-loaded decay curve: higher values drop the
/// cooldown percentage faster in the early hours.
const FRONT_LOADED_RATE: f64 = 2.0;

impl DecayCurve {
    /// Percentage of cooldown remaining after `elapsed_hours`.
    ///
    /// Both curves pin percent(0) = 100 and percent(final) = 0 and are
    /// monotonically non-increasing in elapsed time. Elapsed time is clamped
    /// to ≥ 0 so clock skew can never produce a percentage above 100.
    pub fn cooldown_percent(self, elapsed_hours: f64, final_cooldown_hours: i64) -> f64 {
        if final_cooldown_hours <= 0 {
            return 0.0;
        }
        let horizon = final_cooldown_hours as f64;
        let elapsed = elapsed_hours.max(0.0);
        if elapsed >= horizon {
            return 0.0;
        }

        let percent = match self {
            DecayCurve::Linear => 100.0 * (1.0 - elapsed / horizon),
            DecayCurve::FrontLoaded => {
                let k = FRONT_LOADED_RATE;
                let floor = (-k).exp();
                100.0 * (((-k * elapsed / horizon).exp() - floor) / (1.0 - floor))
            }
        };
        percent.clamp(0.0, 100.0)
    }
}

/// One logged set joined with its session timestamp, the engine's input row.
#[derive(Debug, Clone)]
pub struct SetRecord {
    pub exercise_id: String,
    pub performed_at: DateTime<Utc>,
    pub weight_kg: f64,
    pub reps: i32,
    pub rpe: Option<f64>,
    pub is_bodyweight: bool,
}

impl SetRecord {
    fn as_logged_set(&self) -> LoggedSet {
        LoggedSet {
            weight_kg: self.weight_kg,
            reps: self.reps,
            rpe: self.rpe,
            is_bodyweight: self.is_bodyweight,
        }
    }
}

/// How the aggregated fatigue for one muscle group was computed.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FatigueBreakdown {
    /// Recovery window for this muscle before volume/age adjustment
    pub base_cooldown_hours: i64,
    /// Raw count of contributing sets (primary + secondary)
    pub total_sets: i64,
    /// Intensity-weighted set count, with secondary work discounted
    pub effective_sets: f64,
    /// Mean intensity factor across contributing sets
    pub avg_intensity_factor: f64,
    /// Volume adjustment relative to a normal session, ≥ 1.0, capped
    pub volume_multiplier: f64,
    /// Age-bucket recovery modifier, ≥ 1.0
    pub age_modifier: f64,
    /// Adjusted recovery window; never shorter than the base
    pub final_cooldown_hours: i64,
}

/// Whether a muscle group is still cooling down or ready to train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Cooling,
    Recovered,
}

/// An exercise that contributed fatigue to a muscle group.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AffectedExercise {
    /// Catalog exercise id
    pub exercise_id: String,
    /// Display name from the catalog
    pub exercise_name: String,
    /// Most recent workout in which this exercise hit the muscle (ISO 8601)
    pub workout_date: String,
    /// Whether the exercise trains this muscle directly or indirectly
    pub fatigue_type: MuscleRole,
}

/// Client-facing recovery state for one muscle group.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MuscleCooldownStatus {
    pub muscle_group: MuscleGroup,
    pub status: RecoveryStatus,
    /// 0 = fully recovered, 100 = just trained
    pub cooldown_percent: f64,
    /// Whole hours until fully recovered
    pub hours_remaining: i64,
    /// When the muscle was last trained (ISO 8601).
    /// Omitted when the muscle has no qualifying activity in the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trained: Option<String>,
    pub affected_exercises: Vec<AffectedExercise>,
    /// Null when the muscle is fully recovered
    pub fatigue_breakdown: Option<FatigueBreakdown>,
}

/// Adjusted recovery window: `round(base × volume × age)`.
/// Both multipliers are ≥ 1.0 by construction, so the result never
/// undercuts the base window.
pub fn final_cooldown_hours(
    base_cooldown_hours: i64,
    volume_multiplier: f64,
    age_modifier: f64,
) -> i64 {
    (base_cooldown_hours as f64 * volume_multiplier * age_modifier).round() as i64
}

/// User age in whole years at `as_of`. `None` if the birthdate is in the
/// future relative to `as_of` (corrupt profile data).
pub fn age_at(birthdate: NaiveDate, as_of: DateTime<Utc>) -> Option<u32> {
    as_of.date_naive().years_since(birthdate)
}

/// Per-muscle running totals while scanning the set history.
#[derive(Debug)]
struct MuscleAccumulator {
    total_sets: i64,
    effective_sets: f64,
    intensity_sum: f64,
    last_trained: DateTime<Utc>,
    /// Deduplicated contributing exercises, keyed by exercise id.
    exercises: BTreeMap<&'static str, (&'static str, MuscleRole, DateTime<Utc>)>,
}

/// Aggregate all qualifying sets into per-muscle accumulators.
///
/// Sets outside the lookback window, invalid sets, and sets referencing
/// exercises missing from the catalog are skipped; the last case is logged
/// at debug level since deleted exercises are expected in old history.
fn accumulate(
    sets: &[SetRecord],
    as_of: DateTime<Utc>,
    tuning: &RecoveryTuning,
) -> BTreeMap<MuscleGroup, MuscleAccumulator> {
    let cutoff = as_of - Duration::hours(tuning.lookback_hours);
    let mut per_muscle: BTreeMap<MuscleGroup, MuscleAccumulator> = BTreeMap::new();

    for set in sets {
        if set.performed_at < cutoff || set.performed_at > as_of {
            continue;
        }
        let Some(intensity) = set_intensity(&set.as_logged_set()) else {
            continue;
        };
        let Some(exercise) = find_exercise(&set.exercise_id) else {
            tracing::debug!(
                "Skipping set for unknown exercise '{}' (removed from catalog?)",
                set.exercise_id
            );
            continue;
        };

        for &(muscle, role) in exercise.muscles {
            let contribution = effective_contribution(intensity, role, tuning.secondary_discount);
            let acc = per_muscle
                .entry(muscle)
                .or_insert_with(|| MuscleAccumulator {
                    total_sets: 0,
                    effective_sets: 0.0,
                    intensity_sum: 0.0,
                    last_trained: set.performed_at,
                    exercises: BTreeMap::new(),
                });

            acc.total_sets += 1;
            acc.effective_sets += contribution;
            acc.intensity_sum += intensity;
            acc.last_trained = acc.last_trained.max(set.performed_at);
            acc.exercises
                .entry(exercise.id)
                .and_modify(|(_, _, date)| *date = (*date).max(set.performed_at))
                .or_insert((exercise.name, role, set.performed_at));
        }
    }

    per_muscle
}

/// Resolve a single muscle's accumulated fatigue into a status.
fn resolve_status(
    muscle: MuscleGroup,
    acc: &MuscleAccumulator,
    age: Option<u32>,
    as_of: DateTime<Utc>,
    tuning: &RecoveryTuning,
) -> Result<MuscleCooldownStatus, TuningError> {
    let base = tuning.base_cooldown_hours(muscle)?;

    let volume_multiplier = (acc.effective_sets / tuning.volume_baseline).clamp(1.0, tuning.volume_cap);
    let age_modifier = tuning.age_modifier(age);
    let final_hours = final_cooldown_hours(base, volume_multiplier, age_modifier);

    let elapsed_hours =
        ((as_of - acc.last_trained).num_seconds() as f64 / 3600.0).max(0.0);
    let cooldown_percent = tuning.decay.cooldown_percent(elapsed_hours, final_hours);
    let hours_remaining = (final_hours as f64 - elapsed_hours).ceil().max(0.0) as i64;

    let status = if cooldown_percent == 0.0 {
        RecoveryStatus::Recovered
    } else {
        RecoveryStatus::Cooling
    };

    let affected_exercises = acc
        .exercises
        .iter()
        .map(|(id, (name, role, date))| AffectedExercise {
            exercise_id: (*id).to_string(),
            exercise_name: (*name).to_string(),
            workout_date: date.to_rfc3339(),
            fatigue_type: *role,
        })
        .collect();

    let breakdown = FatigueBreakdown {
        base_cooldown_hours: base,
        total_sets: acc.total_sets,
        effective_sets: acc.effective_sets,
        avg_intensity_factor: acc.intensity_sum / acc.total_sets as f64,
        volume_multiplier,
        age_modifier,
        final_cooldown_hours: final_hours,
    };

    Ok(MuscleCooldownStatus {
        muscle_group: muscle,
        status,
        cooldown_percent,
        hours_remaining,
        last_trained: Some(acc.last_trained.to_rfc3339()),
        affected_exercises,
        fatigue_breakdown: Some(breakdown),
    })
}

/// Compute cooldown statuses for every muscle group with qualifying activity
/// in the lookback window, most-fatigued first.
///
/// Fully recovered muscles are omitted — the client hides their cards, and a
/// muscle with zero qualifying sets never appears at all. A muscle whose
/// base cooldown is missing from the tuning table is dropped with an error
/// log; the remaining muscles still compute (per-muscle failure isolation).
pub fn compute_cooldowns(
    sets: &[SetRecord],
    age: Option<u32>,
    as_of: DateTime<Utc>,
    tuning: &RecoveryTuning,
) -> Vec<MuscleCooldownStatus> {
    let per_muscle = accumulate(sets, as_of, tuning);

    let mut statuses: Vec<MuscleCooldownStatus> = per_muscle
        .iter()
        .filter_map(|(&muscle, acc)| match resolve_status(muscle, acc, age, as_of, tuning) {
            Ok(status) => Some(status),
            Err(e) => {
                tracing::error!("Recovery configuration error for '{}': {}", muscle, e);
                None
            }
        })
        .filter(|s| s.status == RecoveryStatus::Cooling)
        .collect();

    statuses.sort_by(|a, b| {
        b.hours_remaining
            .cmp(&a.hours_remaining)
            .then_with(|| a.muscle_group.as_str().cmp(b.muscle_group.as_str()))
    });

    statuses
}

/// Compute the status of a single muscle group, including when recovered.
///
/// Unlike [`compute_cooldowns`] this never filters: a muscle with no
/// qualifying activity (or past its window) reports `recovered` with zero
/// percent and no breakdown, for the client's per-muscle detail view.
pub fn compute_muscle_cooldown(
    muscle: MuscleGroup,
    sets: &[SetRecord],
    age: Option<u32>,
    as_of: DateTime<Utc>,
    tuning: &RecoveryTuning,
) -> Result<MuscleCooldownStatus, TuningError> {
    let per_muscle = accumulate(sets, as_of, tuning);

    match per_muscle.get(&muscle) {
        Some(acc) => resolve_status(muscle, acc, age, as_of, tuning),
        None => Ok(MuscleCooldownStatus {
            muscle_group: muscle,
            status: RecoveryStatus::Recovered,
            cooldown_percent: 0.0,
            hours_remaining: 0,
            last_trained: None,
            affected_exercises: Vec::new(),
            fatigue_breakdown: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn set_at(exercise_id: &str, performed_at: DateTime<Utc>, rpe: f64) -> SetRecord {
        SetRecord {
            exercise_id: exercise_id.to_string(),
            performed_at,
            weight_kg: 100.0,
            reps: 5,
            rpe: Some(rpe),
            is_bodyweight: false,
        }
    }

    // --- Decay curve ---

    #[test]
    fn test_linear_decay_boundaries() {
        let curve = DecayCurve::Linear;
        assert_eq!(curve.cooldown_percent(0.0, 66), 100.0);
        assert_eq!(curve.cooldown_percent(66.0, 66), 0.0);
        assert_eq!(curve.cooldown_percent(100.0, 66), 0.0);
    }

    #[test]
    fn test_linear_decay_midpoint() {
        // 2 hours into a 66-hour window → ~97%
        let p = DecayCurve::Linear.cooldown_percent(2.0, 66);
        assert!((p - 96.97).abs() < 0.01, "expected ~96.97, got {}", p);
    }

    #[test]
    fn test_decay_clamps_negative_elapsed() {
        // Clock skew: asOf before lastTrained must not exceed 100%.
        assert_eq!(DecayCurve::Linear.cooldown_percent(-5.0, 48), 100.0);
        assert_eq!(DecayCurve::FrontLoaded.cooldown_percent(-5.0, 48), 100.0);
    }

    #[test]
    fn test_decay_monotonic() {
        for curve in [DecayCurve::Linear, DecayCurve::FrontLoaded] {
            let mut prev = curve.cooldown_percent(0.0, 72);
            for hour in 1..=100 {
                let current = curve.cooldown_percent(hour as f64, 72);
                assert!(
                    current <= prev,
                    "{:?} increased at hour {}: {} > {}",
                    curve,
                    hour,
                    current,
                    prev
                );
                prev = current;
            }
        }
    }

    #[test]
    fn test_front_loaded_decay_boundaries() {
        let curve = DecayCurve::FrontLoaded;
        assert_eq!(curve.cooldown_percent(0.0, 48), 100.0);
        assert_eq!(curve.cooldown_percent(48.0, 48), 0.0);
        // Front-loaded: at the halfway point, less than half remains.
        let halfway = curve.cooldown_percent(24.0, 48);
        assert!(halfway < 50.0, "expected < 50 at halfway, got {}", halfway);
    }

    #[test]
    fn test_decay_degenerate_zero_window() {
        assert_eq!(DecayCurve::Linear.cooldown_percent(0.0, 0), 0.0);
    }

    // --- Cooldown duration resolver ---

    #[test]
    fn test_final_cooldown_spec_values() {
        // 48h base, 1.2 volume, 1.15 age → round(66.24) = 66
        assert_eq!(final_cooldown_hours(48, 1.2, 1.15), 66);
        // 36h base, no volume bump, 1.15 age → round(41.4) = 41
        assert_eq!(final_cooldown_hours(36, 1.0, 1.15), 41);
    }

    #[test]
    fn test_final_cooldown_never_below_base() {
        for base in [24, 36, 48, 60, 72] {
            for volume in [1.0, 1.3, 2.0] {
                for age in [1.0, 1.15, 1.3, 1.5] {
                    assert!(
                        final_cooldown_hours(base, volume, age) >= base,
                        "final < base for ({}, {}, {})",
                        base,
                        volume,
                        age
                    );
                }
            }
        }
    }

    #[test]
    fn test_age_at() {
        let birthdate = NaiveDate::from_ymd_opt(1991, 6, 15).unwrap();
        assert_eq!(age_at(birthdate, at("2026-06-14T00:00:00Z")), Some(34));
        assert_eq!(age_at(birthdate, at("2026-06-15T00:00:00Z")), Some(35));
        // Birthdate after asOf → corrupt data, no age.
        assert_eq!(age_at(birthdate, at("1990-01-01T00:00:00Z")), None);
    }

    // --- Aggregation + reporter ---

    #[test]
    fn test_squat_session_quads_breakdown() {
        // Age 35, 3 sets of squats at RPE 8.5 (intensity 1.24), 2 hours ago.
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-01T12:00:00Z");
        let trained = at("2026-02-01T10:00:00Z");
        let sets = vec![
            set_at("back_squat", trained, 8.5),
            set_at("back_squat", trained, 8.5),
            set_at("back_squat", trained, 8.5),
        ];

        let statuses = compute_cooldowns(&sets, Some(35), as_of, &tuning);
        let quads = statuses
            .iter()
            .find(|s| s.muscle_group == MuscleGroup::Quads)
            .expect("quads should be cooling");

        let breakdown = quads.fatigue_breakdown.as_ref().unwrap();
        assert_eq!(breakdown.base_cooldown_hours, 48);
        assert_eq!(breakdown.total_sets, 3);
        assert!((breakdown.effective_sets - 3.72).abs() < 1e-9);
        assert!((breakdown.avg_intensity_factor - 1.24).abs() < 1e-9);
        assert!((breakdown.volume_multiplier - 1.24).abs() < 1e-9);
        assert!((breakdown.age_modifier - 1.15).abs() < 1e-9);
        // round(48 × 1.24 × 1.15) = round(68.448) = 68
        assert_eq!(breakdown.final_cooldown_hours, 68);

        assert_eq!(quads.status, RecoveryStatus::Cooling);
        assert_eq!(quads.hours_remaining, 66);
        assert!((quads.cooldown_percent - 97.06).abs() < 0.01);
        assert_eq!(quads.last_trained.as_deref(), Some(trained.to_rfc3339().as_str()));
    }

    #[test]
    fn test_secondary_work_discounted_on_triceps() {
        // Single bench set at RPE 7.5 (intensity 1.0), age 35:
        // triceps get 0.5 effective sets, volume floors at 1.0,
        // final = round(36 × 1.0 × 1.15) = 41.
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-01T12:00:00Z");
        let sets = vec![set_at("bench_press", at("2026-02-01T10:00:00Z"), 7.5)];

        let statuses = compute_cooldowns(&sets, Some(35), as_of, &tuning);
        let triceps = statuses
            .iter()
            .find(|s| s.muscle_group == MuscleGroup::Triceps)
            .expect("triceps should be cooling");
        let chest = statuses
            .iter()
            .find(|s| s.muscle_group == MuscleGroup::Chest)
            .expect("chest should be cooling");

        let triceps_bd = triceps.fatigue_breakdown.as_ref().unwrap();
        let chest_bd = chest.fatigue_breakdown.as_ref().unwrap();
        assert!((triceps_bd.effective_sets - 0.5).abs() < 1e-9);
        assert!((chest_bd.effective_sets - 1.0).abs() < 1e-9);
        assert!(triceps_bd.effective_sets < chest_bd.effective_sets);
        assert_eq!(triceps_bd.volume_multiplier, 1.0);
        assert_eq!(triceps_bd.final_cooldown_hours, 41);

        assert_eq!(
            triceps
                .affected_exercises
                .iter()
                .map(|e| (e.exercise_id.as_str(), e.fatigue_type))
                .collect::<Vec<_>>(),
            vec![("bench_press", MuscleRole::Secondary)]
        );
    }

    #[test]
    fn test_recovered_muscle_omitted() {
        // 100 hours elapsed against a 36-hour cooldown → recovered, hidden.
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-05T12:00:00Z");
        let sets = vec![set_at("barbell_curl", at("2026-02-01T08:00:00Z"), 7.5)];

        let statuses = compute_cooldowns(&sets, Some(25), as_of, &tuning);
        assert!(statuses
            .iter()
            .all(|s| s.muscle_group != MuscleGroup::Biceps));
    }

    #[test]
    fn test_unknown_exercise_skipped_silently() {
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-01T12:00:00Z");
        let sets = vec![
            set_at("deleted_exercise", at("2026-02-01T10:00:00Z"), 8.0),
            set_at("barbell_curl", at("2026-02-01T10:00:00Z"), 8.0),
        ];

        let statuses = compute_cooldowns(&sets, Some(25), as_of, &tuning);
        // The ghost exercise contributes to no muscle; biceps still compute.
        assert!(statuses
            .iter()
            .any(|s| s.muscle_group == MuscleGroup::Biceps));
        for status in &statuses {
            assert!(status
                .affected_exercises
                .iter()
                .all(|e| e.exercise_id != "deleted_exercise"));
        }
    }

    #[test]
    fn test_empty_history_is_empty_output() {
        let tuning = RecoveryTuning::default();
        let statuses = compute_cooldowns(&[], Some(30), at("2026-02-01T12:00:00Z"), &tuning);
        assert!(statuses.is_empty());
    }

    #[test]
    fn test_sets_outside_lookback_window_ignored() {
        // 200 hours old > 168-hour window → zero qualifying sets → absent.
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-10T12:00:00Z");
        let sets = vec![set_at("barbell_curl", at("2026-02-02T04:00:00Z"), 9.0)];
        let statuses = compute_cooldowns(&sets, Some(25), as_of, &tuning);
        assert!(statuses.is_empty());
    }

    #[test]
    fn test_invalid_sets_excluded_from_totals() {
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-01T12:00:00Z");
        let trained = at("2026-02-01T10:00:00Z");
        let mut zero_rep = set_at("barbell_curl", trained, 8.0);
        zero_rep.reps = 0;
        let mut zero_weight = set_at("barbell_curl", trained, 8.0);
        zero_weight.weight_kg = 0.0;
        let sets = vec![zero_rep, zero_weight, set_at("barbell_curl", trained, 8.0)];

        let statuses = compute_cooldowns(&sets, Some(25), as_of, &tuning);
        let biceps = statuses
            .iter()
            .find(|s| s.muscle_group == MuscleGroup::Biceps)
            .unwrap();
        assert_eq!(biceps.fatigue_breakdown.as_ref().unwrap().total_sets, 1);
    }

    #[test]
    fn test_missing_age_defaults_to_no_modifier() {
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-01T12:00:00Z");
        let sets = vec![set_at("barbell_curl", at("2026-02-01T10:00:00Z"), 7.5)];

        let statuses = compute_cooldowns(&sets, None, as_of, &tuning);
        let biceps = statuses
            .iter()
            .find(|s| s.muscle_group == MuscleGroup::Biceps)
            .unwrap();
        assert_eq!(
            biceps.fatigue_breakdown.as_ref().unwrap().age_modifier,
            1.0
        );
        assert_eq!(
            biceps.fatigue_breakdown.as_ref().unwrap().final_cooldown_hours,
            36
        );
    }

    #[test]
    fn test_volume_multiplier_capped() {
        // 12 heavy squat sets would exceed the cap without clamping.
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-01T12:00:00Z");
        let trained = at("2026-02-01T10:00:00Z");
        let sets: Vec<SetRecord> = (0..12).map(|_| set_at("back_squat", trained, 9.5)).collect();

        let statuses = compute_cooldowns(&sets, Some(25), as_of, &tuning);
        let quads = statuses
            .iter()
            .find(|s| s.muscle_group == MuscleGroup::Quads)
            .unwrap();
        assert_eq!(
            quads.fatigue_breakdown.as_ref().unwrap().volume_multiplier,
            tuning.volume_cap
        );
    }

    #[test]
    fn test_aggregates_across_multiple_sessions() {
        // Two sessions touch biceps; lastTrained anchors to the newer one.
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-03T12:00:00Z");
        let older = at("2026-02-01T10:00:00Z");
        let newer = at("2026-02-03T10:00:00Z");
        let sets = vec![
            set_at("barbell_curl", older, 8.0),
            set_at("lat_pulldown", newer, 8.0),
        ];

        let statuses = compute_cooldowns(&sets, Some(25), as_of, &tuning);
        let biceps = statuses
            .iter()
            .find(|s| s.muscle_group == MuscleGroup::Biceps)
            .unwrap();
        assert_eq!(biceps.fatigue_breakdown.as_ref().unwrap().total_sets, 2);
        assert_eq!(biceps.last_trained.as_deref(), Some(newer.to_rfc3339().as_str()));
        // Both exercises appear, deduplicated, with their roles.
        assert_eq!(biceps.affected_exercises.len(), 2);
    }

    #[test]
    fn test_ordering_most_fatigued_first() {
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-01T12:00:00Z");
        let trained = at("2026-02-01T10:00:00Z");
        // Deadlift: hamstrings/lower_back primary (72h base); curls: biceps (36h).
        let sets = vec![
            set_at("deadlift", trained, 8.0),
            set_at("barbell_curl", trained, 8.0),
        ];

        let statuses = compute_cooldowns(&sets, Some(25), as_of, &tuning);
        assert!(statuses.len() >= 3);
        for pair in statuses.windows(2) {
            assert!(
                pair[0].hours_remaining >= pair[1].hours_remaining,
                "not sorted by hours_remaining desc"
            );
            if pair[0].hours_remaining == pair[1].hours_remaining {
                assert!(
                    pair[0].muscle_group.as_str() < pair[1].muscle_group.as_str(),
                    "tie not broken by muscle name"
                );
            }
        }
    }

    #[test]
    fn test_deterministic_for_frozen_inputs() {
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-01T12:00:00Z");
        let sets = vec![
            set_at("back_squat", at("2026-02-01T08:00:00Z"), 8.5),
            set_at("bench_press", at("2026-01-30T18:30:00Z"), 7.0),
            set_at("deadlift", at("2026-01-29T07:15:00Z"), 9.0),
        ];

        let first = compute_cooldowns(&sets, Some(42), as_of, &tuning);
        let second = compute_cooldowns(&sets, Some(42), as_of, &tuning);
        assert_eq!(first, second);
    }

    #[test]
    fn test_per_muscle_isolation_on_config_error() {
        // Remove quads from the base table: squats still report glutes etc.,
        // only the misconfigured muscle is dropped.
        let mut tuning = RecoveryTuning::default();
        tuning.base_cooldown_hours.remove(&MuscleGroup::Quads);
        let as_of = at("2026-02-01T12:00:00Z");
        let sets = vec![set_at("back_squat", at("2026-02-01T10:00:00Z"), 8.0)];

        let statuses = compute_cooldowns(&sets, Some(25), as_of, &tuning);
        assert!(statuses
            .iter()
            .all(|s| s.muscle_group != MuscleGroup::Quads));
        assert!(statuses
            .iter()
            .any(|s| s.muscle_group == MuscleGroup::Glutes));
    }

    #[test]
    fn test_single_muscle_detail_when_idle() {
        let tuning = RecoveryTuning::default();
        let status = compute_muscle_cooldown(
            MuscleGroup::Chest,
            &[],
            Some(30),
            at("2026-02-01T12:00:00Z"),
            &tuning,
        )
        .unwrap();

        assert_eq!(status.status, RecoveryStatus::Recovered);
        assert_eq!(status.cooldown_percent, 0.0);
        assert_eq!(status.hours_remaining, 0);
        assert!(status.last_trained.is_none());
        assert!(status.fatigue_breakdown.is_none());
    }

    #[test]
    fn test_single_muscle_detail_when_cooling() {
        let tuning = RecoveryTuning::default();
        let as_of = at("2026-02-01T12:00:00Z");
        let sets = vec![set_at("bench_press", at("2026-02-01T10:00:00Z"), 7.5)];

        let status = compute_muscle_cooldown(MuscleGroup::Chest, &sets, Some(35), as_of, &tuning)
            .unwrap();
        assert_eq!(status.status, RecoveryStatus::Cooling);
        assert!(status.cooldown_percent > 0.0);
        assert!(status.fatigue_breakdown.is_some());
    }

    #[test]
    fn test_status_invariant_recovered_iff_zero() {
        // percent == 0 ⟺ hours_remaining == 0 ⟺ recovered, across a sweep
        // of elapsed times around the cooldown boundary.
        let tuning = RecoveryTuning::default();
        let trained = at("2026-02-01T00:00:00Z");
        let sets = vec![set_at("barbell_curl", trained, 7.5)];

        for hours in 0..80 {
            let as_of = trained + Duration::hours(hours);
            let status = compute_muscle_cooldown(
                MuscleGroup::Biceps,
                &sets,
                Some(25),
                as_of,
                &tuning,
            )
            .unwrap();
            let recovered = status.status == RecoveryStatus::Recovered;
            assert_eq!(status.cooldown_percent == 0.0, recovered);
            assert_eq!(status.hours_remaining == 0, recovered);
        }
    }
}

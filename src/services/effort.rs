//! Set effectiveness calculator.
//!
//! Converts a single logged set into an intensity factor and an
//! effective-set contribution. Intensity is anchored so that a moderate
//! effort (RPE 7–8) maps to a factor near 1.0; the observed domain is
//! 0.7–1.6.

use crate::services::catalog::MuscleRole;

/// Lower bound of the intensity factor domain.
pub const INTENSITY_MIN: f64 = 0.7;
/// Upper bound of the intensity factor domain.
pub const INTENSITY_MAX: f64 = 1.6;
/// RPE treated as "moderate", mapping to an intensity factor of exactly 1.0.
pub const RPE_MODERATE_ANCHOR: f64 = 7.5;
/// Intensity change per RPE point around the moderate anchor.
pub const INTENSITY_PER_RPE: f64 = 0.24;

/// Effort label thresholds on the intensity factor.
pub const LABEL_LIGHT_BELOW: f64 = 0.85;
pub const LABEL_MODERATE_BELOW: f64 = 1.15;
pub const LABEL_HEAVY_BELOW: f64 = 1.45;

/// A logged working set, as stored by the workout-logging subsystem.
#[derive(Debug, Clone)]
pub struct LoggedSet {
    pub weight_kg: f64,
    pub reps: i32,
    /// Rate of Perceived Exertion, 1–10. Estimated from rep count if absent.
    pub rpe: Option<f64>,
    pub is_bodyweight: bool,
}

impl LoggedSet {
    /// A set with zero reps, or zero/negative weight on a non-bodyweight
    /// exercise, carries no training signal and is excluded from fatigue.
    pub fn is_valid_working_set(&self) -> bool {
        self.reps >= 1 && (self.weight_kg > 0.0 || self.is_bodyweight)
    }
}

/// Map RPE to an intensity factor, linear around the moderate anchor and
/// clamped to the observed 0.7–1.6 domain.
pub fn intensity_factor(rpe: f64) -> f64 {
    (1.0 + (rpe - RPE_MODERATE_ANCHOR) * INTENSITY_PER_RPE).clamp(INTENSITY_MIN, INTENSITY_MAX)
}

/// Estimate RPE from rep count when the lifter didn't log one.
///
/// Low-rep sets are usually ground out near maximal loads; high-rep sets
/// tend to be submaximal volume work. This is a proximity-to-failure proxy,
/// not a measurement.
pub fn estimate_rpe_from_reps(reps: i32) -> f64 {
    match reps {
        ..=3 => 8.5,
        4..=6 => 8.0,
        7..=12 => 7.5,
        _ => 7.0,
    }
}

/// Intensity factor for a set: logged RPE if present, estimated otherwise.
/// Returns `None` for sets that don't qualify as working sets.
pub fn set_intensity(set: &LoggedSet) -> Option<f64> {
    if !set.is_valid_working_set() {
        return None;
    }
    let rpe = set.rpe.unwrap_or_else(|| estimate_rpe_from_reps(set.reps));
    Some(intensity_factor(rpe))
}

/// Effective-set contribution of one set toward one muscle group.
///
/// Direct (primary) work contributes the full intensity factor; indirect
/// (secondary) work from compound lifts is discounted.
pub fn effective_contribution(intensity: f64, role: MuscleRole, secondary_discount: f64) -> f64 {
    match role {
        MuscleRole::Primary => intensity,
        MuscleRole::Secondary => secondary_discount * intensity,
    }
}

/// Human-facing effort label for an intensity factor.
pub fn effort_label(intensity: f64) -> &'static str {
    if intensity < LABEL_LIGHT_BELOW {
        "Light"
    } else if intensity < LABEL_MODERATE_BELOW {
        "Moderate"
    } else if intensity < LABEL_HEAVY_BELOW {
        "Heavy"
    } else {
        "Max"
    }
}

/// Estimated one-rep max via the Epley formula: `weight × (1 + reps/30)`.
///
/// Returns `None` for bodyweight or invalid sets, where external load is
/// unknown. A single rep returns the weight itself.
pub fn epley_one_rep_max(set: &LoggedSet) -> Option<f64> {
    if !set.is_valid_working_set() || set.is_bodyweight {
        return None;
    }
    if set.reps == 1 {
        return Some(set.weight_kg);
    }
    Some(set.weight_kg * (1.0 + set.reps as f64 / 30.0))
}

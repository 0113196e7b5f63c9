//! Muscle recovery HTTP endpoints.
//!
//! - GET /api/v1/recovery/:user_id?as_of=ISO8601
//! - GET /api/v1/recovery/:user_id/:muscle_group?as_of=ISO8601
//!
//! Both endpoints pre-fetch the workout-history snapshot and the user's age
//! and hand them to the pure recovery engine; the engine itself performs
//! no I/O, so results are deterministic for a given `as_of`.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::db::{models, queries};
use crate::errors::{AppError, ErrorResponse};
use crate::helpers::{dec_to_f64, opt_dec_to_f64};
use crate::services::catalog::{MuscleGroup, RecoveryTuning};
use crate::services::fatigue::{
    age_at, compute_cooldowns, compute_muscle_cooldown, MuscleCooldownStatus, SetRecord,
};

/// Shared application state for recovery endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) pool: PgPool,
    pub(crate) tuning: RecoveryTuning,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecoveryQuery {
    /// Evaluation time in ISO 8601 format; defaults to now. Passing a fixed
    /// value makes the response reproducible (useful for client caching).
    pub as_of: Option<String>,
}

/// The prepared, immutable engine input for one request.
struct RecoverySnapshot {
    sets: Vec<SetRecord>,
    age: Option<u32>,
    age_defaulted: bool,
    as_of: DateTime<Utc>,
}

/// Pre-fetch everything the engine needs: the user's profile (for age) and
/// the logged sets inside the lookback window.
async fn load_snapshot(
    pool: &PgPool,
    user_id: Uuid,
    as_of: DateTime<Utc>,
    tuning: &RecoveryTuning,
) -> Result<RecoverySnapshot, AppError> {
    let user = queries::get_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let cutoff = as_of - Duration::hours(tuning.lookback_hours);
    let rows = queries::get_sets_since(pool, user_id, cutoff).await?;
    let sets = rows.iter().map(set_record_from_row).collect();

    let age = user.birthdate.and_then(|b| age_at(b, as_of));
    if age.is_none() {
        tracing::debug!(
            "User {} has no usable birthdate; age modifier defaults to 1.0",
            user_id
        );
    }

    Ok(RecoverySnapshot {
        sets,
        age,
        age_defaulted: age.is_none(),
        as_of,
    })
}

fn set_record_from_row(row: &models::TrainedSet) -> SetRecord {
    SetRecord {
        exercise_id: row.exercise_id.clone(),
        performed_at: row.performed_at,
        weight_kg: dec_to_f64(row.weight_kg),
        reps: row.reps,
        rpe: opt_dec_to_f64(row.rpe),
        is_bodyweight: row.is_bodyweight,
    }
}

fn parse_as_of(raw: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match raw {
        Some(s) => s
            .parse()
            .map_err(|e| AppError::BadRequest(format!("Invalid as_of: {}", e))),
        None => Ok(Utc::now()),
    }
}

/// When the user's age had to be defaulted, the response carries this header
/// so clients can surface the reduced confidence.
fn age_headers(age_defaulted: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if age_defaulted {
        headers.insert("X-Age-Defaulted", "true".parse().unwrap());
    }
    headers
}

/// Get cooldown statuses for all fatigued muscle groups of a user.
///
/// Returns one entry per muscle group with qualifying training activity
/// that is still cooling down, most-fatigued first. Fully recovered muscle
/// groups are omitted — an empty list means everything is ready to train.
#[utoipa::path(
    get,
    path = "/api/v1/recovery/{user_id}",
    tag = "Recovery",
    params(
        ("user_id" = Uuid, Path, description = "User UUID"),
        RecoveryQuery,
    ),
    responses(
        (status = 200, description = "Cooldown status per fatigued muscle group", body = Vec<MuscleCooldownStatus>,
         headers(
             ("X-Age-Defaulted" = String, description = "Set to 'true' when the user has no birthdate and the default age modifier was applied")
         )),
        (status = 400, description = "Invalid as_of timestamp", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user_recovery(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<RecoveryQuery>,
) -> Result<(HeaderMap, Json<Vec<MuscleCooldownStatus>>), AppError> {
    let as_of = parse_as_of(params.as_of.as_deref())?;
    let snapshot = load_snapshot(&state.pool, user_id, as_of, &state.tuning).await?;

    let statuses = compute_cooldowns(
        &snapshot.sets,
        snapshot.age,
        snapshot.as_of,
        &state.tuning,
    );

    Ok((age_headers(snapshot.age_defaulted), Json(statuses)))
}

/// Get the cooldown status of a single muscle group.
///
/// Unlike the list endpoint this always returns a status: a muscle with no
/// qualifying activity reports `recovered` with zero percent and no
/// fatigue breakdown.
#[utoipa::path(
    get,
    path = "/api/v1/recovery/{user_id}/{muscle_group}",
    tag = "Recovery",
    params(
        ("user_id" = Uuid, Path, description = "User UUID"),
        ("muscle_group" = String, Path, description = "Muscle group identifier (e.g. \"quads\")"),
        RecoveryQuery,
    ),
    responses(
        (status = 200, description = "Cooldown status for the muscle group", body = MuscleCooldownStatus,
         headers(
             ("X-Age-Defaulted" = String, description = "Set to 'true' when the user has no birthdate and the default age modifier was applied")
         )),
        (status = 400, description = "Invalid as_of timestamp", body = ErrorResponse),
        (status = 404, description = "User or muscle group not found", body = ErrorResponse),
    )
)]
pub async fn get_muscle_recovery(
    State(state): State<AppState>,
    Path((user_id, muscle_group)): Path<(Uuid, String)>,
    Query(params): Query<RecoveryQuery>,
) -> Result<(HeaderMap, Json<MuscleCooldownStatus>), AppError> {
    let muscle = MuscleGroup::parse(&muscle_group).ok_or_else(|| {
        AppError::NotFound(format!("Unknown muscle group '{}'", muscle_group))
    })?;

    let as_of = parse_as_of(params.as_of.as_deref())?;
    let snapshot = load_snapshot(&state.pool, user_id, as_of, &state.tuning).await?;

    let status = compute_muscle_cooldown(
        muscle,
        &snapshot.sets,
        snapshot.age,
        snapshot.as_of,
        &state.tuning,
    )?;

    Ok((age_headers(snapshot.age_defaulted), Json(status)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_as_of_valid() {
        let parsed = parse_as_of(Some("2026-02-01T12:00:00Z")).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-02-01T12:00:00+00:00");
    }

    #[test]
    fn test_parse_as_of_invalid() {
        assert!(matches!(
            parse_as_of(Some("next tuesday")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_as_of_defaults_to_now() {
        let before = Utc::now();
        let parsed = parse_as_of(None).unwrap();
        assert!(parsed >= before);
    }

    #[test]
    fn test_age_headers_flag() {
        assert!(age_headers(false).get("X-Age-Defaulted").is_none());
        assert_eq!(
            age_headers(true)
                .get("X-Age-Defaulted")
                .and_then(|v| v.to_str().ok()),
            Some("true")
        );
    }
}

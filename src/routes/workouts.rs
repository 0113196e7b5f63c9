//! Workout logging HTTP endpoints.
//!
//! - POST /api/v1/workouts — log a session of sets
//! - GET  /api/v1/workouts/:user_id — list recent sessions

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::db::queries::{self, InsertSetParams};
use crate::errors::{AppError, ErrorResponse};
use crate::helpers::{f64_to_decimal_1dp, opt_f64_to_decimal_1dp};
use crate::services::catalog::{find_exercise, ExerciseDef};
use crate::services::effort::{effort_label, epley_one_rep_max, set_intensity, LoggedSet};

/// Default and maximum page sizes for the session list.
const DEFAULT_SESSION_LIMIT: i64 = 20;
const MAX_SESSION_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One set in a workout-log request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LogSetRequest {
    /// Catalog exercise id (e.g. "back_squat")
    pub exercise_id: String,
    /// External load in kilograms; 0 is only valid for bodyweight sets
    pub weight_kg: f64,
    /// Repetitions performed, at least 1
    pub reps: i32,
    /// Rate of Perceived Exertion, 1–10. Estimated from reps when omitted
    pub rpe: Option<f64>,
    /// Whether the set was performed with bodyweight only
    #[serde(default)]
    pub is_bodyweight: bool,
}

/// Request body for logging a workout session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LogWorkoutRequest {
    /// The user logging the workout
    pub user_id: Uuid,
    /// When the session happened (ISO 8601); defaults to now
    pub performed_at: Option<String>,
    /// The logged sets, in order
    pub sets: Vec<LogSetRequest>,
}

/// A logged set echoed back with its computed training metrics.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoggedSetResponse {
    /// Position of the set within the session (1-based)
    pub set_number: i32,
    /// Catalog exercise id
    pub exercise_id: String,
    /// Display name from the catalog
    pub exercise_name: String,
    /// External load in kilograms
    pub weight_kg: f64,
    /// Repetitions performed
    pub reps: i32,
    /// Logged RPE, null when estimated
    pub rpe: Option<f64>,
    /// Intensity factor derived from RPE (0.7–1.6)
    pub intensity_factor: f64,
    /// Effort label: "Light", "Moderate", "Heavy", or "Max"
    pub effort: String,
    /// Estimated one-rep max (Epley), null for bodyweight sets
    pub estimated_one_rep_max: Option<f64>,
}

/// Response for a logged workout session.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogWorkoutResponse {
    /// The created session id
    pub workout_id: Uuid,
    /// The owning user
    pub user_id: Uuid,
    /// When the session happened (ISO 8601)
    pub performed_at: String,
    /// The logged sets with computed metrics
    pub sets: Vec<LoggedSetResponse>,
}

/// One session in the workout list.
#[derive(Debug, Serialize, ToSchema)]
pub struct WorkoutListItem {
    /// Session id
    pub id: Uuid,
    /// When the session happened (ISO 8601)
    pub performed_at: String,
    /// Number of sets logged in the session
    pub set_count: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct WorkoutListQuery {
    /// Maximum number of sessions to return (default 20, max 100)
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Validate one incoming set against the catalog and value ranges.
/// Returns the catalog exercise so the handler can echo its name.
fn validate_set(index: usize, set: &LogSetRequest) -> Result<&'static ExerciseDef, AppError> {
    let position = index + 1;
    let Some(exercise) = find_exercise(&set.exercise_id) else {
        return Err(AppError::BadRequest(format!(
            "Set {}: unknown exercise '{}'",
            position, set.exercise_id
        )));
    };
    if set.reps < 1 {
        return Err(AppError::BadRequest(format!(
            "Set {}: reps must be at least 1",
            position
        )));
    }
    if !set.weight_kg.is_finite() || set.weight_kg < 0.0 {
        return Err(AppError::BadRequest(format!(
            "Set {}: weight_kg must be a non-negative number",
            position
        )));
    }
    if set.weight_kg == 0.0 && !set.is_bodyweight {
        return Err(AppError::BadRequest(format!(
            "Set {}: weight_kg 0 is only valid for bodyweight sets",
            position
        )));
    }
    if let Some(rpe) = set.rpe {
        if !rpe.is_finite() || !(1.0..=10.0).contains(&rpe) {
            return Err(AppError::BadRequest(format!(
                "Set {}: rpe must be between 1 and 10",
                position
            )));
        }
    }
    Ok(exercise)
}

/// Log a workout session.
///
/// Exercise ids are validated against the catalog at logging time; history
/// that later references a removed exercise is skipped by the recovery
/// engine instead of failing.
#[utoipa::path(
    post,
    path = "/api/v1/workouts",
    tag = "Workouts",
    request_body = LogWorkoutRequest,
    responses(
        (status = 201, description = "Workout logged, sets echoed with computed metrics", body = LogWorkoutResponse),
        (status = 400, description = "Invalid set data or unknown exercise", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn log_workout(
    State(pool): State<PgPool>,
    Json(body): Json<LogWorkoutRequest>,
) -> Result<(StatusCode, Json<LogWorkoutResponse>), AppError> {
    if body.sets.is_empty() {
        return Err(AppError::BadRequest(
            "A workout must contain at least one set".to_string(),
        ));
    }
    let mut exercises = Vec::with_capacity(body.sets.len());
    for (i, set) in body.sets.iter().enumerate() {
        exercises.push(validate_set(i, set)?);
    }

    let performed_at: DateTime<Utc> = match body.performed_at.as_deref() {
        Some(s) => s
            .parse()
            .map_err(|e| AppError::BadRequest(format!("Invalid performed_at: {}", e)))?,
        None => Utc::now(),
    };

    let user = queries::get_user(&pool, body.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", body.user_id)))?;

    let session = queries::insert_session(&pool, user.id, performed_at).await?;

    let mut sets = Vec::with_capacity(body.sets.len());
    for (i, set) in body.sets.iter().enumerate() {
        let set_number = (i + 1) as i32;
        queries::insert_set(
            &pool,
            InsertSetParams {
                session_id: session.id,
                exercise_id: set.exercise_id.clone(),
                set_number,
                weight_kg: f64_to_decimal_1dp(set.weight_kg),
                reps: set.reps,
                rpe: opt_f64_to_decimal_1dp(set.rpe),
                is_bodyweight: set.is_bodyweight,
            },
        )
        .await?;

        let exercise = exercises[i];
        let logged = LoggedSet {
            weight_kg: set.weight_kg,
            reps: set.reps,
            rpe: set.rpe,
            is_bodyweight: set.is_bodyweight,
        };
        let intensity = set_intensity(&logged).unwrap_or(1.0);

        sets.push(LoggedSetResponse {
            set_number,
            exercise_id: set.exercise_id.clone(),
            exercise_name: exercise.name.to_string(),
            weight_kg: set.weight_kg,
            reps: set.reps,
            rpe: set.rpe,
            intensity_factor: intensity,
            effort: effort_label(intensity).to_string(),
            estimated_one_rep_max: epley_one_rep_max(&logged),
        });
    }

    tracing::info!(
        "Logged workout {} for user {} ({} sets)",
        session.id,
        user.id,
        sets.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(LogWorkoutResponse {
            workout_id: session.id,
            user_id: user.id,
            performed_at: session.performed_at.to_rfc3339(),
            sets,
        }),
    ))
}

/// List a user's recent workout sessions, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/workouts/{user_id}",
    tag = "Workouts",
    params(
        ("user_id" = Uuid, Path, description = "User UUID"),
        WorkoutListQuery,
    ),
    responses(
        (status = 200, description = "Recent workout sessions", body = Vec<WorkoutListItem>),
        (status = 400, description = "Invalid limit", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn list_workouts(
    State(pool): State<PgPool>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<WorkoutListQuery>,
) -> Result<Json<Vec<WorkoutListItem>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_SESSION_LIMIT);
    if !(1..=MAX_SESSION_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_SESSION_LIMIT
        )));
    }

    let _user = queries::get_user(&pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let sessions = queries::list_sessions(&pool, user_id, limit).await?;
    let items = sessions
        .into_iter()
        .map(|s| WorkoutListItem {
            id: s.id,
            performed_at: s.performed_at.to_rfc3339(),
            set_count: s.set_count,
        })
        .collect();
    Ok(Json(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_set() -> LogSetRequest {
        LogSetRequest {
            exercise_id: "back_squat".to_string(),
            weight_kg: 100.0,
            reps: 5,
            rpe: Some(8.0),
            is_bodyweight: false,
        }
    }

    #[test]
    fn test_validate_set_accepts_valid() {
        assert!(validate_set(0, &valid_set()).is_ok());
    }

    #[test]
    fn test_validate_set_rejects_unknown_exercise() {
        let mut set = valid_set();
        set.exercise_id = "time_travel_squat".to_string();
        assert!(matches!(
            validate_set(0, &set),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_set_rejects_zero_reps() {
        let mut set = valid_set();
        set.reps = 0;
        assert!(validate_set(0, &set).is_err());
    }

    #[test]
    fn test_validate_set_rejects_zero_weight_without_bodyweight() {
        let mut set = valid_set();
        set.weight_kg = 0.0;
        assert!(validate_set(0, &set).is_err());
        set.is_bodyweight = true;
        assert!(validate_set(0, &set).is_ok());
    }

    #[test]
    fn test_validate_set_rejects_out_of_range_rpe() {
        let mut set = valid_set();
        set.rpe = Some(0.5);
        assert!(validate_set(0, &set).is_err());
        set.rpe = Some(11.0);
        assert!(validate_set(0, &set).is_err());
        set.rpe = Some(f64::NAN);
        assert!(validate_set(0, &set).is_err());
    }

    #[test]
    fn test_validate_set_rejects_non_finite_weight() {
        let mut set = valid_set();
        set.weight_kg = f64::INFINITY;
        assert!(validate_set(0, &set).is_err());
    }
}

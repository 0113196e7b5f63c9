use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{SessionSummary, TrainedSet, User, WorkoutSession, WorkoutSet};

/// Parameters for inserting a logged set.
pub struct InsertSetParams {
    pub session_id: Uuid,
    pub exercise_id: String,
    pub set_number: i32,
    pub weight_kg: rust_decimal::Decimal,
    pub reps: i32,
    pub rpe: Option<rust_decimal::Decimal>,
    pub is_bodyweight: bool,
}

/// Create a new user.
pub async fn insert_user(
    pool: &PgPool,
    display_name: &str,
    birthdate: Option<NaiveDate>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, display_name, birthdate, created_at)
         VALUES ($1, $2, $3, NOW())
         RETURNING id, display_name, birthdate, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(display_name)
    .bind(birthdate)
    .fetch_one(pool)
    .await
}

/// Get a user by ID.
pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, display_name, birthdate, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Create a new workout session.
pub async fn insert_session(
    pool: &PgPool,
    user_id: Uuid,
    performed_at: chrono::DateTime<chrono::Utc>,
) -> Result<WorkoutSession, sqlx::Error> {
    sqlx::query_as::<_, WorkoutSession>(
        "INSERT INTO workout_sessions (id, user_id, performed_at, created_at)
         VALUES ($1, $2, $3, NOW())
         RETURNING id, user_id, performed_at, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(performed_at)
    .fetch_one(pool)
    .await
}

/// Insert one logged set into a session.
pub async fn insert_set(pool: &PgPool, params: InsertSetParams) -> Result<WorkoutSet, sqlx::Error> {
    sqlx::query_as::<_, WorkoutSet>(
        "INSERT INTO workout_sets (
            id, session_id, exercise_id, set_number, weight_kg, reps, rpe,
            is_bodyweight, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        RETURNING id, session_id, exercise_id, set_number, weight_kg, reps, rpe,
                  is_bodyweight, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(params.session_id)
    .bind(&params.exercise_id)
    .bind(params.set_number)
    .bind(params.weight_kg)
    .bind(params.reps)
    .bind(params.rpe)
    .bind(params.is_bodyweight)
    .fetch_one(pool)
    .await
}

/// List a user's recent sessions with their set counts, newest first.
pub async fn list_sessions(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<SessionSummary>, sqlx::Error> {
    sqlx::query_as::<_, SessionSummary>(
        "SELECT s.id, s.performed_at, COUNT(ws.id) AS set_count
         FROM workout_sessions s
         LEFT JOIN workout_sets ws ON ws.session_id = s.id
         WHERE s.user_id = $1
         GROUP BY s.id, s.performed_at
         ORDER BY s.performed_at DESC
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// All of a user's logged sets since a cutoff, joined with their session
/// timestamps. This is the workout-history snapshot handed to the recovery
/// engine; ordering is fixed so the engine's input is deterministic.
pub async fn get_sets_since(
    pool: &PgPool,
    user_id: Uuid,
    cutoff: chrono::DateTime<chrono::Utc>,
) -> Result<Vec<TrainedSet>, sqlx::Error> {
    sqlx::query_as::<_, TrainedSet>(
        "SELECT ws.exercise_id, s.performed_at, ws.weight_kg, ws.reps, ws.rpe,
                ws.is_bodyweight
         FROM workout_sets ws
         JOIN workout_sessions s ON s.id = ws.session_id
         WHERE s.user_id = $1 AND s.performed_at >= $2
         ORDER BY s.performed_at ASC, ws.set_number ASC, ws.id ASC",
    )
    .bind(user_id)
    .bind(cutoff)
    .fetch_all(pool)
    .await
}

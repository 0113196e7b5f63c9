use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// An application user.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    /// Nullable: a missing birthdate falls back to the default age bucket
    /// in recovery computations.
    pub birthdate: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A logged workout session.
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)] // All fields populated by FromRow; some accessed only via route serialization
pub struct WorkoutSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub performed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A single logged set within a session.
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)] // All fields populated by FromRow; some accessed only via route serialization
pub struct WorkoutSet {
    pub id: Uuid,
    pub session_id: Uuid,
    pub exercise_id: String,
    pub set_number: i32,
    pub weight_kg: Decimal,
    pub reps: i32,
    pub rpe: Option<Decimal>,
    pub is_bodyweight: bool,
    pub created_at: DateTime<Utc>,
}

/// A set joined with its session timestamp — the recovery engine's input row.
#[derive(Debug, Clone, FromRow)]
pub struct TrainedSet {
    pub exercise_id: String,
    pub performed_at: DateTime<Utc>,
    pub weight_kg: Decimal,
    pub reps: i32,
    pub rpe: Option<Decimal>,
    pub is_bodyweight: bool,
}

/// Session summary with its set count, for workout list endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct SessionSummary {
    pub id: Uuid,
    pub performed_at: DateTime<Utc>,
    pub set_count: i64,
}

//! Exercise catalog HTTP endpoint.
//!
//! GET /api/v1/exercises — the static exercise catalog with muscle mappings,
//! consumed by the client's exercise picker.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::catalog::{MuscleGroup, MuscleRole, EXERCISES};

/// One muscle trained by an exercise, with its role.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExerciseMuscle {
    /// Muscle group identifier
    pub muscle_group: MuscleGroup,
    /// "primary" for the main target, "secondary" for supporting work
    pub role: MuscleRole,
}

/// Catalog entry for GET /api/v1/exercises.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExerciseListItem {
    /// Stable catalog identifier (e.g. "back_squat")
    pub id: String,
    /// Display name (e.g. "Back Squat")
    pub name: String,
    /// Muscles this exercise trains
    pub muscles: Vec<ExerciseMuscle>,
}

/// List the exercise catalog.
///
/// The catalog is compiled into the service and versioned with it, so this
/// endpoint needs no database access.
#[utoipa::path(
    get,
    path = "/api/v1/exercises",
    tag = "Exercises",
    responses(
        (status = 200, description = "The full exercise catalog", body = Vec<ExerciseListItem>),
    )
)]
pub async fn list_exercises() -> Json<Vec<ExerciseListItem>> {
    let items: Vec<ExerciseListItem> = EXERCISES
        .iter()
        .map(|e| ExerciseListItem {
            id: e.id.to_string(),
            name: e.name.to_string(),
            muscles: e
                .muscles
                .iter()
                .map(|&(muscle_group, role)| ExerciseMuscle { muscle_group, role })
                .collect(),
        })
        .collect();
    Json(items)
}

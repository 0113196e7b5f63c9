//! User HTTP endpoints.
//!
//! - POST /api/v1/users — create a user profile
//! - GET  /api/v1/users/:id — fetch a user profile

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::{models, queries};
use crate::errors::{AppError, ErrorResponse};

/// Request body for creating a user.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Display name, must be non-empty
    pub display_name: String,
    /// Birthdate in ISO format (YYYY-MM-DD). Optional: without it, recovery
    /// computations fall back to the default age bucket.
    pub birthdate: Option<String>,
}

/// User profile response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name
    pub display_name: String,
    /// Birthdate (YYYY-MM-DD), null when not provided
    pub birthdate: Option<String>,
    /// Account creation time in ISO 8601 format
    pub created_at: String,
}

impl From<models::User> for UserResponse {
    fn from(u: models::User) -> Self {
        Self {
            id: u.id,
            display_name: u.display_name,
            birthdate: u.birthdate.map(|d| d.to_string()),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid display name or birthdate", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(pool): State<PgPool>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let display_name = body.display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::BadRequest(
            "display_name must not be empty".to_string(),
        ));
    }

    let birthdate = body
        .birthdate
        .as_deref()
        .map(|s| {
            s.parse::<NaiveDate>()
                .map_err(|e| AppError::BadRequest(format!("Invalid birthdate: {}", e)))
        })
        .transpose()?;

    if let Some(date) = birthdate {
        if date >= chrono::Utc::now().date_naive() {
            return Err(AppError::BadRequest(
                "birthdate must be in the past".to_string(),
            ));
        }
    }

    let user = queries::insert_user(&pool, display_name, birthdate).await?;
    tracing::info!("Created user {} ('{}')", user.id, user.display_name);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get a user profile by ID.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = queries::get_user(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
    Ok(Json(UserResponse::from(user)))
}

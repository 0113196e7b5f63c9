// Muscle Recovery API v0.1
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod errors;
mod helpers;
mod routes;
mod services;

use config::AppConfig;
use routes::recovery::AppState;
use services::catalog::{RecoveryTuning, EXERCISES};

/// Maximum number of connections in the database pool.
const DB_POOL_MAX_CONNECTIONS: u32 = 5;
/// Minimum number of connections kept alive in the database pool.
const DB_POOL_MIN_CONNECTIONS: u32 = 2;

/// Muscle Recovery API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Muscle Recovery API",
        version = "0.1.0",
        description = "Muscle recovery and cooldown API for strength training. \
            Logs workouts (sets, reps, weight, RPE), aggregates per-muscle fatigue \
            from intensity-weighted effective sets, and reports volume- and \
            age-adjusted cooldown windows with linear recovery decay.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Users", description = "User profile management"),
        (name = "Exercises", description = "Static exercise catalog"),
        (name = "Workouts", description = "Workout and set logging"),
        (name = "Recovery", description = "Muscle cooldown status"),
    ),
    paths(
        routes::health::health_check,
        routes::users::create_user,
        routes::users::get_user,
        routes::exercises::list_exercises,
        routes::workouts::log_workout,
        routes::workouts::list_workouts,
        routes::recovery::get_user_recovery,
        routes::recovery::get_muscle_recovery,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::users::CreateUserRequest,
            routes::users::UserResponse,
            routes::exercises::ExerciseMuscle,
            routes::exercises::ExerciseListItem,
            routes::workouts::LogSetRequest,
            routes::workouts::LogWorkoutRequest,
            routes::workouts::LoggedSetResponse,
            routes::workouts::LogWorkoutResponse,
            routes::workouts::WorkoutListItem,
            services::catalog::MuscleGroup,
            services::catalog::MuscleRole,
            services::fatigue::RecoveryStatus,
            services::fatigue::AffectedExercise,
            services::fatigue::FatigueBreakdown,
            services::fatigue::MuscleCooldownStatus,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "muscle_recovery_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Set up database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(DB_POOL_MAX_CONNECTIONS)
        .min_connections(DB_POOL_MIN_CONNECTIONS)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Recovery tuning is compiled-in except for the lookback window,
    // which operators can widen or narrow per deployment.
    let tuning = RecoveryTuning {
        lookback_hours: config.lookback_days * 24,
        ..RecoveryTuning::default()
    };
    tracing::info!(
        "Exercise catalog loaded: {} exercises, lookback window {} h",
        EXERCISES.len(),
        tuning.lookback_hours
    );

    // Build shared application state for recovery endpoints
    let app_state = AppState {
        pool: pool.clone(),
        tuning,
    };

    // CORS — expose X-Age-Defaulted so browser clients can read the flag
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any)
        .expose_headers(["X-Age-Defaulted"
            .parse::<axum::http::HeaderName>()
            .unwrap()]);

    // Build router
    // User/workout routes use PgPool state directly; recovery routes use AppState.
    let user_routes = Router::new()
        .route("/api/v1/users", post(routes::users::create_user))
        .route("/api/v1/users/:id", get(routes::users::get_user))
        .with_state(pool.clone());

    let exercise_routes =
        Router::new().route("/api/v1/exercises", get(routes::exercises::list_exercises));

    let workout_routes = Router::new()
        .route("/api/v1/workouts", post(routes::workouts::log_workout))
        .route(
            "/api/v1/workouts/:user_id",
            get(routes::workouts::list_workouts),
        )
        .with_state(pool.clone());

    let recovery_routes = Router::new()
        .route(
            "/api/v1/recovery/:user_id",
            get(routes::recovery::get_user_recovery),
        )
        .route(
            "/api/v1/recovery/:user_id/:muscle_group",
            get(routes::recovery::get_muscle_recovery),
        )
        .with_state(app_state);

    // Health check uses PgPool to verify DB connectivity
    let health_routes = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .with_state(pool);

    let app = Router::new()
        .merge(health_routes)
        .merge(user_routes)
        .merge(exercise_routes)
        .merge(workout_routes)
        .merge(recovery_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}

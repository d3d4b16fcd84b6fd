use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::stats::{self, StatsError};
use crate::storage::{StorageAdapter, StorageError};
use crate::tracker::{self, TrackerError};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageAdapter>,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::DatabaseError(other.to_string()),
        }
    }
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::NotFound(msg) => AppError::NotFound(msg),
            StatsError::Storage(inner) => inner.into(),
        }
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::NotFound(msg) => AppError::NotFound(msg),
            TrackerError::Validation(msg) => AppError::BadRequest(msg),
            TrackerError::Duplicate(msg) => AppError::Conflict(msg),
            TrackerError::Storage(inner) => inner.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => {
                error!(error = %msg, "Storage failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", msg),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// All HTTP routes over one storage backend
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/profiles",
            post(tracker::handlers::create_profile).get(tracker::handlers::list_profiles),
        )
        .route(
            "/profiles/active",
            get(tracker::handlers::active_profile).put(tracker::handlers::set_active_profile),
        )
        .route(
            "/profiles/:id",
            get(tracker::handlers::get_profile).delete(tracker::handlers::delete_profile),
        )
        .route(
            "/profiles/:id/seasons",
            post(tracker::handlers::create_season).get(tracker::handlers::list_seasons),
        )
        .route(
            "/profiles/:id/seasons/current",
            post(tracker::handlers::current_season),
        )
        .route(
            "/profiles/:id/achievements",
            post(tracker::handlers::create_achievement).get(tracker::handlers::list_achievements),
        )
        .route(
            "/profiles/:id/achievements/:type/:year",
            delete(tracker::handlers::delete_achievement),
        )
        .route("/profiles/:id/career", get(stats::handlers::career_stats))
        .route("/profiles/:id/milestones", get(stats::handlers::milestones))
        .route("/seasons/:id", patch(tracker::handlers::update_season))
        .route(
            "/seasons/:id/games",
            post(tracker::handlers::log_game).get(tracker::handlers::list_games),
        )
        .route("/seasons/:id/stats", get(stats::handlers::season_stats))
        .route("/seasons/:id/streaks", get(stats::handlers::streaks))
        .route(
            "/games/:id",
            get(tracker::handlers::get_game)
                .patch(tracker::handlers::update_game)
                .delete(tracker::handlers::delete_game),
        )
        .route(
            "/games/:id/stats/:key",
            put(tracker::handlers::set_game_stat).delete(tracker::handlers::delete_game_stat),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::TrackerService,
    types::{
        CreateAchievementRequest, CreateProfileRequest, CreateSeasonRequest, GameDetail,
        GameForm, SetActiveProfileRequest, SetStatRequest, UpdateSeasonRequest,
    },
};
use crate::shared::{AppError, AppState};
use crate::storage::{Achievement, Game, GameStat, Profile, Season};

fn service(state: &AppState) -> TrackerService {
    TrackerService::new(Arc::clone(&state.storage))
}

/// POST /profiles
#[instrument(name = "create_profile", skip(state, request))]
pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = service(&state).create_profile(request).await?;
    info!(profile_id = %profile.id, "Profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /profiles
#[instrument(name = "list_profiles", skip(state))]
pub async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, AppError> {
    Ok(Json(service(&state).list_profiles().await?))
}

/// GET /profiles/active
///
/// Creates a default profile the first time it is asked for
#[instrument(name = "active_profile", skip(state))]
pub async fn active_profile(State(state): State<AppState>) -> Result<Json<Profile>, AppError> {
    Ok(Json(service(&state).get_or_create_default_profile().await?))
}

/// PUT /profiles/active
#[instrument(name = "set_active_profile", skip(state, request))]
pub async fn set_active_profile(
    State(state): State<AppState>,
    Json(request): Json<SetActiveProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(service(&state).set_active_profile(&request.profile_id).await?))
}

/// GET /profiles/:id
#[instrument(name = "get_profile", skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(service(&state).get_profile(&profile_id).await?))
}

/// DELETE /profiles/:id
#[instrument(name = "delete_profile", skip(state))]
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<StatusCode, AppError> {
    service(&state).delete_profile(&profile_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /profiles/:id/seasons
#[instrument(name = "create_season", skip(state, request))]
pub async fn create_season(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(request): Json<CreateSeasonRequest>,
) -> Result<(StatusCode, Json<Season>), AppError> {
    let season = service(&state)
        .create_season(&profile_id, request.season_year, &request.team_name)
        .await?;
    Ok((StatusCode::CREATED, Json(season)))
}

/// GET /profiles/:id/seasons
#[instrument(name = "list_seasons", skip(state))]
pub async fn list_seasons(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<Vec<Season>>, AppError> {
    Ok(Json(service(&state).list_seasons(&profile_id).await?))
}

/// POST /profiles/:id/seasons/current
#[instrument(name = "current_season", skip(state))]
pub async fn current_season(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<Season>, AppError> {
    let today = Utc::now().date_naive();
    Ok(Json(
        service(&state)
            .get_or_create_current_season(&profile_id, today)
            .await?,
    ))
}

/// PATCH /seasons/:id
#[instrument(name = "update_season", skip(state, request))]
pub async fn update_season(
    State(state): State<AppState>,
    Path(season_id): Path<String>,
    Json(request): Json<UpdateSeasonRequest>,
) -> Result<Json<Season>, AppError> {
    Ok(Json(
        service(&state)
            .update_season_team(&season_id, &request.team_name)
            .await?,
    ))
}

/// POST /seasons/:id/games
#[instrument(name = "log_game", skip(state, form))]
pub async fn log_game(
    State(state): State<AppState>,
    Path(season_id): Path<String>,
    Json(form): Json<GameForm>,
) -> Result<(StatusCode, Json<GameDetail>), AppError> {
    let detail = service(&state).log_game(&season_id, form).await?;
    info!(game_id = %detail.game.id, season_id = %season_id, "Game logged");
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /seasons/:id/games
#[instrument(name = "list_games", skip(state))]
pub async fn list_games(
    State(state): State<AppState>,
    Path(season_id): Path<String>,
) -> Result<Json<Vec<Game>>, AppError> {
    Ok(Json(service(&state).list_games(&season_id).await?))
}

/// GET /games/:id
#[instrument(name = "get_game", skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameDetail>, AppError> {
    Ok(Json(service(&state).get_game(&game_id).await?))
}

/// PATCH /games/:id
#[instrument(name = "update_game", skip(state, form))]
pub async fn update_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(form): Json<GameForm>,
) -> Result<Json<GameDetail>, AppError> {
    Ok(Json(service(&state).update_game(&game_id, form).await?))
}

/// DELETE /games/:id
#[instrument(name = "delete_game", skip(state))]
pub async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<StatusCode, AppError> {
    service(&state).delete_game(&game_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /games/:id/stats/:key
#[instrument(name = "set_game_stat", skip(state, request))]
pub async fn set_game_stat(
    State(state): State<AppState>,
    Path((game_id, stat_key)): Path<(String, String)>,
    Json(request): Json<SetStatRequest>,
) -> Result<Json<Vec<GameStat>>, AppError> {
    Ok(Json(
        service(&state)
            .set_game_stat(&game_id, &stat_key, request.value)
            .await?,
    ))
}

/// DELETE /games/:id/stats/:key
#[instrument(name = "delete_game_stat", skip(state))]
pub async fn delete_game_stat(
    State(state): State<AppState>,
    Path((game_id, stat_key)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    service(&state).delete_game_stat(&game_id, &stat_key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /profiles/:id/achievements
#[instrument(name = "create_achievement", skip(state, request))]
pub async fn create_achievement(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(request): Json<CreateAchievementRequest>,
) -> Result<Json<Achievement>, AppError> {
    Ok(Json(
        service(&state)
            .create_achievement(&profile_id, &request.kind, request.year)
            .await?,
    ))
}

/// GET /profiles/:id/achievements
#[instrument(name = "list_achievements", skip(state))]
pub async fn list_achievements(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<Vec<Achievement>>, AppError> {
    Ok(Json(service(&state).list_achievements(&profile_id).await?))
}

/// DELETE /profiles/:id/achievements/:type/:year
#[instrument(name = "delete_achievement", skip(state))]
pub async fn delete_achievement(
    State(state): State<AppState>,
    Path((profile_id, kind, year)): Path<(String, String, i32)>,
) -> Result<StatusCode, AppError> {
    service(&state)
        .delete_achievement(&profile_id, &kind, year)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

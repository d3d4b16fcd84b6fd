use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{CareerStats, Milestone, SeasonStats, StatsService, Streak};
use crate::shared::{AppError, AppState};

/// GET /seasons/:id/stats
#[instrument(name = "season_stats", skip(state))]
pub async fn season_stats(
    State(state): State<AppState>,
    Path(season_id): Path<String>,
) -> Result<Json<SeasonStats>, AppError> {
    let service = StatsService::new(Arc::clone(&state.storage));
    let stats = service.get_season_stats(&season_id).await?;
    info!(season_id = %season_id, games = stats.combined.pass_yds.games, "Season stats computed");
    Ok(Json(stats))
}

/// GET /profiles/:id/career
#[instrument(name = "career_stats", skip(state))]
pub async fn career_stats(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<CareerStats>, AppError> {
    let service = StatsService::new(Arc::clone(&state.storage));
    Ok(Json(service.get_career_stats(&profile_id).await?))
}

/// GET /profiles/:id/milestones
#[instrument(name = "milestones", skip(state))]
pub async fn milestones(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<Vec<Milestone>>, AppError> {
    let service = StatsService::new(Arc::clone(&state.storage));
    let milestones = service.get_milestones(&profile_id).await?;
    info!(
        profile_id = %profile_id,
        achieved = milestones.iter().filter(|m| m.achieved).count(),
        "Milestones evaluated"
    );
    Ok(Json(milestones))
}

/// GET /seasons/:id/streaks
#[instrument(name = "streaks", skip(state))]
pub async fn streaks(
    State(state): State<AppState>,
    Path(season_id): Path<String>,
) -> Result<Json<Vec<Streak>>, AppError> {
    let service = StatsService::new(Arc::clone(&state.storage));
    Ok(Json(service.get_streaks(&season_id).await?))
}

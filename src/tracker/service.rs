use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    catalog::is_known_achievement,
    types::{CreateProfileRequest, GameDetail, GameForm},
    TrackerError,
};
use crate::storage::{Achievement, Game, GameStat, Profile, Season, StorageAdapter, WeekInfo};

const DEFAULT_SPORT: &str = "madden";
const DEFAULT_POSITION: &str = "QB";
const DEFAULT_PLAYER_NAME: &str = "You";
const UNKNOWN_TEAM: &str = "TBD";

/// Profiles, seasons, games, stat rows and achievements: the write side
/// that feeds the stats engine.
pub struct TrackerService {
    storage: Arc<dyn StorageAdapter>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TrackerService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    // ---- profiles ----

    pub async fn get_active_profile(&self) -> Result<Option<Profile>, TrackerError> {
        match self.storage.get_active_profile_id().await? {
            Some(id) => Ok(self.storage.get_profile(&id).await?),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_active_profile(&self, profile_id: &str) -> Result<Profile, TrackerError> {
        let profile = self.require_profile(profile_id).await?;
        self.storage.set_active_profile_id(Some(profile_id)).await?;
        info!(profile_id = %profile_id, "Active profile switched");
        Ok(profile)
    }

    pub async fn clear_active_profile(&self) -> Result<(), TrackerError> {
        Ok(self.storage.set_active_profile_id(None).await?)
    }

    /// Creates a profile and makes it the active one
    #[instrument(skip(self, request), fields(player_name = %request.player_name))]
    pub async fn create_profile(
        &self,
        request: CreateProfileRequest,
    ) -> Result<Profile, TrackerError> {
        let player_name = request.player_name.trim().to_string();
        if player_name.is_empty() {
            return Err(TrackerError::Validation(
                "Player name must not be empty".to_string(),
            ));
        }
        for (field, value) in [("draft_round", request.draft_round), ("draft_pick", request.draft_pick)] {
            if value.is_some_and(|v| v <= 0) {
                return Err(TrackerError::Validation(format!("{} must be positive", field)));
            }
        }

        let profile = Profile::new(
            request.sport.trim().to_string(),
            request.position.trim().to_string(),
            player_name,
            request.draft_round,
            request.draft_pick,
            trimmed(request.team_name),
        );
        self.storage.create_profile(&profile).await?;
        self.storage.set_active_profile_id(Some(&profile.id)).await?;

        info!(profile_id = %profile.id, "Profile created");
        Ok(profile)
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>, TrackerError> {
        Ok(self.storage.list_profiles().await?)
    }

    pub async fn get_profile(&self, profile_id: &str) -> Result<Profile, TrackerError> {
        self.require_profile(profile_id).await
    }

    /// The active profile, falling back to the newest profile and finally to
    /// a freshly created default one. Whatever is returned ends up active.
    #[instrument(skip(self))]
    pub async fn get_or_create_default_profile(&self) -> Result<Profile, TrackerError> {
        if let Some(profile) = self.get_active_profile().await? {
            return Ok(profile);
        }

        if let Some(newest) = self.storage.list_profiles().await?.into_iter().next() {
            debug!(profile_id = %newest.id, "Falling back to newest profile");
            self.storage.set_active_profile_id(Some(&newest.id)).await?;
            return Ok(newest);
        }

        self.create_profile(CreateProfileRequest {
            sport: DEFAULT_SPORT.to_string(),
            position: DEFAULT_POSITION.to_string(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            draft_round: None,
            draft_pick: None,
            team_name: None,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_profile(&self, profile_id: &str) -> Result<(), TrackerError> {
        self.storage.delete_profile(profile_id).await?;
        if self.storage.get_active_profile_id().await?.as_deref() == Some(profile_id) {
            self.storage.set_active_profile_id(None).await?;
        }
        info!(profile_id = %profile_id, "Profile deleted");
        Ok(())
    }

    // ---- seasons ----

    #[instrument(skip(self))]
    pub async fn create_season(
        &self,
        profile_id: &str,
        season_year: i32,
        team_name: &str,
    ) -> Result<Season, TrackerError> {
        self.require_profile(profile_id).await?;

        let team_name = team_name.trim();
        if team_name.is_empty() {
            return Err(TrackerError::Validation("Team name must not be empty".to_string()));
        }

        let existing = self.storage.get_seasons_by_profile(profile_id).await?;
        if existing.iter().any(|s| s.season_year == season_year) {
            warn!(profile_id = %profile_id, season_year, "Season already exists");
            return Err(TrackerError::Duplicate(format!(
                "Season {} already exists for profile {}",
                season_year, profile_id
            )));
        }

        let season = Season::new(profile_id.to_string(), season_year, team_name.to_string());
        self.storage.create_season(&season).await?;
        info!(season_id = %season.id, season_year, "Season created");
        Ok(season)
    }

    pub async fn list_seasons(&self, profile_id: &str) -> Result<Vec<Season>, TrackerError> {
        self.require_profile(profile_id).await?;
        Ok(self.storage.get_seasons_by_profile(profile_id).await?)
    }

    /// Season for the calendar year of `today`, created on first use
    #[instrument(skip(self))]
    pub async fn get_or_create_current_season(
        &self,
        profile_id: &str,
        today: NaiveDate,
    ) -> Result<Season, TrackerError> {
        let profile = self.require_profile(profile_id).await?;
        let year = today.year();

        let seasons = self.storage.get_seasons_by_profile(profile_id).await?;
        if let Some(season) = seasons.into_iter().find(|s| s.season_year == year) {
            return Ok(season);
        }

        let team_name = profile.team_name.unwrap_or_else(|| UNKNOWN_TEAM.to_string());
        self.create_season(profile_id, year, &team_name).await
    }

    pub async fn update_season_team(
        &self,
        season_id: &str,
        team_name: &str,
    ) -> Result<Season, TrackerError> {
        let team_name = team_name.trim();
        if team_name.is_empty() {
            return Err(TrackerError::Validation("Team name must not be empty".to_string()));
        }
        self.storage.update_season_team(season_id, team_name).await?;
        self.require_season(season_id).await
    }

    // ---- games ----

    /// Creates the game row, then writes every supplied stat
    #[instrument(skip(self, form), fields(opponent = %form.opponent))]
    pub async fn log_game(&self, season_id: &str, form: GameForm) -> Result<GameDetail, TrackerError> {
        self.require_season(season_id).await?;
        validate_form(&form)?;

        let mut game = Game::new(
            season_id.to_string(),
            form.game_date,
            form.opponent.trim().to_string(),
            form.week,
        );
        apply_form(&mut game, &form);
        self.storage.create_game(&game).await?;

        self.write_stats(&game.id, &form).await?;
        let stats = self.storage.get_game_stats(&game.id).await?;

        info!(game_id = %game.id, stats = stats.len(), "Game logged");
        Ok(GameDetail { game, stats })
    }

    pub async fn list_games(&self, season_id: &str) -> Result<Vec<Game>, TrackerError> {
        self.require_season(season_id).await?;
        Ok(self.storage.get_games_by_season(season_id).await?)
    }

    pub async fn get_game(&self, game_id: &str) -> Result<GameDetail, TrackerError> {
        let game = self.require_game(game_id).await?;
        let stats = self.storage.get_game_stats(game_id).await?;
        Ok(GameDetail { game, stats })
    }

    /// Replaces the editable fields of a game and rewrites the supplied stats
    #[instrument(skip(self, form))]
    pub async fn update_game(&self, game_id: &str, form: GameForm) -> Result<GameDetail, TrackerError> {
        let mut game = self.require_game(game_id).await?;
        validate_form(&form)?;

        game.game_date = form.game_date;
        game.opponent = form.opponent.trim().to_string();
        game.week = form.week;
        apply_form(&mut game, &form);
        self.storage.update_game(&game).await?;

        self.write_stats(game_id, &form).await?;
        let stats = self.storage.get_game_stats(game_id).await?;
        Ok(GameDetail { game, stats })
    }

    #[instrument(skip(self))]
    pub async fn delete_game(&self, game_id: &str) -> Result<(), TrackerError> {
        self.storage.delete_game(game_id).await?;
        info!(game_id = %game_id, "Game deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_game_stat(
        &self,
        game_id: &str,
        stat_key: &str,
        value: f64,
    ) -> Result<Vec<GameStat>, TrackerError> {
        self.require_game(game_id).await?;
        if stat_key.trim().is_empty() {
            return Err(TrackerError::Validation("Stat key must not be empty".to_string()));
        }
        if !value.is_finite() {
            return Err(TrackerError::Validation(format!("Stat {} must be a finite number", stat_key)));
        }
        self.storage.set_game_stat(game_id, stat_key.trim(), value).await?;
        Ok(self.storage.get_game_stats(game_id).await?)
    }

    pub async fn get_game_stats(&self, game_id: &str) -> Result<Vec<GameStat>, TrackerError> {
        self.require_game(game_id).await?;
        Ok(self.storage.get_game_stats(game_id).await?)
    }

    pub async fn delete_game_stat(&self, game_id: &str, stat_key: &str) -> Result<(), TrackerError> {
        self.require_game(game_id).await?;
        Ok(self.storage.delete_game_stat(game_id, stat_key).await?)
    }

    // ---- achievements ----

    /// Records an award or league-leader credit; repeating it is a no-op
    #[instrument(skip(self))]
    pub async fn create_achievement(
        &self,
        profile_id: &str,
        kind: &str,
        year: i32,
    ) -> Result<Achievement, TrackerError> {
        self.require_profile(profile_id).await?;
        if !is_known_achievement(kind) {
            return Err(TrackerError::Validation(format!("Unknown achievement type {}", kind)));
        }

        let achievement = Achievement::new(profile_id.to_string(), kind.to_string(), year);
        let stored = self.storage.create_achievement(&achievement).await?;
        debug!(achievement_id = %stored.id, "Achievement stored");
        Ok(stored)
    }

    pub async fn list_achievements(&self, profile_id: &str) -> Result<Vec<Achievement>, TrackerError> {
        self.require_profile(profile_id).await?;
        Ok(self.storage.get_achievements_by_profile(profile_id).await?)
    }

    pub async fn delete_achievement(
        &self,
        profile_id: &str,
        kind: &str,
        year: i32,
    ) -> Result<(), TrackerError> {
        Ok(self.storage.delete_achievement(profile_id, kind, year).await?)
    }

    // ---- lookups ----

    async fn require_profile(&self, profile_id: &str) -> Result<Profile, TrackerError> {
        self.storage
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("Profile {} not found", profile_id)))
    }

    async fn require_season(&self, season_id: &str) -> Result<Season, TrackerError> {
        self.storage
            .get_season(season_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("Season {} not found", season_id)))
    }

    async fn require_game(&self, game_id: &str) -> Result<Game, TrackerError> {
        self.storage
            .get_game(game_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("Game {} not found", game_id)))
    }

    async fn write_stats(&self, game_id: &str, form: &GameForm) -> Result<(), TrackerError> {
        for (key, value) in &form.stats {
            self.storage.set_game_stat(game_id, key.as_ref(), *value).await?;
        }
        Ok(())
    }
}

fn validate_form(form: &GameForm) -> Result<(), TrackerError> {
    if form.opponent.trim().is_empty() {
        return Err(TrackerError::Validation("Opponent must not be empty".to_string()));
    }
    if let WeekInfo::Regular { week: Some(0) } = form.week {
        return Err(TrackerError::Validation("Week must be positive".to_string()));
    }
    for (field, score) in [("team_score", form.team_score), ("opponent_score", form.opponent_score)] {
        if score.is_some_and(|s| s < 0) {
            return Err(TrackerError::Validation(format!("{} must not be negative", field)));
        }
    }
    if let Some((key, _)) = form.stats.iter().find(|(_, value)| !value.is_finite()) {
        return Err(TrackerError::Validation(format!("Stat {} must be a finite number", key)));
    }
    Ok(())
}

fn apply_form(game: &mut Game, form: &GameForm) {
    game.is_home = form.is_home;
    game.is_starter = form.is_starter;
    game.result = form.result;
    game.team_score = form.team_score;
    game.opponent_score = form.opponent_score;
    game.note = trimmed(form.note.clone());
}

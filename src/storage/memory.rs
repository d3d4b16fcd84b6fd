use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{Achievement, Game, GameStat, Profile, Season, StorageAdapter, StorageError};

#[derive(Debug, Default)]
struct Tables {
    active_profile_id: Option<String>,
    profiles: HashMap<String, Profile>,
    seasons: HashMap<String, Season>,
    games: HashMap<String, Game>,
    game_stats: Vec<GameStat>,
    achievements: Vec<Achievement>,
}

impl Tables {
    fn remove_games(&mut self, game_ids: &[String]) {
        self.games.retain(|id, _| !game_ids.contains(id));
        self.game_stats
            .retain(|stat| !game_ids.contains(&stat.game_id));
    }
}

/// In-memory Storage Adapter for development and testing.
///
/// Cascading deletes are applied by hand so behaviour matches the SQL
/// backends. Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    tables: RwLock<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_games_newest_first(games: &mut [Game]) {
    games.sort_by(|a, b| {
        b.game_date
            .cmp(&a.game_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

#[async_trait]
impl StorageAdapter for InMemoryStorage {
    async fn get_active_profile_id(&self) -> Result<Option<String>, StorageError> {
        Ok(self.tables.read().await.active_profile_id.clone())
    }

    #[instrument(skip(self))]
    async fn set_active_profile_id(&self, profile_id: Option<&str>) -> Result<(), StorageError> {
        self.tables.write().await.active_profile_id = profile_id.map(str::to_string);
        Ok(())
    }

    #[instrument(skip(self, profile))]
    async fn create_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        debug!(profile_id = %profile.id, "Creating profile in memory");

        let mut tables = self.tables.write().await;
        if tables.profiles.contains_key(&profile.id) {
            warn!(profile_id = %profile.id, "Profile already exists in memory");
            return Err(StorageError::Database(
                "Profile already exists".to_string(),
            ));
        }
        tables.profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn get_profile(&self, profile_id: &str) -> Result<Option<Profile>, StorageError> {
        Ok(self.tables.read().await.profiles.get(profile_id).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StorageError> {
        let tables = self.tables.read().await;
        let mut profiles: Vec<Profile> = tables.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    #[instrument(skip(self))]
    async fn delete_profile(&self, profile_id: &str) -> Result<(), StorageError> {
        debug!(profile_id = %profile_id, "Deleting profile from memory");

        let mut tables = self.tables.write().await;
        if tables.profiles.remove(profile_id).is_none() {
            warn!(profile_id = %profile_id, "Profile not found for deletion in memory");
            return Err(StorageError::NotFound("Profile not found".to_string()));
        }

        let season_ids: Vec<String> = tables
            .seasons
            .values()
            .filter(|season| season.profile_id == profile_id)
            .map(|season| season.id.clone())
            .collect();
        let game_ids: Vec<String> = tables
            .games
            .values()
            .filter(|game| season_ids.contains(&game.season_id))
            .map(|game| game.id.clone())
            .collect();

        tables.remove_games(&game_ids);
        tables.seasons.retain(|id, _| !season_ids.contains(id));
        tables
            .achievements
            .retain(|achievement| achievement.profile_id != profile_id);

        debug!(
            profile_id = %profile_id,
            seasons_removed = season_ids.len(),
            games_removed = game_ids.len(),
            "Profile deleted from memory"
        );
        Ok(())
    }

    #[instrument(skip(self, season))]
    async fn create_season(&self, season: &Season) -> Result<(), StorageError> {
        debug!(season_id = %season.id, year = season.season_year, "Creating season in memory");

        let mut tables = self.tables.write().await;
        if !tables.profiles.contains_key(&season.profile_id) {
            return Err(StorageError::Database(format!(
                "Unknown profile {}",
                season.profile_id
            )));
        }
        if tables.seasons.contains_key(&season.id) {
            return Err(StorageError::Database("Season already exists".to_string()));
        }
        tables.seasons.insert(season.id.clone(), season.clone());
        Ok(())
    }

    async fn get_season(&self, season_id: &str) -> Result<Option<Season>, StorageError> {
        Ok(self.tables.read().await.seasons.get(season_id).cloned())
    }

    async fn get_seasons_by_profile(&self, profile_id: &str) -> Result<Vec<Season>, StorageError> {
        let tables = self.tables.read().await;
        let mut seasons: Vec<Season> = tables
            .seasons
            .values()
            .filter(|season| season.profile_id == profile_id)
            .cloned()
            .collect();
        seasons.sort_by(|a, b| b.season_year.cmp(&a.season_year));
        Ok(seasons)
    }

    #[instrument(skip(self))]
    async fn update_season_team(
        &self,
        season_id: &str,
        team_name: &str,
    ) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        match tables.seasons.get_mut(season_id) {
            Some(season) => {
                season.team_name = team_name.to_string();
                Ok(())
            }
            None => {
                warn!(season_id = %season_id, "Season not found for update in memory");
                Err(StorageError::NotFound("Season not found".to_string()))
            }
        }
    }

    #[instrument(skip(self, game))]
    async fn create_game(&self, game: &Game) -> Result<(), StorageError> {
        debug!(game_id = %game.id, season_id = %game.season_id, "Creating game in memory");

        let mut tables = self.tables.write().await;
        if !tables.seasons.contains_key(&game.season_id) {
            return Err(StorageError::Database(format!(
                "Unknown season {}",
                game.season_id
            )));
        }
        if tables.games.contains_key(&game.id) {
            return Err(StorageError::Database("Game already exists".to_string()));
        }
        tables.games.insert(game.id.clone(), game.clone());
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, StorageError> {
        Ok(self.tables.read().await.games.get(game_id).cloned())
    }

    async fn get_games_by_season(&self, season_id: &str) -> Result<Vec<Game>, StorageError> {
        let tables = self.tables.read().await;
        let mut games: Vec<Game> = tables
            .games
            .values()
            .filter(|game| game.season_id == season_id)
            .cloned()
            .collect();
        sort_games_newest_first(&mut games);
        Ok(games)
    }

    async fn get_games_by_season_and_type(
        &self,
        season_id: &str,
        is_postseason: bool,
    ) -> Result<Vec<Game>, StorageError> {
        let tables = self.tables.read().await;
        let mut games: Vec<Game> = tables
            .games
            .values()
            .filter(|game| game.season_id == season_id && game.is_postseason() == is_postseason)
            .cloned()
            .collect();
        sort_games_newest_first(&mut games);
        Ok(games)
    }

    #[instrument(skip(self, game))]
    async fn update_game(&self, game: &Game) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        match tables.games.get_mut(&game.id) {
            Some(existing) => {
                // season and creation time are fixed once logged
                *existing = Game {
                    season_id: existing.season_id.clone(),
                    created_at: existing.created_at,
                    ..game.clone()
                };
                Ok(())
            }
            None => {
                warn!(game_id = %game.id, "Game not found for update in memory");
                Err(StorageError::NotFound("Game not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, game_id: &str) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.games.contains_key(game_id) {
            warn!(game_id = %game_id, "Game not found for deletion in memory");
            return Err(StorageError::NotFound("Game not found".to_string()));
        }
        tables.remove_games(&[game_id.to_string()]);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_game_stat(
        &self,
        game_id: &str,
        stat_key: &str,
        stat_value: f64,
    ) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.games.contains_key(game_id) {
            return Err(StorageError::Database(format!("Unknown game {}", game_id)));
        }
        tables
            .game_stats
            .retain(|stat| !(stat.game_id == game_id && stat.stat_key == stat_key));
        tables.game_stats.push(GameStat::new(
            game_id.to_string(),
            stat_key.to_string(),
            stat_value,
        ));
        Ok(())
    }

    async fn get_game_stats(&self, game_id: &str) -> Result<Vec<GameStat>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .game_stats
            .iter()
            .filter(|stat| stat.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn delete_game_stat(&self, game_id: &str, stat_key: &str) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        tables
            .game_stats
            .retain(|stat| !(stat.game_id == game_id && stat.stat_key == stat_key));
        Ok(())
    }

    #[instrument(skip(self, achievement))]
    async fn create_achievement(
        &self,
        achievement: &Achievement,
    ) -> Result<Achievement, StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.profiles.contains_key(&achievement.profile_id) {
            return Err(StorageError::Database(format!(
                "Unknown profile {}",
                achievement.profile_id
            )));
        }

        let existing = tables.achievements.iter().find(|a| {
            a.profile_id == achievement.profile_id
                && a.kind == achievement.kind
                && a.year == achievement.year
        });
        if let Some(existing) = existing {
            debug!(achievement_id = %existing.id, "Achievement already recorded");
            return Ok(existing.clone());
        }

        tables.achievements.push(achievement.clone());
        Ok(achievement.clone())
    }

    async fn get_achievements_by_profile(
        &self,
        profile_id: &str,
    ) -> Result<Vec<Achievement>, StorageError> {
        let tables = self.tables.read().await;
        let mut achievements: Vec<Achievement> = tables
            .achievements
            .iter()
            .filter(|a| a.profile_id == profile_id)
            .cloned()
            .collect();
        achievements.sort_by(|a, b| {
            a.year
                .cmp(&b.year)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(achievements)
    }

    async fn delete_achievement(
        &self,
        profile_id: &str,
        kind: &str,
        year: i32,
    ) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        tables
            .achievements
            .retain(|a| !(a.profile_id == profile_id && a.kind == kind && a.year == year));
        Ok(())
    }
}

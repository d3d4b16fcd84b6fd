//! Storage Adapter contract and its backends.
//!
//! Every backend exposes the same CRUD surface over profiles, seasons,
//! games, per-game stat rows and achievements. The stats engine only
//! depends on [`StorageAdapter`], never on a concrete backend.

mod errors;
pub mod memory;
pub mod models;
pub mod postgres;
mod schema;
pub mod sqlite;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub use errors::StorageError;
pub use memory::InMemoryStorage;
pub use models::*;
pub use postgres::PostgresStorage;
pub use sqlite::SqliteStorage;

use crate::config::StorageConfig;

#[async_trait]
pub trait StorageAdapter: Send + Sync {
    // Active profile pointer (meta table)
    async fn get_active_profile_id(&self) -> Result<Option<String>, StorageError>;
    async fn set_active_profile_id(&self, profile_id: Option<&str>) -> Result<(), StorageError>;

    async fn create_profile(&self, profile: &Profile) -> Result<(), StorageError>;
    async fn get_profile(&self, profile_id: &str) -> Result<Option<Profile>, StorageError>;
    /// Newest profile first
    async fn list_profiles(&self) -> Result<Vec<Profile>, StorageError>;
    /// Removes the profile along with its seasons, games, stats and achievements
    async fn delete_profile(&self, profile_id: &str) -> Result<(), StorageError>;

    async fn create_season(&self, season: &Season) -> Result<(), StorageError>;
    async fn get_season(&self, season_id: &str) -> Result<Option<Season>, StorageError>;
    /// Most recent season year first
    async fn get_seasons_by_profile(&self, profile_id: &str) -> Result<Vec<Season>, StorageError>;
    async fn update_season_team(&self, season_id: &str, team_name: &str)
        -> Result<(), StorageError>;

    async fn create_game(&self, game: &Game) -> Result<(), StorageError>;
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, StorageError>;
    /// Ordered by game date, newest first
    async fn get_games_by_season(&self, season_id: &str) -> Result<Vec<Game>, StorageError>;
    /// Same ordering as [`StorageAdapter::get_games_by_season`]
    async fn get_games_by_season_and_type(
        &self,
        season_id: &str,
        is_postseason: bool,
    ) -> Result<Vec<Game>, StorageError>;
    async fn update_game(&self, game: &Game) -> Result<(), StorageError>;
    async fn delete_game(&self, game_id: &str) -> Result<(), StorageError>;

    /// Last write wins: a game holds at most one row per stat key, even under
    /// concurrent writers
    async fn set_game_stat(
        &self,
        game_id: &str,
        stat_key: &str,
        stat_value: f64,
    ) -> Result<(), StorageError>;
    async fn get_game_stats(&self, game_id: &str) -> Result<Vec<GameStat>, StorageError>;
    async fn delete_game_stat(&self, game_id: &str, stat_key: &str) -> Result<(), StorageError>;

    /// Idempotent per (profile, type, year); returns the stored row
    async fn create_achievement(
        &self,
        achievement: &Achievement,
    ) -> Result<Achievement, StorageError>;
    /// Ordered by year, then creation time
    async fn get_achievements_by_profile(
        &self,
        profile_id: &str,
    ) -> Result<Vec<Achievement>, StorageError>;
    async fn delete_achievement(
        &self,
        profile_id: &str,
        kind: &str,
        year: i32,
    ) -> Result<(), StorageError>;
}

/// Opens the backend chosen by configuration. Called once at startup.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn StorageAdapter>, StorageError> {
    match config {
        StorageConfig::Remote { database_url } => {
            info!("Using remote Postgres storage");
            Ok(Arc::new(PostgresStorage::connect(database_url).await?))
        }
        StorageConfig::Local { path } => {
            info!(path = %path.display(), "Using local SQLite storage");
            Ok(Arc::new(SqliteStorage::open(path).await?))
        }
    }
}

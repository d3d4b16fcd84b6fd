//! Remote mirror backed by a hosted Postgres database.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, instrument, warn};

use super::{
    schema, Achievement, Game, GameOutcome, GameStat, Profile, Season, StorageAdapter,
    StorageError, WeekInfo,
};

const ACTIVE_PROFILE_KEY: &str = "active_profile_id";

/// PostgreSQL implementation of the Storage Adapter
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and ensures the schema exists
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(db_error("connect"))?;

        let storage = Self::new(pool);
        for sql in schema::statements(schema::POSTGRES_TABLES) {
            sqlx::query(&sql).execute(&storage.pool).await.map_err(|e| {
                warn!(error = %e, "Failed to apply Postgres schema");
                StorageError::Database(format!("{e}: {sql}"))
            })?;
        }
        Ok(storage)
    }
}

fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |e| {
        warn!(error = %e, operation, "Postgres operation failed");
        StorageError::Database(e.to_string())
    }
}

fn profile_from_row(row: &PgRow) -> Result<Profile, StorageError> {
    Ok(Profile {
        id: row.try_get("id")?,
        sport: row.try_get("sport")?,
        position: row.try_get("position")?,
        player_name: row.try_get("player_name")?,
        draft_round: row.try_get("draft_round")?,
        draft_pick: row.try_get("draft_pick")?,
        team_name: row.try_get("team_name")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn season_from_row(row: &PgRow) -> Result<Season, StorageError> {
    Ok(Season {
        id: row.try_get("id")?,
        profile_id: row.try_get("profile_id")?,
        season_year: row.try_get("season_year")?,
        team_name: row.try_get("team_name")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn game_from_row(row: &PgRow) -> Result<Game, StorageError> {
    let result = row
        .try_get::<Option<String>, _>("result")?
        .map(|code| {
            GameOutcome::from_str(&code)
                .map_err(|_| StorageError::InvalidRecord(format!("game result {code:?}")))
        })
        .transpose()?;

    Ok(Game {
        id: row.try_get("id")?,
        season_id: row.try_get("season_id")?,
        game_date: row.try_get::<NaiveDate, _>("game_date")?,
        opponent: row.try_get("opponent")?,
        week: WeekInfo::from_columns(row.try_get("week")?, row.try_get("is_postseason")?),
        is_home: row.try_get("is_home")?,
        is_starter: row.try_get("is_starter")?,
        result,
        team_score: row.try_get("team_score")?,
        opponent_score: row.try_get("opponent_score")?,
        note: row.try_get("note")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn game_stat_from_row(row: &PgRow) -> Result<GameStat, StorageError> {
    Ok(GameStat {
        id: row.try_get("id")?,
        game_id: row.try_get("game_id")?,
        stat_key: row.try_get("stat_key")?,
        stat_value: row.try_get("stat_value")?,
    })
}

fn achievement_from_row(row: &PgRow) -> Result<Achievement, StorageError> {
    Ok(Achievement {
        id: row.try_get("id")?,
        profile_id: row.try_get("profile_id")?,
        kind: row.try_get("type")?,
        year: row.try_get("year")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn map_rows<T>(
    rows: Vec<PgRow>,
    map: fn(&PgRow) -> Result<T, StorageError>,
) -> Result<Vec<T>, StorageError> {
    rows.iter().map(map).collect()
}

#[async_trait]
impl StorageAdapter for PostgresStorage {
    async fn get_active_profile_id(&self) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM meta WHERE key = $1")
            .bind(ACTIVE_PROFILE_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get_active_profile_id"))?;
        Ok(row.map(|r| r.try_get::<String, _>("value")).transpose()?)
    }

    #[instrument(skip(self))]
    async fn set_active_profile_id(&self, profile_id: Option<&str>) -> Result<(), StorageError> {
        match profile_id {
            Some(profile_id) => {
                sqlx::query(
                    "INSERT INTO meta (key, value) VALUES ($1, $2) \
                     ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
                )
                .bind(ACTIVE_PROFILE_KEY)
                .bind(profile_id)
                .execute(&self.pool)
                .await
                .map_err(db_error("set_active_profile_id"))?;
            }
            None => {
                sqlx::query("DELETE FROM meta WHERE key = $1")
                    .bind(ACTIVE_PROFILE_KEY)
                    .execute(&self.pool)
                    .await
                    .map_err(db_error("clear_active_profile_id"))?;
            }
        }
        Ok(())
    }

    #[instrument(skip(self, profile))]
    async fn create_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        debug!(profile_id = %profile.id, "Creating profile in database");

        sqlx::query(
            "INSERT INTO profiles (id, sport, position, player_name, draft_round, draft_pick, team_name, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&profile.id)
        .bind(&profile.sport)
        .bind(&profile.position)
        .bind(&profile.player_name)
        .bind(profile.draft_round)
        .bind(profile.draft_pick)
        .bind(&profile.team_name)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create_profile"))?;
        Ok(())
    }

    async fn get_profile(&self, profile_id: &str) -> Result<Option<Profile>, StorageError> {
        let row = sqlx::query("SELECT * FROM profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get_profile"))?;
        row.as_ref().map(profile_from_row).transpose()
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StorageError> {
        let rows = sqlx::query("SELECT * FROM profiles ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list_profiles"))?;
        map_rows(rows, profile_from_row)
    }

    #[instrument(skip(self))]
    async fn delete_profile(&self, profile_id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(profile_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete_profile"))?;

        if result.rows_affected() == 0 {
            warn!(profile_id = %profile_id, "Profile not found for deletion");
            return Err(StorageError::NotFound("Profile not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, season))]
    async fn create_season(&self, season: &Season) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO seasons (id, profile_id, season_year, team_name, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&season.id)
        .bind(&season.profile_id)
        .bind(season.season_year)
        .bind(&season.team_name)
        .bind(season.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create_season"))?;
        Ok(())
    }

    async fn get_season(&self, season_id: &str) -> Result<Option<Season>, StorageError> {
        let row = sqlx::query("SELECT * FROM seasons WHERE id = $1")
            .bind(season_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get_season"))?;
        row.as_ref().map(season_from_row).transpose()
    }

    async fn get_seasons_by_profile(&self, profile_id: &str) -> Result<Vec<Season>, StorageError> {
        let rows =
            sqlx::query("SELECT * FROM seasons WHERE profile_id = $1 ORDER BY season_year DESC")
                .bind(profile_id)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("get_seasons_by_profile"))?;
        map_rows(rows, season_from_row)
    }

    #[instrument(skip(self))]
    async fn update_season_team(
        &self,
        season_id: &str,
        team_name: &str,
    ) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE seasons SET team_name = $2 WHERE id = $1")
            .bind(season_id)
            .bind(team_name)
            .execute(&self.pool)
            .await
            .map_err(db_error("update_season_team"))?;

        if result.rows_affected() == 0 {
            warn!(season_id = %season_id, "Season not found for update");
            return Err(StorageError::NotFound("Season not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, game))]
    async fn create_game(&self, game: &Game) -> Result<(), StorageError> {
        debug!(game_id = %game.id, season_id = %game.season_id, "Creating game in database");

        let (week, is_postseason) = game.week.to_columns();
        sqlx::query(
            "INSERT INTO games (id, season_id, game_date, opponent, week, is_postseason, is_home, is_starter, \
             result, team_score, opponent_score, note, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&game.id)
        .bind(&game.season_id)
        .bind(game.game_date)
        .bind(&game.opponent)
        .bind(week)
        .bind(is_postseason)
        .bind(game.is_home)
        .bind(game.is_starter)
        .bind(game.result.map(|r| r.to_string()))
        .bind(game.team_score)
        .bind(game.opponent_score)
        .bind(&game.note)
        .bind(game.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create_game"))?;
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, StorageError> {
        let row = sqlx::query("SELECT * FROM games WHERE id = $1")
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get_game"))?;
        row.as_ref().map(game_from_row).transpose()
    }

    async fn get_games_by_season(&self, season_id: &str) -> Result<Vec<Game>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM games WHERE season_id = $1 ORDER BY game_date DESC, created_at DESC",
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("get_games_by_season"))?;
        map_rows(rows, game_from_row)
    }

    async fn get_games_by_season_and_type(
        &self,
        season_id: &str,
        is_postseason: bool,
    ) -> Result<Vec<Game>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM games WHERE season_id = $1 AND is_postseason = $2 \
             ORDER BY game_date DESC, created_at DESC",
        )
        .bind(season_id)
        .bind(is_postseason)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("get_games_by_season_and_type"))?;
        map_rows(rows, game_from_row)
    }

    #[instrument(skip(self, game))]
    async fn update_game(&self, game: &Game) -> Result<(), StorageError> {
        let (week, is_postseason) = game.week.to_columns();
        let result = sqlx::query(
            "UPDATE games SET game_date = $2, opponent = $3, week = $4, is_postseason = $5, is_home = $6, \
             is_starter = $7, result = $8, team_score = $9, opponent_score = $10, note = $11 WHERE id = $1",
        )
        .bind(&game.id)
        .bind(game.game_date)
        .bind(&game.opponent)
        .bind(week)
        .bind(is_postseason)
        .bind(game.is_home)
        .bind(game.is_starter)
        .bind(game.result.map(|r| r.to_string()))
        .bind(game.team_score)
        .bind(game.opponent_score)
        .bind(&game.note)
        .execute(&self.pool)
        .await
        .map_err(db_error("update_game"))?;

        if result.rows_affected() == 0 {
            warn!(game_id = %game.id, "Game not found for update");
            return Err(StorageError::NotFound("Game not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, game_id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(game_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete_game"))?;

        if result.rows_affected() == 0 {
            warn!(game_id = %game_id, "Game not found for deletion");
            return Err(StorageError::NotFound("Game not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_game_stat(
        &self,
        game_id: &str,
        stat_key: &str,
        stat_value: f64,
    ) -> Result<(), StorageError> {
        let stat = GameStat::new(game_id.to_string(), stat_key.to_string(), stat_value);
        sqlx::query(
            "INSERT INTO game_stats (id, game_id, stat_key, stat_value) VALUES ($1, $2, $3, $4) \
             ON CONFLICT(game_id, stat_key) DO UPDATE SET stat_value = EXCLUDED.stat_value",
        )
        .bind(&stat.id)
        .bind(&stat.game_id)
        .bind(&stat.stat_key)
        .bind(stat.stat_value)
        .execute(&self.pool)
        .await
        .map_err(db_error("set_game_stat"))?;
        Ok(())
    }

    async fn get_game_stats(&self, game_id: &str) -> Result<Vec<GameStat>, StorageError> {
        let rows = sqlx::query("SELECT * FROM game_stats WHERE game_id = $1")
            .bind(game_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("get_game_stats"))?;
        map_rows(rows, game_stat_from_row)
    }

    async fn delete_game_stat(&self, game_id: &str, stat_key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM game_stats WHERE game_id = $1 AND stat_key = $2")
            .bind(game_id)
            .bind(stat_key)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete_game_stat"))?;
        Ok(())
    }

    #[instrument(skip(self, achievement))]
    async fn create_achievement(
        &self,
        achievement: &Achievement,
    ) -> Result<Achievement, StorageError> {
        sqlx::query(
            "INSERT INTO achievements (id, profile_id, type, year, created_at) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (profile_id, type, year) DO NOTHING",
        )
        .bind(&achievement.id)
        .bind(&achievement.profile_id)
        .bind(&achievement.kind)
        .bind(achievement.year)
        .bind(achievement.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create_achievement"))?;

        let row = sqlx::query(
            "SELECT * FROM achievements WHERE profile_id = $1 AND type = $2 AND year = $3",
        )
        .bind(&achievement.profile_id)
        .bind(&achievement.kind)
        .bind(achievement.year)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create_achievement"))?;
        achievement_from_row(&row)
    }

    async fn get_achievements_by_profile(
        &self,
        profile_id: &str,
    ) -> Result<Vec<Achievement>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM achievements WHERE profile_id = $1 ORDER BY year ASC, created_at ASC",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("get_achievements_by_profile"))?;
        map_rows(rows, achievement_from_row)
    }

    async fn delete_achievement(
        &self,
        profile_id: &str,
        kind: &str,
        year: i32,
    ) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM achievements WHERE profile_id = $1 AND type = $2 AND year = $3")
            .bind(profile_id)
            .bind(kind)
            .bind(year)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete_achievement"))?;
        Ok(())
    }
}

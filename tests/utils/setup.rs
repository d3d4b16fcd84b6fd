use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use qbtracker::{
    stats::StatKey,
    storage::{InMemoryStorage, Profile, Season, SqliteStorage, StorageAdapter, WeekInfo},
    tracker::{
        types::{CreateProfileRequest, GameForm},
        TrackerService,
    },
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Memory,
    Sqlite,
}

impl Backend {
    pub async fn open(self) -> Arc<dyn StorageAdapter> {
        match self {
            Backend::Memory => Arc::new(InMemoryStorage::new()),
            Backend::Sqlite => Arc::new(SqliteStorage::in_memory().await.unwrap()),
        }
    }
}

/// One logged game: date, postseason flag, stat rows
pub struct PlannedGame {
    date: NaiveDate,
    postseason: bool,
    stats: Vec<(StatKey, f64)>,
}

pub struct CareerSetup {
    pub storage: Arc<dyn StorageAdapter>,
    pub profile: Profile,
    pub seasons: Vec<Season>,
}

/// Builds a profile with seasons and games through the tracker service
pub struct CareerBuilder {
    backend: Backend,
    seasons: Vec<(i32, Vec<PlannedGame>)>,
}

impl CareerBuilder {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            seasons: vec![],
        }
    }

    pub fn with_season(mut self, year: i32) -> Self {
        self.seasons.push((year, vec![]));
        self
    }

    /// Adds a game to the most recently added season
    pub fn with_game(mut self, date: &str, postseason: bool, stats: &[(StatKey, f64)]) -> Self {
        let game = PlannedGame {
            date: date.parse().unwrap(),
            postseason,
            stats: stats.to_vec(),
        };
        self.seasons
            .last_mut()
            .expect("with_season must come before with_game")
            .1
            .push(game);
        self
    }

    pub async fn build(self) -> CareerSetup {
        let storage = self.backend.open().await;
        let tracker = TrackerService::new(Arc::clone(&storage));

        let profile = tracker
            .create_profile(CreateProfileRequest {
                sport: "madden".to_string(),
                position: "QB".to_string(),
                player_name: "Caleb".to_string(),
                draft_round: Some(1),
                draft_pick: Some(1),
                team_name: Some("Bears".to_string()),
            })
            .await
            .unwrap();

        let mut seasons = Vec::new();
        for (year, games) in self.seasons {
            let season = tracker.create_season(&profile.id, year, "Bears").await.unwrap();
            for (index, game) in games.into_iter().enumerate() {
                let week = if game.postseason {
                    WeekInfo::Postseason { round: None }
                } else {
                    WeekInfo::Regular {
                        week: Some(index as u32 + 1),
                    }
                };
                let form = GameForm {
                    game_date: game.date,
                    opponent: format!("Opponent {}", index + 1),
                    week,
                    is_home: true,
                    is_starter: true,
                    result: None,
                    team_score: None,
                    opponent_score: None,
                    note: None,
                    stats: game.stats.into_iter().collect::<HashMap<_, _>>(),
                };
                tracker.log_game(&season.id, form).await.unwrap();
            }
            seasons.push(season);
        }

        CareerSetup {
            storage,
            profile,
            seasons,
        }
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::{
    aggregator::{self, aggregate},
    milestones::{evaluate_milestones, MILESTONE_FAMILIES},
    streaks::{compute_streaks, GameLine, STREAK_DEFINITIONS},
    CareerStats, Milestone, QbStats, SeasonStats, StatKey, StatsError, Streak,
};
use crate::storage::{Game, GameStat, StorageAdapter};

/// Season and career statistics, milestones and streaks derived from the
/// raw per-game stat rows held by the Storage Adapter.
pub struct StatsService {
    storage: Arc<dyn StorageAdapter>,
}

fn game_ids(games: &[Game]) -> Vec<String> {
    games.iter().map(|game| game.id.clone()).collect()
}

impl StatsService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Aggregates the eight quarterback stats over `game_ids`
    #[instrument(skip(self, game_ids), fields(games = game_ids.len()))]
    pub async fn aggregate_stats(&self, game_ids: &[String]) -> Result<QbStats, StatsError> {
        Ok(aggregator::aggregate_stats(self.storage.as_ref(), game_ids).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_season_stats(&self, season_id: &str) -> Result<SeasonStats, StatsError> {
        let season = self.storage.get_season(season_id).await?.ok_or_else(|| {
            warn!(season_id = %season_id, "Season not found for stats");
            StatsError::NotFound(format!("Season {} not found", season_id))
        })?;

        let windows = self.season_game_ids(season_id).await?;
        debug!(
            season_id = %season_id,
            games = windows.all.len(),
            regular = windows.regular.len(),
            postseason = windows.postseason.len(),
            "Aggregating season"
        );

        let bundle = self
            .aggregate_windows(&windows.all, &windows.regular, &windows.postseason)
            .await?;

        Ok(SeasonStats {
            season_year: season.season_year,
            team_name: season.team_name,
            regular_season: bundle.regular_season,
            postseason: bundle.postseason,
            combined: bundle.combined,
        })
    }

    /// A profile with no seasons yields all-zero aggregates
    #[instrument(skip(self))]
    pub async fn get_career_stats(&self, profile_id: &str) -> Result<CareerStats, StatsError> {
        let (career, _) = self.career_and_seasons(profile_id).await?;
        Ok(career)
    }

    /// Milestones over career totals and every single season. Seasons are
    /// listed once, so one vanishing mid-call cannot turn into `NotFound`.
    #[instrument(skip(self))]
    pub async fn get_milestones(&self, profile_id: &str) -> Result<Vec<Milestone>, StatsError> {
        let (career, season_stats) = self.career_and_seasons(profile_id).await?;
        Ok(evaluate_milestones(
            MILESTONE_FAMILIES,
            &career,
            &season_stats,
        ))
    }

    /// Career bundle plus one bundle per season, all built from a single
    /// season listing and a single read of each game's rows.
    async fn career_and_seasons(
        &self,
        profile_id: &str,
    ) -> Result<(CareerStats, Vec<SeasonStats>), StatsError> {
        let seasons = self.storage.get_seasons_by_profile(profile_id).await?;

        let mut windows = Vec::with_capacity(seasons.len());
        for season in &seasons {
            windows.push(self.season_game_ids(&season.id).await?);
        }

        let all: Vec<String> = windows.iter().flat_map(|w| w.all.clone()).collect();
        let regular: Vec<String> = windows.iter().flat_map(|w| w.regular.clone()).collect();
        let postseason: Vec<String> = windows.iter().flat_map(|w| w.postseason.clone()).collect();

        debug!(
            profile_id = %profile_id,
            seasons = seasons.len(),
            games = all.len(),
            "Aggregating career"
        );

        let rows = self.fetch_rows(&all).await?;
        let career = bundle(&rows, &all, &regular, &postseason);
        let season_stats = seasons
            .into_iter()
            .zip(&windows)
            .map(|(season, w)| {
                let stats = bundle(&rows, &w.all, &w.regular, &w.postseason);
                SeasonStats {
                    season_year: season.season_year,
                    team_name: season.team_name,
                    regular_season: stats.regular_season,
                    postseason: stats.postseason,
                    combined: stats.combined,
                }
            })
            .collect();

        Ok((career, season_stats))
    }

    async fn season_game_ids(&self, season_id: &str) -> Result<SeasonWindows, StatsError> {
        Ok(SeasonWindows {
            all: game_ids(&self.storage.get_games_by_season(season_id).await?),
            regular: game_ids(
                &self
                    .storage
                    .get_games_by_season_and_type(season_id, false)
                    .await?,
            ),
            postseason: game_ids(
                &self
                    .storage
                    .get_games_by_season_and_type(season_id, true)
                    .await?,
            ),
        })
    }

    /// Always returns one streak per definition; an unknown or empty season
    /// produces zero streaks rather than an error.
    #[instrument(skip(self))]
    pub async fn get_streaks(&self, season_id: &str) -> Result<Vec<Streak>, StatsError> {
        let mut games = self.storage.get_games_by_season(season_id).await?;
        games.sort_by(|a, b| {
            a.game_date
                .cmp(&b.game_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });

        let rows = aggregator::fetch_game_stats(self.storage.as_ref(), &game_ids(&games)).await?;
        let lines: Vec<GameLine> = games
            .iter()
            .zip(rows)
            .map(|(game, stats)| game_line(game, &stats))
            .collect();

        Ok(compute_streaks(STREAK_DEFINITIONS, &lines))
    }

    /// Aggregates three overlapping windows while reading each game's rows once
    async fn aggregate_windows(
        &self,
        all: &[String],
        regular: &[String],
        postseason: &[String],
    ) -> Result<CareerStats, StatsError> {
        let ids: Vec<String> = all.iter().chain(regular).chain(postseason).cloned().collect();
        let rows = self.fetch_rows(&ids).await?;
        Ok(bundle(&rows, all, regular, postseason))
    }

    /// Stat rows keyed by game id, each distinct game fetched once
    async fn fetch_rows(&self, ids: &[String]) -> Result<HashMap<String, Vec<GameStat>>, StatsError> {
        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();

        let rows = aggregator::fetch_game_stats(self.storage.as_ref(), &unique).await?;
        Ok(unique.into_iter().zip(rows).collect())
    }
}

/// Game ids of one season, split the way stats are reported
struct SeasonWindows {
    all: Vec<String>,
    regular: Vec<String>,
    postseason: Vec<String>,
}

fn bundle(
    rows: &HashMap<String, Vec<GameStat>>,
    all: &[String],
    regular: &[String],
    postseason: &[String],
) -> CareerStats {
    let window = |ids: &[String]| -> Vec<Vec<GameStat>> {
        ids.iter()
            .map(|id| rows.get(id).cloned().unwrap_or_default())
            .collect()
    };
    CareerStats {
        regular_season: aggregate(&window(regular)),
        postseason: aggregate(&window(postseason)),
        combined: aggregate(&window(all)),
    }
}

fn game_line(game: &Game, stats: &[GameStat]) -> GameLine {
    let mut values = HashMap::new();
    for stat in stats {
        if let Ok(key) = stat.stat_key.parse::<StatKey>() {
            values.entry(key).or_insert(stat.stat_value);
        }
    }
    GameLine {
        game_date: game.game_date,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Achievement, InMemoryStorage, Profile, Season, StorageError, WeekInfo};
    use chrono::{Duration, NaiveDate, Utc};

    struct Fixture {
        storage: Arc<InMemoryStorage>,
        service: StatsService,
        profile: Profile,
    }

    impl Fixture {
        async fn new() -> Self {
            let storage = Arc::new(InMemoryStorage::new());
            let profile = Profile::new(
                "madden".into(),
                "QB".into(),
                "You".into(),
                None,
                None,
                None,
            );
            storage.create_profile(&profile).await.unwrap();
            let service = StatsService::new(storage.clone());
            Self {
                storage,
                service,
                profile,
            }
        }

        async fn season(&self, year: i32) -> Season {
            let season = Season::new(self.profile.id.clone(), year, "Jets".into());
            self.storage.create_season(&season).await.unwrap();
            season
        }

        async fn game(
            &self,
            season: &Season,
            date: NaiveDate,
            postseason: bool,
            stats: &[(&str, f64)],
        ) -> Game {
            let week = if postseason {
                WeekInfo::Postseason { round: None }
            } else {
                WeekInfo::Regular { week: None }
            };
            let game = Game::new(season.id.clone(), date, "Bills".into(), week);
            self.storage.create_game(&game).await.unwrap();
            for (key, value) in stats {
                self.storage
                    .set_game_stat(&game.id, key, *value)
                    .await
                    .unwrap();
            }
            game
        }
    }

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    #[tokio::test]
    async fn season_stats_split_regular_and_postseason() {
        let fx = Fixture::new().await;
        let season = fx.season(2026).await;
        for d in [7, 14, 21] {
            fx.game(&season, day(9, d), false, &[("pass_yds", 200.0)])
                .await;
        }
        for d in [10, 17] {
            fx.game(&season, day(1, d), true, &[("pass_yds", 300.0)])
                .await;
        }

        let stats = fx.service.get_season_stats(&season.id).await.unwrap();
        assert_eq!(stats.season_year, 2026);
        assert_eq!(stats.team_name, "Jets");
        assert_eq!(stats.combined.pass_yds.games, 5);
        assert_eq!(stats.regular_season.pass_yds.games, 3);
        assert_eq!(stats.postseason.pass_yds.games, 2);
        assert_eq!(stats.combined.pass_yds.total, 1200.0);
        assert_eq!(stats.regular_season.pass_yds.total, 600.0);
        assert_eq!(stats.postseason.pass_yds.average, 300.0);
    }

    #[tokio::test]
    async fn season_stats_for_unknown_season_is_not_found() {
        let fx = Fixture::new().await;
        let result = fx.service.get_season_stats("missing").await;
        assert!(matches!(result, Err(StatsError::NotFound(_))));
    }

    #[tokio::test]
    async fn empty_season_has_zero_aggregates() {
        let fx = Fixture::new().await;
        let season = fx.season(2026).await;
        let stats = fx.service.get_season_stats(&season.id).await.unwrap();
        assert_eq!(stats.combined, QbStats::default());
    }

    #[tokio::test]
    async fn career_without_seasons_is_all_zero() {
        let fx = Fixture::new().await;
        let career = fx.service.get_career_stats(&fx.profile.id).await.unwrap();
        assert_eq!(career, CareerStats::default());
    }

    #[tokio::test]
    async fn career_spans_every_season() {
        let fx = Fixture::new().await;
        let first = fx.season(2025).await;
        let second = fx.season(2026).await;
        fx.game(&first, day(9, 7), false, &[("pass_td", 2.0)]).await;
        fx.game(&first, day(1, 12), true, &[("pass_td", 1.0)]).await;
        fx.game(&second, day(9, 14), false, &[("pass_td", 3.0)])
            .await;

        let career = fx.service.get_career_stats(&fx.profile.id).await.unwrap();
        assert_eq!(career.combined.pass_td.total, 6.0);
        assert_eq!(career.combined.pass_td.games, 3);
        assert_eq!(career.regular_season.pass_td.total, 5.0);
        assert_eq!(career.postseason.pass_td.games, 1);
        assert_eq!(career.combined.pass_td.average, 2.0);
    }

    #[tokio::test]
    async fn aggregate_stats_reads_from_storage() {
        let fx = Fixture::new().await;
        let season = fx.season(2026).await;
        let a = fx
            .game(&season, day(9, 7), false, &[("rush_yds", 10.1)])
            .await;
        let b = fx
            .game(&season, day(9, 14), false, &[("rush_yds", 2.245)])
            .await;

        let stats = fx
            .service
            .aggregate_stats(&[a.id.clone(), b.id.clone()])
            .await
            .unwrap();
        assert_eq!(stats.rush_yds.total, 12.35);
        assert_eq!(stats.rush_yds.count, 2);
    }

    #[tokio::test]
    async fn single_season_milestone_met_by_any_season() {
        let fx = Fixture::new().await;
        let older = fx.season(2025).await;
        let newer = fx.season(2026).await;
        fx.game(&older, day(9, 7), false, &[("pass_yds", 2000.0)])
            .await;
        fx.game(&newer, day(9, 14), false, &[("pass_yds", 1600.0)])
            .await;

        let milestones = fx.service.get_milestones(&fx.profile.id).await.unwrap();
        let find = |id: &str| milestones.iter().find(|m| m.id == id).unwrap().achieved;

        assert!(find("season_pass_yds_1500"));
        assert!(!find("season_pass_yds_3000"));
        assert!(find("pass_yds_2000"));
        assert!(!find("pass_yds_4000"));
        assert_eq!(milestones.len(), 16);
    }

    #[tokio::test]
    async fn streaks_scan_oldest_game_first() {
        let fx = Fixture::new().await;
        let season = fx.season(2026).await;
        // logged out of order on purpose
        for (d, tds) in [(21, 0.0), (7, 1.0), (28, 2.0), (14, 2.0)] {
            fx.game(&season, day(9, d), false, &[("pass_td", tds), ("pass_int", 0.0)])
                .await;
        }

        let streaks = fx.service.get_streaks(&season.id).await.unwrap();
        assert_eq!(streaks.len(), 3);

        let td = &streaks[0];
        assert_eq!(td.kind, "pass_td_2plus");
        assert_eq!(td.current_streak, 1);
        assert_eq!(td.longest_streak, 1);
        assert_eq!(td.last_broken, Some(day(9, 21)));

        let no_int = &streaks[1];
        assert_eq!(no_int.current_streak, 4);
        assert_eq!(no_int.longest_streak, 4);
        assert_eq!(no_int.last_broken, None);

        let yards = &streaks[2];
        assert_eq!(yards.current_streak, 0);
        assert_eq!(yards.longest_streak, 0);
    }

    #[tokio::test]
    async fn same_day_games_order_by_creation() {
        let fx = Fixture::new().await;
        let season = fx.season(2026).await;
        let mut early = Game::new(season.id.clone(), day(9, 7), "Bills".into(), WeekInfo::default());
        early.created_at = Utc::now() - Duration::minutes(5);
        let late = Game::new(season.id.clone(), day(9, 7), "Bills".into(), WeekInfo::default());
        fx.storage.create_game(&late).await.unwrap();
        fx.storage.create_game(&early).await.unwrap();
        fx.storage.set_game_stat(&early.id, "pass_yds", 350.0).await.unwrap();
        fx.storage.set_game_stat(&late.id, "pass_yds", 120.0).await.unwrap();

        let streaks = fx.service.get_streaks(&season.id).await.unwrap();
        assert_eq!(streaks[2].current_streak, 0);
        assert_eq!(streaks[2].longest_streak, 1);
        assert_eq!(streaks[2].last_broken, Some(day(9, 7)));
    }

    #[tokio::test]
    async fn streaks_for_unknown_season_are_empty() {
        let fx = Fixture::new().await;
        let streaks = fx.service.get_streaks("missing").await.unwrap();
        assert!(streaks.iter().all(|s| s.current_streak == 0 && s.longest_streak == 0));
    }

    /// Lists seasons normally but reports every direct season lookup as
    /// missing, like a season deleted between two reads.
    struct VanishingSeasons(InMemoryStorage);

    #[async_trait::async_trait]
    impl StorageAdapter for VanishingSeasons {
        async fn get_active_profile_id(&self) -> Result<Option<String>, StorageError> {
            self.0.get_active_profile_id().await
        }
        async fn set_active_profile_id(&self, id: Option<&str>) -> Result<(), StorageError> {
            self.0.set_active_profile_id(id).await
        }
        async fn create_profile(&self, profile: &Profile) -> Result<(), StorageError> {
            self.0.create_profile(profile).await
        }
        async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StorageError> {
            self.0.get_profile(id).await
        }
        async fn list_profiles(&self) -> Result<Vec<Profile>, StorageError> {
            self.0.list_profiles().await
        }
        async fn delete_profile(&self, id: &str) -> Result<(), StorageError> {
            self.0.delete_profile(id).await
        }
        async fn create_season(&self, season: &Season) -> Result<(), StorageError> {
            self.0.create_season(season).await
        }
        async fn get_season(&self, _id: &str) -> Result<Option<Season>, StorageError> {
            Ok(None)
        }
        async fn get_seasons_by_profile(&self, id: &str) -> Result<Vec<Season>, StorageError> {
            self.0.get_seasons_by_profile(id).await
        }
        async fn update_season_team(&self, id: &str, team: &str) -> Result<(), StorageError> {
            self.0.update_season_team(id, team).await
        }
        async fn create_game(&self, game: &Game) -> Result<(), StorageError> {
            self.0.create_game(game).await
        }
        async fn get_game(&self, id: &str) -> Result<Option<Game>, StorageError> {
            self.0.get_game(id).await
        }
        async fn get_games_by_season(&self, id: &str) -> Result<Vec<Game>, StorageError> {
            self.0.get_games_by_season(id).await
        }
        async fn get_games_by_season_and_type(
            &self,
            id: &str,
            is_postseason: bool,
        ) -> Result<Vec<Game>, StorageError> {
            self.0.get_games_by_season_and_type(id, is_postseason).await
        }
        async fn update_game(&self, game: &Game) -> Result<(), StorageError> {
            self.0.update_game(game).await
        }
        async fn delete_game(&self, id: &str) -> Result<(), StorageError> {
            self.0.delete_game(id).await
        }
        async fn set_game_stat(&self, id: &str, key: &str, value: f64) -> Result<(), StorageError> {
            self.0.set_game_stat(id, key, value).await
        }
        async fn get_game_stats(&self, id: &str) -> Result<Vec<GameStat>, StorageError> {
            self.0.get_game_stats(id).await
        }
        async fn delete_game_stat(&self, id: &str, key: &str) -> Result<(), StorageError> {
            self.0.delete_game_stat(id, key).await
        }
        async fn create_achievement(
            &self,
            achievement: &Achievement,
        ) -> Result<Achievement, StorageError> {
            self.0.create_achievement(achievement).await
        }
        async fn get_achievements_by_profile(
            &self,
            id: &str,
        ) -> Result<Vec<Achievement>, StorageError> {
            self.0.get_achievements_by_profile(id).await
        }
        async fn delete_achievement(
            &self,
            id: &str,
            kind: &str,
            year: i32,
        ) -> Result<(), StorageError> {
            self.0.delete_achievement(id, kind, year).await
        }
    }

    #[tokio::test]
    async fn milestones_use_the_listed_seasons_only() {
        let inner = InMemoryStorage::new();
        let profile = Profile::new("madden".into(), "QB".into(), "You".into(), None, None, None);
        inner.create_profile(&profile).await.unwrap();
        let season = Season::new(profile.id.clone(), 2026, "Jets".into());
        inner.create_season(&season).await.unwrap();
        let game = Game::new(season.id.clone(), day(9, 7), "Bills".into(), WeekInfo::default());
        inner.create_game(&game).await.unwrap();
        inner.set_game_stat(&game.id, "pass_yds", 1600.0).await.unwrap();

        let service = StatsService::new(Arc::new(VanishingSeasons(inner)));
        assert!(matches!(
            service.get_season_stats(&season.id).await,
            Err(StatsError::NotFound(_))
        ));

        let milestones = service.get_milestones(&profile.id).await.unwrap();
        let season_1500 = milestones
            .iter()
            .find(|m| m.id == "season_pass_yds_1500")
            .unwrap();
        assert!(season_1500.achieved);
    }
}

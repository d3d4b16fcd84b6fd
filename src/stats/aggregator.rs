//! Reduces per-game stat rows into [`QbStats`].

use futures::future::try_join_all;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use super::{QbStats, StatKey};
use crate::storage::{GameStat, StorageAdapter, StorageError};

/// Rounds to two places, with midpoints going towards positive infinity
pub fn round2(value: Decimal) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(2, strategy)
}

/// Running sum for one key. Stays exact until a value or the sum leaves the
/// `Decimal` range, then carries on in `f64`.
#[derive(Debug, Clone, Copy)]
enum Sum {
    Exact(Decimal),
    Approx(f64),
}

impl Sum {
    fn add(self, value: f64) -> Sum {
        match self {
            Sum::Exact(sum) => match Decimal::from_f64(value).and_then(|v| sum.checked_add(v)) {
                Some(next) => Sum::Exact(next),
                None => {
                    debug!(value, "Stat sum left decimal range, continuing in f64");
                    Sum::Approx(sum.to_f64().unwrap_or_default() + value)
                }
            },
            Sum::Approx(sum) => Sum::Approx(sum + value),
        }
    }

    /// Rounded `(total, average)` over `games`
    fn finish(self, games: u32) -> (f64, f64) {
        match self {
            Sum::Exact(sum) => {
                let average = if games > 0 {
                    sum / Decimal::from(games)
                } else {
                    Decimal::ZERO
                };
                (
                    round2(sum).to_f64().unwrap_or_default(),
                    round2(average).to_f64().unwrap_or_default(),
                )
            }
            Sum::Approx(sum) if games > 0 => (sum, sum / f64::from(games)),
            Sum::Approx(sum) => (sum, 0.0),
        }
    }
}

/// Aggregates already-fetched stat rows, one entry per game in the window.
///
/// Rows with unknown keys or non-finite values are skipped. Sums run in
/// decimal so totals landing on a `.005` boundary round predictably.
pub fn aggregate(games: &[Vec<GameStat>]) -> QbStats {
    let mut sums: HashMap<StatKey, (Sum, u32)> = HashMap::new();

    for stats in games {
        for stat in stats {
            let Ok(key) = stat.stat_key.parse::<StatKey>() else {
                continue;
            };
            if !stat.stat_value.is_finite() {
                warn!(game_id = %stat.game_id, stat_key = %stat.stat_key, "Skipping non-finite stat value");
                continue;
            }
            let entry = sums.entry(key).or_insert((Sum::Exact(Decimal::ZERO), 0));
            entry.0 = entry.0.add(stat.stat_value);
            entry.1 += 1;
        }
    }

    let game_count = games.len() as u32;
    let mut result = QbStats::default();
    for (key, (sum, count)) in sums {
        let (total, average) = sum.finish(game_count);
        let aggregate = result.get_mut(key);
        aggregate.total = total;
        aggregate.average = average;
        aggregate.count = count;
    }
    for key in StatKey::iter() {
        result.get_mut(key).games = game_count;
    }
    result
}

/// Fetches every game's stat rows, then aggregates them. Reads are issued
/// concurrently; the first storage error aborts the whole aggregation.
pub async fn aggregate_stats(
    storage: &dyn StorageAdapter,
    game_ids: &[String],
) -> Result<QbStats, StorageError> {
    let games = fetch_game_stats(storage, game_ids).await?;
    Ok(aggregate(&games))
}

/// Stat rows for each game id, in input order
pub async fn fetch_game_stats(
    storage: &dyn StorageAdapter,
    game_ids: &[String],
) -> Result<Vec<Vec<GameStat>>, StorageError> {
    debug!(games = game_ids.len(), "Fetching stat rows");
    try_join_all(game_ids.iter().map(|id| storage.get_game_stats(id))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn stat(game: &str, key: &str, value: f64) -> GameStat {
        GameStat::new(game.to_string(), key.to_string(), value)
    }

    #[test]
    fn empty_window_is_all_zero() {
        let stats = aggregate(&[]);
        assert_eq!(stats, QbStats::default());
        for (_, aggregate) in stats.iter() {
            assert_eq!(aggregate.games, 0);
            assert_eq!(aggregate.average, 0.0);
        }
    }

    #[test]
    fn every_key_reports_window_size() {
        let games = vec![
            vec![stat("g1", "pass_yds", 250.0)],
            vec![],
            vec![stat("g3", "rush_td", 1.0)],
        ];
        let stats = aggregate(&games);
        assert_eq!(stats.iter().count(), 8);
        for (_, aggregate) in stats.iter() {
            assert_eq!(aggregate.games, 3);
        }
    }

    #[test]
    fn average_divides_by_games_not_count() {
        let games = vec![
            vec![stat("g1", "pass_yds", 300.0)],
            vec![stat("g2", "pass_yds", 200.0)],
            vec![stat("g3", "pass_yds", 250.0)],
            vec![],
            vec![],
        ];
        let yards = aggregate(&games).pass_yds;
        assert_eq!(yards.total, 750.0);
        assert_eq!(yards.count, 3);
        assert_eq!(yards.games, 5);
        assert_eq!(yards.average, 150.0);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let games = vec![vec![stat("g1", "kick_ret_yds", 40.0), stat("g1", "pass_td", 2.0)]];
        let stats = aggregate(&games);
        assert_eq!(stats.pass_td.total, 2.0);
        assert_eq!(stats.iter().map(|(_, a)| a.count).sum::<u32>(), 1);
    }

    #[test]
    fn explicit_zero_still_counts() {
        let games = vec![vec![stat("g1", "pass_int", 0.0)], vec![]];
        let ints = aggregate(&games).pass_int;
        assert_eq!(ints.count, 1);
        assert_eq!(ints.total, 0.0);
    }

    #[test]
    fn total_on_half_cent_boundary_rounds_up() {
        let games = vec![
            vec![stat("g1", "rush_yds", 10.1)],
            vec![stat("g2", "rush_yds", 2.245)],
        ];
        let rush = aggregate(&games).rush_yds;
        assert_eq!(rush.total, 12.35);
        // 12.345 / 2 = 6.1725
        assert_eq!(rush.average, 6.17);
    }

    #[rstest]
    #[case("12.345", "12.35")]
    #[case("0.005", "0.01")]
    #[case("2.004", "2")]
    #[case("-2.345", "-2.34")]
    #[case("-2.346", "-2.35")]
    fn round2_goes_half_up(#[case] input: &str, #[case] expected: &str) {
        let value = Decimal::from_str(input).unwrap();
        assert_eq!(round2(value), Decimal::from_str(expected).unwrap());
    }

    #[test]
    fn sums_past_decimal_range_fall_back_to_float() {
        let games = vec![
            vec![stat("g1", "pass_yds", 5e28)],
            vec![stat("g2", "pass_yds", 5e28)],
        ];
        let yards = aggregate(&games).pass_yds;
        assert_eq!(yards.count, 2);
        assert!((yards.total - 1e29).abs() / 1e29 < 1e-9);
        assert!((yards.average - 5e28).abs() / 5e28 < 1e-9);
    }

    #[test]
    fn value_beyond_decimal_range_is_still_counted() {
        let games = vec![vec![stat("g1", "pass_yds", 1e30)], vec![stat("g2", "pass_yds", 10.0)]];
        let yards = aggregate(&games).pass_yds;
        assert_eq!(yards.count, 2);
        assert!((yards.total - 1e30).abs() / 1e30 < 1e-9);
    }

    #[test]
    fn non_finite_values_are_skipped() {
        let games = vec![vec![stat("g1", "pass_td", f64::NAN)], vec![stat("g2", "pass_td", 2.0)]];
        let tds = aggregate(&games).pass_td;
        assert_eq!(tds.count, 1);
        assert_eq!(tds.total, 2.0);
    }

    #[test]
    fn averages_round_to_two_places() {
        let games = vec![
            vec![stat("g1", "pass_td", 1.0)],
            vec![stat("g2", "pass_td", 1.0)],
            vec![stat("g3", "pass_td", 0.0)],
        ];
        assert_eq!(aggregate(&games).pass_td.average, 0.67);
    }
}

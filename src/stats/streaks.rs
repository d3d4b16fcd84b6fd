//! Consecutive-game streaks over one season.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::{StatKey, Streak};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreakCondition {
    AtLeast(f64),
    Equals(f64),
}

impl StreakCondition {
    fn holds(self, value: f64) -> bool {
        match self {
            StreakCondition::AtLeast(threshold) => value >= threshold,
            StreakCondition::Equals(target) => value == target,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StreakDefinition {
    pub kind: &'static str,
    pub label: &'static str,
    pub stat: StatKey,
    pub condition: StreakCondition,
}

pub const STREAK_DEFINITIONS: &[StreakDefinition] = &[
    StreakDefinition {
        kind: "pass_td_2plus",
        label: "2+ Pass TD Streak",
        stat: StatKey::PassTd,
        condition: StreakCondition::AtLeast(2.0),
    },
    StreakDefinition {
        kind: "no_int",
        label: "No-INT Streak",
        stat: StatKey::PassInt,
        condition: StreakCondition::Equals(0.0),
    },
    StreakDefinition {
        kind: "300_plus_yards",
        label: "300+ Passing Yards Streak",
        stat: StatKey::PassYds,
        condition: StreakCondition::AtLeast(300.0),
    },
];

/// A game's date and its recognized stat values
#[derive(Debug, Clone)]
pub struct GameLine {
    pub game_date: NaiveDate,
    pub values: HashMap<StatKey, f64>,
}

impl GameLine {
    /// Missing stats read as zero
    pub fn value(&self, key: StatKey) -> f64 {
        self.values.get(&key).copied().unwrap_or(0.0)
    }
}

/// Scans `games` (oldest first) for one definition.
///
/// `current_streak` is the run ending at the final game, so it is zero when
/// the final game broke the streak. `last_broken` is the date of the most
/// recent game that ended a non-empty run.
pub fn scan_streak(definition: &StreakDefinition, games: &[GameLine]) -> Streak {
    let mut current = 0;
    let mut longest = 0;
    let mut last_broken = None;

    for game in games {
        if definition.condition.holds(game.value(definition.stat)) {
            current += 1;
            longest = longest.max(current);
        } else {
            if current > 0 {
                last_broken = Some(game.game_date);
            }
            current = 0;
        }
    }

    Streak {
        kind: definition.kind.to_string(),
        label: definition.label.to_string(),
        current_streak: current,
        longest_streak: longest,
        last_broken,
    }
}

pub fn compute_streaks(definitions: &[StreakDefinition], games: &[GameLine]) -> Vec<Streak> {
    definitions
        .iter()
        .map(|definition| scan_streak(definition, games))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, n).unwrap()
    }

    fn lines(key: StatKey, values: &[f64]) -> Vec<GameLine> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| GameLine {
                game_date: day(i as u32 + 1),
                values: HashMap::from([(key, *value)]),
            })
            .collect()
    }

    fn definition(kind: &str) -> &'static StreakDefinition {
        STREAK_DEFINITIONS.iter().find(|d| d.kind == kind).unwrap()
    }

    #[test]
    fn current_counts_only_the_trailing_run() {
        let games = lines(StatKey::PassTd, &[1.0, 2.0, 3.0, 0.0, 2.0]);
        let streak = scan_streak(definition("pass_td_2plus"), &games);
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.last_broken, Some(day(4)));
    }

    #[test]
    fn unbroken_run_has_no_break_date() {
        let games = lines(StatKey::PassYds, &[301.0, 300.0, 412.0]);
        let streak = scan_streak(definition("300_plus_yards"), &games);
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.longest_streak, 3);
        assert_eq!(streak.last_broken, None);
    }

    #[test]
    fn trailing_break_resets_current() {
        let games = lines(StatKey::PassTd, &[2.0, 2.0, 0.0]);
        let streak = scan_streak(definition("pass_td_2plus"), &games);
        assert_eq!(streak.current_streak, 0);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.last_broken, Some(day(3)));
    }

    #[test]
    fn failing_before_any_run_records_no_break() {
        let games = lines(StatKey::PassTd, &[0.0, 1.0, 2.0]);
        let streak = scan_streak(definition("pass_td_2plus"), &games);
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.last_broken, None);
    }

    #[test]
    fn missing_interceptions_extend_no_int_streak() {
        let mut games = lines(StatKey::PassInt, &[0.0, 1.0]);
        games.push(GameLine {
            game_date: day(3),
            values: HashMap::new(),
        });
        games.push(GameLine {
            game_date: day(4),
            values: HashMap::from([(StatKey::PassYds, 220.0)]),
        });

        let streak = scan_streak(definition("no_int"), &games);
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.last_broken, Some(day(2)));
    }

    #[rstest]
    #[case("pass_td_2plus", 0)]
    #[case("no_int", 0)]
    #[case("300_plus_yards", 0)]
    fn empty_season_has_zero_streaks(#[case] kind: &str, #[case] expected: u32) {
        let streak = scan_streak(definition(kind), &[]);
        assert_eq!(streak.current_streak, expected);
        assert_eq!(streak.longest_streak, expected);
        assert_eq!(streak.last_broken, None);
    }

    #[test]
    fn computes_all_three_in_definition_order() {
        let streaks = compute_streaks(STREAK_DEFINITIONS, &[]);
        let kinds: Vec<_> = streaks.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, vec!["pass_td_2plus", "no_int", "300_plus_yards"]);
        assert_eq!(streaks[1].label, "No-INT Streak");
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The quarterback stat keys the engine aggregates. Storage keeps free-form
/// key strings; anything that does not parse to a `StatKey` is ignored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatKey {
    PassCmp,
    PassAtt,
    PassYds,
    PassTd,
    PassInt,
    RushAtt,
    RushYds,
    RushTd,
}

impl StatKey {
    pub fn label(self) -> &'static str {
        match self {
            StatKey::PassCmp => "Pass Completions",
            StatKey::PassAtt => "Pass Attempts",
            StatKey::PassYds => "Passing Yards",
            StatKey::PassTd => "Pass TDs",
            StatKey::PassInt => "Interceptions",
            StatKey::RushAtt => "Rush Attempts",
            StatKey::RushYds => "Rushing Yards",
            StatKey::RushTd => "Rush TDs",
        }
    }
}

/// Total/average/count/games for one stat key over a set of games.
///
/// `average` is `total / games`, not `total / count`: a game with no row
/// for the key still counts towards the denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatAggregate {
    pub total: f64,
    pub average: f64,
    pub count: u32,
    pub games: u32,
}

/// One aggregate per quarterback stat key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QbStats {
    pub pass_cmp: StatAggregate,
    pub pass_att: StatAggregate,
    pub pass_yds: StatAggregate,
    pub pass_td: StatAggregate,
    pub pass_int: StatAggregate,
    pub rush_att: StatAggregate,
    pub rush_yds: StatAggregate,
    pub rush_td: StatAggregate,
}

impl QbStats {
    pub fn get(&self, key: StatKey) -> &StatAggregate {
        match key {
            StatKey::PassCmp => &self.pass_cmp,
            StatKey::PassAtt => &self.pass_att,
            StatKey::PassYds => &self.pass_yds,
            StatKey::PassTd => &self.pass_td,
            StatKey::PassInt => &self.pass_int,
            StatKey::RushAtt => &self.rush_att,
            StatKey::RushYds => &self.rush_yds,
            StatKey::RushTd => &self.rush_td,
        }
    }

    pub fn get_mut(&mut self, key: StatKey) -> &mut StatAggregate {
        match key {
            StatKey::PassCmp => &mut self.pass_cmp,
            StatKey::PassAtt => &mut self.pass_att,
            StatKey::PassYds => &mut self.pass_yds,
            StatKey::PassTd => &mut self.pass_td,
            StatKey::PassInt => &mut self.pass_int,
            StatKey::RushAtt => &mut self.rush_att,
            StatKey::RushYds => &mut self.rush_yds,
            StatKey::RushTd => &mut self.rush_td,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKey, &StatAggregate)> + '_ {
        StatKey::iter().map(move |key| (key, self.get(key)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub season_year: i32,
    pub team_name: String,
    pub regular_season: QbStats,
    pub postseason: QbStats,
    pub combined: QbStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerStats {
    pub regular_season: QbStats,
    pub postseason: QbStats,
    pub combined: QbStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub achieved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_broken: Option<NaiveDate>,
}

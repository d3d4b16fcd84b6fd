use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::stats::StatKey;
use crate::storage::{Game, GameOutcome, GameStat, WeekInfo};

fn default_sport() -> String {
    "madden".to_string()
}

fn default_position() -> String {
    "QB".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileRequest {
    #[serde(default = "default_sport")]
    pub sport: String,
    #[serde(default = "default_position")]
    pub position: String,
    pub player_name: String,
    pub draft_round: Option<i32>,
    pub draft_pick: Option<i32>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetActiveProfileRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSeasonRequest {
    pub season_year: i32,
    pub team_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSeasonRequest {
    pub team_name: String,
}

/// Everything the game form submits, used both to log and to edit a game
#[derive(Debug, Clone, Deserialize)]
pub struct GameForm {
    pub game_date: NaiveDate,
    pub opponent: String,
    #[serde(default)]
    pub week: WeekInfo,
    #[serde(default = "default_true")]
    pub is_home: bool,
    #[serde(default = "default_true")]
    pub is_starter: bool,
    pub result: Option<GameOutcome>,
    pub team_score: Option<i32>,
    pub opponent_score: Option<i32>,
    pub note: Option<String>,
    #[serde(default)]
    pub stats: HashMap<StatKey, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetStatRequest {
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAchievementRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub year: i32,
}

/// A game together with its stat rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub game: Game,
    pub stats: Vec<GameStat>,
}

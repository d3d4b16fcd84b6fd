use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// One tracked player career
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub sport: String,    // e.g. "madden"
    pub position: String, // only "QB" is tracked today
    pub player_name: String,
    pub draft_round: Option<i32>,
    pub draft_pick: Option<i32>,
    pub team_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(
        sport: String,
        position: String,
        player_name: String,
        draft_round: Option<i32>,
        draft_pick: Option<i32>,
        team_name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sport,
            position,
            player_name,
            draft_round,
            draft_pick,
            team_name,
            created_at: Utc::now(),
        }
    }
}

/// One year of a profile's career
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: String,
    pub profile_id: String,
    pub season_year: i32,
    pub team_name: String,
    pub created_at: DateTime<Utc>,
}

impl Season {
    pub fn new(profile_id: String, season_year: i32, team_name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            profile_id,
            season_year,
            team_name,
            created_at: Utc::now(),
        }
    }
}

/// Fixed postseason bracket, persisted by round code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostseasonRound {
    Wildcard,
    Divisional,
    AfcChampionship,
    NfcChampionship,
    SuperBowl,
}

impl PostseasonRound {
    pub const ALL: [PostseasonRound; 5] = [
        PostseasonRound::Wildcard,
        PostseasonRound::Divisional,
        PostseasonRound::AfcChampionship,
        PostseasonRound::NfcChampionship,
        PostseasonRound::SuperBowl,
    ];

    pub fn code(self) -> i32 {
        match self {
            PostseasonRound::Wildcard => 1,
            PostseasonRound::Divisional => 2,
            PostseasonRound::AfcChampionship => 3,
            PostseasonRound::NfcChampionship => 4,
            PostseasonRound::SuperBowl => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|round| round.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            PostseasonRound::Wildcard => "Wildcard",
            PostseasonRound::Divisional => "Divisional",
            PostseasonRound::AfcChampionship => "AFC Championship",
            PostseasonRound::NfcChampionship => "NFC Championship",
            PostseasonRound::SuperBowl => "Super Bowl",
        }
    }
}

/// Where a game falls in the schedule.
///
/// Stored as the `(week, is_postseason)` column pair: the week column holds
/// either a regular-season week number or a postseason round code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeekInfo {
    Regular { week: Option<u32> },
    Postseason { round: Option<PostseasonRound> },
}

impl Default for WeekInfo {
    fn default() -> Self {
        WeekInfo::Regular { week: None }
    }
}

impl WeekInfo {
    pub fn is_postseason(&self) -> bool {
        matches!(self, WeekInfo::Postseason { .. })
    }

    pub fn to_columns(self) -> (Option<i32>, bool) {
        match self {
            WeekInfo::Regular { week } => (week.map(|w| w as i32), false),
            WeekInfo::Postseason { round } => (round.map(PostseasonRound::code), true),
        }
    }

    /// Rebuilds the variant from stored columns. Round codes outside the
    /// bracket are dropped rather than failing the whole row.
    pub fn from_columns(week: Option<i32>, is_postseason: bool) -> Self {
        if is_postseason {
            let round = week.and_then(|code| {
                let round = PostseasonRound::from_code(code);
                if round.is_none() {
                    tracing::warn!(code, "Unknown postseason round code");
                }
                round
            });
            WeekInfo::Postseason { round }
        } else {
            let week = week.and_then(|w| u32::try_from(w).ok()).filter(|w| *w > 0);
            WeekInfo::Regular { week }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
pub enum GameOutcome {
    #[serde(rename = "W")]
    #[strum(serialize = "W")]
    Win,
    #[serde(rename = "L")]
    #[strum(serialize = "L")]
    Loss,
    #[serde(rename = "T")]
    #[strum(serialize = "T")]
    Tie,
}

/// One logged contest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub season_id: String,
    pub game_date: NaiveDate,
    pub opponent: String,
    pub week: WeekInfo,
    pub is_home: bool,
    pub is_starter: bool,
    pub result: Option<GameOutcome>,
    pub team_score: Option<i32>,
    pub opponent_score: Option<i32>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Game {
    /// Creates a home game the player started, with no result recorded yet
    pub fn new(season_id: String, game_date: NaiveDate, opponent: String, week: WeekInfo) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            season_id,
            game_date,
            opponent,
            week,
            is_home: true,
            is_starter: true,
            result: None,
            team_score: None,
            opponent_score: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_postseason(&self) -> bool {
        self.week.is_postseason()
    }
}

/// One key/value statistic row for a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStat {
    pub id: String,
    pub game_id: String,
    pub stat_key: String,
    pub stat_value: f64,
}

impl GameStat {
    pub fn new(game_id: String, stat_key: String, stat_value: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            game_id,
            stat_key,
            stat_value,
        }
    }
}

/// User-declared award or league-leader credit for a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub profile_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

impl Achievement {
    pub fn new(profile_id: String, kind: String, year: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            profile_id,
            kind,
            year,
            created_at: Utc::now(),
        }
    }
}

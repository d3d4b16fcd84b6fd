//! Table definitions for the SQL backends. Statements are separated by `;`
//! and executed one at a time.

pub const SQLITE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY NOT NULL,
    sport TEXT NOT NULL,
    position TEXT NOT NULL,
    player_name TEXT NOT NULL,
    draft_round INTEGER,
    draft_pick INTEGER,
    team_name TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS seasons (
    id TEXT PRIMARY KEY NOT NULL,
    profile_id TEXT NOT NULL,
    season_year INTEGER NOT NULL,
    team_name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY(profile_id) REFERENCES profiles(id) ON DELETE CASCADE
);

-- week holds a week number, or a round code when is_postseason = 1
CREATE TABLE IF NOT EXISTS games (
    id TEXT PRIMARY KEY NOT NULL,
    season_id TEXT NOT NULL,
    game_date TEXT NOT NULL,
    opponent TEXT NOT NULL,
    week INTEGER,
    is_postseason INTEGER NOT NULL DEFAULT 0,
    is_home INTEGER NOT NULL DEFAULT 1,
    is_starter INTEGER NOT NULL DEFAULT 1,
    result TEXT,
    team_score INTEGER,
    opponent_score INTEGER,
    note TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY(season_id) REFERENCES seasons(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS game_stats (
    id TEXT PRIMARY KEY NOT NULL,
    game_id TEXT NOT NULL,
    stat_key TEXT NOT NULL,
    stat_value REAL NOT NULL,
    UNIQUE(game_id, stat_key),
    FOREIGN KEY(game_id) REFERENCES games(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS achievements (
    id TEXT PRIMARY KEY NOT NULL,
    profile_id TEXT NOT NULL,
    type TEXT NOT NULL,
    year INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY(profile_id) REFERENCES profiles(id) ON DELETE CASCADE,
    UNIQUE(profile_id, type, year)
);

CREATE INDEX IF NOT EXISTS idx_seasons_profile_id ON seasons(profile_id);
CREATE INDEX IF NOT EXISTS idx_games_season_id ON games(season_id);
CREATE INDEX IF NOT EXISTS idx_game_stats_game_id ON game_stats(game_id);
CREATE INDEX IF NOT EXISTS idx_game_stats_stat_key ON game_stats(stat_key);
CREATE INDEX IF NOT EXISTS idx_achievements_profile_id ON achievements(profile_id)
"#;

pub const POSTGRES_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    sport TEXT NOT NULL,
    position TEXT NOT NULL,
    player_name TEXT NOT NULL,
    draft_round INTEGER,
    draft_pick INTEGER,
    team_name TEXT,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS seasons (
    id TEXT PRIMARY KEY,
    profile_id TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    season_year INTEGER NOT NULL,
    team_name TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS games (
    id TEXT PRIMARY KEY,
    season_id TEXT NOT NULL REFERENCES seasons(id) ON DELETE CASCADE,
    game_date DATE NOT NULL,
    opponent TEXT NOT NULL,
    week INTEGER,
    is_postseason BOOLEAN NOT NULL DEFAULT FALSE,
    is_home BOOLEAN NOT NULL DEFAULT TRUE,
    is_starter BOOLEAN NOT NULL DEFAULT TRUE,
    result TEXT,
    team_score INTEGER,
    opponent_score INTEGER,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS game_stats (
    id TEXT PRIMARY KEY,
    game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    stat_key TEXT NOT NULL,
    stat_value DOUBLE PRECISION NOT NULL,
    UNIQUE(game_id, stat_key)
);

CREATE TABLE IF NOT EXISTS achievements (
    id TEXT PRIMARY KEY,
    profile_id TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    type TEXT NOT NULL,
    year INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    UNIQUE(profile_id, type, year)
);

CREATE INDEX IF NOT EXISTS idx_seasons_profile_id ON seasons(profile_id);
CREATE INDEX IF NOT EXISTS idx_games_season_id ON games(season_id);
CREATE INDEX IF NOT EXISTS idx_game_stats_game_id ON game_stats(game_id);
CREATE INDEX IF NOT EXISTS idx_game_stats_stat_key ON game_stats(stat_key);
CREATE INDEX IF NOT EXISTS idx_achievements_profile_id ON achievements(profile_id)
"#;

/// Splits a schema script into executable statements, dropping comment lines
pub fn statements(script: &str) -> impl Iterator<Item = String> + '_ {
    script.split(';').filter_map(|statement| {
        let sql = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let sql = sql.trim();
        (!sql.is_empty()).then(|| sql.to_string())
    })
}

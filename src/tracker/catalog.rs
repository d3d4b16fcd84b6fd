//! Achievement type tags a user may record.

use crate::stats::StatKey;

pub const AWARD_TYPES: &[&str] = &[
    "award_mvp",
    "award_super_bowl",
    "award_super_bowl_mvp",
    "award_oroy",
    "award_opoy",
];

/// Stats that can carry a league-leader credit, stored as `leader_{key}`
pub const LEADER_STATS: &[StatKey] = &[
    StatKey::PassYds,
    StatKey::PassTd,
    StatKey::PassCmp,
    StatKey::PassAtt,
    StatKey::RushYds,
    StatKey::RushTd,
];

pub fn is_known_achievement(kind: &str) -> bool {
    if AWARD_TYPES.contains(&kind) {
        return true;
    }
    kind.strip_prefix("leader_")
        .and_then(|key| key.parse::<StatKey>().ok())
        .is_some_and(|key| LEADER_STATS.contains(&key))
}

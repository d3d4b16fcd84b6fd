//! Threshold milestones over career and single-season totals.

use super::{CareerStats, Milestone, SeasonStats, StatKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneScope {
    /// Compared against the career combined total
    Career,
    /// Achieved when any one season's combined total reaches the threshold
    SingleSeason,
}

/// One family of milestones sharing a stat and a label pattern
#[derive(Debug, Clone, Copy)]
pub struct MilestoneFamily {
    pub id_prefix: &'static str,
    pub stat: StatKey,
    pub scope: MilestoneScope,
    pub thresholds: &'static [u32],
    pub label: &'static str,
}

impl MilestoneFamily {
    fn milestone(&self, threshold: u32, achieved: bool) -> Milestone {
        let id = format!("{}_{}", self.id_prefix, threshold);
        Milestone {
            kind: id.clone(),
            id,
            label: format!("{} {}", threshold, self.label),
            achieved,
        }
    }
}

/// Evaluated in order; output keeps family order then threshold order
pub const MILESTONE_FAMILIES: &[MilestoneFamily] = &[
    MilestoneFamily {
        id_prefix: "pass_yds",
        stat: StatKey::PassYds,
        scope: MilestoneScope::Career,
        thresholds: &[1000, 2000, 4000, 8000, 16000, 32000],
        label: "Career Passing Yards",
    },
    MilestoneFamily {
        id_prefix: "pass_td",
        stat: StatKey::PassTd,
        scope: MilestoneScope::Career,
        thresholds: &[1, 10, 30, 50, 100, 200],
        label: "Career Passing TDs",
    },
    MilestoneFamily {
        id_prefix: "season_pass_yds",
        stat: StatKey::PassYds,
        scope: MilestoneScope::SingleSeason,
        thresholds: &[1500, 3000, 4000, 5000],
        label: "Passing Yards (Single Season)",
    },
];

pub fn evaluate_milestones(
    families: &[MilestoneFamily],
    career: &CareerStats,
    seasons: &[SeasonStats],
) -> Vec<Milestone> {
    families
        .iter()
        .flat_map(|family| {
            family.thresholds.iter().map(move |&threshold| {
                let target = f64::from(threshold);
                let achieved = match family.scope {
                    MilestoneScope::Career => career.combined.get(family.stat).total >= target,
                    MilestoneScope::SingleSeason => seasons
                        .iter()
                        .any(|season| season.combined.get(family.stat).total >= target),
                };
                family.milestone(threshold, achieved)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::QbStats;

    fn career_with(yards: f64, tds: f64) -> CareerStats {
        let mut combined = QbStats::default();
        combined.pass_yds.total = yards;
        combined.pass_td.total = tds;
        CareerStats {
            combined,
            ..CareerStats::default()
        }
    }

    fn season_with(year: i32, yards: f64) -> SeasonStats {
        let mut combined = QbStats::default();
        combined.pass_yds.total = yards;
        SeasonStats {
            season_year: year,
            team_name: "Jets".into(),
            regular_season: QbStats::default(),
            postseason: QbStats::default(),
            combined,
        }
    }

    fn achieved(milestones: &[Milestone], id: &str) -> bool {
        milestones
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.achieved)
            .unwrap()
    }

    #[test]
    fn emits_every_threshold_in_table_order() {
        let milestones = evaluate_milestones(MILESTONE_FAMILIES, &CareerStats::default(), &[]);
        assert_eq!(milestones.len(), 16);
        assert_eq!(milestones[0].id, "pass_yds_1000");
        assert_eq!(milestones[0].label, "1000 Career Passing Yards");
        assert_eq!(milestones[6].id, "pass_td_1");
        assert_eq!(milestones[6].label, "1 Career Passing TDs");
        assert_eq!(milestones[12].id, "season_pass_yds_1500");
        assert_eq!(milestones[12].label, "1500 Passing Yards (Single Season)");
        assert!(milestones.iter().all(|m| !m.achieved && m.kind == m.id));
    }

    #[test]
    fn career_threshold_is_inclusive() {
        let below = evaluate_milestones(MILESTONE_FAMILIES, &career_with(999.99, 0.0), &[]);
        assert!(!achieved(&below, "pass_yds_1000"));

        let at = evaluate_milestones(MILESTONE_FAMILIES, &career_with(1000.0, 0.0), &[]);
        assert!(achieved(&at, "pass_yds_1000"));
        assert!(!achieved(&at, "pass_yds_2000"));
    }

    #[test]
    fn td_family_uses_touchdown_total() {
        let milestones = evaluate_milestones(MILESTONE_FAMILIES, &career_with(0.0, 30.0), &[]);
        assert!(achieved(&milestones, "pass_td_1"));
        assert!(achieved(&milestones, "pass_td_30"));
        assert!(!achieved(&milestones, "pass_td_50"));
    }

    #[test]
    fn single_season_uses_best_season_not_career_total() {
        let seasons = vec![season_with(2026, 1600.0), season_with(2025, 1400.0)];
        let milestones =
            evaluate_milestones(MILESTONE_FAMILIES, &career_with(3000.0, 0.0), &seasons);
        assert!(achieved(&milestones, "season_pass_yds_1500"));
        assert!(!achieved(&milestones, "season_pass_yds_3000"));
        assert!(achieved(&milestones, "pass_yds_2000"));
    }
}

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum_macros::{AsRefStr, EnumIter, EnumString};

use super::PlayerGameTypeStats;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaderboardSort {
    #[default]
    Wins,
    WinRate,
    AvgScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub stats: PlayerGameTypeStats,
    pub win_rate: f64,
    pub avg_score: f64,
}

impl From<PlayerGameTypeStats> for LeaderboardEntry {
    fn from(stats: PlayerGameTypeStats) -> Self {
        Self {
            win_rate: stats.win_rate(),
            avg_score: stats.avg_score(),
            stats,
        }
    }
}

/// Ranks entries best first by the chosen column. Equal values fall back to
/// player id so the order is stable.
pub fn rank<'a>(
    entries: impl IntoIterator<Item = &'a PlayerGameTypeStats>,
    sort: LeaderboardSort,
) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<LeaderboardEntry> = entries
        .into_iter()
        .cloned()
        .map(LeaderboardEntry::from)
        .collect();

    ranked.sort_by(|a, b| {
        let by_column = match sort {
            LeaderboardSort::Wins => b.stats.wins.cmp(&a.stats.wins),
            LeaderboardSort::WinRate => b.win_rate.total_cmp(&a.win_rate),
            LeaderboardSort::AvgScore => b.avg_score.total_cmp(&a.avg_score),
        };
        match by_column {
            Ordering::Equal => a.stats.player_id.cmp(&b.stats.player_id),
            other => other,
        }
    });

    ranked
}

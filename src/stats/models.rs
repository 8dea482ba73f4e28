use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    Win,
    Loss,
}

/// Cumulative results of one player in one game type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGameTypeStats {
    pub game_type: String,
    pub player_id: PlayerId,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub total_turns: u64,
    pub total_score: u64,
    pub highest_score_in_game: u32,
}

impl PlayerGameTypeStats {
    pub fn new(game_type: &str, player_id: &str) -> Self {
        Self {
            game_type: game_type.to_string(),
            player_id: player_id.to_string(),
            ..Self::default()
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games_played)
        }
    }

    pub fn avg_score(&self) -> f64 {
        if self.total_turns == 0 {
            0.0
        } else {
            self.total_score as f64 / self.total_turns as f64
        }
    }
}

/// One player's line in the append-only game log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub player_id: PlayerId,
    pub game_type: String,
    pub final_score: u32,
    pub turns: u32,
    pub recorded_at: DateTime<Utc>,
    pub outcome: GameOutcome,
}

/// (game type, player id)
pub type StatsKey = (String, PlayerId);

/// Process-wide statistics: the per-player counters plus the game log they
/// were built from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsStore {
    pub stats: BTreeMap<StatsKey, PlayerGameTypeStats>,
    pub game_log: Vec<GameRecord>,
}

/// Serializable form of [`StatsStore`]. Entries carry their own key so the
/// map survives formats that only allow string keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub stats: Vec<PlayerGameTypeStats>,
    pub game_log: Vec<GameRecord>,
}

impl From<&StatsStore> for StatsSnapshot {
    fn from(store: &StatsStore) -> Self {
        Self {
            stats: store.stats.values().cloned().collect(),
            game_log: store.game_log.clone(),
        }
    }
}

impl From<StatsSnapshot> for StatsStore {
    fn from(snapshot: StatsSnapshot) -> Self {
        Self {
            stats: snapshot
                .stats
                .into_iter()
                .map(|entry| ((entry.game_type.clone(), entry.player_id.clone()), entry))
                .collect(),
            game_log: snapshot.game_log,
        }
    }
}

impl StatsStore {
    pub fn entry(&mut self, game_type: &str, player_id: &str) -> &mut PlayerGameTypeStats {
        self.stats
            .entry((game_type.to_string(), player_id.to_string()))
            .or_insert_with(|| PlayerGameTypeStats::new(game_type, player_id))
    }

    pub fn for_game_type<'a>(
        &'a self,
        game_type: &'a str,
    ) -> impl Iterator<Item = &'a PlayerGameTypeStats> + 'a {
        self.stats
            .values()
            .filter(move |entry| entry.game_type == game_type)
    }

    /// Points per turn over the player's most recent `window` games of this
    /// type, 0 when those games hold no turns
    pub fn recent_average(&self, game_type: &str, player_id: &str, window: usize) -> f64 {
        let (score, turns) = self
            .game_log
            .iter()
            .rev()
            .filter(|record| record.game_type == game_type && record.player_id == player_id)
            .take(window)
            .fold((0u64, 0u64), |(score, turns), record| {
                (
                    score + u64::from(record.final_score),
                    turns + u64::from(record.turns),
                )
            });

        if turns == 0 {
            0.0
        } else {
            score as f64 / turns as f64
        }
    }
}

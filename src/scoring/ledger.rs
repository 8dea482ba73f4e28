use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PlayerId;

/// Cumulative score per participant.
///
/// The ledger is a plain value: updates return the next ledger instead of
/// mutating a shared map, so a snapshot taken before a turn can never be
/// affected by the turn itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreLedger {
    scores: BTreeMap<PlayerId, u32>,
}

impl ScoreLedger {
    /// Creates a ledger with every participant at zero
    pub fn new(participants: &[PlayerId]) -> Self {
        Self {
            scores: participants.iter().map(|id| (id.clone(), 0)).collect(),
        }
    }

    pub fn score(&self, player_id: &str) -> u32 {
        self.scores.get(player_id).copied().unwrap_or_default()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.scores.contains_key(player_id)
    }

    /// Returns the next ledger with `player_id` set to `score`
    pub fn with_score(mut self, player_id: &str, score: u32) -> Self {
        self.scores.insert(player_id.to_string(), score);
        self
    }

    /// Returns the next ledger with `bonus` added to `player_id`
    pub fn with_bonus(self, player_id: &str, bonus: u32) -> Self {
        let current = self.score(player_id);
        self.with_score(player_id, current.saturating_add(bonus))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, u32)> {
        self.scores.iter().map(|(id, score)| (id, *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

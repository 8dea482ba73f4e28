use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::AsRefStr;

use super::PlayerId;

pub const MIN_PARTICIPANTS: usize = 2;
pub const MAX_PARTICIPANTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PlayMode {
    RoundRobin,
    Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EndCondition {
    /// The game ends the moment any player reaches the target
    SuddenDeath,
    /// Once someone reaches the target, everyone else gets one more turn
    EqualInnings,
}

/// One-time bonus credited to a player when the game starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handicap {
    pub player_id: PlayerId,
    pub bonus: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("A game needs between 2 and 4 participants, got {0}")]
    ParticipantCount(usize),
    #[error("Participant ids cannot be empty")]
    EmptyParticipantId,
    #[error("Participant listed more than once: {0}")]
    DuplicateParticipant(PlayerId),
    #[error("Target score must be greater than zero")]
    ZeroTarget,
    #[error("Game type cannot be empty")]
    EmptyGameType,
    #[error("Handicap player is not a participant: {0}")]
    HandicapPlayerNotParticipant(PlayerId),
}

/// Rules of a single match, fixed at game start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfiguration {
    pub game_type: String,
    pub play_mode: PlayMode,
    pub participants: Vec<PlayerId>,
    pub target_score: u32,
    pub end_condition: EndCondition,
    /// Whether a turn may carry a score past the target instead of capping it
    pub allow_overshoot: bool,
    pub handicap: Option<Handicap>,
}

impl GameConfiguration {
    pub fn new(
        game_type: impl Into<String>,
        play_mode: PlayMode,
        participants: Vec<PlayerId>,
        target_score: u32,
        end_condition: EndCondition,
        allow_overshoot: bool,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            game_type: game_type.into(),
            play_mode,
            participants,
            target_score,
            end_condition,
            allow_overshoot,
            handicap: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_handicap(mut self, handicap: Handicap) -> Result<Self, ConfigError> {
        self.handicap = Some(handicap);
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_type.trim().is_empty() {
            return Err(ConfigError::EmptyGameType);
        }

        let count = self.participants.len();
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&count) {
            return Err(ConfigError::ParticipantCount(count));
        }

        let mut seen = HashSet::new();
        for id in &self.participants {
            if id.trim().is_empty() {
                return Err(ConfigError::EmptyParticipantId);
            }
            if !seen.insert(id.as_str()) {
                return Err(ConfigError::DuplicateParticipant(id.clone()));
            }
        }

        if self.target_score == 0 {
            return Err(ConfigError::ZeroTarget);
        }

        if let Some(handicap) = &self.handicap {
            if !self.participants.contains(&handicap.player_id) {
                return Err(ConfigError::HandicapPlayerNotParticipant(
                    handicap.player_id.clone(),
                ));
            }
        }

        Ok(())
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Handicap offers only make sense for one-on-one round-robin games
    pub fn supports_handicap(&self) -> bool {
        self.play_mode == PlayMode::RoundRobin && self.participants.len() == 2
    }
}

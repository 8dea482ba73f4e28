use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{
    config::{ConfigError, GameConfiguration},
    ledger::ScoreLedger,
    session::{GameSession, PlayoutState, TurnSnapshot},
    turn::TurnAccumulator,
    PlayerId,
};

/// Serializable form of a live session, handed to the persistence collaborator
/// after every mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub ledger: ScoreLedger,
    pub game_config: GameConfiguration,
    pub current_player_index: usize,
    pub finished_player_ids: BTreeSet<PlayerId>,
    pub playout_state: PlayoutState,
    pub turn_snapshot_stack: Vec<TurnSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("Invalid game configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Player index {index} is out of range for {participants} participants")]
    IndexOutOfRange { index: usize, participants: usize },
    #[error("Ledger does not match the participant list")]
    LedgerMismatch,
    #[error("Finished player is not a participant: {0}")]
    UnknownFinishedPlayer(PlayerId),
}

impl GameSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            ledger: self.ledger.clone(),
            game_config: self.config.clone(),
            current_player_index: self.current_player_index,
            finished_player_ids: self.finished.clone(),
            playout_state: self.playout,
            turn_snapshot_stack: self.history.clone(),
        }
    }

    /// Rebuilds a session from a persisted snapshot. The live turn starts
    /// empty since uncommitted points are never persisted.
    pub fn restore(snapshot: SessionSnapshot) -> Result<Self, SnapshotError> {
        let config = snapshot.game_config;
        config.validate()?;

        let participants = config.participant_count();
        let check_index = |index: usize| {
            if index < participants {
                Ok(())
            } else {
                Err(SnapshotError::IndexOutOfRange {
                    index,
                    participants,
                })
            }
        };
        let matches_participants = |ledger: &ScoreLedger| {
            ledger.len() == participants && config.participants.iter().all(|id| ledger.contains(id))
        };

        check_index(snapshot.current_player_index)?;
        if let PlayoutState::InProgress { start_index } = snapshot.playout_state {
            check_index(start_index)?;
        }
        if !matches_participants(&snapshot.ledger) {
            return Err(SnapshotError::LedgerMismatch);
        }
        for turn in &snapshot.turn_snapshot_stack {
            check_index(turn.current_player_index)?;
            if !matches_participants(&turn.ledger) {
                return Err(SnapshotError::LedgerMismatch);
            }
        }
        if let Some(unknown) = snapshot
            .finished_player_ids
            .iter()
            .find(|id| !config.participants.contains(*id))
        {
            return Err(SnapshotError::UnknownFinishedPlayer(unknown.clone()));
        }

        Ok(Self {
            config,
            ledger: snapshot.ledger,
            current_player_index: snapshot.current_player_index,
            finished: snapshot.finished_player_ids,
            playout: snapshot.playout_state,
            history: snapshot.turn_snapshot_stack,
            turn: TurnAccumulator::new(),
        })
    }
}

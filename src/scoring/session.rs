// A session lives from "start game" until the turn that ends it. Committing a
// turn consumes the session and hands back either the next active session or
// the finished game, so a terminal session can never be committed to again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{
    config::{ConfigError, EndCondition, GameConfiguration},
    ledger::ScoreLedger,
    turn::TurnAccumulator,
    PlayerId,
};

/// Progress of the catch-up round under equal innings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum PlayoutState {
    #[default]
    NotStarted,
    /// `start_index` is the seat of the first player to reach the target
    InProgress { start_index: usize },
}

/// State before a committed turn, kept for whole-turn undo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub ledger: ScoreLedger,
    pub current_player_index: usize,
}

/// Everything the statistics side needs from a game that has ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedGame {
    pub config: GameConfiguration,
    pub final_ledger: ScoreLedger,
    pub winners: Vec<PlayerId>,
    /// Committed turns, oldest first. Under sudden death the game-ending turn
    /// is not part of it.
    pub turn_history: Vec<TurnSnapshot>,
    /// Set when the sole winner's game-ending turn is missing from
    /// `turn_history` and has to be credited separately
    pub winner_awarded_final_turn: bool,
}

impl FinishedGame {
    pub fn is_winner(&self, player_id: &str) -> bool {
        self.winners.iter().any(|id| id == player_id)
    }
}

#[derive(Debug)]
pub enum TurnOutcome {
    Continue(GameSession),
    Finished(FinishedGame),
}

enum Advance {
    Next(usize),
    RoundComplete,
    AllFinished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub(super) config: GameConfiguration,
    pub(super) ledger: ScoreLedger,
    pub(super) current_player_index: usize,
    pub(super) finished: BTreeSet<PlayerId>,
    pub(super) playout: PlayoutState,
    pub(super) history: Vec<TurnSnapshot>,
    pub(super) turn: TurnAccumulator,
}

impl GameSession {
    /// Starts a game with the first participant to act and any handicap
    /// already credited
    pub fn start(config: GameConfiguration) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut ledger = ScoreLedger::new(&config.participants);
        if let Some(handicap) = &config.handicap {
            ledger = ledger.with_bonus(&handicap.player_id, handicap.bonus);
        }

        Ok(Self {
            config,
            ledger,
            current_player_index: 0,
            finished: BTreeSet::new(),
            playout: PlayoutState::NotStarted,
            history: Vec::new(),
            turn: TurnAccumulator::new(),
        })
    }

    pub fn config(&self) -> &GameConfiguration {
        &self.config
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn current_player(&self) -> &str {
        &self.config.participants[self.current_player_index]
    }

    pub fn finished_players(&self) -> &BTreeSet<PlayerId> {
        &self.finished
    }

    pub fn playout(&self) -> PlayoutState {
        self.playout
    }

    pub fn history(&self) -> &[TurnSnapshot] {
        &self.history
    }

    pub fn turn(&self) -> &TurnAccumulator {
        &self.turn
    }

    pub fn pending_points(&self) -> i32 {
        self.turn.total()
    }

    pub fn add_points(&mut self, delta: i32) {
        self.turn.add_points(delta);
    }

    pub fn undo_last_action(&mut self) -> Option<i32> {
        self.turn.undo_last_action()
    }

    /// Commits whatever the live turn has accumulated
    pub fn end_turn(self) -> TurnOutcome {
        let total = self.turn.total();
        self.commit_turn(total)
    }

    pub fn commit_turn(mut self, turn_total: i32) -> TurnOutcome {
        let snapshot = TurnSnapshot {
            ledger: self.ledger.clone(),
            current_player_index: self.current_player_index,
        };
        self.turn.reset();

        let current_index = self.current_player_index;
        let player_id = self.config.participants[current_index].clone();
        let target = self.config.target_score;
        let equal_innings = self.config.end_condition == EndCondition::EqualInnings;

        let raw = i64::from(self.ledger.score(&player_id)) + i64::from(turn_total);
        let mut new_score = u32::try_from(raw.max(0)).unwrap_or(u32::MAX);
        let reached_target = new_score >= target;

        if equal_innings && reached_target && !self.config.allow_overshoot {
            new_score = target;
        }

        self.ledger = std::mem::take(&mut self.ledger).with_score(&player_id, new_score);

        if !equal_innings {
            if reached_target {
                return TurnOutcome::Finished(FinishedGame {
                    config: self.config,
                    final_ledger: self.ledger,
                    winners: vec![player_id],
                    turn_history: self.history,
                    winner_awarded_final_turn: true,
                });
            }
        } else if reached_target {
            self.finished.insert(player_id);
            if self.playout == PlayoutState::NotStarted {
                self.playout = PlayoutState::InProgress {
                    start_index: current_index,
                };
            }
        }

        self.history.push(snapshot);

        match self.advance_from(current_index) {
            Advance::Next(next_index) => {
                self.current_player_index = next_index;
                TurnOutcome::Continue(self)
            }
            Advance::RoundComplete | Advance::AllFinished => {
                TurnOutcome::Finished(self.into_finished_game())
            }
        }
    }

    /// Rolls back the most recent committed turn. Returns false when there is
    /// nothing to undo.
    pub fn undo_last_turn(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };

        self.ledger = snapshot.ledger;
        self.current_player_index = snapshot.current_player_index;

        let target = self.config.target_score;
        let ledger = &self.ledger;
        self.finished.retain(|id| ledger.score(id) >= target);

        if let PlayoutState::InProgress { start_index } = self.playout {
            if ledger.score(&self.config.participants[start_index]) < target {
                self.playout = PlayoutState::NotStarted;
            }
        }

        self.turn.reset();
        true
    }

    fn advance_from(&self, index: usize) -> Advance {
        let count = self.config.participant_count();
        let start_index = match self.playout {
            PlayoutState::InProgress { start_index } => Some(start_index),
            PlayoutState::NotStarted => None,
        };

        if start_index.is_some() && self.finished.len() == count {
            return Advance::AllFinished;
        }

        for step in 1..=count {
            let candidate = (index + step) % count;
            if Some(candidate) == start_index {
                return Advance::RoundComplete;
            }
            if !self.finished.contains(&self.config.participants[candidate]) {
                return Advance::Next(candidate);
            }
        }

        Advance::Next(index)
    }

    fn into_finished_game(self) -> FinishedGame {
        let target = self.config.target_score;
        let winners = self
            .config
            .participants
            .iter()
            .filter(|id| self.ledger.score(id) >= target)
            .cloned()
            .collect();

        FinishedGame {
            config: self.config,
            final_ledger: self.ledger,
            winners,
            turn_history: self.history,
            winner_awarded_final_turn: false,
        }
    }
}

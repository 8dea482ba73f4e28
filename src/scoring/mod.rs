//! In-memory scoring of a single match: the live turn, the score ledger and
//! the session state machine that commits turns, decides when the game is
//! over and rolls turns back.

// Public API
pub use config::{
    ConfigError, EndCondition, GameConfiguration, Handicap, PlayMode, MAX_PARTICIPANTS,
    MIN_PARTICIPANTS,
};
pub use ledger::ScoreLedger;
pub use session::{FinishedGame, GameSession, PlayoutState, TurnOutcome, TurnSnapshot};
pub use snapshot::{SessionSnapshot, SnapshotError};
pub use turn::TurnAccumulator;

/// Opaque player identifier handed out by the roster
pub type PlayerId = String;

// Internal modules
mod config;
mod ledger;
mod session;
mod snapshot;
mod turn;

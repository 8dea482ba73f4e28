use serde::{Deserialize, Serialize};

use crate::handicap::HandicapOffer;
use crate::scoring::{EndCondition, Handicap, PlayMode, PlayerId, PlayoutState};
use crate::stats::GameRecord;

/// Request payload for starting a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartMatchRequest {
    pub game_type: String,
    pub play_mode: PlayMode,
    pub participants: Vec<PlayerId>,
    pub target_score: u32,
    pub end_condition: EndCondition,
    #[serde(default)]
    pub allow_overshoot: bool,
    /// A handicap the players accepted, usually taken from a handicap offer
    #[serde(default)]
    pub handicap: Option<Handicap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPointsRequest {
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub finished: bool,
}

/// Current state of a live match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    pub match_id: String,
    pub game_type: String,
    pub play_mode: PlayMode,
    pub end_condition: EndCondition,
    pub target_score: u32,
    pub participants: Vec<ParticipantView>,
    pub current_player: PlayerId,
    pub pending_points: i32,
    pub pending_actions: Vec<i32>,
    pub turns_committed: usize,
    pub playout: PlayoutState,
}

/// Final outcome of a match, returned by the turn that ended it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: String,
    pub game_type: String,
    pub winners: Vec<PlayerId>,
    pub records: Vec<GameRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnResponse {
    InProgress(MatchView),
    Finished(MatchResult),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandicapRequest {
    pub game_type: String,
    pub play_mode: PlayMode,
    pub participants: Vec<PlayerId>,
    pub target_score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandicapResponse {
    pub offer: Option<HandicapOffer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPlayerRequest {
    pub name: String,
}

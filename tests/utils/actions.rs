use cuescore::{
    matches::types::{MatchResult, MatchView, StartMatchRequest, TurnResponse},
    scoring::{EndCondition, Handicap, PlayMode},
};

use super::setup::TestSetup;

/// Outcome of one played turn, unwrapped for assertions
#[derive(Debug)]
pub enum TurnResult {
    InProgress(MatchView),
    Finished(MatchResult),
}

impl TurnResult {
    #[allow(dead_code)]
    pub fn view(self) -> MatchView {
        match self {
            TurnResult::InProgress(view) => view,
            TurnResult::Finished(result) => panic!("match already finished: {:?}", result),
        }
    }

    pub fn result(self) -> MatchResult {
        match self {
            TurnResult::Finished(result) => result,
            TurnResult::InProgress(view) => panic!("match still running: {:?}", view),
        }
    }
}

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Player id for a display name registered by the builder
    pub fn id(&self, name: &str) -> String {
        self.players
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("player {} was not registered", name))
    }

    pub fn ids(&self, names: &[&str]) -> Vec<String> {
        names.iter().map(|name| self.id(name)).collect()
    }

    /// Start a round-robin match between the named players
    pub async fn start(
        &self,
        game_type: &str,
        names: &[&str],
        target_score: u32,
        end_condition: EndCondition,
    ) -> MatchView {
        self.start_with(game_type, names, target_score, end_condition, None)
            .await
    }

    pub async fn start_with(
        &self,
        game_type: &str,
        names: &[&str],
        target_score: u32,
        end_condition: EndCondition,
        handicap: Option<Handicap>,
    ) -> MatchView {
        self.match_service
            .start_match(StartMatchRequest {
                game_type: game_type.to_string(),
                play_mode: PlayMode::RoundRobin,
                participants: self.ids(names),
                target_score,
                end_condition,
                allow_overshoot: false,
                handicap,
            })
            .await
            .unwrap()
    }

    /// Add the points as a single action and end the turn
    pub async fn play_turn(&self, match_id: &str, points: i32) -> TurnResult {
        self.match_service
            .add_points(match_id, points)
            .await
            .unwrap();
        match self.match_service.end_turn(match_id).await.unwrap() {
            TurnResponse::InProgress(view) => TurnResult::InProgress(view),
            TurnResponse::Finished(result) => TurnResult::Finished(result),
        }
    }

    /// Play turns in order until one finishes the match
    pub async fn play_turns(&self, match_id: &str, turns: &[i32]) -> TurnResult {
        let mut last = None;
        for &points in turns {
            let result = self.play_turn(match_id, points).await;
            if matches!(result, TurnResult::Finished(_)) {
                return result;
            }
            last = Some(result);
        }
        last.expect("at least one turn")
    }

    /// Play a whole sudden-death game of the given type
    #[allow(dead_code)]
    pub async fn play_game(
        &self,
        game_type: &str,
        names: &[&str],
        target_score: u32,
        turns: &[i32],
    ) -> MatchResult {
        let view = self
            .start(game_type, names, target_score, EndCondition::SuddenDeath)
            .await;
        self.play_turns(&view.match_id, turns).await.result()
    }
}

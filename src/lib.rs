// Library crate for the cue-sports scoring server
// This file exposes the public API for integration tests

pub mod config;
pub mod handicap;
pub mod matches;
pub mod roster;
pub mod scoring;
pub mod shared;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use matches::{InMemorySnapshotStore, MatchService, PersistenceSnapshot, SnapshotStore};
pub use roster::{InMemoryPlayerRoster, PlayerRoster};
pub use scoring::{GameConfiguration, GameSession, TurnOutcome};
pub use shared::{AppError, AppState};
pub use stats::{InMemoryStatsRepository, StatsService};

/// All HTTP routes, without middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/players", post(matches::register_player))
        .route("/matches", post(matches::start_match))
        .route("/matches/:match_id", get(matches::get_match))
        .route("/matches/:match_id/points", post(matches::add_points))
        .route(
            "/matches/:match_id/points/undo",
            post(matches::undo_last_action),
        )
        .route("/matches/:match_id/turn", post(matches::end_turn))
        .route("/matches/:match_id/turn/undo", post(matches::undo_last_turn))
        .route("/matches/:match_id/resume", post(matches::resume_match))
        .route("/handicap", post(matches::handicap_offer))
        .route("/stats/:game_type", get(stats::leaderboard))
        .route("/stats/:game_type/log", get(stats::game_log))
        .with_state(state)
}

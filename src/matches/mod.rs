// Public API - what other modules can use
pub use handlers::{
    add_points, end_turn, get_match, handicap_offer, register_player, resume_match, start_match,
    undo_last_action, undo_last_turn,
};
pub use service::MatchService;
pub use snapshot::{InMemorySnapshotStore, PersistenceSnapshot, SnapshotStore};

// Internal modules
mod handlers;
pub mod repository;
mod service;
mod snapshot;
pub mod types;

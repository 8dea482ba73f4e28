pub mod aggregator;
mod handlers;
pub mod leaderboard;
pub mod service;

mod errors;
pub mod models;
pub mod repository;

pub use errors::StatsError;
pub use handlers::{game_log, leaderboard, LeaderboardQuery};
pub use leaderboard::{LeaderboardEntry, LeaderboardSort};
pub use models::*;
pub use repository::{InMemoryStatsRepository, StatsRepository};
pub use service::{StatsService, DEFAULT_RECENT_GAMES};

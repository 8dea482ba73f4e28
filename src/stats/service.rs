use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    handicap::{self, HandicapOffer, PlayerAverage},
    scoring::{FinishedGame, PlayMode, PlayerId},
};

use super::{
    leaderboard, repository::StatsRepository, GameRecord, LeaderboardEntry, LeaderboardSort,
    StatsError, StatsSnapshot,
};

/// Number of recent games of a type that feed a player's average
pub const DEFAULT_RECENT_GAMES: usize = 10;

pub struct StatsService {
    repository: Arc<dyn StatsRepository>,
    recent_games: usize,
}

impl StatsService {
    pub fn new(repository: Arc<dyn StatsRepository>) -> Self {
        Self {
            repository,
            recent_games: DEFAULT_RECENT_GAMES,
        }
    }

    pub fn with_recent_games(mut self, recent_games: usize) -> Self {
        self.recent_games = recent_games.max(1);
        self
    }

    /// Records the outcome of a finished game for every participant
    #[instrument(skip(self, game), fields(game_type = %game.config.game_type))]
    pub async fn record_finished_game(
        &self,
        game: &FinishedGame,
    ) -> Result<Vec<GameRecord>, StatsError> {
        let records = self
            .repository
            .record_game(game, chrono::Utc::now())
            .await?;

        info!(
            winners = ?game.winners,
            participants = game.config.participants.len(),
            "Game recorded in statistics"
        );

        Ok(records)
    }

    pub async fn leaderboard(
        &self,
        game_type: &str,
        sort: LeaderboardSort,
    ) -> Result<Vec<LeaderboardEntry>, StatsError> {
        let stats = self.repository.stats_for_game_type(game_type).await?;
        Ok(leaderboard::rank(&stats, sort))
    }

    pub async fn game_log(&self, game_type: &str) -> Result<Vec<GameRecord>, StatsError> {
        self.repository.game_log(game_type).await
    }

    pub async fn player_average(
        &self,
        game_type: &str,
        player_id: &str,
    ) -> Result<PlayerAverage, StatsError> {
        let average = self
            .repository
            .recent_average(game_type, player_id, self.recent_games)
            .await?;
        Ok(PlayerAverage::new(player_id, average))
    }

    /// Offers a head start to the weaker of two players. Only one-on-one
    /// round-robin games get offers.
    #[instrument(skip(self))]
    pub async fn handicap_offer(
        &self,
        game_type: &str,
        play_mode: PlayMode,
        participants: &[PlayerId],
        target_score: u32,
    ) -> Result<Option<HandicapOffer>, StatsError> {
        let [first, second] = participants else {
            debug!("Handicap only applies to two participants");
            return Ok(None);
        };
        if play_mode != PlayMode::RoundRobin {
            debug!("Handicap does not apply to team play");
            return Ok(None);
        }

        let first = self.player_average(game_type, first).await?;
        let second = self.player_average(game_type, second).await?;
        let offer = handicap::compute_offer(&first, &second, target_score);

        debug!(
            first_average = first.average,
            second_average = second.average,
            offer = ?offer,
            "Handicap computed"
        );

        Ok(offer)
    }

    pub async fn snapshot(&self) -> Result<StatsSnapshot, StatsError> {
        self.repository.snapshot().await
    }

    pub async fn restore(&self, snapshot: StatsSnapshot) -> Result<(), StatsError> {
        self.repository.restore(snapshot).await
    }

    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), StatsError> {
        self.repository.reset().await?;
        info!("Statistics reset");
        Ok(())
    }
}

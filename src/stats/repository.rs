use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::scoring::FinishedGame;

use super::{
    aggregator, GameRecord, PlayerGameTypeStats, StatsError, StatsSnapshot, StatsStore,
};

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn record_game(
        &self,
        game: &FinishedGame,
        recorded_at: DateTime<Utc>,
    ) -> Result<Vec<GameRecord>, StatsError>;
    async fn stats_for_game_type(
        &self,
        game_type: &str,
    ) -> Result<Vec<PlayerGameTypeStats>, StatsError>;
    async fn game_log(&self, game_type: &str) -> Result<Vec<GameRecord>, StatsError>;
    async fn recent_average(
        &self,
        game_type: &str,
        player_id: &str,
        window: usize,
    ) -> Result<f64, StatsError>;
    async fn snapshot(&self) -> Result<StatsSnapshot, StatsError>;
    async fn restore(&self, snapshot: StatsSnapshot) -> Result<(), StatsError>;
    async fn reset(&self) -> Result<(), StatsError>;
}

/// Statistics held in memory. Every write goes through one lock, so finishing
/// two matches at once never interleaves their read-modify-write.
#[derive(Debug, Default)]
pub struct InMemoryStatsRepository {
    store: Arc<RwLock<StatsStore>>,
}

impl InMemoryStatsRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StatsStore::default())),
        }
    }

    pub fn with_snapshot(snapshot: StatsSnapshot) -> Self {
        Self {
            store: Arc::new(RwLock::new(StatsStore::from(snapshot))),
        }
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    #[instrument(skip(self, game), fields(game_type = %game.config.game_type))]
    async fn record_game(
        &self,
        game: &FinishedGame,
        recorded_at: DateTime<Utc>,
    ) -> Result<Vec<GameRecord>, StatsError> {
        let mut store = self.store.write().await;
        let records = aggregator::finalize(&mut store, game, recorded_at)?;
        debug!(
            records = records.len(),
            log_size = store.game_log.len(),
            "Game folded into statistics"
        );
        Ok(records)
    }

    async fn stats_for_game_type(
        &self,
        game_type: &str,
    ) -> Result<Vec<PlayerGameTypeStats>, StatsError> {
        let store = self.store.read().await;
        Ok(store.for_game_type(game_type).cloned().collect())
    }

    async fn game_log(&self, game_type: &str) -> Result<Vec<GameRecord>, StatsError> {
        let store = self.store.read().await;
        Ok(store
            .game_log
            .iter()
            .filter(|record| record.game_type == game_type)
            .cloned()
            .collect())
    }

    async fn recent_average(
        &self,
        game_type: &str,
        player_id: &str,
        window: usize,
    ) -> Result<f64, StatsError> {
        let store = self.store.read().await;
        Ok(store.recent_average(game_type, player_id, window))
    }

    async fn snapshot(&self) -> Result<StatsSnapshot, StatsError> {
        let store = self.store.read().await;
        Ok(StatsSnapshot::from(&*store))
    }

    async fn restore(&self, snapshot: StatsSnapshot) -> Result<(), StatsError> {
        let mut store = self.store.write().await;
        *store = StatsStore::from(snapshot);
        Ok(())
    }

    async fn reset(&self) -> Result<(), StatsError> {
        let mut store = self.store.write().await;
        *store = StatsStore::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{EndCondition, GameConfiguration, GameSession, PlayMode, TurnOutcome};

    fn sample_game(game_type: &str, winner_first: bool) -> FinishedGame {
        let config = GameConfiguration::new(
            game_type,
            PlayMode::RoundRobin,
            vec!["player-1".to_string(), "player-2".to_string()],
            10,
            EndCondition::SuddenDeath,
            false,
        )
        .unwrap();
        let mut session = GameSession::start(config).unwrap();
        let turns: &[i32] = if winner_first { &[10] } else { &[3, 12] };
        for points in turns {
            session = match session.commit_turn(*points) {
                TurnOutcome::Continue(next) => next,
                TurnOutcome::Finished(game) => return game,
            };
        }
        panic!("sample game did not finish");
    }

    #[tokio::test]
    async fn records_game_and_updates_stats() {
        let repo = InMemoryStatsRepository::new();

        repo.record_game(&sample_game("nine-ball", true), Utc::now())
            .await
            .unwrap();

        let stats = repo.stats_for_game_type("nine-ball").await.unwrap();
        assert_eq!(stats.len(), 2);

        let winner = stats.iter().find(|s| s.player_id == "player-1").unwrap();
        assert_eq!(winner.wins, 1);
        assert_eq!(winner.total_score, 10);
        assert_eq!(winner.total_turns, 1);

        let loser = stats.iter().find(|s| s.player_id == "player-2").unwrap();
        assert_eq!(loser.losses, 1);
        assert_eq!(loser.total_turns, 0);
    }

    #[tokio::test]
    async fn keeps_game_types_apart() {
        let repo = InMemoryStatsRepository::new();
        repo.record_game(&sample_game("nine-ball", true), Utc::now())
            .await
            .unwrap();
        repo.record_game(&sample_game("eight-ball", false), Utc::now())
            .await
            .unwrap();

        let nine_ball = repo.stats_for_game_type("nine-ball").await.unwrap();
        assert!(nine_ball.iter().all(|s| s.games_played == 1));
        assert_eq!(repo.game_log("eight-ball").await.unwrap().len(), 2);
        assert!(repo.game_log("one-pocket").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn recent_average_reads_the_log() {
        let repo = InMemoryStatsRepository::new();
        repo.record_game(&sample_game("nine-ball", false), Utc::now())
            .await
            .unwrap();

        let average = repo
            .recent_average("nine-ball", "player-2", 10)
            .await
            .unwrap();
        assert_eq!(average, 12.0);
        let average = repo
            .recent_average("nine-ball", "player-1", 10)
            .await
            .unwrap();
        assert_eq!(average, 3.0);
    }

    #[tokio::test]
    async fn snapshot_restores_into_a_fresh_repository() {
        let repo = InMemoryStatsRepository::new();
        repo.record_game(&sample_game("nine-ball", true), Utc::now())
            .await
            .unwrap();
        let snapshot = repo.snapshot().await.unwrap();

        let restored = InMemoryStatsRepository::new();
        restored.restore(snapshot.clone()).await.unwrap();

        assert_eq!(restored.snapshot().await.unwrap(), snapshot);
        assert_eq!(
            InMemoryStatsRepository::with_snapshot(snapshot.clone())
                .snapshot()
                .await
                .unwrap(),
            snapshot
        );
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let repo = InMemoryStatsRepository::new();
        repo.record_game(&sample_game("nine-ball", true), Utc::now())
            .await
            .unwrap();

        repo.reset().await.unwrap();

        assert_eq!(repo.snapshot().await.unwrap(), StatsSnapshot::default());
    }
}

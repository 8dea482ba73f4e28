use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::scoring::SessionSnapshot;
use crate::shared::AppError;
use crate::stats::StatsSnapshot;

/// Everything needed to bring the service back after a restart: one entry per
/// live match and the single process-wide statistics store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceSnapshot {
    pub sessions: BTreeMap<String, SessionSnapshot>,
    pub stats: StatsSnapshot,
}

/// Key-value store for persisted state. Sessions are keyed by match id and
/// only exist while the match is live; statistics live under one key.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save_session(&self, match_id: &str, session: SessionSnapshot)
        -> Result<(), AppError>;
    async fn load_session(&self, match_id: &str) -> Result<Option<SessionSnapshot>, AppError>;
    async fn remove_session(&self, match_id: &str) -> Result<bool, AppError>;
    async fn save_stats(&self, stats: StatsSnapshot) -> Result<(), AppError>;
    async fn load_stats(&self) -> Result<Option<StatsSnapshot>, AppError>;

    /// The whole store, as read on startup
    async fn load_all(&self) -> Result<PersistenceSnapshot, AppError>;
}

/// Keeps the latest snapshots in memory
#[derive(Default)]
pub struct InMemorySnapshotStore {
    sessions: Arc<RwLock<BTreeMap<String, SessionSnapshot>>>,
    stats: Arc<RwLock<Option<StatsSnapshot>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    #[instrument(skip(self, session))]
    async fn save_session(
        &self,
        match_id: &str,
        session: SessionSnapshot,
    ) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(match_id.to_string(), session);
        debug!(match_id = %match_id, "Session snapshot saved");
        Ok(())
    }

    async fn load_session(&self, match_id: &str) -> Result<Option<SessionSnapshot>, AppError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(match_id).cloned())
    }

    async fn remove_session(&self, match_id: &str) -> Result<bool, AppError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(match_id).is_some())
    }

    #[instrument(skip(self, stats))]
    async fn save_stats(&self, stats: StatsSnapshot) -> Result<(), AppError> {
        let log_size = stats.game_log.len();
        *self.stats.write().await = Some(stats);
        debug!(log_size, "Statistics snapshot saved");
        Ok(())
    }

    async fn load_stats(&self) -> Result<Option<StatsSnapshot>, AppError> {
        Ok(self.stats.read().await.clone())
    }

    async fn load_all(&self) -> Result<PersistenceSnapshot, AppError> {
        Ok(PersistenceSnapshot {
            sessions: self.sessions.read().await.clone(),
            stats: self.stats.read().await.clone().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{EndCondition, GameConfiguration, GameSession, PlayMode};
    use crate::stats::PlayerGameTypeStats;

    fn session_snapshot() -> SessionSnapshot {
        let config = GameConfiguration::new(
            "nine-ball",
            PlayMode::RoundRobin,
            vec!["alice".to_string(), "bob".to_string()],
            9,
            EndCondition::SuddenDeath,
            false,
        )
        .unwrap();
        GameSession::start(config).unwrap().snapshot()
    }

    #[tokio::test]
    async fn keeps_only_the_latest_session_per_match() {
        let store = InMemorySnapshotStore::new();
        let first = session_snapshot();
        let mut second = first.clone();
        second.current_player_index = 1;

        store.save_session("blue-heron", first).await.unwrap();
        store.save_session("blue-heron", second.clone()).await.unwrap();

        assert_eq!(store.session_count().await, 1);
        assert_eq!(store.load_session("blue-heron").await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn remove_reports_whether_anything_was_stored() {
        let store = InMemorySnapshotStore::new();
        store
            .save_session("green-fox", session_snapshot())
            .await
            .unwrap();

        assert!(store.remove_session("green-fox").await.unwrap());
        assert!(!store.remove_session("green-fox").await.unwrap());
        assert_eq!(store.load_session("green-fox").await.unwrap(), None);
    }

    #[tokio::test]
    async fn statistics_are_stored_once_for_all_matches() {
        let store = InMemorySnapshotStore::new();
        assert_eq!(store.load_stats().await.unwrap(), None);

        let mut stats = StatsSnapshot::default();
        stats
            .stats
            .push(PlayerGameTypeStats::new("nine-ball", "alice"));
        store.save_session("blue-heron", session_snapshot()).await.unwrap();
        store.save_session("green-fox", session_snapshot()).await.unwrap();
        store.save_stats(stats.clone()).await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all.stats, stats);
        assert_eq!(
            all.sessions.keys().cloned().collect::<Vec<_>>(),
            vec!["blue-heron".to_string(), "green-fox".to_string()]
        );
    }
}

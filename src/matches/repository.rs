use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, RwLock};

use crate::scoring::GameSession;

/// Live sessions, one per match id
pub struct MatchRepository {
    /// A mapping from match ID to its session
    matches: Arc<RwLock<HashMap<String, GameSession>>>,
    match_locks: Arc<RwLock<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl Default for MatchRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchRepository {
    pub fn new() -> Self {
        Self {
            matches: Arc::new(RwLock::new(HashMap::new())),
            match_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Inserts the session unless the id is taken. Returns false on collision.
    pub async fn insert_new(&self, match_id: &str, session: GameSession) -> bool {
        let mut matches = self.matches.write().await;
        if matches.contains_key(match_id) {
            return false;
        }
        matches.insert(match_id.to_string(), session);
        true
    }

    pub async fn update(&self, match_id: &str, session: GameSession) {
        let mut matches = self.matches.write().await;
        matches.insert(match_id.to_string(), session);
    }

    pub async fn get(&self, match_id: &str) -> Option<GameSession> {
        let matches = self.matches.read().await;
        matches.get(match_id).cloned()
    }

    pub async fn contains(&self, match_id: &str) -> bool {
        self.matches.read().await.contains_key(match_id)
    }

    pub async fn take(&self, match_id: &str) -> Option<GameSession> {
        let mut matches = self.matches.write().await;
        matches.remove(match_id)
    }

    pub async fn match_ids(&self) -> Vec<String> {
        let matches = self.matches.read().await;
        let mut ids: Vec<String> = matches.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Per-match lock so operations on one match apply one at a time.
    /// Only live matches get a lock.
    pub async fn lock(&self, match_id: &str) -> Option<Arc<AsyncMutex<()>>> {
        {
            let guard = self.match_locks.read().await;
            if let Some(lock) = guard.get(match_id) {
                return Some(lock.clone());
            }
        }

        let matches = self.matches.read().await;
        if !matches.contains_key(match_id) {
            return None;
        }
        Some(self.claim_lock(match_id).await)
    }

    /// Lock for a match that is about to be brought back. The caller clears
    /// it again if the match does not become live.
    pub async fn claim_lock(&self, match_id: &str) -> Arc<AsyncMutex<()>> {
        let mut guard = self.match_locks.write().await;
        guard
            .entry(match_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    pub async fn lock_count(&self) -> usize {
        self.match_locks.read().await.len()
    }

    pub async fn clear_lock(&self, match_id: &str) {
        let mut guard = self.match_locks.write().await;
        guard.remove(match_id);
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::scoring::PlayerId;

/// A roster entry as the rest of the app sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: PlayerId,
    pub name: String,
}

/// Lookup of player ids to display names.
///
/// Player identity lives outside the scoring core; matches only ever hold the
/// ids this roster hands out.
#[async_trait]
pub trait PlayerRoster: Send + Sync {
    /// Register a new player under an id
    async fn register_player(&self, id: PlayerId, name: String) -> Result<(), RosterError>;

    async fn display_name(&self, id: &str) -> Option<String>;

    async fn contains(&self, id: &str) -> bool {
        self.display_name(id).await.is_some()
    }

    async fn remove_player(&self, id: &str) -> bool;

    async fn all_players(&self) -> Vec<RosterPlayer>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RosterError {
    #[error("Player {id} is already registered as {existing_name}")]
    AlreadyRegistered { id: PlayerId, existing_name: String },

    #[error("Invalid player id: {id}")]
    InvalidId { id: PlayerId },

    #[error("Player name cannot be empty")]
    EmptyName,
}

/// In-memory roster for development and tests
pub struct InMemoryPlayerRoster {
    players: Arc<RwLock<HashMap<PlayerId, String>>>,
}

impl InMemoryPlayerRoster {
    pub fn new() -> Self {
        Self {
            players: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn generate_id() -> PlayerId {
        Uuid::new_v4().to_string()
    }

    fn validate_id(id: &str) -> Result<(), RosterError> {
        Uuid::parse_str(id).map_err(|_| RosterError::InvalidId { id: id.to_string() })?;
        Ok(())
    }
}

impl Default for InMemoryPlayerRoster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerRoster for InMemoryPlayerRoster {
    async fn register_player(&self, id: PlayerId, name: String) -> Result<(), RosterError> {
        Self::validate_id(&id)?;
        if name.trim().is_empty() {
            return Err(RosterError::EmptyName);
        }

        let mut players = self.players.write().await;

        if let Some(existing_name) = players.get(&id) {
            return Err(RosterError::AlreadyRegistered {
                id,
                existing_name: existing_name.clone(),
            });
        }

        players.insert(id.clone(), name.clone());

        info!(player_id = %id, name = %name, "Registered player");

        Ok(())
    }

    async fn display_name(&self, id: &str) -> Option<String> {
        let players = self.players.read().await;
        let result = players.get(id).cloned();

        debug!(player_id = %id, name = ?result, "Roster lookup");

        result
    }

    async fn remove_player(&self, id: &str) -> bool {
        let mut players = self.players.write().await;

        if let Some(name) = players.remove(id) {
            info!(player_id = %id, name = %name, "Removed player");
            true
        } else {
            warn!(player_id = %id, "Attempted to remove unknown player");
            false
        }
    }

    async fn all_players(&self) -> Vec<RosterPlayer> {
        let players = self.players.read().await;
        let mut all: Vec<RosterPlayer> = players
            .iter()
            .map(|(id, name)| RosterPlayer {
                id: id.clone(),
                name: name.clone(),
            })
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        all
    }
}

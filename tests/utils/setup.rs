use std::collections::HashMap;
use std::sync::Arc;

use cuescore::{
    roster::PlayerRoster, InMemoryPlayerRoster, InMemorySnapshotStore, InMemoryStatsRepository,
    MatchService, StatsService,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub roster: Arc<InMemoryPlayerRoster>,
    pub stats_service: Arc<StatsService>,
    pub snapshots: Arc<InMemorySnapshotStore>,
    pub match_service: Arc<MatchService>,
    /// Display name to generated player id
    pub players: HashMap<String, String>,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    recent_games: Option<usize>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            recent_games: None,
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "carol"])
    }

    #[allow(dead_code)]
    pub fn with_recent_games(mut self, recent_games: usize) -> Self {
        self.recent_games = Some(recent_games);
        self
    }

    pub async fn build(self) -> TestSetup {
        let roster = Arc::new(InMemoryPlayerRoster::new());
        let mut stats = StatsService::new(Arc::new(InMemoryStatsRepository::new()));
        if let Some(recent_games) = self.recent_games {
            stats = stats.with_recent_games(recent_games);
        }
        let stats_service = Arc::new(stats);
        let snapshots = Arc::new(InMemorySnapshotStore::new());
        let match_service = Arc::new(MatchService::new(
            roster.clone(),
            stats_service.clone(),
            snapshots.clone(),
        ));

        // Register players
        let mut players = HashMap::new();
        for name in self.players {
            let id = InMemoryPlayerRoster::generate_id();
            roster.register_player(id.clone(), name.clone()).await.unwrap();
            players.insert(name, id);
        }

        TestSetup {
            roster,
            stats_service,
            snapshots,
            match_service,
            players,
        }
    }
}

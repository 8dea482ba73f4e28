use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};

use super::{
    repository::MatchRepository,
    snapshot::SnapshotStore,
    types::{MatchResult, MatchView, ParticipantView, StartMatchRequest, TurnResponse},
};
use crate::{
    roster::PlayerRoster,
    scoring::{GameConfiguration, GameSession, TurnOutcome},
    shared::AppError,
    stats::StatsService,
};

const MAX_ID_ATTEMPTS: usize = 8;

/// Drives live matches: checks caller input before it reaches the scoring
/// core, keeps one session per match, and hands finished games to statistics
pub struct MatchService {
    matches: MatchRepository,
    roster: Arc<dyn PlayerRoster>,
    stats: Arc<StatsService>,
    snapshots: Arc<dyn SnapshotStore>,
    /// Finished games are recorded and saved one at a time so the stored
    /// statistics are never older than the live ones
    stats_writes: AsyncMutex<()>,
}

impl MatchService {
    pub fn new(
        roster: Arc<dyn PlayerRoster>,
        stats: Arc<StatsService>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            matches: MatchRepository::new(),
            roster,
            stats,
            snapshots,
            stats_writes: AsyncMutex::new(()),
        }
    }

    /// Reload statistics and every live match from the snapshot store.
    /// Returns the ids of the matches brought back.
    #[instrument(skip(self))]
    pub async fn recover(&self) -> Result<Vec<String>, AppError> {
        let stored = self.snapshots.load_all().await?;
        self.stats.restore(stored.stats).await?;

        let mut resumed = Vec::with_capacity(stored.sessions.len());
        for (match_id, snapshot) in stored.sessions {
            match GameSession::restore(snapshot) {
                Ok(session) => {
                    self.matches.update(&match_id, session).await;
                    resumed.push(match_id);
                }
                Err(err) => {
                    warn!(match_id = %match_id, error = %err, "Skipping unreadable session");
                }
            }
        }

        info!(matches = resumed.len(), "Recovered from snapshot store");

        Ok(resumed)
    }

    /// Start a new match for registered players
    #[instrument(skip(self, request), fields(game_type = %request.game_type))]
    pub async fn start_match(&self, request: StartMatchRequest) -> Result<MatchView, AppError> {
        for player_id in &request.participants {
            if !self.roster.contains(player_id).await {
                warn!(player_id = %player_id, "Unknown participant");
                return Err(AppError::BadRequest(format!(
                    "Player not found in roster: {}",
                    player_id
                )));
            }
        }

        let mut config = GameConfiguration::new(
            request.game_type,
            request.play_mode,
            request.participants,
            request.target_score,
            request.end_condition,
            request.allow_overshoot,
        )?;
        if let Some(handicap) = request.handicap {
            if !config.supports_handicap() {
                return Err(AppError::BadRequest(
                    "Handicaps only apply to two-player round-robin matches".to_string(),
                ));
            }
            config = config.with_handicap(handicap)?;
        }

        let session = GameSession::start(config)?;
        let match_id = self.insert_with_fresh_id(session.clone()).await?;

        self.save_session(&match_id, &session).await?;

        info!(
            match_id = %match_id,
            participants = session.config().participant_count(),
            play_mode = session.config().play_mode.as_ref(),
            target_score = session.config().target_score,
            end_condition = session.config().end_condition.as_ref(),
            "Match started"
        );

        self.view(&match_id, &session).await
    }

    pub async fn get_match(&self, match_id: &str) -> Result<MatchView, AppError> {
        let session = self.live_session(match_id).await?;
        self.view(match_id, &session).await
    }

    pub async fn list_matches(&self) -> Vec<String> {
        self.matches.match_ids().await
    }

    /// Add points to the live turn of the current player
    #[instrument(skip(self))]
    pub async fn add_points(&self, match_id: &str, points: i32) -> Result<MatchView, AppError> {
        let _guard = self.lock_live(match_id).await?;

        let mut session = self.live_session(match_id).await?;
        session.add_points(points);
        self.matches.update(match_id, session.clone()).await;

        debug!(
            match_id = %match_id,
            player = %session.current_player(),
            pending = session.pending_points(),
            "Points added"
        );

        self.view(match_id, &session).await
    }

    /// Take back the last point addition of the live turn
    #[instrument(skip(self))]
    pub async fn undo_last_action(&self, match_id: &str) -> Result<MatchView, AppError> {
        let _guard = self.lock_live(match_id).await?;

        let mut session = self.live_session(match_id).await?;
        let undone = session.undo_last_action();
        self.matches.update(match_id, session.clone()).await;

        debug!(match_id = %match_id, undone = ?undone, "Point action undone");

        self.view(match_id, &session).await
    }

    /// Commit the live turn. Ends the match when the turn decides it.
    ///
    /// A finished match stays live until its statistics are recorded, so a
    /// failed write leaves the turn ready to be committed again.
    #[instrument(skip(self))]
    pub async fn end_turn(&self, match_id: &str) -> Result<TurnResponse, AppError> {
        let _guard = self.lock_live(match_id).await?;

        let session = self.live_session(match_id).await?;
        let player_id = session.current_player().to_string();
        let points = session.pending_points();

        match session.end_turn() {
            TurnOutcome::Continue(next) => {
                self.matches.update(match_id, next.clone()).await;
                self.save_session(match_id, &next).await?;

                info!(
                    match_id = %match_id,
                    player = %player_id,
                    points,
                    next_player = %next.current_player(),
                    "Turn committed"
                );

                Ok(TurnResponse::InProgress(self.view(match_id, &next).await?))
            }
            TurnOutcome::Finished(game) => {
                let stats_guard = self.stats_writes.lock().await;
                let records = self.stats.record_finished_game(&game).await?;

                self.matches.take(match_id).await;
                self.matches.clear_lock(match_id).await;

                self.save_stats(stats_guard).await?;
                self.snapshots.remove_session(match_id).await?;

                info!(
                    match_id = %match_id,
                    player = %player_id,
                    points,
                    winners = ?game.winners,
                    "Match finished"
                );

                Ok(TurnResponse::Finished(MatchResult {
                    match_id: match_id.to_string(),
                    game_type: game.config.game_type,
                    winners: game.winners,
                    records,
                }))
            }
        }
    }

    /// Roll back the last committed turn. Without history this changes
    /// nothing.
    #[instrument(skip(self))]
    pub async fn undo_last_turn(&self, match_id: &str) -> Result<MatchView, AppError> {
        let _guard = self.lock_live(match_id).await?;

        let mut session = self.live_session(match_id).await?;
        if session.undo_last_turn() {
            self.matches.update(match_id, session.clone()).await;
            self.save_session(match_id, &session).await?;
            info!(
                match_id = %match_id,
                player = %session.current_player(),
                "Turn undone"
            );
        } else {
            debug!(match_id = %match_id, "No committed turn to undo");
        }

        self.view(match_id, &session).await
    }

    /// Bring a match back from its last persisted snapshot
    #[instrument(skip(self))]
    pub async fn resume_match(&self, match_id: &str) -> Result<MatchView, AppError> {
        let lock = self.matches.claim_lock(match_id).await;
        let guard = lock.lock().await;

        let resumed = self.resume_locked(match_id).await;
        if resumed.is_err() && !self.matches.contains(match_id).await {
            drop(guard);
            self.matches.clear_lock(match_id).await;
        }
        resumed
    }

    async fn resume_locked(&self, match_id: &str) -> Result<MatchView, AppError> {
        if self.matches.contains(match_id).await {
            return Err(AppError::Conflict(format!(
                "Match is already live: {}",
                match_id
            )));
        }

        let snapshot = self
            .snapshots
            .load_session(match_id)
            .await?
            .ok_or_else(|| not_found(match_id))?;
        let session = GameSession::restore(snapshot)?;
        self.matches.update(match_id, session.clone()).await;

        info!(match_id = %match_id, "Match resumed from snapshot");

        self.view(match_id, &session).await
    }

    /// Holds the match's lock, or reports the match as missing without
    /// leaving a lock behind
    async fn lock_live(&self, match_id: &str) -> Result<OwnedMutexGuard<()>, AppError> {
        let lock = self
            .matches
            .lock(match_id)
            .await
            .ok_or_else(|| not_found(match_id))?;
        Ok(lock.lock_owned().await)
    }

    async fn live_session(&self, match_id: &str) -> Result<GameSession, AppError> {
        self.matches
            .get(match_id)
            .await
            .ok_or_else(|| not_found(match_id))
    }

    async fn insert_with_fresh_id(&self, session: GameSession) -> Result<String, AppError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let match_id = petname::Petnames::default().generate_one(2, "-");
            if self.matches.insert_new(&match_id, session.clone()).await {
                return Ok(match_id);
            }
            debug!(match_id = %match_id, "Match id collision, retrying");
        }
        Err(AppError::Internal)
    }

    async fn save_session(&self, match_id: &str, session: &GameSession) -> Result<(), AppError> {
        self.snapshots
            .save_session(match_id, session.snapshot())
            .await
    }

    /// Takes the stats write guard so the saved copy matches the store
    async fn save_stats(&self, _guard: MutexGuard<'_, ()>) -> Result<(), AppError> {
        let stats = self.stats.snapshot().await?;
        self.snapshots.save_stats(stats).await
    }

    async fn view(&self, match_id: &str, session: &GameSession) -> Result<MatchView, AppError> {
        let config = session.config();
        let mut participants = Vec::with_capacity(config.participant_count());
        for id in &config.participants {
            let name = self
                .roster
                .display_name(id)
                .await
                .unwrap_or_else(|| id.clone());
            participants.push(ParticipantView {
                id: id.clone(),
                name,
                score: session.ledger().score(id),
                finished: session.finished_players().contains(id),
            });
        }

        Ok(MatchView {
            match_id: match_id.to_string(),
            game_type: config.game_type.clone(),
            play_mode: config.play_mode,
            end_condition: config.end_condition,
            target_score: config.target_score,
            participants,
            current_player: session.current_player().to_string(),
            pending_points: session.pending_points(),
            pending_actions: session.turn().actions().to_vec(),
            turns_committed: session.history().len(),
            playout: session.playout(),
        })
    }
}

fn not_found(match_id: &str) -> AppError {
    AppError::NotFound(format!("Match not found: {}", match_id))
}

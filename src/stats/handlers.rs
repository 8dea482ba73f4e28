use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, instrument};

use super::{GameRecord, LeaderboardEntry, LeaderboardSort};
use crate::shared::{AppError, AppState};

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub sort: LeaderboardSort,
}

/// GET /stats/:game_type?sort=wins|win_rate|avg_score
#[instrument(name = "leaderboard", skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(game_type): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let entries = state
        .stats_service
        .leaderboard(&game_type, query.sort)
        .await?;

    info!(
        game_type = %game_type,
        sort = query.sort.as_ref(),
        entry_count = entries.len(),
        "Leaderboard listed"
    );

    Ok(Json(entries))
}

/// GET /stats/:game_type/log
#[instrument(name = "game_log", skip(state))]
pub async fn game_log(
    State(state): State<AppState>,
    Path(game_type): Path<String>,
) -> Result<Json<Vec<GameRecord>>, AppError> {
    Ok(Json(state.stats_service.game_log(&game_type).await?))
}

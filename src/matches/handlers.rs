use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{
    AddPointsRequest, HandicapRequest, HandicapResponse, MatchView, RegisterPlayerRequest,
    StartMatchRequest, TurnResponse,
};
use crate::roster::{InMemoryPlayerRoster, RosterPlayer};
use crate::shared::{AppError, AppState};

/// POST /players
///
/// Registers a display name under a freshly generated player id
#[instrument(name = "register_player", skip(state))]
pub async fn register_player(
    State(state): State<AppState>,
    Json(request): Json<RegisterPlayerRequest>,
) -> Result<Json<RosterPlayer>, AppError> {
    let id = InMemoryPlayerRoster::generate_id();
    state
        .roster
        .register_player(id.clone(), request.name.clone())
        .await?;

    info!(player_id = %id, name = %request.name, "Player registered");

    Ok(Json(RosterPlayer {
        id,
        name: request.name,
    }))
}

/// POST /matches
#[instrument(name = "start_match", skip(state, request))]
pub async fn start_match(
    State(state): State<AppState>,
    Json(request): Json<StartMatchRequest>,
) -> Result<Json<MatchView>, AppError> {
    info!(
        game_type = %request.game_type,
        participants = request.participants.len(),
        "Starting match"
    );

    let view = state.match_service.start_match(request).await?;

    Ok(Json(view))
}

/// GET /matches/:match_id
#[instrument(name = "get_match", skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchView>, AppError> {
    Ok(Json(state.match_service.get_match(&match_id).await?))
}

/// POST /matches/:match_id/points
#[instrument(name = "add_points", skip(state))]
pub async fn add_points(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<AddPointsRequest>,
) -> Result<Json<MatchView>, AppError> {
    let view = state
        .match_service
        .add_points(&match_id, request.points)
        .await?;
    Ok(Json(view))
}

/// POST /matches/:match_id/points/undo
#[instrument(name = "undo_last_action", skip(state))]
pub async fn undo_last_action(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchView>, AppError> {
    Ok(Json(state.match_service.undo_last_action(&match_id).await?))
}

/// POST /matches/:match_id/turn
///
/// Commits the live turn. The response carries the final result when this
/// turn ended the match.
#[instrument(name = "end_turn", skip(state))]
pub async fn end_turn(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<TurnResponse>, AppError> {
    let response = state.match_service.end_turn(&match_id).await?;

    if let TurnResponse::Finished(result) = &response {
        info!(match_id = %match_id, winners = ?result.winners, "Match over");
    }

    Ok(Json(response))
}

/// POST /matches/:match_id/turn/undo
#[instrument(name = "undo_last_turn", skip(state))]
pub async fn undo_last_turn(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchView>, AppError> {
    Ok(Json(state.match_service.undo_last_turn(&match_id).await?))
}

/// POST /matches/:match_id/resume
#[instrument(name = "resume_match", skip(state))]
pub async fn resume_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchView>, AppError> {
    Ok(Json(state.match_service.resume_match(&match_id).await?))
}

/// POST /handicap
#[instrument(name = "handicap_offer", skip(state, request))]
pub async fn handicap_offer(
    State(state): State<AppState>,
    Json(request): Json<HandicapRequest>,
) -> Result<Json<HandicapResponse>, AppError> {
    for player_id in &request.participants {
        if !state.roster.contains(player_id).await {
            return Err(AppError::BadRequest(format!(
                "Player not found in roster: {}",
                player_id
            )));
        }
    }

    let offer = state
        .stats_service
        .handicap_offer(
            &request.game_type,
            request.play_mode,
            &request.participants,
            request.target_score,
        )
        .await?;

    info!(game_type = %request.game_type, offer = ?offer, "Handicap requested");

    Ok(Json(HandicapResponse { offer }))
}

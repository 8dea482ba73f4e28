use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::scoring::{FinishedGame, PlayerId};

use super::{GameOutcome, GameRecord, StatsError, StatsStore};

/// Turns taken by each participant, rebuilt from who was up before every
/// committed turn. The sudden-death winner's game-ending turn is not in the
/// history and is credited on top.
pub fn turns_per_player(game: &FinishedGame) -> BTreeMap<PlayerId, u32> {
    let participants = &game.config.participants;
    let mut turns: BTreeMap<PlayerId, u32> =
        participants.iter().map(|id| (id.clone(), 0)).collect();

    for snapshot in &game.turn_history {
        if let Some(player_id) = participants.get(snapshot.current_player_index) {
            *turns.entry(player_id.clone()).or_default() += 1;
        }
    }

    if game.winner_awarded_final_turn {
        if let Some(winner) = game.winners.first() {
            *turns.entry(winner.clone()).or_default() += 1;
        }
    }

    turns
}

/// Folds a finished game into the statistics and appends its log records.
/// Returns the records that were appended.
pub fn finalize(
    store: &mut StatsStore,
    game: &FinishedGame,
    recorded_at: DateTime<Utc>,
) -> Result<Vec<GameRecord>, StatsError> {
    validate(game)?;

    let game_type = &game.config.game_type;
    let turns = turns_per_player(game);
    let mut records = Vec::with_capacity(game.config.participants.len());

    for player_id in &game.config.participants {
        let final_score = game.final_ledger.score(player_id);
        let player_turns = turns.get(player_id).copied().unwrap_or_default();
        let won = game.is_winner(player_id);

        let stats = store.entry(game_type, player_id);
        stats.games_played += 1;
        stats.total_turns += u64::from(player_turns);
        stats.total_score += u64::from(final_score);
        stats.highest_score_in_game = stats.highest_score_in_game.max(final_score);
        if won {
            stats.wins += 1;
        } else {
            stats.losses += 1;
        }

        records.push(GameRecord {
            player_id: player_id.clone(),
            game_type: game_type.clone(),
            final_score,
            turns: player_turns,
            recorded_at,
            outcome: if won {
                GameOutcome::Win
            } else {
                GameOutcome::Loss
            },
        });
    }

    store.game_log.extend(records.iter().cloned());
    Ok(records)
}

fn validate(game: &FinishedGame) -> Result<(), StatsError> {
    let participants = &game.config.participants;

    if let Some(missing) = participants
        .iter()
        .find(|id| !game.final_ledger.contains(id))
    {
        return Err(StatsError::Validation(format!(
            "final ledger has no score for {missing}"
        )));
    }

    if let Some(stranger) = game.winners.iter().find(|id| !participants.contains(id)) {
        return Err(StatsError::Validation(format!(
            "winner {stranger} is not a participant"
        )));
    }

    if game.winner_awarded_final_turn && game.winners.len() != 1 {
        return Err(StatsError::Validation(
            "a final-turn award needs exactly one winner".to_string(),
        ));
    }

    Ok(())
}

//! Leaderboard built from the stored scores and the answer log.

use indexmap::IndexMap;

use crate::{
    dao::models::{PlayerEntity, PlayerId},
    dto::results::{GameResultsResponse, PlayerResult},
    error::ServiceError,
    services::room_service::load_room,
    state::SharedState,
};

#[derive(Default)]
struct Tally {
    total: u32,
    correct: u32,
}

/// Rounded percentage, 0 when nothing was answered.
fn accuracy(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (200 * correct + total) / (2 * total)
}

/// Final (or running) standings of a room.
pub async fn results(state: &SharedState, code: &str) -> Result<GameResultsResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), code).await?;
    let players = store.list_players(room.id).await?;
    let answers = store.list_answers(room.id).await?;
    let total_questions = store
        .find_session(room.id)
        .await?
        .map_or(0, |session| session.question_ids.len());

    // Join order, kept through the stable sort below for equal scores.
    let mut standings: IndexMap<PlayerId, (PlayerEntity, Tally)> = players
        .into_iter()
        .map(|player| (player.id, (player, Tally::default())))
        .collect();
    for answer in &answers {
        if let Some((_, tally)) = standings.get_mut(&answer.player_id) {
            tally.total += 1;
            tally.correct += u32::from(answer.is_correct);
        }
    }

    let mut rows: Vec<PlayerResult> = standings
        .into_values()
        .map(|(player, tally)| PlayerResult {
            player_id: player.id,
            display_name: player.display_name,
            team_id: player.team_id,
            score: player.score,
            total_answers: tally.total,
            correct_answers: tally.correct,
            accuracy: accuracy(tally.correct, tally.total),
        })
        .collect();
    rows.sort_by(|a, b| b.score.cmp(&a.score));

    Ok(GameResultsResponse {
        players: rows,
        total_questions,
        game_status: room.status,
    })
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        game::{
            AdvanceResponse, CurrentQuestionQuery, CurrentQuestionResponse, StartGameRequest,
            StartGameResponse, SubmitAnswerRequest, SubmitAnswerResponse,
        },
        lifeline::{LifelineResponse, UseLifelineRequest},
        results::GameResultsResponse,
    },
    error::{AppError, ErrorBody},
    services::{game_service, lifeline, results_service},
    state::SharedState,
};

/// Gameplay endpoints of a room.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms/{code}/game/start", post(start_game))
        .route("/rooms/{code}/game/question", get(current_question))
        .route("/rooms/{code}/game/answer", post(submit_answer))
        .route("/rooms/{code}/game/next", post(advance))
        .route("/rooms/{code}/game/lifeline", post(use_lifeline))
        .route("/rooms/{code}/results", get(results))
}

/// Start a session on a pack.
#[utoipa::path(
    post,
    path = "/rooms/{code}/game/start",
    tag = "game",
    params(("code" = String, Path, description = "Room join code")),
    request_body = StartGameRequest,
    responses(
        (status = 200, description = "Session started", body = StartGameResponse),
        (status = 404, description = "Room not found", body = ErrorBody),
        (status = 409, description = "Game already started", body = ErrorBody),
        (status = 422, description = "Pack has no questions", body = ErrorBody)
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Valid(Json(payload)): Valid<Json<StartGameRequest>>,
) -> Result<Json<StartGameResponse>, AppError> {
    Ok(Json(game_service::start_game(&state, &code, payload).await?))
}

/// Poll the question on screen.
#[utoipa::path(
    get,
    path = "/rooms/{code}/game/question",
    tag = "game",
    params(("code" = String, Path, description = "Room join code"), CurrentQuestionQuery),
    responses(
        (status = 200, description = "Current question or finished marker", body = CurrentQuestionResponse),
        (status = 404, description = "Room or session not found", body = ErrorBody)
    )
)]
pub async fn current_question(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Valid(Query(query)): Valid<Query<CurrentQuestionQuery>>,
) -> Result<Json<CurrentQuestionResponse>, AppError> {
    Ok(Json(
        game_service::current_question(&state, &code, query.player_id).await?,
    ))
}

/// Answer the current question.
#[utoipa::path(
    post,
    path = "/rooms/{code}/game/answer",
    tag = "game",
    params(("code" = String, Path, description = "Room join code")),
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Answer recorded", body = SubmitAnswerResponse),
        (status = 404, description = "Room, session or player not found", body = ErrorBody),
        (status = 409, description = "Already answered or game not in progress", body = ErrorBody)
    )
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Valid(Json(payload)): Valid<Json<SubmitAnswerRequest>>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    Ok(Json(
        game_service::submit_answer(&state, &code, payload).await?,
    ))
}

/// Move to the next question, finishing the game after the last one.
#[utoipa::path(
    post,
    path = "/rooms/{code}/game/next",
    tag = "game",
    params(("code" = String, Path, description = "Room join code")),
    responses(
        (status = 200, description = "Progressed", body = AdvanceResponse),
        (status = 404, description = "Room or session not found", body = ErrorBody),
        (status = 409, description = "Game not in progress", body = ErrorBody)
    )
)]
pub async fn advance(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<AdvanceResponse>, AppError> {
    Ok(Json(game_service::advance(&state, &code).await?))
}

/// Spend a lifeline on the current question.
#[utoipa::path(
    post,
    path = "/rooms/{code}/game/lifeline",
    tag = "game",
    params(("code" = String, Path, description = "Room join code")),
    request_body = UseLifelineRequest,
    responses(
        (status = 200, description = "Lifeline reveal", body = LifelineResponse),
        (status = 404, description = "Room, session or player not found", body = ErrorBody),
        (status = 409, description = "Lifeline already used or no current question", body = ErrorBody)
    )
)]
pub async fn use_lifeline(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Valid(Json(payload)): Valid<Json<UseLifelineRequest>>,
) -> Result<Json<LifelineResponse>, AppError> {
    Ok(Json(lifeline::use_lifeline(&state, &code, payload).await?))
}

/// Leaderboard of a room.
#[utoipa::path(
    get,
    path = "/rooms/{code}/results",
    tag = "game",
    params(("code" = String, Path, description = "Room join code")),
    responses(
        (status = 200, description = "Leaderboard", body = GameResultsResponse),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn results(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<GameResultsResponse>, AppError> {
    Ok(Json(results_service::results(&state, &code).await?))
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        pack::{CreatePackRequest, CreateQuestionRequest, PackSummary, QuestionDetail},
        practice::PracticeQuery,
    },
    error::{AppError, ErrorBody},
    services::{pack_service, practice_service},
    state::SharedState,
};

/// Pack catalogue, question authoring and practice draws.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/packs", get(list_packs).post(create_pack))
        .route("/packs/{id}/questions", post(add_question))
        .route("/practice/questions", get(practice_questions))
}

/// List the available cultural packs.
#[utoipa::path(
    get,
    path = "/packs",
    tag = "packs",
    responses((status = 200, description = "Cultural packs", body = [PackSummary]))
)]
pub async fn list_packs(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PackSummary>>, AppError> {
    Ok(Json(pack_service::list_packs(&state).await?))
}

/// Publish a new cultural pack.
#[utoipa::path(
    post,
    path = "/packs",
    tag = "packs",
    request_body = CreatePackRequest,
    responses(
        (status = 200, description = "Pack created", body = PackSummary),
        (status = 400, description = "Invalid pack")
    )
)]
pub async fn create_pack(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreatePackRequest>>,
) -> Result<Json<PackSummary>, AppError> {
    Ok(Json(pack_service::create_pack(&state, payload).await?))
}

/// Add a question to a pack.
#[utoipa::path(
    post,
    path = "/packs/{id}/questions",
    tag = "packs",
    params(("id" = i64, Path, description = "Pack identifier")),
    request_body = CreateQuestionRequest,
    responses(
        (status = 200, description = "Question created", body = QuestionDetail),
        (status = 400, description = "Invalid question"),
        (status = 404, description = "Pack not found", body = ErrorBody)
    )
)]
pub async fn add_question(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Valid(Json(payload)): Valid<Json<CreateQuestionRequest>>,
) -> Result<Json<QuestionDetail>, AppError> {
    Ok(Json(pack_service::add_question(&state, id, payload).await?))
}

/// Random questions for solo practice, answers included.
#[utoipa::path(
    get,
    path = "/practice/questions",
    tag = "packs",
    params(PracticeQuery),
    responses((status = 200, description = "Shuffled questions", body = [QuestionDetail]))
)]
pub async fn practice_questions(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<PracticeQuery>>,
) -> Result<Json<Vec<QuestionDetail>>, AppError> {
    Ok(Json(practice_service::random_questions(&state, query).await?))
}

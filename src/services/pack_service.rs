//! Cultural packs and their questions.

use tracing::info;

use crate::{
    dao::models::{NewPack, NewQuestion, PackId},
    dto::pack::{CreatePackRequest, CreateQuestionRequest, PackSummary, QuestionDetail},
    error::ServiceError,
    state::SharedState,
};

/// Every pack, in creation order.
pub async fn list_packs(state: &SharedState) -> Result<Vec<PackSummary>, ServiceError> {
    let store = state.require_game_store().await?;
    let packs = store.list_packs().await?;
    Ok(packs.into_iter().map(Into::into).collect())
}

pub async fn create_pack(
    state: &SharedState,
    request: CreatePackRequest,
) -> Result<PackSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let pack = store
        .insert_pack(NewPack {
            name: request.name.trim().to_owned(),
            localized_name: request.localized_name,
            description: request.description,
            icon_url: request.icon_url,
            is_premium: request.is_premium,
        })
        .await?;

    info!(pack_id = pack.id, name = %pack.name, "cultural pack created");
    Ok(pack.into())
}

fn encode_options(options: Option<Vec<String>>) -> Result<Option<String>, ServiceError> {
    options
        .map(|options| serde_json::to_string(&options))
        .transpose()
        .map_err(|err| ServiceError::InvalidInput(format!("cannot encode options: {err}")))
}

/// Add a question to an existing pack. Options are stored as JSON string arrays.
pub async fn add_question(
    state: &SharedState,
    pack_id: PackId,
    request: CreateQuestionRequest,
) -> Result<QuestionDetail, ServiceError> {
    let store = state.require_game_store().await?;
    store
        .find_pack(pack_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Pack not found".into()))?;

    let question = store
        .insert_question(NewQuestion {
            pack_id,
            text: request.text,
            localized_text: request.localized_text,
            kind: request.kind,
            correct_answer: request.correct_answer,
            options: encode_options(request.options)?,
            localized_options: encode_options(request.localized_options)?,
            difficulty: request.difficulty,
        })
        .await?;

    info!(pack_id, question_id = question.id, "question added");
    Ok(question.into())
}

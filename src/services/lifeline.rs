//! One-time player aids and the reveal each of them produces.

use tracing::info;

use crate::{
    dao::models::{LifelineType, NewLifeline, QuestionEntity, QuestionKind, RoomStatus},
    dto::lifeline::{LifelineResponse, UseLifelineRequest},
    error::ServiceError,
    services::room_service::{load_room, load_room_player},
    state::{
        SharedState,
        game::{leading_token, localized_options, question_options},
    },
};

/// Leading tokens of the first two options (in list order) that are not the correct one.
pub fn fifty_fifty(question: &QuestionEntity) -> Vec<String> {
    let correct = leading_token(&question.correct_answer);
    let options = question_options(question);
    options
        .iter()
        .map(|option| leading_token(option))
        .filter(|token| *token != correct)
        .take(2)
        .map(ToOwned::to_owned)
        .collect()
}

/// Fixed hint naming the correct option.
///
/// Only multiple-choice answers are cut down to their option token; numerical and
/// find-the-link answers are named whole.
pub fn ask_native(question: &QuestionEntity) -> String {
    let answer = match question.kind {
        QuestionKind::MultipleChoice => leading_token(&question.correct_answer),
        QuestionKind::Numerical | QuestionKind::FindLink => question.correct_answer.trim(),
    };
    format!("The native suggests option {answer} might be correct.")
}

/// Compute the reveal of `lifeline_type` for `question`.
pub fn lifeline_payload(lifeline_type: LifelineType, question: &QuestionEntity) -> LifelineResponse {
    match lifeline_type {
        LifelineType::FiftyFifty => LifelineResponse::FiftyFifty {
            removed_options: fifty_fifty(question),
        },
        LifelineType::AskNative => LifelineResponse::AskNative {
            hint: ask_native(question),
        },
        LifelineType::Translate => LifelineResponse::Translate {
            localized_text: question.localized_text.clone(),
            localized_options: localized_options(question),
        },
    }
}

/// Spend a lifeline on the current question.
///
/// The usage is recorded before the reveal is computed, so a player racing two requests
/// gets at most one payload.
pub async fn use_lifeline(
    state: &SharedState,
    code: &str,
    request: UseLifelineRequest,
) -> Result<LifelineResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), code).await?;
    let session = store
        .find_session(room.id)
        .await?
        .ok_or(ServiceError::SessionMissing)?;
    let question_id = session
        .current_question_id()
        .filter(|_| room.status != RoomStatus::Finished)
        .ok_or(ServiceError::NoCurrentQuestion)?;
    let player = load_room_player(store.as_ref(), &room, request.player_id).await?;
    let question = store
        .find_question(question_id)
        .await?
        .ok_or(ServiceError::NoCurrentQuestion)?;

    store
        .record_lifeline(NewLifeline {
            room_id: room.id,
            player_id: player.id,
            lifeline_type: request.lifeline_type,
            used_on_question_id: question.id,
        })
        .await
        .map_err(|err| match err.conflict() {
            Some(_) => ServiceError::AlreadyUsed,
            None => err.into(),
        })?;

    info!(
        room = %room.code,
        player_id = player.id,
        question_id,
        lifeline = request.lifeline_type.as_str(),
        "lifeline used"
    );
    Ok(lifeline_payload(request.lifeline_type, &question))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::Difficulty;

    fn question(options: &[&str], correct: &str) -> QuestionEntity {
        QuestionEntity {
            id: 1,
            pack_id: 1,
            text: "Which city hosted the 1964 Olympics?".into(),
            localized_text: Some("1964年のオリンピックはどこで開催された？".into()),
            kind: QuestionKind::MultipleChoice,
            correct_answer: correct.into(),
            options: Some(serde_json::to_string(options).unwrap()),
            localized_options: Some(r#"["A: 東京","B: 大阪","C: 京都","D: 札幌"]"#.into()),
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn fifty_fifty_removes_two_wrong_options_in_order() {
        let q = question(&["A: Tokyo", "B: Osaka", "C: Kyoto", "D: Sapporo"], "C: Kyoto");
        assert_eq!(fifty_fifty(&q), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn fifty_fifty_never_removes_the_correct_option() {
        let q = question(&["A: Tokyo", "B: Osaka"], "A: Tokyo");
        assert_eq!(fifty_fifty(&q), vec!["B".to_string()]);

        let q = question(&["A: Tokyo"], "A: Tokyo");
        assert!(fifty_fifty(&q).is_empty());
    }

    #[test]
    fn fifty_fifty_with_malformed_options_removes_nothing() {
        let mut q = question(&[], "A: Tokyo");
        q.options = Some("[broken".into());
        assert!(fifty_fifty(&q).is_empty());
    }

    #[test]
    fn ask_native_names_the_correct_token() {
        let q = question(&["A: Tokyo", "B: Osaka"], "B: Osaka");
        assert_eq!(
            ask_native(&q),
            "The native suggests option B might be correct."
        );
    }

    #[test]
    fn ask_native_names_free_form_answers_whole() {
        let mut q = question(&[], "3.14");
        q.kind = QuestionKind::Numerical;
        assert_eq!(
            ask_native(&q),
            "The native suggests option 3.14 might be correct."
        );

        q.kind = QuestionKind::FindLink;
        q.correct_answer = " Mt. Fuji ".into();
        assert_eq!(
            ask_native(&q),
            "The native suggests option Mt. Fuji might be correct."
        );
    }

    #[test]
    fn translate_returns_localized_fields_verbatim() {
        let q = question(&["A: Tokyo", "B: Osaka"], "A: Tokyo");
        match lifeline_payload(LifelineType::Translate, &q) {
            LifelineResponse::Translate {
                localized_text,
                localized_options,
            } => {
                assert_eq!(localized_text, q.localized_text);
                assert_eq!(localized_options.map(|options| options.len()), Some(4));
            }
            other => panic!("unexpected payload {other:?}"),
        }

        let mut bare = q.clone();
        bare.localized_text = None;
        bare.localized_options = None;
        assert_eq!(
            lifeline_payload(LifelineType::Translate, &bare),
            LifelineResponse::Translate {
                localized_text: None,
                localized_options: None,
            }
        );
    }
}

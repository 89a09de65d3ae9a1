//! Session lifecycle: start, question polling, answers and host-driven progression.

use std::time::SystemTime;

use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::{
    dao::models::{NewAnswer, NewSession, RoomStatus, SessionProgress},
    dto::game::{
        AdvanceResponse, CurrentQuestionResponse, QuestionView, StartGameRequest,
        StartGameResponse, SubmitAnswerRequest, SubmitAnswerResponse,
    },
    error::ServiceError,
    services::{
        room_service::{load_room, load_room_player},
        scoring,
    },
    state::{
        SharedState,
        game::{localized_options, question_options},
        state_machine::{RoomEvent, RoundProgress, transition},
    },
};

/// Start a session on a pack for a room still in the lobby.
///
/// Draws `min(requested, available)` questions in shuffled order.
pub async fn start_game(
    state: &SharedState,
    code: &str,
    request: StartGameRequest,
) -> Result<StartGameResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), code).await?;
    let next_status = transition(room.status, RoomEvent::Start)
        .map_err(|_| ServiceError::InvalidState("Game already started".into()))?;

    let mut question_ids: Vec<_> = store
        .list_questions(request.pack_id)
        .await?
        .into_iter()
        .map(|question| question.id)
        .collect();
    if question_ids.is_empty() {
        return Err(ServiceError::EmptyPack);
    }

    {
        let mut rng = state.rng().lock().await;
        question_ids.shuffle(&mut *rng);
    }
    let requested = request
        .count
        .unwrap_or(state.config().default_question_count);
    question_ids.truncate(requested);

    let session = store
        .insert_session(NewSession {
            room_id: room.id,
            pack_id: request.pack_id,
            question_ids,
            question_started_at: SystemTime::now(),
        })
        .await?;
    store.update_room_status(room.id, next_status).await?;
    store
        .update_room_round(room.id, RoundProgress::OPENING.round)
        .await?;

    let total_questions = session.question_ids.len();
    info!(
        room = %room.code,
        pack_id = request.pack_id,
        total_questions,
        "game started"
    );
    Ok(StartGameResponse { total_questions })
}

/// Public view of the question on screen, or the finished marker.
pub async fn current_question(
    state: &SharedState,
    code: &str,
    player_id: Option<i64>,
) -> Result<CurrentQuestionResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), code).await?;
    let session = store
        .find_session(room.id)
        .await?
        .ok_or(ServiceError::SessionMissing)?;

    let question_id = match session.current_question_id() {
        Some(id) if room.status != RoomStatus::Finished => id,
        _ => return Ok(CurrentQuestionResponse::finished()),
    };
    let question = store
        .find_question(question_id)
        .await?
        .ok_or(ServiceError::NoCurrentQuestion)?;

    let answered_player_ids = store
        .list_answers_for_question(room.id, question_id)
        .await?
        .into_iter()
        .map(|answer| answer.player_id)
        .collect();
    let used_lifelines = match player_id {
        Some(player_id) => store
            .list_lifelines(room.id, player_id)
            .await?
            .into_iter()
            .map(|usage| usage.lifeline_type)
            .collect(),
        None => Vec::new(),
    };

    let options = question_options(&question);
    let localized_options = localized_options(&question);
    Ok(CurrentQuestionResponse {
        finished: false,
        question: Some(QuestionView {
            id: question.id,
            text: question.text,
            localized_text: question.localized_text,
            kind: question.kind,
            options,
            localized_options,
            difficulty: question.difficulty,
        }),
        question_number: session.current_question_index + 1,
        total_questions: session.question_ids.len(),
        round_type: Some(session.round_type),
        answered_player_ids,
        used_lifelines,
    })
}

/// Record a player's answer to the current question and credit the points.
pub async fn submit_answer(
    state: &SharedState,
    code: &str,
    request: SubmitAnswerRequest,
) -> Result<SubmitAnswerResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), code).await?;
    if room.status != RoomStatus::Playing {
        return Err(ServiceError::InvalidState("Game is not in progress".into()));
    }
    let session = store
        .find_session(room.id)
        .await?
        .ok_or(ServiceError::SessionMissing)?;
    let question_id = session
        .current_question_id()
        .ok_or(ServiceError::NoCurrentQuestion)?;
    let question = store
        .find_question(question_id)
        .await?
        .ok_or(ServiceError::NoCurrentQuestion)?;
    let player = load_room_player(store.as_ref(), &room, request.player_id).await?;

    let is_correct = request.answer == question.correct_answer;
    let points_earned = scoring::points(question.difficulty, session.round_type, is_correct);

    store
        .record_answer(NewAnswer {
            room_id: room.id,
            player_id: player.id,
            question_id,
            round_number: room.current_round,
            answer: request.answer,
            is_correct,
            points_earned,
        })
        .await
        .map_err(|err| match err.conflict() {
            Some(_) => ServiceError::AlreadyAnswered,
            None => err.into(),
        })?;

    debug!(
        room = %room.code,
        player_id = player.id,
        question_id,
        is_correct,
        points_earned,
        "answer recorded"
    );
    Ok(SubmitAnswerResponse {
        is_correct,
        points_earned,
        correct_answer: question.correct_answer,
    })
}

/// Move the room to the next question, or finish it after the last one.
pub async fn advance(state: &SharedState, code: &str) -> Result<AdvanceResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), code).await?;
    let session = store
        .find_session(room.id)
        .await?
        .ok_or(ServiceError::SessionMissing)?;
    if room.status == RoomStatus::Finished {
        debug!(room = %room.code, "advance on a finished room");
        return Ok(AdvanceResponse {
            finished: true,
            question_number: session.current_question_index + 1,
        });
    }

    let next = session.current_question_index + 1;
    let total = session.question_ids.len();

    if next >= total {
        let finished = transition(room.status, RoomEvent::Finish)?;
        store.update_room_status(room.id, finished).await?;
        info!(room = %room.code, total_questions = total, "game finished");
        return Ok(AdvanceResponse {
            finished: true,
            question_number: next,
        });
    }

    let progress = RoundProgress::for_position(next, total);
    store
        .update_session_progress(
            session.id,
            SessionProgress {
                current_question_index: next,
                round_type: progress.round_type,
                question_started_at: SystemTime::now(),
            },
        )
        .await?;
    store.update_room_round(room.id, progress.round).await?;

    debug!(
        room = %room.code,
        question_number = next + 1,
        round = progress.round,
        round_type = progress.round_type.as_str(),
        "advanced to next question"
    );
    Ok(AdvanceResponse {
        finished: false,
        question_number: next + 1,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            game_store::{GameStore, memory::MemoryGameStore},
            models::{Difficulty, LifelineType, NewPack, NewQuestion, QuestionKind, RoundType},
        },
        dto::{
            lifeline::{LifelineResponse, UseLifelineRequest},
            room::{CreateRoomRequest, JoinRoomRequest},
        },
        services::{lifeline::use_lifeline, results_service, room_service},
        state::AppState,
    };

    struct Fixture {
        state: SharedState,
        store: Arc<MemoryGameStore>,
        code: String,
        pack_id: i64,
        players: Vec<i64>,
    }

    /// A room with two players and a pack of `questions` medium multiple-choice questions
    /// whose correct answer is always `"A: right"`.
    async fn fixture(questions: usize) -> Fixture {
        let store = Arc::new(MemoryGameStore::new());
        let state = AppState::with_rng(AppConfig::default(), StdRng::seed_from_u64(3));
        state.set_game_store(store.clone()).await;

        let pack = store
            .insert_pack(NewPack {
                name: "Japan".into(),
                localized_name: Some("日本".into()),
                description: None,
                icon_url: None,
                is_premium: false,
            })
            .await
            .unwrap();
        for index in 0..questions {
            store
                .insert_question(NewQuestion {
                    pack_id: pack.id,
                    text: format!("Question {index}"),
                    localized_text: Some(format!("質問 {index}")),
                    kind: QuestionKind::MultipleChoice,
                    correct_answer: "A: right".into(),
                    options: Some(
                        r#"["A: right","B: wrong","C: wronger","D: wrongest"]"#.into(),
                    ),
                    localized_options: None,
                    difficulty: Difficulty::Medium,
                })
                .await
                .unwrap();
        }

        let room = room_service::create_room(&state, CreateRoomRequest::default())
            .await
            .unwrap();
        let mut players = Vec::new();
        for name in ["Ada", "Grace"] {
            let joined = room_service::join_room(
                &state,
                &room.code,
                JoinRoomRequest {
                    display_name: name.into(),
                    user_id: None,
                },
            )
            .await
            .unwrap();
            players.push(joined.player_id);
        }

        Fixture {
            state,
            store,
            code: room.code,
            pack_id: pack.id,
            players,
        }
    }

    fn start(pack_id: i64, count: Option<usize>) -> StartGameRequest {
        StartGameRequest { pack_id, count }
    }

    fn answer(player_id: i64, answer: &str) -> SubmitAnswerRequest {
        SubmitAnswerRequest {
            player_id,
            answer: answer.into(),
        }
    }

    #[tokio::test]
    async fn start_caps_count_at_pack_size() {
        let f = fixture(3).await;
        let started = start_game(&f.state, &f.code, start(f.pack_id, Some(5)))
            .await
            .unwrap();
        assert_eq!(started.total_questions, 3);

        let room = f.store.find_room_by_code(f.code.clone()).await.unwrap().unwrap();
        assert_eq!(room.status, RoomStatus::Playing);
        assert_eq!(room.current_round, 1);

        let session = f.store.find_session(room.id).await.unwrap().unwrap();
        let mut ids = session.question_ids.clone();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(session.round_type, RoundType::Standard);
        assert!(session.question_started_at.is_some());
    }

    #[tokio::test]
    async fn start_uses_configured_default_count() {
        let f = fixture(12).await;
        let started = start_game(&f.state, &f.code, start(f.pack_id, None))
            .await
            .unwrap();
        assert_eq!(started.total_questions, 10);
    }

    #[tokio::test]
    async fn start_rejects_empty_pack_and_second_start() {
        let f = fixture(2).await;
        let err = start_game(&f.state, &f.code, start(999, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EmptyPack));

        start_game(&f.state, &f.code, start(f.pack_id, None))
            .await
            .unwrap();
        let err = start_game(&f.state, &f.code, start(f.pack_id, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn question_view_hides_the_answer() {
        let f = fixture(2).await;
        let err = current_question(&f.state, &f.code, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::SessionMissing));

        start_game(&f.state, &f.code, start(f.pack_id, None))
            .await
            .unwrap();
        let view = current_question(&f.state, &f.code, Some(f.players[0]))
            .await
            .unwrap();

        assert!(!view.finished);
        assert_eq!(view.question_number, 1);
        assert_eq!(view.total_questions, 2);
        assert_eq!(view.round_type, Some(RoundType::Standard));
        assert!(view.answered_player_ids.is_empty());
        assert!(view.used_lifelines.is_empty());
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("correct_answer"));
    }

    #[tokio::test]
    async fn correct_medium_answer_scores_150_once() {
        let f = fixture(3).await;
        start_game(&f.state, &f.code, start(f.pack_id, None))
            .await
            .unwrap();

        let result = submit_answer(&f.state, &f.code, answer(f.players[0], "A: right"))
            .await
            .unwrap();
        assert!(result.is_correct);
        assert_eq!(result.points_earned, 150);
        assert_eq!(result.correct_answer, "A: right");

        let err = submit_answer(&f.state, &f.code, answer(f.players[0], "A: right"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyAnswered));

        let wrong = submit_answer(&f.state, &f.code, answer(f.players[1], "B: wrong"))
            .await
            .unwrap();
        assert!(!wrong.is_correct);
        assert_eq!(wrong.points_earned, 0);

        let player = f.store.find_player(f.players[0]).await.unwrap().unwrap();
        assert_eq!(player.score, 150);

        let view = current_question(&f.state, &f.code, None).await.unwrap();
        assert_eq!(view.answered_player_ids, f.players);
    }

    #[tokio::test]
    async fn answers_require_a_playing_room_and_a_member() {
        let f = fixture(2).await;
        let err = submit_answer(&f.state, &f.code, answer(f.players[0], "A: right"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        start_game(&f.state, &f.code, start(f.pack_id, None))
            .await
            .unwrap();
        let err = submit_answer(&f.state, &f.code, answer(4242, "A: right"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn ten_questions_walk_through_every_round() {
        let f = fixture(10).await;
        start_game(&f.state, &f.code, start(f.pack_id, Some(10)))
            .await
            .unwrap();

        let mut seen = Vec::new();
        for _ in 1..10 {
            let step = advance(&f.state, &f.code).await.unwrap();
            assert!(!step.finished);
            let room = f.store.find_room_by_code(f.code.clone()).await.unwrap().unwrap();
            let session = f.store.find_session(room.id).await.unwrap().unwrap();
            seen.push((
                session.current_question_index,
                session.round_type,
                room.current_round,
            ));
        }

        assert_eq!(seen[5], (6, RoundType::Speed, 4));
        assert_eq!(seen[6], (7, RoundType::Speed, 4));
        assert_eq!(seen[7], (8, RoundType::Final, 5));
        assert_eq!(seen[8], (9, RoundType::Final, 5));

        let last = advance(&f.state, &f.code).await.unwrap();
        assert!(last.finished);
        assert_eq!(last.question_number, 10);

        let view = current_question(&f.state, &f.code, None).await.unwrap();
        assert!(view.finished);
        assert!(view.question.is_none());
        assert_eq!(view.total_questions, 0);

        let again = advance(&f.state, &f.code).await.unwrap();
        assert!(again.finished);
        assert_eq!(again.question_number, 10);
        let room = f.store.find_room_by_code(f.code.clone()).await.unwrap().unwrap();
        assert_eq!(room.status, RoomStatus::Finished);
        let session = f.store.find_session(room.id).await.unwrap().unwrap();
        assert_eq!(session.current_question_index, 9);

        let err = submit_answer(&f.state, &f.code, answer(f.players[0], "A: right"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn final_round_doubles_points() {
        let f = fixture(5).await;
        start_game(&f.state, &f.code, start(f.pack_id, Some(5)))
            .await
            .unwrap();
        for _ in 0..4 {
            advance(&f.state, &f.code).await.unwrap();
        }

        let result = submit_answer(&f.state, &f.code, answer(f.players[1], "A: right"))
            .await
            .unwrap();
        assert_eq!(result.points_earned, 300);

        let answers = f.store.list_answers(1).await.unwrap();
        assert_eq!(answers[0].round_number, 5);
    }

    #[tokio::test]
    async fn lifelines_are_spent_once_per_room() {
        let f = fixture(3).await;
        start_game(&f.state, &f.code, start(f.pack_id, None))
            .await
            .unwrap();
        let request = || UseLifelineRequest {
            player_id: f.players[0],
            lifeline_type: LifelineType::FiftyFifty,
        };

        let payload = use_lifeline(&f.state, &f.code, request()).await.unwrap();
        assert_eq!(
            payload,
            LifelineResponse::FiftyFifty {
                removed_options: vec!["B".into(), "C".into()],
            }
        );

        advance(&f.state, &f.code).await.unwrap();
        let err = use_lifeline(&f.state, &f.code, request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyUsed));

        let view = current_question(&f.state, &f.code, Some(f.players[0]))
            .await
            .unwrap();
        assert_eq!(view.used_lifelines, vec![LifelineType::FiftyFifty]);

        let other = use_lifeline(
            &f.state,
            &f.code,
            UseLifelineRequest {
                player_id: f.players[1],
                lifeline_type: LifelineType::FiftyFifty,
            },
        )
        .await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn results_rank_by_stored_score() {
        let f = fixture(2).await;
        start_game(&f.state, &f.code, start(f.pack_id, None))
            .await
            .unwrap();
        submit_answer(&f.state, &f.code, answer(f.players[0], "B: wrong"))
            .await
            .unwrap();
        submit_answer(&f.state, &f.code, answer(f.players[1], "A: right"))
            .await
            .unwrap();
        advance(&f.state, &f.code).await.unwrap();
        submit_answer(&f.state, &f.code, answer(f.players[1], "A: right"))
            .await
            .unwrap();

        let results = results_service::results(&f.state, &f.code).await.unwrap();
        assert_eq!(results.total_questions, 2);
        assert_eq!(results.game_status, RoomStatus::Playing);
        let rows: Vec<_> = results
            .players
            .iter()
            .map(|row| (row.player_id, row.score, row.accuracy))
            .collect();
        assert_eq!(rows, vec![(f.players[1], 300, 100), (f.players[0], 0, 0)]);
    }

    #[tokio::test]
    async fn finished_room_has_no_current_question() {
        let f = fixture(1).await;
        start_game(&f.state, &f.code, start(f.pack_id, None))
            .await
            .unwrap();
        submit_answer(&f.state, &f.code, answer(f.players[0], "A: right"))
            .await
            .unwrap();
        assert!(advance(&f.state, &f.code).await.unwrap().finished);

        let err = use_lifeline(
            &f.state,
            &f.code,
            UseLifelineRequest {
                player_id: f.players[1],
                lifeline_type: LifelineType::AskNative,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NoCurrentQuestion));

        let err = submit_answer(&f.state, &f.code, answer(f.players[1], "A: right"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        let room = f.store.find_room_by_code(f.code.clone()).await.unwrap().unwrap();
        let answers = f.store.list_answers(room.id).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].player_id, f.players[0]);
        assert!(f.store.list_lifelines(room.id, f.players[1]).await.unwrap().is_empty());
        let player = f.store.find_player(f.players[1]).await.unwrap().unwrap();
        assert_eq!(player.score, 0);
    }
}

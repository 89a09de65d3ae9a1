//! Gameplay payloads: starting, polling the current question, answering and advancing.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dao::models::{Difficulty, LifelineType, QuestionKind, RoundType};

/// Request to start a session on a pack.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct StartGameRequest {
    pub pack_id: i64,
    /// Number of questions to draw; the configured default when omitted.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub count: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StartGameResponse {
    pub total_questions: usize,
}

#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct CurrentQuestionQuery {
    /// When set, the lifelines this player already used are included.
    pub player_id: Option<i64>,
}

/// Public side of a question. Never carries the correct answer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionView {
    pub id: i64,
    pub text: String,
    pub localized_text: Option<String>,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub localized_options: Option<Vec<String>>,
    pub difficulty: Difficulty,
}

/// Polled view of the question being played.
///
/// Once the session is over `finished` is set, `question` is absent and counts are zero.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentQuestionResponse {
    pub finished: bool,
    pub question: Option<QuestionView>,
    /// 1-based position of the question.
    pub question_number: usize,
    pub total_questions: usize,
    pub round_type: Option<RoundType>,
    /// Players who already answered this question.
    pub answered_player_ids: Vec<i64>,
    /// Lifelines the requesting player used in this room.
    pub used_lifelines: Vec<LifelineType>,
}

impl CurrentQuestionResponse {
    pub fn finished() -> Self {
        Self {
            finished: true,
            question: None,
            question_number: 0,
            total_questions: 0,
            round_type: None,
            answered_player_ids: Vec::new(),
            used_lifelines: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitAnswerRequest {
    pub player_id: i64,
    #[validate(length(max = 512))]
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
    pub points_earned: u32,
    pub correct_answer: String,
}

/// Result of moving to the next question.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdvanceResponse {
    pub finished: bool,
    /// 1-based number of the question now on screen; one past the last once finished.
    pub question_number: usize,
}

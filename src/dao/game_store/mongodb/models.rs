//! BSON representations of the domain entities.
//!
//! Primary keys live in `_id`; counters hand out the numeric values so identifiers stay
//! compatible with the in-memory backend.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::dao::models::{
    CulturalPackEntity, Difficulty, GameSessionEntity, LifelineType, PlayerAnswerEntity,
    PlayerEntity, PlayerLifelineEntity, QuestionEntity, QuestionKind, RoomEntity, RoomStatus,
    RoundType, TeamEntity,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct CounterDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub seq: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub code: String,
    pub host_id: i64,
    pub status: RoomStatus,
    pub current_round: u32,
    pub created_at: DateTime,
}

impl From<RoomDocument> for RoomEntity {
    fn from(value: RoomDocument) -> Self {
        Self {
            id: value.id,
            code: value.code,
            host_id: value.host_id,
            status: value.status,
            current_round: value.current_round,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub room_id: i64,
    pub name: String,
    pub home_culture: Option<String>,
    pub exchange_culture: Option<String>,
    #[serde(default)]
    pub score: i32,
}

impl From<TeamDocument> for TeamEntity {
    fn from(value: TeamDocument) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            name: value.name,
            home_culture: value.home_culture,
            exchange_culture: value.exchange_culture,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub room_id: i64,
    pub team_id: Option<i64>,
    pub user_id: Option<i64>,
    pub display_name: String,
    #[serde(default)]
    pub is_ready: bool,
    #[serde(default)]
    pub score: i64,
}

impl From<PlayerDocument> for PlayerEntity {
    fn from(value: PlayerDocument) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            team_id: value.team_id,
            user_id: value.user_id,
            display_name: value.display_name,
            is_ready: value.is_ready,
            score: u32::try_from(value.score).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PackDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub localized_name: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

impl From<PackDocument> for CulturalPackEntity {
    fn from(value: PackDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            localized_name: value.localized_name,
            description: value.description,
            icon_url: value.icon_url,
            is_premium: value.is_premium,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub pack_id: i64,
    pub text: String,
    pub localized_text: Option<String>,
    pub kind: QuestionKind,
    pub correct_answer: String,
    pub options: Option<String>,
    pub localized_options: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl From<QuestionDocument> for QuestionEntity {
    fn from(value: QuestionDocument) -> Self {
        Self {
            id: value.id,
            pack_id: value.pack_id,
            text: value.text,
            localized_text: value.localized_text,
            kind: value.kind,
            correct_answer: value.correct_answer,
            options: value.options,
            localized_options: value.localized_options,
            difficulty: value.difficulty,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub room_id: i64,
    pub pack_id: i64,
    pub current_question_index: i64,
    pub question_ids: Vec<i64>,
    pub question_started_at: Option<DateTime>,
    #[serde(default)]
    pub round_type: RoundType,
    pub created_at: DateTime,
}

impl From<SessionDocument> for GameSessionEntity {
    fn from(value: SessionDocument) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            pack_id: value.pack_id,
            current_question_index: usize::try_from(value.current_question_index)
                .unwrap_or_default(),
            question_ids: value.question_ids,
            question_started_at: value.question_started_at.map(DateTime::to_system_time),
            round_type: value.round_type,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub room_id: i64,
    pub player_id: i64,
    pub question_id: i64,
    pub round_number: u32,
    pub answer: String,
    pub is_correct: bool,
    pub points_earned: u32,
    pub answered_at: DateTime,
}

impl From<AnswerDocument> for PlayerAnswerEntity {
    fn from(value: AnswerDocument) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            player_id: value.player_id,
            question_id: value.question_id,
            round_number: value.round_number,
            answer: value.answer,
            is_correct: value.is_correct,
            points_earned: value.points_earned,
            answered_at: value.answered_at.to_system_time(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LifelineDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub room_id: i64,
    pub player_id: i64,
    pub lifeline_type: LifelineType,
    pub used_on_question_id: i64,
    pub used_at: DateTime,
}

impl From<LifelineDocument> for PlayerLifelineEntity {
    fn from(value: LifelineDocument) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            player_id: value.player_id,
            lifeline_type: value.lifeline_type,
            used_on_question_id: value.used_on_question_id,
            used_at: value.used_at.to_system_time(),
        }
    }
}

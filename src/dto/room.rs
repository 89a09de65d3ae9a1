//! Lobby payloads: room creation, joining, teams and the polled room state.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{
        GameSessionEntity, PlayerEntity, RoomEntity, RoomStatus, RoundType, TeamEntity,
    },
    dto::{format_system_time, validation::validate_not_blank},
};

/// Request to open a new room.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct CreateRoomRequest {
    /// Hosting user; anonymous hosts are stored as 0.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub host_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRoomResponse {
    pub id: i64,
    pub code: String,
}

/// Request to join a room with a display name.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JoinRoomRequest {
    #[validate(length(min = 1, max = 32), custom(function = "validate_not_blank"))]
    pub display_name: String,
    /// Authenticated user behind the player, if any.
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JoinRoomResponse {
    pub room_id: i64,
    pub player_id: i64,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetReadyRequest {
    pub is_ready: bool,
}

/// Request to create a team inside a room.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 48), custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub home_culture: Option<String>,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub exchange_culture: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AssignTeamRequest {
    pub team_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomSummary {
    pub id: i64,
    pub code: String,
    pub host_id: i64,
    pub status: RoomStatus,
    pub current_round: u32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<RoomEntity> for RoomSummary {
    fn from(value: RoomEntity) -> Self {
        Self {
            id: value.id,
            code: value.code,
            host_id: value.host_id,
            status: value.status,
            current_round: value.current_round,
            created_at: format_system_time(value.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeamSummary {
    pub id: i64,
    pub room_id: i64,
    pub name: String,
    pub home_culture: Option<String>,
    pub exchange_culture: Option<String>,
    pub score: i32,
}

impl From<TeamEntity> for TeamSummary {
    fn from(value: TeamEntity) -> Self {
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

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlayerSummary {
    pub id: i64,
    pub room_id: i64,
    pub team_id: Option<i64>,
    pub display_name: String,
    pub is_ready: bool,
    pub score: u32,
}

impl From<PlayerEntity> for PlayerSummary {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            team_id: value.team_id,
            display_name: value.display_name,
            is_ready: value.is_ready,
            score: value.score,
        }
    }
}

/// Session progress as seen from the lobby screen. The question order stays server-side.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionSummary {
    pub id: i64,
    pub pack_id: i64,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub round_type: RoundType,
    pub question_started_at: Option<String>,
}

impl From<GameSessionEntity> for SessionSummary {
    fn from(value: GameSessionEntity) -> Self {
        Self {
            id: value.id,
            pack_id: value.pack_id,
            current_question_index: value.current_question_index,
            total_questions: value.question_ids.len(),
            round_type: value.round_type,
            question_started_at: value.question_started_at.map(format_system_time),
        }
    }
}

/// Everything a lobby or host screen polls for.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomStateResponse {
    pub room: RoomSummary,
    pub teams: Vec<TeamSummary>,
    pub players: Vec<PlayerSummary>,
    pub session: Option<SessionSummary>,
}

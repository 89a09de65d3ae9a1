use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::room::{
        AssignTeamRequest, CreateRoomRequest, CreateRoomResponse, CreateTeamRequest,
        JoinRoomRequest, JoinRoomResponse, PlayerSummary, RoomStateResponse, SetReadyRequest,
        TeamSummary,
    },
    error::{AppError, ErrorBody},
    services::room_service,
    state::SharedState,
};

/// Lobby endpoints: rooms, players and teams.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/{code}", get(get_room_state))
        .route("/rooms/{code}/players", post(join_room))
        .route("/rooms/{code}/teams", post(create_team))
        .route("/players/{id}/ready", put(set_player_ready))
        .route("/players/{id}/team", put(assign_team))
}

/// Open a room and return its join code.
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = CreateRoomResponse),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn create_room(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateRoomRequest>>,
) -> Result<Json<CreateRoomResponse>, AppError> {
    Ok(Json(room_service::create_room(&state, payload).await?))
}

/// Join a room by code.
#[utoipa::path(
    post,
    path = "/rooms/{code}/players",
    tag = "rooms",
    params(("code" = String, Path, description = "Room join code")),
    request_body = JoinRoomRequest,
    responses(
        (status = 200, description = "Player joined", body = JoinRoomResponse),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn join_room(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Valid(Json(payload)): Valid<Json<JoinRoomRequest>>,
) -> Result<Json<JoinRoomResponse>, AppError> {
    Ok(Json(room_service::join_room(&state, &code, payload).await?))
}

/// Room, teams, players and session as polled by lobby and host screens.
#[utoipa::path(
    get,
    path = "/rooms/{code}",
    tag = "rooms",
    params(("code" = String, Path, description = "Room join code")),
    responses(
        (status = 200, description = "Room state", body = RoomStateResponse),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn get_room_state(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<RoomStateResponse>, AppError> {
    Ok(Json(room_service::get_room_state(&state, &code).await?))
}

/// Create a team inside a room.
#[utoipa::path(
    post,
    path = "/rooms/{code}/teams",
    tag = "rooms",
    params(("code" = String, Path, description = "Room join code")),
    request_body = CreateTeamRequest,
    responses(
        (status = 200, description = "Team created", body = TeamSummary),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn create_team(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Valid(Json(payload)): Valid<Json<CreateTeamRequest>>,
) -> Result<Json<TeamSummary>, AppError> {
    Ok(Json(room_service::create_team(&state, &code, payload).await?))
}

/// Flag a player as ready (or not) in the lobby.
#[utoipa::path(
    put,
    path = "/players/{id}/ready",
    tag = "rooms",
    params(("id" = i64, Path, description = "Player identifier")),
    request_body = SetReadyRequest,
    responses(
        (status = 200, description = "Player updated", body = PlayerSummary),
        (status = 404, description = "Player not found", body = ErrorBody)
    )
)]
pub async fn set_player_ready(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Valid(Json(payload)): Valid<Json<SetReadyRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(
        room_service::set_player_ready(&state, id, payload.is_ready).await?,
    ))
}

/// Put a player in a team of the same room.
#[utoipa::path(
    put,
    path = "/players/{id}/team",
    tag = "rooms",
    params(("id" = i64, Path, description = "Player identifier")),
    request_body = AssignTeamRequest,
    responses(
        (status = 200, description = "Player updated", body = PlayerSummary),
        (status = 400, description = "Team belongs to another room", body = ErrorBody),
        (status = 404, description = "Player or team not found", body = ErrorBody)
    )
)]
pub async fn assign_team(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Valid(Json(payload)): Valid<Json<AssignTeamRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(
        room_service::assign_team(&state, id, payload.team_id).await?,
    ))
}

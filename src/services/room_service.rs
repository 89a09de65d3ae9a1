//! Lobby operations: opening rooms, joining, readiness and teams.

use tracing::{debug, info, warn};

use crate::{
    dao::{
        game_store::GameStore,
        models::{NewPlayer, NewRoom, NewTeam, PlayerEntity, PlayerId, RoomEntity, TeamId},
        storage::{Constraint, StorageError},
    },
    dto::room::{
        CreateRoomRequest, CreateRoomResponse, CreateTeamRequest, JoinRoomRequest,
        JoinRoomResponse, PlayerSummary, RoomStateResponse, TeamSummary,
    },
    error::ServiceError,
    services::room_code::{generate_room_code, is_valid_room_code},
    state::SharedState,
};

/// Resolve a join code to its room. Codes are matched case-insensitively.
pub(crate) async fn load_room(store: &dyn GameStore, code: &str) -> Result<RoomEntity, ServiceError> {
    let code = code.trim().to_ascii_uppercase();
    if !is_valid_room_code(&code) {
        return Err(ServiceError::room_not_found());
    }
    store
        .find_room_by_code(code)
        .await?
        .ok_or_else(ServiceError::room_not_found)
}

/// Load a player and check it sits in `room`.
pub(crate) async fn load_room_player(
    store: &dyn GameStore,
    room: &RoomEntity,
    player_id: PlayerId,
) -> Result<PlayerEntity, ServiceError> {
    store
        .find_player(player_id)
        .await?
        .filter(|player| player.room_id == room.id)
        .ok_or_else(|| ServiceError::NotFound("Player not found".into()))
}

/// Open a room under a fresh join code, retrying on code collisions.
pub async fn create_room(
    state: &SharedState,
    request: CreateRoomRequest,
) -> Result<CreateRoomResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let host_id = request.host_id.unwrap_or(0);
    let attempts = state.config().room_code_attempts;

    for attempt in 1..=attempts {
        let code = {
            let mut rng = state.rng().lock().await;
            generate_room_code(&mut *rng)
        };
        match store.insert_room(NewRoom { code, host_id }).await {
            Ok(room) => {
                info!(room = %room.code, room_id = room.id, host_id, "room created");
                return Ok(CreateRoomResponse {
                    id: room.id,
                    code: room.code,
                });
            }
            Err(err) if err.conflict() == Some(Constraint::RoomCode) => {
                debug!(attempt, "room code already taken; drawing another");
            }
            Err(err) => return Err(err.into()),
        }
    }

    warn!(attempts, "could not find a free room code");
    Err(ServiceError::Unavailable(StorageError::Conflict(
        Constraint::RoomCode,
    )))
}

/// Add a player to the room behind `code`.
pub async fn join_room(
    state: &SharedState,
    code: &str,
    request: JoinRoomRequest,
) -> Result<JoinRoomResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), code).await?;

    let player = store
        .insert_player(NewPlayer {
            room_id: room.id,
            user_id: request.user_id,
            display_name: request.display_name.trim().to_owned(),
        })
        .await?;

    info!(room = %room.code, player_id = player.id, "player joined");
    Ok(JoinRoomResponse {
        room_id: room.id,
        player_id: player.id,
    })
}

/// Toggle the lobby ready flag of a player.
pub async fn set_player_ready(
    state: &SharedState,
    player_id: PlayerId,
    is_ready: bool,
) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let player = store
        .update_player_ready(player_id, is_ready)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Player not found".into()))?;

    debug!(player_id, is_ready, "player readiness updated");
    Ok(player.into())
}

/// Create a team inside the room behind `code`.
pub async fn create_team(
    state: &SharedState,
    code: &str,
    request: CreateTeamRequest,
) -> Result<TeamSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), code).await?;

    let team = store
        .insert_team(NewTeam {
            room_id: room.id,
            name: request.name.trim().to_owned(),
            home_culture: request.home_culture,
            exchange_culture: request.exchange_culture,
        })
        .await?;

    info!(room = %room.code, team_id = team.id, "team created");
    Ok(team.into())
}

/// Move a player into a team of the same room.
pub async fn assign_team(
    state: &SharedState,
    player_id: PlayerId,
    team_id: TeamId,
) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let player = store
        .find_player(player_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Player not found".into()))?;
    let team = store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found".into()))?;

    if team.room_id != player.room_id {
        return Err(ServiceError::InvalidInput(
            "team belongs to another room".into(),
        ));
    }

    let player = store
        .update_player_team(player_id, team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Player not found".into()))?;

    debug!(player_id, team_id, "player assigned to team");
    Ok(player.into())
}

/// Snapshot of a room with its teams, players and session.
pub async fn get_room_state(
    state: &SharedState,
    code: &str,
) -> Result<RoomStateResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), code).await?;

    let teams = store.list_teams(room.id).await?;
    let players = store.list_players(room.id).await?;
    let session = store.find_session(room.id).await?;

    Ok(RoomStateResponse {
        room: room.into(),
        teams: teams.into_iter().map(Into::into).collect(),
        players: players.into_iter().map(Into::into).collect(),
        session: session.map(Into::into),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig, dao::game_store::memory::MemoryGameStore, dao::models::RoomStatus,
        state::AppState,
    };

    async fn test_state() -> SharedState {
        let state = AppState::new(AppConfig {
            rng_seed: Some(11),
            ..AppConfig::default()
        });
        state
            .set_game_store(Arc::new(MemoryGameStore::new()))
            .await;
        state
    }

    fn join(name: &str) -> JoinRoomRequest {
        JoinRoomRequest {
            display_name: name.into(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn created_room_starts_in_lobby() {
        let state = test_state().await;
        let created = create_room(&state, CreateRoomRequest::default())
            .await
            .unwrap();
        assert!(is_valid_room_code(&created.code));

        let snapshot = get_room_state(&state, &created.code).await.unwrap();
        assert_eq!(snapshot.room.status, RoomStatus::Lobby);
        assert_eq!(snapshot.room.current_round, 0);
        assert_eq!(snapshot.room.host_id, 0);
        assert!(snapshot.session.is_none());
    }

    #[tokio::test]
    async fn join_with_unknown_code_is_not_found() {
        let state = test_state().await;
        let err = join_room(&state, "ZZZZZZ", join("Ada")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = join_room(&state, "nope", join("Ada")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn players_join_in_order_with_lowercase_code() {
        let state = test_state().await;
        let room = create_room(&state, CreateRoomRequest::default())
            .await
            .unwrap();

        let first = join_room(&state, &room.code, join("Ada")).await.unwrap();
        let second = join_room(&state, &room.code.to_lowercase(), join(" Grace "))
            .await
            .unwrap();
        assert_eq!(first.room_id, room.id);

        let snapshot = get_room_state(&state, &room.code).await.unwrap();
        let names: Vec<_> = snapshot
            .players
            .iter()
            .map(|player| (player.id, player.display_name.as_str()))
            .collect();
        assert_eq!(names, vec![(first.player_id, "Ada"), (second.player_id, "Grace")]);
    }

    #[tokio::test]
    async fn ready_flag_and_team_assignment() {
        let state = test_state().await;
        let room = create_room(&state, CreateRoomRequest::default())
            .await
            .unwrap();
        let player = join_room(&state, &room.code, join("Ada")).await.unwrap();

        let ready = set_player_ready(&state, player.player_id, true)
            .await
            .unwrap();
        assert!(ready.is_ready);

        let team = create_team(
            &state,
            &room.code,
            CreateTeamRequest {
                name: "Sakura".into(),
                home_culture: Some("fr".into()),
                exchange_culture: Some("jp".into()),
            },
        )
        .await
        .unwrap();
        let assigned = assign_team(&state, player.player_id, team.id).await.unwrap();
        assert_eq!(assigned.team_id, Some(team.id));

        let missing = set_player_ready(&state, 999, true).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn team_from_another_room_is_rejected() {
        let state = test_state().await;
        let first = create_room(&state, CreateRoomRequest::default())
            .await
            .unwrap();
        let second = create_room(&state, CreateRoomRequest::default())
            .await
            .unwrap();
        let player = join_room(&state, &first.code, join("Ada")).await.unwrap();
        let team = create_team(
            &state,
            &second.code,
            CreateTeamRequest {
                name: "Elsewhere".into(),
                home_culture: None,
                exchange_culture: None,
            },
        )
        .await
        .unwrap();

        let err = assign_team(&state, player.player_id, team.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn code_collision_draws_a_new_code() {
        use rand::{SeedableRng, rngs::StdRng};

        let taken = generate_room_code(&mut StdRng::seed_from_u64(5));
        let store = Arc::new(MemoryGameStore::new());
        store
            .insert_room(NewRoom {
                code: taken.clone(),
                host_id: 1,
            })
            .await
            .unwrap();

        let retrying = AppState::with_rng(AppConfig::default(), StdRng::seed_from_u64(5));
        retrying.set_game_store(store.clone()).await;
        let created = create_room(&retrying, CreateRoomRequest::default())
            .await
            .unwrap();
        assert_ne!(created.code, taken);

        let single_attempt = AppState::with_rng(
            AppConfig {
                room_code_attempts: 1,
                ..AppConfig::default()
            },
            StdRng::seed_from_u64(5),
        );
        single_attempt.set_game_store(store).await;
        let err = create_room(&single_attempt, CreateRoomRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn degraded_state_refuses_writes() {
        let state = AppState::new(AppConfig::default());
        let err = create_room(&state, CreateRoomRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }
}

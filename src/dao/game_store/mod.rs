pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{
    CulturalPackEntity, GameSessionEntity, NewAnswer, NewLifeline, NewPack, NewPlayer,
    NewQuestion, NewRoom, NewSession, NewTeam, PackId, PlayerAnswerEntity, PlayerEntity,
    PlayerId, PlayerLifelineEntity, QuestionEntity, QuestionId, RoomEntity, RoomId, RoomStatus,
    SessionId, SessionProgress, TeamEntity, TeamId,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for rooms, reference data and the game log.
///
/// Every call is atomic on its own; the trait offers no multi-call transactions.
/// Inserts guarded by a uniqueness rule fail with [`StorageError::Conflict`] instead of
/// writing a duplicate, which is what the game rules rely on for deduplication.
///
/// [`StorageError::Conflict`]: crate::dao::storage::StorageError::Conflict
pub trait GameStore: Send + Sync {
    /// Insert a room. Conflicts when the code is already taken.
    fn insert_room(&self, room: NewRoom) -> BoxFuture<'static, StorageResult<RoomEntity>>;
    fn find_room_by_code(&self, code: String)
    -> BoxFuture<'static, StorageResult<Option<RoomEntity>>>;
    /// Returns `false` when no room matched.
    fn update_room_status(
        &self,
        id: RoomId,
        status: RoomStatus,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Returns `false` when no room matched.
    fn update_room_round(&self, id: RoomId, round: u32) -> BoxFuture<'static, StorageResult<bool>>;

    fn insert_team(&self, team: NewTeam) -> BoxFuture<'static, StorageResult<TeamEntity>>;
    fn find_team(&self, id: TeamId) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Teams of a room, in creation order.
    fn list_teams(&self, room_id: RoomId) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;

    fn insert_player(&self, player: NewPlayer) -> BoxFuture<'static, StorageResult<PlayerEntity>>;
    fn find_player(&self, id: PlayerId)
    -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Players of a room, in join order.
    fn list_players(&self, room_id: RoomId)
    -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    fn update_player_ready(
        &self,
        id: PlayerId,
        is_ready: bool,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    fn update_player_team(
        &self,
        id: PlayerId,
        team_id: TeamId,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;

    fn insert_pack(&self, pack: NewPack) -> BoxFuture<'static, StorageResult<CulturalPackEntity>>;
    fn find_pack(&self, id: PackId)
    -> BoxFuture<'static, StorageResult<Option<CulturalPackEntity>>>;
    fn list_packs(&self) -> BoxFuture<'static, StorageResult<Vec<CulturalPackEntity>>>;

    fn insert_question(
        &self,
        question: NewQuestion,
    ) -> BoxFuture<'static, StorageResult<QuestionEntity>>;
    fn find_question(
        &self,
        id: QuestionId,
    ) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>>;
    /// Questions of a pack, in creation order.
    fn list_questions(
        &self,
        pack_id: PackId,
    ) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>>;

    /// Insert the session of a room. Conflicts when the room already has one.
    fn insert_session(
        &self,
        session: NewSession,
    ) -> BoxFuture<'static, StorageResult<GameSessionEntity>>;
    fn find_session(
        &self,
        room_id: RoomId,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>>;
    /// Returns `false` when no session matched.
    fn update_session_progress(
        &self,
        id: SessionId,
        progress: SessionProgress,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// Append an answer and credit its points to the player's score.
    ///
    /// Conflicts, without touching the score, when the player already answered the
    /// question in this room.
    fn record_answer(
        &self,
        answer: NewAnswer,
    ) -> BoxFuture<'static, StorageResult<PlayerAnswerEntity>>;
    /// Full answer log of a room, in insertion order.
    fn list_answers(
        &self,
        room_id: RoomId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerAnswerEntity>>>;
    fn list_answers_for_question(
        &self,
        room_id: RoomId,
        question_id: QuestionId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerAnswerEntity>>>;

    /// Append a lifeline usage. Conflicts when the player already used this type in the room.
    fn record_lifeline(
        &self,
        lifeline: NewLifeline,
    ) -> BoxFuture<'static, StorageResult<PlayerLifelineEntity>>;
    fn list_lifelines(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerLifelineEntity>>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

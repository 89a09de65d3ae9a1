//! In-process [`GameStore`] backed by concurrent hash maps.
//!
//! Uniqueness rules are enforced through the `DashMap` entry API: the shard lock held by
//! an entry makes check-and-insert a single step, so concurrent duplicates lose with
//! [`StorageError::Conflict`].

use std::{
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
    time::SystemTime,
};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;

use crate::dao::{
    game_store::GameStore,
    models::{
        CulturalPackEntity, GameSessionEntity, LifelineType, NewAnswer, NewLifeline, NewPack,
        NewPlayer, NewQuestion, NewRoom, NewSession, NewTeam, PackId, PlayerAnswerEntity,
        PlayerEntity, PlayerId, PlayerLifelineEntity, QuestionEntity, QuestionId, RoomEntity,
        RoomId, RoomStatus, SessionId, SessionProgress, TeamEntity, TeamId,
    },
    storage::{Constraint, StorageError, StorageResult},
};

type AnswerKey = (RoomId, PlayerId, QuestionId);
type LifelineKey = (RoomId, PlayerId, LifelineType);

/// Volatile store used for local play, tests, and as the fallback when no database is
/// configured.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    sequences: Sequences,
    rooms: DashMap<RoomId, RoomEntity>,
    room_codes: DashMap<String, RoomId>,
    teams: DashMap<TeamId, TeamEntity>,
    players: DashMap<PlayerId, PlayerEntity>,
    packs: DashMap<PackId, CulturalPackEntity>,
    questions: DashMap<QuestionId, QuestionEntity>,
    sessions: DashMap<RoomId, GameSessionEntity>,
    session_rooms: DashMap<SessionId, RoomId>,
    answers: DashMap<AnswerKey, PlayerAnswerEntity>,
    lifelines: DashMap<LifelineKey, PlayerLifelineEntity>,
}

#[derive(Default)]
struct Sequences {
    room: AtomicI64,
    team: AtomicI64,
    player: AtomicI64,
    pack: AtomicI64,
    question: AtomicI64,
    session: AtomicI64,
    answer: AtomicI64,
    lifeline: AtomicI64,
}

fn next_id(sequence: &AtomicI64) -> i64 {
    sequence.fetch_add(1, Ordering::Relaxed) + 1
}

/// Clone every value matching `keep`, ordered by primary key.
fn collect_sorted<K, V>(
    map: &DashMap<K, V>,
    keep: impl Fn(&V) -> bool,
    id: impl Fn(&V) -> i64,
) -> Vec<V>
where
    K: Eq + std::hash::Hash,
    V: Clone,
{
    let mut values: Vec<V> = map
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| entry.value().clone())
        .collect();
    values.sort_by_key(|value| id(value));
    values
}

impl MemoryGameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn run<T, F>(&self, op: F) -> BoxFuture<'static, StorageResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&MemoryInner) -> StorageResult<T> + Send + 'static,
    {
        let inner = self.inner.clone();
        Box::pin(async move { op(&inner) })
    }
}

impl MemoryInner {
    fn insert_room(&self, room: NewRoom) -> StorageResult<RoomEntity> {
        let Entry::Vacant(slot) = self.room_codes.entry(room.code.clone()) else {
            return Err(StorageError::Conflict(Constraint::RoomCode));
        };
        let entity = RoomEntity {
            id: next_id(&self.sequences.room),
            code: room.code,
            host_id: room.host_id,
            status: RoomStatus::Lobby,
            current_round: 0,
            created_at: SystemTime::now(),
        };
        self.rooms.insert(entity.id, entity.clone());
        slot.insert(entity.id);
        Ok(entity)
    }

    fn find_room_by_code(&self, code: &str) -> Option<RoomEntity> {
        let id = *self.room_codes.get(code)?;
        self.rooms.get(&id).map(|room| room.clone())
    }

    fn update_room(&self, id: RoomId, update: impl FnOnce(&mut RoomEntity)) -> bool {
        match self.rooms.get_mut(&id) {
            Some(mut room) => {
                update(&mut room);
                true
            }
            None => false,
        }
    }

    fn update_player(
        &self,
        id: PlayerId,
        update: impl FnOnce(&mut PlayerEntity),
    ) -> Option<PlayerEntity> {
        let mut player = self.players.get_mut(&id)?;
        update(&mut player);
        Some(player.clone())
    }

    fn insert_session(&self, session: NewSession) -> StorageResult<GameSessionEntity> {
        let Entry::Vacant(slot) = self.sessions.entry(session.room_id) else {
            return Err(StorageError::Conflict(Constraint::SessionPerRoom));
        };
        let entity = GameSessionEntity {
            id: next_id(&self.sequences.session),
            room_id: session.room_id,
            pack_id: session.pack_id,
            current_question_index: 0,
            question_ids: session.question_ids,
            question_started_at: Some(session.question_started_at),
            round_type: Default::default(),
            created_at: SystemTime::now(),
        };
        self.session_rooms.insert(entity.id, entity.room_id);
        slot.insert(entity.clone());
        Ok(entity)
    }

    fn update_session_progress(&self, id: SessionId, progress: SessionProgress) -> bool {
        let Some(room_id) = self.session_rooms.get(&id).map(|room_id| *room_id) else {
            return false;
        };
        match self.sessions.get_mut(&room_id) {
            Some(mut session) => {
                session.current_question_index = progress.current_question_index;
                session.round_type = progress.round_type;
                session.question_started_at = Some(progress.question_started_at);
                true
            }
            None => false,
        }
    }

    fn record_answer(&self, answer: NewAnswer) -> StorageResult<PlayerAnswerEntity> {
        let key = (answer.room_id, answer.player_id, answer.question_id);
        // The answers shard stays locked until the score is credited, so a duplicate
        // submission cannot slip in between the two writes.
        let Entry::Vacant(slot) = self.answers.entry(key) else {
            return Err(StorageError::Conflict(Constraint::AnswerPerQuestion));
        };
        let entity = PlayerAnswerEntity {
            id: next_id(&self.sequences.answer),
            room_id: answer.room_id,
            player_id: answer.player_id,
            question_id: answer.question_id,
            round_number: answer.round_number,
            answer: answer.answer,
            is_correct: answer.is_correct,
            points_earned: answer.points_earned,
            answered_at: SystemTime::now(),
        };
        if entity.points_earned > 0 {
            if let Some(mut player) = self.players.get_mut(&entity.player_id) {
                player.score = player.score.saturating_add(entity.points_earned);
            }
        }
        slot.insert(entity.clone());
        Ok(entity)
    }

    fn record_lifeline(&self, lifeline: NewLifeline) -> StorageResult<PlayerLifelineEntity> {
        let key = (lifeline.room_id, lifeline.player_id, lifeline.lifeline_type);
        let Entry::Vacant(slot) = self.lifelines.entry(key) else {
            return Err(StorageError::Conflict(Constraint::LifelinePerType));
        };
        let entity = PlayerLifelineEntity {
            id: next_id(&self.sequences.lifeline),
            room_id: lifeline.room_id,
            player_id: lifeline.player_id,
            lifeline_type: lifeline.lifeline_type,
            used_on_question_id: lifeline.used_on_question_id,
            used_at: SystemTime::now(),
        };
        slot.insert(entity.clone());
        Ok(entity)
    }
}

impl GameStore for MemoryGameStore {
    fn insert_room(&self, room: NewRoom) -> BoxFuture<'static, StorageResult<RoomEntity>> {
        self.run(move |inner| inner.insert_room(room))
    }

    fn find_room_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        self.run(move |inner| Ok(inner.find_room_by_code(&code)))
    }

    fn update_room_status(
        &self,
        id: RoomId,
        status: RoomStatus,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |inner| Ok(inner.update_room(id, |room| room.status = status)))
    }

    fn update_room_round(&self, id: RoomId, round: u32) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |inner| Ok(inner.update_room(id, |room| room.current_round = round)))
    }

    fn insert_team(&self, team: NewTeam) -> BoxFuture<'static, StorageResult<TeamEntity>> {
        self.run(move |inner| {
            let entity = TeamEntity {
                id: next_id(&inner.sequences.team),
                room_id: team.room_id,
                name: team.name,
                home_culture: team.home_culture,
                exchange_culture: team.exchange_culture,
                score: 0,
            };
            inner.teams.insert(entity.id, entity.clone());
            Ok(entity)
        })
    }

    fn find_team(&self, id: TeamId) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        self.run(move |inner| Ok(inner.teams.get(&id).map(|team| team.clone())))
    }

    fn list_teams(&self, room_id: RoomId) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        self.run(move |inner| {
            Ok(collect_sorted(
                &inner.teams,
                |team| team.room_id == room_id,
                |team| team.id,
            ))
        })
    }

    fn insert_player(&self, player: NewPlayer) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        self.run(move |inner| {
            let entity = PlayerEntity {
                id: next_id(&inner.sequences.player),
                room_id: player.room_id,
                team_id: None,
                user_id: player.user_id,
                display_name: player.display_name,
                is_ready: false,
                score: 0,
            };
            inner.players.insert(entity.id, entity.clone());
            Ok(entity)
        })
    }

    fn find_player(
        &self,
        id: PlayerId,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        self.run(move |inner| Ok(inner.players.get(&id).map(|player| player.clone())))
    }

    fn list_players(
        &self,
        room_id: RoomId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        self.run(move |inner| {
            Ok(collect_sorted(
                &inner.players,
                |player| player.room_id == room_id,
                |player| player.id,
            ))
        })
    }

    fn update_player_ready(
        &self,
        id: PlayerId,
        is_ready: bool,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        self.run(move |inner| Ok(inner.update_player(id, |player| player.is_ready = is_ready)))
    }

    fn update_player_team(
        &self,
        id: PlayerId,
        team_id: TeamId,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        self.run(move |inner| {
            Ok(inner.update_player(id, |player| player.team_id = Some(team_id)))
        })
    }

    fn insert_pack(&self, pack: NewPack) -> BoxFuture<'static, StorageResult<CulturalPackEntity>> {
        self.run(move |inner| {
            let entity = CulturalPackEntity {
                id: next_id(&inner.sequences.pack),
                name: pack.name,
                localized_name: pack.localized_name,
                description: pack.description,
                icon_url: pack.icon_url,
                is_premium: pack.is_premium,
            };
            inner.packs.insert(entity.id, entity.clone());
            Ok(entity)
        })
    }

    fn find_pack(
        &self,
        id: PackId,
    ) -> BoxFuture<'static, StorageResult<Option<CulturalPackEntity>>> {
        self.run(move |inner| Ok(inner.packs.get(&id).map(|pack| pack.clone())))
    }

    fn list_packs(&self) -> BoxFuture<'static, StorageResult<Vec<CulturalPackEntity>>> {
        self.run(|inner| Ok(collect_sorted(&inner.packs, |_| true, |pack| pack.id)))
    }

    fn insert_question(
        &self,
        question: NewQuestion,
    ) -> BoxFuture<'static, StorageResult<QuestionEntity>> {
        self.run(move |inner| {
            let entity = QuestionEntity {
                id: next_id(&inner.sequences.question),
                pack_id: question.pack_id,
                text: question.text,
                localized_text: question.localized_text,
                kind: question.kind,
                correct_answer: question.correct_answer,
                options: question.options,
                localized_options: question.localized_options,
                difficulty: question.difficulty,
            };
            inner.questions.insert(entity.id, entity.clone());
            Ok(entity)
        })
    }

    fn find_question(
        &self,
        id: QuestionId,
    ) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>> {
        self.run(move |inner| Ok(inner.questions.get(&id).map(|question| question.clone())))
    }

    fn list_questions(
        &self,
        pack_id: PackId,
    ) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        self.run(move |inner| {
            Ok(collect_sorted(
                &inner.questions,
                |question| question.pack_id == pack_id,
                |question| question.id,
            ))
        })
    }

    fn insert_session(
        &self,
        session: NewSession,
    ) -> BoxFuture<'static, StorageResult<GameSessionEntity>> {
        self.run(move |inner| inner.insert_session(session))
    }

    fn find_session(
        &self,
        room_id: RoomId,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>> {
        self.run(move |inner| Ok(inner.sessions.get(&room_id).map(|session| session.clone())))
    }

    fn update_session_progress(
        &self,
        id: SessionId,
        progress: SessionProgress,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |inner| Ok(inner.update_session_progress(id, progress)))
    }

    fn record_answer(
        &self,
        answer: NewAnswer,
    ) -> BoxFuture<'static, StorageResult<PlayerAnswerEntity>> {
        self.run(move |inner| inner.record_answer(answer))
    }

    fn list_answers(
        &self,
        room_id: RoomId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerAnswerEntity>>> {
        self.run(move |inner| {
            Ok(collect_sorted(
                &inner.answers,
                |answer| answer.room_id == room_id,
                |answer| answer.id,
            ))
        })
    }

    fn list_answers_for_question(
        &self,
        room_id: RoomId,
        question_id: QuestionId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerAnswerEntity>>> {
        self.run(move |inner| {
            Ok(collect_sorted(
                &inner.answers,
                |answer| answer.room_id == room_id && answer.question_id == question_id,
                |answer| answer.id,
            ))
        })
    }

    fn record_lifeline(
        &self,
        lifeline: NewLifeline,
    ) -> BoxFuture<'static, StorageResult<PlayerLifelineEntity>> {
        self.run(move |inner| inner.record_lifeline(lifeline))
    }

    fn list_lifelines(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerLifelineEntity>>> {
        self.run(move |inner| {
            Ok(collect_sorted(
                &inner.lifelines,
                |lifeline| lifeline.room_id == room_id && lifeline.player_id == player_id,
                |lifeline| lifeline.id,
            ))
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{DateTime, Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::info;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        AnswerDocument, CounterDocument, LifelineDocument, PackDocument, PlayerDocument,
        QuestionDocument, RoomDocument, SessionDocument, TeamDocument,
    },
};
use crate::dao::{
    game_store::GameStore,
    models::{
        CulturalPackEntity, GameSessionEntity, NewAnswer, NewLifeline, NewPack, NewPlayer,
        NewQuestion, NewRoom, NewSession, NewTeam, PackId, PlayerAnswerEntity, PlayerEntity,
        PlayerId, PlayerLifelineEntity, QuestionEntity, QuestionId, RoomEntity, RoomId,
        RoomStatus, RoundType, SessionId, SessionProgress, TeamEntity, TeamId,
    },
    storage::{Constraint, StorageResult},
};

const COUNTERS: &str = "counters";
const ROOMS: &str = "rooms";
const TEAMS: &str = "teams";
const PLAYERS: &str = "players";
const PACKS: &str = "packs";
const QUESTIONS: &str = "questions";
const SESSIONS: &str = "sessions";
const ANSWERS: &str = "answers";
const LIFELINES: &str = "lifelines";

/// Indexes created at startup: (collection, index name, keys, unique).
const INDEXES: &[(&str, &str, &[&str], bool)] = &[
    (ROOMS, "room_code_idx", &["code"], true),
    (TEAMS, "team_room_idx", &["room_id"], false),
    (PLAYERS, "player_room_idx", &["room_id"], false),
    (QUESTIONS, "question_pack_idx", &["pack_id"], false),
    (SESSIONS, "session_room_idx", &["room_id"], true),
    (
        ANSWERS,
        "answer_player_question_idx",
        &["room_id", "player_id", "question_id"],
        true,
    ),
    (
        LIFELINES,
        "lifeline_player_type_idx",
        &["room_id", "player_id", "lifeline_type"],
        true,
    ),
];

#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let client = self.state.read().await.client.clone();
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoGameStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;
        info!(database = %config.database_name, "connected to MongoDB");

        let store = Self {
            inner: Arc::new(MongoInner {
                state: RwLock::new(MongoState { client, database }),
                config,
            }),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        for &(collection, name, fields, unique) in INDEXES {
            let mut keys = Document::new();
            for field in fields {
                keys.insert(*field, 1);
            }
            let index = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(Some(name.to_owned()))
                        .unique(Some(unique))
                        .build(),
                )
                .build();

            self.collection::<Document>(collection)
                .await
                .create_index(index)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection,
                    index: name,
                    source,
                })?;
        }
        Ok(())
    }

    async fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        let guard = self.inner.state.read().await;
        guard.database.collection::<T>(name)
    }

    /// Allocate the next value of a named sequence.
    async fn next_id(&self, sequence: &'static str) -> MongoResult<i64> {
        let counter = self
            .collection::<CounterDocument>(COUNTERS)
            .await
            .find_one_and_update(doc! { "_id": sequence }, doc! { "$inc": { "seq": 1_i64 } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::NextId { sequence, source })?;
        Ok(counter.map_or(1, |counter| counter.seq))
    }

    async fn find_one<T, E>(&self, collection: &'static str, filter: Document) -> MongoResult<Option<E>>
    where
        T: DeserializeOwned + Send + Sync + Into<E>,
    {
        let document = self
            .collection::<T>(collection)
            .await
            .find_one(filter)
            .await
            .map_err(|source| MongoDaoError::Find { collection, source })?;
        Ok(document.map(Into::into))
    }

    /// Every document matching `filter`, ordered by primary key.
    async fn find_many<T, E>(&self, collection: &'static str, filter: Document) -> MongoResult<Vec<E>>
    where
        T: DeserializeOwned + Send + Sync + Into<E>,
    {
        let documents: Vec<T> = self
            .collection::<T>(collection)
            .await
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|source| MongoDaoError::Find { collection, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Find { collection, source })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn update_by_id(
        &self,
        collection: &'static str,
        id: i64,
        update: Document,
    ) -> MongoResult<bool> {
        let result = self
            .collection::<Document>(collection)
            .await
            .update_one(doc! { "_id": id }, update)
            .await
            .map_err(|source| MongoDaoError::Update { collection, source })?;
        Ok(result.matched_count > 0)
    }

    async fn update_player(&self, id: PlayerId, set: Document) -> MongoResult<Option<PlayerEntity>> {
        let document = self
            .collection::<PlayerDocument>(PLAYERS)
            .await
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::Update {
                collection: PLAYERS,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn insert_room(&self, room: NewRoom) -> MongoResult<RoomEntity> {
        let document = RoomDocument {
            id: self.next_id(ROOMS).await?,
            code: room.code,
            host_id: room.host_id,
            status: RoomStatus::Lobby,
            current_round: 0,
            created_at: DateTime::now(),
        };
        self.collection::<RoomDocument>(ROOMS)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::from_insert(ROOMS, Constraint::RoomCode, source))?;
        Ok(document.into())
    }

    async fn insert_team(&self, team: NewTeam) -> MongoResult<TeamEntity> {
        let document = TeamDocument {
            id: self.next_id(TEAMS).await?,
            room_id: team.room_id,
            name: team.name,
            home_culture: team.home_culture,
            exchange_culture: team.exchange_culture,
            score: 0,
        };
        self.collection::<TeamDocument>(TEAMS)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::Insert {
                collection: TEAMS,
                source,
            })?;
        Ok(document.into())
    }

    async fn insert_player(&self, player: NewPlayer) -> MongoResult<PlayerEntity> {
        let document = PlayerDocument {
            id: self.next_id(PLAYERS).await?,
            room_id: player.room_id,
            team_id: None,
            user_id: player.user_id,
            display_name: player.display_name,
            is_ready: false,
            score: 0,
        };
        self.collection::<PlayerDocument>(PLAYERS)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::Insert {
                collection: PLAYERS,
                source,
            })?;
        Ok(document.into())
    }

    async fn insert_pack(&self, pack: NewPack) -> MongoResult<CulturalPackEntity> {
        let document = PackDocument {
            id: self.next_id(PACKS).await?,
            name: pack.name,
            localized_name: pack.localized_name,
            description: pack.description,
            icon_url: pack.icon_url,
            is_premium: pack.is_premium,
        };
        self.collection::<PackDocument>(PACKS)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::Insert {
                collection: PACKS,
                source,
            })?;
        Ok(document.into())
    }

    async fn insert_question(&self, question: NewQuestion) -> MongoResult<QuestionEntity> {
        let document = QuestionDocument {
            id: self.next_id(QUESTIONS).await?,
            pack_id: question.pack_id,
            text: question.text,
            localized_text: question.localized_text,
            kind: question.kind,
            correct_answer: question.correct_answer,
            options: question.options,
            localized_options: question.localized_options,
            difficulty: question.difficulty,
        };
        self.collection::<QuestionDocument>(QUESTIONS)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::Insert {
                collection: QUESTIONS,
                source,
            })?;
        Ok(document.into())
    }

    async fn insert_session(&self, session: NewSession) -> MongoResult<GameSessionEntity> {
        let document = SessionDocument {
            id: self.next_id(SESSIONS).await?,
            room_id: session.room_id,
            pack_id: session.pack_id,
            current_question_index: 0,
            question_ids: session.question_ids,
            question_started_at: Some(DateTime::from_system_time(session.question_started_at)),
            round_type: RoundType::Standard,
            created_at: DateTime::now(),
        };
        self.collection::<SessionDocument>(SESSIONS)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| {
                MongoDaoError::from_insert(SESSIONS, Constraint::SessionPerRoom, source)
            })?;
        Ok(document.into())
    }

    async fn update_session_progress(
        &self,
        id: SessionId,
        progress: SessionProgress,
    ) -> MongoResult<bool> {
        let index = i64::try_from(progress.current_question_index).unwrap_or(i64::MAX);
        self.update_by_id(
            SESSIONS,
            id,
            doc! {
                "$set": {
                    "current_question_index": index,
                    "round_type": progress.round_type.as_str(),
                    "question_started_at": DateTime::from_system_time(progress.question_started_at),
                }
            },
        )
        .await
    }

    /// Insert the answer, then credit the player. The unique index rejects duplicates
    /// before any score change happens.
    async fn record_answer(&self, answer: NewAnswer) -> MongoResult<PlayerAnswerEntity> {
        let document = AnswerDocument {
            id: self.next_id(ANSWERS).await?,
            room_id: answer.room_id,
            player_id: answer.player_id,
            question_id: answer.question_id,
            round_number: answer.round_number,
            answer: answer.answer,
            is_correct: answer.is_correct,
            points_earned: answer.points_earned,
            answered_at: DateTime::now(),
        };
        self.collection::<AnswerDocument>(ANSWERS)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| {
                MongoDaoError::from_insert(ANSWERS, Constraint::AnswerPerQuestion, source)
            })?;

        if document.points_earned > 0 {
            self.update_by_id(
                PLAYERS,
                document.player_id,
                doc! { "$inc": { "score": i64::from(document.points_earned) } },
            )
            .await?;
        }
        Ok(document.into())
    }

    async fn record_lifeline(&self, lifeline: NewLifeline) -> MongoResult<PlayerLifelineEntity> {
        let document = LifelineDocument {
            id: self.next_id(LIFELINES).await?,
            room_id: lifeline.room_id,
            player_id: lifeline.player_id,
            lifeline_type: lifeline.lifeline_type,
            used_on_question_id: lifeline.used_on_question_id,
            used_at: DateTime::now(),
        };
        self.collection::<LifelineDocument>(LIFELINES)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| {
                MongoDaoError::from_insert(LIFELINES, Constraint::LifelinePerType, source)
            })?;
        Ok(document.into())
    }
}

impl GameStore for MongoGameStore {
    fn insert_room(&self, room: NewRoom) -> BoxFuture<'static, StorageResult<RoomEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_room(room).await.map_err(Into::into) })
    }

    fn find_room_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<RoomDocument, _>(ROOMS, doc! { "code": code })
                .await
                .map_err(Into::into)
        })
    }

    fn update_room_status(
        &self,
        id: RoomId,
        status: RoomStatus,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update_by_id(ROOMS, id, doc! { "$set": { "status": status.as_str() } })
                .await
                .map_err(Into::into)
        })
    }

    fn update_room_round(&self, id: RoomId, round: u32) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update_by_id(ROOMS, id, doc! { "$set": { "current_round": i64::from(round) } })
                .await
                .map_err(Into::into)
        })
    }

    fn insert_team(&self, team: NewTeam) -> BoxFuture<'static, StorageResult<TeamEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_team(team).await.map_err(Into::into) })
    }

    fn find_team(&self, id: TeamId) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<TeamDocument, _>(TEAMS, doc! { "_id": id })
                .await
                .map_err(Into::into)
        })
    }

    fn list_teams(&self, room_id: RoomId) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<TeamDocument, _>(TEAMS, doc! { "room_id": room_id })
                .await
                .map_err(Into::into)
        })
    }

    fn insert_player(&self, player: NewPlayer) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_player(player).await.map_err(Into::into) })
    }

    fn find_player(
        &self,
        id: PlayerId,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<PlayerDocument, _>(PLAYERS, doc! { "_id": id })
                .await
                .map_err(Into::into)
        })
    }

    fn list_players(
        &self,
        room_id: RoomId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<PlayerDocument, _>(PLAYERS, doc! { "room_id": room_id })
                .await
                .map_err(Into::into)
        })
    }

    fn update_player_ready(
        &self,
        id: PlayerId,
        is_ready: bool,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update_player(id, doc! { "is_ready": is_ready })
                .await
                .map_err(Into::into)
        })
    }

    fn update_player_team(
        &self,
        id: PlayerId,
        team_id: TeamId,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update_player(id, doc! { "team_id": team_id })
                .await
                .map_err(Into::into)
        })
    }

    fn insert_pack(&self, pack: NewPack) -> BoxFuture<'static, StorageResult<CulturalPackEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_pack(pack).await.map_err(Into::into) })
    }

    fn find_pack(
        &self,
        id: PackId,
    ) -> BoxFuture<'static, StorageResult<Option<CulturalPackEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<PackDocument, _>(PACKS, doc! { "_id": id })
                .await
                .map_err(Into::into)
        })
    }

    fn list_packs(&self) -> BoxFuture<'static, StorageResult<Vec<CulturalPackEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<PackDocument, _>(PACKS, doc! {})
                .await
                .map_err(Into::into)
        })
    }

    fn insert_question(
        &self,
        question: NewQuestion,
    ) -> BoxFuture<'static, StorageResult<QuestionEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_question(question).await.map_err(Into::into) })
    }

    fn find_question(
        &self,
        id: QuestionId,
    ) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<QuestionDocument, _>(QUESTIONS, doc! { "_id": id })
                .await
                .map_err(Into::into)
        })
    }

    fn list_questions(
        &self,
        pack_id: PackId,
    ) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<QuestionDocument, _>(QUESTIONS, doc! { "pack_id": pack_id })
                .await
                .map_err(Into::into)
        })
    }

    fn insert_session(
        &self,
        session: NewSession,
    ) -> BoxFuture<'static, StorageResult<GameSessionEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_session(session).await.map_err(Into::into) })
    }

    fn find_session(
        &self,
        room_id: RoomId,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<SessionDocument, _>(SESSIONS, doc! { "room_id": room_id })
                .await
                .map_err(Into::into)
        })
    }

    fn update_session_progress(
        &self,
        id: SessionId,
        progress: SessionProgress,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update_session_progress(id, progress)
                .await
                .map_err(Into::into)
        })
    }

    fn record_answer(
        &self,
        answer: NewAnswer,
    ) -> BoxFuture<'static, StorageResult<PlayerAnswerEntity>> {
        let store = self.clone();
        Box::pin(async move { store.record_answer(answer).await.map_err(Into::into) })
    }

    fn list_answers(
        &self,
        room_id: RoomId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerAnswerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<AnswerDocument, _>(ANSWERS, doc! { "room_id": room_id })
                .await
                .map_err(Into::into)
        })
    }

    fn list_answers_for_question(
        &self,
        room_id: RoomId,
        question_id: QuestionId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerAnswerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<AnswerDocument, _>(
                    ANSWERS,
                    doc! { "room_id": room_id, "question_id": question_id },
                )
                .await
                .map_err(Into::into)
        })
    }

    fn record_lifeline(
        &self,
        lifeline: NewLifeline,
    ) -> BoxFuture<'static, StorageResult<PlayerLifelineEntity>> {
        let store = self.clone();
        Box::pin(async move { store.record_lifeline(lifeline).await.map_err(Into::into) })
    }

    fn list_lifelines(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerLifelineEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<LifelineDocument, _>(
                    LIFELINES,
                    doc! { "room_id": room_id, "player_id": player_id },
                )
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}

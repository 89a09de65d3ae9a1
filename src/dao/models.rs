use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;

/// Identifier of a game room.
pub type RoomId = i64;
/// Identifier of a player inside a room.
pub type PlayerId = i64;
/// Identifier of a team inside a room.
pub type TeamId = i64;
/// Identifier of a cultural pack.
pub type PackId = i64;
/// Identifier of a question.
pub type QuestionId = i64;
/// Identifier of a game session.
pub type SessionId = i64;

/// Lifecycle status of a room.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Players are joining; no session exists yet.
    #[default]
    Lobby,
    /// A session is running.
    Playing,
    /// The session reached the end of its question list.
    Finished,
}

impl RoomStatus {
    /// Stable lowercase label used in storage filters and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Lobby => "lobby",
            RoomStatus::Playing => "playing",
            RoomStatus::Finished => "finished",
        }
    }
}

/// Kind of question, which drives how clients render it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick one of the listed options.
    MultipleChoice,
    /// Free-form numeric answer.
    Numerical,
    /// Find the link between several clues.
    FindLink,
}

/// Difficulty tier of a question; selects the base points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// 100 base points.
    Easy,
    /// 150 base points.
    #[default]
    Medium,
    /// 200 base points.
    Hard,
}

/// Position-based scoring tier of the current question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    /// Regular points.
    #[default]
    Standard,
    /// Points multiplied by 1.5 (floored).
    Speed,
    /// Points doubled.
    Final,
}

impl RoundType {
    /// Stable lowercase label used in storage updates and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            RoundType::Standard => "standard",
            RoundType::Speed => "speed",
            RoundType::Final => "final",
        }
    }
}

/// One-time player aids.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LifelineType {
    /// Remove two wrong options.
    FiftyFifty,
    /// Receive a hint from a "native".
    AskNative,
    /// Reveal the localized question text and options.
    Translate,
}

impl LifelineType {
    /// Stable lowercase label used in storage filters and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            LifelineType::FiftyFifty => "fifty_fifty",
            LifelineType::AskNative => "ask_native",
            LifelineType::Translate => "translate",
        }
    }
}

/// Persisted game room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomEntity {
    /// Primary key of the room.
    pub id: RoomId,
    /// Short join code shown on the host screen.
    pub code: String,
    /// Identifier of the hosting user (0 for anonymous hosts).
    pub host_id: i64,
    /// Current lifecycle status.
    pub status: RoomStatus,
    /// Round number shown to players (0 before the game starts).
    pub current_round: u32,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

/// Insert payload for [`RoomEntity`].
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub code: String,
    pub host_id: i64,
}

/// Persisted team inside a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Primary key of the team.
    pub id: TeamId,
    /// Owning room.
    pub room_id: RoomId,
    /// Display name of the team.
    pub name: String,
    /// Culture the team represents.
    pub home_culture: Option<String>,
    /// Culture the team is quizzed on.
    pub exchange_culture: Option<String>,
    /// Team score.
    pub score: i32,
}

/// Insert payload for [`TeamEntity`].
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub room_id: RoomId,
    pub name: String,
    pub home_culture: Option<String>,
    pub exchange_culture: Option<String>,
}

/// Persisted player inside a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Primary key of the player.
    pub id: PlayerId,
    /// Owning room.
    pub room_id: RoomId,
    /// Optional team membership.
    pub team_id: Option<TeamId>,
    /// Authenticated user behind the player, if any.
    pub user_id: Option<i64>,
    /// Name chosen when joining.
    pub display_name: String,
    /// Whether the player flagged themselves ready in the lobby.
    pub is_ready: bool,
    /// Cumulative score, authoritative for results.
    pub score: u32,
}

/// Insert payload for [`PlayerEntity`].
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub room_id: RoomId,
    pub user_id: Option<i64>,
    pub display_name: String,
}

/// Themed collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CulturalPackEntity {
    /// Primary key of the pack.
    pub id: PackId,
    /// Display name.
    pub name: String,
    /// Localized display name.
    pub localized_name: Option<String>,
    /// Short description shown in the pack picker.
    pub description: Option<String>,
    /// Icon shown in the pack picker.
    pub icon_url: Option<String>,
    /// Whether the pack requires a premium account.
    pub is_premium: bool,
}

/// Insert payload for [`CulturalPackEntity`].
#[derive(Debug, Clone)]
pub struct NewPack {
    pub name: String,
    pub localized_name: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub is_premium: bool,
}

/// Question reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionEntity {
    /// Primary key of the question.
    pub id: QuestionId,
    /// Pack the question belongs to.
    pub pack_id: PackId,
    /// Question text.
    pub text: String,
    /// Localized question text.
    pub localized_text: Option<String>,
    /// Rendering kind.
    pub kind: QuestionKind,
    /// Expected answer, compared verbatim against submissions.
    pub correct_answer: String,
    /// Serialized JSON array of options.
    pub options: Option<String>,
    /// Serialized JSON array of localized options.
    pub localized_options: Option<String>,
    /// Difficulty tier.
    pub difficulty: Difficulty,
}

/// Insert payload for [`QuestionEntity`].
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub pack_id: PackId,
    pub text: String,
    pub localized_text: Option<String>,
    pub kind: QuestionKind,
    pub correct_answer: String,
    pub options: Option<String>,
    pub localized_options: Option<String>,
    pub difficulty: Difficulty,
}

/// Run-state of the game played in a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSessionEntity {
    /// Primary key of the session.
    pub id: SessionId,
    /// Room the session belongs to (at most one session per room).
    pub room_id: RoomId,
    /// Pack the questions were drawn from.
    pub pack_id: PackId,
    /// Index into `question_ids` of the question being played.
    pub current_question_index: usize,
    /// Shuffled question order, fixed at session creation.
    pub question_ids: Vec<QuestionId>,
    /// When the current question was put on screen.
    pub question_started_at: Option<SystemTime>,
    /// Scoring tier of the current question.
    pub round_type: RoundType,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

impl GameSessionEntity {
    /// Identifier of the question at the current index, if the list is not exhausted.
    pub fn current_question_id(&self) -> Option<QuestionId> {
        self.question_ids.get(self.current_question_index).copied()
    }
}

/// Insert payload for [`GameSessionEntity`].
#[derive(Debug, Clone)]
pub struct NewSession {
    pub room_id: RoomId,
    pub pack_id: PackId,
    pub question_ids: Vec<QuestionId>,
    pub question_started_at: SystemTime,
}

/// Progress update written when the host advances to the next question.
#[derive(Debug, Clone)]
pub struct SessionProgress {
    pub current_question_index: usize,
    pub round_type: RoundType,
    pub question_started_at: SystemTime,
}

/// Recorded answer. Unique per (room, player, question).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAnswerEntity {
    /// Primary key of the answer.
    pub id: i64,
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub question_id: QuestionId,
    /// Room round at submission time.
    pub round_number: u32,
    /// Raw submitted answer.
    pub answer: String,
    pub is_correct: bool,
    pub points_earned: u32,
    pub answered_at: SystemTime,
}

/// Insert payload for [`PlayerAnswerEntity`].
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub question_id: QuestionId,
    pub round_number: u32,
    pub answer: String,
    pub is_correct: bool,
    pub points_earned: u32,
}

/// Recorded lifeline usage. Unique per (room, player, lifeline type).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerLifelineEntity {
    /// Primary key of the usage record.
    pub id: i64,
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub lifeline_type: LifelineType,
    pub used_on_question_id: QuestionId,
    pub used_at: SystemTime,
}

/// Insert payload for [`PlayerLifelineEntity`].
#[derive(Debug, Clone)]
pub struct NewLifeline {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub lifeline_type: LifelineType,
    pub used_on_question_id: QuestionId,
}

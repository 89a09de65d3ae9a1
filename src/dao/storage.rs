use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Uniqueness constraints enforced by every storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// One room per join code.
    RoomCode,
    /// One session per room.
    SessionPerRoom,
    /// One answer per (room, player, question).
    AnswerPerQuestion,
    /// One usage per (room, player, lifeline type).
    LifelinePerType,
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Constraint::RoomCode => "room code",
            Constraint::SessionPerRoom => "session per room",
            Constraint::AnswerPerQuestion => "answer per question",
            Constraint::LifelinePerType => "lifeline per type",
        };
        f.write_str(name)
    }
}

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A conditional insert hit an existing record.
    #[error("unique constraint violated: {0}")]
    Conflict(Constraint),
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Return the violated constraint when this is a conflict.
    pub fn conflict(&self) -> Option<Constraint> {
        match self {
            StorageError::Conflict(constraint) => Some(*constraint),
            StorageError::Unavailable { .. } => None,
        }
    }
}

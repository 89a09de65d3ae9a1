use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::{
    dao::storage::{Constraint, StorageError},
    state::state_machine::InvalidTransition,
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
    /// Operation cannot be performed in the current room status.
    #[error("{0}")]
    InvalidState(String),
    /// The player already answered the current question.
    #[error("Already answered this question")]
    AlreadyAnswered,
    /// The player already used this lifeline in the room.
    #[error("Lifeline already used")]
    AlreadyUsed,
    /// The selected pack has no questions.
    #[error("No questions available")]
    EmptyPack,
    /// The room has no game session yet.
    #[error("Game session not found")]
    SessionMissing,
    /// The session index points past the question list.
    #[error("No current question")]
    NoCurrentQuestion,
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
}

impl ServiceError {
    pub(crate) fn room_not_found() -> Self {
        ServiceError::NotFound("Room not found".into())
    }
}

impl From<StorageError> for ServiceError {
    /// Conflicts that callers did not translate themselves still surface as state errors.
    fn from(err: StorageError) -> Self {
        match err.conflict() {
            Some(Constraint::AnswerPerQuestion) => ServiceError::AlreadyAnswered,
            Some(Constraint::LifelinePerType) => ServiceError::AlreadyUsed,
            Some(Constraint::SessionPerRoom) => {
                ServiceError::InvalidState("Game already started".into())
            }
            Some(Constraint::RoomCode) | None => ServiceError::Unavailable(err),
        }
    }
}

impl From<InvalidTransition> for ServiceError {
    fn from(err: InvalidTransition) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("{0}")]
    Conflict(String),
    /// Well-formed request that cannot be served with the current data.
    #[error("{0}")]
    Unprocessable(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::NotFound(_) | ServiceError::SessionMissing => AppError::NotFound(message),
            ServiceError::InvalidState(_)
            | ServiceError::AlreadyAnswered
            | ServiceError::AlreadyUsed
            | ServiceError::NoCurrentQuestion => AppError::Conflict(message),
            ServiceError::EmptyPack => AppError::Unprocessable(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
        }
    }
}

/// JSON body returned with every error status.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human readable reason.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_conflicts_map_to_domain_errors() {
        assert!(matches!(
            ServiceError::from(StorageError::Conflict(Constraint::AnswerPerQuestion)),
            ServiceError::AlreadyAnswered
        ));
        assert!(matches!(
            ServiceError::from(StorageError::Conflict(Constraint::LifelinePerType)),
            ServiceError::AlreadyUsed
        ));
        assert!(matches!(
            ServiceError::from(StorageError::Conflict(Constraint::SessionPerRoom)),
            ServiceError::InvalidState(_)
        ));
    }

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::room_not_found(), StatusCode::NOT_FOUND),
            (ServiceError::SessionMissing, StatusCode::NOT_FOUND),
            (ServiceError::AlreadyAnswered, StatusCode::CONFLICT),
            (ServiceError::AlreadyUsed, StatusCode::CONFLICT),
            (ServiceError::NoCurrentQuestion, StatusCode::CONFLICT),
            (
                ServiceError::InvalidState("Game already started".into()),
                StatusCode::CONFLICT,
            ),
            (ServiceError::EmptyPack, StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Degraded, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}

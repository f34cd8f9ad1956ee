//! Service layer errors.

use crate::DbError;
use flux_board::{EngineError, PlayError};

/// Errors raised by the profile, referral and game services.
#[derive(Debug, Clone, derive_more::Display)]
pub enum ServiceError {
    /// The request is malformed or breaks a rule (e.g. self-referral).
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),

    /// A referenced user or game state does not exist.
    #[display("{} not found", _0)]
    NotFound(String),

    /// The request conflicts with stored state.
    #[display("Conflict: {}", _0)]
    Conflict(String),

    /// Persistence failed.
    #[display("{}", _0)]
    Database(DbError),

    /// The board engine failed.
    #[display("Engine error: {}", _0)]
    Engine(EngineError),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Database(err) => Some(err),
            ServiceError::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        ServiceError::Database(err)
    }
}

impl From<EngineError> for ServiceError {
    fn from(err: EngineError) -> Self {
        ServiceError::Engine(err)
    }
}

impl From<PlayError> for ServiceError {
    fn from(err: PlayError) -> Self {
        match err {
            PlayError::NoMovesRemaining => ServiceError::Conflict(err.to_string()),
            PlayError::NotAdjacent { .. } => ServiceError::InvalidRequest(err.to_string()),
            PlayError::Engine(engine) => ServiceError::Engine(engine),
        }
    }
}

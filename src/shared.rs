use thiserror::Error;

use crate::game::GameError;
use crate::score::PersistError;

/// Failures surfaced by the session registry to its callers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        AppError::InvalidArgument(err.to_string())
    }
}

use thiserror::Error;

/// Failure reported by a score sink. The registry forwards it untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

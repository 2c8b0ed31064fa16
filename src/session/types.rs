use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::AppError;

/// Registry-issued identifier of one game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a session id from a raw request segment
pub fn parse_session_id(raw: &str) -> Result<SessionId, AppError> {
    raw.trim()
        .parse::<u64>()
        .map(SessionId)
        .map_err(|_| AppError::InvalidArgument(format!("The game id is invalid: {:?}", raw)))
}

/// Parses a card index from a raw request segment
pub fn parse_card_index(raw: &str) -> Result<usize, AppError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| AppError::InvalidArgument(format!("The card id is invalid: {:?}", raw)))
}

/// Parses a pair count; zero is rejected along with non-numeric input
pub fn parse_pair_count(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(AppError::InvalidArgument(format!(
            "Pair count must be a positive integer: {:?}",
            raw
        ))),
    }
}

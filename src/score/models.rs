use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{PersistError, ScoreSink};

/// Longest player name the score table accepts.
pub const MAX_PLAYER_NAME_LEN: usize = 50;

/// Database model for the player_scores table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PersistedScore {
    pub id: i64,
    pub player_name: String,
    pub completion_time: f64, // Seconds from first flip to the last match
    pub moves: i64,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a game's result, taken while the registry lock is held and
/// submitted after it is released.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub player_name: String,
    pub elapsed_seconds: f64,
    pub flip_count: u64,
}

impl ScoreCard {
    pub async fn submit_to(&self, sink: &dyn ScoreSink) -> Result<PersistedScore, PersistError> {
        sink.submit(&self.player_name, self.elapsed_seconds, self.flip_count)
            .await
    }
}

/// Checks a score before it is written and returns the trimmed player name.
pub fn validate_score(
    player_name: &str,
    completion_time: f64,
    moves: u64,
) -> Result<(String, f64, i64), PersistError> {
    let name = player_name.trim();
    if name.is_empty() {
        return Err(PersistError::Validation(
            "Player name must be a non-empty string".to_string(),
        ));
    }
    if name.chars().count() > MAX_PLAYER_NAME_LEN {
        return Err(PersistError::Validation(format!(
            "Player name must be at most {} characters",
            MAX_PLAYER_NAME_LEN
        )));
    }
    if !completion_time.is_finite() || completion_time < 0.0 {
        return Err(PersistError::Validation(
            "Completion time must be a non-negative number".to_string(),
        ));
    }
    let moves = i64::try_from(moves)
        .map_err(|_| PersistError::Validation("Move count is too large".to_string()))?;

    Ok((name.to_string(), completion_time, moves))
}

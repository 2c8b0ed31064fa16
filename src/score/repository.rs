use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{validate_score, PersistedScore};
use super::PersistError;

/// Durable destination for a finished game's result
#[async_trait]
pub trait ScoreSink: Send + Sync {
    async fn submit(
        &self,
        player_name: &str,
        elapsed_seconds: f64,
        flip_count: u64,
    ) -> Result<PersistedScore, PersistError>;
}

/// Score sink that can also answer leaderboard queries
#[async_trait]
pub trait ScoreRepository: ScoreSink {
    /// Fastest completions first; ties go to the fewer moves.
    async fn top_scores(&self, limit: usize) -> Result<Vec<PersistedScore>, PersistError>;
    async fn has_player(&self, player_name: &str) -> Result<bool, PersistError>;
}

/// In-memory implementation of ScoreRepository for development and testing
///
/// Scores are lost when the application restarts.
#[derive(Debug, Default)]
pub struct InMemoryScoreRepository {
    scores: Mutex<Vec<PersistedScore>>,
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded scores
    pub fn score_count(&self) -> usize {
        self.scores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl ScoreSink for InMemoryScoreRepository {
    #[instrument(skip(self))]
    async fn submit(
        &self,
        player_name: &str,
        elapsed_seconds: f64,
        flip_count: u64,
    ) -> Result<PersistedScore, PersistError> {
        let (player_name, completion_time, moves) =
            validate_score(player_name, elapsed_seconds, flip_count).map_err(|e| {
                warn!(error = %e, "Rejected score");
                e
            })?;

        let mut scores = self
            .scores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let score = PersistedScore {
            id: scores.len() as i64 + 1,
            player_name,
            completion_time,
            moves,
            created_at: Utc::now(),
        };
        scores.push(score.clone());

        debug!(score_id = score.id, player_name = %score.player_name, "Score recorded in memory");
        Ok(score)
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    #[instrument(skip(self))]
    async fn top_scores(&self, limit: usize) -> Result<Vec<PersistedScore>, PersistError> {
        let mut scores = self
            .scores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        scores.sort_by(|a, b| {
            a.completion_time
                .total_cmp(&b.completion_time)
                .then(a.moves.cmp(&b.moves))
                .then(a.id.cmp(&b.id))
        });
        scores.truncate(limit);
        Ok(scores)
    }

    #[instrument(skip(self))]
    async fn has_player(&self, player_name: &str) -> Result<bool, PersistError> {
        let scores = self
            .scores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let player_name = player_name.trim();
        Ok(scores.iter().any(|score| score.player_name == player_name))
    }
}

/// PostgreSQL implementation of the score repository
pub struct PostgresScoreRepository {
    pool: PgPool,
}

impl PostgresScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the player_scores table if it does not exist yet
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), PersistError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS player_scores (
                id BIGSERIAL PRIMARY KEY,
                player_name VARCHAR(50) NOT NULL,
                completion_time DOUBLE PRECISION NOT NULL,
                moves BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create player_scores table");
            PersistError::Database(e.to_string())
        })?;

        debug!("player_scores table ready");
        Ok(())
    }
}

#[async_trait]
impl ScoreSink for PostgresScoreRepository {
    #[instrument(skip(self))]
    async fn submit(
        &self,
        player_name: &str,
        elapsed_seconds: f64,
        flip_count: u64,
    ) -> Result<PersistedScore, PersistError> {
        let (player_name, completion_time, moves) =
            validate_score(player_name, elapsed_seconds, flip_count)?;

        let score = sqlx::query_as::<_, PersistedScore>(
            "INSERT INTO player_scores (player_name, completion_time, moves, created_at) VALUES ($1, $2, $3, $4) RETURNING id, player_name, completion_time, moves, created_at"
        )
        .bind(&player_name)
        .bind(completion_time)
        .bind(moves)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, player_name = %player_name, "Failed to insert score into database");
            PersistError::Database(e.to_string())
        })?;

        debug!(score_id = score.id, player_name = %score.player_name, "Score recorded in database");
        Ok(score)
    }
}

#[async_trait]
impl ScoreRepository for PostgresScoreRepository {
    #[instrument(skip(self))]
    async fn top_scores(&self, limit: usize) -> Result<Vec<PersistedScore>, PersistError> {
        sqlx::query_as::<_, PersistedScore>(
            "SELECT id, player_name, completion_time, moves, created_at FROM player_scores ORDER BY completion_time ASC, moves ASC, id ASC LIMIT $1"
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch leaderboard from database");
            PersistError::Database(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn has_player(&self, player_name: &str) -> Result<bool, PersistError> {
        let row = sqlx::query("SELECT 1 FROM player_scores WHERE player_name = $1 LIMIT 1")
            .bind(player_name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, player_name = %player_name, "Failed to look up player");
                PersistError::Database(e.to_string())
            })?;

        Ok(row.is_some())
    }
}

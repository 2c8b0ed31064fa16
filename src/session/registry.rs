use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::types::SessionId;
use crate::config::DEFAULT_PAIR_COUNT;
use crate::game::{Board, Game};
use crate::score::{PersistedScore, ScoreSink};
use crate::shared::AppError;

struct Sessions {
    games: HashMap<SessionId, Game>,
    next_id: u64,
}

impl Sessions {
    fn insert(&mut self, game: Game) -> SessionId {
        // Ids are never reissued, so a stale id can only ever miss.
        self.next_id += 1;
        let id = SessionId::new(self.next_id);
        self.games.insert(id, game);
        id
    }
}

/// Owns every live game, keyed by session id.
///
/// A single lock guards the whole map. Each operation holds it only while it
/// looks up and mutates the game in memory; score persistence runs after the
/// lock is released.
pub struct SessionRegistry {
    sessions: Mutex<Sessions>,
    score_sink: Arc<dyn ScoreSink>,
    default_pair_count: usize,
}

impl SessionRegistry {
    pub fn new(score_sink: Arc<dyn ScoreSink>) -> Self {
        Self::with_default_pair_count(score_sink, DEFAULT_PAIR_COUNT)
    }

    pub fn with_default_pair_count(
        score_sink: Arc<dyn ScoreSink>,
        default_pair_count: usize,
    ) -> Self {
        Self {
            sessions: Mutex::new(Sessions {
                games: HashMap::new(),
                next_id: 0,
            }),
            score_sink,
            default_pair_count,
        }
    }

    // Every mutation is a single insert or remove, so a poisoned map is still
    // consistent.
    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `op` on the session's game while holding the lock, touching the
    /// session first.
    fn with_game<T>(
        &self,
        session_id: SessionId,
        op: impl FnOnce(&mut Game) -> T,
    ) -> Result<T, AppError> {
        let mut sessions = self.lock();
        let game = sessions.games.get_mut(&session_id).ok_or_else(|| {
            debug!(session_id = %session_id, "Session not found");
            not_found(session_id)
        })?;
        game.touch();
        Ok(op(game))
    }

    #[instrument(skip(self))]
    pub fn create_game(&self, pair_count: usize) -> Result<SessionId, AppError> {
        let game = Game::new(pair_count)?;
        let session_id = self.lock().insert(game);

        info!(session_id = %session_id, pair_count = pair_count, "Game created");
        Ok(session_id)
    }

    pub fn create_default_game(&self) -> Result<SessionId, AppError> {
        self.create_game(self.default_pair_count)
    }

    /// Registers a game dealt from a fixed layout instead of a shuffle
    #[instrument(skip(self))]
    pub fn create_game_from_layout(&self, values: Vec<usize>) -> Result<SessionId, AppError> {
        let game = Game::with_board(Board::from_values(values)?);
        let session_id = self.lock().insert(game);

        info!(session_id = %session_id, "Game created from fixed layout");
        Ok(session_id)
    }

    /// Flips a card and returns its secret value, or `-1` when the flip had
    /// no effect.
    #[instrument(skip(self))]
    pub fn flip(&self, session_id: SessionId, card_index: usize) -> Result<i64, AppError> {
        let outcome = self.with_game(session_id, |game| game.flip(card_index))??;

        debug!(session_id = %session_id, card_index = card_index, outcome = ?outcome, "Card flipped");
        Ok(outcome.to_code())
    }

    #[instrument(skip(self))]
    pub fn elapsed_seconds(&self, session_id: SessionId) -> Result<f64, AppError> {
        self.with_game(session_id, |game| game.elapsed_seconds())
    }

    #[instrument(skip(self))]
    pub fn flip_count(&self, session_id: SessionId) -> Result<u64, AppError> {
        self.with_game(session_id, |game| game.flip_count())
    }

    #[instrument(skip(self))]
    pub fn detect_finished(&self, session_id: SessionId) -> Result<bool, AppError> {
        self.with_game(session_id, |game| game.is_finished())
    }

    /// Replaces a session with a fresh deal of the same size.
    ///
    /// The old id is invalidated; the returned id is a new one.
    #[instrument(skip(self))]
    pub fn reset_game(&self, session_id: SessionId) -> Result<SessionId, AppError> {
        let mut sessions = self.lock();
        let pair_count = sessions
            .games
            .get(&session_id)
            .map(Game::pair_count)
            .ok_or_else(|| not_found(session_id))?;

        // Deal before removing so a failure leaves the old session in place
        let game = Game::new(pair_count)?;
        sessions.games.remove(&session_id);
        let new_session_id = sessions.insert(game);

        info!(
            old_session_id = %session_id,
            new_session_id = %new_session_id,
            pair_count = pair_count,
            "Game reset"
        );
        Ok(new_session_id)
    }

    #[instrument(skip(self))]
    pub fn delete_game(&self, session_id: SessionId) -> Result<bool, AppError> {
        let mut sessions = self.lock();
        if sessions.games.remove(&session_id).is_none() {
            warn!(session_id = %session_id, "Session not found for deletion");
            return Err(not_found(session_id));
        }

        info!(session_id = %session_id, "Game deleted");
        Ok(true)
    }

    /// Persists the session's current time and flip count under `player_name`.
    ///
    /// The result is read under the lock and written after releasing it, so a
    /// slow sink never blocks other sessions. The game itself is left as is.
    #[instrument(skip(self))]
    pub async fn submit_game(
        &self,
        session_id: SessionId,
        player_name: &str,
    ) -> Result<PersistedScore, AppError> {
        let score_card = self.with_game(session_id, |game| game.score_card(player_name))?;

        let score = score_card
            .submit_to(self.score_sink.as_ref())
            .await
            .map_err(|e| {
                warn!(session_id = %session_id, error = %e, "Score submission failed");
                AppError::Persist(e)
            })?;

        info!(
            session_id = %session_id,
            score_id = score.id,
            completion_time = score.completion_time,
            moves = score.moves,
            "Score submitted"
        );
        Ok(score)
    }

    /// Evicts every session idle for longer than `idle_threshold`
    #[instrument(skip(self))]
    pub fn reap_idle(&self, idle_threshold: Duration) -> usize {
        let mut sessions = self.lock();
        let before = sessions.games.len();
        sessions.games.retain(|session_id, game| {
            let expired = game.can_expire(idle_threshold);
            if expired {
                debug!(session_id = %session_id, "Evicting idle session");
            }
            !expired
        });

        before - sessions.games.len()
    }

    /// Whether the session exists. Does not count as activity.
    pub fn contains(&self, session_id: SessionId) -> bool {
        self.lock().games.contains_key(&session_id)
    }

    pub fn len(&self) -> usize {
        self.lock().games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn not_found(session_id: SessionId) -> AppError {
    AppError::NotFound(format!("The game doesn't exist: {}", session_id))
}

// Public API
pub use errors::PersistError;
pub use models::{validate_score, PersistedScore, ScoreCard, MAX_PLAYER_NAME_LEN};
pub use repository::{
    InMemoryScoreRepository, PostgresScoreRepository, ScoreRepository, ScoreSink,
};

// Internal modules
mod errors;
mod models;
mod repository;

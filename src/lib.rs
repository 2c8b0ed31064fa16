// Library crate for the concentration game engine
// Score persistence lives under `score::`; the registry surface is re-exported here

pub mod config;
pub mod game;
pub mod score;
pub mod session;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use game::{Board, FlipOutcome, Game, GameError};
pub use session::{spawn_reaper, ReaperConfig, ReaperHandle, SessionId, SessionRegistry};
pub use shared::AppError;

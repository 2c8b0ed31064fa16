// Public API
pub use board::{Board, FlipOutcome, GameError, MAX_PAIR_COUNT};
pub use card::Card;
pub use logic::Game;

// Internal modules
mod board;
mod card;
mod logic;

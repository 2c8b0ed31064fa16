// Public API - what other modules can use
pub use reaper::{spawn_reaper, ReaperConfig, ReaperHandle};
pub use registry::SessionRegistry;
pub use types::{parse_card_index, parse_pair_count, parse_session_id, SessionId};

// Internal modules
mod reaper;
mod registry;
mod types;

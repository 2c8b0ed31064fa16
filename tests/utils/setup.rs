use std::sync::Arc;

use concentration::{
    score::{InMemoryScoreRepository, ScoreSink},
    SessionId, SessionRegistry,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Board with values [0,1,1,0] followed by [2,3,3,2]
pub const SCENARIO_LAYOUT: [usize; 8] = [0, 1, 1, 0, 2, 3, 3, 2];

/// Index pairs that clear `SCENARIO_LAYOUT`
pub const SCENARIO_PAIRS: [(usize, usize); 4] = [(0, 3), (1, 2), (4, 7), (5, 6)];

pub struct TestSetup {
    pub registry: Arc<SessionRegistry>,
    pub scores: Arc<InMemoryScoreRepository>,
    pub sessions: Vec<SessionId>,
}

impl TestSetup {
    /// Plays every pair of the scenario layout on the given session
    pub fn clear_board(&self, session_id: SessionId) {
        for (first, second) in SCENARIO_PAIRS {
            self.registry.flip(session_id, first).unwrap();
            self.registry.flip(session_id, second).unwrap();
        }
    }
}

pub struct TestSetupBuilder {
    session_count: usize,
    score_sink: Option<Arc<dyn ScoreSink>>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            session_count: 0,
            score_sink: None,
        }
    }

    /// Pre-creates sessions dealt from `SCENARIO_LAYOUT`
    pub fn with_scenario_sessions(mut self, count: usize) -> Self {
        self.session_count = count;
        self
    }

    pub fn with_score_sink(mut self, sink: Arc<dyn ScoreSink>) -> Self {
        self.score_sink = Some(sink);
        self
    }

    pub fn build(self) -> TestSetup {
        let scores = Arc::new(InMemoryScoreRepository::new());
        let sink = self
            .score_sink
            .unwrap_or_else(|| scores.clone() as Arc<dyn ScoreSink>);
        let registry = Arc::new(SessionRegistry::new(sink));

        let sessions = (0..self.session_count)
            .map(|_| {
                registry
                    .create_game_from_layout(SCENARIO_LAYOUT.to_vec())
                    .unwrap()
            })
            .collect();

        TestSetup {
            registry,
            scores,
            sessions,
        }
    }
}

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

use concentration::score::{InMemoryScoreRepository, PersistError, PersistedScore, ScoreSink};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Score sink that parks every submission until the test opens the gate
#[derive(Default)]
pub struct GatedScoreSink {
    inner: InMemoryScoreRepository,
    gate: Notify,
    entered: Notify,
    waiting: AtomicUsize,
}

impl GatedScoreSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves once a submission is parked on the gate
    pub async fn wait_for_submission(&self) {
        loop {
            let entered = self.entered.notified();
            tokio::pin!(entered);
            entered.as_mut().enable();

            if self.waiting.load(Ordering::SeqCst) > 0 {
                return;
            }
            entered.await;
        }
    }

    pub fn open(&self) {
        self.gate.notify_waiters();
    }

    pub fn score_count(&self) -> usize {
        self.inner.score_count()
    }
}

#[async_trait]
impl ScoreSink for GatedScoreSink {
    async fn submit(
        &self,
        player_name: &str,
        elapsed_seconds: f64,
        flip_count: u64,
    ) -> Result<PersistedScore, PersistError> {
        let opened = self.gate.notified();
        tokio::pin!(opened);
        opened.as_mut().enable();

        self.waiting.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_waiters();
        opened.await;
        self.waiting.fetch_sub(1, Ordering::SeqCst);

        self.inner
            .submit(player_name, elapsed_seconds, flip_count)
            .await
    }
}

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info, instrument};

use super::registry::SessionRegistry;

/// Configuration for the idle-session reaper
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    /// How often to scan the registry
    pub reap_interval: Duration,
    /// How long a session must be untouched before eviction
    pub idle_threshold: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            reap_interval: Duration::from_secs(60),   // 1 minute
            idle_threshold: Duration::from_secs(600), // 10 minutes
        }
    }
}

/// Handle to a running reaper task
pub struct ReaperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Stops the reaper and waits for its current pass to finish
    pub async fn shutdown(self) {
        // The task may already be gone if the runtime is shutting down
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "Session reaper task ended abnormally");
        }
    }
}

/// Starts the background task that periodically evicts idle sessions
pub fn spawn_reaper(registry: Arc<SessionRegistry>, config: ReaperConfig) -> ReaperHandle {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(run_reaper(registry, config, shutdown_rx));
    ReaperHandle { shutdown_tx, task }
}

#[instrument(skip(registry, shutdown_rx))]
async fn run_reaper(
    registry: Arc<SessionRegistry>,
    config: ReaperConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(
        reap_interval_secs = config.reap_interval.as_secs(),
        idle_threshold_secs = config.idle_threshold.as_secs(),
        "Starting session reaper"
    );

    let mut reap_interval = interval(config.reap_interval);

    loop {
        tokio::select! {
            _ = reap_interval.tick() => {
                let evicted = registry.reap_idle(config.idle_threshold);
                if evicted > 0 {
                    info!(evicted = evicted, remaining = registry.len(), "Evicted idle sessions");
                } else {
                    debug!("No idle sessions to evict");
                }
            }

            // Also fires if the handle was dropped without calling shutdown
            _ = shutdown_rx.changed() => {
                info!("Stopping session reaper");
                break;
            }
        }
    }
}

use std::sync::Arc;

use concentration::{
    score::{InMemoryScoreRepository, PostgresScoreRepository, ScoreSink},
    spawn_reaper, AppConfig, SessionRegistry,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "concentration=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting concentration game engine");

    let config = AppConfig::from_env();

    let score_sink: Arc<dyn ScoreSink> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            let repository = PostgresScoreRepository::new(pool);
            repository.ensure_schema().await?;
            info!("Recording scores in PostgreSQL");
            Arc::new(repository)
        }
        None => {
            info!("DATABASE_URL not set, recording scores in memory");
            Arc::new(InMemoryScoreRepository::new())
        }
    };

    let registry = Arc::new(SessionRegistry::with_default_pair_count(
        score_sink,
        config.default_pair_count,
    ));
    let reaper = spawn_reaper(registry.clone(), config.reaper.clone());

    info!(
        default_pair_count = config.default_pair_count,
        "Session registry ready, press Ctrl-C to stop"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }

    reaper.shutdown().await;
    info!(live_sessions = registry.len(), "Shut down");
    Ok(())
}

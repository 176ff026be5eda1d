mod config;

use anyhow::{Context, Result};
use crate::config::{AppConfig, LoggingConfig, StorageBackend};
use knockout_db::{DatabaseConnection, InMemoryStore, TournamentStore};
use knockout_services::{demo_teams, TournamentService};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::new().context("loading configuration")?;
    init_tracing(&config.logging);

    info!("🚀 Starting knockout tournament server");
    info!("🌐 Server will bind to: {}", config.server_addr());

    match config.storage.backend {
        StorageBackend::Memory => {
            info!("💾 Storage: in-memory");
            serve(Arc::new(InMemoryStore::new()), &config).await
        }
        StorageBackend::Postgres => {
            info!("📊 Storage: PostgreSQL");
            let connection =
                DatabaseConnection::new(&config.database.url, config.database.max_connections).await?;
            connection.run_migrations().await?;
            if !connection.health_check().await? {
                warn!("Database health check returned an unexpected value");
            }
            serve(Arc::new(connection.into_store()), &config).await
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve<S: TournamentStore + 'static>(store: Arc<S>, config: &AppConfig) -> Result<()> {
    let service = Arc::new(TournamentService::new(store, config.simulation.clone())?);
    if config.storage.seed_demo_teams {
        seed_demo_teams(&service).await?;
    }

    let app = knockout_api::app(service);
    let listener = tokio::net::TcpListener::bind(config.server_addr())
        .await
        .with_context(|| format!("binding {}", config.server_addr()))?;

    info!("✅ Listening on {}", listener.local_addr()?);
    info!("⌨️  Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Shut down gracefully");
    Ok(())
}

/// Fills an empty directory with the demo squads; leaves existing teams alone.
async fn seed_demo_teams<S: TournamentStore + 'static>(service: &TournamentService<S>) -> Result<()> {
    if service.count_teams().await? > 0 {
        return Ok(());
    }
    for team in demo_teams() {
        service.register_team(team).await?;
    }
    info!("🌱 Seeded {} demo teams", service.count_teams().await?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
    }
}

//! Tally API Server
//!
//! Main entry point for the Tally reporting service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, create_router};
use tally_core::ledger::InMemoryLedger;
use tally_core::reports::{ReportOrchestrator, ReportSettings, SystemClock};
use tally_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(config.logging.json);

    let ledger = InMemoryLedger::from_json_file(&config.ledger.snapshot_path)
        .await
        .with_context(|| format!("Failed to load ledger from {}", config.ledger.snapshot_path))?;

    let settings = ReportSettings::try_from(&config.reports).context("Invalid report settings")?;
    info!(
        worker_limit = settings.worker_limit,
        cache_capacity = settings.cache_capacity,
        "Report engine configured"
    );

    let reports = ReportOrchestrator::new(Arc::new(ledger), Arc::new(SystemClock), settings);
    let app = create_router(AppState { reports });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tally=debug,tally_core=debug,tally_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

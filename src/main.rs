use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use bk_tracker::config;
use bk_tracker::routes;
use bk_tracker::services::Tracker;
use bk_tracker::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SPREADSHEET_ID, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Bangaru Kutumbam tracker in {:?} mode", config.environment);

    let backend = store::open_backend(&config.store)
        .await
        .context("failed to open sheet backend")?;
    let tracker = Arc::new(
        Tracker::from_config(backend, &config.store)
            .await
            .context("failed to resolve spreadsheet")?,
    );

    if config.api.bootstrap_on_start {
        let id = tracker
            .initialize_spreadsheet()
            .await
            .context("bootstrap on start failed")?;
        tracing::info!("Bootstrapped spreadsheet {}", id);
    }

    let app = routes::app(tracker);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Tracker listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

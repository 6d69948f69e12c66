//! Hooksink webhook capture gateway.
//!
//! Main entry point. Initializes tracing, loads configuration, opens the
//! SQLite-backed event store, and serves the HTTP surface until shutdown.

use std::str::FromStr;

use anyhow::{Context, Result};
use hooksink_api::{AppState, Config};
use hooksink_core::Storage;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting hooksink webhook capture gateway");

    let config = Config::load()?;
    info!(
        database_path = %config.database_path,
        host = %config.host,
        port = config.port,
        "Configuration loaded"
    );

    let pool = open_database(&config).await?;
    Storage::migrate(&pool).await.context("Failed to run migrations")?;
    info!("Event store ready");

    let storage = Storage::new(pool);
    storage.health_check().await.context("Event store health check failed")?;

    let addr = config.parse_server_addr()?;
    let state = AppState::new(storage, config);

    hooksink_api::start_server(state, addr).await.context("Server failed")?;

    info!("Hooksink shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,hooksink=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Opens the SQLite database, creating the file on first run.
///
/// WAL journaling keeps concurrent reads cheap while writes stay serialized
/// by the database.
async fn open_database(config: &Config) -> Result<sqlx::SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", config.database_path))
        .context("Invalid database path")?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Failed to open event store database")
}

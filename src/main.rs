use anyhow::Context;
use database::{PgCategoryRepository, PgProductRepository};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use web_server::AppState;

const DEFAULT_LOG_FILTER: &str = "info,storefront=debug,web_server=debug,database=debug,tower_http=debug";

/// The main entry point for the storefront API.
///
/// Any failure before the server starts listening (bad configuration, an
/// unreachable database, a failed migration) aborts the process.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = init_tracing();

    let settings = configuration::load_config().context("Failed to load configuration")?;
    tracing::info!(
        port = settings.port,
        db_conn = %settings.db_conn_masked(),
        run_migrations = settings.run_migrations,
        "Configuration loaded."
    );

    let db_pool = database::connect(&settings.db_conn)
        .await
        .context("Failed to initialize database")?;
    if settings.run_migrations {
        database::run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied.");
    }

    let state = AppState::new(
        Arc::new(PgProductRepository::new(db_pool.clone())),
        Arc::new(PgCategoryRepository::new(db_pool.clone())),
    );

    web_server::run_server(settings.server_addr(), state)
        .await
        .context("Web server failed")?;

    db_pool.close().await;
    tracing::info!("Database connections closed.");
    Ok(())
}

/// Initializes tracing; `RUST_LOG` overrides the default filter.
///
/// The returned guard must live until shutdown so buffered lines are flushed.
fn init_tracing() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(writer))
        .init();

    guard
}

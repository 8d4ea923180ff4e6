use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bp_logger_data::database::{initialize_database_pool, DatabaseConfig};
use bp_logger_data::repository::EntryRepository;
use bp_logger_web::config::ServerConfig;
use bp_logger_web::{create_application, AppState};

/// The main entry point for the BP logger server
///
/// This function:
/// 1. Initializes environment variables from .env file
/// 2. Sets up tracing for logging
/// 3. Opens the SQLite pool, falling back to in-memory storage
/// 4. Creates and starts the Axum web application
/// 5. Handles graceful shutdown
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stdout))
        .with(env_filter)
        .init();

    info!("Starting BP logger");

    let server_config = ServerConfig::from_env().context("invalid server configuration")?;

    let repository = match DatabaseConfig::from_env().and_then(|config| initialize_database_pool(&config)) {
        Ok(pool) => {
            info!("Using {}", pool.connection_info());
            EntryRepository::new(pool)
        }
        Err(e) => {
            error!("Failed to initialize database pool: {}", e);
            warn!("Falling back to in-memory storage, entries will not survive a restart");
            EntryRepository::in_memory()
        }
    };

    let app = create_application(AppState::new(repository, server_config.environment.clone()));

    let addr = server_config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on CTRL+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}

//! Schedule server binary.

use std::net::SocketAddr;

use sched_server::{
    config::{Config, DatabaseKind},
    create_app, create_state, init_tracing,
};
use schedule_store::{PostgresScheduleStore, ScheduleStore, SqliteScheduleStore};
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        time_zone = %config.time_zone,
        "Starting schedule server"
    );

    match config.database_kind()? {
        DatabaseKind::Sqlite => {
            let store =
                SqliteScheduleStore::connect(&config.database_url, config.max_connections).await?;
            serve(config, store).await
        }
        DatabaseKind::Postgres => {
            let store =
                PostgresScheduleStore::connect(&config.database_url, config.max_connections)
                    .await?;
            serve(config, store).await
        }
    }
}

async fn serve<S: ScheduleStore + 'static>(config: Config, store: S) -> anyhow::Result<()> {
    let addr: SocketAddr = config.server_addr().parse()?;
    let state = create_state(config, store)?;
    let app = create_app(state);

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down");
        }
    }
}

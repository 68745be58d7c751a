mod cleanup;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use quill_api::routes;
use quill_api::state::AppStateInner;
use quill_db::Database;

use crate::config::Config;

/// Expired sessions are swept once an hour.
const SESSION_SWEEP_SECS: u64 = 3600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "quill_server=debug,quill_api=debug,quill_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr()?;

    // Init database
    let db = if config.database_url == ":memory:" {
        Database::open_in_memory()?
    } else {
        Database::open(&PathBuf::from(&config.database_url))?
    };
    let db = Arc::new(db);

    tokio::spawn(cleanup::run_session_sweeper(db.clone(), SESSION_SWEEP_SECS));

    let state = AppStateInner::new(db, &config.session)?;
    let app = routes::app(state, &config.static_dir);

    info!("Quill listening on {}", addr);
    info!("Sessions last {} hours", config.session.ttl_hours);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}

//! Taskmatrix server binary.
//!
//! Reads configuration from the environment, wires the selected store into
//! the web application, and serves until SIGINT or SIGTERM.

use taskmatrix::config::AppConfig;
use taskmatrix::logging::init_structured_logging;
use taskmatrix::web::{create_app, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let config = AppConfig::from_env()?;
    let bind_address = config.web.bind_address.clone();
    let storage = config.storage;

    let state = AppState::build(config).await?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(
        address = %bind_address,
        storage = %storage,
        "🚀 Taskmatrix listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when SIGINT (Ctrl+C) or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

use std::sync::Arc;

use clap::Parser;
use tokio::{net::TcpListener, signal};
use todo_core::{InMemoryStore, TodoResource};
use todo_server::{config::Config, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let config = Config::parse();
    telemetry::init(config.log_format);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    let resource = TodoResource::new(Arc::new(InMemoryStore::new()));
    todo_server::run_until(listener, resource, shutdown_signal()).await?;

    info!("server shut down");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

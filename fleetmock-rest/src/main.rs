//! Fleetmock REST server
//!
//! Serves the fake device-fleet API and proxies everything else to the UI
//! dev server.

use std::net::SocketAddr;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleetmock_rest::{router, AppState};
use fleetmock_store::{MockDelays, StoreHandle};

#[derive(Debug, Parser)]
#[command(name = "fleetmock-rest", about = "Fake device-fleet API server")]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "FLEETMOCK_HOST")]
    host: String,

    /// Port to bind
    #[arg(long, default_value_t = 8071, env = "FLEETMOCK_PORT")]
    port: u16,

    /// Base URL of the UI dev server that unmatched paths are proxied to
    #[arg(
        long,
        default_value = "http://localhost:4200/",
        env = "FLEETMOCK_UI_ORIGIN"
    )]
    ui_origin: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetmock_rest=info,fleetmock_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let store = StoreHandle::spawn(MockDelays::default());
    let state = AppState::new(store, cli.ui_origin);
    tracing::info!(ui_origin = %state.ui_origin, "Starting fleetmock REST server");

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .map_err(|e| format!("Invalid host:port combination: {}", e))?;

    // Build router with middleware
    let app = router(state).layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", addr);

    // Run server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}

//! Timer Keeper - crash-safe persistence for named countdown timers
//!
//! This is the main entry point for the timer-keeper server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use timer_keeper::{
    api::create_router,
    config::Config,
    state::{AppState, StateStore},
    tasks::shutdown_watcher,
    utils::try_arm_shutdown,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_keeper={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-keeper server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, after_signal={:?}",
          config.host, config.port, config.after_signal);

    // The store must be able to write and rename in its directory
    let store = match StateStore::open(config.data_dir()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(Arc::clone(&store), config.port, config.host.clone()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state), config.static_dir.as_deref());

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /api/state   - Load the timer document");
    info!("  POST /api/state   - Replace the timer document");
    info!("  POST /api/closing - Pause all timers (window closing)");
    info!("  GET  /status      - Server status and timer summary");
    info!("  GET  /health      - Health check");
    if let Some(dir) = &config.static_dir {
        info!("  GET  /*           - Static files from {}", dir.display());
    }

    let server = axum::serve(listener, app);

    if try_arm_shutdown() {
        // Resolves once the paused state is saved; then in-flight requests drain
        server
            .with_graceful_shutdown(shutdown_watcher(Arc::clone(&state), config.after_signal))
            .await?;
    } else {
        warn!("Shutdown pause not armed in this process");
        server.await?;
    }

    info!("Server shutdown complete");
    Ok(())
}

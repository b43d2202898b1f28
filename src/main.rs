//! Nightlight - A state-managed ambient sound service
//! 
//! This is the main entry point for the nightlight application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use nightlight::{
    api::create_router,
    config::Config,
    playback::{Player, ProcessPlayer, SilentPlayer},
    state::{AppState, SessionController},
    storage::FileStore,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("nightlight={},tower_http=info", config.log_level()))
        .init();

    info!("Starting nightlight server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, state_dir={}, sounds_dir={}, player={}",
        config.host,
        config.port,
        config.state_dir().display(),
        config.sounds_dir.display(),
        if config.silent { "silent" } else { config.player.as_str() }
    );

    let player: Arc<dyn Player> = if config.silent {
        Arc::new(SilentPlayer::new())
    } else {
        Arc::new(ProcessPlayer::new(config.player.clone(), config.sounds_dir.clone()))
    };
    let store = Arc::new(FileStore::new(config.state_dir()));

    // Restore the saved session; playback always starts stopped
    let controller = SessionController::new(player, store);
    let state = Arc::new(AppState::new(
        Arc::clone(&controller),
        config.port,
        config.host.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /playback/toggle - Start or stop playback");
    info!("  POST /sound           - Switch track");
    info!("  POST /volume          - Set volume (percent)");
    info!("  POST /brightness      - Set brightness (percent)");
    info!("  POST /timer           - Select sleep timer preset");
    info!("  POST /timer/cycle     - Advance sleep timer preset");
    info!("  POST /theme           - Select theme");
    info!("  GET  /status          - Current session status");
    info!("  GET  /events          - Server-sent session and timer updates");
    info!("  GET  /health          - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    controller.shutdown();
    info!("Server shutdown complete");
    Ok(())
}

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use game_core::Phraseset;
use game_server::config::Config;
use game_server::room_manager::RoomManager;
use game_server::websocket::connection::ConnectionManager;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::new();
    info!("starting phrase party server on {}:{}", config.host, config.port);

    let phraseset = match Phraseset::load(&config.phraseset_path) {
        Ok(phraseset) => phraseset,
        Err(error) => {
            error!("failed to load phraseset {}: {:#}", config.phraseset_path, error);
            std::process::exit(1);
        }
    };
    if phraseset.is_empty() {
        error!("phraseset {} contains no phrases", config.phraseset_path);
        std::process::exit(1);
    }
    info!(
        "loaded {} phrases from {}",
        phraseset.len(),
        config.phraseset_path
    );

    let connection_manager = Arc::new(ConnectionManager::new());
    let room_manager = Arc::new(RoomManager::new(
        connection_manager.clone(),
        phraseset,
        Duration::from_millis(config.skip_throttle_ms),
    ));

    // Periodic liveness sweep over every room.
    let probe_manager = room_manager.clone();
    let probe_interval = Duration::from_secs(config.probe_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(probe_interval);
        loop {
            interval.tick().await;
            probe_manager.probe_liveness().await;
        }
    });

    let routes = game_server::create_routes(
        connection_manager,
        room_manager,
        config.static_dir.clone(),
    );

    let addr: std::net::SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT");

    let (bound, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        shutdown_signal().await;
        info!("shutdown signal received");
    });

    info!("listening on {}", bound);
    server.await;
    info!("server stopped");
}

async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
    }
}

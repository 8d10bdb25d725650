pub mod config;
pub mod room_manager;
pub mod websocket;

use std::sync::Arc;

use warp::Filter;

use room_manager::RoomManager;
use websocket::connection::ConnectionManager;

/// Builds the full route tree: the WebSocket endpoint, the plain-text
/// stats and health probes, and the static client bundle as fallback.
pub fn create_routes(
    connection_manager: Arc<ConnectionManager>,
    room_manager: Arc<RoomManager>,
    static_dir: String,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let stats_manager = room_manager.clone();

    let ws_route = warp::path("ws")
        .and(warp::ws())
        .and(with_connection_manager(connection_manager))
        .and(with_room_manager(room_manager))
        .map(
            |ws: warp::ws::Ws,
             connection_manager: Arc<ConnectionManager>,
             room_manager: Arc<RoomManager>| {
                ws.on_upgrade(move |socket| {
                    websocket::handle_connection(socket, connection_manager, room_manager)
                })
            },
        );

    let stats_route = warp::path("stats")
        .and(warp::get())
        .and(warp::any().map(move || stats_manager.clone()))
        .then(|manager: Arc<RoomManager>| async move {
            let mut names = manager.room_names().await;
            names.sort();
            format!("Rooms: {}", names.join(", "))
        });

    let health_route = warp::path("health").and(warp::get()).map(|| "OK");

    let static_route = warp::fs::dir(static_dir);

    ws_route
        .or(stats_route)
        .or(health_route)
        .or(static_route)
        .with(warp::log("phrase_party"))
}

fn with_connection_manager(
    manager: Arc<ConnectionManager>,
) -> impl Filter<Extract = (Arc<ConnectionManager>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || manager.clone())
}

fn with_room_manager(
    manager: Arc<RoomManager>,
) -> impl Filter<Extract = (Arc<RoomManager>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || manager.clone())
}

pub mod connection;
pub mod handlers;

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use warp::ws::{Message, WebSocket};

use crate::room_manager::RoomManager;
use connection::{ConnectionId, ConnectionManager, Outbound};
use game_types::ClientCommand;

/// Drives one WebSocket for its whole life: inbound text frames are
/// parsed and dispatched, queued outbound frames are written back, and
/// either side closing tears the connection down.
pub async fn handle_connection(
    ws: WebSocket,
    connection_manager: Arc<ConnectionManager>,
    room_manager: Arc<RoomManager>,
) {
    let connection_id = ConnectionId::new();
    info!("new websocket connection: {}", connection_id);

    let (mut ws_sender, mut ws_receiver) = ws.split();
    let mut outbound = connection_manager.create_connection(connection_id).await;
    let handler = handlers::CommandHandler::new(
        connection_id,
        connection_manager.clone(),
        room_manager.clone(),
    );

    let incoming = async {
        while let Some(frame) = ws_receiver.next().await {
            let message = match frame {
                Ok(message) => message,
                Err(error) => {
                    warn!("websocket error on {}: {}", connection_id, error);
                    break;
                }
            };

            if message.is_pong() {
                handler.handle_pong().await;
                continue;
            }
            if message.is_close() {
                break;
            }
            let Ok(text) = message.to_str() else {
                debug!("ignoring non-text frame from {}", connection_id);
                continue;
            };
            handler.handle_command(ClientCommand::parse(text)).await;
        }
    };

    let outgoing = async {
        while let Some(frame) = outbound.recv().await {
            let message = match frame {
                Outbound::Message(message) => match serde_json::to_string(&message) {
                    Ok(json) => Message::text(json),
                    Err(error) => {
                        warn!("failed to serialize frame for {}: {}", connection_id, error);
                        continue;
                    }
                },
                Outbound::Raw(text) => Message::text(text),
                Outbound::Ping => Message::ping(Vec::new()),
            };
            if ws_sender.send(message).await.is_err() {
                break;
            }
        }
    };

    // Either loop ending (socket closed, or the sender dropped by a
    // kick) finishes the connection.
    tokio::select! {
        _ = incoming => {}
        _ = outgoing => {}
    }

    info!("websocket connection closed: {}", connection_id);
    handler.handle_disconnect().await;
}

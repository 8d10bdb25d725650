use std::sync::Arc;
use tracing::debug;

use crate::room_manager::RoomManager;
use crate::websocket::connection::{ConnectionId, ConnectionManager, Outbound};
use game_types::{ClientCommand, GameError, ServerMessage};

/// Dispatches parsed commands for one connection into the room
/// directory, turning errors into `{"error": ...}` frames for the
/// caller.
pub struct CommandHandler {
    connection_id: ConnectionId,
    connection_manager: Arc<ConnectionManager>,
    room_manager: Arc<RoomManager>,
}

impl CommandHandler {
    pub fn new(
        connection_id: ConnectionId,
        connection_manager: Arc<ConnectionManager>,
        room_manager: Arc<RoomManager>,
    ) -> Self {
        Self {
            connection_id,
            connection_manager,
            room_manager,
        }
    }

    pub async fn handle_command(&self, command: ClientCommand) {
        let result = match command {
            ClientCommand::Create { name } => {
                self.room_manager.create_room(self.connection_id, &name).await
            }
            ClientCommand::Join { room, name } => {
                self.room_manager
                    .join_room(self.connection_id, &room, &name)
                    .await
            }
            ClientCommand::Reconnect { room, name, secret } => {
                self.room_manager
                    .reconnect(self.connection_id, &room, &name, &secret)
                    .await
            }
            ClientCommand::Phrase => self.room_manager.send_phrase(self.connection_id).await,
            ClientCommand::Submit { text } => {
                self.room_manager.submit(self.connection_id, text).await
            }
            ClientCommand::Finish { best } => {
                self.room_manager.finish(self.connection_id, best).await
            }
            ClientCommand::Kick { name } => {
                self.room_manager.kick(self.connection_id, &name).await
            }
            ClientCommand::Skip => self.room_manager.skip(self.connection_id).await,
            ClientCommand::Unknown => self.handle_unknown().await,
        };

        if let Err(error) = result {
            self.send_error(error).await;
        }
    }

    /// Unknown input from a joined player is ignored; from an unjoined
    /// connection it is answered with the not-joined error, matching
    /// how every other command would fail there.
    async fn handle_unknown(&self) -> Result<(), GameError> {
        match self.connection_manager.binding(self.connection_id).await {
            Some(_) => {
                debug!("ignoring unknown command from {}", self.connection_id);
                Ok(())
            }
            None => Err(GameError::NotJoined),
        }
    }

    async fn send_error(&self, error: GameError) {
        debug!("command from {} failed: {}", self.connection_id, error);
        self.connection_manager
            .send_to_connection(
                self.connection_id,
                Outbound::Message(ServerMessage::Error(error.to_string())),
            )
            .await;
    }

    pub async fn handle_pong(&self) {
        self.room_manager.mark_pong(self.connection_id).await;
    }

    pub async fn handle_disconnect(&self) {
        self.room_manager.handle_disconnect(self.connection_id).await;
        self.connection_manager
            .remove_connection(self.connection_id)
            .await;
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::websocket::connection::{ConnectionId, ConnectionManager, Outbound};
use game_core::{Phraseset, Room};
use game_types::{GameError, JoinedPayload, ServerMessage};

/// Process-wide directory of rooms plus the protocol operations the
/// gateway dispatches into. The room map lock serializes operations on
/// a room for their full run; rooms are never destroyed before the
/// process exits.
pub struct RoomManager {
    rooms: RwLock<HashMap<String, Room>>,
    phraseset: Phraseset,
    connection_manager: Arc<ConnectionManager>,
    skip_throttle: Duration,
    last_skip: Mutex<Instant>,
}

impl RoomManager {
    pub fn new(
        connection_manager: Arc<ConnectionManager>,
        phraseset: Phraseset,
        skip_throttle: Duration,
    ) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            phraseset,
            connection_manager,
            skip_throttle,
            last_skip: Mutex::new(Instant::now()),
        }
    }

    fn new_secret() -> String {
        Uuid::new_v4().to_string()
    }

    pub async fn room_names(&self) -> Vec<String> {
        let rooms = self.rooms.read().await;
        rooms.keys().cloned().collect()
    }

    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }

    async fn require_binding(
        &self,
        connection_id: ConnectionId,
    ) -> Result<crate::websocket::connection::PlayerBinding, GameError> {
        self.connection_manager
            .binding(connection_id)
            .await
            .ok_or(GameError::NotJoined)
    }

    async fn reject_if_bound(&self, connection_id: ConnectionId) -> Result<(), GameError> {
        match self.connection_manager.binding(connection_id).await {
            Some(_) => Err(GameError::AlreadyBound),
            None => Ok(()),
        }
    }

    /// `create <name>`: a new room whose first player is the caller.
    /// Responds with `joined` carrying the fresh secret and state.
    pub async fn create_room(
        &self,
        connection_id: ConnectionId,
        player_name: &str,
    ) -> Result<(), GameError> {
        self.reject_if_bound(connection_id).await?;

        let secret = Self::new_secret();
        let room = Room::new(player_name, secret.clone(), &self.phraseset);
        let room_name = room.name.clone();
        let snapshot = room.snapshot();
        {
            let mut rooms = self.rooms.write().await;
            rooms.insert(room_name.clone(), room);
        }
        self.connection_manager
            .bind(connection_id, &room_name, player_name)
            .await;

        info!("player {} created room {}", player_name, room_name);
        self.connection_manager
            .send_to_connection(
                connection_id,
                Outbound::Message(ServerMessage::Joined(JoinedPayload {
                    secret,
                    game: snapshot,
                })),
            )
            .await;
        Ok(())
    }

    /// `join <room> <name>`: adds a player, or rebinds an existing name
    /// (reconnect-via-join). A rejoining player keeps their stored
    /// secret; the candidate minted here is discarded in that case, so
    /// the `joined` response carries a usable secret only for new
    /// players.
    pub async fn join_room(
        &self,
        connection_id: ConnectionId,
        room_name: &str,
        player_name: &str,
    ) -> Result<(), GameError> {
        self.reject_if_bound(connection_id).await?;

        let candidate_secret = Self::new_secret();
        let snapshot = {
            let mut rooms = self.rooms.write().await;
            let room = rooms.get_mut(room_name).ok_or(GameError::RoomNotFound)?;
            let outcome = room.join(player_name, candidate_secret.clone());
            debug!("join {} to room {}: {:?}", player_name, room_name, outcome);
            room.snapshot()
        };
        self.connection_manager
            .bind(connection_id, room_name, player_name)
            .await;

        info!("player {} joined room {}", player_name, room_name);
        self.connection_manager
            .send_to_connection(
                connection_id,
                Outbound::Message(ServerMessage::Joined(JoinedPayload {
                    secret: candidate_secret,
                    game: snapshot.clone(),
                })),
            )
            .await;
        self.connection_manager
            .send_to_room(room_name, ServerMessage::Game(snapshot))
            .await;
        Ok(())
    }

    /// `reconnect <room> <name> <secret>`: credential-checked rebind of
    /// a durable identity to this connection.
    pub async fn reconnect(
        &self,
        connection_id: ConnectionId,
        room_name: &str,
        player_name: &str,
        secret: &str,
    ) -> Result<(), GameError> {
        self.reject_if_bound(connection_id).await?;

        let snapshot = {
            let mut rooms = self.rooms.write().await;
            let room = rooms.get_mut(room_name).ok_or(GameError::RoomNotFound)?;
            let player = room.player(player_name).ok_or(GameError::PlayerNotFound)?;
            if player.secret != secret {
                return Err(GameError::InvalidCredentials);
            }
            room.mark_connected(player_name);
            // The player's absence may have been the only thing keeping
            // the turn open.
            room.recheck_submissions();
            room.snapshot()
        };
        self.connection_manager
            .bind(connection_id, room_name, player_name)
            .await;

        info!("player {} reconnected to room {}", player_name, room_name);
        self.connection_manager
            .send_to_room(room_name, ServerMessage::Game(snapshot))
            .await;
        Ok(())
    }

    /// `phrase`: unicasts the current turn's phrase to the caller as a
    /// raw text frame.
    pub async fn send_phrase(&self, connection_id: ConnectionId) -> Result<(), GameError> {
        let binding = self.require_binding(connection_id).await?;
        let phrase = {
            let rooms = self.rooms.read().await;
            let room = rooms.get(&binding.room).ok_or(GameError::RoomNotFound)?;
            room.current_turn().phrase.clone()
        };
        self.connection_manager
            .send_to_connection(connection_id, Outbound::Raw(phrase))
            .await;
        Ok(())
    }

    /// `submit <text...>`: records the caller's submission for the
    /// current turn and broadcasts the updated state.
    pub async fn submit(
        &self,
        connection_id: ConnectionId,
        text: String,
    ) -> Result<(), GameError> {
        let binding = self.require_binding(connection_id).await?;
        let snapshot = {
            let mut rooms = self.rooms.write().await;
            let room = rooms.get_mut(&binding.room).ok_or(GameError::RoomNotFound)?;
            room.add_submission(&binding.player, text)?;
            room.snapshot()
        };
        self.connection_manager
            .send_to_room(&binding.room, ServerMessage::Game(snapshot))
            .await;
        Ok(())
    }

    /// `finish <bestName?>`: scores the current turn and rotates the
    /// guesser.
    pub async fn finish(
        &self,
        connection_id: ConnectionId,
        best: Option<String>,
    ) -> Result<(), GameError> {
        let binding = self.require_binding(connection_id).await?;
        let snapshot = {
            let mut rooms = self.rooms.write().await;
            let room = rooms.get_mut(&binding.room).ok_or(GameError::RoomNotFound)?;
            room.finish_turn(true, best.as_deref());
            room.snapshot()
        };
        self.connection_manager
            .send_to_room(&binding.room, ServerMessage::Game(snapshot))
            .await;
        Ok(())
    }

    /// `kick <name>`: removes a player from the caller's room, closing
    /// the target's transport. An unknown target is a logged no-op.
    pub async fn kick(
        &self,
        connection_id: ConnectionId,
        target: &str,
    ) -> Result<(), GameError> {
        let binding = self.require_binding(connection_id).await?;
        let snapshot = {
            let mut rooms = self.rooms.write().await;
            let room = rooms.get_mut(&binding.room).ok_or(GameError::RoomNotFound)?;
            match room.kick(target) {
                Some(_) => room.snapshot(),
                None => {
                    debug!("kick target {} not found in room {}", target, binding.room);
                    return Ok(());
                }
            }
        };

        if let Some(target_conn) = self
            .connection_manager
            .connection_for_player(&binding.room, target)
            .await
        {
            self.connection_manager.unbind(target_conn).await;
            self.connection_manager.remove_connection(target_conn).await;
        }

        info!("kicked {} from room {}", target, binding.room);
        self.connection_manager
            .send_to_room(&binding.room, ServerMessage::Game(snapshot))
            .await;
        Ok(())
    }

    /// `skip`: replaces the current turn for the same guesser. Guarded
    /// by a process-wide throttle against double clicks from concurrent
    /// clients; a throttled skip is dropped silently.
    pub async fn skip(&self, connection_id: ConnectionId) -> Result<(), GameError> {
        let binding = self.require_binding(connection_id).await?;
        {
            let mut last_skip = self.last_skip.lock().await;
            if last_skip.elapsed() < self.skip_throttle {
                debug!("skip throttled");
                return Ok(());
            }
            *last_skip = Instant::now();
        }

        let snapshot = {
            let mut rooms = self.rooms.write().await;
            let room = rooms.get_mut(&binding.room).ok_or(GameError::RoomNotFound)?;
            room.skip_turn();
            room.snapshot()
        };
        self.connection_manager
            .send_to_room(&binding.room, ServerMessage::Game(snapshot))
            .await;
        Ok(())
    }

    /// Pong frames raise the liveness flag checked by the next sweep.
    pub async fn mark_pong(&self, connection_id: ConnectionId) {
        if let Some(binding) = self.connection_manager.binding(connection_id).await {
            let mut rooms = self.rooms.write().await;
            if let Some(room) = rooms.get_mut(&binding.room) {
                room.mark_ponged(&binding.player);
            }
        }
    }

    /// Transport closed: the player stays on the roster but is shown as
    /// inactive until they reconnect.
    pub async fn handle_disconnect(&self, connection_id: ConnectionId) {
        let Some(binding) = self.connection_manager.binding(connection_id).await else {
            return;
        };
        let snapshot = {
            let mut rooms = self.rooms.write().await;
            match rooms.get_mut(&binding.room) {
                Some(room) => {
                    room.mark_disconnected(&binding.player);
                    room.snapshot()
                }
                None => return,
            }
        };
        info!(
            "player {} in room {} disconnected",
            binding.player, binding.room
        );
        self.connection_manager
            .send_to_room(&binding.room, ServerMessage::Game(snapshot))
            .await;
    }

    /// Two-tick liveness check over every room: a player whose pong
    /// flag is still down from the previous tick is declared dead and
    /// announced to their room; everyone still active gets a fresh
    /// probe.
    pub async fn probe_liveness(&self) {
        let mut dead_rooms = Vec::new();
        let mut probes = Vec::new();
        {
            let mut rooms = self.rooms.write().await;
            for room in rooms.values_mut() {
                let dead = room.sweep_unponged();
                if !dead.is_empty() {
                    dead_rooms.push((room.name.clone(), dead, room.snapshot()));
                }
                for player in room.players().iter().filter(|p| p.active) {
                    probes.push((room.name.clone(), player.name.clone()));
                }
            }
        }

        for (room, dead, snapshot) in dead_rooms {
            for name in dead {
                info!("no pong from {} in room {}, marking inactive", name, room);
                if let Some(conn) = self
                    .connection_manager
                    .connection_for_player(&room, &name)
                    .await
                {
                    self.connection_manager.unbind(conn).await;
                }
            }
            self.connection_manager
                .send_to_room(&room, ServerMessage::Game(snapshot))
                .await;
        }

        for (room, player) in probes {
            if let Some(conn) = self
                .connection_manager
                .connection_for_player(&room, &player)
                .await
            {
                self.connection_manager
                    .send_to_connection(conn, Outbound::Ping)
                    .await;
            }
        }
    }
}

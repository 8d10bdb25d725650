use std::collections::HashMap;
use std::fmt;
use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

use game_types::ServerMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frames queued for a connection's socket task.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// JSON-framed protocol message.
    Message(ServerMessage),
    /// Raw text frame; used for the `phrase` unicast only.
    Raw(String),
    /// Liveness probe.
    Ping,
}

/// The durable identity a connection is currently acting as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerBinding {
    pub room: String,
    pub player: String,
}

#[derive(Debug)]
struct Connection {
    binding: Option<PlayerBinding>,
    sender: mpsc::UnboundedSender<Outbound>,
}

/// Maps transient connections to durable player identities. The
/// registry holds at most one live connection per player; binding a
/// player to a new connection implicitly invalidates the previous one.
pub struct ConnectionManager {
    connections: RwLock<HashMap<ConnectionId, Connection>>,
    player_to_connection: RwLock<HashMap<(String, String), ConnectionId>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            player_to_connection: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_connection(&self, id: ConnectionId) -> mpsc::UnboundedReceiver<Outbound> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut connections = self.connections.write().await;
        connections.insert(
            id,
            Connection {
                binding: None,
                sender,
            },
        );
        receiver
    }

    /// Full teardown when a transport closes. Dropping the sender ends
    /// the socket task, so this doubles as the forced close used by
    /// `kick`.
    pub async fn remove_connection(&self, id: ConnectionId) {
        let binding = {
            let mut connections = self.connections.write().await;
            connections.remove(&id).and_then(|conn| conn.binding)
        };
        if let Some(binding) = binding {
            self.release_player_entry(&binding, id).await;
        }
    }

    pub async fn binding(&self, id: ConnectionId) -> Option<PlayerBinding> {
        let connections = self.connections.read().await;
        connections.get(&id).and_then(|conn| conn.binding.clone())
    }

    /// Points `player` at `id`, displacing any previous connection
    /// bound to the same identity.
    pub async fn bind(&self, id: ConnectionId, room: &str, player: &str) {
        let previous = {
            let mut players = self.player_to_connection.write().await;
            players.insert((room.to_string(), player.to_string()), id)
        };

        let mut connections = self.connections.write().await;
        if let Some(previous) = previous.filter(|prev| *prev != id) {
            if let Some(conn) = connections.get_mut(&previous) {
                conn.binding = None;
            }
        }
        if let Some(conn) = connections.get_mut(&id) {
            conn.binding = Some(PlayerBinding {
                room: room.to_string(),
                player: player.to_string(),
            });
        }
    }

    /// Drops the connection→player mapping without touching player
    /// state.
    pub async fn unbind(&self, id: ConnectionId) {
        let binding = {
            let mut connections = self.connections.write().await;
            connections.get_mut(&id).and_then(|conn| conn.binding.take())
        };
        if let Some(binding) = binding {
            self.release_player_entry(&binding, id).await;
        }
    }

    async fn release_player_entry(&self, binding: &PlayerBinding, id: ConnectionId) {
        let key = (binding.room.clone(), binding.player.clone());
        let mut players = self.player_to_connection.write().await;
        // A newer connection may already own this identity.
        if players.get(&key) == Some(&id) {
            players.remove(&key);
        }
    }

    pub async fn connection_for_player(&self, room: &str, player: &str) -> Option<ConnectionId> {
        let players = self.player_to_connection.read().await;
        players
            .get(&(room.to_string(), player.to_string()))
            .copied()
    }

    pub async fn send_to_connection(&self, id: ConnectionId, frame: Outbound) {
        let connections = self.connections.read().await;
        if let Some(conn) = connections.get(&id) {
            if conn.sender.send(frame).is_err() {
                debug!("connection {} closed before frame could be queued", id);
            }
        }
    }

    /// Broadcasts to every connection currently bound into `room`.
    pub async fn send_to_room(&self, room: &str, message: ServerMessage) {
        let connections = self.connections.read().await;
        for conn in connections.values() {
            if conn.binding.as_ref().is_some_and(|b| b.room == room) {
                let _ = conn.sender.send(Outbound::Message(message.clone()));
            }
        }
    }

    // Test helper methods
    pub async fn connection_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }

    pub async fn bound_player_count(&self) -> usize {
        let players = self.player_to_connection.read().await;
        players.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

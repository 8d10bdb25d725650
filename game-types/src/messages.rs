use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::RoomSnapshot;

/// One inbound command line, parsed from a whitespace-delimited text
/// frame. The first token selects the command; the rest are positional
/// arguments. `submit` keeps its trailing text since phrases may
/// contain spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Create { name: String },
    Join { room: String, name: String },
    Reconnect { room: String, name: String, secret: String },
    Phrase,
    Submit { text: String },
    Finish { best: Option<String> },
    Kick { name: String },
    Skip,
    /// Anything that does not match a known shape. Dispatched as a
    /// no-op for joined players rather than an error.
    Unknown,
}

impl ClientCommand {
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Self::Unknown;
        };

        match cmd {
            "create" => match parts.next() {
                Some(name) => Self::Create {
                    name: name.to_string(),
                },
                None => Self::Unknown,
            },
            "join" => match (parts.next(), parts.next()) {
                (Some(room), Some(name)) => Self::Join {
                    room: room.to_string(),
                    name: name.to_string(),
                },
                _ => Self::Unknown,
            },
            "reconnect" => match (parts.next(), parts.next(), parts.next()) {
                (Some(room), Some(name), Some(secret)) => Self::Reconnect {
                    room: room.to_string(),
                    name: name.to_string(),
                    secret: secret.to_string(),
                },
                _ => Self::Unknown,
            },
            "phrase" => Self::Phrase,
            "submit" => Self::Submit {
                text: parts.collect::<Vec<_>>().join(" "),
            },
            "finish" => Self::Finish {
                best: parts.next().map(str::to_string),
            },
            "kick" => match parts.next() {
                Some(name) => Self::Kick {
                    name: name.to_string(),
                },
                None => Self::Unknown,
            },
            "skip" => Self::Skip,
            _ => Self::Unknown,
        }
    }
}

/// Payload of the `joined` response to `create` and `join`. Carries the
/// secret the client must present to reconnect as this player.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JoinedPayload {
    pub secret: String,
    pub game: RoomSnapshot,
}

/// Outbound JSON frames. External tagging yields the wire shapes
/// `{"error": ...}`, `{"joined": {...}}` and `{"game": {...}}`. The raw
/// phrase unicast is the only outbound frame not represented here.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ServerMessage {
    Error(String),
    Joined(JoinedPayload),
    Game(RoomSnapshot),
}

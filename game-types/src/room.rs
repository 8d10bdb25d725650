use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

/// Roster entry as broadcast to clients. Secrets and connection handles
/// never appear here.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerSnapshot {
    pub name: String,
    pub points: u32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TurnSnapshot {
    pub phrase: String,
    /// Submission text keyed by the submitting player's name.
    pub submissions: HashMap<String, String>,
    pub guesser: String,
    pub submissions_complete: bool,
    pub best_submission_player_name: Option<String>,
}

/// Full room state, broadcast after every mutating operation. Turns are
/// ordered newest first.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomSnapshot {
    pub players: Vec<PlayerSnapshot>,
    pub id: String,
    pub turns: Vec<TurnSnapshot>,
}

use std::collections::VecDeque;

use game_types::{GameError, PlayerSnapshot, RoomSnapshot};
use tracing::debug;
use uuid::Uuid;

use crate::{Phraseset, Turn, WordSource};

/// A durable player identity within one room. The secret authenticates
/// reconnects; the transport handle lives in the server layer.
#[derive(Debug)]
pub struct Player {
    pub name: String,
    pub secret: String,
    pub points: u32,
    pub active: bool,
    pub ponged: bool,
}

impl Player {
    fn new(name: String, secret: String) -> Self {
        Self {
            name,
            secret,
            points: 0,
            active: true,
            ponged: true,
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            name: self.name.clone(),
            points: self.points,
            active: self.active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A new player was appended to the roster.
    Created,
    /// The name was already taken in this room; the existing identity
    /// was marked active again and keeps its stored secret and points.
    Reconnected,
}

/// An isolated game session: the roster in join order (which drives the
/// guesser rotation), the turn history newest-first, and a private
/// phrase pool. Rooms live for the life of the process.
#[derive(Debug)]
pub struct Room {
    pub name: String,
    players: Vec<Player>,
    turns: VecDeque<Turn>,
    words: WordSource,
}

impl Room {
    /// Creates a room with its first player and seeds the opening turn,
    /// so the roster and history are never empty afterwards.
    pub fn new(creator: &str, secret: String, phraseset: &Phraseset) -> Self {
        let mut words = phraseset.source();
        let mut turns = VecDeque::new();
        turns.push_front(Turn::new(words.draw(), creator.to_string()));
        Self {
            name: Uuid::new_v4().to_string(),
            players: vec![Player::new(creator.to_string(), secret)],
            turns,
            words,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn current_turn(&self) -> &Turn {
        self.turns
            .front()
            .expect("a room always has at least one turn")
    }

    fn current_turn_mut(&mut self) -> &mut Turn {
        self.turns
            .front_mut()
            .expect("a room always has at least one turn")
    }

    /// Adds `name` to the roster, or treats the request as a
    /// reconnect-via-join when the name is already taken. The caller's
    /// candidate `secret` is only used for newly created players.
    pub fn join(&mut self, name: &str, secret: String) -> JoinOutcome {
        match self.players.iter_mut().find(|p| p.name == name) {
            Some(player) => {
                player.active = true;
                player.ponged = true;
                JoinOutcome::Reconnected
            }
            None => {
                self.players.push(Player::new(name.to_string(), secret));
                JoinOutcome::Created
            }
        }
    }

    pub fn mark_connected(&mut self, name: &str) {
        if let Some(player) = self.players.iter_mut().find(|p| p.name == name) {
            player.active = true;
            player.ponged = true;
        }
    }

    pub fn mark_disconnected(&mut self, name: &str) {
        if let Some(player) = self.players.iter_mut().find(|p| p.name == name) {
            player.active = false;
        }
    }

    pub fn mark_ponged(&mut self, name: &str) {
        if let Some(player) = self.players.iter_mut().find(|p| p.name == name) {
            player.ponged = true;
        }
    }

    fn submissions_complete(&self) -> bool {
        if self.players.len() < 2 {
            return false;
        }
        self.current_turn().submission_count() == self.players.len() - 1
    }

    /// Latches the completeness flag once every non-guesser has
    /// submitted. Called after submissions, kicks and reconnects.
    pub fn recheck_submissions(&mut self) {
        if self.submissions_complete() {
            self.current_turn_mut().submissions_complete = true;
        }
    }

    /// Records `player`'s submission for the current turn, overwriting
    /// any earlier one. The guesser may not submit.
    pub fn add_submission(&mut self, player: &str, text: String) -> Result<(), GameError> {
        if self.current_turn().guesser == player {
            return Err(GameError::GuesserCannotSubmit);
        }
        self.current_turn_mut().set_submission(player, text);
        self.recheck_submissions();
        Ok(())
    }

    /// Ends the current turn and rotates the guesser role to the next
    /// roster member in join order, wrapping to the first. Points (+1
    /// for the submitter, +1 for the guesser) flow only when `best`
    /// names a player who actually submitted this turn;
    /// `_guessed_correctly` is carried by the protocol but does not
    /// influence scoring.
    pub fn finish_turn(&mut self, _guessed_correctly: bool, best: Option<&str>) {
        if let Some(best_name) = best {
            if self.current_turn().has_submission_from(best_name) {
                let guesser = self.current_turn().guesser.clone();
                self.current_turn_mut().best_submission_player_name =
                    Some(best_name.to_string());
                if let Some(player) = self.players.iter_mut().find(|p| p.name == best_name) {
                    player.points += 1;
                }
                if let Some(player) = self.players.iter_mut().find(|p| p.name == guesser) {
                    player.points += 1;
                }
            }
        }

        let guesser = self.current_turn().guesser.clone();
        let turn = Turn::new(self.words.draw(), self.player_after(&guesser));
        debug!(
            "room {}: turn finished, {} guesses next ({} phrases left)",
            self.name,
            turn.guesser,
            self.words.remaining()
        );
        self.turns.push_front(turn);
    }

    /// Replaces the current turn with a fresh phrase for the same
    /// guesser, discarding any submissions collected so far.
    pub fn skip_turn(&mut self) {
        let guesser = self.current_turn().guesser.clone();
        let turn = Turn::new(self.words.draw(), guesser);
        self.turns.push_front(turn);
    }

    /// Removes a player from the roster. Kicking the current guesser
    /// first force-finishes the turn with no credit so rotation always
    /// lands on a roster member. The kicked player's pending submission
    /// is dropped and completeness rechecked, since the removal may
    /// newly satisfy it. Returns the removed player, `None` for an
    /// unknown name.
    pub fn kick(&mut self, name: &str) -> Option<Player> {
        let index = self.players.iter().position(|p| p.name == name)?;
        if self.current_turn().guesser == name {
            self.finish_turn(false, None);
        }
        let removed = self.players.remove(index);
        self.current_turn_mut().remove_submission(name);
        self.recheck_submissions();
        Some(removed)
    }

    fn player_after(&self, name: &str) -> String {
        let next = self
            .players
            .iter()
            .position(|p| p.name == name)
            .map(|index| (index + 1) % self.players.len())
            .unwrap_or(0);
        self.players[next].name.clone()
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            players: self.players.iter().map(Player::snapshot).collect(),
            id: self.name.clone(),
            turns: self.turns.iter().map(Turn::snapshot).collect(),
        }
    }

    /// Marks players whose pong flag is still down from the previous
    /// probe as disconnected and returns their names; every surviving
    /// active player's flag is lowered again for the next tick.
    pub fn sweep_unponged(&mut self) -> Vec<String> {
        let mut dead = Vec::new();
        for player in self.players.iter_mut().filter(|p| p.active) {
            if !player.ponged {
                player.active = false;
                dead.push(player.name.clone());
            } else {
                player.ponged = false;
            }
        }
        dead
    }
}

use std::collections::HashMap;

use game_types::TurnSnapshot;

/// One round: a phrase, the player guessing it, and the other players'
/// written submissions. Immutable once a newer turn replaces it at the
/// head of the room's history.
#[derive(Debug)]
pub struct Turn {
    pub phrase: String,
    pub guesser: String,
    submissions: HashMap<String, String>,
    pub submissions_complete: bool,
    pub best_submission_player_name: Option<String>,
}

impl Turn {
    pub fn new(phrase: String, guesser: String) -> Self {
        Self {
            phrase,
            guesser,
            submissions: HashMap::new(),
            submissions_complete: false,
            best_submission_player_name: None,
        }
    }

    /// Inserts or overwrites `player`'s submission; one entry per player.
    pub fn set_submission(&mut self, player: &str, text: String) {
        self.submissions.insert(player.to_string(), text);
    }

    pub fn remove_submission(&mut self, player: &str) {
        self.submissions.remove(player);
    }

    pub fn has_submission_from(&self, player: &str) -> bool {
        self.submissions.contains_key(player)
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }

    pub fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            phrase: self.phrase.clone(),
            submissions: self.submissions.clone(),
            guesser: self.guesser.clone(),
            submissions_complete: self.submissions_complete,
            best_submission_player_name: self.best_submission_player_name.clone(),
        }
    }
}

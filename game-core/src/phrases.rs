use anyhow::{Context, Result};
use rand::Rng;
use std::path::Path;

/// Fallback phrase handed out once a room's pool runs dry. Callers
/// treat it as valid content, not an error.
pub const EXHAUSTED_PHRASE: &str = "sorry, there are no more words left.";

/// Immutable phrase list loaded once at process start. Each room copies
/// its own mutable pool from this template, so draws never cross rooms.
#[derive(Debug, Clone)]
pub struct Phraseset {
    phrases: Vec<String>,
}

impl Phraseset {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("failed to read phraseset {}", path.as_ref().display())
        })?;
        Ok(Self::from_list(&raw))
    }

    /// Builds a phraseset from newline-delimited text, dropping blank
    /// lines.
    pub fn from_list(list: &str) -> Self {
        let phrases = list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { phrases }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// A fresh drawing pool holding a private copy of every phrase.
    pub fn source(&self) -> WordSource {
        WordSource {
            remaining: self.phrases.clone(),
        }
    }
}

/// Per-room pool sampling phrases uniformly without replacement.
#[derive(Debug)]
pub struct WordSource {
    remaining: Vec<String>,
}

impl WordSource {
    pub fn draw(&mut self) -> String {
        if self.remaining.is_empty() {
            return EXHAUSTED_PHRASE.to_string();
        }
        let index = rand::thread_rng().gen_range(0..self.remaining.len());
        self.remaining.swap_remove(index)
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

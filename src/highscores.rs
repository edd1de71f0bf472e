//! High score leaderboard system
//!
//! One flat text file per game, tracks the top 5 scores. Each line is
//! `"<initials> <score>"`, best first.

use std::fs;
use std::io;
use std::path::Path;

use crate::sim::Key;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// Letters in a set of initials
pub const INITIALS_LEN: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreEntry {
    /// Three uppercase letters
    pub initials: String,
    pub score: u32,
}

impl HighScoreEntry {
    pub fn new(initials: impl Into<String>, score: u32) -> Self {
        Self {
            initials: initials.into(),
            score,
        }
    }

    /// Parse one `"<initials> <score>"` line. Initials must be exactly
    /// `INITIALS_LEN` ASCII letters.
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let initials = parts.next()?;
        let letters_only = initials.chars().all(|c| c.is_ascii_alphabetic());
        if initials.len() != INITIALS_LEN || !letters_only {
            return None;
        }
        let score = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(initials, score))
    }
}

/// High score leaderboard, sorted descending by score
///
/// Equal scores keep insertion order: whoever got there first ranks higher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // A tie with the lowest entry does not displace it
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, initials: &str, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry::new(initials, score);

        // Insert after every entry with an equal or higher score
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a leaderboard file's contents, skipping malformed lines
    pub fn parse(contents: &str) -> Self {
        let mut entries: Vec<HighScoreEntry> = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let entry = HighScoreEntry::parse(line);
                if entry.is_none() {
                    log::warn!("Skipping malformed high score line {:?}", line);
                }
                entry
            })
            .collect();
        // Stable: file order breaks ties
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// File contents for this leaderboard
    pub fn to_file_string(&self) -> String {
        self.entries
            .iter()
            .take(MAX_HIGH_SCORES)
            .map(|e| format!("{} {}\n", e.initials, e.score))
            .collect()
    }

    /// Load high scores from `path`. A missing or unreadable file is an empty board.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let scores = Self::parse(&contents);
                log::info!(
                    "Loaded {} high scores from {}",
                    scores.entries.len(),
                    path.display()
                );
                scores
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high scores at {}, starting fresh", path.display());
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Save high scores to `path`
    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_file_string())?;
        log::info!(
            "High scores saved to {} ({} entries)",
            path.display(),
            self.entries.len()
        );
        Ok(())
    }
}

/// Outcome of feeding a key to the initials prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// Still typing
    Editing,
    /// Enter pressed with all letters typed
    Submitted(String),
    /// Escape pressed; the score is not recorded
    Skipped,
}

/// Collects three initials from discrete key presses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialsPrompt {
    letters: String,
}

impl InitialsPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn letters(&self) -> &str {
        &self.letters
    }

    pub fn is_complete(&self) -> bool {
        self.letters.len() == INITIALS_LEN
    }

    /// Letters so far, padded with underscores
    pub fn display(&self) -> String {
        let mut shown = self.letters.clone();
        while shown.len() < INITIALS_LEN {
            shown.push('_');
        }
        shown
    }

    pub fn handle(&mut self, key: Key) -> PromptEvent {
        match key {
            Key::Letter(c) if c.is_ascii_alphabetic() && !self.is_complete() => {
                self.letters.push(c.to_ascii_uppercase());
            }
            Key::Backspace => {
                self.letters.pop();
            }
            Key::Enter if self.is_complete() => {
                return PromptEvent::Submitted(self.letters.clone());
            }
            Key::Escape => return PromptEvent::Skipped,
            _ => {}
        }
        PromptEvent::Editing
    }
}

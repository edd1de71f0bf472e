//! Game settings and preferences
//!
//! Persisted as JSON next to the executable's working directory. Missing
//! fields take their defaults, so older files keep loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::GameKind;
use crate::consts::{ARCADE_HZ, SNAKE_HZ};

/// Settings file looked up in the working directory
pub const SETTINGS_FILE: &str = "mini_arcade.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the high score files
    pub data_dir: PathBuf,
    /// Fixed seed for reproducible runs; random per run when unset
    pub seed: Option<u64>,

    // === Tick rates ===
    pub breakout_hz: u32,
    pub jumper_hz: u32,
    pub snake_hz: u32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            seed: None,

            breakout_hz: ARCADE_HZ,
            jumper_hz: ARCADE_HZ,
            snake_hz: SNAKE_HZ,

            show_fps: false,
        }
    }
}

impl Settings {
    /// Ticks per second for a game (never zero)
    pub fn tick_rate(&self, game: GameKind) -> u32 {
        let hz = match game {
            GameKind::Breakout => self.breakout_hz,
            GameKind::Jumper => self.jumper_hz,
            GameKind::Snake => self.snake_hz,
        };
        hz.max(1)
    }

    /// High score file for a game
    pub fn scores_path(&self, game: GameKind) -> PathBuf {
        self.data_dir.join(game.scores_file())
    }

    /// Seed for a new run
    pub fn seed_for_run(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Parse settings JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

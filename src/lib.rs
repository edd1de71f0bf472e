//! Mini Arcade - Breakout, Jumper and Snake on one fixed-tick loop
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, per-game state and tick)
//! - `app`: Fixed-rate run loop driving a simulation against a render surface
//! - `menu`: Game selection screen
//! - `renderer`: Render surface abstraction and the crossterm terminal backend
//! - `highscores`: Top-5 tables persisted as flat text files
//! - `settings`: Preferences loaded from JSON

pub mod app;
pub mod highscores;
pub mod menu;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// World configuration shared by every game
pub mod consts {
    /// World width in simulation units
    pub const SCREEN_WIDTH: f32 = 600.0;
    /// World height in simulation units
    pub const SCREEN_HEIGHT: f32 = 400.0;

    /// Tick rate for Breakout and Jumper
    pub const ARCADE_HZ: u32 = 60;
    /// Tick rate for Snake (slower so grid steps stay legible)
    pub const SNAKE_HZ: u32 = 10;
}

//! Jumper: an endless vertical platformer
//!
//! The player bounces automatically on landing; the world scrolls down as
//! they climb and new platforms are generated above. Falling off the bottom
//! ends the run.

pub mod platform;
pub mod state;
pub mod tick;

pub use platform::{
    Landing, Platform, PlatformKind, Variant, VariantOdds, choose_kind, variant_odds,
};
pub use state::{JumperState, Phase, Player};
pub use tick::{frame, landing_candidate, replenish, spawn_platform, tick};

/// Jumper tuning
pub mod consts {
    /// Added to `vel_y` every tick
    pub const GRAVITY: f32 = 0.5;
    /// `vel_y` after a landing (negative is up)
    pub const JUMP_STRENGTH: f32 = -10.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Units per tick while a direction is held
    pub const PLAYER_SPEED: f32 = 5.0;
    /// How far below a platform's bottom edge the player's feet may be and still land
    pub const LANDING_TOLERANCE: f32 = 10.0;

    pub const PLATFORM_WIDTH: f32 = 100.0;
    pub const PLATFORM_HEIGHT: f32 = 10.0;
    pub const MOVING_PLATFORM_SPEED: f32 = 2.0;
    /// Replenish until at least this many platforms are active
    pub const MIN_PLATFORMS: usize = 6;
    /// Vertical distance between a new platform and the highest existing one
    pub const SPAWN_GAP_MIN: i32 = 50;
    pub const SPAWN_GAP_MAX: i32 = 120;
    /// New platforms are centered within this distance of the player's center
    pub const SPAWN_REACH: f32 = 150.0;

    /// Initial layout: platforms at `y = i * INITIAL_SPACING` for `i < INITIAL_PLATFORMS`
    pub const INITIAL_PLATFORMS: usize = 6;
    pub const INITIAL_SPACING: f32 = 80.0;

    /// Score at which moving platforms start to appear
    pub const MOVING_SCORE: u32 = 30;
    /// Score at which breakable platforms start to appear
    pub const BREAKABLE_SCORE: u32 = 45;
}

//! Breakout: paddle, ball and multi-hit bricks
//!
//! `WaitingToStart -> Running -> {LevelCleared, GameOver}`, with
//! `Running -> WaitingToStart` whenever a life is lost and lives remain.

pub mod level;
pub mod state;
pub mod tick;

pub use level::{LEVELS, build_bricks, layout};
pub use state::{Ball, BreakoutState, Brick, Paddle, Phase};
pub use tick::{BounceReport, frame, resolve_collisions, tick};

/// Breakout tuning
pub mod consts {
    pub const PADDLE_WIDTH: f32 = 80.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Gap between the paddle's bottom edge and the bottom of the screen
    pub const PADDLE_BOTTOM_MARGIN: f32 = 20.0;
    /// Units per tick while a direction is held
    pub const PADDLE_SPEED: f32 = 6.0;

    pub const BALL_SIZE: f32 = 10.0;
    /// Per-axis ball speed in units per tick
    pub const BALL_SPEED: f32 = 3.0;

    pub const BRICK_WIDTH: f32 = 50.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_GAP: f32 = 5.0;
    /// Top edge of the first brick row
    pub const BRICK_TOP: f32 = 40.0;
    pub const POINTS_PER_BRICK: u32 = 10;

    pub const STARTING_LIVES: u8 = 3;
}

//! Breakout entities and run state

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::consts::*;
use super::level::{self, LEVELS};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::rect::Rect;
use crate::sim::score::Scoreboard;

/// Current phase of a Breakout run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ball frozen at center until Space is pressed
    WaitingToStart,
    /// Active gameplay
    Running,
    /// Every brick destroyed
    LevelCleared,
    /// Out of lives
    GameOver,
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    pub rect: Rect,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            rect: Rect::from_mid_bottom(
                Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - PADDLE_BOTTOM_MARGIN),
                Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            ),
        }
    }
}

impl Paddle {
    /// Move by `direction` (-1, 0 or +1) times the paddle speed, staying on screen
    pub fn steer(&mut self, direction: f32) {
        let x = self.rect.x + direction * PADDLE_SPEED;
        self.rect.x = x.clamp(0.0, SCREEN_WIDTH - self.rect.w);
    }

    /// Back to center-bottom
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The ball (bounding box of a circle)
#[derive(Debug, Clone)]
pub struct Ball {
    pub rect: Rect,
    pub vel: Vec2,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            rect: Self::centered(),
            vel: Vec2::new(BALL_SPEED, -BALL_SPEED),
        }
    }
}

impl Ball {
    fn centered() -> Rect {
        Rect::from_center(
            Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
            Vec2::splat(BALL_SIZE),
        )
    }

    pub fn advance(&mut self) {
        self.rect.translate(self.vel);
    }

    /// Back to center, heading up, with the given horizontal sign
    pub fn reset(&mut self, horizontal_sign: f32) {
        self.rect = Self::centered();
        self.vel = Vec2::new(BALL_SPEED * horizontal_sign.signum(), -BALL_SPEED);
    }
}

/// A brick that takes one or more hits
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub id: u32,
    pub rect: Rect,
    pub hits_remaining: u8,
    /// Tier at build time (display only)
    pub max_hits: u8,
}

impl Brick {
    pub fn new(id: u32, rect: Rect, hits: u8) -> Self {
        debug_assert!(hits > 0);
        Self {
            id,
            rect,
            hits_remaining: hits,
            max_hits: hits,
        }
    }

    /// Take one hit. Returns true when the brick is destroyed.
    pub fn hit(&mut self) -> bool {
        self.hits_remaining = self.hits_remaining.saturating_sub(1);
        self.hits_remaining == 0
    }
}

/// Complete Breakout run state
#[derive(Debug, Clone)]
pub struct BreakoutState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Layout index into `LEVELS`
    pub level: usize,
    pub phase: Phase,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Active bricks in layout order
    pub bricks: Vec<Brick>,
    pub board: Scoreboard,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl BreakoutState {
    /// New run on layout `level` (0-based; out-of-range indices use the last layout)
    pub fn new(level: usize, seed: u64) -> Self {
        let last = LEVELS.len() - 1;
        let (level, rows) = match level::layout(level) {
            Some(rows) => (level, rows),
            None => {
                log::warn!("No level {}, using level {}", level, last);
                (last, LEVELS[last])
            }
        };
        let bricks = level::build_bricks(rows);
        log::info!("Breakout level {} built with {} bricks", level + 1, bricks.len());

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level,
            phase: Phase::WaitingToStart,
            paddle: Paddle::default(),
            ball: Ball::default(),
            bricks,
            board: Scoreboard::with_lives(STARTING_LIVES),
            time_ticks: 0,
        }
    }

    /// Run with an explicit brick set (tests and custom layouts)
    pub fn with_bricks(bricks: Vec<Brick>, seed: u64) -> Self {
        let mut state = Self::new(0, seed);
        state.bricks = bricks;
        state
    }

    pub fn lives(&self) -> u8 {
        self.board.lives.unwrap_or(0)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::LevelCleared | Phase::GameOver)
    }
}

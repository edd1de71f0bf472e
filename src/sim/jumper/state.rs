//! Jumper entities and run state

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::consts::*;
use super::platform::{Platform, Variant};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::rect::Rect;
use crate::sim::score::Scoreboard;

/// Current phase of a Jumper run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Fell off the bottom of the screen
    GameOver,
}

/// The jumping player
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub vel_y: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::from_center(
                Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - 100.0),
                Vec2::splat(PLAYER_SIZE),
            ),
            vel_y: 0.0,
        }
    }
}

impl Player {
    pub fn steer(&mut self, direction: f32) {
        self.rect.x += direction * PLAYER_SPEED;
    }

    /// Accelerate downward, then move by the new velocity
    pub fn fall(&mut self) {
        self.vel_y += GRAVITY;
        self.rect.y += self.vel_y;
    }

    /// Leaving one side of the screen reappears on the other
    pub fn wrap(&mut self, screen_width: f32) {
        if self.rect.right() < 0.0 {
            self.rect.set_left(screen_width);
        } else if self.rect.left() > screen_width {
            self.rect.set_right(0.0);
        }
    }

    pub fn is_descending(&self) -> bool {
        self.vel_y > 0.0
    }
}

/// Complete Jumper run state
#[derive(Debug, Clone)]
pub struct JumperState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: Phase,
    pub player: Player,
    /// Active platforms in spawn order
    pub platforms: Vec<Platform>,
    /// Id of the platform landed on most recently
    pub last_landed: Option<u32>,
    pub board: Scoreboard,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next platform id
    next_id: u32,
}

impl JumperState {
    /// New run: a start platform under the player plus a column of random ones
    pub fn new(seed: u64) -> Self {
        let mut state = Self::empty(seed);

        let start_x = SCREEN_WIDTH / 2.0 - PLATFORM_WIDTH / 2.0;
        state.add_platform(start_x, SCREEN_HEIGHT - 50.0, Variant::Static);

        let max_x = (SCREEN_WIDTH - PLATFORM_WIDTH) as i32;
        for i in 0..INITIAL_PLATFORMS {
            let x = state.rng.random_range(0..=max_x) as f32;
            state.add_platform(x, i as f32 * INITIAL_SPACING, Variant::Static);
        }

        log::info!("Jumper run started with seed {}", seed);
        state
    }

    /// Run with no platforms at all (tests build their own stage)
    pub fn empty(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Playing,
            player: Player::default(),
            platforms: Vec::new(),
            last_landed: None,
            board: Scoreboard::new(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new platform id
    pub fn next_platform_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a platform with a fresh id, returning the id
    pub fn add_platform(&mut self, x: f32, y: f32, variant: Variant) -> u32 {
        let id = self.next_platform_id();
        self.platforms.push(Platform::new(id, x, y, variant));
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

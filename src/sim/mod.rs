//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per fixed step, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (insertion order, entity ids)
//! - No rendering or platform dependencies

pub mod breakout;
pub mod collision;
pub mod frame;
pub mod input;
pub mod jumper;
pub mod rect;
pub mod score;
pub mod snake;

pub use collision::{WallContact, overlap_set, wall_contact};
pub use frame::{Anchor, Fill, Frame, Sprite, TextOverlay};
pub use input::{HeldKeys, Key, TickInput};
pub use rect::Rect;
pub use score::Scoreboard;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every brick destroyed
    Cleared,
    /// Out of lives, fell off-screen, or crashed
    GameOver,
}

/// A game that can be driven by the shared run loop
pub trait Simulation {
    /// Advance by one fixed step
    fn tick(&mut self, input: &TickInput);

    /// Render state for the current tick
    fn frame(&self) -> Frame;

    /// `Some` once the run has reached a terminal state
    fn outcome(&self) -> Option<RunOutcome>;

    /// Current score
    fn score(&self) -> u32;
}

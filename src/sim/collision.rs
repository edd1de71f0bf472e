//! Collision detection shared by every game
//!
//! Only detection lives here; what a hit means (bounce, destroy, score) is
//! decided by each game's tick.

use super::rect::Rect;

/// Which screen walls a rectangle is touching or past
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallContact {
    /// Touching the left or right wall
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }
}

/// Check a rectangle against the screen bounds `[0, width] x [0, height]`
///
/// Contact is inclusive: an edge lying exactly on a wall counts.
pub fn wall_contact(rect: &Rect, width: f32, height: f32) -> WallContact {
    WallContact {
        left: rect.left() <= 0.0,
        right: rect.right() >= width,
        top: rect.top() <= 0.0,
        bottom: rect.bottom() >= height,
    }
}

/// Indices of every rectangle in `others` that overlaps `rect`, in iteration order
pub fn overlap_set<'a, I>(rect: &Rect, others: I) -> Vec<usize>
where
    I: IntoIterator<Item = &'a Rect>,
{
    others
        .into_iter()
        .enumerate()
        .filter(|(_, other)| rect.intersects(other))
        .map(|(i, _)| i)
        .collect()
}

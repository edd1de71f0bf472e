//! Platform variants and the score-gated generation policy

use super::consts::*;
use crate::sim::rect::Rect;

/// Platform kind without per-variant data (for rendering and policy)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Static,
    Moving,
    Breakable,
}

/// Variant-specific platform state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    Static,
    /// Slides horizontally, reversing at the screen edges
    Moving { speed: f32 },
    /// Gone after the first landing
    Breakable { broken: bool },
}

impl Variant {
    pub fn kind(&self) -> PlatformKind {
        match self {
            Variant::Static => PlatformKind::Static,
            Variant::Moving { .. } => PlatformKind::Moving,
            Variant::Breakable { .. } => PlatformKind::Breakable,
        }
    }
}

/// What a landing did to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// Platform stays in play
    Stay,
    /// Platform broke and must leave the active set
    Break,
}

/// A platform the player can land on
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub id: u32,
    pub rect: Rect,
    pub variant: Variant,
}

impl Platform {
    pub fn new(id: u32, x: f32, y: f32, variant: Variant) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, PLATFORM_WIDTH, PLATFORM_HEIGHT),
            variant,
        }
    }

    pub fn kind(&self) -> PlatformKind {
        self.variant.kind()
    }

    pub fn is_broken(&self) -> bool {
        matches!(self.variant, Variant::Breakable { broken: true })
    }

    /// Per-tick movement, independent of player input
    pub fn update(&mut self, screen_width: f32) {
        if let Variant::Moving { speed } = &mut self.variant {
            self.rect.x += *speed;
            if self.rect.left() <= 0.0 {
                self.rect.set_left(0.0);
                *speed = speed.abs();
            } else if self.rect.right() >= screen_width {
                self.rect.set_right(screen_width);
                *speed = -speed.abs();
            }
        }
    }

    /// Called when the player lands on this platform
    pub fn on_landed(&mut self) -> Landing {
        match &mut self.variant {
            Variant::Breakable { broken } => {
                *broken = true;
                Landing::Break
            }
            Variant::Static | Variant::Moving { .. } => Landing::Stay,
        }
    }
}

/// Percent chance of each kind for a newly spawned platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantOdds {
    pub breakable: u32,
    pub moving: u32,
    pub fixed: u32,
}

/// Generation policy for the current score
pub fn variant_odds(score: u32) -> VariantOdds {
    if score >= BREAKABLE_SCORE {
        VariantOdds {
            breakable: 50,
            moving: 20,
            fixed: 30,
        }
    } else if score >= MOVING_SCORE {
        VariantOdds {
            breakable: 0,
            moving: 30,
            fixed: 70,
        }
    } else {
        VariantOdds {
            breakable: 0,
            moving: 0,
            fixed: 100,
        }
    }
}

/// Pick a kind from a roll in `0..100`
pub fn choose_kind(score: u32, roll: u32) -> PlatformKind {
    let odds = variant_odds(score);
    if roll < odds.breakable {
        PlatformKind::Breakable
    } else if roll < odds.breakable + odds.moving {
        PlatformKind::Moving
    } else {
        PlatformKind::Static
    }
}

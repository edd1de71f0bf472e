//! Render state emitted by a simulation each tick
//!
//! The simulation describes what to draw; the renderer decides colors and
//! how to map world units onto its surface. Nothing is read back.

use glam::Vec2;

use super::jumper::PlatformKind;
use super::rect::Rect;

/// What a sprite represents (the renderer picks the fill for each)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Paddle,
    /// Drawn as a circle inscribed in its rectangle
    Ball,
    Brick { hits_remaining: u8, max_hits: u8 },
    Player,
    Platform(PlatformKind),
    SnakeHead,
    SnakeBody,
    Food,
}

/// A filled rectangle (or inscribed circle, for `Fill::Ball`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub rect: Rect,
    pub fill: Fill,
}

/// Where a text overlay is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopRight,
    /// Centered; `line` offsets from the middle row of the screen
    Center { line: i8 },
}

/// A line of text drawn over the sprites
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub anchor: Anchor,
    pub text: String,
}

/// Everything a renderer needs for one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// World size in simulation units
    pub world: Vec2,
    pub sprites: Vec<Sprite>,
    pub overlays: Vec<TextOverlay>,
}

impl Frame {
    pub fn new(world: Vec2) -> Self {
        Self {
            world,
            sprites: Vec::new(),
            overlays: Vec::new(),
        }
    }

    pub fn sprite(&mut self, rect: Rect, fill: Fill) {
        self.sprites.push(Sprite { rect, fill });
    }

    pub fn text(&mut self, anchor: Anchor, text: impl Into<String>) {
        self.overlays.push(TextOverlay {
            anchor,
            text: text.into(),
        });
    }

    /// Number of sprites with the given fill
    pub fn count(&self, fill: Fill) -> usize {
        self.sprites.iter().filter(|s| s.fill == fill).count()
    }
}

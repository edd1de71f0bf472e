//! Main menu

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::{Anchor, Frame, Key};

/// A menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Breakout on a layout index (0-based)
    Breakout(usize),
    Jumper,
    Snake,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 6] = [
        MenuItem::Breakout(0),
        MenuItem::Breakout(1),
        MenuItem::Breakout(2),
        MenuItem::Jumper,
        MenuItem::Snake,
        MenuItem::Quit,
    ];

    pub fn label(&self) -> String {
        match self {
            MenuItem::Breakout(level) => format!("Breakout - Level {}", level + 1),
            MenuItem::Jumper => "Jumper".to_string(),
            MenuItem::Snake => "Snake".to_string(),
            MenuItem::Quit => "Quit".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub selected: usize,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> MenuItem {
        MenuItem::ALL[self.selected % MenuItem::ALL.len()]
    }

    /// Up/Down move the selection (wrapping); Enter picks it, Escape picks Quit
    pub fn handle(&mut self, key: Key) -> Option<MenuItem> {
        let count = MenuItem::ALL.len();
        match key {
            Key::Up => {
                self.selected = (self.selected + count - 1) % count;
                None
            }
            Key::Down => {
                self.selected = (self.selected + 1) % count;
                None
            }
            Key::Enter | Key::Space => Some(self.current()),
            Key::Escape => Some(MenuItem::Quit),
            _ => None,
        }
    }

    pub fn frame(&self) -> Frame {
        let mut frame = Frame::new(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        let first = -(MenuItem::ALL.len() as i8) / 2;
        frame.text(Anchor::Center { line: first - 2 }, "Choose a Game:");
        for (i, item) in MenuItem::ALL.iter().enumerate() {
            let marker = if i == self.selected { "> " } else { "  " };
            frame.text(
                Anchor::Center {
                    line: first + i as i8,
                },
                format!("{}{:<20}", marker, item.label()),
            );
        }
        frame.text(
            Anchor::Center {
                line: first + MenuItem::ALL.len() as i8 + 1,
            },
            "Up/Down to move, Enter to play",
        );
        frame
    }
}

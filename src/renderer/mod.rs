//! Render surfaces
//!
//! A surface draws the `Frame` a simulation emits and reports the keys seen
//! since the last poll. Games never read anything back from it.

pub mod terminal;

pub use terminal::TerminalRenderer;

use std::io;

use crate::sim::{Frame, TickInput};

/// Input gathered by one poll
#[derive(Debug, Clone, Default)]
pub struct Polled {
    pub input: TickInput,
    /// Quit signal; the caller exits the process
    pub quit: bool,
}

/// Trait that abstracts the rendering backend
pub trait Surface {
    /// Take over the display
    fn init(&mut self) -> io::Result<()>;

    /// Draw one frame
    fn present(&mut self, frame: &Frame) -> io::Result<()>;

    /// Collect input without blocking
    fn poll_input(&mut self) -> io::Result<Polled>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;
}

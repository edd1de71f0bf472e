//! Input commands for a single tick
//!
//! Two channels: the directional keys currently held down, and discrete key
//! presses that arrived since the previous tick.

/// Directional keys held during this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl HeldKeys {
    /// -1 for left, +1 for right, 0 when neither or both are held
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// A discrete key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    Escape,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Letter(char),
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held directional keys
    pub held: HeldKeys,
    /// Presses since the previous tick, oldest first
    pub pressed: Vec<Key>,
}

impl TickInput {
    /// Input with only held keys
    pub fn holding(held: HeldKeys) -> Self {
        Self {
            held,
            pressed: Vec::new(),
        }
    }

    /// Input with a single key press
    pub fn press(key: Key) -> Self {
        Self {
            held: HeldKeys::default(),
            pressed: vec![key],
        }
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_axis() {
        let mut held = HeldKeys::default();
        assert_eq!(held.horizontal(), 0.0);
        held.left = true;
        assert_eq!(held.horizontal(), -1.0);
        held.right = true;
        assert_eq!(held.horizontal(), 0.0);
        held.left = false;
        assert_eq!(held.horizontal(), 1.0);
    }

    #[test]
    fn test_was_pressed() {
        let input = TickInput::press(Key::Space);
        assert!(input.was_pressed(Key::Space));
        assert!(!input.was_pressed(Key::Enter));
    }
}

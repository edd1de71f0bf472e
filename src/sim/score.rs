//! Score and lives tracking for one run

/// Result of losing a life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeLoss {
    /// Lives remain; play continues after a reset
    Continue { remaining: u8 },
    /// No lives left
    Exhausted,
}

/// Counters updated by collision outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u32,
    /// `None` for games where a single mistake ends the run
    pub lives: Option<u8>,
}

impl Scoreboard {
    /// Scoreboard without lives
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lives(lives: u8) -> Self {
        Self {
            score: 0,
            lives: Some(lives),
        }
    }

    pub fn award(&mut self, points: u32) {
        self.score += points;
    }

    /// Remove one life. Games without lives are always exhausted.
    pub fn lose_life(&mut self) -> LifeLoss {
        match self.lives.as_mut() {
            Some(lives) => {
                *lives = lives.saturating_sub(1);
                if *lives == 0 {
                    LifeLoss::Exhausted
                } else {
                    LifeLoss::Continue { remaining: *lives }
                }
            }
            None => LifeLoss::Exhausted,
        }
    }
}

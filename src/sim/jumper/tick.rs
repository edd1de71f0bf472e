//! Fixed timestep Jumper tick
//!
//! Per tick: move platforms and player, land on a platform if descending onto
//! one, scroll the world once the player climbs into the top third, top the
//! platform count back up, and end the run if the player fell off.

use glam::Vec2;
use rand::Rng;

use super::consts::*;
use super::platform::{Landing, Platform, PlatformKind, Variant, choose_kind};
use super::state::{JumperState, Phase};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::collision::overlap_set;
use crate::sim::frame::{Anchor, Fill, Frame};
use crate::sim::input::TickInput;
use crate::sim::rect::Rect;
use crate::sim::{RunOutcome, Simulation};

/// Advance the run by one fixed timestep
pub fn tick(state: &mut JumperState, input: &TickInput) {
    if state.is_over() {
        return;
    }
    state.time_ticks += 1;

    for platform in &mut state.platforms {
        platform.update(SCREEN_WIDTH);
    }
    state.player.steer(input.held.horizontal());
    state.player.fall();
    state.player.wrap(SCREEN_WIDTH);

    land(state);
    scroll(state);
    replenish(state);

    if state.player.rect.top() > SCREEN_HEIGHT {
        log::info!("Jumper run over with score {}", state.board.score);
        state.phase = Phase::GameOver;
    }
}

/// Platform the player would land on, if any overlaps them
///
/// Picks the overlapping platform with the greatest top coordinate (the one
/// nearest the player's feet); ties go to the earliest in `platforms`.
pub fn landing_candidate(player: &Rect, platforms: &[Platform]) -> Option<usize> {
    overlap_set(player, platforms.iter().map(|p| &p.rect))
        .into_iter()
        .fold(None, |best, i| match best {
            Some(b) if platforms[b].rect.top() >= platforms[i].rect.top() => Some(b),
            _ => Some(i),
        })
}

/// Bounce off a platform if the player is descending onto one.
/// Returns the id of the platform landed on.
fn land(state: &mut JumperState) -> Option<u32> {
    if !state.player.is_descending() {
        return None;
    }
    let index = landing_candidate(&state.player.rect, &state.platforms)?;
    let target = state.platforms[index].rect;
    if state.player.rect.bottom() > target.bottom() + LANDING_TOLERANCE {
        return None;
    }

    state.player.rect.set_bottom(target.top());
    state.player.vel_y = JUMP_STRENGTH;

    let platform = &mut state.platforms[index];
    let id = platform.id;
    if state.last_landed != Some(id) {
        state.board.award(1);
        state.last_landed = Some(id);
        log::trace!("Landed on platform {}, score {}", id, state.board.score);
    }
    if platform.on_landed() == Landing::Break {
        log::debug!("Platform {} broke", id);
        state.platforms.retain(|p| !p.is_broken());
    }
    Some(id)
}

/// Keep the player below the top third by moving the world down
fn scroll(state: &mut JumperState) {
    if state.player.rect.top() > SCREEN_HEIGHT / 3.0 {
        return;
    }
    let shift = Vec2::new(0.0, state.player.vel_y.abs());
    state.player.rect.translate(shift);
    for platform in &mut state.platforms {
        platform.rect.translate(shift);
    }
    state.platforms.retain(|p| p.rect.top() < SCREEN_HEIGHT);
}

/// Spawn platforms until `MIN_PLATFORMS` are active. Returns how many were added.
pub fn replenish(state: &mut JumperState) -> usize {
    let mut spawned = 0;
    while state.platforms.len() < MIN_PLATFORMS {
        spawn_platform(state);
        spawned += 1;
    }
    spawned
}

/// Spawn one platform above the highest active one (or above the player if
/// none remain), within reach of the player. Returns the new platform's id.
pub fn spawn_platform(state: &mut JumperState) -> u32 {
    let highest = state
        .platforms
        .iter()
        .map(|p| p.rect.top())
        .fold(f32::INFINITY, f32::min);
    let reference = if highest.is_finite() {
        highest
    } else {
        state.player.rect.top()
    };

    let gap = state.rng.random_range(SPAWN_GAP_MIN..=SPAWN_GAP_MAX) as f32;
    let reach = state.rng.random_range(-SPAWN_REACH..=SPAWN_REACH);
    let center = state.player.rect.center().x + reach;
    let x = (center - PLATFORM_WIDTH / 2.0).clamp(0.0, SCREEN_WIDTH - PLATFORM_WIDTH);

    let roll = state.rng.random_range(0..100);
    let variant = match choose_kind(state.board.score, roll) {
        PlatformKind::Static => Variant::Static,
        PlatformKind::Moving => {
            let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            Variant::Moving {
                speed: MOVING_PLATFORM_SPEED * direction,
            }
        }
        PlatformKind::Breakable => Variant::Breakable { broken: false },
    };

    let id = state.add_platform(x, reference - gap, variant);
    log::debug!(
        "Spawned {:?} platform {} at ({:.0}, {:.0})",
        variant.kind(),
        id,
        x,
        reference - gap
    );
    id
}

/// Render state for the current tick
pub fn frame(state: &JumperState) -> Frame {
    let mut frame = Frame::new(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    for platform in &state.platforms {
        frame.sprite(platform.rect, Fill::Platform(platform.kind()));
    }
    frame.sprite(state.player.rect, Fill::Player);
    frame.text(Anchor::TopLeft, format!("Score: {}", state.board.score));
    frame
}

impl Simulation for JumperState {
    fn tick(&mut self, input: &TickInput) {
        tick(self, input);
    }

    fn frame(&self) -> Frame {
        frame(self)
    }

    fn outcome(&self) -> Option<RunOutcome> {
        match self.phase {
            Phase::GameOver => Some(RunOutcome::GameOver),
            Phase::Playing => None,
        }
    }

    fn score(&self) -> u32 {
        self.board.score
    }
}

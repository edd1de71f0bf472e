//! Snake on a 20-unit grid
//!
//! The head advances one cell per tick. Hitting a wall or any segment ends
//! the run; eating food grows the snake by skipping the tail pop.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::frame::{Anchor, Fill, Frame};
use super::input::{Key, TickInput};
use super::rect::Rect;
use super::{RunOutcome, Simulation};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Snake tuning
pub mod consts {
    /// Grid cell size in world units
    pub const TILE_SIZE: i32 = 20;
    pub const GRID_WIDTH: i32 = 600;
    pub const GRID_HEIGHT: i32 = 400;
}

use self::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// One grid step in this direction
    pub fn step(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -TILE_SIZE),
            Direction::Down => IVec2::new(0, TILE_SIZE),
            Direction::Left => IVec2::new(-TILE_SIZE, 0),
            Direction::Right => IVec2::new(TILE_SIZE, 0),
        }
    }

    fn from_key(key: Key) -> Option<Direction> {
        match key {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Hit a wall or itself
    GameOver,
}

/// Complete Snake run state
#[derive(Debug, Clone)]
pub struct SnakeState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: Phase,
    /// Segment top-left corners, head first
    pub segments: VecDeque<IVec2>,
    /// Direction the next tick will move in
    pub direction: Direction,
    /// Direction of the most recent move (reversal guard)
    pub moved: Direction,
    pub food: IVec2,
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SnakeState {
    pub fn new(seed: u64) -> Self {
        log::info!("Snake run started with seed {}", seed);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Playing,
            segments: VecDeque::from([
                IVec2::new(100, 100),
                IVec2::new(80, 100),
                IVec2::new(60, 100),
            ]),
            direction: Direction::Right,
            moved: Direction::Right,
            food: IVec2::new(GRID_WIDTH / 2, GRID_HEIGHT / 2),
            score: 0,
            time_ticks: 0,
        }
    }

    pub fn head(&self) -> IVec2 {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Queue a turn for the next tick. Reversing onto the previous move is
    /// rejected, even after an intermediate turn within the same tick.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.moved.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

/// Whether a cell lies on the grid
pub fn in_bounds(cell: IVec2) -> bool {
    (0..GRID_WIDTH).contains(&cell.x) && (0..GRID_HEIGHT).contains(&cell.y)
}

/// Uniformly random grid cell. Cells under the snake are not excluded.
pub fn random_cell(rng: &mut Pcg32) -> IVec2 {
    IVec2::new(
        rng.random_range(0..GRID_WIDTH / TILE_SIZE) * TILE_SIZE,
        rng.random_range(0..GRID_HEIGHT / TILE_SIZE) * TILE_SIZE,
    )
}

/// Advance the run by one fixed timestep
pub fn tick(state: &mut SnakeState, input: &TickInput) {
    if state.is_over() {
        return;
    }
    state.time_ticks += 1;

    for key in &input.pressed {
        if let Some(direction) = Direction::from_key(*key) {
            state.set_direction(direction);
        }
    }

    let head = state.head() + state.direction.step();
    // The tail has not moved yet, so it still blocks
    if !in_bounds(head) || state.segments.contains(&head) {
        log::info!(
            "Snake crashed at ({}, {}) with score {}",
            head.x,
            head.y,
            state.score
        );
        state.phase = Phase::GameOver;
        return;
    }

    state.segments.push_front(head);
    state.moved = state.direction;

    if head == state.food {
        state.score += 1;
        state.food = random_cell(&mut state.rng);
        log::trace!("Food eaten, respawned at ({}, {})", state.food.x, state.food.y);
    } else {
        state.segments.pop_back();
    }
}

fn cell_rect(cell: IVec2) -> Rect {
    Rect::new(
        cell.x as f32,
        cell.y as f32,
        TILE_SIZE as f32,
        TILE_SIZE as f32,
    )
}

/// Render state for the current tick
pub fn frame(state: &SnakeState) -> Frame {
    let mut frame = Frame::new(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    frame.sprite(cell_rect(state.food), Fill::Food);
    for (i, segment) in state.segments.iter().enumerate() {
        let fill = if i == 0 { Fill::SnakeHead } else { Fill::SnakeBody };
        frame.sprite(cell_rect(*segment), fill);
    }
    frame.text(Anchor::TopLeft, format!("Score: {}", state.score));
    frame
}

impl Simulation for SnakeState {
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
        self.score
    }
}

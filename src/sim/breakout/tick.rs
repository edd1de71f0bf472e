//! Fixed timestep Breakout tick
//!
//! Per tick while running: move paddle and ball, resolve walls, paddle and
//! bricks, then check for a cleared level and for a lost ball.

use glam::Vec2;
use rand::Rng;

use super::consts::POINTS_PER_BRICK;
use super::state::{BreakoutState, Phase};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::collision::{overlap_set, wall_contact};
use crate::sim::frame::{Anchor, Fill, Frame};
use crate::sim::input::{Key, TickInput};
use crate::sim::score::LifeLoss;
use crate::sim::{RunOutcome, Simulation};

/// What the collision pass did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BounceReport {
    pub flipped_x: bool,
    pub flipped_y: bool,
    pub hit_paddle: bool,
    /// Bricks that overlapped the ball
    pub bricks_hit: usize,
    /// Bricks that reached zero hits and were removed
    pub bricks_destroyed: usize,
}

/// Advance the run by one fixed timestep
pub fn tick(state: &mut BreakoutState, input: &TickInput) {
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;
    state.paddle.steer(input.held.horizontal());

    if state.phase == Phase::WaitingToStart {
        if !input.was_pressed(Key::Space) {
            return;
        }
        log::debug!("Ball launched at tick {}", state.time_ticks);
        state.phase = Phase::Running;
    }

    state.ball.advance();
    let had_bricks = !state.bricks.is_empty();
    let report = resolve_collisions(state);
    if report.bricks_destroyed > 0 {
        log::trace!(
            "Destroyed {} bricks, {} left",
            report.bricks_destroyed,
            state.bricks.len()
        );
    }

    if had_bricks && state.bricks.is_empty() {
        log::info!(
            "Level {} cleared with score {}",
            state.level + 1,
            state.board.score
        );
        state.phase = Phase::LevelCleared;
        return;
    }

    if state.ball.rect.top() > SCREEN_HEIGHT {
        match state.board.lose_life() {
            LifeLoss::Exhausted => {
                log::info!("Game over with score {}", state.board.score);
                state.phase = Phase::GameOver;
            }
            LifeLoss::Continue { remaining } => {
                log::info!("Ball lost, {} lives left", remaining);
                let sign = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
                state.ball.reset(sign);
                state.paddle.reset();
                state.phase = Phase::WaitingToStart;
            }
        }
    }
}

/// Resolve ball contacts for the current positions
///
/// Walls, paddle and bricks all feed one vertical flip, so `vel.y` changes
/// sign at most once per call no matter how many surfaces were touched.
/// Every overlapping brick loses one hit; bricks at zero are removed and
/// scored.
pub fn resolve_collisions(state: &mut BreakoutState) -> BounceReport {
    let ball = state.ball.rect;
    let walls = wall_contact(&ball, SCREEN_WIDTH, SCREEN_HEIGHT);
    let hit_paddle = ball.intersects(&state.paddle.rect);

    let hits = overlap_set(&ball, state.bricks.iter().map(|b| &b.rect));
    let mut destroyed = 0;
    for &i in &hits {
        if state.bricks[i].hit() {
            destroyed += 1;
        }
    }
    if destroyed > 0 {
        state.bricks.retain(|b| b.hits_remaining > 0);
        state.board.award(destroyed as u32 * POINTS_PER_BRICK);
    }

    let flipped_x = walls.horizontal();
    let flipped_y = walls.top || hit_paddle || !hits.is_empty();
    if flipped_x {
        state.ball.vel.x = -state.ball.vel.x;
    }
    if flipped_y {
        state.ball.vel.y = -state.ball.vel.y;
    }

    BounceReport {
        flipped_x,
        flipped_y,
        hit_paddle,
        bricks_hit: hits.len(),
        bricks_destroyed: destroyed,
    }
}

/// Render state for the current tick
pub fn frame(state: &BreakoutState) -> Frame {
    let mut frame = Frame::new(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    for brick in &state.bricks {
        frame.sprite(
            brick.rect,
            Fill::Brick {
                hits_remaining: brick.hits_remaining,
                max_hits: brick.max_hits,
            },
        );
    }
    frame.sprite(state.paddle.rect, Fill::Paddle);
    frame.sprite(state.ball.rect, Fill::Ball);

    frame.text(Anchor::TopLeft, format!("Score: {}", state.board.score));
    frame.text(Anchor::TopRight, format!("Lives: {}", state.lives()));
    if state.phase == Phase::WaitingToStart {
        frame.text(Anchor::Center { line: -1 }, "Press SPACE to Start");
    }
    frame
}

impl Simulation for BreakoutState {
    fn tick(&mut self, input: &TickInput) {
        tick(self, input);
    }

    fn frame(&self) -> Frame {
        frame(self)
    }

    fn outcome(&self) -> Option<RunOutcome> {
        match self.phase {
            Phase::LevelCleared => Some(RunOutcome::Cleared),
            Phase::GameOver => Some(RunOutcome::GameOver),
            Phase::WaitingToStart | Phase::Running => None,
        }
    }

    fn score(&self) -> u32 {
        self.board.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::breakout::level::build_bricks;
    use crate::sim::breakout::state::Brick;
    use crate::sim::input::HeldKeys;
    use crate::sim::rect::Rect;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    fn launch() -> TickInput {
        TickInput::press(Key::Space)
    }

    fn brick_at(id: u32, x: f32, y: f32, hits: u8) -> Brick {
        Brick::new(id, Rect::new(x, y, 50.0, 20.0), hits)
    }

    /// Running state with the ball placed so that `advance` lands it at `pos`
    fn running_with_ball_at(bricks: Vec<Brick>, pos: Vec2, vel: Vec2) -> BreakoutState {
        let mut state = BreakoutState::with_bricks(bricks, 1);
        state.phase = Phase::Running;
        state.ball.vel = vel;
        state.ball.rect.x = pos.x - vel.x;
        state.ball.rect.y = pos.y - vel.y;
        state
    }

    #[test]
    fn test_waits_for_space() {
        let mut state = BreakoutState::new(0, 12345);
        let start = state.ball.rect;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, Phase::WaitingToStart);
        assert_eq!(state.ball.rect, start);

        tick(&mut state, &launch());
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.ball.rect.x, start.x + 3.0);
        assert_eq!(state.ball.rect.y, start.y - 3.0);
    }

    #[test]
    fn test_paddle_moves_while_waiting() {
        let mut state = BreakoutState::new(0, 1);
        let x = state.paddle.rect.x;
        let input = TickInput::holding(HeldKeys {
            left: true,
            ..Default::default()
        });
        tick(&mut state, &input);
        assert_eq!(state.paddle.rect.x, x - 6.0);
    }

    #[test]
    fn test_side_wall_flips_horizontal_only() {
        let mut state = running_with_ball_at(
            vec![brick_at(1, 0.0, 0.0, 1)],
            Vec2::new(0.0, 200.0),
            Vec2::new(-3.0, 3.0),
        );
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.vel, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_top_wall_flips_vertical() {
        let mut state = running_with_ball_at(
            vec![brick_at(1, 0.0, 300.0, 1)],
            Vec2::new(300.0, 0.0),
            Vec2::new(3.0, -3.0),
        );
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.vel, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_paddle_bounce_is_pure_vertical_flip() {
        let mut state = BreakoutState::with_bricks(vec![brick_at(1, 0.0, 0.0, 1)], 1);
        state.phase = Phase::Running;
        let paddle = state.paddle.rect;
        state.ball.vel = Vec2::new(-3.0, 3.0);
        state.ball.rect.x = paddle.x + 10.0 + 3.0;
        state.ball.rect.y = paddle.y - 5.0 - 3.0;
        // Paddle movement must not add spin
        let input = TickInput::holding(HeldKeys {
            right: true,
            ..Default::default()
        });
        tick(&mut state, &input);
        assert_eq!(state.ball.vel, Vec2::new(-3.0, -3.0));
    }

    #[test]
    fn test_multi_brick_hit_flips_once() {
        // Ball straddles the seam between two adjacent bricks
        let bricks = vec![
            brick_at(1, 100.0, 100.0, 1),
            brick_at(2, 150.0, 100.0, 1),
            brick_at(3, 400.0, 100.0, 1),
        ];
        let mut state =
            running_with_ball_at(bricks, Vec2::new(145.0, 110.0), Vec2::new(3.0, -3.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.vel.y, 3.0);
        assert_eq!(state.bricks.len(), 1);
        assert_eq!(state.board.score, 20);
    }

    #[test]
    fn test_multi_hit_brick_survives_then_breaks() {
        let mut state = running_with_ball_at(
            vec![brick_at(1, 100.0, 100.0, 2), brick_at(2, 400.0, 100.0, 1)],
            Vec2::new(120.0, 110.0),
            Vec2::new(3.0, -3.0),
        );
        let report = resolve_collisions(&mut state);
        assert_eq!(report.bricks_hit, 1);
        assert_eq!(report.bricks_destroyed, 0);
        assert_eq!(state.bricks[0].hits_remaining, 1);
        assert_eq!(state.board.score, 0);

        let report = resolve_collisions(&mut state);
        assert_eq!(report.bricks_destroyed, 1);
        assert_eq!(state.bricks.len(), 1);
        assert_eq!(state.board.score, 10);
    }

    #[test]
    fn test_last_brick_clears_level() {
        let mut state = running_with_ball_at(
            vec![brick_at(1, 100.0, 100.0, 1)],
            Vec2::new(120.0, 110.0),
            Vec2::new(3.0, -3.0),
        );
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, Phase::LevelCleared);
        assert_eq!(state.outcome(), Some(RunOutcome::Cleared));

        // Terminal: further ticks change nothing
        let ticks = state.time_ticks;
        tick(&mut state, &launch());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_clearing_fifty_bricks_scores_500() {
        let rows = ["1111111111"; 5];
        let mut state = BreakoutState::with_bricks(build_bricks(&rows), 3);
        assert_eq!(state.bricks.len(), 50);
        state.phase = Phase::Running;

        let targets: Vec<Rect> = state.bricks.iter().map(|b| b.rect).collect();
        for target in targets {
            // Park the ball inside each brick in turn
            state.ball.rect = Rect::from_center(target.center(), Vec2::splat(10.0));
            state.ball.vel = Vec2::ZERO;
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, Phase::LevelCleared);
        assert_eq!(state.board.score, 500);
    }

    #[test]
    fn test_life_loss_resets_and_waits() {
        let mut state = running_with_ball_at(
            vec![brick_at(1, 0.0, 0.0, 1)],
            Vec2::new(300.0, 401.0),
            Vec2::new(3.0, 3.0),
        );
        state.paddle.rect.x = 0.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, Phase::WaitingToStart);
        assert_eq!(state.lives(), 2);
        assert_eq!(state.ball.rect.center(), Vec2::new(300.0, 200.0));
        assert_eq!(state.ball.vel.y, -3.0);
        assert_eq!(state.ball.vel.x.abs(), 3.0);
        assert_eq!(state.paddle.rect.center().x, 300.0);
    }

    #[test]
    fn test_last_life_ends_run() {
        let mut state = running_with_ball_at(
            vec![brick_at(1, 0.0, 0.0, 1)],
            Vec2::new(300.0, 401.0),
            Vec2::new(3.0, 3.0),
        );
        state.board.lives = Some(1);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(state.outcome(), Some(RunOutcome::GameOver));
    }

    #[test]
    fn test_serve_direction_after_life_loss_is_seeded() {
        let serve_after_loss = |seed| {
            let mut state = running_with_ball_at(
                vec![brick_at(1, 0.0, 0.0, 1)],
                Vec2::new(300.0, 401.0),
                Vec2::new(3.0, 3.0),
            );
            state.rng = Pcg32::seed_from_u64(seed);
            tick(&mut state, &TickInput::default());
            assert_eq!(state.phase, Phase::WaitingToStart);
            state.ball.vel.x
        };

        let serves: Vec<f32> = (0..64).map(serve_after_loss).collect();
        assert!(serves.iter().all(|vx| vx.abs() == 3.0));
        assert!(serves.contains(&3.0));
        assert!(serves.contains(&-3.0));
        // Same seed, same serve: the loss draws the run's first coin flip
        for seed in 0..64 {
            assert_eq!(serve_after_loss(seed), serves[seed as usize]);
            let heads = Pcg32::seed_from_u64(seed).random_bool(0.5);
            assert_eq!(serves[seed as usize], if heads { 3.0 } else { -3.0 });
        }
    }

    #[test]
    fn test_frame_contents() {
        let state = BreakoutState::new(0, 1);
        let frame = frame(&state);
        assert_eq!(frame.count(Fill::Paddle), 1);
        assert_eq!(frame.count(Fill::Ball), 1);
        assert_eq!(
            frame.count(Fill::Brick {
                hits_remaining: 1,
                max_hits: 1
            }),
            50
        );
        assert!(frame.overlays.iter().any(|o| o.text == "Press SPACE to Start"));
        assert!(frame.overlays.iter().any(|o| o.text == "Lives: 3"));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = BreakoutState::new(1, 99999);
        let mut state2 = BreakoutState::new(1, 99999);
        let inputs = [
            launch(),
            TickInput::holding(HeldKeys {
                left: true,
                ..Default::default()
            }),
            TickInput::default(),
        ];
        for _ in 0..400 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }
        assert_eq!(state1.bricks, state2.bricks);
        assert_eq!(state1.ball.rect, state2.ball.rect);
        assert_eq!(state1.board, state2.board);
        assert_eq!(state1.phase, state2.phase);
    }

    proptest! {
        #[test]
        fn prop_flip_rules(
            x in -20.0f32..620.0,
            y in -20.0f32..390.0,
            vx in prop::sample::select(vec![-3.0f32, 3.0]),
            vy in prop::sample::select(vec![-3.0f32, 3.0]),
        ) {
            let bricks = build_bricks(&["1111111111", "2222222222", "3333333333"]);
            let mut state = BreakoutState::with_bricks(bricks, 5);
            state.phase = Phase::Running;
            state.ball.rect = Rect::new(x, y, 10.0, 10.0);
            state.ball.vel = Vec2::new(vx, vy);

            let ball = state.ball.rect;
            let expect_x = ball.left() <= 0.0 || ball.right() >= SCREEN_WIDTH;
            let overlapped = ball.intersects(&state.paddle.rect)
                || state.bricks.iter().any(|b| ball.intersects(&b.rect));
            let expect_y = ball.top() <= 0.0 || overlapped;

            let report = resolve_collisions(&mut state);
            prop_assert_eq!(report.flipped_x, expect_x);
            prop_assert_eq!(report.flipped_y, expect_y);
            prop_assert_eq!(state.ball.vel.x, if expect_x { -vx } else { vx });
            prop_assert_eq!(state.ball.vel.y, if expect_y { -vy } else { vy });
        }

        #[test]
        fn prop_brick_hits_never_increase(
            seed in any::<u64>(),
            moves in prop::collection::vec(0u8..3, 1..600)
        ) {
            let mut state = BreakoutState::new(2, seed);
            let mut previous: Vec<(u32, u8)> =
                state.bricks.iter().map(|b| (b.id, b.hits_remaining)).collect();
            for m in moves {
                let held = HeldKeys { left: m == 1, right: m == 2, ..Default::default() };
                let input = TickInput { held, pressed: vec![Key::Space] };
                tick(&mut state, &input);
                for brick in &state.bricks {
                    prop_assert!(brick.hits_remaining > 0);
                    prop_assert!(brick.hits_remaining <= brick.max_hits);
                    let before = previous.iter().find(|(id, _)| *id == brick.id).map(|p| p.1);
                    prop_assert!(before.is_some_and(|h| brick.hits_remaining <= h));
                }
                previous = state.bricks.iter().map(|b| (b.id, b.hits_remaining)).collect();
            }
        }
    }
}

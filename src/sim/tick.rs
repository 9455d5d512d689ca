//! Fixed timestep simulation tick
//!
//! Advances the ball and paddle by one step. The same state and intents
//! always produce the same result.

use glam::Vec2;

use super::collision::{ball_rect_collision, reflect_off_face};
use super::state::{GameEvent, GameState, brick_half_extents};

/// Held-key intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move paddle left
    pub left_down: bool,
    /// Move paddle right
    pub right_down: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;

    state.ball.pos += state.ball.vel * dt;

    collide_paddle(state);
    collide_bricks(state);
    collide_walls(state);

    move_paddle(state, input, dt);
}

/// Reflect off the paddle when the ball is heading into the face it touches
fn collide_paddle(state: &mut GameState) {
    let ball = &mut state.ball;
    let paddle = &state.paddle;

    let hit = ball_rect_collision(ball.pos, ball.radius, paddle.pos, paddle.half_extents());
    if !hit.hit || ball.vel.dot(hit.normal) >= 0.0 {
        return;
    }

    ball.pos += hit.normal * hit.penetration;
    ball.vel = reflect_off_face(ball.vel, hit.normal);
    state.events.push(GameEvent::PaddleHit);
}

/// Strike at most one brick per tick, in row-major order
fn collide_bricks(state: &mut GameState) {
    let half = brick_half_extents();
    let struck = state.bricks.active().find_map(|(index, brick)| {
        let hit = ball_rect_collision(state.ball.pos, state.ball.radius, brick.pos, half);
        hit.hit.then_some((index, hit))
    });

    let Some((index, hit)) = struck else {
        return;
    };

    state.ball.pos += hit.normal * hit.penetration;
    state.ball.vel = reflect_off_face(state.ball.vel, hit.normal);

    if state.bricks.deactivate(index) {
        state.score += 1;
        state.events.push(GameEvent::BrickDestroyed { index });
        log::debug!("Brick {} destroyed (score {})", index, state.score);

        if state.is_cleared() {
            state.events.push(GameEvent::BoardCleared);
            log::info!("Board cleared after {} ticks", state.time_ticks);
        }
    }
}

/// Reflect-and-clamp against the playfield edges, one axis at a time
fn collide_walls(state: &mut GameState) {
    let ball = &mut state.ball;
    let min = Vec2::splat(ball.radius);
    let max = state.field - min;
    let mut bounced = false;

    for axis in 0..2 {
        if ball.pos[axis] > max[axis] {
            ball.pos[axis] = max[axis];
            ball.vel[axis] = -ball.vel[axis];
            bounced = true;
        } else if ball.pos[axis] < min[axis] {
            ball.pos[axis] = min[axis];
            ball.vel[axis] = -ball.vel[axis];
            bounced = true;
        }
    }

    if bounced {
        state.events.push(GameEvent::WallBounce);
    }
}

/// Move the paddle from held intents, then clamp its anchor to the field.
/// Both intents held cancel out. The anchor (not the edges) is clamped, so
/// up to half the paddle may hang past either side.
fn move_paddle(state: &mut GameState, input: &TickInput, dt: f32) {
    let paddle = &mut state.paddle;
    let direction = input.right_down as i8 - input.left_down as i8;

    if direction != 0 {
        paddle.pos.x += f32::from(direction) * paddle.speed * dt;
    }

    paddle.pos.x = paddle.pos.x.clamp(0.0, state.field.x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    /// State with every brick removed
    fn open_field() -> GameState {
        let mut state = GameState::new();
        for i in 0..BRICK_COUNT {
            state.bricks.deactivate(i);
        }
        state
    }

    #[test]
    fn test_ball_advances_by_velocity() {
        let mut state = GameState::new();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!((state.ball.pos.x - 323.0).abs() < 1e-3);
        assert!((state.ball.pos.y - 242.0).abs() < 1e-3);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_right_wall_scenario() {
        let mut state = open_field();
        state.ball.pos = Vec2::new(630.0, 240.0);
        state.ball.vel = Vec2::new(3.0, 0.0);
        state.ball.radius = 15.0;

        tick(&mut state, &TickInput::default(), 1.0);

        assert_eq!(state.ball.pos.x, 625.0);
        assert_eq!(state.ball.vel.x, -3.0);
        assert!(state.events.contains(&GameEvent::WallBounce));
    }

    #[test]
    fn test_left_and_bottom_walls() {
        let mut state = open_field();
        state.ball.pos = Vec2::new(16.0, 200.0);
        state.ball.vel = Vec2::new(-150.0, 0.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.ball.pos.x, 15.0);
        assert_eq!(state.ball.vel.x, 150.0);

        state.ball.pos = Vec2::new(100.0, 16.0);
        state.ball.vel = Vec2::new(0.0, -100.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.ball.pos.y, 15.0);
        assert_eq!(state.ball.vel.y, 100.0);
    }

    #[test]
    fn test_both_intents_cancel() {
        let mut state = GameState::new();
        let both = TickInput {
            left_down: true,
            right_down: true,
        };
        tick(&mut state, &both, SIM_DT);
        assert_eq!(state.paddle.pos.x, 320.0);
    }

    #[test]
    fn test_paddle_moves_with_intent() {
        let mut state = GameState::new();
        let left = TickInput {
            left_down: true,
            ..Default::default()
        };
        tick(&mut state, &left, SIM_DT);
        assert!((state.paddle.pos.x - 317.0).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_anchor_clamped_not_edges() {
        let mut state = GameState::new();
        state.paddle.pos.x = 1.0;
        let left = TickInput {
            left_down: true,
            ..Default::default()
        };
        tick(&mut state, &left, SIM_DT);
        assert_eq!(state.paddle.pos.x, 0.0);

        state.paddle.pos.x = FIELD_WIDTH - 1.0;
        let right = TickInput {
            right_down: true,
            ..Default::default()
        };
        tick(&mut state, &right, SIM_DT);
        assert_eq!(state.paddle.pos.x, FIELD_WIDTH);
    }

    #[test]
    fn test_paddle_bounce() {
        let mut state = open_field();
        state.ball.pos = Vec2::new(320.0, 64.0);
        state.ball.vel = Vec2::new(50.0, -100.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.ball.vel.y > 0.0);
        assert_eq!(state.ball.vel.x, 50.0);
        assert!(state.ball.pos.y >= 40.0 + PADDLE_HALF_HEIGHT + BALL_RADIUS - 1e-3);
        assert!(state.events.contains(&GameEvent::PaddleHit));
    }

    #[test]
    fn test_paddle_ignores_ball_moving_away() {
        let mut state = open_field();
        state.ball.pos = Vec2::new(320.0, 60.0);
        state.ball.vel = Vec2::new(0.0, 100.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.ball.vel.y, 100.0);
        assert!(!state.events.contains(&GameEvent::PaddleHit));
    }

    #[test]
    fn test_brick_hit_deactivates_and_scores() {
        let mut state = GameState::new();
        // Just under brick (5, 2) at (320, 314), moving up
        let brick = state.bricks.get(5, 2).unwrap().pos;
        state.ball.pos = Vec2::new(brick.x, brick.y - BRICK_HALF_HEIGHT - BALL_RADIUS - 1.0);
        state.ball.vel = Vec2::new(0.0, 100.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        let index = 5 * BRICK_COLUMNS + 2;
        assert!(!state.bricks.by_index(index).unwrap().active);
        assert_eq!(state.bricks.active_count(), BRICK_COUNT - 1);
        assert_eq!(state.score, 1);
        assert!(state.ball.vel.y < 0.0);
        assert!(state.events.contains(&GameEvent::BrickDestroyed { index }));
    }

    #[test]
    fn test_inactive_brick_is_passed_through() {
        let mut state = GameState::new();
        let index = 5 * BRICK_COLUMNS + 2;
        state.bricks.deactivate(index);
        let brick = state.bricks.by_index(index).unwrap().pos;
        state.ball.pos = Vec2::new(brick.x, brick.y - BRICK_HALF_HEIGHT - BALL_RADIUS - 1.0);
        state.ball.vel = Vec2::new(0.0, 100.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.ball.vel.y > 0.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_board_cleared_event() {
        let mut state = GameState::new();
        let last = 5 * BRICK_COLUMNS + 2;
        for i in (0..BRICK_COUNT).filter(|&i| i != last) {
            state.bricks.deactivate(i);
        }
        let brick = state.bricks.by_index(last).unwrap().pos;
        state.ball.pos = Vec2::new(brick.x, brick.y - BRICK_HALF_HEIGHT - BALL_RADIUS - 1.0);
        state.ball.vel = Vec2::new(0.0, 100.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.is_cleared());
        assert!(state.events.contains(&GameEvent::BoardCleared));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new();
        let mut state2 = GameState::new();
        let inputs = [
            TickInput::default(),
            TickInput {
                left_down: true,
                ..Default::default()
            },
            TickInput {
                right_down: true,
                ..Default::default()
            },
        ];

        for i in 0..3000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.ball, state2.ball);
        assert_eq!(state1.paddle, state2.paddle);
        assert_eq!(state1.bricks, state2.bricks);
        assert_eq!(state1.score, state2.score);
    }

    proptest! {
        #[test]
        fn prop_ball_stays_inside_field(
            x in 0.0f32..FIELD_WIDTH,
            y in 0.0f32..FIELD_HEIGHT,
            dx in -600.0f32..600.0,
            dy in -600.0f32..600.0,
            left in any::<bool>(),
            right in any::<bool>(),
        ) {
            let mut state = GameState::new();
            state.ball.pos = Vec2::new(x, y);
            state.ball.vel = Vec2::new(dx, dy);
            let input = TickInput { left_down: left, right_down: right };

            tick(&mut state, &input, SIM_DT);

            let r = state.ball.radius;
            prop_assert!(state.ball.pos.x >= r && state.ball.pos.x <= FIELD_WIDTH - r);
            prop_assert!(state.ball.pos.y >= r && state.ball.pos.y <= FIELD_HEIGHT - r);
        }

        #[test]
        fn prop_right_wall_flips_dx(
            y in 100.0f32..250.0,
            start in 600.0f32..625.0,
            dx in 1.0f32..20.0,
        ) {
            let mut state = open_field();
            state.ball.pos = Vec2::new(start, y);
            state.ball.vel = Vec2::new(dx, 0.0);

            let crosses = start + dx > FIELD_WIDTH - state.ball.radius;
            tick(&mut state, &TickInput::default(), 1.0);

            if crosses {
                prop_assert_eq!(state.ball.vel.x, -dx);
                prop_assert_eq!(state.ball.pos.x, FIELD_WIDTH - state.ball.radius);
            } else {
                prop_assert_eq!(state.ball.vel.x, dx);
            }
        }

        #[test]
        fn prop_paddle_anchor_in_field(
            x in -100.0f32..740.0,
            left in any::<bool>(),
            right in any::<bool>(),
            ticks in 1usize..50,
        ) {
            let mut state = GameState::new();
            state.paddle.pos.x = x;
            let input = TickInput { left_down: left, right_down: right };
            for _ in 0..ticks {
                tick(&mut state, &input, SIM_DT);
                prop_assert!(state.paddle.pos.x >= 0.0 && state.paddle.pos.x <= FIELD_WIDTH);
            }
        }
    }
}

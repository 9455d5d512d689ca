//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (bricks in row-major order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_rect_collision, reflect_off_face};
pub use state::{Ball, Brick, BrickGrid, GameEvent, GameState, Paddle, brick_position, row_color};
pub use tick::{TickInput, tick};

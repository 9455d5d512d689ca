//! Brickout - a Breakout-style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball, paddle, bricks, collisions)
//! - `renderer`: Geometry, draw command submission and the wgpu backend
//! - `input`: Key events to paddle intents
//! - `app`: Window, event loop and fixed-interval tick scheduling
//! - `settings`: Runtime configuration loaded from JSON

pub mod app;
pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{SetupError, SetupResult};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels, origin bottom-left, y up)
    pub const FIELD_WIDTH: f32 = 640.0;
    pub const FIELD_HEIGHT: f32 = 480.0;

    /// Default tick interval in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 20;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = TICK_INTERVAL_MS as f32 / 1000.0;
    /// Maximum ticks run back-to-back when the loop falls behind
    pub const MAX_CATCHUP_TICKS: u32 = 5;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_SEGMENTS: u32 = 100;
    pub const BALL_START: (f32, f32) = (320.0, 240.0);
    /// 3 px and 2 px per 20 ms tick
    pub const BALL_START_VELOCITY: (f32, f32) = (150.0, 100.0);
    pub const BALL_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

    /// Paddle defaults
    pub const PADDLE_START: (f32, f32) = (320.0, 40.0);
    pub const PADDLE_HALF_WIDTH: f32 = 60.0;
    pub const PADDLE_HALF_HEIGHT: f32 = 8.0;
    /// 3 px per 20 ms tick
    pub const PADDLE_SPEED: f32 = 150.0;
    pub const PADDLE_COLOR: [f32; 3] = [0.85, 0.85, 0.85];

    /// Brick grid layout
    pub const BRICK_COLUMNS: usize = 5;
    pub const BRICK_ROWS: usize = 6;
    pub const BRICK_COUNT: usize = BRICK_COLUMNS * BRICK_ROWS;
    pub const BRICK_HALF_WIDTH: f32 = 61.0;
    pub const BRICK_HALF_HEIGHT: f32 = 14.0;
    pub const BRICK_PADDING_X: f32 = 5.0;
    pub const BRICK_PADDING_Y: f32 = 2.0;

    /// One color per brick row, top row first
    pub const BRICK_PALETTE: [[f32; 3]; BRICK_ROWS] = [
        [1.0, 0.0, 0.0],
        [1.0, 0.5, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.8, 0.0, 1.0],
    ];
}

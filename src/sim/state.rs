//! Game state and core simulation types
//!
//! Everything the simulation step reads and writes lives in `GameState`.

use glam::{Vec2, Vec3};

use crate::consts::*;

/// Something that happened during the latest tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ball reflected off a playfield edge
    WallBounce,
    /// Ball reflected off the paddle
    PaddleHit,
    /// Brick at this row-major index was struck and deactivated
    BrickDestroyed { index: usize },
    /// The last active brick was destroyed
    BoardCleared,
}

/// The ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub radius: f32,
    pub color: Vec3,
    /// Wedges in the triangle fan used to draw it
    pub segments: u32,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Vec2::from(BALL_START),
            vel: Vec2::from(BALL_START_VELOCITY),
            radius: BALL_RADIUS,
            color: Vec3::from(BALL_COLOR),
            segments: BALL_SEGMENTS,
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub pos: Vec2,
    pub half_width: f32,
    pub half_height: f32,
    /// Pixels per second while a direction is held
    pub speed: f32,
    pub color: Vec3,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            pos: Vec2::from(PADDLE_START),
            half_width: PADDLE_HALF_WIDTH,
            half_height: PADDLE_HALF_HEIGHT,
            speed: PADDLE_SPEED,
            color: Vec3::from(PADDLE_COLOR),
        }
    }
}

impl Paddle {
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.half_width, self.half_height)
    }
}

/// A single brick. All bricks share one mesh and size.
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub pos: Vec2,
    pub active: bool,
    pub row: usize,
    pub col: usize,
}

impl Brick {
    /// Flat color for this brick's row
    pub fn color(&self) -> Vec3 {
        row_color(self.row)
    }
}

/// Palette color for a brick row
pub fn row_color(row: usize) -> Vec3 {
    Vec3::from(BRICK_PALETTE[row % BRICK_ROWS])
}

/// Half extents shared by every brick
pub fn brick_half_extents() -> Vec2 {
    Vec2::new(BRICK_HALF_WIDTH, BRICK_HALF_HEIGHT)
}

/// Row-major brick grid, `index = row * BRICK_COLUMNS + col`
#[derive(Debug, Clone, PartialEq)]
pub struct BrickGrid {
    bricks: Vec<Brick>,
}

impl Default for BrickGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl BrickGrid {
    /// Lay out the full grid against the top of the playfield
    pub fn new() -> Self {
        let bricks = (0..BRICK_COUNT)
            .map(|i| {
                let (row, col) = (i / BRICK_COLUMNS, i % BRICK_COLUMNS);
                Brick {
                    pos: brick_position(row, col),
                    active: true,
                    row,
                    col,
                }
            })
            .collect();
        Self { bricks }
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Brick> {
        if col >= BRICK_COLUMNS {
            return None;
        }
        self.bricks.get(row * BRICK_COLUMNS + col)
    }

    pub fn by_index(&self, index: usize) -> Option<&Brick> {
        self.bricks.get(index)
    }

    /// Deactivate a brick. Returns false if it was already inactive or out of range.
    pub fn deactivate(&mut self, index: usize) -> bool {
        match self.bricks.get_mut(index) {
            Some(brick) if brick.active => {
                brick.active = false;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = (usize, &Brick)> {
        self.bricks.iter().enumerate().filter(|(_, b)| b.active)
    }

    pub fn active_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }
}

/// Centre of the brick at `(row, col)`
pub fn brick_position(row: usize, col: usize) -> Vec2 {
    let (row, col) = (row as f32, col as f32);
    let x = BRICK_PADDING_X
        + BRICK_HALF_WIDTH
        + col * (BRICK_PADDING_X + BRICK_HALF_WIDTH * 2.0);
    let from_top = BRICK_PADDING_Y
        + BRICK_HALF_HEIGHT
        + row * (BRICK_PADDING_Y + BRICK_HALF_HEIGHT * 2.0);
    Vec2::new(x, FIELD_HEIGHT - from_top)
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
    /// Playfield size
    pub field: Vec2,
    /// Bricks destroyed this session
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised by the latest tick
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            ball: Ball::default(),
            paddle: Paddle::default(),
            bricks: BrickGrid::new(),
            field: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            score: 0,
            time_ticks: 0,
            events: Vec::with_capacity(8),
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.bricks.active_count() == 0
    }
}

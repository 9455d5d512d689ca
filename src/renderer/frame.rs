//! Per-frame render submission
//!
//! Turns the scene into draw commands: one per visible entity, each naming a
//! mesh, a translation and a flat color. The GPU backend replays them as
//! draw calls; tests just collect them.

use glam::{Mat4, Vec2, Vec3};

use crate::sim::GameState;

/// Vertices in a rectangle mesh
pub const RECT_VERTEX_COUNT: u32 = 6;

/// Meshes uploaded at startup. Bricks share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    Ball,
    Paddle,
    Brick,
}

impl MeshId {
    pub const COUNT: usize = 3;
    pub const ALL: [MeshId; Self::COUNT] = [MeshId::Ball, MeshId::Paddle, MeshId::Brick];

    pub const fn index(self) -> usize {
        match self {
            MeshId::Ball => 0,
            MeshId::Paddle => 1,
            MeshId::Brick => 2,
        }
    }
}

/// One draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshId,
    /// Vertices to draw from the start of the mesh
    pub vertex_count: u32,
    /// Model transform (`mvp` uniform)
    pub transform: Mat4,
    /// Flat color (`diffuse` uniform)
    pub color: Vec3,
}

/// Receives the draw commands of one frame
pub trait FrameSink {
    fn submit(&mut self, command: DrawCommand);
}

impl FrameSink for Vec<DrawCommand> {
    fn submit(&mut self, command: DrawCommand) {
        self.push(command);
    }
}

/// Translation placing model-space geometry at a world position
#[inline]
pub fn translation(pos: Vec2) -> Mat4 {
    Mat4::from_translation(pos.extend(0.0))
}

/// Orthographic projection mapping the playfield onto clip space, y up
pub fn projection(field: Vec2) -> Mat4 {
    Mat4::orthographic_rh(0.0, field.x, 0.0, field.y, -1.0, 1.0)
}

/// Lazily yield the frame's draw commands: ball, paddle, then active bricks
/// in row-major order. Inactive bricks yield nothing.
pub fn draw_commands(state: &GameState) -> impl Iterator<Item = DrawCommand> + '_ {
    let ball = DrawCommand {
        mesh: MeshId::Ball,
        vertex_count: state.ball.segments * 3,
        transform: translation(state.ball.pos),
        color: state.ball.color,
    };
    let paddle = DrawCommand {
        mesh: MeshId::Paddle,
        vertex_count: RECT_VERTEX_COUNT,
        transform: translation(state.paddle.pos),
        color: state.paddle.color,
    };
    let bricks = state.bricks.active().map(|(_, brick)| DrawCommand {
        mesh: MeshId::Brick,
        vertex_count: RECT_VERTEX_COUNT,
        transform: translation(brick.pos),
        color: brick.color(),
    });

    [ball, paddle].into_iter().chain(bricks)
}

/// Submit the frame's draw commands to `sink`
pub fn render<S: FrameSink + ?Sized>(state: &GameState, sink: &mut S) {
    for command in draw_commands(state) {
        sink.submit(command);
    }
}

//! Shape generation for 2D primitives
//!
//! All shapes are built around the origin; draw commands translate them into
//! place. Every shape is a plain triangle list.

use std::f32::consts::PI;

use super::frame::MeshId;
use super::vertex::Vertex;
use crate::sim::GameState;
use crate::sim::state::brick_half_extents;

/// Generate vertices for a filled circle as `segments` independent wedges.
/// Each wedge is `center, point(i), point(i + 1)`.
pub fn circle_fan(radius: f32, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(0.0, 0.0));
        vertices.push(Vertex::new(radius * theta1.cos(), radius * theta1.sin()));
        vertices.push(Vertex::new(radius * theta2.cos(), radius * theta2.sin()));
    }

    vertices
}

/// Generate two triangles covering `[-hw, hw] x [-hh, hh]`
pub fn rect(half_width: f32, half_height: f32) -> Vec<Vertex> {
    let (hw, hh) = (half_width, half_height);
    vec![
        Vertex::new(-hw, -hh),
        Vertex::new(-hw, hh),
        Vertex::new(hw, hh),
        Vertex::new(hw, hh),
        Vertex::new(hw, -hh),
        Vertex::new(-hw, -hh),
    ]
}

/// Vertex data for every mesh the scene draws, built once at startup
#[derive(Debug, Clone)]
pub struct MeshSet {
    meshes: [Vec<Vertex>; MeshId::COUNT],
}

impl MeshSet {
    /// Build the ball, paddle and shared brick meshes from the scene's sizes
    pub fn for_state(state: &GameState) -> Self {
        let brick = brick_half_extents();
        let mut meshes: [Vec<Vertex>; MeshId::COUNT] = Default::default();
        meshes[MeshId::Ball.index()] = circle_fan(state.ball.radius, state.ball.segments);
        meshes[MeshId::Paddle.index()] = rect(state.paddle.half_width, state.paddle.half_height);
        meshes[MeshId::Brick.index()] = rect(brick.x, brick.y);
        Self { meshes }
    }

    pub fn vertices(&self, mesh: MeshId) -> &[Vertex] {
        &self.meshes[mesh.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &[Vertex])> {
        MeshId::ALL.into_iter().map(|id| (id, self.vertices(id)))
    }
}

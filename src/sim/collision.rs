//! Collision detection and response for a circle against axis-aligned boxes
//!
//! The ball is a circle; the paddle and bricks are rectangles given by a
//! centre and half extents. Overlap is tested against the nearest point of the
//! rectangle, and the struck face is the axis of least penetration.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal of the struck face, pointing from the rectangle toward the ball
    pub normal: Vec2,
    /// How far the ball must move along `normal` to stop overlapping
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against a rectangle centred at `rect_center`
pub fn ball_rect_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let offset = ball_pos - rect_center;
    let closest = rect_center + offset.clamp(-half_extents, half_extents);

    if ball_pos.distance_squared(closest) >= ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    // Overlap of the ball's bounding box with the rectangle on each axis
    let overlap = half_extents + Vec2::splat(ball_radius) - offset.abs();

    let (normal, penetration) = if overlap.x < overlap.y {
        (Vec2::new(sign_or_positive(offset.x), 0.0), overlap.x)
    } else {
        (Vec2::new(0.0, sign_or_positive(offset.y)), overlap.y)
    };

    CollisionResult {
        hit: true,
        normal,
        penetration,
    }
}

/// Sign of `v`, treating zero as positive so a centred hit still has a normal
#[inline]
fn sign_or_positive(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Reflect velocity off an axis-aligned face so it points along `normal`
///
/// Only the component on the normal's axis changes, and only if it is
/// heading into the face. Magnitude is preserved.
#[inline]
pub fn reflect_off_face(velocity: Vec2, normal: Vec2) -> Vec2 {
    let along = velocity.dot(normal);
    if along < 0.0 {
        velocity - 2.0 * along * normal
    } else {
        velocity
    }
}

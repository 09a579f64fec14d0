//! Collision primitives
//!
//! Everything here works on squared distances to avoid square roots in the
//! per-tick hot path.

use glam::Vec2;

use super::state::Obstacle;

/// Circle-circle overlap via squared-distance comparison
#[inline]
pub fn circles_overlap(a: Vec2, b: Vec2, combined_radius: f32) -> bool {
    a.distance_squared(b) < combined_radius * combined_radius
}

/// Point strictly inside a rectangle (boundary excluded)
#[inline]
pub fn point_in_rect(rect: &Obstacle, p: Vec2) -> bool {
    p.x > rect.x && p.x < rect.x + rect.w && p.y > rect.y && p.y < rect.y + rect.h
}

/// Circle-rectangle overlap: clamp to the closest point on the rect, then
/// compare squared distance against the squared radius.
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Obstacle) -> bool {
    let closest = Vec2::new(
        center.x.clamp(rect.x, rect.x + rect.w),
        center.y.clamp(rect.y, rect.y + rect.h),
    );
    center.distance_squared(closest) < radius * radius
}

//! Board-space helpers shared by the navigator and the brain.
//!
//! Board coordinates follow the game server: origin at the top-left corner,
//! x grows to the right and y grows *downward*. Headings are reported the
//! conventional way (counter-clockwise from +x), so the vertical axis is
//! flipped whenever a bearing is computed.

use bevy::prelude::*;
use std::f32::consts::TAU;

/// Bearing in radians from `from` towards `to`, normalized into `[0, 2π)`.
///
/// 0 points along +x, π/2 points "up" the board (towards smaller y).
pub fn heading_to(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    let heading = (-delta.y).atan2(delta.x).rem_euclid(TAU);
    // rem_euclid keeps -0.0 and can round tiny negative angles up to TAU.
    if heading >= TAU {
        0.0
    } else {
        heading + 0.0
    }
}

/// Straight-line distance between two board points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Axis-aligned rectangle from its top-left origin and size.
pub fn rect_from_origin(origin: Vec2, width: f32, height: f32) -> Rect {
    Rect::from_corners(origin, origin + Vec2::new(width, height))
}

/// Axis-aligned rectangle from its center and size (wall geometry arrives this way).
pub fn rect_from_center(center: Vec2, width: f32, height: f32) -> Rect {
    Rect::from_center_size(center, Vec2::new(width, height))
}

/// True when the interiors of two rectangles overlap.
///
/// Rectangles that merely share an edge or a corner do not intersect, which
/// keeps a tile lying flush against a wall walkable.
#[inline]
pub fn intersects(a: Rect, b: Rect) -> bool {
    !a.intersect(b).is_empty()
}

/// Clamp a point into the `[0, size]` board rectangle.
pub fn clamp_to_board(point: Vec2, board: Vec2) -> Vec2 {
    point.clamp(Vec2::ZERO, board)
}

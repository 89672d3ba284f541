//! Shape generation for 2D primitives
//!
//! All shapes are emitted in viewport coordinates (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::Snapshot;

/// Triangle fan segments per ball
pub const BALL_SEGMENTS: u32 = 32;

/// FPS panel size in the top-left corner
pub const FPS_PANEL_SIZE: Vec2 = Vec2::new(150.0, 50.0);

/// Generate vertices for a filled ellipse.
///
/// Non-positive radii (balls squashed past an edge) produce nothing.
pub fn ellipse(
    center: Vec2,
    radius_x: f32,
    radius_y: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    if radius_x <= 0.0 || radius_y <= 0.0 || segments < 3 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius_x * theta1.cos(),
            center.y + radius_y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius_x * theta2.cos(),
            center.y + radius_y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Geometry for a whole frame: every visible ball, then the FPS panel on top
pub fn frame_vertices(snapshot: &Snapshot) -> Vec<Vertex> {
    let visible = snapshot.balls().iter().filter(|b| b.is_visible()).count();
    let mut vertices = Vec::with_capacity(visible * (BALL_SEGMENTS * 3) as usize + 6);

    for ball in snapshot.balls() {
        vertices.extend(ellipse(
            ball.pos.as_vec2(),
            ball.radius_x as f32,
            ball.radius_y as f32,
            ball.color.to_rgba(),
            BALL_SEGMENTS,
        ));
    }

    vertices.extend(rect(Vec2::ZERO, FPS_PANEL_SIZE, colors::FPS_PANEL));
    vertices
}

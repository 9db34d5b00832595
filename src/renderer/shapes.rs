//! Vertex buffer builders for sim state
//!
//! Pure `&state -> Vec<vertex>` functions; the caller uploads the result.

use glam::Vec2;

use super::vertex::{ColorVertex, WallVertex, colors};
use crate::sim::corridor::CorridorMesh;
use crate::sim::state::{GameState, Platform};
use crate::consts::PLATFORM_SPAN;

/// Interleave a wall mesh's parallel buffers into one vertex stream
pub fn wall_vertices(mesh: &CorridorMesh) -> Vec<WallVertex> {
    mesh.vertices
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.uvs)
        .map(|((pos, normal), uv)| {
            WallVertex::new(pos.to_array(), normal.to_array(), uv.to_array())
        })
        .collect()
}

/// Axis-aligned quad as two triangles
fn quad(center: Vec2, half: Vec2, color: [f32; 4], out: &mut Vec<ColorVertex>) {
    let (l, r) = (center.x - half.x, center.x + half.x);
    let (b, t) = (center.y - half.y, center.y + half.y);

    out.push(ColorVertex::new(l, b, color));
    out.push(ColorVertex::new(r, b, color));
    out.push(ColorVertex::new(r, t, color));

    out.push(ColorVertex::new(r, t, color));
    out.push(ColorVertex::new(l, t, color));
    out.push(ColorVertex::new(l, b, color));
}

/// Player marker quad
pub fn player_vertices(state: &GameState) -> Vec<ColorVertex> {
    let mut out = Vec::with_capacity(6);
    quad(
        state.player.pos,
        Vec2::splat(state.player.radius),
        colors::PLAYER,
        &mut out,
    );
    out
}

/// Both stubs of one gate, zoom-compensated to keep their on-screen height
pub fn platform_vertices(
    platform: &Platform,
    cam_size: f32,
    min_cam_size: f32,
    out: &mut Vec<ColorVertex>,
) {
    let half_h = platform.visual_height(cam_size, min_cam_size) / 2.0;
    let gap_left = platform.gap_center - platform.gap_half_width;
    let gap_right = platform.gap_center + platform.gap_half_width;

    let left_center = Vec2::new((-PLATFORM_SPAN + gap_left) / 2.0, platform.y);
    let left_half = Vec2::new((gap_left + PLATFORM_SPAN) / 2.0, half_h);
    quad(left_center, left_half, colors::PLATFORM, out);

    let right_center = Vec2::new((gap_right + PLATFORM_SPAN) / 2.0, platform.y);
    let right_half = Vec2::new((PLATFORM_SPAN - gap_right) / 2.0, half_h);
    quad(right_center, right_half, colors::PLATFORM, out);
}

/// Every gate currently alive
pub fn gate_vertices(state: &GameState, min_cam_size: f32) -> Vec<ColorVertex> {
    let mut out = Vec::with_capacity(state.platforms.len() * 12);
    for platform in &state.platforms {
        platform_vertices(platform, state.camera.ortho_size, min_cam_size, &mut out);
    }
    out
}

//! Wall contact detection
//!
//! The corridor's collision boundary is the closed outline produced by
//! the mesher. Contact is detection-only: the run ends on the first hit,
//! nothing is reflected or pushed out.

use glam::Vec2;

use super::state::Platform;

/// Closest wall feature to a query point
#[derive(Debug, Clone, Copy)]
pub struct WallHit {
    /// Closest point on the wall
    pub point: Vec2,
    /// Distance from the query point to it
    pub distance: f32,
}

/// Closest point on segment `a`..`b` to `p`
fn closest_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Nearest point on a closed ring to `p`
///
/// Returns `None` for rings with fewer than two points, or when every
/// candidate distance is non-finite (a degenerate mesh).
pub fn ring_nearest(p: Vec2, ring: &[Vec2]) -> Option<WallHit> {
    if ring.len() < 2 {
        return None;
    }
    let mut best: Option<WallHit> = None;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let point = closest_on_segment(p, a, b);
        let distance = (p - point).length();
        if !distance.is_finite() {
            continue;
        }
        if best.map_or(true, |h| distance < h.distance) {
            best = Some(WallHit { point, distance });
        }
    }
    best
}

/// Even-odd containment test against a closed ring
///
/// Non-finite ring points fail every crossing comparison, so a
/// degenerate mesh reports "outside" rather than a phantom hit.
pub fn point_in_ring(p: Vec2, ring: &[Vec2]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether a circle at `p` touches the ring: its center is inside the
/// ring's area, or within `radius` of its boundary
pub fn circle_ring_contact(p: Vec2, radius: f32, ring: &[Vec2]) -> Option<WallHit> {
    if point_in_ring(p, ring) {
        return Some(WallHit {
            point: p,
            distance: 0.0,
        });
    }
    ring_nearest(p, ring).filter(|hit| hit.distance < radius)
}

/// The two wall stubs of a gate, as horizontal segments spanning from
/// `±span_half` to the gap edges
pub fn platform_stubs(platform: &Platform, span_half: f32) -> [(Vec2, Vec2); 2] {
    let y = platform.y;
    let gap_left = platform.gap_center - platform.gap_half_width;
    let gap_right = platform.gap_center + platform.gap_half_width;
    [
        (Vec2::new(-span_half, y), Vec2::new(gap_left, y)),
        (Vec2::new(gap_right, y), Vec2::new(span_half, y)),
    ]
}

/// Whether a circle at `p` touches either stub of a gate
pub fn circle_platform_contact(
    p: Vec2,
    radius: f32,
    platform: &Platform,
    span_half: f32,
) -> Option<WallHit> {
    let mut best: Option<WallHit> = None;
    for (a, b) in platform_stubs(platform, span_half) {
        let point = closest_on_segment(p, a, b);
        let distance = (p - point).length();
        if distance < radius && best.map_or(true, |h| distance < h.distance) {
            best = Some(WallHit { point, distance });
        }
    }
    best
}

//! Corridor wall meshing
//!
//! Turns a control polyline into a triangulated 2D ribbon: two mitered
//! rails offset from the path, stitched into a triangle strip, plus a
//! closed outline the collision code walks. The corridor is cut at each
//! end by a virtual mirror so runs can start and finish at an angle
//! instead of square to the path.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{perp_cw, reflect_across, rotation_from_up};

/// Geometry parameters for one corridor rebuild
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorParams {
    /// Rail half-distance: rails sit `width / cos(miter angle)` from each
    /// joint along its bisector, so a straight section is `2 * width` wide
    pub width: f32,
    /// Mirror-axis angle for the start cap (degrees from the up axis)
    pub entry_cut_deg: f32,
    /// Mirror-axis angle for the end cap (degrees from the up axis)
    pub exit_cut_deg: f32,
    /// Interior joints whose segment directions agree within this
    /// tolerance are skipped (they would emit a zero-area miter).
    /// `0.0` demands exact collinearity.
    pub collinear_epsilon: f32,
}

impl Default for CorridorParams {
    fn default() -> Self {
        Self {
            width: crate::consts::WALL_WIDTH,
            entry_cut_deg: crate::consts::ENTRY_CUT_ANGLE,
            exit_cut_deg: crate::consts::EXIT_CUT_ANGLE,
            collinear_epsilon: 1e-6,
        }
    }
}

/// Corridor meshing errors
#[derive(Debug, Error)]
pub enum CorridorError {
    #[error("corridor width must be nonzero and finite, got {0}")]
    InvalidWidth(f32),
}

/// Output buffers for one corridor
///
/// The buffers are rebuilt in place so a caller can hand the same
/// instance to `rebuild` every frame without reallocating its targets.
/// `vertices` holds one pair per surviving joint, even index = left rail,
/// odd = right rail, in path order; `normals` and `uvs` run parallel to
/// it. `indices` is a flat list of counter-wound triples weaving between
/// the rails. `outline` is a single closed ring: the right rail walked
/// from the far end back to the start, then the left rail walked forward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorridorMesh {
    pub vertices: Vec<Vec3>,
    /// Uniform facing-back normals, parallel to `vertices`
    pub normals: Vec<Vec3>,
    /// Parallel to `vertices`; always zero — no parameterization is
    /// computed for the walls
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub outline: Vec<Vec2>,
}

impl CorridorMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Rebuild every buffer from `points` and `params`.
    ///
    /// Fewer than two control points is a no-op that leaves the previous
    /// buffers untouched; an invalid width is an error that does the
    /// same. Z is carried through from each joint to its rail vertices
    /// but takes no part in the miter math.
    ///
    /// Numeric edges: a cut angle whose mirror axis is parallel to the
    /// adjacent segment folds the cap onto the path and the cap miter
    /// runs to infinity — callers pick cut angles that cross their end
    /// segments. Interior joints are only skipped when their segments
    /// agree within `collinear_epsilon`; a nearly-straight joint outside
    /// the tolerance still emits its (thin) miter.
    pub fn rebuild(
        &mut self,
        points: &[Vec3],
        params: &CorridorParams,
    ) -> Result<(), CorridorError> {
        if !params.width.is_finite() || params.width == 0.0 {
            return Err(CorridorError::InvalidWidth(params.width));
        }
        if points.len() < 2 {
            return Ok(());
        }

        self.vertices.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
        self.outline.clear();

        // Extend the polyline with one virtual point per end: the
        // adjacent segment reflected across the cut-angle mirror. The cap
        // joint then miters against the mirror image exactly as an
        // interior joint miters against its neighbor.
        let mut extended = Vec::with_capacity(points.len() + 2);
        extended.push(virtual_cap(points[0], points[1], params.entry_cut_deg));
        extended.extend_from_slice(points);
        extended.push(virtual_cap(
            points[points.len() - 1],
            points[points.len() - 2],
            params.exit_cut_deg,
        ));

        for idx in 1..extended.len() - 1 {
            let prev = extended[idx - 1];
            let point = extended[idx];
            let next = extended[idx + 1];

            let to_prev = (prev - point).truncate().normalize_or_zero();
            let to_next = (next - point).truncate().normalize_or_zero();

            // A collinear interior joint contributes no turn; its miter
            // would collapse to the rail line. Cap-adjacent joints always
            // emit so the ends stay closed.
            let straightness = to_next.dot(to_prev).abs();
            let interior = idx > 1 && idx < extended.len() - 2;
            if interior && straightness >= 1.0 - params.collinear_epsilon {
                continue;
            }

            let mut bisector = (to_prev + to_next).normalize_or_zero();
            if bisector == Vec2::ZERO {
                // Exact 180-degree turn: fall back to a perpendicular of
                // the incoming segment.
                bisector = perp_cw((prev - point).truncate()).normalize_or_zero();
            }

            // Unit perpendiculars of the incoming segment, 1/width-scaled
            // so the bisector projection below lands each rail on the
            // intersection of its offset lines without solving for it.
            let left = perp_cw((point - prev).truncate()).normalize_or_zero() / params.width;
            let right = -left;

            let left_rail = point.truncate() + bisector / bisector.dot(left);
            let right_rail = point.truncate() + bisector / bisector.dot(right);
            self.vertices.push(left_rail.extend(point.z));
            self.vertices.push(right_rail.extend(point.z));
        }

        // Zig-zag strip: alternate winding so every triangle faces the
        // same way as the strip weaves between the rails.
        for i in 0..self.vertices.len() as u32 - 2 {
            self.indices.push(i);
            self.indices.push(i + 1 + i % 2);
            self.indices.push(i + 2 - i % 2);
        }

        for _ in 0..self.vertices.len() {
            self.normals.push(Vec3::NEG_Z);
            self.uvs.push(Vec2::ZERO);
        }

        // Right rail from the far end back, then left rail forward: one
        // consistently wound closed ring.
        for pair in self.vertices.chunks_exact(2).rev() {
            self.outline.push(pair[1].truncate());
        }
        for pair in self.vertices.chunks_exact(2) {
            self.outline.push(pair[0].truncate());
        }

        Ok(())
    }
}

/// Synthesize the virtual control point that closes one corridor end:
/// the segment toward `adjacent` reflected across the mirror axis.
fn virtual_cap(end: Vec3, adjacent: Vec3, cut_deg: f32) -> Vec3 {
    let axis = rotation_from_up(cut_deg);
    let image = (adjacent - end).truncate();
    (end.truncate() + reflect_across(axis, image)).extend(end.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rebuild(points: &[Vec3], params: &CorridorParams) -> CorridorMesh {
        let mut mesh = CorridorMesh::new();
        mesh.rebuild(points, params).unwrap();
        mesh
    }

    fn params(width: f32, entry: f32, exit: f32) -> CorridorParams {
        CorridorParams {
            width,
            entry_cut_deg: entry,
            exit_cut_deg: exit,
            ..Default::default()
        }
    }

    fn assert_vec2_near(a: Vec2, b: Vec2, msg: &str) {
        assert!(
            (a - b).length() < 1e-4,
            "{msg}: expected ({}, {}), got ({}, {})",
            b.x,
            b.y,
            a.x,
            a.y
        );
    }

    #[test]
    fn test_too_few_points_is_a_noop() {
        let mut mesh = rebuild(
            &[Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)],
            &params(1.0, 0.0, 0.0),
        );
        let before = mesh.clone();

        mesh.rebuild(&[Vec3::ZERO], &params(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(mesh.vertices, before.vertices);
        assert_eq!(mesh.indices, before.indices);
        assert_eq!(mesh.outline, before.outline);

        mesh.rebuild(&[], &params(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(mesh.vertices, before.vertices);
    }

    #[test]
    fn test_zero_width_is_an_error_and_leaves_buffers_alone() {
        let points = [Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)];
        let mut mesh = rebuild(&points, &params(1.0, 0.0, 0.0));
        let before = mesh.clone();

        let err = mesh.rebuild(&points, &params(0.0, 0.0, 0.0));
        assert!(matches!(err, Err(CorridorError::InvalidWidth(_))));
        assert_eq!(mesh.vertices, before.vertices);

        let err = mesh.rebuild(&points, &params(f32::NAN, 0.0, 0.0));
        assert!(matches!(err, Err(CorridorError::InvalidWidth(_))));
    }

    #[test]
    fn test_straight_segment_rails() {
        // Square-cut horizontal corridor: a 2 * width tall rectangle.
        let mesh = rebuild(
            &[Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)],
            &params(1.0, 0.0, 0.0),
        );

        assert_eq!(mesh.vertices.len(), 4);
        assert_vec2_near(mesh.vertices[0].truncate(), Vec2::new(-5.0, -1.0), "L0");
        assert_vec2_near(mesh.vertices[1].truncate(), Vec2::new(-5.0, 1.0), "R0");
        assert_vec2_near(mesh.vertices[2].truncate(), Vec2::new(5.0, -1.0), "L1");
        assert_vec2_near(mesh.vertices[3].truncate(), Vec2::new(5.0, 1.0), "R1");

        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2]);

        // Ring: right rail backward, left rail forward.
        assert_eq!(mesh.outline.len(), 4);
        assert_vec2_near(mesh.outline[0], Vec2::new(5.0, 1.0), "ring 0");
        assert_vec2_near(mesh.outline[1], Vec2::new(-5.0, 1.0), "ring 1");
        assert_vec2_near(mesh.outline[2], Vec2::new(-5.0, -1.0), "ring 2");
        assert_vec2_near(mesh.outline[3], Vec2::new(5.0, -1.0), "ring 3");
    }

    #[test]
    fn test_right_angle_miter() {
        // Offset-line intersections: rails of the corner joint must land
        // where the two offset segments cross.
        let mesh = rebuild(
            &[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 10.0, 0.0),
            ],
            &params(1.0, 0.0, 90.0),
        );

        assert_eq!(mesh.vertices.len(), 6);
        assert_vec2_near(mesh.vertices[0].truncate(), Vec2::new(0.0, -1.0), "L0");
        assert_vec2_near(mesh.vertices[1].truncate(), Vec2::new(0.0, 1.0), "R0");
        assert_vec2_near(mesh.vertices[2].truncate(), Vec2::new(11.0, -1.0), "L1");
        assert_vec2_near(mesh.vertices[3].truncate(), Vec2::new(9.0, 1.0), "R1");
        assert_vec2_near(mesh.vertices[4].truncate(), Vec2::new(11.0, 10.0), "L2");
        assert_vec2_near(mesh.vertices[5].truncate(), Vec2::new(9.0, 10.0), "R2");

        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2, 2, 3, 4, 3, 5, 4]);
    }

    #[test]
    fn test_collinear_interior_joint_is_skipped() {
        // The middle of three collinear points contributes no geometry:
        // same vertex count as the two-point corridor.
        let three = rebuild(
            &[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 5.0, 0.0),
                Vec3::new(0.0, 10.0, 0.0),
            ],
            &params(1.0, 0.0, 0.0),
        );
        let two = rebuild(
            &[Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 10.0, 0.0)],
            &params(1.0, 0.0, 0.0),
        );
        assert_eq!(three.vertices.len(), two.vertices.len());
        assert_eq!(three.indices.len(), two.indices.len());
    }

    #[test]
    fn test_collinear_skip_keeps_finite_rails() {
        // Horizontal variant where the square cut stays well-conditioned:
        // the skipped interior point leaves a plain rectangle.
        let mesh = rebuild(
            &[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(5.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
            ],
            &params(1.0, 0.0, 0.0),
        );

        assert_eq!(mesh.vertices.len(), 4);
        for v in &mesh.vertices {
            assert!(v.is_finite(), "rail vertex {v} is not finite");
        }
        assert_vec2_near(mesh.vertices[0].truncate(), Vec2::new(0.0, -1.0), "L0");
        assert_vec2_near(mesh.vertices[3].truncate(), Vec2::new(10.0, 1.0), "R1");
    }

    #[test]
    fn test_opposed_directions_use_bisector_fallback() {
        // A square cut mirrors the first segment straight back, so the
        // start joint sees exactly opposed directions. The fallback
        // perpendicular must keep every rail vertex finite.
        let mesh = rebuild(
            &[Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)],
            &params(2.0, 0.0, 0.0),
        );
        for v in &mesh.vertices {
            assert!(v.is_finite(), "rail vertex {v} is not finite");
        }
        assert_vec2_near(mesh.vertices[0].truncate(), Vec2::new(0.0, -2.0), "L0");
        assert_vec2_near(mesh.vertices[1].truncate(), Vec2::new(0.0, 2.0), "R0");
    }

    #[test]
    fn test_z_is_carried_through() {
        let mesh = rebuild(
            &[Vec3::new(-5.0, 0.0, 3.0), Vec3::new(5.0, 0.0, 3.0)],
            &params(1.0, 0.0, 0.0),
        );
        assert!(mesh.vertices.iter().all(|v| v.z == 3.0));
    }

    #[test]
    fn test_reversed_run_mirrors() {
        // Reversing a y-axis-symmetric polyline (and swapping the cut
        // angles) must produce the x-mirrored rail set.
        let forward = [
            Vec3::new(-6.0, 0.0, 0.0),
            Vec3::new(-2.0, 3.0, 0.0),
            Vec3::new(2.0, 3.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
        ];
        let mut reversed = forward;
        reversed.reverse();

        let a = rebuild(&forward, &params(1.0, 0.0, 0.0));
        let b = rebuild(&reversed, &params(1.0, 0.0, 0.0));

        assert_eq!(a.vertices.len(), b.vertices.len());
        assert_eq!(a.outline.len(), b.outline.len());

        let key = |v: Vec2| (ordered(v.x), ordered(v.y));
        let mut mirrored: Vec<Vec2> = b
            .vertices
            .iter()
            .map(|v| Vec2::new(-v.x, v.y))
            .collect();
        let mut original: Vec<Vec2> = a.vertices.iter().map(|v| v.truncate()).collect();
        mirrored.sort_by_key(|v| key(*v));
        original.sort_by_key(|v| key(*v));
        for (m, o) in mirrored.iter().zip(&original) {
            assert_vec2_near(*m, *o, "mirrored vertex");
        }
    }

    #[test]
    fn test_outline_has_no_self_intersection() {
        let mesh = rebuild(
            &[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 4.0, 0.0),
                Vec3::new(3.0, 8.0, 0.0),
                Vec3::new(6.0, 11.0, 0.0),
            ],
            &params(1.0, 30.0, 60.0),
        );

        let ring = &mesh.outline;
        let n = ring.len();
        for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue; // adjacent across the closure
                }
                assert!(
                    !segments_cross(
                        ring[i],
                        ring[(i + 1) % n],
                        ring[j],
                        ring[(j + 1) % n]
                    ),
                    "outline segments {i} and {j} cross"
                );
            }
        }
    }

    /// Strict (interior-point) segment crossing test.
    fn segments_cross(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
        let da = a1 - a0;
        let db = b1 - b0;
        let denom = da.perp_dot(db);
        if denom.abs() < 1e-9 {
            return false;
        }
        let d = b0 - a0;
        let t = d.perp_dot(db) / denom;
        let u = d.perp_dot(da) / denom;
        let eps = 1e-6;
        t > eps && t < 1.0 - eps && u > eps && u < 1.0 - eps
    }

    fn ordered(f: f32) -> i64 {
        (f * 1e4).round() as i64
    }

    proptest! {
        #[test]
        fn prop_buffers_stay_paired(
            raw in prop::collection::vec((-40.0f32..40.0, -40.0f32..40.0), 2..12),
            width in 0.25f32..8.0,
            entry in -80.0f32..80.0,
            exit in -80.0f32..80.0,
        ) {
            let points: Vec<Vec3> = raw
                .iter()
                .map(|(x, y)| Vec3::new(*x, *y, 0.0))
                .collect();
            let mesh = rebuild(&points, &params(width, entry, exit));

            prop_assert!(mesh.vertices.len() % 2 == 0);
            prop_assert!(mesh.vertices.len() <= 2 * (points.len() + 2));
            prop_assert_eq!(mesh.normals.len(), mesh.vertices.len());
            prop_assert_eq!(mesh.uvs.len(), mesh.vertices.len());
            prop_assert_eq!(mesh.outline.len(), mesh.vertices.len());
        }

        #[test]
        fn prop_triangle_indices_in_bounds(
            raw in prop::collection::vec((-40.0f32..40.0, -40.0f32..40.0), 2..12),
            width in 0.25f32..8.0,
        ) {
            let points: Vec<Vec3> = raw
                .iter()
                .map(|(x, y)| Vec3::new(*x, *y, 0.0))
                .collect();
            let mesh = rebuild(&points, &params(width, 30.0, 30.0));

            prop_assert_eq!(mesh.indices.len() % 3, 0);
            let n = mesh.vertices.len() as u32;
            prop_assert!(mesh.indices.iter().all(|&i| i < n));
            prop_assert_eq!(mesh.triangle_count(), mesh.vertices.len() - 2);
        }
    }
}

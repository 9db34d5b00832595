//! Procedural track layout
//!
//! The corridor's control polyline climbs in fixed steps with a bounded
//! lateral drift, and gates are placed with randomized gaps. Every value
//! is derived from the run seed and an index, so a retired stretch of
//! track regenerates identically and two runs with the same seed see the
//! same world.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::Platform;
use crate::consts::*;

/// Per-index hash multipliers keeping point and gate streams independent
const POINT_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;
const GATE_STREAM: u64 = 0xC2B2_AE3D_27D4_EB4F;

/// Maintains the live window of corridor control points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackGenerator {
    seed: u64,
    /// First live control-point index
    lo: u64,
    /// One past the last live control-point index
    hi: u64,
}

impl TrackGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed, lo: 0, hi: 0 }
    }

    /// Control point `index`: fixed climb step, hashed lateral drift
    fn point_at(&self, index: u64) -> Vec3 {
        let mut rng = Pcg32::seed_from_u64(self.seed ^ index.wrapping_mul(POINT_STREAM));
        let x = rng.random_range(-TRACK_DRIFT..=TRACK_DRIFT);
        Vec3::new(x, index as f32 * TRACK_STEP, 0.0)
    }

    /// Push control points until the polyline reaches past `target_y`.
    /// Returns true if the polyline changed.
    pub fn extend_to(&mut self, points: &mut Vec<Vec3>, target_y: f32) -> bool {
        let mut changed = false;
        while self.hi == self.lo || ((self.hi - 1) as f32) * TRACK_STEP <= target_y {
            points.push(self.point_at(self.hi));
            self.hi += 1;
            changed = true;
        }
        changed
    }

    /// Drop leading control points once they trail `min_y` by more than
    /// the tail allowance, keeping the polyline tens of points long.
    /// Returns true if the polyline changed.
    pub fn retire_behind(&mut self, points: &mut Vec<Vec3>, min_y: f32) -> bool {
        let mut changed = false;
        while self.hi - self.lo > 2 {
            let tail_y = (self.lo + TRACK_TAIL_POINTS as u64) as f32 * TRACK_STEP;
            if tail_y >= min_y {
                break;
            }
            points.remove(0);
            self.lo += 1;
            changed = true;
        }
        changed
    }

    /// Gate `id` at height `y`: randomized gap, always overlapping the
    /// player's column
    pub fn platform_at(&self, id: u32, y: f32) -> Platform {
        let mut rng = Pcg32::seed_from_u64(self.seed ^ u64::from(id).wrapping_mul(GATE_STREAM));
        let gap_half_width = rng.random_range(GAP_HALF_MIN..=GAP_HALF_MAX);
        let margin = gap_half_width - PLAYER_RADIUS - 0.3;
        let gap_center = rng.random_range(-margin..=margin);
        Platform {
            id,
            y,
            gap_center,
            gap_half_width,
            base_height: PLATFORM_BASE_HEIGHT,
            passed: false,
        }
    }

    pub fn live_points(&self) -> u64 {
        self.hi - self.lo
    }
}

//! Camera-relative background tiling
//!
//! The checker plane never travels with the camera; it jumps forward in
//! whole wrap steps whenever it falls too far behind, so the pattern
//! stays phase-locked to the world while the plane itself stays under
//! the view. The plane is over-scanned by one wrap step so a jump never
//! exposes its edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Where to place and scale the checker plane this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPlacement {
    /// Plane center y (world)
    pub y: f32,
    /// Plane scale (world units, x and y)
    pub scale: Vec2,
    /// Checker repeat counts to feed the tiling shader
    pub repeats: Vec2,
}

/// Tracks the wrapped plane position between frames
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundTiler {
    /// Checker cell size (world units)
    pub checker_size: f32,
    /// Wrap step: the plane advances in whole multiples of this
    pub wrap_step: f32,
    plane_y: f32,
}

impl BackgroundTiler {
    pub fn new(checker_size: f32, wrap_step: f32) -> Self {
        Self {
            checker_size,
            wrap_step,
            plane_y: 0.0,
        }
    }

    /// Advance the plane under the camera and compute this frame's
    /// placement
    pub fn update(&mut self, camera_y: f32, ortho_size: f32, aspect: f32) -> BackgroundPlacement {
        while self.plane_y - camera_y < -self.wrap_step {
            self.plane_y += self.wrap_step;
        }

        let span = (ortho_size + self.wrap_step) * 2.0;
        let quarter = span / 4.0;
        BackgroundPlacement {
            y: self.plane_y,
            scale: Vec2::new(span * aspect, span),
            repeats: Vec2::new(
                quarter * aspect / self.checker_size,
                quarter / self.checker_size,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_stays_within_one_wrap_of_the_camera() {
        let mut tiler = BackgroundTiler::new(2.0, 8.0);
        for i in 0..500 {
            let camera_y = i as f32 * 1.7;
            let placement = tiler.update(camera_y, 10.0, 0.5);
            assert!(placement.y - camera_y >= -8.0);
        }
    }

    #[test]
    fn test_plane_advances_in_whole_steps() {
        let mut tiler = BackgroundTiler::new(2.0, 8.0);
        let first = tiler.update(0.0, 10.0, 0.5).y;
        let far = tiler.update(100.0, 10.0, 0.5).y;
        assert_eq!((far - first) % 8.0, 0.0);
    }

    #[test]
    fn test_scale_overscans_the_view() {
        let mut tiler = BackgroundTiler::new(2.0, 8.0);
        let placement = tiler.update(0.0, 10.0, 0.5);
        // (ortho + wrap) * 2 vertically, times aspect horizontally.
        assert_eq!(placement.scale, Vec2::new(18.0, 36.0));
        // A quarter of the span, in checker cells.
        assert_eq!(placement.repeats, Vec2::new(2.25, 4.5));
    }

    #[test]
    fn test_repeats_track_zoom() {
        let mut tiler = BackgroundTiler::new(2.0, 8.0);
        let near = tiler.update(0.0, 10.0, 1.0);
        let farview = tiler.update(0.0, 40.0, 1.0);
        assert!(farview.repeats.y > near.repeats.y);
    }
}

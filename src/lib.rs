//! Braker - a one-touch braking reflex arcade game
//!
//! The player climbs the channel between two procedurally meshed wall
//! ribbons and has exactly one verb per screen half: brake or boost.
//! Each wall is a triangulated ribbon built from a control polyline;
//! its outline doubles as the collision boundary that ends the run on
//! contact.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (wall meshing, movement, collisions)
//! - `renderer`: CPU-side vertex buffer builders for the mesh target
//! - `tuning`: Data-driven game balance with an editor-facing field registry
//! - `highscores`: Best-run leaderboard

pub mod highscores;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth movement)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Wall ribbon rail half-distance (world units)
    pub const WALL_WIDTH: f32 = 1.0;
    /// Distance from the channel center to each wall centerline
    pub const CHANNEL_HALF: f32 = 4.0;
    /// End-cap mirror angles (degrees from the up axis)
    pub const ENTRY_CUT_ANGLE: f32 = 90.0;
    pub const EXIT_CUT_ANGLE: f32 = 90.0;

    /// Vertical distance between consecutive track control points
    pub const TRACK_STEP: f32 = 12.0;
    /// Maximum lateral drift of the channel center
    pub const TRACK_DRIFT: f32 = 2.0;
    /// Control points kept behind the view before retiring them
    pub const TRACK_TAIL_POINTS: usize = 3;
    /// How far past the top of the view the walls stay meshed
    pub const TRACK_LOOKAHEAD: f32 = 120.0;

    /// Player collision radius
    pub const PLAYER_RADIUS: f32 = 0.6;

    /// Gate stub span from the column (world units)
    pub const PLATFORM_SPAN: f32 = 6.0;
    /// Gate gap half-width range
    pub const GAP_HALF_MIN: f32 = 1.2;
    pub const GAP_HALF_MAX: f32 = 2.0;
    /// Gate visual height before camera compensation
    pub const PLATFORM_BASE_HEIGHT: f32 = 0.5;

    /// Background checker cell size (world units)
    pub const CHECKER_SIZE: f32 = 2.0;
    /// Background plane wrap step (world units)
    pub const BACKGROUND_WRAP: f32 = 8.0;
}

/// Rotate the up unit vector by `degrees` (counterclockwise about +Z)
#[inline]
pub fn rotation_from_up(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(-rad.sin(), rad.cos())
}

/// Reflect `v` across the line spanned by the unit vector `axis`
#[inline]
pub fn reflect_across(axis: Vec2, v: Vec2) -> Vec2 {
    2.0 * axis.dot(v) * axis - v
}

/// Clockwise perpendicular of `v`
#[inline]
pub fn perp_cw(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The wall mesher in `corridor` is the geometric heart of the game; the
//! rest of the module drives it and scores the climb.

pub mod collision;
pub mod corridor;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{
    WallHit, circle_platform_contact, circle_ring_contact, point_in_ring, ring_nearest,
};
pub use corridor::{CorridorError, CorridorMesh, CorridorParams};
pub use state::{
    BrakeKind, Camera, GameEvent, GamePhase, GameState, InputKind, Platform, Player, WallPair,
};
pub use tick::{TickInput, tick};
pub use track::TrackGenerator;

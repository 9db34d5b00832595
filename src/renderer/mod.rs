//! Mesh-target interface
//!
//! No surface or pipeline lives here: this module defines the vertex
//! formats a renderer consumes, builds CPU-side vertex buffers from sim
//! state, and computes the camera-relative background tiling. Everything
//! is pure and testable.

pub mod background;
pub mod shapes;
pub mod vertex;

pub use background::{BackgroundPlacement, BackgroundTiler};
pub use vertex::{ColorVertex, WallVertex};

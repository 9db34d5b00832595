//! Game state and core simulation types
//!
//! Everything that must be persisted for a deterministic run lives here.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::corridor::{CorridorError, CorridorMesh, CorridorParams};
use super::track::TrackGenerator;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended on wall contact
    GameOver,
}

/// What a screen half does while touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputKind {
    #[default]
    Brake,
    Boost,
    None,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Brake => "brake",
            InputKind::Boost => "boost",
            InputKind::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "brake" => Some(InputKind::Brake),
            "boost" => Some(InputKind::Boost),
            "none" => Some(InputKind::None),
            _ => None,
        }
    }
}

/// How braking converts touch time into deceleration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BrakeKind {
    /// Constant deceleration
    Flat,
    /// Deceleration proportional to current speed
    #[default]
    Proportional,
}

impl BrakeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrakeKind::Flat => "flat",
            BrakeKind::Proportional => "proportional",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flat" => Some(BrakeKind::Flat),
            "proportional" | "prop" => Some(BrakeKind::Proportional),
            _ => None,
        }
    }
}

/// Things a tick can report to the caller (sounds, HUD flashes, ...)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Boosted,
    PlatformPassed { id: u32 },
    NearMiss { id: u32, margin: f32 },
    WallContact,
}

/// The player's craft
///
/// It climbs its fixed column; only the vertical speed is controllable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Current climb speed (world units / s)
    pub speed: f32,
    /// Tick timestamp of the last boost, for the boost cooldown
    pub last_boost_ticks: u64,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            speed: 0.0,
            last_boost_ticks: 0,
        }
    }

    /// Whether the boost cooldown has elapsed at `now_ticks`
    pub fn boost_ready(&self, now_ticks: u64, boost_delay: f32) -> bool {
        let since = (now_ticks - self.last_boost_ticks) as f32 * SIM_DT;
        self.last_boost_ticks == 0 || since >= boost_delay
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// A gate the player threads while climbing
///
/// Two wall stubs with a gap between them; the gap always overlaps the
/// player's column, so gates score passes and near misses rather than
/// kill outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub y: f32,
    /// Gap center x
    pub gap_center: f32,
    /// Half the gap width
    pub gap_half_width: f32,
    /// Visual height before camera compensation
    pub base_height: f32,
    pub passed: bool,
}

impl Platform {
    /// Display height compensated for camera zoom, so gates keep their
    /// on-screen thickness as the view pulls back
    pub fn visual_height(&self, cam_size: f32, min_cam_size: f32) -> f32 {
        self.base_height * cam_size / min_cam_size
    }

    /// Clearance between the gap edge and a circle crossing at `x`
    /// (negative means the circle clips a stub)
    pub fn clearance(&self, x: f32, radius: f32) -> f32 {
        self.gap_half_width - (x - self.gap_center).abs() - radius
    }
}

/// Orthographic follow camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub center_y: f32,
    /// Ortho half-size; grows with speed so the player sees further ahead
    pub ortho_size: f32,
}

impl Camera {
    pub fn new(min_cam_size: f32) -> Self {
        Self {
            center_y: 0.0,
            ortho_size: min_cam_size,
        }
    }

    pub fn follow(&mut self, player: &Player, tuning: &Tuning) {
        self.center_y = player.pos.y;
        self.ortho_size = tuning.min_cam_size.max(player.speed * tuning.cam_scale);
    }
}

/// The two wall ribbons flanking the channel
///
/// Both are derived from the channel-center polyline, so only that
/// polyline is persisted; the pair remeshes from it, reusing its point
/// and mesh buffers across rebuilds.
#[derive(Debug, Clone, Default)]
pub struct WallPair {
    pub left: CorridorMesh,
    pub right: CorridorMesh,
    left_points: Vec<Vec3>,
    right_points: Vec<Vec3>,
}

impl WallPair {
    /// Rebuild both ribbons from the channel centerline
    pub fn remesh(
        &mut self,
        centers: &[Vec3],
        params: &CorridorParams,
    ) -> Result<(), CorridorError> {
        self.left_points.clear();
        self.right_points.clear();
        for c in centers {
            self.left_points.push(Vec3::new(c.x - CHANNEL_HALF, c.y, c.z));
            self.right_points.push(Vec3::new(c.x + CHANNEL_HALF, c.y, c.z));
        }
        self.left.rebuild(&self.left_points, params)?;
        self.right.rebuild(&self.right_points, params)
    }

    pub fn is_meshed(&self) -> bool {
        self.left.vertex_count() > 0 && self.right.vertex_count() > 0
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// Highest speed reached this run
    pub top_speed: f32,
    pub player: Player,
    pub camera: Camera,
    pub platforms: Vec<Platform>,
    /// Channel-center control polyline, maintained by the track generator
    pub center_points: Vec<Vec3>,
    pub corridor_params: CorridorParams,
    pub track: TrackGenerator,
    /// Wall meshes derived from the polyline; rebuilt, not persisted
    #[serde(skip)]
    pub walls: WallPair,
    /// Events emitted by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run and mesh its opening stretch of walls
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut state = Self {
            seed,
            time_ticks: 0,
            phase: GamePhase::Playing,
            score: 0,
            top_speed: 0.0,
            player: Player::new(),
            camera: Camera::new(tuning.min_cam_size),
            platforms: Vec::new(),
            center_points: Vec::new(),
            corridor_params: CorridorParams::default(),
            track: TrackGenerator::new(seed),
            walls: WallPair::default(),
            events: Vec::new(),
            next_id: 1,
        };

        state
            .track
            .extend_to(&mut state.center_points, tuning.min_cam_size + TRACK_LOOKAHEAD);
        if let Err(e) = state.walls.remesh(&state.center_points, &state.corridor_params) {
            log::error!("initial wall remesh failed: {e}");
        }

        for _ in 0..tuning.max_platform_count {
            state.spawn_platform(tuning);
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append the next gate above the current topmost one
    pub fn spawn_platform(&mut self, tuning: &Tuning) {
        let id = self.next_entity_id();
        let spacing = tuning.platform_distance * tuning.platform_distance_scale;
        let top = self.platforms.iter().map(|p| p.y).fold(0.0f32, f32::max);
        let platform = self.track.platform_at(id, top + spacing);
        self.platforms.push(platform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_meshed_walls() {
        let tuning = Tuning::default();
        let state = GameState::new(7, &tuning);

        assert!(state.center_points.len() >= 2);
        assert!(state.walls.is_meshed());
        assert!(state.walls.left.vertex_count() >= 4);
        assert_eq!(state.platforms.len(), tuning.max_platform_count as usize);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_walls_flank_the_channel() {
        let state = GameState::new(11, &Tuning::default());
        for (l, r) in state
            .walls
            .left
            .vertices
            .iter()
            .zip(&state.walls.right.vertices)
        {
            assert!(l.x < r.x);
        }
        // The channel interior stays clear of the left outline (small
        // slack for miter extension on drifting sections).
        for v in &state.walls.left.vertices {
            assert!(v.x < -CHANNEL_HALF + WALL_WIDTH + TRACK_DRIFT + 0.2);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let tuning = Tuning::default();
        let a = GameState::new(99, &tuning);
        let b = GameState::new(99, &tuning);

        assert_eq!(a.center_points, b.center_points);
        for (pa, pb) in a.platforms.iter().zip(&b.platforms) {
            assert_eq!(pa.gap_center, pb.gap_center);
            assert_eq!(pa.y, pb.y);
        }
    }

    #[test]
    fn test_boost_cooldown() {
        let mut player = Player::new();
        assert!(player.boost_ready(1, 3.0));

        player.last_boost_ticks = 120;
        assert!(!player.boost_ready(130, 3.0));
        assert!(player.boost_ready(120 + 3 * 120, 3.0));
    }

    #[test]
    fn test_platform_clearance_and_height() {
        let platform = Platform {
            id: 1,
            y: 10.0,
            gap_center: 0.5,
            gap_half_width: 1.5,
            base_height: 0.5,
            passed: false,
        };

        // Circle centered in the gap clears it.
        assert!(platform.clearance(0.5, 0.6) > 0.0);
        // Circle at the stub edge does not.
        assert!(platform.clearance(2.5, 0.6) < 0.0);
        // Gate doubles in on-screen height when the camera doubles.
        assert_eq!(platform.visual_height(20.0, 10.0), 1.0);
    }
}

//! Braker entry point
//!
//! Headless native runner: loads tuning, plays a scripted climb through
//! the full simulation, and prints a run summary. A windowed build would
//! drive the same sim and upload the renderer's vertex buffers.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use braker::consts::*;
use braker::renderer::{BackgroundTiler, shapes};
use braker::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use braker::{HighScores, Tuning};

const TUNING_FILE: &str = "params.json";
const HIGHSCORE_FILE: &str = "highscores.json";

fn main() {
    env_logger::init();
    log::info!("Braker (native) starting...");

    let tuning = match Tuning::load(Path::new(TUNING_FILE)) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("tuning load failed ({e}), using defaults");
            Tuning::default()
        }
    };

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xB4A3);
    log::info!("running demo climb with seed {seed}");

    let mut state = GameState::new(seed, &tuning);
    let mut tiler = BackgroundTiler::new(CHECKER_SIZE, BACKGROUND_WRAP);

    // Scripted 30-second climb at a simulated 60 fps, alternating
    // two-second coasting and braking windows. Fixed-timestep substeps
    // drain the accumulator exactly as a windowed frame loop would.
    let frame_dt = 1.0 / 60.0;
    let mut accumulator = 0.0f32;
    let mut passes = 0usize;
    let mut near_misses = 0usize;
    'frames: for frame in 0..30 * 60u32 {
        let braking = (frame / 120) % 2 == 1;
        let input = TickInput {
            touch_x: braking.then_some(0.2),
            ..Default::default()
        };

        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, &tuning, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;

            for event in &state.events {
                match event {
                    GameEvent::PlatformPassed { .. } => passes += 1,
                    GameEvent::NearMiss { .. } => near_misses += 1,
                    _ => {}
                }
            }

            if state.phase == GamePhase::GameOver {
                break 'frames;
            }
        }
    }

    let background = tiler.update(state.camera.center_y, state.camera.ortho_size, 0.5);
    let left_wall = shapes::wall_vertices(&state.walls.left);
    let right_wall = shapes::wall_vertices(&state.walls.right);
    let gates = shapes::gate_vertices(&state, tuning.min_cam_size);

    println!("Run over: {:?}", state.phase);
    println!(
        "  distance {:.1}, top speed {:.1}, score {}",
        state.player.pos.y, state.top_speed, state.score
    );
    println!("  gates passed {passes}, near misses {near_misses}");
    println!(
        "  wall mesh: {} + {} vertices, {} + {} triangles",
        state.walls.left.vertex_count(),
        state.walls.right.vertex_count(),
        state.walls.left.triangle_count(),
        state.walls.right.triangle_count()
    );
    println!(
        "  buffers: {} wall verts, {} gate verts, background repeats {:.2}x{:.2}",
        left_wall.len() + right_wall.len(),
        gates.len(),
        background.repeats.x,
        background.repeats.y
    );

    let mut scores = HighScores::load(Path::new(HIGHSCORE_FILE));
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);
    if let Some(rank) = scores.add_score(state.score, state.player.pos.y, timestamp) {
        println!("  new high score, rank {rank}");
        scores.save(Path::new(HIGHSCORE_FILE));
    }

    println!("\nRunning wall contact smoke check...");
    smoke_check_wall_contact();
}

fn smoke_check_wall_contact() {
    use braker::sim::corridor::{CorridorMesh, CorridorParams};
    use braker::sim::circle_ring_contact;
    use glam::{Vec2, Vec3};

    let mut mesh = CorridorMesh::new();
    mesh.rebuild(
        &[Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)],
        &CorridorParams {
            width: 1.0,
            entry_cut_deg: 0.0,
            exit_cut_deg: 0.0,
            ..Default::default()
        },
    )
    .unwrap_or_else(|e| panic!("smoke mesh rebuild failed: {e}"));

    let hit = circle_ring_contact(Vec2::new(0.0, 1.2), 0.5, &mesh.outline);
    assert!(hit.is_some(), "contact should be detected");
    let miss = circle_ring_contact(Vec2::new(0.0, 2.0), 0.5, &mesh.outline);
    assert!(miss.is_none(), "clear of the wall band should be a miss");
    println!("✓ Wall contact smoke check passed!");
}

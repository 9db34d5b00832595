//! Fixed timestep simulation tick
//!
//! Core game loop that advances a run deterministically: resolve the
//! touched screen half into brake/boost, integrate speed, keep the walls
//! meshed around the view, and end the run on wall contact.

use super::collision::{circle_platform_contact, circle_ring_contact};
use super::state::{BrakeKind, GameEvent, GamePhase, GameState, InputKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Normalized touch x in `[0, 1]`; `None` while nothing is touched.
    /// The left screen half maps to the tuned left action, the right
    /// half to the tuned right action.
    pub touch_x: Option<f32>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    state.events.clear();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    let action = match input.touch_x {
        Some(x) if x < 0.5 => tuning.left_input,
        Some(_) => tuning.right_input,
        None => InputKind::None,
    };

    // Coasting accelerates; braking replaces the acceleration for this
    // tick; boosting is an impulse on top of normal acceleration.
    let mut acceleration = tuning.acceleration;
    match action {
        InputKind::Boost => {
            if state.player.boost_ready(state.time_ticks, tuning.boost_delay) {
                state.player.speed += tuning.boost_strength;
                state.player.last_boost_ticks = state.time_ticks;
                state.events.push(GameEvent::Boosted);
            }
        }
        InputKind::Brake => {
            acceleration = match tuning.brake_kind {
                BrakeKind::Flat => -tuning.brake_strength,
                BrakeKind::Proportional => -tuning.brake_strength * state.player.speed,
            };
        }
        InputKind::None => {}
    }

    // A live-edited tuning table may briefly hold min > max; widen the
    // clamp instead of panicking mid-run.
    let max_speed = tuning.max_speed.max(tuning.min_speed);
    state.player.speed =
        (state.player.speed + acceleration * dt).clamp(tuning.min_speed, max_speed);
    state.player.pos.y += state.player.speed * dt;

    state.top_speed = state.top_speed.max(state.player.speed);
    if tuning.speed_scores {
        state.score = state.score.max(state.player.speed.round() as u64);
    }

    state.camera.follow(&state.player, tuning);

    maintain_track(state);
    update_platforms(state, tuning);
    check_walls(state);
}

/// Keep the centerline covering the view plus lookahead, retire what has
/// scrolled away, and remesh the walls whenever the polyline changed
fn maintain_track(state: &mut GameState) {
    let ahead = state.camera.center_y + state.camera.ortho_size + TRACK_LOOKAHEAD;
    let behind = state.camera.center_y - state.camera.ortho_size;

    let mut changed = state.track.extend_to(&mut state.center_points, ahead);
    changed |= state.track.retire_behind(&mut state.center_points, behind);

    if changed || !state.walls.is_meshed() {
        if let Err(e) = state.walls.remesh(&state.center_points, &state.corridor_params) {
            log::error!("wall remesh failed: {e}");
        }
    }
}

/// Score gate passes and near misses, recycle gates that scrolled away
fn update_platforms(state: &mut GameState, tuning: &Tuning) {
    let player = state.player.clone();
    for platform in &mut state.platforms {
        if platform.passed || player.pos.y - player.radius <= platform.y {
            continue;
        }
        platform.passed = true;
        state.events.push(GameEvent::PlatformPassed { id: platform.id });
        if tuning.platform_scores {
            state.score += 1;
        }
        let margin = platform.clearance(player.pos.x, player.radius);
        if margin < tuning.near_miss_distance {
            state.score += 1;
            state.events.push(GameEvent::NearMiss {
                id: platform.id,
                margin,
            });
        }
    }

    let behind = state.camera.center_y - state.camera.ortho_size - TRACK_STEP;
    let before = state.platforms.len();
    state.platforms.retain(|p| !(p.passed && p.y < behind));
    for _ in state.platforms.len()..before {
        state.spawn_platform(tuning);
    }
}

/// First wall or gate contact ends the run
fn check_walls(state: &mut GameState) {
    let player = &state.player;
    let hit = circle_ring_contact(player.pos, player.radius, &state.walls.left.outline)
        .or_else(|| circle_ring_contact(player.pos, player.radius, &state.walls.right.outline))
        .or_else(|| {
            state.platforms.iter().find_map(|platform| {
                circle_platform_contact(player.pos, player.radius, platform, PLATFORM_SPAN)
            })
        });

    if let Some(hit) = hit {
        log::info!(
            "wall contact at ({:.2}, {:.2}) after {} ticks, score {}",
            hit.point.x,
            hit.point.y,
            state.time_ticks,
            state.score
        );
        state.events.push(GameEvent::WallContact);
        state.phase = GamePhase::GameOver;
    }
}

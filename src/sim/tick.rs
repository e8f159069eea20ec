//! Per-frame simulation step
//!
//! Core game loop, called once per rendered frame with that frame's
//! timestamp. Order within a frame is fixed:
//!
//! 1. clock + pause
//! 2. HUD actions (shield, auto-play), then the tap (player or auto-play)
//! 3. ball movement, ring entry, dash timeout
//! 4. pickup systems against one snapshot of the ball
//! 5. cosmetic decay and invariant upkeep

use super::collision::{TapResult, inside_ring, is_perfect_tap, validate_tap};
use super::pickups::{
    FrameSnapshot, activate_auto_play, activate_shield, enforce_shield_invariant,
    run_pickup_systems, update_auto_play,
};
use super::state::{GameEvent, GameState, Mode};
use crate::consts::{DEFAULT_FRAME_DT, FADE_RING_MAX_SCALE, FADE_RING_MS, MAX_FRAME_DT};
use crate::normalize_angle;

/// Input gathered for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Monotonic frame timestamp (ms)
    pub now_ms: f64,
    /// Player tapped the screen
    pub tap: bool,
    /// Pause toggle
    pub toggle_pause: bool,
    /// HUD shield button
    pub activate_shield: bool,
    /// HUD auto-play button
    pub activate_auto_play: bool,
}

impl FrameInput {
    /// A frame with no input at `now_ms`
    pub fn at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Default::default()
        }
    }

    /// A frame with a tap at `now_ms`
    pub fn tap_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            tap: true,
            ..Default::default()
        }
    }
}

/// Seconds since the previous frame (default step on the first frame)
pub fn frame_dt(last_frame_ms: Option<f64>, now_ms: f64) -> f32 {
    match last_frame_ms {
        Some(prev) if now_ms > prev => (((now_ms - prev) / 1000.0) as f32).min(MAX_FRAME_DT),
        Some(_) => 0.0,
        None => DEFAULT_FRAME_DT,
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &FrameInput) {
    state.events.clear();
    let dt = frame_dt(state.last_frame_ms, input.now_ms);
    state.now_ms = input.now_ms;

    // Handle pause toggle
    if input.toggle_pause && state.alive {
        state.is_paused = !state.is_paused;
        log::debug!("Paused: {}", state.is_paused);
    }

    // Don't tick if paused; the first resumed frame takes the default step
    if state.is_paused {
        state.last_frame_ms = None;
        return;
    }
    state.last_frame_ms = Some(input.now_ms);

    if !state.alive {
        return;
    }

    if input.activate_shield {
        activate_shield(state);
    }
    if input.activate_auto_play {
        activate_auto_play(state);
    }

    if input.tap {
        handle_tap(state);
    } else if state.auto_play_active
        && state.mode == Mode::Orbit
        && is_perfect_tap(state.angle, state.gate_angle, state.tuning.perfect_threshold)
    {
        handle_tap(state);
    }
    update_auto_play(state, dt);

    if state.alive {
        step_ball(state, dt);
    }

    // Every system sees the same ball position
    let snapshot = FrameSnapshot::capture(state);
    run_pickup_systems(state, &snapshot);

    update_fading_ring(state);
    enforce_shield_invariant(state);

    // Died this frame: nothing may keep animating into the next run
    if !state.alive {
        state.cancel_flights();
        state.clear_pickup_flags();
    }
}

/// Judge a tap; only meaningful while orbiting
pub fn handle_tap(state: &mut GameState) {
    if !state.alive || state.is_paused || state.mode != Mode::Orbit {
        return;
    }

    let result = validate_tap(
        state.angle,
        state.gate_angle,
        state.gate_width,
        state.tuning.miss_margin,
    );
    log::debug!("Tap at angle {:.3}: {:?}", state.angle, result);

    match result {
        TapResult::Hit => {
            state.mode = Mode::Dash;
            state.dash_start_ms = state.now_ms;
            state.dash_elapsed_ms = 0.0;
            state.emit(GameEvent::DashStarted);
        }
        TapResult::Miss => {
            state.emit(GameEvent::TapMissed);
            state.register_miss();
        }
        TapResult::Ignored => state.emit(GameEvent::TapIgnored),
    }
}

/// Move the ball for one frame
fn step_ball(state: &mut GameState, dt: f32) {
    match state.mode {
        Mode::Orbit => {
            state.angle = normalize_angle(state.angle + state.speed * dt);
            state.place_ball_on_ring();
        }
        Mode::Dash => step_dash(state, dt),
    }
}

/// Straight-line flight toward the next ring's center
///
/// Heading straight at the center means distance only ever shrinks, so the
/// end-of-frame entry test cannot be tunnelled past.
fn step_dash(state: &mut GameState, dt: f32) {
    let target = state.next.center;
    let to_target = target - state.ball;
    let remaining = to_target.length();
    let step = state.tuning.dash_speed * dt;
    state.dash_elapsed_ms += f64::from(dt) * 1000.0;

    if remaining <= step.max(1.0) {
        state.ball = target;
    } else {
        state.ball += to_target / remaining * step;
    }

    if inside_ring(state.ball, &state.next) {
        let perfect = is_perfect_tap(state.angle, state.gate_angle, state.tuning.perfect_threshold);
        state.complete_ring(perfect);
        return;
    }

    // Simulated time, so paused or clamped frames never eat into the window
    if state.dash_elapsed_ms > state.tuning.dash_timeout_ms {
        log::debug!("Dash timed out after {:.0}ms", state.dash_elapsed_ms);
        state.emit(GameEvent::DashTimedOut);
        state.mode = Mode::Orbit;
        state.dash_start_ms = 0.0;
        state.dash_elapsed_ms = 0.0;
        state.place_ball_on_ring();
        state.register_miss();
    }
}

/// Grow and fade the ring that was just left
fn update_fading_ring(state: &mut GameState) {
    let now_ms = state.now_ms;
    let mut finished = false;

    if let Some(fading) = state.fading.as_mut() {
        let t = ((now_ms - fading.started_ms) / FADE_RING_MS).clamp(0.0, 1.0) as f32;
        fading.scale = 1.0 + (FADE_RING_MAX_SCALE - 1.0) * t;
        fading.opacity = 1.0 - t;
        finished = t >= 1.0;
    }

    if finished {
        state.fading = None;
    }
}

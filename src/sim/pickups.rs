//! Pickup and power-up systems
//!
//! Every pickup kind runs the same small state machine once per frame:
//!
//! ```text
//! absent -> attached -> (ball touches it) -> flying -> (lands on HUD) -> absent
//! ```
//!
//! Life, shield and coin apply their effect the moment they are touched;
//! auto-play only lands in the inventory when its flight arrives. A kind that
//! is mid-flight cannot be collected again until it lands.

use glam::Vec2;

use super::flight::Flight;
use super::state::{GameEvent, GameState, PickupKind};

/// Values every pickup system reads for one frame
///
/// Computed once after the ball has moved so all systems agree on where the
/// ball is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    pub ball: Vec2,
    pub now_ms: f64,
    pub alive: bool,
    pub paused: bool,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            ball: state.ball,
            now_ms: state.now_ms,
            alive: state.alive,
            paused: state.is_paused,
        }
    }
}

/// Attach a pickup of `kind` to the current ring
///
/// Returns false if one is already attached.
pub fn spawn_pickup(state: &mut GameState, kind: PickupKind) -> bool {
    if state.has_pickup(kind) {
        return false;
    }
    state.set_pickup(kind, true);
    state.emit(GameEvent::PickupSpawned(kind));
    true
}

/// Run all pickup systems in their fixed order
pub fn run_pickup_systems(state: &mut GameState, snapshot: &FrameSnapshot) {
    for kind in PickupKind::ALL {
        pickup_system(state, kind, snapshot);
    }
}

/// One frame of one pickup kind's state machine
pub fn pickup_system(state: &mut GameState, kind: PickupKind, snapshot: &FrameSnapshot) {
    if let Some(flight) = state.flights[kind.index()] {
        // A death this frame cancels flights instead of letting them land
        if snapshot.alive && flight.is_finished(snapshot.now_ms) {
            state.flights[kind.index()] = None;
            land(state, kind);
        }
        return;
    }

    if snapshot.paused || !snapshot.alive || !state.has_pickup(kind) {
        return;
    }

    let anchor = state.pickup_anchor(kind);
    if snapshot.ball.distance_squared(anchor) <= state.tuning.pickup_collision_radius_sq {
        collect(state, kind, anchor, snapshot.now_ms);
    }
}

/// Ball touched an attached pickup
fn collect(state: &mut GameState, kind: PickupKind, anchor: Vec2, now_ms: f64) {
    state.set_pickup(kind, false);

    match kind {
        PickupKind::Life => {
            state.lives = state.lives.saturating_add(1).min(state.tuning.lives_max);
        }
        PickupKind::Shield => {
            state.shield_charges_left =
                state.shield_charges_left.saturating_add(1).min(state.tuning.max_shield_charges);
        }
        PickupKind::Coin => {
            state.coins = state.coins.saturating_add(1);
        }
        // Granted when the flight lands
        PickupKind::AutoPlay => {}
    }

    let (target, duration) = hud_route(state, kind);
    state.flights[kind.index()] = Some(Flight::new(anchor, target, now_ms, duration));

    log::debug!("Collected {} orb", kind.name());
    state.emit(GameEvent::PickupCollected(kind));
}

/// Flight reached the HUD icon
fn land(state: &mut GameState, kind: PickupKind) {
    if kind == PickupKind::AutoPlay {
        state.auto_play_in_inventory = true;
    }
    log::debug!("{} orb landed on the HUD", kind.name());
    state.emit(GameEvent::PickupLanded(kind));
}

/// HUD target and flight duration for a kind
fn hud_route(state: &GameState, kind: PickupKind) -> (Vec2, f64) {
    let hud = &state.tuning.hud;
    let fly = &state.tuning.fly_ms;
    match kind {
        PickupKind::Life => (hud.life, fly.life),
        PickupKind::Shield => (hud.shield, fly.shield),
        PickupKind::AutoPlay => (hud.auto_play, fly.auto_play),
        PickupKind::Coin => (hud.coin, fly.coin),
    }
}

/// HUD button: arm the shield
///
/// Needs at least one charge and does nothing if already armed.
pub fn activate_shield(state: &mut GameState) -> bool {
    if !state.alive || state.shield_armed || state.shield_charges_left == 0 {
        return false;
    }
    state.shield_armed = true;
    log::debug!("Shield armed with {} charges", state.shield_charges_left);
    state.emit(GameEvent::ShieldArmed);
    true
}

/// HUD button: spend the auto-play in the inventory
pub fn activate_auto_play(state: &mut GameState) -> bool {
    if !state.alive || !state.auto_play_in_inventory {
        return false;
    }
    state.auto_play_in_inventory = false;
    state.auto_play_active = true;
    state.auto_play_time_left = state.tuning.auto_play_duration;
    log::debug!("Auto-play started for {:.1}s", state.auto_play_time_left);
    state.emit(GameEvent::AutoPlayStarted);
    true
}

/// Count the active auto-play down by one frame
pub fn update_auto_play(state: &mut GameState, dt: f32) {
    if !state.auto_play_active {
        return;
    }
    state.auto_play_time_left = (state.auto_play_time_left - dt).max(0.0);
    if state.auto_play_time_left <= 0.0 {
        state.auto_play_active = false;
        log::debug!("Auto-play ended");
        state.emit(GameEvent::AutoPlayEnded);
    }
}

/// Keep the shield flags consistent with the charge count
pub fn enforce_shield_invariant(state: &mut GameState) {
    if state.shield_charges_left == 0 {
        state.shield_armed = false;
    }
    state.shield_available = state.shield_charges_left > 0;
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the frame timestamp
//! - Seeded RNG only (carried inside `GameState`)
//! - Fixed system order every frame
//! - No rendering or platform dependencies

pub mod collision;
pub mod flight;
pub mod lifecycle;
pub mod palette;
pub mod pickups;
pub mod ring;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{HIT_SLACK, TapResult, inside_ring, is_perfect_tap, validate_tap};
pub use flight::Flight;
pub use palette::{PALETTES, Rgb, palette_color, pick_distinct_palette, random_palette};
pub use pickups::{
    FrameSnapshot, activate_auto_play, activate_shield, enforce_shield_invariant,
    run_pickup_systems, spawn_pickup, update_auto_play,
};
pub use ring::{generate_next_ring, sample_next_ring};
pub use scoring::{MAX_POINTS_PER_RING, compute_gained_points, ring_base_points, streak_multiplier};
pub use state::{
    FadingRing, FadingView, GameEvent, GameState, Mode, PickupKind, PickupView, RenderView, Ring,
};
pub use tick::{FrameInput, frame_dt, handle_tap, tick};

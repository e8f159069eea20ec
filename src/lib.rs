//! Orbit Dash - an orbit-and-dash arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball kinematics, rings, gates, pickups)
//! - `tuning`: Data-driven game balance
//! - `profile`: Player profile persistence (best score, banked coins)
//! - `meta`: Game-over bridge between a run and the profile store
//! - `session`: One mounted game session, driven once per rendered frame
//! - `platform`: Browser/native platform abstraction

pub mod meta;
pub mod platform;
pub mod profile;
pub mod session;
pub mod sim;
pub mod tuning;

pub use meta::{GameOverBridge, LogShareSink, ShareSink, share_text};
#[cfg(not(target_arch = "wasm32"))]
pub use profile::FileProfileStore;
pub use profile::{MemoryProfileStore, Profile, ProfileStore, RunResult};
pub use session::GameSession;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame step assumed when no previous frame timestamp exists (60 Hz)
    pub const DEFAULT_FRAME_DT: f32 = 1.0 / 60.0;
    /// Longest step a single frame may take (backgrounded tab, debugger pause)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default world (canvas) size in pixels, portrait phone
    pub const WORLD_WIDTH: f32 = 420.0;
    pub const WORLD_HEIGHT: f32 = 860.0;
    /// Ring base radius as a fraction of the shorter world side
    pub const BASE_RADIUS_FRACTION: f32 = 0.13;

    /// Ball radius (render + HUD hints only, entry test uses the ball center)
    pub const BALL_RADIUS: f32 = 9.0;

    /// Ring fade-out animation (left ring grows and vanishes)
    pub const FADE_RING_MS: f64 = 420.0;
    pub const FADE_RING_MAX_SCALE: f32 = 1.6;

    /// Retry budget when picking a palette distinct from the current ring
    pub const PALETTE_MAX_RETRIES: u32 = 8;
    /// Minimum RGB distance between consecutive ring palettes
    pub const PALETTE_MIN_DISTANCE: f32 = 120.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    angle = angle.rem_euclid(TAU);
    if angle >= PI {
        angle -= TAU;
    }
    angle
}

/// Shortest angular distance between two angles, in [0, π]
#[inline]
pub fn angle_distance(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}

/// Convert polar (r, theta) around `center` to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Bearing (radians) from `from` toward `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Euclidean point-in-circle test (boundary counts as inside)
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI + 0.5) - (-PI + 0.5)).abs() < 1e-4);
        assert!((normalize_angle(-0.5) - (-0.5)).abs() < 1e-6);
        assert!((normalize_angle(2.0 * PI + 0.25) - 0.25).abs() < 1e-5);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_angle_distance_wraps() {
        // 179° and -179° are 2° apart, not 358°
        let d = angle_distance(179.0_f32.to_radians(), -179.0_f32.to_radians());
        assert!((d - 2.0_f32.to_radians()).abs() < 1e-4);
        assert!(angle_distance(0.0, PI) <= PI + 1e-6);
    }

    #[test]
    fn test_point_in_circle() {
        let c = Vec2::new(10.0, 10.0);
        assert!(point_in_circle(Vec2::new(13.0, 14.0), c, 5.0)); // on the boundary
        assert!(!point_in_circle(Vec2::new(16.0, 10.0), c, 5.0));
    }

    #[test]
    fn test_polar_and_bearing() {
        let c = Vec2::new(100.0, 50.0);
        let p = polar_to_cartesian(c, 20.0, PI / 2.0);
        assert!((p - Vec2::new(100.0, 70.0)).length() < 1e-4);
        assert!((bearing(c, p) - PI / 2.0).abs() < 1e-5);
        assert!((distance(c, p) - 20.0).abs() < 1e-4);
    }
}

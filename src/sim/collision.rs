//! Tap validation and ring-entry tests
//!
//! Taps are judged purely on angles: the ball's position on its orbit versus
//! the gate facing the next ring. Ring entry is a point-in-circle test on the
//! ball center.

use serde::{Deserialize, Serialize};

use super::state::Ring;
use crate::{angle_distance, point_in_circle};

/// Extra angular slack past the gate edge still accepted as a hit (radians)
pub const HIT_SLACK: f32 = 0.2;

/// Classification of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapResult {
    /// Ball is lined up with the gate - dash
    Hit,
    /// Ball is clearly away from the gate - costs a life (or a shield charge)
    Miss,
    /// Dead zone at the gate edge - neither confirmed
    Ignored,
}

/// Classify a tap made with the ball at `angle`
///
/// Hit within `gate_width / 2 + HIT_SLACK`, miss beyond
/// `gate_width / 2 + miss_margin`, ignored in between.
pub fn validate_tap(angle: f32, gate_angle: f32, gate_width: f32, miss_margin: f32) -> TapResult {
    let dist = angle_distance(angle, gate_angle);
    let half = gate_width * 0.5;

    if dist <= half + HIT_SLACK {
        TapResult::Hit
    } else if dist > half + miss_margin {
        TapResult::Miss
    } else {
        TapResult::Ignored
    }
}

/// Tap landed close enough to the gate center for the perfect bonus
#[inline]
pub fn is_perfect_tap(angle: f32, gate_angle: f32, perfect_threshold: f32) -> bool {
    angle_distance(angle, gate_angle) <= perfect_threshold
}

/// Ball center is inside the ring's circle
#[inline]
pub fn inside_ring(point: glam::Vec2, ring: &Ring) -> bool {
    point_in_circle(point, ring.center, ring.radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::f32::consts::PI;

    const MISS_MARGIN: f32 = 0.45;

    #[test]
    fn test_tap_at_gate_edge_is_hit() {
        let gate_width = 0.8;
        assert_eq!(validate_tap(0.4, 0.0, gate_width, MISS_MARGIN), TapResult::Hit);
        assert_eq!(validate_tap(-0.4, 0.0, gate_width, MISS_MARGIN), TapResult::Hit);
    }

    #[test]
    fn test_tap_dead_zone_and_miss() {
        let gate_width = 0.8;
        // Between half + 0.2 and half + margin
        assert_eq!(validate_tap(0.7, 0.0, gate_width, MISS_MARGIN), TapResult::Ignored);
        assert_eq!(validate_tap(0.86, 0.0, gate_width, MISS_MARGIN), TapResult::Miss);
        assert_eq!(validate_tap(PI, 0.0, gate_width, MISS_MARGIN), TapResult::Miss);
    }

    #[test]
    fn test_tap_wraps_around_pi() {
        // Gate just below +π, ball just above -π: 0.1 rad apart
        let result = validate_tap(-PI + 0.05, PI - 0.05, 0.4, MISS_MARGIN);
        assert_eq!(result, TapResult::Hit);
        // Same for whole extra turns on the ball angle
        let result = validate_tap(0.1 + 6.0 * PI, 0.0, 0.4, MISS_MARGIN);
        assert_eq!(result, TapResult::Hit);
    }

    #[test]
    fn test_perfect_tap() {
        assert!(is_perfect_tap(0.1, 0.0, 0.12));
        assert!(!is_perfect_tap(0.2, 0.0, 0.12));
    }

    #[test]
    fn test_inside_ring() {
        let ring = Ring::new(Vec2::new(50.0, 50.0), 20.0);
        assert!(inside_ring(Vec2::new(60.0, 60.0), &ring));
        assert!(!inside_ring(Vec2::new(80.0, 50.0), &ring));
    }
}

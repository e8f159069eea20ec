//! Scoring rules
//!
//! A completed ring is worth 1 point, 2 with the perfect bonus, scaled by a
//! streak multiplier and capped per ring.

/// Upper bound on points gained from a single ring
pub const MAX_POINTS_PER_RING: u32 = 8;

/// Base points before the multiplier
pub const BASE_POINTS: u32 = 1;
pub const PERFECT_BONUS: u32 = 1;

/// Score multiplier for a streak length
pub fn streak_multiplier(streak: u32) -> u32 {
    match streak {
        s if s >= 20 => 4,
        s if s >= 10 => 3,
        s if s >= 5 => 2,
        _ => 1,
    }
}

/// Base points for one ring completion
#[inline]
pub fn ring_base_points(perfect: bool) -> u32 {
    if perfect {
        BASE_POINTS + PERFECT_BONUS
    } else {
        BASE_POINTS
    }
}

/// Points gained for a ring, given the streak *including* that ring
pub fn compute_gained_points(base_points: u32, streak_after_ring: u32) -> u32 {
    base_points
        .saturating_mul(streak_multiplier(streak_after_ring))
        .min(MAX_POINTS_PER_RING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_steps() {
        assert_eq!(compute_gained_points(1, 0), 1);
        assert_eq!(compute_gained_points(1, 4), 1);
        assert_eq!(compute_gained_points(1, 5), 2);
        assert_eq!(compute_gained_points(1, 9), 2);
        assert_eq!(compute_gained_points(1, 10), 3);
        assert_eq!(compute_gained_points(1, 19), 3);
        assert_eq!(compute_gained_points(1, 20), 4);
        assert_eq!(compute_gained_points(1, 500), 4);
    }

    #[test]
    fn test_points_are_capped() {
        assert_eq!(compute_gained_points(2, 20), 8);
        assert_eq!(compute_gained_points(3, 20), MAX_POINTS_PER_RING);
        assert_eq!(compute_gained_points(u32::MAX, 20), MAX_POINTS_PER_RING);
    }

    #[test]
    fn test_perfect_bonus() {
        assert_eq!(ring_base_points(false), 1);
        assert_eq!(ring_base_points(true), 2);
    }
}

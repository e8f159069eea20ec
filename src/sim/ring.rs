//! Procedural ring placement
//!
//! The next ring is dropped anywhere that keeps it fully on screen. Landing on
//! top of the current ring gets exactly one re-roll of the position; the
//! re-roll is kept whatever it looks like.

use glam::Vec2;
use rand::Rng;

use super::state::Ring;

/// Edge inset as a multiple of the base radius
pub const EDGE_INSET_FACTOR: f32 = 1.3;
/// Radius range as multiples of the base radius
pub const MIN_RADIUS_FACTOR: f32 = 0.7;
pub const MAX_RADIUS_FACTOR: f32 = 1.1;
/// Centers closer than this fraction of the summed radii count as overlapping
pub const OVERLAP_FACTOR: f32 = 0.6;

/// A generated ring plus whether the overlap re-roll was needed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSample {
    pub ring: Ring,
    pub retried: bool,
}

/// True if `candidate` sits too close to `current`
#[inline]
pub fn overlaps(current: &Ring, candidate: &Ring) -> bool {
    current.center.distance(candidate.center) < OVERLAP_FACTOR * (current.radius + candidate.radius)
}

/// Uniform sample in [lo, hi], collapsing to the midpoint for degenerate ranges
fn sample_axis<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        (lo + hi) * 0.5
    }
}

fn sample_position<R: Rng + ?Sized>(rng: &mut R, world: Vec2, inset: f32) -> Vec2 {
    Vec2::new(
        sample_axis(rng, inset, world.x - inset),
        sample_axis(rng, inset, world.y - inset),
    )
}

/// Sample the next ring, reporting whether the overlap re-roll fired
pub fn sample_next_ring<R: Rng + ?Sized>(
    rng: &mut R,
    world: Vec2,
    current: &Ring,
    base_radius: f32,
) -> RingSample {
    let inset = base_radius * EDGE_INSET_FACTOR;
    let center = sample_position(rng, world, inset);
    let radius = sample_axis(
        rng,
        base_radius * MIN_RADIUS_FACTOR,
        base_radius * MAX_RADIUS_FACTOR,
    );

    let mut ring = Ring::new(center, radius);
    let retried = overlaps(current, &ring);
    if retried {
        ring.center = sample_position(rng, world, inset);
    }

    RingSample { ring, retried }
}

/// Generate the next ring for a run
pub fn generate_next_ring<R: Rng + ?Sized>(
    rng: &mut R,
    world: Vec2,
    current: &Ring,
    base_radius: f32,
) -> Ring {
    sample_next_ring(rng, world, current, base_radius).ring
}

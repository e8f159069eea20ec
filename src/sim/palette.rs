//! Ring colour palettes
//!
//! Consecutive rings must read as different objects at a glance, so the next
//! ring's palette is drawn until it is far enough (in RGB space) from the
//! current one.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{PALETTE_MAX_RETRIES, PALETTE_MIN_DISTANCE};

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Euclidean distance in RGB space
    pub fn distance(self, other: Rgb) -> f32 {
        let dr = self.0 as f32 - other.0 as f32;
        let dg = self.1 as f32 - other.1 as f32;
        let db = self.2 as f32 - other.2 as f32;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

/// Ring stroke colours, indexed by palette id
pub const PALETTES: [Rgb; 10] = [
    Rgb(0x4f, 0xc3, 0xf7), // sky
    Rgb(0xff, 0x8a, 0x65), // coral
    Rgb(0xae, 0xea, 0x00), // lime
    Rgb(0xba, 0x68, 0xc8), // orchid
    Rgb(0xff, 0xd5, 0x4f), // amber
    Rgb(0x26, 0xa6, 0x9a), // teal
    Rgb(0xf0, 0x62, 0x92), // pink
    Rgb(0x7e, 0x57, 0xc2), // violet
    Rgb(0xef, 0xeb, 0xe9), // chalk
    Rgb(0xe5, 0x39, 0x35), // red
];

/// Colour for a palette id (ids wrap around the table)
#[inline]
pub fn palette_color(id: usize) -> Rgb {
    PALETTES[id % PALETTES.len()]
}

/// Any palette id
pub fn random_palette<R: Rng + ?Sized>(rng: &mut R) -> usize {
    rng.random_range(0..PALETTES.len())
}

/// Pick a palette visually distinct from `avoid`
///
/// Draws up to `PALETTE_MAX_RETRIES` candidates; if none clears
/// `PALETTE_MIN_DISTANCE` the most distant candidate seen is accepted.
pub fn pick_distinct_palette<R: Rng + ?Sized>(rng: &mut R, avoid: usize) -> usize {
    let avoid_color = palette_color(avoid);
    let mut best = None::<(usize, f32)>;

    for _ in 0..PALETTE_MAX_RETRIES.max(1) {
        let candidate = random_palette(rng);
        let dist = palette_color(candidate).distance(avoid_color);
        if dist >= PALETTE_MIN_DISTANCE {
            return candidate;
        }
        if best.is_none_or(|(_, d)| dist > d) {
            best = Some((candidate, dist));
        }
    }

    best.map(|(id, _)| id).unwrap_or(avoid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Rgb(10, 20, 30);
        let b = Rgb(40, 60, 30);
        assert_eq!(a.distance(b), b.distance(a));
        assert_eq!(a.distance(b), 50.0);
    }

    #[test]
    fn test_distinct_palette_never_repeats_current() {
        let mut rng = Pcg32::seed_from_u64(7);
        for avoid in 0..PALETTES.len() {
            for _ in 0..200 {
                let id = pick_distinct_palette(&mut rng, avoid);
                assert_ne!(id, avoid, "picked the same palette as the current ring");
            }
        }
    }

    #[test]
    fn test_distinct_palette_mostly_clears_threshold() {
        let mut rng = Pcg32::seed_from_u64(42);
        let far_enough = (0..500)
            .filter(|_| {
                let id = pick_distinct_palette(&mut rng, 0);
                palette_color(id).distance(palette_color(0)) >= PALETTE_MIN_DISTANCE
            })
            .count();
        assert!(far_enough > 480, "only {far_enough}/500 picks were distinct");
    }
}

//! # Game Mathematics
//!
//! Dice and distance helpers shared by the generators and the encounter rules.

use crate::Position;
use rand::rngs::StdRng;
use rand::Rng;

/// Euclidean distance rounded to the nearest whole tile.
pub fn rounded_distance(a: Position, b: Position) -> u32 {
    a.euclidean_distance(b).round() as u32
}

/// `base + uniform(0, spread)`, the upper bound exclusive.
///
/// A zero spread returns `base` without touching the generator.
pub fn roll(rng: &mut StdRng, base: u32, spread: u32) -> u32 {
    if spread == 0 {
        return base;
    }
    base + rng.gen_range(0..spread)
}

/// A roll in `[0, 100)`.
pub fn percentile(rng: &mut StdRng) -> u32 {
    rng.gen_range(0..100)
}

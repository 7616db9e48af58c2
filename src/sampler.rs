//! Per-worker sampling loop.
//!
//! Each worker owns a private ChaCha8 generator seeded exclusively from its
//! assignment, so equal inputs produce equal hit counts on every platform
//! and no generator state is ever shared between workers.

use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Whether the point lies inside the closed disk of the given radius.
/// Points exactly on the circle count as hits.
pub fn in_circle(x: f64, y: f64, radius: f64) -> bool {
    x * x + y * y <= radius * radius
}

/// Draws `share` points uniformly from `[-radius, radius]²` and returns how
/// many land inside the circle.
///
/// Inputs are pre-validated by the caller: `radius` is positive, and the
/// returned count is always in `[0, share]`.
pub fn count_hits(share: u64, seed: u64, radius: f64) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let coord = Uniform::new_inclusive(-radius, radius);
    let mut hits = 0;

    for _ in 0..share {
        let x = coord.sample(&mut rng);
        let y = coord.sample(&mut rng);
        if in_circle(x, y, radius) {
            hits += 1;
        }
    }

    hits
}

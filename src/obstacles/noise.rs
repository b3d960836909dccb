//! Seeded random source for the obstacle walk.

use rand::SeedableRng;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Random generator with configurable seed for reproducibility
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    rng: SmallRng,
}

impl NoiseGenerator {
    /// Create a new generator
    ///
    /// If seed is 0, uses random entropy for non-deterministic behavior.
    /// Otherwise, uses the provided seed for reproducible results.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng }
    }

    /// Generate uniform random in [0, 1)
    #[inline]
    pub fn uniform(&mut self) -> f32 {
        Uniform::new(0.0f32, 1.0).sample(&mut self.rng)
    }

    /// Returns true with given probability
    #[inline]
    pub fn chance(&mut self, probability: f32) -> bool {
        self.uniform() < probability
    }

    /// Shuffle a slice in place
    #[inline]
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

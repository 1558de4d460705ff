//! Uniform-variance noise source.
//!
//! Every stochastic term in the simulator flows through this wrapper so
//! tests can seed it and get reproducible runs.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Injectable noise source backing the `± x` terms of the heuristics.
pub struct NoiseSource {
    rng: SmallRng,
}

impl NoiseSource {
    /// Entropy-seeded source for production use.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Deterministic source for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in `(-max, max)`. Returns `0.0` for non-positive `max`.
    pub fn variance(&mut self, max: f32) -> f32 {
        if max <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-max..max)
    }

    /// Flow-sensor pulses accumulated during one tick of pumping,
    /// uniform in `[10, 15)`.
    pub fn pulse_burst(&mut self) -> u64 {
        self.rng.gen_range(10..15)
    }

    /// Bernoulli trial with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.r#gen::<f32>() < p
    }
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self::new()
    }
}

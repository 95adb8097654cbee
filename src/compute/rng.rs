//! Seeded random source shared by the optimizer and its strategies.

use rand::prelude::*;

/// Random number generator wrapper for search operations.
#[derive(Debug, Clone)]
pub struct SearchRng {
    rng: StdRng,
}

impl SearchRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform in `[lower, upper]`.
    pub fn uniform(&mut self, lower: f64, upper: f64) -> f64 {
        if lower >= upper {
            return lower;
        }
        self.rng.gen_range(lower..=upper)
    }

    /// Uniform index in `0..n`. `n` must be positive.
    pub fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Standard normal draw.
    pub fn standard_normal(&mut self) -> f64 {
        self.rng.sample(rand_distr::StandardNormal)
    }

    /// Gaussian draw with the given mean and standard deviation.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + self.standard_normal() * std_dev
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Access to the underlying generator for `rand::seq` helpers.
    pub fn inner_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

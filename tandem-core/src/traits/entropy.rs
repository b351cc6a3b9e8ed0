//! Randomness source

use rand::{Rng, RngCore};

/// Uniform random numbers for probabilistic pulse profiles
///
/// Implemented for every [`RngCore`]; a seeded `rand::rngs::SmallRng` is
/// plenty, since the values only add texture.
pub trait Entropy {
    /// Next value, uniform in `[0, 1)`
    fn next_unit(&mut self) -> f32;
}

impl<R: RngCore> Entropy for R {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

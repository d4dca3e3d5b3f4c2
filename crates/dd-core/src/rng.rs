//! The simulation's single seeded RNG.
//!
//! # Determinism
//!
//! Every random draw in a run (strategy evaluation, seeding, behavior
//! choices, resource placement) goes through one `SimRng` owned by the
//! simulation.  The simulation is single-threaded and iterates its
//! collections in id order, so two runs with the same seed and the same
//! configuration make the same draws in the same order and end in the same
//! state.
//!
//! Values that need a stable per-entity seed without consuming a draw (agent
//! genomes, for instance) use [`mix_seed`].

use rand::distributions::Distribution;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Combine a base seed with an integer key.  Consecutive keys spread
/// uniformly across the seed space.
#[inline]
pub fn mix_seed(seed: u64, key: u64) -> u64 {
    seed ^ key.wrapping_add(1).wrapping_mul(MIXING_CONSTANT)
}

/// Simulation-level RNG.
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Draw one value from any `rand` / `rand_distr` distribution.
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: D) -> T {
        self.0.sample(dist)
    }

    /// Choose a random element from a slice.  `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

//! Random number generation.
//!
//! All randomness flows through explicit [`SimRng`] instances so that a run
//! started from a seed is reproducible.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Generator used by every random decision in the simulation.
pub type SimRng = Xoshiro256PlusPlus;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}

/// Create an RNG seeded from the thread-local entropy source.
pub fn entropy_rng() -> SimRng {
    SimRng::from_rng(&mut rand::rng())
}

/// Derive an independent child stream from a parent generator.
pub fn derive_rng(parent: &mut SimRng) -> SimRng {
    SimRng::from_rng(parent)
}

//! Deterministic RNG wrapper for the station selector.
//!
//! # Determinism strategy
//!
//! The engine owns one `ColonyRng` seeded from `EngineConfig::seed`.  Each
//! ant of a round receives its own child RNG derived from it in ant order:
//!
//!   child_seed = parent.next_u64() XOR (ant_index * MIXING_CONSTANT)
//!
//! The children are drawn sequentially before any ant runs, so sampling can
//! happen on a thread pool without changing the outcome.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seedable RNG used for all stochastic choices of the engine.
///
/// `Send` but deliberately not shared: each thread must own its child.
pub struct ColonyRng(SmallRng);

impl ColonyRng {
    pub fn new(seed: u64) -> Self {
        ColonyRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent child RNG for stream `offset`.
    pub fn child(&mut self, offset: u64) -> ColonyRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        ColonyRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

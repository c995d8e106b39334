//! Deterministic input stimulus for golden runs

use std::num::NonZeroUsize;

use num_bigint::BigUint;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::bits;
use crate::error::Result;
use crate::pattern::Pattern;

pub const DEFAULT_SEED: u64 = 0x7047_7572_6521_0001;

/// Seeded generator of width-bounded input values
pub struct Stimulus {
    rng: Xoshiro256StarStar,
}

impl Stimulus {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    /// Uniform value in `[0, 2^width)`
    pub fn next_value(&mut self, width: NonZeroUsize) -> BigUint {
        let words = width.get().div_ceil(32);
        let digits: Vec<u32> = (0..words).map(|_| self.rng.next_u32()).collect();
        bits::truncate(&BigUint::new(digits), width)
    }

    /// Poke a fresh value into every input for the pattern's current cycle
    pub fn drive(&mut self, pattern: &mut dyn Pattern) -> Result<()> {
        let widths: Vec<NonZeroUsize> = {
            let circuit = pattern.circuit();
            circuit
                .inputs()
                .iter()
                .map(|&id| circuit.graph().width(id).unwrap_or(NonZeroUsize::MIN))
                .collect()
        };
        for (index, width) in widths.into_iter().enumerate() {
            let value = self.next_value(width);
            pattern.poke(index, &value)?;
        }
        Ok(())
    }
}

impl Default for Stimulus {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

//! Width helpers for arbitrary-precision signal values

use std::num::NonZeroUsize;

use num_bigint::BigUint;
use num_traits::One;

/// All-ones mask covering `width` bits
#[inline]
pub fn mask(width: NonZeroUsize) -> BigUint {
    (BigUint::one() << width.get()) - 1u32
}

/// Truncate `value` to its low `width` bits
#[inline]
pub fn truncate(value: &BigUint, width: NonZeroUsize) -> BigUint {
    if value.bits() <= width.get() as u64 {
        value.clone()
    } else {
        value & mask(width)
    }
}

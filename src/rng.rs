// SPDX-License-Identifier: AGPL-3.0-only

//! Multiply-with-carry uniform random number generator.
//!
//! One generator per execution thread: a mutable 64-bit state word and
//! an immutable per-thread multiplier assigned at stream initialization.
//! Each step computes `x = (x & 0xffffffff) * a + (x >> 32)`, the
//! classic Marsaglia MWC recurrence, and maps the new state to a uniform
//! float in [0, 1) through the mantissa-limited mapping of
//! [`Real::unit_from_bits`]. Only the low mantissa-width bits are used,
//! so every output is exactly representable and 1.0 is unreachable.
//!
//! Multipliers must be chosen so that `a * 2^32 - 1` is a safe prime;
//! [`DEFAULT_MULTIPLIER`] is such a value. The host assigns a distinct
//! multiplier or seed per thread to decorrelate streams.

use crate::real::Real;

/// Default MWC multiplier (Marsaglia's KISS component).
pub const DEFAULT_MULTIPLIER: u32 = 698_769_069;

/// Per-thread multiply-with-carry generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MwcRng {
    x: u64,
    a: u64,
}

impl MwcRng {
    /// Create a generator from a 64-bit seed and a stream multiplier.
    ///
    /// The all-zero state is a fixed point of the recurrence and is
    /// remapped to a nonzero word.
    #[must_use]
    pub fn new(seed: u64, multiplier: u32) -> Self {
        Self {
            x: if seed == 0 { 1 } else { seed },
            a: u64::from(multiplier),
        }
    }

    /// Generator seeded for stream `index` with the default multiplier.
    #[must_use]
    pub fn from_stream(seed: u64, index: u64) -> Self {
        // Golden-ratio stride keeps neighboring streams apart.
        Self::new(
            seed.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            DEFAULT_MULTIPLIER,
        )
    }

    /// Current raw state word.
    #[must_use]
    pub const fn state(&self) -> u64 {
        self.x
    }

    /// Advance the recurrence and return the new state word.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.x = (self.x & 0xFFFF_FFFF) * self.a + (self.x >> 32);
        self.x
    }

    /// Next uniform value in [0, 1) at the configured precision.
    #[inline]
    pub fn next<F: Real>(&mut self) -> F {
        F::unit_from_bits(self.next_u64())
    }

    /// Single-precision entry point.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.next()
    }

    /// Double-precision entry point.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next()
    }
}

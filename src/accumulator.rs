// SPDX-License-Identifier: AGPL-3.0-only

//! Lock-free weight deposits into shared accumulators, plus the
//! per-thread write-combining cache.
//!
//! The shared fluence buffer is the single point of concurrent mutation
//! in the kernel core. Deposits use either a native 64-bit atomic add
//! or, when the device lacks reliable wide atomics, a software emulation
//! built from two 32-bit atomics: a compare-and-retry loop on the low
//! word with a carry into the high word on wrap. The strategy is
//! resolved once per launch from [`KernelConfig::atomics_mode`]; the
//! software path can be forced even when wide atomics are advertised.
//!
//! Deposits to the same slot are linearizable (the final sum is exact,
//! no lost updates). There is no ordering guarantee between slots, and
//! readback ([`AccumulatorBuffer::load`], `snapshot`, `total`) is only
//! meaningful after all depositing threads have finished.
//!
//! [`KernelConfig::atomics_mode`]: crate::config::KernelConfig::atomics_mode

use crate::config::AtomicsMode;
use crate::error::CoreError;
use crate::real::Real;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Integer weight scale: a packet of unit weight deposits this many
/// accumulator counts.
pub const WEIGHT_SCALE: u32 = 0x7F_FFFF;

/// Convert a floating-point packet weight in [0, 1] to integer
/// accumulator counts, rounding to nearest.
#[must_use]
pub fn quantize_weight<F: Real>(weight: F) -> u32 {
    (weight * F::from_u32(WEIGHT_SCALE) + F::HALF)
        .trunc()
        .to_f64() as u32
}

/// 64-bit accumulator emulated from two 32-bit atomics.
///
/// The low word takes the weight through a compare-and-retry loop; a
/// wrap of the low word carries one into the high word. Some thread
/// always wins the exchange race, so the retry loop terminates.
#[derive(Debug, Default)]
pub struct SoftAccu64 {
    lo: AtomicU32,
    hi: AtomicU32,
}

impl SoftAccu64 {
    #[must_use]
    pub const fn new() -> Self {
        Self { lo: AtomicU32::new(0), hi: AtomicU32::new(0) }
    }

    /// Atomically add a 32-bit weight.
    pub fn deposit(&self, weight: u32) {
        let _ = self.deposit_lo(weight);
    }

    /// Add a weight and return the previous low word. The returned word
    /// is unique per winning exchange between two wraps.
    fn deposit_lo(&self, weight: u32) -> u32 {
        let mut cur = self.lo.load(Ordering::Relaxed);
        loop {
            let new = cur.wrapping_add(weight);
            match self
                .lo
                .compare_exchange_weak(cur, new, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => {
                    // Wrapped past 2^32: carry into the high word.
                    if new < cur {
                        self.hi.fetch_add(1, Ordering::Relaxed);
                    }
                    return cur;
                }
                Err(observed) => cur = observed,
            }
        }
    }

    /// Combined 64-bit value. Exact only after depositing threads have
    /// quiesced; a concurrent reader can observe a deposit's low word
    /// before its carry.
    #[must_use]
    pub fn load(&self) -> u64 {
        let hi = self.hi.load(Ordering::Relaxed);
        let lo = self.lo.load(Ordering::Relaxed);
        (u64::from(hi) << 32) | u64::from(lo)
    }
}

/// Shared accumulator buffer with the deposit strategy fixed at
/// construction.
#[derive(Debug)]
pub enum AccumulatorBuffer {
    /// Native 64-bit atomic adds.
    Native(Vec<AtomicU64>),
    /// Paired 32-bit emulation.
    Software(Vec<SoftAccu64>),
}

impl AccumulatorBuffer {
    /// Zeroed buffer of `len` slots using the given deposit strategy.
    #[must_use]
    pub fn new(len: usize, mode: AtomicsMode) -> Self {
        match mode {
            AtomicsMode::Native => {
                Self::Native((0..len).map(|_| AtomicU64::new(0)).collect())
            }
            AtomicsMode::Software => {
                Self::Software((0..len).map(|_| SoftAccu64::new()).collect())
            }
        }
    }

    #[must_use]
    pub fn mode(&self) -> AtomicsMode {
        match self {
            Self::Native(_) => AtomicsMode::Native,
            Self::Software(_) => AtomicsMode::Software,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Native(v) => v.len(),
            Self::Software(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically add `weight` counts to the slot at `offset`.
    ///
    /// Safe under unbounded concurrent callers. `offset` must be in
    /// bounds; use [`Self::checked_deposit`] when it comes from
    /// unvalidated input.
    pub fn deposit(&self, offset: usize, weight: u32) {
        match self {
            Self::Native(v) => {
                v[offset].fetch_add(u64::from(weight), Ordering::Relaxed);
            }
            Self::Software(v) => v[offset].deposit(weight),
        }
    }

    /// Bounds-checked deposit for offsets from unvalidated binning.
    pub fn checked_deposit(&self, offset: usize, weight: u32) -> Result<(), CoreError> {
        if offset >= self.len() {
            return Err(CoreError::AccumulatorBounds { offset, len: self.len() });
        }
        self.deposit(offset, weight);
        Ok(())
    }

    /// Value of one slot. Exact only after deposits have quiesced.
    #[must_use]
    pub fn load(&self, offset: usize) -> u64 {
        match self {
            Self::Native(v) => v[offset].load(Ordering::Relaxed),
            Self::Software(v) => v[offset].load(),
        }
    }

    /// Copy of all slots as plain integers, for host-side readback.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u64> {
        match self {
            Self::Native(v) => v.par_iter().map(|s| s.load(Ordering::Relaxed)).collect(),
            Self::Software(v) => v.par_iter().map(SoftAccu64::load).collect(),
        }
    }

    /// Sum of all slots, for conservation checks during readback.
    #[must_use]
    pub fn total(&self) -> u64 {
        match self {
            Self::Native(v) => v.par_iter().map(|s| s.load(Ordering::Relaxed)).sum(),
            Self::Software(v) => v.par_iter().map(SoftAccu64::load).sum(),
        }
    }
}

/// Per-thread write-combining cache in front of [`AccumulatorBuffer`].
///
/// Consecutive interactions of one packet usually land in the same
/// spatial bin; holding one pending (offset, weight) pair coalesces
/// those deposits into a single atomic. At most one pair is outstanding:
/// a deposit to a different offset first flushes the pending one.
///
/// The owning loop must call [`Self::flush`] before it exits or the
/// pending weight is silently lost; the cache does not enforce this.
#[derive(Debug, Clone, Default)]
pub struct AccumulatorCache {
    offset: usize,
    weight: u32,
}

impl AccumulatorCache {
    #[must_use]
    pub const fn new() -> Self {
        Self { offset: 0, weight: 0 }
    }

    /// Pending weight at `offset`, zero when nothing is cached there.
    #[must_use]
    pub const fn pending(&self, offset: usize) -> u32 {
        if self.offset == offset {
            self.weight
        } else {
            0
        }
    }

    /// Merge `weight` into the cache, spilling the previously cached
    /// entry to `target` when the offset changes.
    pub fn add(&mut self, target: &AccumulatorBuffer, offset: usize, weight: u32) {
        if self.offset == offset {
            self.weight += weight;
        } else {
            if self.weight > 0 {
                target.deposit(self.offset, self.weight);
            }
            self.offset = offset;
            self.weight = weight;
        }
    }

    /// Deposit any pending weight and clear the cache.
    pub fn flush(&mut self, target: &AccumulatorBuffer) {
        if self.weight > 0 {
            target.deposit(self.offset, self.weight);
            self.weight = 0;
        }
    }
}

/// Shared packet counter handing out launch indices.
///
/// The software variant reuses the paired 32-bit emulation; the low
/// word of the returned index is unique per call, which distinguishes
/// concurrent launches for any realistic packet count.
#[derive(Debug)]
pub enum PacketCounter {
    Native(AtomicU64),
    Software(SoftAccu64),
}

impl PacketCounter {
    #[must_use]
    pub fn new(mode: AtomicsMode) -> Self {
        match mode {
            AtomicsMode::Native => Self::Native(AtomicU64::new(0)),
            AtomicsMode::Software => Self::Software(SoftAccu64::new()),
        }
    }

    /// Claim the next packet index.
    pub fn next_index(&self) -> u64 {
        match self {
            Self::Native(c) => c.fetch_add(1, Ordering::Relaxed),
            Self::Software(c) => {
                // The high word is read separately, so an index handed
                // out while another thread carries across a wrap may see
                // a stale high half; the low word itself is exchange-won
                // and unique between wraps.
                let hi = c.hi.load(Ordering::Relaxed);
                let lo = c.deposit_lo(1);
                (u64::from(hi) << 32) | u64::from(lo)
            }
        }
    }

    /// Number of packets launched so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        match self {
            Self::Native(c) => c.load(Ordering::Relaxed),
            Self::Software(c) => c.load(),
        }
    }
}

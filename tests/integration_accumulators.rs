// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: concurrent deposits into the shared accumulator
//! buffer on both atomic strategies, and the write-combining cache
//! driven the way a per-packet loop drives it.

use photonspring::accumulator::{
    quantize_weight, AccumulatorBuffer, AccumulatorCache, PacketCounter, WEIGHT_SCALE,
};
use photonspring::config::{AtomicsMode, DeviceCaps, KernelConfig};
use rayon::prelude::*;

const MODES: [AtomicsMode; 2] = [AtomicsMode::Native, AtomicsMode::Software];

#[test]
fn concurrent_unit_deposits_are_never_lost() {
    // N threads deposit weight 1 to the same slot; the sum must be
    // exactly N on both code paths.
    for mode in MODES {
        for n in [1u64, 10, 10_000] {
            let buf = AccumulatorBuffer::new(4, mode);
            (0..n).into_par_iter().for_each(|_| buf.deposit(2, 1));
            assert_eq!(buf.load(2), n, "mode={mode:?} n={n}");
            assert_eq!(buf.total(), n);
        }
    }
}

#[test]
fn concurrent_deposits_across_slots_partition_correctly() {
    for mode in MODES {
        let buf = AccumulatorBuffer::new(8, mode);
        (0..8_000u64)
            .into_par_iter()
            .for_each(|i| buf.deposit((i % 8) as usize, 3));
        assert_eq!(buf.snapshot(), vec![3_000u64; 8]);
        assert_eq!(buf.total(), 24_000);
    }
}

#[test]
fn software_carry_survives_contention() {
    // Large weights force low-word wraps while many threads race.
    let buf = AccumulatorBuffer::new(1, AtomicsMode::Software);
    let w = u32::MAX / 64;
    let n = 1_000u64;
    (0..n).into_par_iter().for_each(|_| buf.deposit(0, w));
    assert_eq!(buf.load(0), n * u64::from(w));
    assert!(buf.load(0) > u64::from(u32::MAX));
}

#[test]
fn cached_packet_loop_matches_uncached_totals() {
    // Replay the same deposit sequence with and without the cache.
    let offsets: Vec<usize> = (0..5_000).map(|i| (i * i / 37) % 16).collect();
    let weights: Vec<u32> = (0..5_000).map(|i| (i % 11 + 1) as u32).collect();

    let direct = AccumulatorBuffer::new(16, AtomicsMode::Native);
    for (&o, &w) in offsets.iter().zip(&weights) {
        direct.deposit(o, w);
    }

    let cached = AccumulatorBuffer::new(16, AtomicsMode::Native);
    let mut cache = AccumulatorCache::new();
    for (&o, &w) in offsets.iter().zip(&weights) {
        cache.add(&cached, o, w);
    }
    cache.flush(&cached);

    assert_eq!(direct.snapshot(), cached.snapshot());
}

#[test]
fn concurrent_cached_workers_conserve_weight() {
    for mode in MODES {
        let buf = AccumulatorBuffer::new(32, mode);
        let per_worker = 1_000u32;
        (0..64u32).into_par_iter().for_each(|worker| {
            let mut cache = AccumulatorCache::new();
            for i in 0..per_worker {
                // Runs of identical offsets exercise the merge path.
                let offset = ((worker + i / 50) % 32) as usize;
                cache.add(&buf, offset, 2);
            }
            cache.flush(&buf);
        });
        assert_eq!(buf.total(), 64 * u64::from(per_worker) * 2, "mode={mode:?}");
    }
}

#[test]
fn quantized_unit_weight_sums_to_scale() {
    // A packet depositing its full unit weight in fractions must land
    // within rounding of one WEIGHT_SCALE.
    let buf = AccumulatorBuffer::new(1, AtomicsMode::Native);
    let fractions = [0.25f64, 0.25, 0.125, 0.375];
    for w in fractions {
        buf.deposit(0, quantize_weight(w));
    }
    let total = buf.total();
    let err = total.abs_diff(u64::from(WEIGHT_SCALE));
    assert!(err <= fractions.len() as u64, "total={total}");
}

#[test]
fn packet_counter_assigns_each_index_once() {
    for mode in MODES {
        let counter = PacketCounter::new(mode);
        let mut indices: Vec<u64> = (0..2_000u32)
            .into_par_iter()
            .map(|_| counter.next_index())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), 2_000, "mode={mode:?}");
        assert_eq!(counter.count(), 2_000);
    }
}

#[test]
fn config_resolves_strategy_for_degraded_devices() {
    let cfg = KernelConfig::default();
    let no_atomics = DeviceCaps { fp64: true, atomic64: false };
    let buf = AccumulatorBuffer::new(4, cfg.atomics_mode(&no_atomics));
    assert_eq!(buf.mode(), AtomicsMode::Software);
    buf.deposit(0, 5);
    assert_eq!(buf.load(0), 5);
}

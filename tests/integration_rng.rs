// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: random number generator reproducibility and
//! output-range guarantees over long draws.

use photonspring::rng::{MwcRng, DEFAULT_MULTIPLIER};

#[test]
fn sequences_reproduce_bit_for_bit() {
    let seeds = [(1u64, DEFAULT_MULTIPLIER), (0xABCD_EF01_2345_6789, DEFAULT_MULTIPLIER)];
    for (x0, a) in seeds {
        let reference: Vec<u64> = {
            let mut rng = MwcRng::new(x0, a);
            (0..10_000).map(|_| rng.next_u64()).collect()
        };
        let mut rng = MwcRng::new(x0, a);
        for (i, &expect) in reference.iter().enumerate() {
            assert_eq!(rng.next_u64(), expect, "seed {x0:#x}, draw {i}");
        }
    }
}

#[test]
fn float_sequences_reproduce_across_precisions() {
    let mut a = MwcRng::new(97, DEFAULT_MULTIPLIER);
    let mut b = MwcRng::new(97, DEFAULT_MULTIPLIER);
    for _ in 0..10_000 {
        let va = a.next_f64();
        let vb = b.next_f64();
        assert_eq!(va.to_bits(), vb.to_bits());
    }
}

#[test]
fn ten_million_draws_never_reach_one() {
    let mut rng = MwcRng::new(0x5EED_5EED, DEFAULT_MULTIPLIER);
    for i in 0..10_000_000u64 {
        let v = rng.next_f32();
        assert!(v < 1.0, "draw {i} hit {v}");
        assert!(v >= 0.0);
    }
    let mut rng = MwcRng::new(0x5EED_5EED, DEFAULT_MULTIPLIER);
    for i in 0..10_000_000u64 {
        let v = rng.next_f64();
        assert!(v < 1.0, "draw {i} hit {v}");
        assert!(v >= 0.0);
    }
}

#[test]
fn uniformity_over_coarse_bins() {
    // Chi-squared against 16 equal bins; threshold is the 99.9th
    // percentile for 15 degrees of freedom.
    let mut rng = MwcRng::new(2024, DEFAULT_MULTIPLIER);
    let n = 1_600_000u64;
    let mut bins = [0u64; 16];
    for _ in 0..n {
        let v = rng.next_f64();
        bins[(v * 16.0) as usize] += 1;
    }
    let expect = n as f64 / 16.0;
    let chi2: f64 = bins
        .iter()
        .map(|&b| {
            let d = b as f64 - expect;
            d * d / expect
        })
        .sum();
    assert!(chi2 < 37.7, "chi2={chi2}, bins={bins:?}");
}

#[test]
fn state_accessor_tracks_recurrence() {
    let mut rng = MwcRng::new(11, DEFAULT_MULTIPLIER);
    let x0 = rng.state();
    let out = rng.next_u64();
    assert_eq!(out, rng.state());
    // One MWC step computed by hand.
    let expect = (x0 & 0xFFFF_FFFF) * u64::from(DEFAULT_MULTIPLIER) + (x0 >> 32);
    assert_eq!(out, expect);
}

#[test]
fn distinct_streams_diverge_immediately() {
    let mut streams: Vec<MwcRng> = (0..8).map(|i| MwcRng::from_stream(7, i)).collect();
    let first: Vec<u64> = streams.iter_mut().map(MwcRng::next_u64).collect();
    let mut unique = first.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), first.len());
}

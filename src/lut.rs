// SPDX-License-Identifier: AGPL-3.0-only

//! Linear-interpolation lookup table sampler.
//!
//! A [`LinearLut`] descriptor addresses a window of a flat, read-only
//! buffer shared by all threads; the descriptor itself owns no data.
//! Three query conventions share one interpolation scheme: the first
//! index is the NEAREST grid point (truncation of `fp_index + 0.5`),
//! the weight is the fractional part of `fp_index`, and the second
//! index is clipped to `n - 1`. This nearest-then-forward asymmetry is
//! load-bearing for output reproducibility and must not be replaced by
//! floor-based interpolation.
//!
//! Out-of-range queries leave the output parameter untouched; callers
//! pre-initialize it to a sane default.

use crate::error::CoreError;
use crate::real::Real;
use serde::{Deserialize, Serialize};

/// Lookup table descriptor over a shared flat buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearLut<F: Real> {
    /// Domain location of the first element.
    pub first: F,
    /// Reciprocal of the domain length (last minus first).
    pub inv_span: F,
    /// Number of elements in the table.
    pub n: usize,
    /// Index of the first element in the shared buffer.
    pub offset: usize,
}

unsafe impl<F: Real + bytemuck::Zeroable> bytemuck::Zeroable for LinearLut<F> {}
unsafe impl<F: Real + bytemuck::Pod> bytemuck::Pod for LinearLut<F> {}

impl<F: Real> LinearLut<F> {
    /// Descriptor for a table spanning `[first, last]` with `n` elements
    /// starting at `offset` in the shared buffer.
    #[must_use]
    pub fn new(first: F, last: F, n: usize, offset: usize) -> Self {
        Self {
            first,
            inv_span: F::ONE / (last - first),
            n,
            offset,
        }
    }

    /// Check the descriptor against the buffer it will sample.
    ///
    /// Interpolation needs at least two elements, and the addressed
    /// window must lie inside the buffer.
    pub fn validate(&self, buffer_len: usize) -> Result<(), CoreError> {
        if self.n < 2 || self.offset.saturating_add(self.n) > buffer_len {
            return Err(CoreError::LutDescriptor {
                n: self.n,
                offset: self.offset,
                buffer_len,
            });
        }
        Ok(())
    }

    /// Sample at a relative position `where_` in [0, 1] mapped over the
    /// table's `n` elements. Queries whose nearest grid index falls
    /// outside the table leave `out` untouched; an overshoot of less
    /// than half a grid step still rounds to an in-range index and
    /// writes a sample.
    pub fn sample_rel(&self, buffer: &[F], where_: F, out: &mut F) {
        self.sample_index(buffer, where_ * F::from_usize(self.n - 1), out);
    }

    /// Sample at an absolute domain value, mapped through the descriptor's
    /// `first`/`inv_span`. Out-of-domain values leave `out` untouched.
    pub fn sample_value(&self, buffer: &[F], where_: F, out: &mut F) {
        let fp_index = (where_ - self.first) * self.inv_span * F::from_usize(self.n - 1);
        // The domain check runs on the unrounded index, so a value at the
        // exact upper edge is accepted while anything beyond it is not.
        if fp_index >= F::ZERO && fp_index <= F::from_usize(self.n - 1) {
            self.interpolate(buffer, fp_index, out);
        }
    }

    /// Sample at a fractional index in [0, n-1]. Indices whose nearest
    /// grid point falls outside the table leave `out` untouched (same
    /// half-step rounding latitude as [`Self::sample_rel`]).
    pub fn sample_index(&self, buffer: &[F], fp_index: F, out: &mut F) {
        if fp_index + F::HALF >= F::ZERO {
            self.interpolate(buffer, fp_index, out);
        }
    }

    fn interpolate(&self, buffer: &[F], fp_index: F, out: &mut F) {
        // Nearest grid point first, forward neighbor second.
        let index1 = (fp_index + F::HALF).trunc().to_f64() as usize;
        if index1 < self.n {
            let w2 = fp_index - fp_index.floor();
            let index2 = (index1 + 1).min(self.n - 1);
            *out = buffer[self.offset + index1] * (F::ONE - w2)
                + buffer[self.offset + index2] * w2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances;

    // Table window [10, 20, 30, 40, 50] at offset 2 in a larger buffer.
    fn fixture() -> (Vec<f64>, LinearLut<f64>) {
        let buffer = vec![-1.0, -1.0, 10.0, 20.0, 30.0, 40.0, 50.0, -1.0];
        (buffer, LinearLut::new(0.0, 4.0, 5, 2))
    }

    #[test]
    fn validate_accepts_fixture_and_rejects_overrun() {
        let (buffer, lut) = fixture();
        assert!(lut.validate(buffer.len()).is_ok());
        assert!(matches!(
            lut.validate(5),
            Err(CoreError::LutDescriptor { .. })
        ));
        let short = LinearLut::<f64>::new(0.0, 1.0, 1, 0);
        assert!(short.validate(8).is_err());
    }

    #[test]
    fn rel_endpoints_hit_first_and_last_elements() {
        let (buffer, lut) = fixture();
        let mut out = f64::NAN;
        lut.sample_rel(&buffer, 0.0, &mut out);
        assert_eq!(out, 10.0);
        lut.sample_rel(&buffer, 1.0, &mut out);
        assert_eq!(out, 50.0);
    }

    #[test]
    fn integer_grid_points_are_exact() {
        let (buffer, lut) = fixture();
        for i in 0..5usize {
            let mut out = f64::NAN;
            lut.sample_index(&buffer, i as f64, &mut out);
            assert_eq!(out, buffer[2 + i], "grid point {i}");
        }
    }

    #[test]
    fn nearest_index_asymmetry_above_half() {
        // fp_index = 2.7: nearest is 3, weight 0.7 toward index 4,
        // so the sample blends elements 3 and 4, not 2 and 3.
        let (buffer, lut) = fixture();
        let mut out = f64::NAN;
        lut.sample_index(&buffer, 2.7, &mut out);
        let expect = 40.0 * 0.3 + 50.0 * 0.7;
        assert!((out - expect).abs() < tolerances::EXACT_F64);
    }

    #[test]
    fn below_half_matches_floor_interpolation() {
        // fp_index = 2.3: nearest is 2, weight 0.3 toward index 3.
        let (buffer, lut) = fixture();
        let mut out = f64::NAN;
        lut.sample_index(&buffer, 2.3, &mut out);
        let expect = 30.0 * 0.7 + 40.0 * 0.3;
        assert!((out - expect).abs() < tolerances::EXACT_F64);
    }

    #[test]
    fn top_edge_clips_second_index() {
        // fp_index = 3.8: nearest is 4 (the last element), forward
        // neighbor clips back to 4, so the weight cancels out.
        let (buffer, lut) = fixture();
        let mut out = f64::NAN;
        lut.sample_index(&buffer, 3.8, &mut out);
        assert_eq!(out, 50.0);
    }

    #[test]
    fn out_of_range_leaves_output_untouched() {
        let (buffer, lut) = fixture();
        let mut out = -7.5;
        lut.sample_rel(&buffer, 1.2, &mut out);
        assert_eq!(out, -7.5);
        lut.sample_rel(&buffer, -0.4, &mut out);
        assert_eq!(out, -7.5);
        lut.sample_index(&buffer, 4.6, &mut out);
        assert_eq!(out, -7.5);
        lut.sample_value(&buffer, 4.0 + 1e-9, &mut out);
        assert_eq!(out, -7.5);
        lut.sample_value(&buffer, -1e-9, &mut out);
        assert_eq!(out, -7.5);
    }

    #[test]
    fn half_step_rounding_bounds_the_silent_region() {
        // Overshoot under half a grid step rounds back to the edge and
        // writes; at exactly half a step the nearest index leaves the
        // table and the query is skipped.
        let (buffer, lut) = fixture();
        let mut out = f64::NAN;
        lut.sample_rel(&buffer, 1.0 + 1e-9, &mut out);
        assert_eq!(out, 50.0);
        let mut out = -7.5;
        lut.sample_rel(&buffer, 1.0 + 0.5 / 4.0, &mut out);
        assert_eq!(out, -7.5);
    }

    #[test]
    fn value_mode_maps_domain_linearly() {
        // Domain [100, 104] over the same five elements.
        let buffer = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let lut = LinearLut::new(100.0f64, 104.0, 5, 0);
        let mut out = f64::NAN;
        lut.sample_value(&buffer, 100.0, &mut out);
        assert_eq!(out, 10.0);
        lut.sample_value(&buffer, 104.0, &mut out);
        assert_eq!(out, 50.0);
        lut.sample_value(&buffer, 102.0, &mut out);
        assert_eq!(out, 30.0);
    }

    #[test]
    fn single_precision_sampling() {
        let buffer: Vec<f32> = vec![0.0, 1.0, 4.0, 9.0];
        let lut = LinearLut::new(0.0f32, 3.0, 4, 0);
        let mut out = f32::NAN;
        // At the half-grid point the nearest index already rounds up,
        // so the blend runs between elements 2 and 3.
        lut.sample_index(&buffer, 1.5, &mut out);
        assert!((out - 6.5).abs() < 1e-5);
        lut.sample_rel(&buffer, 1.0, &mut out);
        assert_eq!(out, 9.0);
    }
}

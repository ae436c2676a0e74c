// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized validation tolerances with numerical justification.
//!
//! Every tolerance threshold used by the test suite is defined here with
//! documentation of its origin. No ad-hoc magic numbers in assertions.
//!
//! # Tolerance categories
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Machine precision | IEEE 754 f64/f32 | 1e-10 for exact arithmetic |
//! | Derived quantity | Short operation chains | 1e-9 for Fresnel terms |
//! | Approximate math | Newton-refined seeds | relative 1e-5 (two steps) |

// ═══════════════════════════════════════════════════════════════════
// Machine-precision tolerances
// ═══════════════════════════════════════════════════════════════════

/// Tolerance for operations that should be exact in f64 arithmetic.
///
/// f64 has ~15.9 significant digits; 1e-10 allows several digits of
/// accumulated rounding in compositions of exact operations.
pub const EXACT_F64: f64 = 1e-10;

/// Unit-length check after f64 normalization or direction updates.
///
/// One rsqrt and three multiplies keep the error within a few ulp;
/// repeated scattering updates renormalize each step, so drift never
/// accumulates past this bound.
pub const UNIT_LENGTH_F64: f64 = 1e-12;

/// Unit-length check after f32 normalization.
///
/// f32 epsilon is 1.19e-7; a short multiply chain stays within ~4 ulp.
pub const UNIT_LENGTH_F32: f32 = 1e-6;

// ═══════════════════════════════════════════════════════════════════
// Derived-quantity tolerances
// ═══════════════════════════════════════════════════════════════════

/// Fresnel reflectance and refraction direction checks in f64.
///
/// The two-term reflectance formula chains a sqrt, two divisions and a
/// squaring; 1e-9 leaves an order of magnitude over the observed error.
pub const FRESNEL_F64: f64 = 1e-9;

// ═══════════════════════════════════════════════════════════════════
// Approximate-math tolerances (f32 bit-trick seeds)
// ═══════════════════════════════════════════════════════════════════

/// Relative error of the two-step Newton rsqrt/reciprocal (native mode).
///
/// The Lomont seed starts at ~3.4e-3 relative error; each Newton step
/// roughly squares it, giving ~1e-5 after two steps.
pub const NATIVE_MATH_F32: f32 = 5e-5;

/// Relative error of the one-step Newton rsqrt/reciprocal (half mode).
///
/// One refinement of the bit-level seed lands near 1e-3; the reciprocal
/// seed is rougher than the rsqrt seed, hence the wide bound.
pub const HALF_MATH_F32: f32 = 5e-2;

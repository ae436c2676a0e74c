// SPDX-License-Identifier: AGPL-3.0-only

//! Configurable-precision scalar type and math-function facade.
//!
//! The device kernel binds every math call and literal to the selected
//! floating-point width through a macro layer. The Rust rendition is the
//! sealed [`Real`] trait: all geometry and physics code is generic over
//! `F: Real` and is instantiated exactly once per build with `f32` or
//! `f64`. Constants carry the same values as the device header (machine
//! epsilon, largest losslessly representable integer, trigonometric and
//! unit-conversion constants).
//!
//! [`Math`] is the fast-math strategy: `Standard` dispatches to the
//! standard library, `Native` and `Half` to bit-trick approximations with
//! two and one Newton refinement steps respectively (single precision
//! only; double precision always uses standard accuracy, matching devices
//! whose native approximations are fp32-only). Switching the mode never
//! changes a call site.
//!
//! Division, reciprocal and square root of zero or negative arguments
//! return whatever the underlying primitive returns; callers own domain
//! validity.

use crate::config::MathMode;
use crate::vector::Scalar;

mod private {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Floating-point scalar of the compiled kernel. Implemented for `f32`
/// and `f64` only; the width is fixed for the entire build.
///
/// Extends [`Scalar`] so every float instantiates the generic vector
/// and matrix types; `ZERO` and `to_f64` come from there.
pub trait Real:
    Scalar
    + PartialOrd
    + core::fmt::Display
    + core::ops::Div<Output = Self>
    + core::ops::Neg<Output = Self>
    + core::ops::AddAssign
    + core::ops::SubAssign
    + core::ops::MulAssign
    + private::Sealed
{
    const HALF: Self;
    const ONE: Self;
    const TWO: Self;

    /// Machine epsilon of the selected precision.
    const EPS: Self;
    /// Inverse machine epsilon (2^mantissa_bits).
    const INV_EPS: Self;
    /// Largest integer representable without loss (2^mantissa_bits - 1).
    const MAX_INT: u64;
    /// Largest finite value.
    const MAX: Self;
    /// Mantissa width in bits (23 or 52). Limits the usable entropy of
    /// the random number mapping.
    const MANTISSA_BITS: u32;

    const PI: Self;
    const HALF_PI: Self;
    const TWO_PI: Self;
    /// cos(30 deg).
    const COS_30: Self;
    const RAD2DEG: Self;
    const DEG2RAD: Self;
    /// Speed of light in vacuum (m/s).
    const LIGHT_SPEED: Self;
    /// Inverse of the speed of light in vacuum (s/m).
    const INV_LIGHT_SPEED: Self;
    /// Minimum radius for log-scale radial accumulators.
    const RMIN: Self;
    /// Minimum path length for log-scale optical path length accumulators.
    const PLMIN: Self;

    fn from_f64(v: f64) -> Self;
    fn from_u32(v: u32) -> Self;
    fn from_usize(v: usize) -> Self;

    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn asin(self) -> Self;
    fn acos(self) -> Self;
    fn atan(self) -> Self;
    fn atan2(self, x: Self) -> Self;
    fn tanh(self) -> Self;
    fn sqrt(self) -> Self;
    fn cbrt(self) -> Self;
    fn ln(self) -> Self;
    fn exp(self) -> Self;
    /// x^y for x >= 0.
    fn powr(self, y: Self) -> Self;
    fn abs(self) -> Self;
    fn copysign(self, from: Self) -> Self;
    fn floor(self) -> Self;
    fn round(self) -> Self;
    fn trunc(self) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    fn clamp(self, low: Self, high: Self) -> Self;
    fn mul_add(self, b: Self, c: Self) -> Self;
    fn is_finite(self) -> bool;

    /// Integer sign: 1 for x >= 0, -1 otherwise.
    fn fsign(self) -> i32 {
        if self >= Self::ZERO {
            1
        } else {
            -1
        }
    }

    /// Square of self.
    fn square(self) -> Self {
        self * self
    }

    /// Approximate reciprocal square root with `steps` Newton refinements.
    /// Single precision uses the classic bit-level seed; double precision
    /// falls back to standard accuracy.
    fn rsqrt_approx(self, steps: u32) -> Self;

    /// Approximate reciprocal with `steps` Newton refinements; same
    /// precision policy as [`Self::rsqrt_approx`].
    fn recip_approx(self, steps: u32) -> Self;

    /// Map a raw generator word to a uniform value in [0, 1), using only
    /// the low `MANTISSA_BITS` bits so every output is exactly
    /// representable. Never returns 1.0.
    fn unit_from_bits(bits: u64) -> Self;
}

impl Real for f32 {
    const HALF: Self = 0.5;
    const ONE: Self = 1.0;
    const TWO: Self = 2.0;

    const EPS: Self = 1.192_092_9e-7;
    const INV_EPS: Self = 8_388_608.0;
    const MAX_INT: u64 = 0x7F_FFFF;
    const MAX: Self = f32::MAX;
    const MANTISSA_BITS: u32 = 23;

    const PI: Self = 3.141_592_653_589_793;
    const HALF_PI: Self = 1.570_796_326_794_896_6;
    const TWO_PI: Self = 6.283_185_307_179_586;
    const COS_30: Self = 0.866_025_403_784_438_6;
    const RAD2DEG: Self = 57.295_779_513_082_32;
    const DEG2RAD: Self = 0.017_453_292_519_943_295;
    const LIGHT_SPEED: Self = 299_792_458.0;
    const INV_LIGHT_SPEED: Self = 3.335_640_951_981_520_4e-9;
    const RMIN: Self = 1e-12;
    const PLMIN: Self = 1e-12;

    fn from_f64(v: f64) -> Self {
        v as f32
    }
    fn from_u32(v: u32) -> Self {
        v as f32
    }
    fn from_usize(v: usize) -> Self {
        v as f32
    }

    fn sin(self) -> Self {
        self.sin()
    }
    fn cos(self) -> Self {
        self.cos()
    }
    fn tan(self) -> Self {
        self.tan()
    }
    fn asin(self) -> Self {
        self.asin()
    }
    fn acos(self) -> Self {
        self.acos()
    }
    fn atan(self) -> Self {
        self.atan()
    }
    fn atan2(self, x: Self) -> Self {
        self.atan2(x)
    }
    fn tanh(self) -> Self {
        self.tanh()
    }
    fn sqrt(self) -> Self {
        self.sqrt()
    }
    fn cbrt(self) -> Self {
        self.cbrt()
    }
    fn ln(self) -> Self {
        self.ln()
    }
    fn exp(self) -> Self {
        self.exp()
    }
    fn powr(self, y: Self) -> Self {
        self.powf(y)
    }
    fn abs(self) -> Self {
        self.abs()
    }
    fn copysign(self, from: Self) -> Self {
        self.copysign(from)
    }
    fn floor(self) -> Self {
        self.floor()
    }
    fn round(self) -> Self {
        self.round()
    }
    fn trunc(self) -> Self {
        self.trunc()
    }
    fn min(self, other: Self) -> Self {
        self.min(other)
    }
    fn max(self, other: Self) -> Self {
        self.max(other)
    }
    fn clamp(self, low: Self, high: Self) -> Self {
        self.clamp(low, high)
    }
    fn mul_add(self, b: Self, c: Self) -> Self {
        self.mul_add(b, c)
    }
    fn is_finite(self) -> bool {
        self.is_finite()
    }

    fn rsqrt_approx(self, steps: u32) -> Self {
        // Bit-level seed (Lomont 2003), then Newton: y <- y*(1.5 - 0.5*x*y*y)
        let half_x = 0.5 * self;
        let mut y = f32::from_bits(0x5f37_5a86_u32.wrapping_sub(self.to_bits() >> 1));
        for _ in 0..steps {
            y *= 1.5 - half_x * y * y;
        }
        y
    }

    fn recip_approx(self, steps: u32) -> Self {
        // Bit-level seed for 1/x, then Newton: y <- y*(2 - x*y)
        let mut y = f32::from_bits(0x7ef1_27eau32.wrapping_sub(self.to_bits()));
        for _ in 0..steps {
            y *= 2.0 - self * y;
        }
        y
    }

    fn unit_from_bits(bits: u64) -> Self {
        ((bits as u32) & 0x007F_FFFF) as f32 * (1.0 / 8_388_608.0)
    }
}

impl Real for f64 {
    const HALF: Self = 0.5;
    const ONE: Self = 1.0;
    const TWO: Self = 2.0;

    const EPS: Self = 2.220_446_049_250_313e-16;
    const INV_EPS: Self = 4_503_599_627_370_496.0;
    const MAX_INT: u64 = 0xF_FFFF_FFFF_FFFF;
    const MAX: Self = f64::MAX;
    const MANTISSA_BITS: u32 = 52;

    const PI: Self = 3.141_592_653_589_793;
    const HALF_PI: Self = 1.570_796_326_794_896_6;
    const TWO_PI: Self = 6.283_185_307_179_586;
    const COS_30: Self = 0.866_025_403_784_438_6;
    const RAD2DEG: Self = 57.295_779_513_082_32;
    const DEG2RAD: Self = 0.017_453_292_519_943_295;
    const LIGHT_SPEED: Self = 299_792_458.0;
    const INV_LIGHT_SPEED: Self = 3.335_640_951_981_520_4e-9;
    const RMIN: Self = 1e-12;
    const PLMIN: Self = 1e-12;

    fn from_f64(v: f64) -> Self {
        v
    }
    fn from_u32(v: u32) -> Self {
        f64::from(v)
    }
    fn from_usize(v: usize) -> Self {
        v as f64
    }

    fn sin(self) -> Self {
        self.sin()
    }
    fn cos(self) -> Self {
        self.cos()
    }
    fn tan(self) -> Self {
        self.tan()
    }
    fn asin(self) -> Self {
        self.asin()
    }
    fn acos(self) -> Self {
        self.acos()
    }
    fn atan(self) -> Self {
        self.atan()
    }
    fn atan2(self, x: Self) -> Self {
        self.atan2(x)
    }
    fn tanh(self) -> Self {
        self.tanh()
    }
    fn sqrt(self) -> Self {
        self.sqrt()
    }
    fn cbrt(self) -> Self {
        self.cbrt()
    }
    fn ln(self) -> Self {
        self.ln()
    }
    fn exp(self) -> Self {
        self.exp()
    }
    fn powr(self, y: Self) -> Self {
        self.powf(y)
    }
    fn abs(self) -> Self {
        self.abs()
    }
    fn copysign(self, from: Self) -> Self {
        self.copysign(from)
    }
    fn floor(self) -> Self {
        self.floor()
    }
    fn round(self) -> Self {
        self.round()
    }
    fn trunc(self) -> Self {
        self.trunc()
    }
    fn min(self, other: Self) -> Self {
        self.min(other)
    }
    fn max(self, other: Self) -> Self {
        self.max(other)
    }
    fn clamp(self, low: Self, high: Self) -> Self {
        self.clamp(low, high)
    }
    fn mul_add(self, b: Self, c: Self) -> Self {
        self.mul_add(b, c)
    }
    fn is_finite(self) -> bool {
        self.is_finite()
    }

    // Double precision has no fast path on any supported device; both
    // approximations dispatch to standard accuracy.
    fn rsqrt_approx(self, _steps: u32) -> Self {
        1.0 / self.sqrt()
    }

    fn recip_approx(self, _steps: u32) -> Self {
        1.0 / self
    }

    fn unit_from_bits(bits: u64) -> Self {
        (bits & 0x000F_FFFF_FFFF_FFFF) as f64 * (1.0 / 4_503_599_627_370_496.0)
    }
}

/// Math-function strategy selected once from the kernel configuration.
///
/// Copy-cheap; pass by value into the hot loop. Every operation keeps
/// the same signature across modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub struct Math {
    mode: MathMode,
}

impl Math {
    pub const fn new(mode: MathMode) -> Self {
        Self { mode }
    }

    /// Standard-accuracy strategy.
    pub const fn standard() -> Self {
        Self { mode: MathMode::Standard }
    }

    #[must_use]
    pub const fn mode(self) -> MathMode {
        self.mode
    }

    /// Newton refinement steps of the approximate paths.
    const fn steps(self) -> u32 {
        match self.mode {
            MathMode::Standard => 0, // unused
            MathMode::Native => 2,
            MathMode::Half => 1,
        }
    }

    #[must_use]
    pub fn sqrt<F: Real>(self, x: F) -> F {
        match self.mode {
            MathMode::Standard => x.sqrt(),
            _ => x * x.rsqrt_approx(self.steps()),
        }
    }

    #[must_use]
    pub fn rsqrt<F: Real>(self, x: F) -> F {
        match self.mode {
            MathMode::Standard => F::ONE / x.sqrt(),
            _ => x.rsqrt_approx(self.steps()),
        }
    }

    #[must_use]
    pub fn recip<F: Real>(self, x: F) -> F {
        match self.mode {
            MathMode::Standard => F::ONE / x,
            _ => x.recip_approx(self.steps()),
        }
    }

    #[must_use]
    pub fn fdiv<F: Real>(self, a: F, b: F) -> F {
        match self.mode {
            MathMode::Standard => a / b,
            _ => a * b.recip_approx(self.steps()),
        }
    }

    #[must_use]
    pub fn sin<F: Real>(self, x: F) -> F {
        x.sin()
    }

    #[must_use]
    pub fn cos<F: Real>(self, x: F) -> F {
        x.cos()
    }

    /// Simultaneous sine and cosine.
    #[must_use]
    pub fn sincos<F: Real>(self, x: F) -> (F, F) {
        (x.sin(), x.cos())
    }

    #[must_use]
    pub fn tan<F: Real>(self, x: F) -> F {
        x.tan()
    }

    #[must_use]
    pub fn ln<F: Real>(self, x: F) -> F {
        x.ln()
    }

    #[must_use]
    pub fn exp<F: Real>(self, x: F) -> F {
        x.exp()
    }

    #[must_use]
    pub fn powr<F: Real>(self, x: F, y: F) -> F {
        x.powr(y)
    }
}

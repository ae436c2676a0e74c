// SPDX-License-Identifier: AGPL-3.0-only

//! Fixed-size vector and square-matrix library.
//!
//! One generic implementation instantiated for each scalar domain of the
//! kernel (signed integer, unsigned size, floating point), replacing the
//! device header's macro-expanded per-domain copies. Components are named
//! fields (`x, y, z, w`; `a11 .. a44` row-major) so layouts agree with the
//! host-side struct definitions; every type is `#[repr(C)]` and
//! `bytemuck::Pod` for direct buffer binding.
//!
//! All operations are pure value computations: results are returned, so
//! the device header's output-aliasing hazards do not exist here. Integer
//! domains inherit device arithmetic semantics (unsigned negation wraps).
//!
//! Float-only extras (`normalize`, `distance`, `mad`, tensor projection)
//! live in the `F: Real` impl blocks.

use crate::real::Real;
use serde::{Deserialize, Serialize};

/// Scalar component type of a vector/matrix domain.
///
/// Implemented for the kernel's three domains: the default signed integer
/// (`i32`/`i64`), the size type (`u32`/`u64`/`usize`) and the float type
/// (`f32`/`f64`).
pub trait Scalar:
    Copy
    + PartialEq
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + Send
    + Sync
    + 'static
{
    const ZERO: Self;

    /// Additive inverse. Wraps for unsigned domains, matching device
    /// two's-complement semantics.
    fn neg(self) -> Self;

    fn to_f64(self) -> f64;
}

macro_rules! impl_scalar_int {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            const ZERO: Self = 0;
            fn neg(self) -> Self { self.wrapping_neg() }
            fn to_f64(self) -> f64 { self as f64 }
        }
    )*};
}

macro_rules! impl_scalar_float {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            const ZERO: Self = 0.0;
            fn neg(self) -> Self { -self }
            fn to_f64(self) -> f64 { self as f64 }
        }
    )*};
}

impl_scalar_int!(i32, i64, u32, u64, usize);
impl_scalar_float!(f32, f64);

// ── Vector types ─────────────────────────────────────────────────────

/// 2D vector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2<T: Scalar> {
    pub x: T,
    pub y: T,
}

/// 3D vector. Positions and propagation directions use `Vec3<F>`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3<T: Scalar> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// 4D vector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec4<T: Scalar> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

unsafe impl<T: Scalar + bytemuck::Zeroable> bytemuck::Zeroable for Vec2<T> {}
unsafe impl<T: Scalar + bytemuck::Pod> bytemuck::Pod for Vec2<T> {}
unsafe impl<T: Scalar + bytemuck::Zeroable> bytemuck::Zeroable for Vec3<T> {}
unsafe impl<T: Scalar + bytemuck::Pod> bytemuck::Pod for Vec3<T> {}
unsafe impl<T: Scalar + bytemuck::Zeroable> bytemuck::Zeroable for Vec4<T> {}
unsafe impl<T: Scalar + bytemuck::Pod> bytemuck::Pod for Vec4<T> {}

impl<T: Scalar> Vec2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: T::ZERO, y: T::ZERO }
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// Reversed (negated) vector.
    #[must_use]
    pub fn reverse(self) -> Self {
        Self { x: self.x.neg(), y: self.y.neg() }
    }

    /// Euclidean length in the kernel float type.
    #[must_use]
    pub fn length_fp<F: Real>(&self) -> F {
        F::from_f64(self.dot(self).to_f64().sqrt())
    }
}

impl<T: Scalar> Vec3<T> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self { x: T::ZERO, y: T::ZERO, z: T::ZERO }
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        Self { x: self.x.neg(), y: self.y.neg(), z: self.z.neg() }
    }

    /// Cross product a x b. Unsigned domains wrap on underflow.
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[must_use]
    pub fn length_fp<F: Real>(&self) -> F {
        F::from_f64(self.dot(self).to_f64().sqrt())
    }
}

impl<T: Scalar> Vec4<T> {
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w }
    }

    pub fn zero() -> Self {
        Self { x: T::ZERO, y: T::ZERO, z: T::ZERO, w: T::ZERO }
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        Self {
            x: self.x.neg(),
            y: self.y.neg(),
            z: self.z.neg(),
            w: self.w.neg(),
        }
    }

    #[must_use]
    pub fn length_fp<F: Real>(&self) -> F {
        F::from_f64(self.dot(self).to_f64().sqrt())
    }
}

// ── Float-only vector operations ─────────────────────────────────────

impl<F: Real> Vec2<F> {
    /// Euclidean length.
    #[must_use]
    pub fn length(&self) -> F {
        self.dot(self).sqrt()
    }

    /// Unit-length copy. Zero-length input yields non-finite components
    /// (caller contract, as in the device kernel).
    #[must_use]
    pub fn normalized(&self) -> Self {
        let k = F::ONE / self.length();
        Self { x: self.x * k, y: self.y * k }
    }

    /// Normalize in place.
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Squared distance to `other`.
    #[must_use]
    pub fn distance2(&self, other: &Self) -> F {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> F {
        self.distance2(other).sqrt()
    }

    /// Multiply-add: `self + b*c`.
    #[must_use]
    pub fn mad(&self, b: &Self, c: F) -> Self {
        Self {
            x: self.x + b.x * c,
            y: self.y + b.y * c,
        }
    }

    /// Squared polar radius (dot with itself).
    #[must_use]
    pub fn r2(&self) -> F {
        self.dot(self)
    }
}

impl<F: Real> Vec3<F> {
    #[must_use]
    pub fn length(&self) -> F {
        self.dot(self).sqrt()
    }

    /// Unit-length copy. Zero-length input yields non-finite components
    /// (caller contract, as in the device kernel).
    #[must_use]
    pub fn normalized(&self) -> Self {
        let k = F::ONE / self.length();
        Self { x: self.x * k, y: self.y * k, z: self.z * k }
    }

    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    #[must_use]
    pub fn distance2(&self, other: &Self) -> F {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    #[must_use]
    pub fn distance(&self, other: &Self) -> F {
        self.distance2(other).sqrt()
    }

    /// Multiply-add: `self + b*c`.
    #[must_use]
    pub fn mad(&self, b: &Self, c: F) -> Self {
        Self {
            x: self.x + b.x * c,
            y: self.y + b.y * c,
            z: self.z + b.z * c,
        }
    }
}

impl<F: Real> Vec4<F> {
    #[must_use]
    pub fn length(&self) -> F {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub fn normalized(&self) -> Self {
        let k = F::ONE / self.length();
        Self {
            x: self.x * k,
            y: self.y * k,
            z: self.z * k,
            w: self.w * k,
        }
    }

    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    #[must_use]
    pub fn distance2(&self, other: &Self) -> F {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        let dw = self.w - other.w;
        dx * dx + dy * dy + dz * dz + dw * dw
    }

    #[must_use]
    pub fn distance(&self, other: &Self) -> F {
        self.distance2(other).sqrt()
    }

    #[must_use]
    pub fn mad(&self, b: &Self, c: F) -> Self {
        Self {
            x: self.x + b.x * c,
            y: self.y + b.y * c,
            z: self.z + b.z * c,
            w: self.w + b.w * c,
        }
    }
}

// ── Matrix types ─────────────────────────────────────────────────────

/// 2x2 matrix, row-major named fields.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat2<T: Scalar> {
    pub a11: T,
    pub a12: T,
    pub a21: T,
    pub a22: T,
}

/// 3x3 matrix, row-major named fields.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3<T: Scalar> {
    pub a11: T,
    pub a12: T,
    pub a13: T,
    pub a21: T,
    pub a22: T,
    pub a23: T,
    pub a31: T,
    pub a32: T,
    pub a33: T,
}

/// 4x4 matrix, row-major named fields.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4<T: Scalar> {
    pub a11: T,
    pub a12: T,
    pub a13: T,
    pub a14: T,
    pub a21: T,
    pub a22: T,
    pub a23: T,
    pub a24: T,
    pub a31: T,
    pub a32: T,
    pub a33: T,
    pub a34: T,
    pub a41: T,
    pub a42: T,
    pub a43: T,
    pub a44: T,
}

unsafe impl<T: Scalar + bytemuck::Zeroable> bytemuck::Zeroable for Mat2<T> {}
unsafe impl<T: Scalar + bytemuck::Pod> bytemuck::Pod for Mat2<T> {}
unsafe impl<T: Scalar + bytemuck::Zeroable> bytemuck::Zeroable for Mat3<T> {}
unsafe impl<T: Scalar + bytemuck::Pod> bytemuck::Pod for Mat3<T> {}
unsafe impl<T: Scalar + bytemuck::Zeroable> bytemuck::Zeroable for Mat4<T> {}
unsafe impl<T: Scalar + bytemuck::Pod> bytemuck::Pod for Mat4<T> {}

impl<T: Scalar> Mat2<T> {
    #[rustfmt::skip]
    pub const fn new(a11: T, a12: T, a21: T, a22: T) -> Self {
        Self { a11, a12, a21, a22 }
    }

    /// Linear map of a 2D vector.
    #[must_use]
    pub fn transform(&self, v: &Vec2<T>) -> Vec2<T> {
        Vec2 {
            x: self.a11 * v.x + self.a12 * v.y,
            y: self.a21 * v.x + self.a22 * v.y,
        }
    }

    /// Matrix product `self * other`.
    #[must_use]
    pub fn matmul(&self, other: &Self) -> Self {
        Self {
            a11: self.a11 * other.a11 + self.a12 * other.a21,
            a12: self.a11 * other.a12 + self.a12 * other.a22,
            a21: self.a21 * other.a11 + self.a22 * other.a21,
            a22: self.a21 * other.a12 + self.a22 * other.a22,
        }
    }
}

impl<T: Scalar> Mat3<T> {
    #[rustfmt::skip]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        a11: T, a12: T, a13: T,
        a21: T, a22: T, a23: T,
        a31: T, a32: T, a33: T,
    ) -> Self {
        Self { a11, a12, a13, a21, a22, a23, a31, a32, a33 }
    }

    /// Linear map of a 3D vector.
    #[must_use]
    pub fn transform(&self, v: &Vec3<T>) -> Vec3<T> {
        Vec3 {
            x: self.a11 * v.x + self.a12 * v.y + self.a13 * v.z,
            y: self.a21 * v.x + self.a22 * v.y + self.a23 * v.z,
            z: self.a31 * v.x + self.a32 * v.y + self.a33 * v.z,
        }
    }

    /// Only the z component of the transformed vector. The propagation
    /// loop uses this when deciding layer crossings.
    #[must_use]
    pub fn transform_z(&self, v: &Vec3<T>) -> T {
        self.a31 * v.x + self.a32 * v.y + self.a33 * v.z
    }

    /// Matrix product `self * other`.
    #[must_use]
    pub fn matmul(&self, other: &Self) -> Self {
        Self {
            a11: self.a11 * other.a11 + self.a12 * other.a21 + self.a13 * other.a31,
            a12: self.a11 * other.a12 + self.a12 * other.a22 + self.a13 * other.a32,
            a13: self.a11 * other.a13 + self.a12 * other.a23 + self.a13 * other.a33,
            a21: self.a21 * other.a11 + self.a22 * other.a21 + self.a23 * other.a31,
            a22: self.a21 * other.a12 + self.a22 * other.a22 + self.a23 * other.a32,
            a23: self.a21 * other.a13 + self.a22 * other.a23 + self.a23 * other.a33,
            a31: self.a31 * other.a11 + self.a32 * other.a21 + self.a33 * other.a31,
            a32: self.a31 * other.a12 + self.a32 * other.a22 + self.a33 * other.a32,
            a33: self.a31 * other.a13 + self.a32 * other.a23 + self.a33 * other.a33,
        }
    }
}

impl<F: Real> Mat3<F> {
    /// Identity matrix.
    #[must_use]
    pub fn identity() -> Self {
        let (o, z) = (F::ONE, F::ZERO);
        Self::new(o, z, z, z, o, z, z, z, o)
    }

    /// Project a 3x3 tensor along a direction: `p * T * p'`.
    #[must_use]
    pub fn project(&self, p: &Vec3<F>) -> F {
        p.x * (self.a11 * p.x + self.a12 * p.y + self.a13 * p.z)
            + p.y * (self.a21 * p.x + self.a22 * p.y + self.a23 * p.z)
            + p.z * (self.a31 * p.x + self.a32 * p.y + self.a33 * p.z)
    }
}

impl<T: Scalar> Mat4<T> {
    #[rustfmt::skip]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        a11: T, a12: T, a13: T, a14: T,
        a21: T, a22: T, a23: T, a24: T,
        a31: T, a32: T, a33: T, a34: T,
        a41: T, a42: T, a43: T, a44: T,
    ) -> Self {
        Self {
            a11, a12, a13, a14,
            a21, a22, a23, a24,
            a31, a32, a33, a34,
            a41, a42, a43, a44,
        }
    }

    /// Linear map of a 4D vector.
    #[must_use]
    pub fn transform(&self, v: &Vec4<T>) -> Vec4<T> {
        Vec4 {
            x: self.a11 * v.x + self.a12 * v.y + self.a13 * v.z + self.a14 * v.w,
            y: self.a21 * v.x + self.a22 * v.y + self.a23 * v.z + self.a24 * v.w,
            z: self.a31 * v.x + self.a32 * v.y + self.a33 * v.z + self.a34 * v.w,
            w: self.a41 * v.x + self.a42 * v.y + self.a43 * v.z + self.a44 * v.w,
        }
    }

    /// Matrix product `self * other`.
    #[must_use]
    pub fn matmul(&self, other: &Self) -> Self {
        let a = self;
        let b = other;
        Self {
            a11: a.a11 * b.a11 + a.a12 * b.a21 + a.a13 * b.a31 + a.a14 * b.a41,
            a12: a.a11 * b.a12 + a.a12 * b.a22 + a.a13 * b.a32 + a.a14 * b.a42,
            a13: a.a11 * b.a13 + a.a12 * b.a23 + a.a13 * b.a33 + a.a14 * b.a43,
            a14: a.a11 * b.a14 + a.a12 * b.a24 + a.a13 * b.a34 + a.a14 * b.a44,
            a21: a.a21 * b.a11 + a.a22 * b.a21 + a.a23 * b.a31 + a.a24 * b.a41,
            a22: a.a21 * b.a12 + a.a22 * b.a22 + a.a23 * b.a32 + a.a24 * b.a42,
            a23: a.a21 * b.a13 + a.a22 * b.a23 + a.a23 * b.a33 + a.a24 * b.a43,
            a24: a.a21 * b.a14 + a.a22 * b.a24 + a.a23 * b.a34 + a.a24 * b.a44,
            a31: a.a31 * b.a11 + a.a32 * b.a21 + a.a33 * b.a31 + a.a34 * b.a41,
            a32: a.a31 * b.a12 + a.a32 * b.a22 + a.a33 * b.a32 + a.a34 * b.a42,
            a33: a.a31 * b.a13 + a.a32 * b.a23 + a.a33 * b.a33 + a.a34 * b.a43,
            a34: a.a31 * b.a14 + a.a32 * b.a24 + a.a33 * b.a34 + a.a34 * b.a44,
            a41: a.a41 * b.a11 + a.a42 * b.a21 + a.a43 * b.a31 + a.a44 * b.a41,
            a42: a.a41 * b.a12 + a.a42 * b.a22 + a.a43 * b.a32 + a.a44 * b.a42,
            a43: a.a41 * b.a13 + a.a42 * b.a23 + a.a43 * b.a33 + a.a44 * b.a43,
            a44: a.a41 * b.a14 + a.a42 * b.a24 + a.a43 * b.a34 + a.a44 * b.a44,
        }
    }
}

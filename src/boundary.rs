// SPDX-License-Identifier: AGPL-3.0-only

//! Boundary-crossing optics: critical angle, Fresnel reflectance and
//! reflect/refract direction updates.
//!
//! Error handling is sentinel-based (no branches beyond the physics):
//! the unchecked refraction entry points produce non-finite components
//! when the beam is beyond the critical angle, and [`refract_safe`]
//! instead reports the condition and leaves its output untouched. The
//! reflectance entry points clamp to [0, 1] and return exactly 1.0 for
//! total internal reflection.

use crate::real::{Math, Real};
use crate::vector::Vec3;

/// Cosine of the critical incidence angle for the boundary n1 => n2.
///
/// Returns `sqrt(1 - (n2/n1)^2)` when `n1 > n2`; otherwise -1, a value
/// no real incidence cosine can drop below, so "no critical angle"
/// propagates through [`reflectance`] without a special case.
#[must_use]
pub fn cos_critical<F: Real>(n1: F, n2: F, m: Math) -> F {
    if n1 > n2 {
        let r = m.fdiv(n2, n1);
        m.sqrt((F::ONE - r * r).max(F::ZERO))
    } else {
        -F::ONE
    }
}

/// Unpolarized Fresnel reflectance for incidence cosine `cos1` at the
/// boundary n1 => n2.
///
/// `cos_critical` must come from [`cos_critical`] for the same pair of
/// indices; incidence beyond the critical angle returns exactly 1.0.
/// The sign of `cos1` is ignored.
#[must_use]
pub fn reflectance<F: Real>(n1: F, n2: F, cos1: F, cos_critical: F) -> F {
    let cos1 = cos1.abs().min(F::ONE);
    if cos1 < cos_critical {
        return F::ONE;
    }
    if n1 == n2 {
        return F::ZERO;
    }
    fresnel(n1, n2, cos1, (F::ONE - cos1 * cos1).max(F::ZERO))
}

/// Fresnel reflectance taking the squared incidence cosine directly.
///
/// Same output domain and total-internal-reflection edge case as
/// [`reflectance`]; saves a square root at call sites that already hold
/// the square.
#[must_use]
pub fn reflectance_cos2<F: Real>(n1: F, n2: F, cos1_squared: F) -> F {
    let cos1_squared = cos1_squared.clamp(F::ZERO, F::ONE);
    if n1 == n2 {
        return F::ZERO;
    }
    let sin1_squared = F::ONE - cos1_squared;
    let kn = n1 / n2;
    if kn * kn * sin1_squared >= F::ONE {
        return F::ONE;
    }
    fresnel(n1, n2, cos1_squared.sqrt(), sin1_squared)
}

/// Two-term (s and p polarization averaged) Fresnel amplitude formula.
/// `sin1_squared` must equal `1 - cos1^2`; the transmission cosine comes
/// from Snell's law.
fn fresnel<F: Real>(n1: F, n2: F, cos1: F, sin1_squared: F) -> F {
    let kn = n1 / n2;
    let sin2_squared = kn * kn * sin1_squared;
    if sin2_squared >= F::ONE {
        return F::ONE;
    }
    let cos2 = (F::ONE - sin2_squared).sqrt();

    let rs = (n1 * cos1 - n2 * cos2) / (n1 * cos1 + n2 * cos2);
    let rp = (n1 * cos2 - n2 * cos1) / (n1 * cos2 + n2 * cos1);
    (F::HALF * (rs * rs + rp * rp)).clamp(F::ZERO, F::ONE)
}

/// Reflected propagation direction: `p - 2*n*dot(p, n)`.
///
/// The normal may point outwards or inwards. Unit-length inputs give a
/// unit-length result.
#[must_use]
pub fn reflect<F: Real>(p: &Vec3<F>, n: &Vec3<F>) -> Vec3<F> {
    let k = F::TWO * p.dot(n);
    Vec3 {
        x: p.x - k * n.x,
        y: p.y - k * n.y,
        z: p.z - k * n.z,
    }
}

/// Refracted propagation direction from the explicitly supplied signed
/// incidence cosine (`cos1 == dot(n, p)`; the sign resolves the normal
/// orientation).
///
/// Beyond the critical angle the result has non-finite components;
/// callers must test [`reflectance`] or use [`refract_safe`] first.
#[must_use]
pub fn refract_cos1<F: Real>(
    p: &Vec3<F>,
    n: &Vec3<F>,
    n1: F,
    n2: F,
    cos1: F,
    m: Math,
) -> Vec3<F> {
    let kn = m.fdiv(n1, n2);
    let sin2_squared = kn * kn * (F::ONE - cos1 * cos1);
    // k = copysign(cos2, cos1) - kn*cos1; r = kn*p + k*n
    let k = m.sqrt(F::ONE - sin2_squared).copysign(cos1) - kn * cos1;
    Vec3 {
        x: kn * p.x + k * n.x,
        y: kn * p.y + k * n.y,
        z: kn * p.z + k * n.z,
    }
}

/// Refracted propagation direction; computes the incidence cosine
/// internally. Same non-finite hazard as [`refract_cos1`].
#[must_use]
pub fn refract<F: Real>(p: &Vec3<F>, n: &Vec3<F>, n1: F, n2: F, m: Math) -> Vec3<F> {
    refract_cos1(p, n, n1, n2, n.dot(p), m)
}

/// Guarded refraction.
///
/// Writes the refracted direction into `r` and returns `false` when the
/// beam refracts; returns `true` (beam is reflected) and leaves `r`
/// untouched when the incidence is beyond the critical angle.
#[must_use]
pub fn refract_safe<F: Real>(
    p: &Vec3<F>,
    n: &Vec3<F>,
    n1: F,
    n2: F,
    m: Math,
    r: &mut Vec3<F>,
) -> bool {
    let cos1 = n.dot(p);
    let kn = m.fdiv(n1, n2);
    let sin2_squared = kn * kn * (F::ONE - cos1 * cos1);
    if sin2_squared >= F::ONE {
        return true;
    }
    *r = refract_cos1(p, n, n1, n2, cos1, m);
    false
}

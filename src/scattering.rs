// SPDX-License-Identifier: AGPL-3.0-only

//! Propagation-direction update after a scattering event.
//!
//! Standard spherical re-basing of the unit propagation vector by a
//! sampled polar cosine and azimuth. The azimuthal basis degenerates
//! when the current direction is nearly parallel to the z axis, so that
//! case takes the stabilized branch instead of dividing by a vanishing
//! `sqrt(1 - pz^2)`. The result is renormalized to suppress drift over
//! the millions of updates a long-lived packet accumulates.

use crate::real::{Math, Real};
use crate::vector::Vec3;

/// Rotate the unit direction `dir` in place by the polar angle with
/// cosine `cos_theta` and the azimuth `fi` (radians).
///
/// `dir` must be unit length on entry; `cos_theta` must lie in [-1, 1].
pub fn update_direction<F: Real>(dir: &mut Vec3<F>, cos_theta: F, fi: F, m: Math) {
    let (sin_fi, cos_fi) = m.sincos(fi);
    let sin_theta = m.sqrt((F::ONE - cos_theta * cos_theta).max(F::ZERO));

    let px = dir.x;
    let py = dir.y;
    let pz = dir.z;

    if F::ONE - pz.abs() <= F::EPS {
        // Near-vertical incidence: the azimuthal basis is arbitrary.
        dir.x = sin_theta * cos_fi;
        dir.y = sin_theta * sin_fi;
        dir.z = cos_theta.copysign(pz);
    } else {
        let k = m.rsqrt(F::ONE - pz * pz);
        dir.x = sin_theta * (px * pz * cos_fi - py * sin_fi) * k + px * cos_theta;
        dir.y = sin_theta * (py * pz * cos_fi + px * sin_fi) * k + py * cos_theta;
        dir.z = -sin_theta * cos_fi * (F::ONE - pz * pz) * k + pz * cos_theta;
    }
    dir.normalize();
}

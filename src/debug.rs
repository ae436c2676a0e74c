// SPDX-License-Identifier: AGPL-3.0-only

//! Conditional debug printing.
//!
//! The device kernel compiles its debug print statements to nothing
//! unless debugging is enabled. The host rendition keeps the call sites
//! unconditional and routes them through a [`DebugLog`] handle that is
//! inert when disabled, so the hot loop carries a single predictable
//! branch per print site.

use crate::lut::LinearLut;
use crate::real::Real;
use crate::vector::{Vec2, Vec3};

/// Debug print handle, constructed once from the kernel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebugLog {
    enabled: bool,
}

impl DebugLog {
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    #[must_use]
    pub const fn enabled(self) -> bool {
        self.enabled
    }

    pub fn message(self, label: &str) {
        if self.enabled {
            println!("{label}");
        }
    }

    pub fn float<F: Real>(self, label: &str, value: F) {
        if self.enabled {
            println!("{label}: {value:.6}");
        }
    }

    pub fn int(self, label: &str, value: i64) {
        if self.enabled {
            println!("{label}: {value}");
        }
    }

    pub fn uint(self, label: &str, value: u64) {
        if self.enabled {
            println!("{label}: {value}");
        }
    }

    pub fn point2<F: Real>(self, label: &str, value: &Vec2<F>) {
        if self.enabled {
            println!("{label}: ({:.6}, {:.6})", value.x, value.y);
        }
    }

    pub fn point3<F: Real>(self, label: &str, value: &Vec3<F>) {
        if self.enabled {
            println!("{label}: ({:.6}, {:.6}, {:.6})", value.x, value.y, value.z);
        }
    }

    pub fn lut<F: Real>(self, label: &str, lut: &LinearLut<F>) {
        if self.enabled {
            println!(
                "{label}: (first={:.6}, inv_span={:.6}, n={}, offset={})",
                lut.first, lut.inv_span, lut.n, lut.offset
            );
        }
    }
}

// SPDX-License-Identifier: AGPL-3.0-only

//! 2D geometry primitives for detector and source apertures.
//!
//! Immutable descriptors constructed once on the host side and queried
//! with point-containment tests inside the kernel. All types are
//! `#[repr(C)]` + `Pod` so they can be written straight into device
//! parameter buffers, and serde-serializable for job-submission records.

use crate::real::Real;
use crate::vector::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle<F: Real> {
    /// Coordinates of the top-left corner.
    pub top_left: Vec2<F>,
    pub width: F,
    pub height: F,
}

/// Circle described by center and radius.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle<F: Real> {
    pub center: Vec2<F>,
    pub radius: F,
}

/// Slot (stadium) aperture: a rectangle body with semicircular end caps
/// along its longer axis. Degenerates to a plain axis-aligned rectangle
/// when `width <= height` (and symmetrically for tall slots).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot<F: Real> {
    pub center: Vec2<F>,
    pub width: F,
    pub height: F,
}

unsafe impl<F: Real + bytemuck::Zeroable> bytemuck::Zeroable for Rectangle<F> {}
unsafe impl<F: Real + bytemuck::Pod> bytemuck::Pod for Rectangle<F> {}
unsafe impl<F: Real + bytemuck::Zeroable> bytemuck::Zeroable for Circle<F> {}
unsafe impl<F: Real + bytemuck::Pod> bytemuck::Pod for Circle<F> {}
unsafe impl<F: Real + bytemuck::Zeroable> bytemuck::Zeroable for Slot<F> {}
unsafe impl<F: Real + bytemuck::Pod> bytemuck::Pod for Slot<F> {}

impl<F: Real> Rectangle<F> {
    pub const fn new(top_left: Vec2<F>, width: F, height: F) -> Self {
        Self { top_left, width, height }
    }

    /// Half-open containment: `[x0, x0+w) x [y0, y0+h)`.
    #[must_use]
    pub fn contains(&self, x: F, y: F) -> bool {
        x >= self.top_left.x
            && x < self.top_left.x + self.width
            && y >= self.top_left.y
            && y < self.top_left.y + self.height
    }
}

impl<F: Real> Circle<F> {
    pub const fn new(center: Vec2<F>, radius: F) -> Self {
        Self { center, radius }
    }

    /// Closed containment by squared distance to the center.
    #[must_use]
    pub fn contains(&self, x: F, y: F) -> bool {
        let dx = x - self.center.x;
        let dy = y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

impl<F: Real> Slot<F> {
    pub const fn new(center: Vec2<F>, width: F, height: F) -> Self {
        Self { center, width, height }
    }

    /// Stadium containment. The caps are semicircles of radius equal to
    /// half the shorter side, centered at the ends of the body rectangle;
    /// `width == height` reduces to the rectangle test.
    #[must_use]
    pub fn contains(&self, x: F, y: F) -> bool {
        let dx = (x - self.center.x).abs();
        let dy = (y - self.center.y).abs();
        let half_w = self.width * F::HALF;
        let half_h = self.height * F::HALF;

        if self.width > self.height {
            // Horizontal stadium: body half-length plus round caps.
            let body = half_w - half_h;
            if dx <= body {
                return dy <= half_h;
            }
            let cx = dx - body;
            cx * cx + dy * dy <= half_h * half_h
        } else if self.height > self.width {
            let body = half_h - half_w;
            if dy <= body {
                return dx <= half_w;
            }
            let cy = dy - body;
            dx * dx + cy * cy <= half_w * half_w
        } else {
            dx <= half_w && dy <= half_h
        }
    }
}

// SPDX-License-Identifier: AGPL-3.0-only

//! Immutable kernel configuration.
//!
//! The device kernel is configured entirely through compile-time switches
//! (precision, integer widths, fast-math, software atomics, event tracking).
//! The host-side rendition collects those switches into one validated,
//! immutable struct built once per kernel launch. Conditional code paths
//! become a one-time strategy selection (`MathMode`, `AtomicsMode`), never
//! re-checked inside the per-packet loop.
//!
//! Width selectors (`IntWidth`, `AccumulatorWidth`, ...) drive host-side
//! buffer allocation and layout agreement; the geometry library itself is
//! generic and is instantiated with the matching scalar type.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Floating-point precision of all geometry and physics arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Precision {
    /// 32-bit floats. The default; fastest on consumer devices.
    #[default]
    Single,
    /// 64-bit floats. Requires device support; significantly slower.
    Double,
}

/// Math-function strategy.
///
/// Selects between standard-accuracy implementations and faster,
/// less accurate approximations. Switching the mode never changes a
/// call site; only the dispatch inside [`crate::real::Math`] changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MathMode {
    /// Standard-accuracy implementations.
    #[default]
    Standard,
    /// Device "native" approximations (two refinement steps on the CPU
    /// reference path). Generally accurate to a few ulp in f32.
    Native,
    /// Half-precision-grade approximations (one refinement step).
    /// May be insufficiently accurate; intended for throughput probes.
    Half,
}

/// Atomic accumulator strategy for 64-bit deposits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AtomicsMode {
    /// Native 64-bit atomic add.
    #[default]
    Native,
    /// Software emulation from two 32-bit atomics with carry propagation.
    Software,
}

/// Width of the default signed/unsigned integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntWidth {
    #[default]
    W32,
    W64,
}

/// Width of one shared accumulator slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccumulatorWidth {
    W32,
    #[default]
    W64,
}

/// Stepping method of the surrounding propagation loop.
///
/// Carried in the configuration for the external loop's benefit; the core
/// primitives are method-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Method {
    /// Albedo weighting (default).
    #[default]
    AlbedoWeight,
    /// Albedo rejection.
    AlbedoRejection,
    /// Microscopic Beer-Lambert.
    MicroscopicBeerLambert,
}

/// Capabilities advertised by the target device.
///
/// Advertisement of 64-bit atomics is not always a reliable signal of
/// correct support, hence the independent
/// [`KernelConfig::force_software_atomics`] override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCaps {
    /// Device supports 64-bit floating point.
    pub fp64: bool,
    /// Device advertises native 64-bit atomic operations.
    pub atomic64: bool,
}

impl DeviceCaps {
    /// Capabilities of the host CPU reference target (everything native).
    #[must_use]
    pub const fn host() -> Self {
        Self { fp64: true, atomic64: true }
    }
}

/// Immutable per-launch kernel configuration.
///
/// Build once, validate against the device, then share by reference with
/// every per-packet worker. All fields are plain data; serde derives let
/// the host job-submission layer persist and replay configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct KernelConfig {
    /// Floating-point precision of the whole compiled unit.
    pub precision: Precision,
    /// Math-function strategy.
    pub math_mode: MathMode,
    /// Default integer width.
    pub int_width: IntWidth,
    /// Size (address/index) width.
    pub size_width: IntWidth,
    /// Packet/event counter width.
    pub counter_width: IntWidth,
    /// Shared accumulator slot width.
    pub accumulator_width: AccumulatorWidth,
    /// Force the software 64-bit atomics even when the device advertises
    /// native support.
    pub force_software_atomics: bool,
    /// Track packet events in a 32-bit flag mask.
    pub use_events: bool,
    /// Enable conditional debug printing.
    pub enable_debug: bool,
    /// Enable the per-thread fluence accumulator cache.
    pub use_fluence_cache: bool,
    /// Stepping method of the external propagation loop.
    pub method: Method,
    /// Terminate low-weight packets by lottery.
    pub use_lottery: bool,
    /// Minimum packet weight before termination/lottery.
    pub weight_min: f64,
    /// Lottery survival chance.
    pub lottery_chance: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            precision: Precision::Single,
            math_mode: MathMode::Standard,
            int_width: IntWidth::W32,
            size_width: IntWidth::W32,
            counter_width: IntWidth::W32,
            accumulator_width: AccumulatorWidth::W64,
            force_software_atomics: false,
            use_events: false,
            enable_debug: false,
            use_fluence_cache: false,
            method: Method::AlbedoWeight,
            use_lottery: true,
            weight_min: 1.0e-4,
            lottery_chance: 0.1,
        }
    }
}

impl KernelConfig {
    /// Validate the configuration against the target device.
    ///
    /// Double precision without device support is a hard failure, exactly
    /// as the device build would refuse to compile.
    pub fn validate(&self, caps: &DeviceCaps) -> Result<(), CoreError> {
        if self.precision == Precision::Double && !caps.fp64 {
            return Err(CoreError::UnsupportedDoublePrecision);
        }
        if !(0.0..=1.0).contains(&self.lottery_chance) {
            return Err(CoreError::InvalidConfig(format!(
                "lottery_chance must be in [0, 1], got {}",
                self.lottery_chance
            )));
        }
        if !(0.0..1.0).contains(&self.weight_min) {
            return Err(CoreError::InvalidConfig(format!(
                "weight_min must be in [0, 1), got {}",
                self.weight_min
            )));
        }
        Ok(())
    }

    /// Resolve the atomic deposit strategy for the given device.
    ///
    /// Software emulation wins whenever it is forced or the device lacks
    /// native 64-bit atomics. 32-bit accumulators always use native adds.
    #[must_use]
    pub fn atomics_mode(&self, caps: &DeviceCaps) -> AtomicsMode {
        match self.accumulator_width {
            AccumulatorWidth::W32 => AtomicsMode::Native,
            AccumulatorWidth::W64 => {
                if self.force_software_atomics || !caps.atomic64 {
                    AtomicsMode::Software
                } else {
                    AtomicsMode::Native
                }
            }
        }
    }

    /// Math strategy selected by this configuration.
    #[must_use]
    pub const fn math(&self) -> crate::real::Math {
        crate::real::Math::new(self.math_mode)
    }

    /// Debug print handle selected by this configuration.
    #[must_use]
    pub const fn debug(&self) -> crate::debug::DebugLog {
        crate::debug::DebugLog::new(self.enable_debug)
    }

    /// Serialize to pretty JSON for job-submission records.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON produced by [`Self::to_json`].
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates_on_host() {
        let cfg = KernelConfig::default();
        assert!(cfg.validate(&DeviceCaps::host()).is_ok());
    }

    #[test]
    fn double_without_fp64_is_hard_failure() {
        let cfg = KernelConfig { precision: Precision::Double, ..Default::default() };
        let caps = DeviceCaps { fp64: false, atomic64: true };
        assert_eq!(
            cfg.validate(&caps),
            Err(CoreError::UnsupportedDoublePrecision)
        );
    }

    #[test]
    fn forced_software_atomics_overrides_advertisement() {
        let cfg = KernelConfig { force_software_atomics: true, ..Default::default() };
        assert_eq!(cfg.atomics_mode(&DeviceCaps::host()), AtomicsMode::Software);
    }

    #[test]
    fn missing_atomic64_falls_back_to_software() {
        let cfg = KernelConfig::default();
        let caps = DeviceCaps { fp64: true, atomic64: false };
        assert_eq!(cfg.atomics_mode(&caps), AtomicsMode::Software);
    }

    #[test]
    fn narrow_accumulators_never_need_emulation() {
        let cfg = KernelConfig {
            accumulator_width: AccumulatorWidth::W32,
            force_software_atomics: true,
            ..Default::default()
        };
        assert_eq!(cfg.atomics_mode(&DeviceCaps::host()), AtomicsMode::Native);
    }

    #[test]
    fn lottery_chance_out_of_range_rejected() {
        let cfg = KernelConfig { lottery_chance: 1.5, ..Default::default() };
        assert!(matches!(
            cfg.validate(&DeviceCaps::host()),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn strategy_handles_follow_config() {
        let cfg = KernelConfig {
            math_mode: MathMode::Native,
            enable_debug: true,
            ..Default::default()
        };
        assert_eq!(cfg.math().mode(), MathMode::Native);
        assert!(cfg.debug().enabled());
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let cfg = KernelConfig {
            precision: Precision::Double,
            math_mode: MathMode::Native,
            force_software_atomics: true,
            ..Default::default()
        };
        let json = cfg.to_json().expect("serialize");
        let back = KernelConfig::from_json(&json).expect("deserialize");
        assert_eq!(cfg, back);
    }
}

// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for kernel configuration and buffer descriptor validation.
//!
//! The numeric core itself is error-free by design (sentinel returns and
//! caller contracts, see the module docs of `boundary` and `lut`). Errors
//! exist only at the configuration boundary, where the original device
//! kernel would have failed at compile time. A proper enum lets callers
//! pattern-match on failure modes rather than parsing opaque strings.

use std::fmt;

/// Errors arising from kernel configuration or descriptor validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Double precision requested but the target device does not support it.
    ///
    /// The device kernel treats this as a hard build failure; the host-side
    /// rendition surfaces it before any buffer is allocated.
    UnsupportedDoublePrecision,

    /// A configuration field combination is invalid (message names the field).
    InvalidConfig(String),

    /// A lookup-table descriptor does not fit its shared buffer, or is too
    /// short for linear interpolation (`n < 2`).
    LutDescriptor {
        /// Element count declared by the descriptor.
        n: usize,
        /// Index of the first element in the shared buffer.
        offset: usize,
        /// Length of the shared buffer the descriptor addresses.
        buffer_len: usize,
    },

    /// An accumulator offset is outside the shared accumulator buffer.
    AccumulatorBounds {
        /// Offending offset.
        offset: usize,
        /// Number of accumulator slots.
        len: usize,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDoublePrecision => {
                write!(f, "Double precision not supported by the target device")
            }
            Self::InvalidConfig(msg) => write!(f, "Invalid kernel configuration: {msg}"),
            Self::LutDescriptor { n, offset, buffer_len } => write!(
                f,
                "Lookup table descriptor (n={n}, offset={offset}) does not fit \
                 buffer of length {buffer_len} or has fewer than 2 elements"
            ),
            Self::AccumulatorBounds { offset, len } => {
                write!(f, "Accumulator offset {offset} out of bounds (len={len})")
            }
        }
    }
}

impl std::error::Error for CoreError {}

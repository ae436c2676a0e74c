// SPDX-License-Identifier: AGPL-3.0-only

//! Packet event flags.
//!
//! Optional instrumentation: when enabled by the kernel configuration,
//! the propagation loop records each interaction in a per-packet 32-bit
//! bitmask. The mask travels with the packet and is cleared at launch.

/// Bitmask of events recorded over one packet lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventFlags(pub u32);

impl EventFlags {
    /// Packet was reflected at a boundary.
    pub const BOUNDARY_REFLECTION: u32 = 1;
    /// Packet was refracted across a boundary.
    pub const BOUNDARY_REFRACTION: u32 = 2;
    /// Packet hit a boundary.
    pub const BOUNDARY_HIT: u32 = 4;
    /// Packet was launched.
    pub const PACKET_LAUNCH: u32 = 8;
    /// Packet weight was absorbed.
    pub const PACKET_ABSORPTION: u32 = 16;
    /// Packet was scattered.
    pub const PACKET_SCATTERING: u32 = 32;
    /// Packet was terminated.
    pub const PACKET_TERMINATED: u32 = 64;
    /// Packet escaped the simulation domain.
    pub const PACKET_ESCAPED: u32 = 128;

    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Record one or more events.
    pub fn mark(&mut self, flags: u32) {
        self.0 |= flags;
    }

    /// True if all of the given events were recorded.
    #[must_use]
    pub const fn contains(self, flags: u32) -> bool {
        self.0 & flags == flags
    }

    /// Clear all recorded events, done once per launch.
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

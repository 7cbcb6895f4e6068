//! Linux bridge port numbering.

use crate::ParseError;
use std::fmt;

/// Number of bits the kernel uses for a bridge port number.
pub const BR_PORT_BITS: u32 = 10;

/// Maximum number of ports on a single bridge.
pub const BR_MAX_PORTS: usize = 1 << BR_PORT_BITS;

/// Index of a port on a Linux bridge, always below [`BR_MAX_PORTS`].
///
/// Kernel forwarding records carry the number split into a low byte
/// (`port_no`) and a high byte (`port_hi`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortIndex(u16);

impl PortIndex {
    /// Creates a port index, rejecting values outside the 10-bit range.
    pub fn new(value: u32) -> Result<Self, ParseError> {
        if (value as usize) < BR_MAX_PORTS {
            Ok(PortIndex(value as u16))
        } else {
            Err(ParseError::InvalidPortIndex(value))
        }
    }

    /// Reassembles the wire value `low | (high << 8)` without range checks.
    pub const fn join(low: u8, high: u8) -> u16 {
        low as u16 | ((high as u16) << 8)
    }

    /// Reassembles and validates a split port number.
    pub fn from_split(low: u8, high: u8) -> Result<Self, ParseError> {
        Self::new(u32::from(Self::join(low, high)))
    }

    /// Returns the index as a table position.
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PortIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

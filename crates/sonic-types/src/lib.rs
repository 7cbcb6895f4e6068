//! Common SONiC types for bridge and interface introspection.
//!
//! This crate provides type-safe representations of the network primitives
//! shared by the bridge tooling:
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`IfName`]: kernel interface names bounded by `IFNAMSIZ`
//! - [`PortIndex`]: Linux bridge port numbers (10 bits)

mod ifname;
mod mac;
mod port;

pub use ifname::{IfName, IFNAMSIZ};
pub use mac::MacAddress;
pub use port::{PortIndex, BR_MAX_PORTS, BR_PORT_BITS};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid interface name '{name}': {reason}")]
    InvalidIfName { name: String, reason: &'static str },

    #[error("invalid bridge port index: {0} (must be below {max})", max = BR_MAX_PORTS)]
    InvalidPortIndex(u32),
}

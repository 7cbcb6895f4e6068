//! Kernel forwarding database record decoding
//!
//! Both the `BRCTL_GET_FDB_ENTRIES` ioctl and the `brforward` sysfs file
//! hand out arrays of `struct __fdb_entry` from `<linux/if_bridge.h>`:
//!
//! ```text
//! offset  size  field
//!      0     6  mac_addr
//!      6     1  port_no            (low byte of the port number)
//!      7     1  is_local
//!      8     4  ageing_timer_value (native endian, clock ticks)
//!     12     1  port_hi            (high byte of the port number)
//!     13     1  pad0
//!     14     2  unused
//! ```

use crate::port_table::PortTable;
use sonic_types::{MacAddress, BR_MAX_PORTS};
use tracing::debug;

/// One raw `__fdb_entry` as laid out by the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFdbEntry {
    pub mac: MacAddress,
    pub port_no: u8,
    pub is_local: u8,
    pub ageing_timer_value: u32,
    pub port_hi: u8,
}

impl RawFdbEntry {
    /// Size of `struct __fdb_entry` in bytes
    pub const SIZE: usize = 16;

    /// Decodes one record; `buf` must be exactly [`RawFdbEntry::SIZE`] bytes
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let buf: &[u8; Self::SIZE] = buf.try_into().ok()?;
        Some(Self {
            mac: MacAddress::from_slice(&buf[0..6])?,
            port_no: buf[6],
            is_local: buf[7],
            ageing_timer_value: u32::from_ne_bytes([buf[8], buf[9], buf[10], buf[11]]),
            port_hi: buf[12],
        })
    }

    /// Encodes the record in kernel layout, padding zeroed
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..6].copy_from_slice(self.mac.as_bytes());
        buf[6] = self.port_no;
        buf[7] = self.is_local;
        buf[8..12].copy_from_slice(&self.ageing_timer_value.to_ne_bytes());
        buf[12] = self.port_hi;
        buf
    }

    /// Reassembled port number; not range checked
    pub fn port(&self) -> u16 {
        sonic_types::PortIndex::join(self.port_no, self.port_hi)
    }

    /// Resolves the port number against `ports` into an output record
    pub fn resolve<'a>(&self, ports: &'a PortTable) -> FdbRecord<'a> {
        let port = usize::from(self.port());
        if port >= BR_MAX_PORTS {
            debug!(mac = %self.mac, port, "FDB entry port number out of range");
        }
        FdbRecord {
            mac: self.mac,
            ifname: ports.name_or_empty(port),
            age: self.ageing_timer_value,
            is_local: self.is_local != 0,
        }
    }
}

/// A decoded forwarding entry ready for output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdbRecord<'a> {
    pub mac: MacAddress,
    /// Resolved port name, empty when the port is unknown
    pub ifname: &'a str,
    pub age: u32,
    pub is_local: bool,
}

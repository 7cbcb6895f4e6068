//! Forwarding table acquisition backends
//!
//! An [`Acquirer`] first resolves bridge port numbers to interface names,
//! then streams raw forwarding records, resolving each against that table
//! and handing it to an [`EntrySink`]. Two backends exist:
//!
//! - [`IoctlAcquirer`]: legacy `SIOCDEVPRIVATE` bridge ioctls
//! - [`SysfsBridge`]: `brif/*/port_no` and the `brforward` binary file

mod ioctl;
mod sysfs;

pub use ioctl::{BridgeControl, IoctlAcquirer, FDB_PAGE_ENTRIES};
#[cfg(target_os = "linux")]
pub use ioctl::BridgeSocket;
pub use sysfs::{parse_port_number, SysfsBridge};

use crate::config::Config;
use crate::error::Result;
use crate::port_table::PortTable;
use crate::sink::EntrySink;
use clap::ValueEnum;
use sonic_types::IfName;
use std::path::Path;
use tracing::{debug, warn};

/// Source of one bridge's forwarding table
pub trait Acquirer {
    /// Short backend name for diagnostics
    fn name(&self) -> &'static str;

    /// Builds the port number to interface name table
    fn resolve_ports(&mut self) -> Result<PortTable>;

    /// Decodes every forwarding entry in kernel order, pushing each to `sink`.
    ///
    /// Returns the number of entries emitted. Entries already pushed stay
    /// pushed when an error aborts the stream.
    fn stream_entries(&mut self, ports: &PortTable, sink: &mut dyn EntrySink) -> Result<usize>;

    /// Resolves ports, then streams entries against the fresh table
    fn fetch(&mut self, sink: &mut dyn EntrySink) -> Result<usize> {
        let ports = self.resolve_ports()?;
        if ports.is_empty() {
            warn!(backend = self.name(), "bridge has no resolvable ports");
        } else {
            debug!(backend = self.name(), ports = ports.len(), "resolved bridge ports");
        }
        self.stream_entries(&ports, sink)
    }
}

/// Acquisition backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// sysfs when the bridge exports `brforward`, ioctl otherwise
    #[default]
    Auto,
    /// Legacy bridge ioctls over a raw packet socket
    Ioctl,
    /// `/sys/class/net/<bridge>/{brif,brforward}`
    Sysfs,
}

impl Backend {
    /// Settles `Auto` by probing for the bridge's sysfs export
    pub fn resolve(self, sysfs_root: &Path, bridge: &IfName) -> Backend {
        match self {
            Backend::Auto if SysfsBridge::new(sysfs_root, bridge.clone()).is_available() => {
                Backend::Sysfs
            }
            Backend::Auto => Backend::Ioctl,
            explicit => explicit,
        }
    }
}

/// Opens the backend chosen by `config` for its bridge.
///
/// The bridge name is validated first; an invalid name fails with a usage
/// error before anything is opened.
pub fn open_acquirer(config: &Config) -> Result<Box<dyn Acquirer>> {
    let bridge = config.bridge()?;
    let backend = config.backend.resolve(&config.sysfs_root, &bridge);
    debug!(%bridge, ?backend, "selected acquisition backend");

    match backend {
        Backend::Sysfs => Ok(Box::new(SysfsBridge::new(&config.sysfs_root, bridge))),
        _ => open_ioctl(bridge),
    }
}

#[cfg(target_os = "linux")]
fn open_ioctl(bridge: IfName) -> Result<Box<dyn Acquirer>> {
    let socket = BridgeSocket::open(&bridge)?;
    Ok(Box::new(IoctlAcquirer::new(bridge, socket)))
}

#[cfg(not(target_os = "linux"))]
fn open_ioctl(_bridge: IfName) -> Result<Box<dyn Acquirer>> {
    Err(crate::error::FdbError::Socket(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "bridge ioctls are only available on Linux",
    )))
}

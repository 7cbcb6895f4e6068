//! Legacy bridge ioctl backend
//!
//! Port names come from `BRCTL_GET_PORT_LIST` followed by one
//! `if_indextoname` lookup per attached interface. Forwarding entries are
//! paged out with `BRCTL_GET_FDB_ENTRIES`, [`FDB_PAGE_ENTRIES`] at a time.

use super::Acquirer;
use crate::error::{FdbError, Result};
use crate::fdb::RawFdbEntry;
use crate::port_table::PortTable;
use crate::sink::EntrySink;
use sonic_types::{IfName, PortIndex, BR_MAX_PORTS};
use std::io;
use tracing::{debug, warn};

/// Entries requested per `BRCTL_GET_FDB_ENTRIES` call
pub const FDB_PAGE_ENTRIES: usize = 10;

/// Kernel control calls used by the ioctl backend
#[cfg_attr(test, mockall::automock)]
pub trait BridgeControl {
    /// Fills `slots` with the interface index attached at each port number.
    ///
    /// Unused ports read as 0. Returns the number of slots the kernel filled.
    fn port_ifindices(&mut self, slots: &mut [i32]) -> io::Result<usize>;

    /// Translates an interface index into its name
    fn ifindex_to_name(&mut self, ifindex: i32) -> io::Result<IfName>;

    /// Copies up to `buf.len() / RawFdbEntry::SIZE` records starting at
    /// entry `offset` into `buf`, returning how many were written.
    fn fdb_entries(&mut self, buf: &mut [u8], offset: usize) -> io::Result<usize>;
}

/// [`Acquirer`] driving a [`BridgeControl`]
#[derive(Debug)]
pub struct IoctlAcquirer<C> {
    bridge: IfName,
    control: C,
}

impl<C: BridgeControl> IoctlAcquirer<C> {
    pub fn new(bridge: IfName, control: C) -> Self {
        Self { bridge, control }
    }

    pub fn into_control(self) -> C {
        self.control
    }
}

impl<C: BridgeControl> Acquirer for IoctlAcquirer<C> {
    fn name(&self) -> &'static str {
        "ioctl"
    }

    fn resolve_ports(&mut self) -> Result<PortTable> {
        let mut slots = vec![0i32; BR_MAX_PORTS];
        let filled = self
            .control
            .port_ifindices(&mut slots)
            .map_err(|source| FdbError::PortList {
                bridge: self.bridge.to_string(),
                source,
            })?
            .min(slots.len());

        // The slot position is the bridge port number, not the ifindex.
        let mut table = PortTable::new();
        for (position, &ifindex) in slots[..filled].iter().enumerate() {
            if ifindex == 0 {
                continue;
            }
            let Some(port) = u32::try_from(position)
                .ok()
                .and_then(|p| PortIndex::new(p).ok())
            else {
                warn!(bridge = %self.bridge, position, "port slot beyond bridge port range");
                continue;
            };
            match self.control.ifindex_to_name(ifindex) {
                Ok(name) => {
                    table.insert(port, name);
                }
                Err(e) => warn!(
                    bridge = %self.bridge,
                    %port,
                    ifindex,
                    error = %e,
                    "if_indextoname failed, leaving port unresolved"
                ),
            }
        }

        Ok(table)
    }

    fn stream_entries(&mut self, ports: &PortTable, sink: &mut dyn EntrySink) -> Result<usize> {
        let mut page = [0u8; FDB_PAGE_ENTRIES * RawFdbEntry::SIZE];
        let mut offset = 0;
        let mut emitted = 0;

        // A full page may be followed by more; the first short page
        // (possibly empty) is the last.
        loop {
            let count = self
                .control
                .fdb_entries(&mut page, offset)
                .map_err(|source| FdbError::FdbQuery {
                    bridge: self.bridge.to_string(),
                    offset,
                    source,
                })?;
            if count > FDB_PAGE_ENTRIES {
                return Err(FdbError::PageOverflow {
                    returned: count,
                    capacity: FDB_PAGE_ENTRIES,
                });
            }
            debug!(bridge = %self.bridge, offset, count, "fetched FDB page");

            for entry in page[..count * RawFdbEntry::SIZE]
                .chunks_exact(RawFdbEntry::SIZE)
                .filter_map(RawFdbEntry::decode)
            {
                sink.accept(&entry.resolve(ports))?;
                emitted += 1;
            }

            if count < FDB_PAGE_ENTRIES {
                break;
            }
            offset += FDB_PAGE_ENTRIES;
        }

        Ok(emitted)
    }
}

#[cfg(target_os = "linux")]
mod kernel {
    use super::BridgeControl;
    use crate::error::{FdbError, Result};
    use crate::fdb::RawFdbEntry;
    use libc::{c_char, c_ulong, c_void};
    use nix::sys::socket::{socket, AddressFamily, SockFlag, SockProtocol, SockType};
    use sonic_types::{IfName, IFNAMSIZ};
    use std::io;
    use std::os::fd::{AsRawFd, OwnedFd};

    const SIOCDEVPRIVATE: u32 = 0x89f0;
    const BRCTL_GET_PORT_LIST: c_ulong = 6;
    const BRCTL_GET_FDB_ENTRIES: c_ulong = 18;

    /// `struct ifreq` carrying `ifr_data`
    #[repr(C)]
    pub struct BridgeIfReq {
        ifr_name: [c_char; IFNAMSIZ],
        ifr_data: *mut c_void,
        _pad: [u8; 24 - std::mem::size_of::<*mut c_void>()],
    }

    nix::ioctl_readwrite_bad!(bridge_dev_private, SIOCDEVPRIVATE, BridgeIfReq);

    /// Raw packet socket addressed at one bridge; closed on drop
    #[derive(Debug)]
    pub struct BridgeSocket {
        fd: OwnedFd,
        name: [c_char; IFNAMSIZ],
    }

    impl BridgeSocket {
        pub fn open(bridge: &IfName) -> Result<Self> {
            let fd = socket(
                AddressFamily::Packet,
                SockType::Raw,
                SockFlag::SOCK_CLOEXEC,
                SockProtocol::EthAll,
            )
            .map_err(|e| FdbError::Socket(io::Error::from(e)))?;

            let mut name = [0 as c_char; IFNAMSIZ];
            for (dst, src) in name.iter_mut().zip(bridge.to_c_bytes()) {
                *dst = src as c_char;
            }
            Ok(Self { fd, name })
        }

        /// Issues a `SIOCDEVPRIVATE` bridge command with a 4-word argument block
        fn dev_private(&mut self, args: &mut [c_ulong; 4]) -> io::Result<usize> {
            let mut ifr = BridgeIfReq {
                ifr_name: self.name,
                ifr_data: args.as_mut_ptr().cast(),
                _pad: [0; 24 - std::mem::size_of::<*mut c_void>()],
            };
            // SAFETY: `ifr` and the buffers referenced from `args` outlive the call.
            let ret = unsafe { bridge_dev_private(self.fd.as_raw_fd(), &mut ifr) }
                .map_err(io::Error::from)?;
            usize::try_from(ret)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "negative entry count"))
        }
    }

    impl BridgeControl for BridgeSocket {
        fn port_ifindices(&mut self, slots: &mut [i32]) -> io::Result<usize> {
            let mut args = [
                BRCTL_GET_PORT_LIST,
                slots.as_mut_ptr() as c_ulong,
                slots.len() as c_ulong,
                0,
            ];
            self.dev_private(&mut args)
        }

        fn ifindex_to_name(&mut self, ifindex: i32) -> io::Result<IfName> {
            let index = u32::try_from(ifindex)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "negative ifindex"))?;
            let name = nix::net::if_::if_indextoname(index).map_err(io::Error::from)?;
            IfName::from_c_bytes(name.as_bytes())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        }

        fn fdb_entries(&mut self, buf: &mut [u8], offset: usize) -> io::Result<usize> {
            let mut args = [
                BRCTL_GET_FDB_ENTRIES,
                buf.as_mut_ptr() as c_ulong,
                (buf.len() / RawFdbEntry::SIZE) as c_ulong,
                offset as c_ulong,
            ];
            self.dev_private(&mut args)
        }
    }
}

#[cfg(target_os = "linux")]
pub use kernel::BridgeSocket;

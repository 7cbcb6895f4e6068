//! sysfs backend
//!
//! Layout under the network class directory (normally `/sys/class/net`):
//!
//! ```text
//! <bridge>/brif/<port>/port_no   text integer, e.g. "0x1\n"
//! <bridge>/brforward             packed struct __fdb_entry records
//! ```

use super::Acquirer;
use crate::error::{FdbError, Result};
use crate::fdb::RawFdbEntry;
use crate::port_table::PortTable;
use crate::sink::EntrySink;
use sonic_types::{IfName, PortIndex};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Parses an unsigned integer with C `strtoul(.., 0)` prefixes.
///
/// `0x`/`0X` selects hex, a leading `0` selects octal, anything else is
/// decimal. Surrounding whitespace is ignored; any other stray character
/// fails the parse.
pub fn parse_port_number(text: &str) -> Option<u64> {
    let s = text.trim();
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

/// Reads one bridge's ports and forwarding table from sysfs
#[derive(Debug, Clone)]
pub struct SysfsBridge {
    root: PathBuf,
    bridge: IfName,
}

impl SysfsBridge {
    pub fn new(root: impl Into<PathBuf>, bridge: IfName) -> Self {
        Self {
            root: root.into(),
            bridge,
        }
    }

    /// Directory holding one entry per attached port
    pub fn ports_dir(&self) -> PathBuf {
        self.root.join(self.bridge.as_str()).join("brif")
    }

    /// Binary forwarding table file
    pub fn forward_path(&self) -> PathBuf {
        self.root.join(self.bridge.as_str()).join("brforward")
    }

    /// True when the bridge exports its forwarding table here
    pub fn is_available(&self) -> bool {
        self.forward_path().exists()
    }

    fn read_port_number(path: &Path) -> Result<u64> {
        let text = fs::read_to_string(path).map_err(|source| FdbError::ReadPortNumber {
            path: path.to_path_buf(),
            source,
        })?;
        parse_port_number(&text).ok_or_else(|| FdbError::PortNumber {
            path: path.to_path_buf(),
            value: text.trim().to_string(),
        })
    }
}

impl Acquirer for SysfsBridge {
    fn name(&self) -> &'static str {
        "sysfs"
    }

    fn resolve_ports(&mut self) -> Result<PortTable> {
        let dir = self.ports_dir();
        let open_err = |source: io::Error| FdbError::OpenDir {
            path: dir.clone(),
            source,
        };

        let mut table = PortTable::new();
        for entry in fs::read_dir(&dir).map_err(open_err)? {
            let entry = entry.map_err(open_err)?;
            let file_name = entry.file_name();
            let name: IfName = match file_name.to_str().map(str::parse::<IfName>) {
                Some(Ok(name)) => name,
                _ => {
                    warn!(dir = %dir.display(), entry = ?file_name, "skipping port with invalid interface name");
                    continue;
                }
            };

            let port_no = Self::read_port_number(&entry.path().join("port_no"))?;
            let Some(port) = u32::try_from(port_no)
                .ok()
                .and_then(|p| PortIndex::new(p).ok())
            else {
                warn!(port = %name, port_no, "invalid port_no, skipping");
                continue;
            };

            table.insert(port, name);
        }

        Ok(table)
    }

    fn stream_entries(&mut self, ports: &PortTable, sink: &mut dyn EntrySink) -> Result<usize> {
        let path = self.forward_path();
        let file = File::open(&path).map_err(|source| FdbError::OpenForward {
            path: path.clone(),
            source,
        })?;
        drain_records(file, &path, ports, sink)
    }
}

/// Reads `struct __fdb_entry` records one per `read` until end of stream.
///
/// A zero-length read ends the stream cleanly; a partial record is a
/// [`FdbError::ShortRead`].
pub(crate) fn drain_records<R: Read>(
    mut reader: R,
    path: &Path,
    ports: &PortTable,
    sink: &mut dyn EntrySink,
) -> Result<usize> {
    let mut buf = [0u8; RawFdbEntry::SIZE];
    let mut emitted = 0;

    loop {
        let len = match reader.read(&mut buf) {
            Ok(len) => len,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(FdbError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        match len {
            0 => break,
            RawFdbEntry::SIZE => {
                if let Some(entry) = RawFdbEntry::decode(&buf) {
                    sink.accept(&entry.resolve(ports))?;
                    emitted += 1;
                }
            }
            len => {
                return Err(FdbError::ShortRead {
                    path: path.to_path_buf(),
                    len,
                    expected: RawFdbEntry::SIZE,
                })
            }
        }
    }

    debug!(path = %path.display(), emitted, "drained forwarding table");
    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdb::FdbRecord;
    use pretty_assertions::assert_eq;
    use sonic_types::MacAddress;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Collect(Vec<String>);

    impl EntrySink for Collect {
        fn accept(&mut self, record: &FdbRecord<'_>) -> Result<()> {
            self.0.push(format!("{} {}", record.mac, record.ifname));
            Ok(())
        }
    }

    /// Replays scripted `read` results
    struct Script(VecDeque<io::Result<Vec<u8>>>);

    impl Read for Script {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                None => Ok(0),
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Err(e)) => Err(e),
            }
        }
    }

    fn record(last: u8) -> Vec<u8> {
        RawFdbEntry {
            mac: MacAddress::new([0x02, 0, 0, 0, 0, last]),
            port_no: 0,
            is_local: 0,
            ageing_timer_value: 0,
            port_hi: 0,
        }
        .encode()
        .to_vec()
    }

    fn ports() -> PortTable {
        let mut table = PortTable::new();
        table.insert(PortIndex::new(0).unwrap(), "eth0".parse().unwrap());
        table
    }

    #[test]
    fn test_parse_port_number_prefixes() {
        assert_eq!(parse_port_number("0x1\n"), Some(1));
        assert_eq!(parse_port_number("0X3ff"), Some(1023));
        assert_eq!(parse_port_number("17"), Some(17));
        assert_eq!(parse_port_number("010"), Some(8));
        assert_eq!(parse_port_number("0"), Some(0));
        assert_eq!(parse_port_number("  42  "), Some(42));
    }

    #[test]
    fn test_parse_port_number_rejects_garbage() {
        assert_eq!(parse_port_number(""), None);
        assert_eq!(parse_port_number("0x"), None);
        assert_eq!(parse_port_number("eth0"), None);
        assert_eq!(parse_port_number("12abc"), None);
        assert_eq!(parse_port_number("09"), None);
        assert_eq!(parse_port_number("+5"), None);
        assert_eq!(parse_port_number("-1"), None);
    }

    #[test]
    fn test_drain_clean_end_of_stream() {
        let reader = Script(VecDeque::from(vec![Ok(record(1)), Ok(record(2))]));
        let mut sink = Collect::default();
        let emitted = drain_records(reader, Path::new("brforward"), &ports(), &mut sink).unwrap();
        assert_eq!(emitted, 2);
        assert_eq!(sink.0, vec!["02:00:00:00:00:01 eth0", "02:00:00:00:00:02 eth0"]);
    }

    #[test]
    fn test_drain_short_read_is_error() {
        let reader = Script(VecDeque::from(vec![Ok(record(1)), Ok(vec![0u8; 5])]));
        let mut sink = Collect::default();
        let err = drain_records(reader, Path::new("brforward"), &ports(), &mut sink).unwrap_err();
        assert!(matches!(err, FdbError::ShortRead { len: 5, expected: 16, .. }));
        assert_eq!(sink.0.len(), 1);
    }

    #[test]
    fn test_drain_read_error_aborts() {
        let reader = Script(VecDeque::from(vec![
            Ok(record(1)),
            Err(io::Error::from_raw_os_error(5)),
            Ok(record(2)),
        ]));
        let mut sink = Collect::default();
        let err = drain_records(reader, Path::new("brforward"), &ports(), &mut sink).unwrap_err();
        assert!(matches!(err, FdbError::Read { .. }));
        assert_eq!(sink.0.len(), 1);
    }

    #[test]
    fn test_drain_retries_interrupted_read() {
        let reader = Script(VecDeque::from(vec![
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            Ok(record(9)),
        ]));
        let mut sink = Collect::default();
        assert_eq!(
            drain_records(reader, Path::new("brforward"), &ports(), &mut sink).unwrap(),
            1
        );
    }

    #[test]
    fn test_missing_ports_dir_is_setup_error() {
        let root = tempfile::tempdir().unwrap();
        let mut bridge = SysfsBridge::new(root.path(), "br0".parse().unwrap());
        let err = bridge.resolve_ports().unwrap_err();
        assert!(err.is_setup());
    }

    #[test]
    fn test_malformed_port_no_aborts_resolution() {
        let root = tempfile::tempdir().unwrap();
        let port_dir = root.path().join("br0/brif/eth0");
        fs::create_dir_all(&port_dir).unwrap();
        fs::write(port_dir.join("port_no"), "bogus\n").unwrap();

        let mut bridge = SysfsBridge::new(root.path(), "br0".parse().unwrap());
        let err = bridge.resolve_ports().unwrap_err();
        assert!(matches!(err, FdbError::PortNumber { ref value, .. } if value == "bogus"));
    }

    #[test]
    fn test_out_of_range_port_no_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        for (name, port_no) in [("eth0", "0x1"), ("eth9", "0x400")] {
            let dir = root.path().join("br0/brif").join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("port_no"), format!("{port_no}\n")).unwrap();
        }

        let mut bridge = SysfsBridge::new(root.path(), "br0".parse().unwrap());
        let table = bridge.resolve_ports().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.name_or_empty(1), "eth0");
    }
}

//! Output sinks for decoded forwarding entries
//!
//! The text sink streams one line per entry as entries are decoded. The JSON
//! sink accumulates a single object keyed by MAC address and writes it once
//! the stream has been drained.

use crate::error::Result;
use crate::fdb::FdbRecord;
use serde::Serialize;
use sonic_types::MacAddress;
use std::collections::BTreeMap;
use std::io::Write;

/// Default field delimiter for text output
pub const DEFAULT_DELIMITER: &str = "\t";

/// Consumer of decoded forwarding entries
pub trait EntrySink {
    /// Accepts one decoded entry
    fn accept(&mut self, record: &FdbRecord<'_>) -> Result<()>;

    /// Emits anything still buffered; called once after acquisition ends
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Line-oriented delimited text output
///
/// Fields are `mac, ifname, age, is_local` with `is_local` rendered as `0`/`1`.
#[derive(Debug)]
pub struct TextSink<W: Write> {
    writer: W,
    delimiter: String,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W, delimiter: impl Into<String>) -> Self {
        Self {
            writer,
            delimiter: delimiter.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EntrySink for TextSink<W> {
    fn accept(&mut self, record: &FdbRecord<'_>) -> Result<()> {
        let d = &self.delimiter;
        writeln!(
            self.writer,
            "{}{d}{}{d}{}{d}{}",
            record.mac,
            record.ifname,
            record.age,
            u8::from(record.is_local)
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Value stored per MAC address in JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonEntry {
    pub ifname: String,
    pub age: u32,
    pub local: bool,
}

/// Buffers entries into one JSON object keyed by MAC address
///
/// A repeated MAC address overwrites the earlier entry.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
    entries: BTreeMap<MacAddress, JsonEntry>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entries: BTreeMap::new(),
        }
    }

    /// Entries accumulated so far
    pub fn entries(&self) -> &BTreeMap<MacAddress, JsonEntry> {
        &self.entries
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EntrySink for JsonSink<W> {
    fn accept(&mut self, record: &FdbRecord<'_>) -> Result<()> {
        self.entries.insert(
            record.mac,
            JsonEntry {
                ifname: record.ifname.to_string(),
                age: record.age,
                local: record.is_local,
            },
        );
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &self.entries)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(ifname: &str, age: u32, is_local: bool) -> FdbRecord<'_> {
        FdbRecord {
            mac: MacAddress::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]),
            ifname,
            age,
            is_local,
        }
    }

    #[test]
    fn test_text_sink_custom_delimiter() {
        let mut sink = TextSink::new(Vec::new(), ",");
        sink.accept(&record("eth1", 12, false)).unwrap();
        sink.finish().unwrap();
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "aa:bb:cc:dd:ee:ff,eth1,12,0\n"
        );
    }

    #[test]
    fn test_text_sink_default_delimiter_and_local_flag() {
        let mut sink = TextSink::new(Vec::new(), DEFAULT_DELIMITER);
        sink.accept(&record("", 0, true)).unwrap();
        sink.accept(&record("eth0", 7, false)).unwrap();
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "aa:bb:cc:dd:ee:ff\t\t0\t1\naa:bb:cc:dd:ee:ff\teth0\t7\t0\n"
        );
    }

    #[test]
    fn test_json_sink_single_entry() {
        let mut sink = JsonSink::new(Vec::new());
        sink.accept(&record("eth1", 12, false)).unwrap();
        sink.finish().unwrap();
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "{\"aa:bb:cc:dd:ee:ff\":{\"ifname\":\"eth1\",\"age\":12,\"local\":false}}\n"
        );
    }

    #[test]
    fn test_json_sink_last_write_wins() {
        let mut sink = JsonSink::new(Vec::new());
        sink.accept(&record("eth0", 1, false)).unwrap();
        sink.accept(&record("eth2", 5, true)).unwrap();

        assert_eq!(sink.entries().len(), 1);
        assert_eq!(
            sink.entries()[&MacAddress::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff])],
            JsonEntry {
                ifname: "eth2".to_string(),
                age: 5,
                local: true,
            }
        );
    }

    #[test]
    fn test_json_sink_writes_nothing_until_finish() {
        let mut sink = JsonSink::new(Vec::new());
        sink.accept(&record("eth0", 1, false)).unwrap();
        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn test_json_sink_keys_by_mac_string() {
        let mut sink = JsonSink::new(Vec::new());
        sink.accept(&record("eth0", 7, false)).unwrap();
        sink.finish().unwrap();
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "{\"aa:bb:cc:dd:ee:ff\":{\"ifname\":\"eth0\",\"age\":7,\"local\":false}}\n"
        );
    }

    #[test]
    fn test_json_sink_empty_object() {
        let mut sink = JsonSink::new(Vec::new());
        sink.finish().unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "{}\n");
    }
}

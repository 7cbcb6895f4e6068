//! Bridge MAC Table Reporter
//!
//! Lists the forwarding database of a Linux software bridge: which MAC
//! addresses are reachable through which attached port, how long each entry
//! has aged, and whether the address is local to the host.
//!
//! The table is read either through the legacy bridge ioctls or through
//! sysfs, port numbers are resolved to interface names, and every entry is
//! written as delimited text or collected into one JSON object.

pub mod acquirer;
pub mod config;
pub mod error;
pub mod fdb;
pub mod port_table;
pub mod sink;

pub use acquirer::{open_acquirer, Acquirer, Backend, BridgeControl, IoctlAcquirer, SysfsBridge};
pub use config::{Config, OutputFormat};
pub use error::*;
pub use fdb::{FdbRecord, RawFdbEntry};
pub use port_table::PortTable;
pub use sink::{EntrySink, JsonSink, TextSink};

use std::io::Write;

/// Exit status for invalid arguments
pub const EXIT_USAGE: u8 = 255;

/// Exit status when acquisition or output failed
pub const EXIT_FAILURE: u8 = 1;

/// Maps the outcome of a run to the process exit status
pub fn exit_status(outcome: &Result<usize>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(e) if e.is_usage() => EXIT_USAGE,
        Err(_) => EXIT_FAILURE,
    }
}

/// Runs `acquirer` into a sink for `format` writing to `out`.
///
/// The sink is finalized even when acquisition fails, so whatever was
/// gathered before the failure is still written. Returns the number of
/// entries emitted, or the acquisition error.
pub fn report<W: Write>(
    acquirer: &mut dyn Acquirer,
    format: &OutputFormat,
    out: W,
) -> Result<usize> {
    match format {
        OutputFormat::Text { delimiter } => {
            drain(acquirer, &mut TextSink::new(out, delimiter.as_str()))
        }
        OutputFormat::Json => drain(acquirer, &mut JsonSink::new(out)),
    }
}

fn drain(acquirer: &mut dyn Acquirer, sink: &mut dyn EntrySink) -> Result<usize> {
    let fetched = acquirer.fetch(sink);
    let finished = sink.finish();
    let count = fetched?;
    finished?;
    Ok(count)
}

//! Error types for brmactable

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while acquiring or reporting a bridge forwarding table
#[derive(Debug, Error)]
pub enum FdbError {
    /// Bridge name rejected before any system call
    #[error("Invalid bridge name: {0}")]
    InvalidBridgeName(#[from] sonic_types::ParseError),

    /// Control socket could not be opened
    #[error("Failed to open bridge control socket: {0}")]
    Socket(#[source] io::Error),

    /// Kernel rejected the port list query
    #[error("Failed to list ports of bridge '{bridge}': {source}")]
    PortList {
        bridge: String,
        #[source]
        source: io::Error,
    },

    /// Attached-ports directory could not be opened or listed
    #[error("Failed to read port directory {}: {source}", path.display())]
    OpenDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A port number attribute could not be read
    #[error("Failed to read {}: {source}", path.display())]
    ReadPortNumber {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A port number attribute did not contain an unsigned integer
    #[error("Error parsing port number '{value}' from {}", path.display())]
    PortNumber { path: PathBuf, value: String },

    /// Forwarding table pseudo-file could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    OpenForward {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A paged forwarding table query failed
    #[error("Failed to fetch FDB entries of '{bridge}' at offset {offset}: {source}")]
    FdbQuery {
        bridge: String,
        offset: usize,
        #[source]
        source: io::Error,
    },

    /// Kernel reported more entries than the page can hold
    #[error("FDB page overflow: kernel returned {returned} entries for a page of {capacity}")]
    PageOverflow { returned: usize, capacity: usize },

    /// Reading the forwarding table pseudo-file failed
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Forwarding table stream ended inside a record
    #[error("Short read from {} ({len} of {expected} bytes)", path.display())]
    ShortRead {
        path: PathBuf,
        len: usize,
        expected: usize,
    },

    /// Writing a record to the output failed
    #[error("Output error: {0}")]
    Output(#[from] io::Error),

    /// Serializing JSON output failed
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FdbError {
    /// True for errors detected before any I/O was attempted
    pub fn is_usage(&self) -> bool {
        matches!(self, FdbError::InvalidBridgeName(_))
    }

    /// True for errors that prevented the acquisition from starting
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            FdbError::Socket(_)
                | FdbError::PortList { .. }
                | FdbError::OpenDir { .. }
                | FdbError::OpenForward { .. }
        )
    }
}

/// Result type for brmactable operations
pub type Result<T> = std::result::Result<T, FdbError>;

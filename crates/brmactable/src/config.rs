//! Command line and environment configuration
//!
//! Every option can also be set through the `BRMT_*` environment variables
//! the tool has always honoured.

use crate::acquirer::Backend;
use crate::error::Result;
use crate::sink::DEFAULT_DELIMITER;
use clap::Parser;
use sonic_types::IfName;
use std::path::PathBuf;

/// Default location of per-device network sysfs entries
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/net";

/// Report the forwarding database (MAC table) of a Linux bridge
#[derive(Debug, Clone, Parser)]
#[command(name = "brmactable", version, about)]
pub struct Config {
    /// Bridge device name
    #[arg(value_name = "DEVNAME")]
    pub bridge: String,

    /// Print one JSON object keyed by MAC address (any non-empty value enables it)
    #[arg(
        long,
        env = "BRMT_JSON",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "1",
        value_name = "ANY"
    )]
    pub json: Option<String>,

    /// Field delimiter for text output [default: TAB]
    #[arg(
        long = "delim",
        env = "BRMT_DELIM",
        default_value = DEFAULT_DELIMITER,
        hide_default_value = true,
        allow_hyphen_values = true
    )]
    pub delimiter: String,

    /// Acquisition backend
    #[arg(long, env = "BRMT_BACKEND", value_enum, default_value_t = Backend::Auto)]
    pub backend: Backend,

    /// Root of the network device sysfs hierarchy
    #[arg(long, env = "BRMT_SYSFS_ROOT", default_value = DEFAULT_SYSFS_ROOT)]
    pub sysfs_root: PathBuf,
}

/// How decoded entries are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// One delimited line per entry
    Text { delimiter: String },
    /// A single JSON object written after the stream is drained
    Json,
}

impl Config {
    /// Builds a config for `bridge` with every option at its default
    pub fn for_bridge(bridge: impl Into<String>) -> Self {
        Self {
            bridge: bridge.into(),
            json: None,
            delimiter: DEFAULT_DELIMITER.to_string(),
            backend: Backend::Auto,
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
        }
    }

    /// Validated bridge name; checked before any system call is made
    pub fn bridge(&self) -> Result<IfName> {
        Ok(self.bridge.parse()?)
    }

    pub fn json_enabled(&self) -> bool {
        self.json.as_deref().is_some_and(|v| !v.is_empty())
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json_enabled() {
            OutputFormat::Json
        } else {
            OutputFormat::Text {
                delimiter: self.delimiter.clone(),
            }
        }
    }
}

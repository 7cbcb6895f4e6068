//! Kernel interface names.

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

/// Size of the kernel's interface name buffer, terminator included.
pub const IFNAMSIZ: usize = 16;

/// A validated network interface name.
///
/// Follows the kernel's `dev_valid_name()` rules: non-empty, at most
/// `IFNAMSIZ - 1` bytes, not `.` or `..`, and free of `/`, `:`, NUL and
/// whitespace.
///
/// ```
/// use sonic_types::IfName;
///
/// let br: IfName = "br0".parse().unwrap();
/// assert_eq!(br.as_str(), "br0");
/// assert!("a-name-that-is-too-long".parse::<IfName>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IfName(String);

impl IfName {
    /// Longest accepted name in bytes.
    pub const MAX_LEN: usize = IFNAMSIZ - 1;

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes a NUL-padded kernel name buffer such as `ifr_name`.
    pub fn from_c_bytes(buf: &[u8]) -> Result<Self, ParseError> {
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        let name = std::str::from_utf8(&buf[..end]).map_err(|_| ParseError::InvalidIfName {
            name: String::from_utf8_lossy(&buf[..end]).into_owned(),
            reason: "not valid UTF-8",
        })?;
        name.parse()
    }

    /// Copies the name into a zeroed `IFNAMSIZ` buffer, always leaving
    /// room for the terminator.
    pub fn to_c_bytes(&self) -> [u8; IFNAMSIZ] {
        let mut buf = [0u8; IFNAMSIZ];
        buf[..self.0.len()].copy_from_slice(self.0.as_bytes());
        buf
    }
}

fn validate(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("empty");
    }
    if name.len() > IfName::MAX_LEN {
        return Err("longer than 15 bytes");
    }
    if name == "." || name == ".." {
        return Err("reserved name");
    }
    if name
        .chars()
        .any(|c| c == '/' || c == ':' || c == '\0' || c.is_whitespace())
    {
        return Err("contains '/', ':', NUL or whitespace");
    }
    Ok(())
}

impl FromStr for IfName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s).map_err(|reason| ParseError::InvalidIfName {
            name: s.to_string(),
            reason,
        })?;
        Ok(IfName(s.to_string()))
    }
}

impl fmt::Display for IfName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Bridge port number to interface name table

use sonic_types::{IfName, PortIndex, BR_MAX_PORTS};

/// Fixed-capacity map from bridge port number to attached interface name.
///
/// Every one of the [`BR_MAX_PORTS`] slots starts out unset. A table is
/// built fresh for each acquisition and only read afterwards.
#[derive(Debug, Clone)]
pub struct PortTable {
    slots: Box<[Option<IfName>]>,
}

impl PortTable {
    /// Creates a table with every slot unset
    pub fn new() -> Self {
        Self {
            slots: vec![None; BR_MAX_PORTS].into_boxed_slice(),
        }
    }

    /// Records `name` at `port`, returning the name it replaced
    pub fn insert(&mut self, port: PortIndex, name: IfName) -> Option<IfName> {
        self.slots[port.as_usize()].replace(name)
    }

    /// Looks up a slot by raw position; positions outside the table are unset
    pub fn get(&self, index: usize) -> Option<&IfName> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Name at `index`, or `""` when unresolved
    pub fn name_or_empty(&self, index: usize) -> &str {
        self.get(index).map(IfName::as_str).unwrap_or("")
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PortTable {
    fn default() -> Self {
        Self::new()
    }
}

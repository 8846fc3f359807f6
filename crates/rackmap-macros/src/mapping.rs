//! Macro mapping records and the per-rack multimap.

use std::collections::BTreeMap;

use serde::Serialize;

use rackmap_core::{Address, MacroIndex, ParameterDescriptor, ValueScale};

/// One binding from a rack macro to a nested device parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroMapping {
    /// Controlling macro.
    pub macro_index: MacroIndex,
    /// Address of the target device.
    pub target_address: Address,
    /// Parameter index on the target device.
    pub target_parameter_index: usize,
    /// Parameter name at the time of listing.
    pub target_parameter_name: String,
    /// Device name at the time of listing.
    pub target_device_name: String,
    /// Macro range to target range.
    pub scale: ValueScale,
}

/// A macro together with everything it drives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroSlot {
    /// Macro index.
    pub index: MacroIndex,
    /// The macro's own parameter on the rack.
    pub parameter: ParameterDescriptor,
    /// Bindings, possibly empty.
    pub mappings: Vec<MacroMapping>,
}

impl MacroSlot {
    /// True if at least one target is bound.
    pub fn is_mapped(&self) -> bool {
        !self.mappings.is_empty()
    }
}

/// Mappings of one rack keyed by macro index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroTable {
    by_macro: BTreeMap<MacroIndex, Vec<MacroMapping>>,
}

impl MacroTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping under its macro.
    pub fn insert(&mut self, mapping: MacroMapping) {
        self.by_macro
            .entry(mapping.macro_index)
            .or_default()
            .push(mapping);
    }

    /// Mappings of one macro.
    pub fn get(&self, macro_index: MacroIndex) -> &[MacroMapping] {
        self.by_macro
            .get(&macro_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of mappings.
    pub fn len(&self) -> usize {
        self.by_macro.values().map(Vec::len).sum()
    }

    /// True if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All mappings ordered by macro index.
    pub fn iter(&self) -> impl Iterator<Item = &MacroMapping> {
        self.by_macro.values().flatten()
    }
}

impl FromIterator<MacroMapping> for MacroTable {
    fn from_iter<I: IntoIterator<Item = MacroMapping>>(iter: I) -> Self {
        let mut table = Self::new();
        for mapping in iter {
            table.insert(mapping);
        }
        table
    }
}

//! Rack macro slot indices.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MacroError;

/// Number of macro controls on every rack.
pub const MACRO_COUNT: usize = 8;

/// Parameter index of macro 0 on a rack. Index 0 is the rack's on/off switch.
pub const MACRO_PARAMETER_OFFSET: usize = 1;

/// Validated macro index in `0..MACRO_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct MacroIndex(u8);

impl MacroIndex {
    /// Validates a raw macro index.
    pub fn new(index: usize) -> Result<Self, MacroError> {
        if index < MACRO_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(MacroError::InvalidMacroIndex { index })
        }
    }

    /// The index as `usize`.
    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Parameter index of this macro on its rack, assuming the default layout.
    #[inline]
    pub fn default_parameter_index(self) -> usize {
        MACRO_PARAMETER_OFFSET + self.get()
    }

    /// All eight macro indices in order.
    pub fn all() -> impl Iterator<Item = MacroIndex> {
        (0..MACRO_COUNT as u8).map(MacroIndex)
    }
}

impl TryFrom<usize> for MacroIndex {
    type Error = MacroError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        MacroIndex::new(index)
    }
}

impl From<MacroIndex> for usize {
    fn from(index: MacroIndex) -> Self {
        index.get()
    }
}

impl fmt::Display for MacroIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "macro {}", self.0)
    }
}

//! Normalized parameter view and parameter selectors.
//!
//! Hosts report parameters with whatever ranges and values they hold
//! internally. [`ParameterDescriptor`] is the engine-facing view: bounds are
//! ordered, the value sits inside them, and the index is the parameter's
//! position on its device.
//!
//! # Example
//!
//! ```rust
//! use rackmap_core::{ParameterDescriptor, RawParameter};
//!
//! let raw = RawParameter::new("Output Gain", 0.5, 0.0, 1.0);
//! let desc = ParameterDescriptor::from_raw(0, &raw);
//! assert_eq!(desc.name, "Output Gain");
//! assert!(desc.contains(0.8));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::RawParameter;
use crate::scale::ParamRange;

/// Normalized description of one device parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Position on the device, stable for the device's lifetime.
    pub index: usize,
    /// Display name. Not unique.
    pub name: String,
    /// Current value, within `[min, max]`.
    pub value: f32,
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
    /// False for parameters the host refuses to change.
    pub is_enabled: bool,
    /// True if the host restricts values to a discrete set.
    pub is_quantized: bool,
}

impl ParameterDescriptor {
    /// Builds a descriptor from a raw host parameter.
    ///
    /// Reversed bounds are swapped and the value is clamped into range.
    pub fn from_raw(index: usize, raw: &RawParameter) -> Self {
        let range = ParamRange::new(raw.min, raw.max);
        Self {
            index,
            name: raw.name.clone(),
            value: range.clamp(raw.value),
            min: range.min,
            max: range.max,
            is_enabled: raw.is_enabled,
            is_quantized: raw.is_quantized,
        }
    }

    /// The parameter's range.
    #[inline]
    pub fn range(&self) -> ParamRange {
        ParamRange::new(self.min, self.max)
    }

    /// True if `value` lies in `[min, max]`. NaN is never contained.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        self.range().contains(value)
    }
}

/// Selects a parameter by index or by exact, case-sensitive name.
///
/// Deserializes from either a JSON number or a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamSelector {
    /// Parameter index.
    Index(usize),
    /// Exact parameter name. Duplicate names resolve to the lowest index.
    Name(String),
}

impl ParamSelector {
    /// Position of the selected parameter among `names`, if any.
    pub fn position<'a, I>(&self, names: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self {
            ParamSelector::Index(i) => names.into_iter().nth(*i).map(|_| *i),
            ParamSelector::Name(wanted) => names.into_iter().position(|n| n == wanted),
        }
    }
}

impl From<usize> for ParamSelector {
    fn from(index: usize) -> Self {
        ParamSelector::Index(index)
    }
}

impl From<&str> for ParamSelector {
    fn from(name: &str) -> Self {
        ParamSelector::Name(name.to_string())
    }
}

impl From<String> for ParamSelector {
    fn from(name: String) -> Self {
        ParamSelector::Name(name)
    }
}

impl fmt::Display for ParamSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSelector::Index(i) => write!(f, "index {i}"),
            ParamSelector::Name(n) => write!(f, "'{n}'"),
        }
    }
}

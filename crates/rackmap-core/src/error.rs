//! Error taxonomy for device-tree addressing, parameters, macros and the host.
//!
//! Each category has its own enum so callers can match narrowly; [`RackError`]
//! wraps all four for code that crosses category boundaries. Messages always
//! carry the failing selector and the valid range.

use thiserror::Error;

use crate::address::Address;
use crate::classify::DeviceKind;
use crate::param::ParamSelector;

/// Failures while walking an [`Address`] through the device tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AddressError {
    /// Track index past the end of the set.
    #[error("track_index {index} invalid: set has {count} track(s)")]
    TrackNotFound {
        /// Requested track index.
        index: usize,
        /// Number of tracks in the set.
        count: usize,
    },

    /// Device index past the end of a track or chain.
    #[error("device_index {index} invalid: {container} has {count} device(s)")]
    DeviceNotFound {
        /// Requested device index.
        index: usize,
        /// Number of devices in the container.
        count: usize,
        /// Human-readable container description, e.g. `track 0`.
        container: String,
    },

    /// Chain index past the end of a rack.
    #[error("chain_index {index} invalid: rack has {count} chain(s)")]
    ChainNotFound {
        /// Requested chain index.
        index: usize,
        /// Number of chains in the rack.
        count: usize,
    },

    /// A chain step was applied to a device that is not a rack.
    #[error("device at {address} is not a rack (kind: {kind})")]
    NotARack {
        /// Address of the offending device.
        address: Address,
        /// Its actual kind.
        kind: DeviceKind,
    },

    /// Selector list with an odd length or fewer than two entries.
    #[error("malformed address: {len} selector(s), expected track, device and (chain, device) pairs")]
    Malformed {
        /// Number of selectors supplied.
        len: usize,
    },
}

/// Failures while reading or writing one parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// Selector matched no parameter.
    #[error("parameter {selector} not found: device has {count} parameter(s)")]
    ParameterNotFound {
        /// The selector that failed.
        selector: ParamSelector,
        /// Number of parameters on the device.
        count: usize,
    },

    /// Write outside the parameter's `[min, max]`.
    #[error("value {value} out of range for parameter {index} '{name}': expected [{min}, {max}]")]
    OutOfRange {
        /// Parameter index.
        index: usize,
        /// Parameter name.
        name: String,
        /// Rejected value.
        value: f32,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// Write to a disabled or non-automatable parameter.
    #[error("parameter {index} '{name}' is read-only")]
    ReadOnly {
        /// Parameter index.
        index: usize,
        /// Parameter name.
        name: String,
    },
}

/// Failures specific to rack macro mapping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MacroError {
    /// Macro index outside `0..=7`.
    #[error("macro_index {index} invalid: racks have 8 macros (0-7)")]
    InvalidMacroIndex {
        /// Requested macro index.
        index: usize,
    },

    /// Target address not nested inside the rack's own chains.
    #[error("target {target} is outside rack {rack}")]
    TargetOutsideRack {
        /// Rack address.
        rack: Address,
        /// Rejected target address.
        target: Address,
    },
}

/// Failures reported by the host itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// Host did not answer or is not connected.
    #[error("host unavailable: {reason}")]
    HostUnavailable {
        /// Why the host could not be reached.
        reason: String,
    },

    /// An object id no longer refers to a live object.
    #[error("stale handle: {what} no longer exists")]
    StaleHandle {
        /// Description of the vanished object.
        what: String,
    },

    /// The host refused a structural or mapping request.
    #[error("host rejected request: {reason}")]
    Rejected {
        /// Why the request was refused.
        reason: String,
    },
}

impl HostError {
    /// Create a host-unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        HostError::HostUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a stale-handle error.
    pub fn stale(what: impl Into<String>) -> Self {
        HostError::StaleHandle { what: what.into() }
    }

    /// Create a rejected-request error.
    pub fn rejected(reason: impl Into<String>) -> Self {
        HostError::Rejected {
            reason: reason.into(),
        }
    }
}

/// Umbrella error for every engine operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RackError {
    /// Address resolution failed.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Parameter lookup or write failed.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Macro precondition failed.
    #[error(transparent)]
    Macro(#[from] MacroError),

    /// The host reported a failure.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl RackError {
    /// Stable snake_case code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            RackError::Address(e) => match e {
                AddressError::TrackNotFound { .. } => "track_not_found",
                AddressError::DeviceNotFound { .. } => "device_not_found",
                AddressError::ChainNotFound { .. } => "chain_not_found",
                AddressError::NotARack { .. } => "not_a_rack",
                AddressError::Malformed { .. } => "malformed_address",
            },
            RackError::Parameter(e) => match e {
                ParameterError::ParameterNotFound { .. } => "parameter_not_found",
                ParameterError::OutOfRange { .. } => "out_of_range",
                ParameterError::ReadOnly { .. } => "read_only",
            },
            RackError::Macro(e) => match e {
                MacroError::InvalidMacroIndex { .. } => "invalid_macro_index",
                MacroError::TargetOutsideRack { .. } => "target_outside_rack",
            },
            RackError::Host(e) => match e {
                HostError::HostUnavailable { .. } => "host_unavailable",
                HostError::StaleHandle { .. } => "stale_handle",
                HostError::Rejected { .. } => "host_rejected",
            },
        }
    }
}

/// Result alias used across the engine.
pub type Result<T> = std::result::Result<T, RackError>;

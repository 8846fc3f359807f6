//! Interface to the host's live object model.
//!
//! [`LiveHost`] is everything the engine consumes from the DAW: track, device
//! and chain enumeration, device type introspection, parameter read/write,
//! and the host's native macro mapping mechanism. Objects are identified by
//! opaque ids ([`DeviceId`], [`ChainId`]) that stay valid until the object is
//! removed. After that every call on the id fails with
//! [`HostError::StaleHandle`].
//!
//! Positions (track index, device index, chain index) are *not* stable ids.
//! The resolver re-reads them on every request.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::DeviceRole;
use crate::error::HostError;
use crate::macro_slot::MacroIndex;

/// Result of a host call.
pub type HostResult<T> = Result<T, HostError>;

/// Host object id of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device #{}", self.0)
    }
}

/// Host object id of a rack chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain #{}", self.0)
    }
}

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    /// Audio track.
    #[default]
    Audio,
    /// MIDI track.
    Midi,
    /// Return track.
    Return,
}

/// Mixer-level view of a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Track name.
    pub name: String,
    /// Audio, MIDI or return.
    pub kind: TrackKind,
    /// Mute state.
    pub mute: bool,
    /// Solo state.
    pub solo: bool,
    /// Record-arm state.
    pub arm: bool,
    /// Mixer volume, host units.
    pub volume: f32,
    /// Mixer pan, `-1..=1`.
    pub pan: f32,
}

/// Device as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDevice {
    /// Object id.
    pub id: DeviceId,
    /// Display name.
    pub name: String,
    /// Host class name, input to [`classify`](crate::classify()).
    pub class_name: String,
    /// Signal-chain role.
    pub role: DeviceRole,
}

/// Rack chain as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChain {
    /// Object id.
    pub id: ChainId,
    /// Display name.
    pub name: String,
}

/// Parameter as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawParameter {
    /// Display name.
    pub name: String,
    /// Current value.
    pub value: f32,
    /// Lower bound as reported (may be reversed).
    pub min: f32,
    /// Upper bound as reported (may be reversed).
    pub max: f32,
    /// False if the host refuses writes.
    pub is_enabled: bool,
    /// True if values are restricted to a discrete set.
    pub is_quantized: bool,
    /// False if the host refuses automation and remote writes.
    pub is_automatable: bool,
}

impl RawParameter {
    /// Enabled, continuous, automatable parameter.
    pub fn new(name: impl Into<String>, value: f32, min: f32, max: f32) -> Self {
        Self {
            name: name.into(),
            value,
            min,
            max,
            is_enabled: true,
            is_quantized: false,
            is_automatable: true,
        }
    }

    /// True if the host accepts remote writes.
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.is_enabled && self.is_automatable
    }
}

/// One native macro binding on a rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawMacroMapping {
    /// Controlling macro.
    pub macro_index: MacroIndex,
    /// Target device inside the rack.
    pub target: DeviceId,
    /// Parameter index on the target device.
    pub parameter_index: usize,
}

/// The host object model as seen by the engine.
///
/// Calls are synchronous round trips. An unreachable host answers every call
/// with [`HostError::HostUnavailable`]. Positional arguments that are out of
/// range, and ids of removed objects, yield [`HostError::StaleHandle`];
/// callers check counts first to report the more specific address errors.
pub trait LiveHost {
    /// Number of tracks in the set.
    fn track_count(&self) -> HostResult<usize>;

    /// Mixer view of one track.
    fn track_info(&self, track: usize) -> HostResult<TrackInfo>;

    /// Ids of the devices on a track, in chain order.
    fn track_devices(&self, track: usize) -> HostResult<Vec<DeviceId>>;

    /// Type information for one device.
    fn device(&self, id: DeviceId) -> HostResult<RawDevice>;

    /// Chains of a rack, in order. Empty for anything that is not a rack.
    fn device_chains(&self, id: DeviceId) -> HostResult<Vec<ChainId>>;

    /// Chain information.
    fn chain(&self, id: ChainId) -> HostResult<RawChain>;

    /// Ids of the devices in a chain, in order.
    fn chain_devices(&self, id: ChainId) -> HostResult<Vec<DeviceId>>;

    /// Every parameter of a device, in index order.
    fn parameters(&self, id: DeviceId) -> HostResult<Vec<RawParameter>>;

    /// One parameter of a device, `None` if the index is past the end.
    fn parameter(&self, id: DeviceId, index: usize) -> HostResult<Option<RawParameter>> {
        Ok(self.parameters(id)?.into_iter().nth(index))
    }

    /// Writes a parameter value and returns the value the host stored.
    ///
    /// Quantized parameters are snapped by the host. Writing a rack macro
    /// propagates to every mapped target.
    fn write_parameter(&mut self, id: DeviceId, index: usize, value: f32) -> HostResult<f32>;

    /// Parameter index of a macro on a rack.
    fn macro_parameter_index(&self, _rack: DeviceId, macro_index: MacroIndex) -> usize {
        macro_index.default_parameter_index()
    }

    /// Native macro bindings of a rack.
    fn macro_mappings(&self, rack: DeviceId) -> HostResult<Vec<RawMacroMapping>>;

    /// Adds a native macro binding.
    fn add_macro_mapping(&mut self, rack: DeviceId, mapping: RawMacroMapping) -> HostResult<()>;

    /// Removes a native macro binding. Returns `false` if it did not exist.
    fn remove_macro_mapping(
        &mut self,
        rack: DeviceId,
        mapping: &RawMacroMapping,
    ) -> HostResult<bool>;
}

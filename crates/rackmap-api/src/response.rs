//! Response envelope and result payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rackmap_core::{Address, DeviceKind, ParamSelector, ParameterDescriptor, TrackKind};
use rackmap_macros::MacroMapping;

use crate::error::ApiError;

/// Response envelope.
///
/// `{"status": "success", "result": ...}` or
/// `{"status": "error", "message": ..., "code": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// The tool ran.
    Success {
        /// Tool-specific payload.
        result: Value,
    },
    /// The tool failed; nothing was changed.
    Error {
        /// Human-readable message with the failing selector and valid range.
        message: String,
        /// Stable snake_case code.
        code: String,
    },
}

impl Response {
    /// Wrap a dispatch result.
    pub fn from_result(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(result) => Response::Success { result },
            Err(e) => Response::from(e),
        }
    }

    /// True for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// Serialize to one JSON document.
    pub fn to_json(&self, pretty: bool) -> String {
        let encoded = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        encoded.unwrap_or_else(|e| {
            format!(r#"{{"status":"error","message":"failed to encode response: {e}","code":"internal"}}"#)
        })
    }
}

impl From<ApiError> for Response {
    fn from(e: ApiError) -> Self {
        Response::Error {
            message: e.to_string(),
            code: e.code().to_string(),
        }
    }
}

/// `get_session_info` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    /// Number of tracks.
    pub track_count: usize,
    /// One entry per track.
    pub tracks: Vec<TrackOverview>,
}

/// One line of the session overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackOverview {
    /// Track index.
    pub index: usize,
    /// Track name.
    pub name: String,
    /// Audio, MIDI or return.
    pub kind: TrackKind,
    /// Top-level device count.
    pub device_count: usize,
}

/// `get_track_info` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackDetails {
    /// Track index.
    pub index: usize,
    /// Track name.
    pub name: String,
    /// Audio, MIDI or return.
    pub kind: TrackKind,
    /// Muted.
    pub mute: bool,
    /// Soloed.
    pub solo: bool,
    /// Record-armed.
    pub arm: bool,
    /// Mixer volume.
    pub volume: f32,
    /// Mixer pan.
    pub pan: f32,
    /// Top-level devices.
    pub devices: Vec<DeviceSummary>,
}

/// A device in a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    /// Position in its track or chain.
    pub index: usize,
    /// Full address.
    pub address: Address,
    /// Display name.
    pub name: String,
    /// Host class name.
    pub class_name: String,
    /// Native, plugin or rack.
    pub kind: DeviceKind,
    /// Third-party wrapper.
    pub is_plugin: bool,
    /// Rack container.
    pub is_rack: bool,
    /// Chain count, racks only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_count: Option<usize>,
}

/// `get_rack_chain_devices` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainDevices {
    /// Rack display name.
    pub rack_name: String,
    /// Chain index.
    pub chain_index: usize,
    /// Chain name.
    pub chain_name: String,
    /// Devices in the chain.
    pub devices: Vec<DeviceSummary>,
}

/// Single `set_device_parameter` / `set_parameter_at` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    /// Device display name.
    pub device_name: String,
    /// Parameter after the write.
    #[serde(flatten)]
    pub parameter: ParameterDescriptor,
}

/// Batch `set_device_parameter` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSet {
    /// Device display name.
    pub device_name: String,
    /// `Set N/M parameters on device '<name>'`.
    pub summary: String,
    /// Entries that went through.
    pub succeeded: usize,
    /// Entries requested.
    pub total: usize,
    /// Per-entry outcome, in request order.
    pub results: Vec<BatchEntry>,
}

/// Outcome of one batch entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    /// Selector as given.
    pub parameter: ParamSelector,
    /// True if the write went through.
    pub success: bool,
    /// Resolved parameter name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
    /// Stored value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

/// `map_parameter_to_macro` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroMapped {
    /// Rack display name.
    pub rack_name: String,
    /// Controlling macro's name.
    pub macro_name: String,
    /// The new binding.
    #[serde(flatten)]
    pub mapping: MacroMapping,
}

/// `unmap_parameter_from_macro` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroUnmapped {
    /// Rack display name.
    pub rack_name: String,
    /// Macro index.
    pub macro_index: usize,
    /// Target device address.
    pub target_address: Address,
    /// Target parameter index.
    pub target_parameter_index: usize,
    /// False if nothing was bound.
    pub removed: bool,
}

/// `get_rack_macro_mappings` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RackMacros {
    /// Rack display name.
    pub rack_name: String,
    /// Exactly eight entries.
    pub macros: Vec<MacroEntry>,
}

/// One macro in [`RackMacros`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroEntry {
    /// Macro index, 0-7.
    pub macro_index: usize,
    /// Parameter index of the macro on the rack.
    pub parameter_index: usize,
    /// Macro name.
    pub name: String,
    /// Current value.
    pub value: f32,
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
    /// True if at least one target is bound.
    pub is_mapped: bool,
    /// Bound targets.
    pub targets: Vec<MacroTarget>,
}

/// One bound target in a [`MacroEntry`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroTarget {
    /// Target device address.
    pub address: Address,
    /// Target device name.
    pub device_name: String,
    /// Target parameter index.
    pub parameter_index: usize,
    /// Target parameter name.
    pub parameter_name: String,
}

//! Request envelope and tool parameters.
//!
//! Wire form: `{"type": "<tool>", "params": {...}}`. `params` may be omitted
//! for tools that take none. Indices arrive as JSON integers and are checked
//! for sign here, before anything reaches the engine; the macro index of
//! mapping tools is range-checked here too.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use rackmap_core::{Address, MacroIndex, ParamSelector};
use rackmap_registry::ParameterWrite;

use crate::error::ApiError;

/// Raw request envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    /// Tool name.
    #[serde(rename = "type")]
    pub tool: String,
    /// Tool parameters.
    #[serde(default)]
    pub params: Value,
}

/// One or many parameter writes.
#[derive(Debug, Clone, PartialEq)]
pub enum Writes {
    /// `parameter_name` / `parameter_index` + `value`.
    Single(ParameterWrite),
    /// `parameters` list; entries are independent.
    Batch(Vec<ParameterWrite>),
}

/// A validated tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Track count and per-track overview.
    GetSessionInfo,
    /// Mixer state and top-level devices of one track.
    GetTrackInfo {
        /// Track index.
        track: usize,
    },
    /// Parameters of a top-level device.
    GetDeviceParameters {
        /// Device address.
        device: Address,
    },
    /// Write one or many parameters of a top-level device.
    SetDeviceParameter {
        /// Device address.
        device: Address,
        /// What to write.
        writes: Writes,
    },
    /// Devices in one chain of a rack.
    GetRackChainDevices {
        /// Rack address.
        rack: Address,
        /// Chain index.
        chain: usize,
    },
    /// Parameters of a device inside a rack chain.
    GetRackChainDeviceParameters {
        /// Device address.
        device: Address,
    },
    /// Parameters of a device at any depth.
    GetParametersAt {
        /// Device address.
        device: Address,
    },
    /// Write one parameter of a device at any depth.
    SetParameterAt {
        /// Device address.
        device: Address,
        /// What to write.
        write: ParameterWrite,
    },
    /// Bind a rack macro to a chain device parameter.
    MapParameterToMacro {
        /// Rack address.
        rack: Address,
        /// Target device address.
        target: Address,
        /// Target parameter index.
        parameter: usize,
        /// Controlling macro.
        macro_index: MacroIndex,
    },
    /// Remove a macro binding.
    UnmapParameterFromMacro {
        /// Rack address.
        rack: Address,
        /// Target device address.
        target: Address,
        /// Target parameter index.
        parameter: usize,
        /// Controlling macro.
        macro_index: MacroIndex,
    },
    /// All eight macros of a rack and their bindings.
    GetRackMacroMappings {
        /// Rack address.
        rack: Address,
    },
}

/// Tool names accepted in the `type` field.
pub const TOOL_NAMES: &[&str] = &[
    "get_session_info",
    "get_track_info",
    "get_device_parameters",
    "set_device_parameter",
    "get_rack_chain_devices",
    "get_rack_chain_device_parameters",
    "get_parameters_at",
    "set_parameter_at",
    "map_parameter_to_macro",
    "unmap_parameter_from_macro",
    "get_rack_macro_mappings",
];

#[derive(Deserialize)]
struct TrackParams {
    track_index: i64,
}

#[derive(Deserialize)]
struct DeviceParams {
    track_index: i64,
    device_index: i64,
}

#[derive(Deserialize)]
struct WireWrite {
    parameter_name: Option<String>,
    parameter_index: Option<i64>,
    value: Option<f32>,
}

#[derive(Deserialize)]
struct SetDeviceParams {
    track_index: i64,
    device_index: i64,
    #[serde(flatten)]
    single: WireWrite,
    parameters: Option<Vec<WireWrite>>,
}

#[derive(Deserialize)]
struct ChainParams {
    track_index: i64,
    device_index: i64,
    #[serde(default)]
    chain_index: i64,
}

#[derive(Deserialize)]
struct ChainDeviceParams {
    track_index: i64,
    device_index: i64,
    chain_index: i64,
    chain_device_index: i64,
}

#[derive(Deserialize)]
struct AddressParams {
    address: Vec<i64>,
}

#[derive(Deserialize)]
struct SetAtParams {
    address: Vec<i64>,
    #[serde(flatten)]
    write: WireWrite,
}

#[derive(Deserialize)]
struct MacroTargetParams {
    track_index: i64,
    device_index: i64,
    chain_index: i64,
    chain_device_index: i64,
    parameter_index: i64,
    macro_index: i64,
}

impl Request {
    /// Parse a JSON request line.
    pub fn from_json(line: &str) -> Result<Self, ApiError> {
        let envelope: Envelope =
            serde_json::from_str(line).map_err(|e| ApiError::Json(e.to_string()))?;
        Self::from_envelope(envelope)
    }

    /// Validate an envelope into a request.
    pub fn from_envelope(envelope: Envelope) -> Result<Self, ApiError> {
        let p = envelope.params;
        match envelope.tool.as_str() {
            "get_session_info" => Ok(Request::GetSessionInfo),
            "get_track_info" => {
                let TrackParams { track_index } = params(p)?;
                Ok(Request::GetTrackInfo {
                    track: index("track_index", track_index)?,
                })
            }
            "get_device_parameters" => {
                let d: DeviceParams = params(p)?;
                Ok(Request::GetDeviceParameters {
                    device: device_address(d.track_index, d.device_index)?,
                })
            }
            "set_device_parameter" => {
                let s: SetDeviceParams = params(p)?;
                Ok(Request::SetDeviceParameter {
                    device: device_address(s.track_index, s.device_index)?,
                    writes: writes(s.single, s.parameters)?,
                })
            }
            "get_rack_chain_devices" => {
                let c: ChainParams = params(p)?;
                Ok(Request::GetRackChainDevices {
                    rack: device_address(c.track_index, c.device_index)?,
                    chain: index("chain_index", c.chain_index)?,
                })
            }
            "get_rack_chain_device_parameters" => {
                let c: ChainDeviceParams = params(p)?;
                Ok(Request::GetRackChainDeviceParameters {
                    device: chain_device_address(&c)?,
                })
            }
            "get_parameters_at" => {
                let AddressParams { address } = params(p)?;
                Ok(Request::GetParametersAt {
                    device: wire_address(&address)?,
                })
            }
            "set_parameter_at" => {
                let s: SetAtParams = params(p)?;
                Ok(Request::SetParameterAt {
                    device: wire_address(&s.address)?,
                    write: single_write(s.write)?,
                })
            }
            "map_parameter_to_macro" => {
                let (rack, target, parameter, macro_index) = macro_target(params(p)?)?;
                Ok(Request::MapParameterToMacro {
                    rack,
                    target,
                    parameter,
                    macro_index,
                })
            }
            "unmap_parameter_from_macro" => {
                let (rack, target, parameter, macro_index) = macro_target(params(p)?)?;
                Ok(Request::UnmapParameterFromMacro {
                    rack,
                    target,
                    parameter,
                    macro_index,
                })
            }
            "get_rack_macro_mappings" => {
                let d: DeviceParams = params(p)?;
                Ok(Request::GetRackMacroMappings {
                    rack: device_address(d.track_index, d.device_index)?,
                })
            }
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }

    /// The wire name of this request's tool.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Request::GetSessionInfo => "get_session_info",
            Request::GetTrackInfo { .. } => "get_track_info",
            Request::GetDeviceParameters { .. } => "get_device_parameters",
            Request::SetDeviceParameter { .. } => "set_device_parameter",
            Request::GetRackChainDevices { .. } => "get_rack_chain_devices",
            Request::GetRackChainDeviceParameters { .. } => "get_rack_chain_device_parameters",
            Request::GetParametersAt { .. } => "get_parameters_at",
            Request::SetParameterAt { .. } => "set_parameter_at",
            Request::MapParameterToMacro { .. } => "map_parameter_to_macro",
            Request::UnmapParameterFromMacro { .. } => "unmap_parameter_from_macro",
            Request::GetRackMacroMappings { .. } => "get_rack_macro_mappings",
        }
    }

    /// True for tools that change host state.
    pub fn is_modifying(&self) -> bool {
        matches!(
            self,
            Request::SetDeviceParameter { .. }
                | Request::SetParameterAt { .. }
                | Request::MapParameterToMacro { .. }
                | Request::UnmapParameterFromMacro { .. }
        )
    }
}

fn params<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let value = if value.is_null() {
        Value::Object(Map::new())
    } else {
        value
    };
    serde_json::from_value(value).map_err(|e| ApiError::invalid(e.to_string()))
}

fn index(field: &str, value: i64) -> Result<usize, ApiError> {
    usize::try_from(value)
        .map_err(|_| ApiError::invalid(format!("{field} must be a non-negative integer, got {value}")))
}

fn device_address(track: i64, device: i64) -> Result<Address, ApiError> {
    Ok(Address::new(
        index("track_index", track)?,
        index("device_index", device)?,
    ))
}

fn chain_device_address(c: &ChainDeviceParams) -> Result<Address, ApiError> {
    Ok(device_address(c.track_index, c.device_index)?.with_chain(
        index("chain_index", c.chain_index)?,
        index("chain_device_index", c.chain_device_index)?,
    ))
}

fn wire_address(raw: &[i64]) -> Result<Address, ApiError> {
    let selectors = raw
        .iter()
        .map(|&v| index("address", v))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Address::from_selectors(&selectors)?)
}

fn macro_target(p: MacroTargetParams) -> Result<(Address, Address, usize, MacroIndex), ApiError> {
    let macro_index = MacroIndex::new(index("macro_index", p.macro_index)?)?;
    let rack = device_address(p.track_index, p.device_index)?;
    let target = rack.clone().with_chain(
        index("chain_index", p.chain_index)?,
        index("chain_device_index", p.chain_device_index)?,
    );
    let parameter = index("parameter_index", p.parameter_index)?;
    Ok((rack, target, parameter, macro_index))
}

fn selector(name: Option<String>, idx: Option<i64>) -> Result<ParamSelector, ApiError> {
    match (name, idx) {
        (Some(_), Some(_)) => Err(ApiError::invalid(
            "give parameter_name or parameter_index, not both",
        )),
        (Some(name), None) => Ok(ParamSelector::Name(name)),
        (None, Some(i)) => Ok(ParamSelector::Index(index("parameter_index", i)?)),
        (None, None) => Err(ApiError::invalid(
            "either parameter_name or parameter_index must be provided",
        )),
    }
}

fn single_write(w: WireWrite) -> Result<ParameterWrite, ApiError> {
    let selector = selector(w.parameter_name, w.parameter_index)?;
    let value = w
        .value
        .ok_or_else(|| ApiError::invalid("value must be provided"))?;
    Ok(ParameterWrite { selector, value })
}

fn writes(single: WireWrite, batch: Option<Vec<WireWrite>>) -> Result<Writes, ApiError> {
    let has_single =
        single.parameter_name.is_some() || single.parameter_index.is_some() || single.value.is_some();
    match batch {
        Some(_) if has_single => Err(ApiError::invalid(
            "cannot use both single parameter arguments and parameters list",
        )),
        Some(list) if list.is_empty() => {
            Err(ApiError::invalid("parameters must be a non-empty list"))
        }
        Some(list) => Ok(Writes::Batch(
            list.into_iter().map(single_write).collect::<Result<_, _>>()?,
        )),
        None if !has_single => Err(ApiError::invalid(
            "either parameter_name, parameter_index, or parameters must be provided",
        )),
        None => Ok(Writes::Single(single_write(single)?)),
    }
}

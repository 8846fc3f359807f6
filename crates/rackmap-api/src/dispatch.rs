//! Tool dispatch against a host.

use serde::Serialize;
use serde_json::Value;

use rackmap_core::{
    Address, DeviceHandle, LiveHost, ParamSelector, chain_devices, resolve,
    resolve_chain, track_devices,
};
use rackmap_macros::{macro_parameter, macro_slots, map, unmap};
use rackmap_registry::{ParameterWrite, describe, set_parameter, set_parameters};

use crate::error::ApiError;
use crate::request::{Request, Writes};
use crate::response::{
    BatchEntry, BatchSet, ChainDevices, DeviceSummary, MacroEntry, MacroMapped, MacroTarget,
    MacroUnmapped, ParameterSet, RackMacros, Response, SessionInfo, TrackDetails, TrackOverview,
};

/// Parse, run and wrap one JSON request line.
pub fn handle_json<H: LiveHost + ?Sized>(host: &mut H, line: &str) -> Response {
    Response::from_result(Request::from_json(line).and_then(|req| dispatch(host, &req)))
}

/// Run one validated request.
pub fn dispatch<H: LiveHost + ?Sized>(host: &mut H, request: &Request) -> Result<Value, ApiError> {
    tracing::debug!(tool = request.tool_name(), "dispatching");
    let result = run(host, request);
    if let Err(e) = &result {
        tracing::warn!(tool = request.tool_name(), code = e.code(), "{e}");
    }
    result
}

fn run<H: LiveHost + ?Sized>(host: &mut H, request: &Request) -> Result<Value, ApiError> {
    match request {
        Request::GetSessionInfo => to_value(&session_info(&*host)?),
        Request::GetTrackInfo { track } => to_value(&track_details(&*host, *track)?),
        Request::GetDeviceParameters { device }
        | Request::GetRackChainDeviceParameters { device }
        | Request::GetParametersAt { device } => {
            let handle = resolve(&*host, device)?;
            to_value(&describe(&*host, &handle)?)
        }
        Request::SetDeviceParameter { device, writes } => {
            let handle = resolve(&*host, device)?;
            match writes {
                Writes::Single(write) => to_value(&write_one(host, &handle, write)?),
                Writes::Batch(list) => to_value(&write_many(host, &handle, list)),
            }
        }
        Request::SetParameterAt { device, write } => {
            let handle = resolve(&*host, device)?;
            to_value(&write_one(host, &handle, write)?)
        }
        Request::GetRackChainDevices { rack, chain } => {
            to_value(&rack_chain_devices(&*host, rack, *chain)?)
        }
        Request::MapParameterToMacro {
            rack,
            target,
            parameter,
            macro_index,
        } => {
            let rack = resolve(&*host, rack)?;
            let mapping = map(
                host,
                &rack,
                macro_index.get(),
                target,
                &ParamSelector::Index(*parameter),
            )?;
            let macro_name = macro_parameter(&*host, &rack, macro_index.get())?.name;
            to_value(&MacroMapped {
                rack_name: rack.name().to_string(),
                macro_name,
                mapping,
            })
        }
        Request::UnmapParameterFromMacro {
            rack,
            target,
            parameter,
            macro_index,
        } => {
            let rack = resolve(&*host, rack)?;
            let removed = unmap(
                host,
                &rack,
                macro_index.get(),
                target,
                &ParamSelector::Index(*parameter),
            )?;
            to_value(&MacroUnmapped {
                rack_name: rack.name().to_string(),
                macro_index: macro_index.get(),
                target_address: target.clone(),
                target_parameter_index: *parameter,
                removed,
            })
        }
        Request::GetRackMacroMappings { rack } => to_value(&rack_macros(&*host, rack)?),
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Json(e.to_string()))
}

fn session_info<H: LiveHost + ?Sized>(host: &H) -> Result<SessionInfo, ApiError> {
    let track_count = host.track_count()?;
    let tracks = (0..track_count)
        .map(|index| {
            let info = host.track_info(index)?;
            Ok(TrackOverview {
                index,
                name: info.name,
                kind: info.kind,
                device_count: host.track_devices(index)?.len(),
            })
        })
        .collect::<Result<_, ApiError>>()?;
    Ok(SessionInfo {
        track_count,
        tracks,
    })
}

fn track_details<H: LiveHost + ?Sized>(host: &H, track: usize) -> Result<TrackDetails, ApiError> {
    // Count check first so a bad index reports TrackNotFound.
    let devices = track_devices(host, track)?;
    let info = host.track_info(track)?;
    Ok(TrackDetails {
        index: track,
        name: info.name,
        kind: info.kind,
        mute: info.mute,
        solo: info.solo,
        arm: info.arm,
        volume: info.volume,
        pan: info.pan,
        devices: summarize(host, &devices)?,
    })
}

fn rack_chain_devices<H: LiveHost + ?Sized>(
    host: &H,
    rack: &Address,
    chain: usize,
) -> Result<ChainDevices, ApiError> {
    let chain = resolve_chain(host, rack, chain)?;
    let devices = chain_devices(host, &chain)?;
    Ok(ChainDevices {
        rack_name: chain.rack.name().to_string(),
        chain_index: chain.index,
        chain_name: chain.name,
        devices: summarize(host, &devices)?,
    })
}

fn summarize<H: LiveHost + ?Sized>(
    host: &H,
    devices: &[DeviceHandle],
) -> Result<Vec<DeviceSummary>, ApiError> {
    devices
        .iter()
        .map(|d| {
            let chain_count = if d.is_rack() {
                Some(host.device_chains(d.id())?.len())
            } else {
                None
            };
            Ok(DeviceSummary {
                index: d
                    .address()
                    .steps()
                    .last()
                    .map_or(d.address().device(), |s| s.device),
                address: d.address().clone(),
                name: d.name().to_string(),
                class_name: d.class_name().to_string(),
                kind: d.kind(),
                is_plugin: d.is_plugin(),
                is_rack: d.is_rack(),
                chain_count,
            })
        })
        .collect()
}

fn write_one<H: LiveHost + ?Sized>(
    host: &mut H,
    device: &DeviceHandle,
    write: &ParameterWrite,
) -> Result<ParameterSet, ApiError> {
    let parameter = set_parameter(host, device, &write.selector, write.value)?;
    Ok(ParameterSet {
        device_name: device.name().to_string(),
        parameter,
    })
}

fn write_many<H: LiveHost + ?Sized>(
    host: &mut H,
    device: &DeviceHandle,
    writes: &[ParameterWrite],
) -> BatchSet {
    let results: Vec<BatchEntry> = set_parameters(host, device, writes)
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(p) => BatchEntry {
                parameter: outcome.selector,
                success: true,
                parameter_name: Some(p.name),
                value: Some(p.value),
                error: None,
                code: None,
            },
            Err(e) => BatchEntry {
                parameter: outcome.selector,
                success: false,
                parameter_name: None,
                value: None,
                error: Some(e.to_string()),
                code: Some(e.code()),
            },
        })
        .collect();
    let succeeded = results.iter().filter(|r| r.success).count();
    let total = results.len();
    BatchSet {
        device_name: device.name().to_string(),
        summary: format!(
            "Set {succeeded}/{total} parameters on device '{}'",
            device.name()
        ),
        succeeded,
        total,
        results,
    }
}

fn rack_macros<H: LiveHost + ?Sized>(host: &H, rack: &Address) -> Result<RackMacros, ApiError> {
    let rack = resolve(host, rack)?;
    let macros = macro_slots(host, &rack)?
        .into_iter()
        .map(|slot| MacroEntry {
            macro_index: slot.index.get(),
            parameter_index: slot.parameter.index,
            name: slot.parameter.name,
            value: slot.parameter.value,
            min: slot.parameter.min,
            max: slot.parameter.max,
            is_mapped: !slot.mappings.is_empty(),
            targets: slot
                .mappings
                .into_iter()
                .map(|m| MacroTarget {
                    address: m.target_address,
                    device_name: m.target_device_name,
                    parameter_index: m.target_parameter_index,
                    parameter_name: m.target_parameter_name,
                })
                .collect(),
        })
        .collect();
    Ok(RackMacros {
        rack_name: rack.name().to_string(),
        macros,
    })
}

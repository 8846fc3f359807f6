//! Map, list and unmap operations.

use std::collections::HashMap;

use rackmap_core::{
    Address, DeviceHandle, DeviceId, HostError, LiveHost, MacroError, MacroIndex, ParamSelector,
    ParameterDescriptor, ParameterError, RawMacroMapping, Result, ValueScale, resolve, subtree,
};
use rackmap_registry::{get_parameter, list_parameters, set_parameter};

use crate::mapping::{MacroMapping, MacroSlot, MacroTable};

/// Binds a rack macro to a parameter of a device nested inside the rack.
///
/// Mapping a parameter that is already bound to another macro of the same
/// rack moves it; the host allows one controlling macro per parameter.
pub fn map<H: LiveHost + ?Sized>(
    host: &mut H,
    rack: &DeviceHandle,
    macro_index: usize,
    target: &Address,
    selector: &ParamSelector,
) -> Result<MacroMapping> {
    let (macro_index, device, param) = check(&*host, rack, macro_index, target, selector)?;
    prune_stale_mappings(host, rack)?;

    host.add_macro_mapping(
        rack.id(),
        RawMacroMapping {
            macro_index,
            target: device.id(),
            parameter_index: param.index,
        },
    )?;
    tracing::info!(
        rack = %rack.address(),
        macro_index = macro_index.get(),
        target = %device.address(),
        parameter = %param.name,
        "macro mapped"
    );

    let source = macro_parameter(&*host, rack, macro_index.get())?;
    Ok(MacroMapping {
        macro_index,
        target_address: device.address().clone(),
        target_parameter_index: param.index,
        target_parameter_name: param.name.clone(),
        target_device_name: device.name().to_string(),
        scale: ValueScale::linear(source.range(), param.range()),
    })
}

/// Removes one binding. Returns `false` if it was not bound.
pub fn unmap<H: LiveHost + ?Sized>(
    host: &mut H,
    rack: &DeviceHandle,
    macro_index: usize,
    target: &Address,
    selector: &ParamSelector,
) -> Result<bool> {
    let (macro_index, device, param) = check(&*host, rack, macro_index, target, selector)?;
    prune_stale_mappings(host, rack)?;

    let removed = host.remove_macro_mapping(
        rack.id(),
        &RawMacroMapping {
            macro_index,
            target: device.id(),
            parameter_index: param.index,
        },
    )?;
    if removed {
        tracing::info!(
            rack = %rack.address(),
            macro_index = macro_index.get(),
            target = %device.address(),
            parameter = %param.name,
            "macro unmapped"
        );
    }
    Ok(removed)
}

/// Every live binding of a rack.
///
/// Bindings whose target device left the rack are skipped.
pub fn list_mappings<H: LiveHost + ?Sized>(host: &H, rack: &DeviceHandle) -> Result<MacroTable> {
    rack.require_rack()?;
    let rack_params = list_parameters(host, rack)?;
    let devices: HashMap<DeviceId, DeviceHandle> = subtree(host, rack)?
        .into_iter()
        .map(|h| (h.id(), h))
        .collect();

    let mut table = MacroTable::new();
    for raw in host.macro_mappings(rack.id())? {
        let Some(device) = devices.get(&raw.target) else {
            tracing::warn!(
                rack = %rack.address(),
                target = %raw.target,
                "skipping mapping to device no longer in rack"
            );
            continue;
        };
        let Some(target) = host.parameter(raw.target, raw.parameter_index)? else {
            tracing::warn!(
                rack = %rack.address(),
                target = %device.address(),
                parameter_index = raw.parameter_index,
                "skipping mapping to missing parameter"
            );
            continue;
        };
        let target = ParameterDescriptor::from_raw(raw.parameter_index, &target);
        let source_index = host.macro_parameter_index(rack.id(), raw.macro_index);
        let Some(source) = rack_params.get(source_index) else {
            tracing::warn!(
                rack = %rack.address(),
                macro_index = raw.macro_index.get(),
                parameter_index = source_index,
                "skipping mapping from missing macro parameter"
            );
            continue;
        };
        table.insert(MacroMapping {
            macro_index: raw.macro_index,
            target_address: device.address().clone(),
            target_parameter_index: target.index,
            target_parameter_name: target.name.clone(),
            target_device_name: device.name().to_string(),
            scale: ValueScale::linear(source.range(), target.range()),
        });
    }
    Ok(table)
}

/// Removes bindings whose target device left the rack. Returns how many.
pub fn prune_stale_mappings<H: LiveHost + ?Sized>(
    host: &mut H,
    rack: &DeviceHandle,
) -> Result<usize> {
    rack.require_rack()?;
    let live: Vec<DeviceId> = subtree(&*host, rack)?.iter().map(DeviceHandle::id).collect();
    let stale: Vec<RawMacroMapping> = host
        .macro_mappings(rack.id())?
        .into_iter()
        .filter(|m| !live.contains(&m.target))
        .collect();
    for mapping in &stale {
        host.remove_macro_mapping(rack.id(), mapping)?;
        tracing::warn!(
            rack = %rack.address(),
            macro_index = mapping.macro_index.get(),
            target = %mapping.target,
            "pruned stale macro mapping"
        );
    }
    Ok(stale.len())
}

/// All eight macros of a rack with their bindings.
pub fn macro_slots<H: LiveHost + ?Sized>(host: &H, rack: &DeviceHandle) -> Result<Vec<MacroSlot>> {
    let table = list_mappings(host, rack)?;
    let params = list_parameters(host, rack)?;
    MacroIndex::all()
        .map(|index| {
            let param_index = host.macro_parameter_index(rack.id(), index);
            let parameter = params.get(param_index).cloned().ok_or_else(|| {
                ParameterError::ParameterNotFound {
                    selector: ParamSelector::Index(param_index),
                    count: params.len(),
                }
            })?;
            Ok(MacroSlot {
                index,
                parameter,
                mappings: table.get(index).to_vec(),
            })
        })
        .collect()
}

/// The macro's own parameter on the rack.
pub fn macro_parameter<H: LiveHost + ?Sized>(
    host: &H,
    rack: &DeviceHandle,
    macro_index: usize,
) -> Result<ParameterDescriptor> {
    rack.require_rack()?;
    let macro_index = MacroIndex::new(macro_index)?;
    let index = host.macro_parameter_index(rack.id(), macro_index);
    get_parameter(host, rack, &ParamSelector::Index(index))
}

/// Writes a macro; the host propagates it to every bound target.
pub fn set_macro<H: LiveHost + ?Sized>(
    host: &mut H,
    rack: &DeviceHandle,
    macro_index: usize,
    value: f32,
) -> Result<ParameterDescriptor> {
    rack.require_rack()?;
    let macro_index = MacroIndex::new(macro_index)?;
    let index = host.macro_parameter_index(rack.id(), macro_index);
    set_parameter(host, rack, &ParamSelector::Index(index), value)
}

fn check<H: LiveHost + ?Sized>(
    host: &H,
    rack: &DeviceHandle,
    macro_index: usize,
    target: &Address,
    selector: &ParamSelector,
) -> Result<(MacroIndex, DeviceHandle, ParameterDescriptor)> {
    rack.require_rack()?;
    let macro_index = MacroIndex::new(macro_index)?;
    if !target.is_within(rack.address()) {
        return Err(MacroError::TargetOutsideRack {
            rack: rack.address().clone(),
            target: target.clone(),
        }
        .into());
    }
    // The address check only holds if the address still leads to this rack.
    if resolve(host, rack.address())?.id() != rack.id() {
        return Err(HostError::stale(format!("{} at {}", rack.id(), rack.address())).into());
    }
    let device = resolve(host, target)?;
    let param = get_parameter(host, &device, selector)?;
    Ok((macro_index, device, param))
}

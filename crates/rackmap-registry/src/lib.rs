//! Parameter registry for resolved devices.
//!
//! Every device kind exposes its parameters the same way: native devices,
//! opaque third-party plugins and racks alike. The registry lists them,
//! looks one up by index or exact name, and performs validated writes.
//!
//! # Rules
//!
//! - [`list_parameters`] returns every host parameter, indices `0..count`,
//!   with no kind-specific filtering.
//! - Name lookup is exact and case-sensitive. Duplicate names resolve to the
//!   lowest index.
//! - [`set_parameter`] rejects read-only parameters (disabled or
//!   non-automatable) and values outside `[min, max]`, then performs exactly
//!   one host write. Nothing is cached, so the next read sees the new value.
//!
//! # Example
//!
//! ```rust
//! use rackmap_core::sim::{Container, DeviceSpec, SimParameter};
//! use rackmap_core::{resolve, Address, ParamSelector, SimHost, TrackKind};
//! use rackmap_registry::{get_parameter, set_parameter};
//!
//! let mut host = SimHost::new();
//! let t = host.add_track("Bus", TrackKind::Audio);
//! host.push_device(
//!     Container::Track(t),
//!     DeviceSpec::plugin("Pro-Q 3").with_parameter(SimParameter::new("Output Gain", 0.5, 0.0, 1.0)),
//! ).unwrap();
//!
//! let handle = resolve(&host, &Address::new(0, 0)).unwrap();
//! set_parameter(&mut host, &handle, &"Output Gain".into(), 0.8).unwrap();
//! assert_eq!(get_parameter(&host, &handle, &ParamSelector::Index(0)).unwrap().value, 0.8);
//! ```

use serde::{Deserialize, Serialize};

use rackmap_core::{
    DeviceHandle, DeviceKind, LiveHost, ParamSelector, ParameterDescriptor, ParameterError,
    Result,
};

/// Every parameter of a device, normalized, in index order.
pub fn list_parameters<H: LiveHost + ?Sized>(
    host: &H,
    device: &DeviceHandle,
) -> Result<Vec<ParameterDescriptor>> {
    Ok(host
        .parameters(device.id())?
        .iter()
        .enumerate()
        .map(|(i, raw)| ParameterDescriptor::from_raw(i, raw))
        .collect())
}

/// Number of parameters on a device.
pub fn parameter_count<H: LiveHost + ?Sized>(host: &H, device: &DeviceHandle) -> Result<usize> {
    Ok(host.parameters(device.id())?.len())
}

/// One parameter, selected by index or exact name.
pub fn get_parameter<H: LiveHost + ?Sized>(
    host: &H,
    device: &DeviceHandle,
    selector: &ParamSelector,
) -> Result<ParameterDescriptor> {
    let params = host.parameters(device.id())?;
    let index = selector
        .position(params.iter().map(|p| p.name.as_str()))
        .ok_or_else(|| ParameterError::ParameterNotFound {
            selector: selector.clone(),
            count: params.len(),
        })?;
    Ok(ParameterDescriptor::from_raw(index, &params[index]))
}

/// Writes one parameter and returns its descriptor after the write.
///
/// The returned value is what the host stored, which for quantized
/// parameters is the nearest allowed value.
pub fn set_parameter<H: LiveHost + ?Sized>(
    host: &mut H,
    device: &DeviceHandle,
    selector: &ParamSelector,
    value: f32,
) -> Result<ParameterDescriptor> {
    let params = host.parameters(device.id())?;
    let index = selector
        .position(params.iter().map(|p| p.name.as_str()))
        .ok_or_else(|| ParameterError::ParameterNotFound {
            selector: selector.clone(),
            count: params.len(),
        })?;
    let raw = &params[index];
    let before = ParameterDescriptor::from_raw(index, raw);

    if !raw.is_writable() {
        return Err(ParameterError::ReadOnly {
            index,
            name: before.name,
        }
        .into());
    }
    if !before.contains(value) {
        return Err(ParameterError::OutOfRange {
            index,
            name: before.name,
            value,
            min: before.min,
            max: before.max,
        }
        .into());
    }

    let stored = host.write_parameter(device.id(), index, value)?;
    tracing::debug!(
        device = %device.address(),
        index,
        name = %before.name,
        requested = value,
        stored,
        "parameter write"
    );

    Ok(ParameterDescriptor {
        value: stored,
        ..before
    })
}

/// One entry of a batch write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterWrite {
    /// Which parameter.
    pub selector: ParamSelector,
    /// Requested value.
    pub value: f32,
}

/// Result of one batch entry.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// The entry's selector.
    pub selector: ParamSelector,
    /// Descriptor after the write, or why it failed.
    pub result: Result<ParameterDescriptor>,
}

impl WriteOutcome {
    /// True if the write went through.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Applies independent writes in order. A failed entry does not stop the rest.
pub fn set_parameters<H: LiveHost + ?Sized>(
    host: &mut H,
    device: &DeviceHandle,
    writes: &[ParameterWrite],
) -> Vec<WriteOutcome> {
    writes
        .iter()
        .map(|w| WriteOutcome {
            selector: w.selector.clone(),
            result: set_parameter(host, device, &w.selector, w.value),
        })
        .collect()
}

/// A device together with its full parameter list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceParameters {
    /// Display name.
    pub device_name: String,
    /// Host class name.
    pub device_class: String,
    /// Signal-chain role, snake_case.
    pub device_type: &'static str,
    /// Native, plugin or rack.
    pub kind: DeviceKind,
    /// Shorthand for `kind == plugin`.
    pub is_plugin: bool,
    /// `parameters.len()`.
    pub parameter_count: usize,
    /// Every parameter.
    pub parameters: Vec<ParameterDescriptor>,
}

/// Lists a device's parameters along with its identity.
pub fn describe<H: LiveHost + ?Sized>(host: &H, device: &DeviceHandle) -> Result<DeviceParameters> {
    let parameters = list_parameters(host, device)?;
    Ok(DeviceParameters {
        device_name: device.name().to_string(),
        device_class: device.class_name().to_string(),
        device_type: device.role().as_str(),
        kind: device.kind(),
        is_plugin: device.is_plugin(),
        parameter_count: parameters.len(),
        parameters,
    })
}

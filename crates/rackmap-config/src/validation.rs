//! Set validation.
//!
//! Checks a [`LiveSet`] before it is built: parameter ranges and values,
//! macro indices, rack-only sections on non-rack devices, and mapping
//! targets. Every problem is reported, not just the first.
//!
//! # Example
//!
//! ```rust
//! use rackmap_config::{LiveSet, validate_live_set};
//!
//! let set = LiveSet::from_toml("name = \"empty\"").unwrap();
//! validate_live_set(&set).expect("empty set is valid");
//! ```

use thiserror::Error;

use rackmap_core::{Address, MACRO_COUNT, ParamRange};

use crate::live_set::{DeviceConfig, LiveSet, MappingConfig};

/// Validation error types.
///
/// `device` fields hold the device address and name, e.g. `t0/d1 'EQ Rack'`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter with `min > max` or a non-finite bound.
    #[error("{device}: parameter '{param}' has invalid range [{min}, {max}]")]
    InvalidRange {
        /// Device location.
        device: String,
        /// Parameter name.
        param: String,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// Initial value outside its parameter's range.
    #[error("{device}: parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Device location.
        device: String,
        /// Parameter name.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Macro index past the eighth macro.
    #[error("{device}: macro_index {index} invalid: racks have 8 macros (0-7)")]
    InvalidMacroIndex {
        /// Device location.
        device: String,
        /// Offending index.
        index: usize,
    },

    /// The same macro configured more than once.
    #[error("{device}: macro {index} configured more than once")]
    DuplicateMacro {
        /// Device location.
        device: String,
        /// Repeated index.
        index: usize,
    },

    /// Chains, macros or mappings on something that is not a rack.
    #[error("{device}: only racks can have {section}")]
    NotARack {
        /// Device location.
        device: String,
        /// Offending section name.
        section: &'static str,
    },

    /// Mapping whose target does not exist inside the rack.
    #[error("{device}: mapping target {target:?} parameter {parameter}: {reason}")]
    InvalidMappingTarget {
        /// Rack location.
        device: String,
        /// Relative `(chain, device)` path.
        target: Vec<usize>,
        /// Target parameter index.
        parameter: usize,
        /// What is wrong.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a whole set, collecting every error.
pub fn validate_live_set(set: &LiveSet) -> ValidationResult<()> {
    let mut errors = Vec::new();
    for (t, track) in set.tracks.iter().enumerate() {
        for (d, device) in track.devices.iter().enumerate() {
            validate_device(device, &Address::new(t, d), &mut errors);
        }
    }
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

fn validate_device(device: &DeviceConfig, address: &Address, errors: &mut Vec<ValidationError>) {
    let location = format!("{address} '{}'", device.name);

    for p in &device.parameters {
        check_range(&location, &p.name, p.value, p.min, p.max, errors);
    }

    if !device.device_class().is_rack() {
        for (section, present) in [
            ("chains", !device.chains.is_empty()),
            ("macros", !device.macros.is_empty()),
            ("mappings", !device.mappings.is_empty()),
        ] {
            if present {
                errors.push(ValidationError::NotARack {
                    device: location.clone(),
                    section,
                });
            }
        }
        return;
    }

    let mut seen = [false; MACRO_COUNT];
    for m in &device.macros {
        let Some(slot) = seen.get_mut(m.index) else {
            errors.push(ValidationError::InvalidMacroIndex {
                device: location.clone(),
                index: m.index,
            });
            continue;
        };
        if *slot {
            errors.push(ValidationError::DuplicateMacro {
                device: location.clone(),
                index: m.index,
            });
        }
        *slot = true;
        let name = m.name.clone().unwrap_or_else(|| format!("Macro {}", m.index + 1));
        check_range(&location, &name, m.value, m.min, m.max, errors);
    }

    for mapping in &device.mappings {
        if mapping.macro_index >= MACRO_COUNT {
            errors.push(ValidationError::InvalidMacroIndex {
                device: location.clone(),
                index: mapping.macro_index,
            });
        }
        if let Err(reason) = check_target(device, mapping) {
            errors.push(ValidationError::InvalidMappingTarget {
                device: location.clone(),
                target: mapping.target.clone(),
                parameter: mapping.parameter,
                reason,
            });
        }
    }

    for (c, chain) in device.chains.iter().enumerate() {
        for (d, nested) in chain.devices.iter().enumerate() {
            validate_device(nested, &address.clone().with_chain(c, d), errors);
        }
    }
}

fn check_range(
    location: &str,
    param: &str,
    value: f32,
    min: f32,
    max: f32,
    errors: &mut Vec<ValidationError>,
) {
    if !min.is_finite() || !max.is_finite() || min > max {
        errors.push(ValidationError::InvalidRange {
            device: location.to_string(),
            param: param.to_string(),
            min,
            max,
        });
    } else if !(ParamRange { min, max }).contains(value) {
        errors.push(ValidationError::OutOfRange {
            device: location.to_string(),
            param: param.to_string(),
            value,
            min,
            max,
        });
    }
}

fn check_target(rack: &DeviceConfig, mapping: &MappingConfig) -> Result<(), String> {
    if mapping.target.is_empty() {
        return Err("a rack cannot map its own parameters".into());
    }
    if mapping.target.len() % 2 != 0 {
        return Err("path must be (chain, device) pairs".into());
    }
    let mut current = rack;
    for pair in mapping.target.chunks(2) {
        let (c, d) = (pair[0], pair[1]);
        let chain = current
            .chains
            .get(c)
            .ok_or_else(|| format!("'{}' has no chain {c}", current.name))?;
        current = chain
            .devices
            .get(d)
            .ok_or_else(|| format!("chain '{}' has no device {d}", chain.name))?;
    }
    let count = current.built_parameter_count();
    if mapping.parameter >= count {
        return Err(format!(
            "'{}' has {count} parameter(s)",
            current.name
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_set::{ChainConfig, MacroConfig, ParameterConfig, TrackConfig};
    use rackmap_core::TrackKind;

    fn set_with(device: DeviceConfig) -> LiveSet {
        LiveSet::new("t").with_track(TrackConfig::new("A", TrackKind::Audio).with_device(device))
    }

    fn rack() -> DeviceConfig {
        DeviceConfig::new("AudioEffectGroupDevice", "Rack").with_chain(
            ChainConfig::new("A").with_device(
                DeviceConfig::new("PluginDevice", "EQ")
                    .with_parameter(ParameterConfig::new("Gain", 0.0, 0.0, 1.0)),
            ),
        )
    }

    #[test]
    fn valid_rack_passes() {
        let set = set_with(rack().with_mapping(MappingConfig {
            macro_index: 7,
            target: vec![0, 0],
            parameter: 0,
        }));
        assert_eq!(validate_live_set(&set), Ok(()));
    }

    #[test]
    fn value_outside_range() {
        let set = set_with(
            DeviceConfig::new("Eq8", "EQ Eight")
                .with_parameter(ParameterConfig::new("Gain", 2.0, 0.0, 1.0)),
        );
        let err = validate_live_set(&set).unwrap_err();
        assert_eq!(
            err.to_string(),
            "t0/d0 'EQ Eight': parameter 'Gain' value 2 out of range [0, 1]"
        );
    }

    #[test]
    fn inverted_range() {
        let set = set_with(
            DeviceConfig::new("PluginDevice", "X")
                .with_parameter(ParameterConfig::new("P", 0.5, 1.0, 0.0)),
        );
        assert!(matches!(
            validate_live_set(&set),
            Err(ValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn non_rack_sections_rejected() {
        let set = set_with(
            DeviceConfig::new("PluginDevice", "X")
                .with_chain(ChainConfig::new("A"))
                .with_macro(MacroConfig {
                    index: 0,
                    name: None,
                    min: 0.0,
                    max: 1.0,
                    value: 0.0,
                }),
        );
        let Err(ValidationError::Multiple(errors)) = validate_live_set(&set) else {
            panic!("expected multiple errors");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors[0].to_string().ends_with("only racks can have chains"));
    }

    #[test]
    fn macro_problems() {
        let m = |index| MacroConfig {
            index,
            name: None,
            min: 0.0,
            max: 1.0,
            value: 0.0,
        };
        let set = set_with(rack().with_macro(m(2)).with_macro(m(2)).with_macro(m(8)));
        let Err(ValidationError::Multiple(errors)) = validate_live_set(&set) else {
            panic!("expected multiple errors");
        };
        assert!(matches!(errors[0], ValidationError::DuplicateMacro { index: 2, .. }));
        assert!(matches!(errors[1], ValidationError::InvalidMacroIndex { index: 8, .. }));
    }

    #[test]
    fn mapping_targets_checked() {
        let cases = [
            (vec![], 0, "own parameters"),
            (vec![0], 0, "pairs"),
            (vec![1, 0], 0, "no chain 1"),
            (vec![0, 4], 0, "no device 4"),
            (vec![0, 0], 1, "has 1 parameter(s)"),
        ];
        for (target, parameter, expected) in cases {
            let set = set_with(rack().with_mapping(MappingConfig {
                macro_index: 0,
                target,
                parameter,
            }));
            let msg = validate_live_set(&set).unwrap_err().to_string();
            assert!(msg.contains(expected), "{msg}");
        }
    }

    #[test]
    fn nested_errors_carry_full_address() {
        let mut device = rack();
        device.chains[0].devices[0].parameters[0].value = -1.0;
        let msg = validate_live_set(&set_with(device)).unwrap_err().to_string();
        assert!(msg.starts_with("t0/d0/c0/d0 'EQ'"), "{msg}");
    }
}

//! Device and parameter blueprints for [`SimHost`](super::SimHost).

use crate::classify::{DeviceClass, DeviceRole};
use crate::host::RawParameter;
use crate::macro_slot::{MACRO_COUNT, MacroIndex};
use crate::scale::ParamRange;

/// A simulated parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SimParameter {
    /// Display name.
    pub name: String,
    /// Current value.
    pub value: f32,
    /// Bounds, as reported to the engine.
    pub min: f32,
    /// Bounds, as reported to the engine.
    pub max: f32,
    /// Accepts writes.
    pub enabled: bool,
    /// Accepts automation and remote writes.
    pub automatable: bool,
    /// Discrete values only.
    pub quantized: bool,
    /// Number of evenly spaced values across the range, when quantized.
    /// `None` snaps to whole numbers.
    pub steps: Option<u32>,
}

impl SimParameter {
    /// Continuous, enabled, automatable parameter.
    pub fn new(name: impl Into<String>, value: f32, min: f32, max: f32) -> Self {
        Self {
            name: name.into(),
            value,
            min,
            max,
            enabled: true,
            automatable: true,
            quantized: false,
            steps: None,
        }
    }

    /// Quantized parameter snapping to whole numbers.
    pub fn quantized(name: impl Into<String>, value: f32, min: f32, max: f32) -> Self {
        Self {
            quantized: true,
            ..Self::new(name, value, min, max)
        }
    }

    /// Quantizes to `steps` evenly spaced values across the range.
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.quantized = true;
        self.steps = Some(steps);
        self
    }

    /// Marks the parameter disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Marks the parameter non-automatable.
    pub fn not_automatable(mut self) -> Self {
        self.automatable = false;
        self
    }

    /// Nearest value the parameter can hold.
    pub fn snap(&self, value: f32) -> f32 {
        let range = ParamRange::new(self.min, self.max);
        let value = range.clamp(value);
        if !self.quantized {
            return value;
        }
        let snapped = match self.steps {
            Some(n) if n >= 2 => {
                let step = range.span() / (n - 1) as f32;
                if step == 0.0 {
                    range.min
                } else {
                    range.min + ((value - range.min) / step).round() * step
                }
            }
            Some(_) => range.min,
            None => value.round(),
        };
        range.clamp(snapped)
    }

    pub(crate) fn to_raw(&self) -> RawParameter {
        RawParameter {
            name: self.name.clone(),
            value: self.value,
            min: self.min,
            max: self.max,
            is_enabled: self.enabled,
            is_quantized: self.quantized,
            is_automatable: self.automatable,
        }
    }
}

/// Blueprint for a device inserted into a [`SimHost`](super::SimHost).
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSpec {
    /// Display name.
    pub name: String,
    /// Host class name.
    pub class_name: String,
    /// Signal-chain role.
    pub role: DeviceRole,
    /// Parameters, in index order.
    pub parameters: Vec<SimParameter>,
}

impl DeviceSpec {
    /// Built-in device with the given host class name.
    pub fn native(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            role: DeviceRole::AudioEffect,
            parameters: vec![device_on()],
        }
    }

    /// VST plugin wrapper. Plugins start with no parameters.
    pub fn plugin(name: impl Into<String>) -> Self {
        Self::plugin_of(DeviceClass::Vst, name)
    }

    /// Plugin wrapper of a specific format.
    pub fn plugin_of(class: DeviceClass, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: class.class_name().unwrap_or("PluginDevice").to_string(),
            role: DeviceRole::AudioEffect,
            parameters: Vec::new(),
        }
    }

    /// Rack with the standard parameter layout: "Device On" then "Macro 1".."Macro 8".
    pub fn rack(class: DeviceClass, name: impl Into<String>) -> Self {
        let mut parameters = vec![device_on()];
        parameters.extend(
            (1..=MACRO_COUNT).map(|i| SimParameter::new(format!("Macro {i}"), 0.0, 0.0, 1.0)),
        );
        Self {
            name: name.into(),
            class_name: class.class_name().unwrap_or("AudioEffectGroupDevice").to_string(),
            role: class.rack_role().unwrap_or_default(),
            parameters,
        }
    }

    /// Appends a parameter.
    pub fn with_parameter(mut self, parameter: SimParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends several parameters.
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = SimParameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Overrides the signal-chain role.
    pub fn with_role(mut self, role: DeviceRole) -> Self {
        self.role = role;
        self
    }

    /// Renames and re-ranges a rack macro. No-op on devices without one.
    pub fn with_macro(
        mut self,
        macro_index: MacroIndex,
        name: impl Into<String>,
        min: f32,
        max: f32,
    ) -> Self {
        if let Some(p) = self.parameters.get_mut(macro_index.default_parameter_index()) {
            p.name = name.into();
            p.min = min;
            p.max = max;
            p.value = ParamRange::new(min, max).clamp(p.value);
        }
        self
    }
}

fn device_on() -> SimParameter {
    SimParameter::quantized("Device On", 1.0, 0.0, 1.0)
}

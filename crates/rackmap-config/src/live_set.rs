//! Live-set description files.
//!
//! A set file describes a host's device tree: tracks, their devices, rack
//! chains recursively, parameters, rack macros and macro mappings. Sets are
//! loaded into a [`SimHost`] with [`LiveSet::build_host`] and read back from
//! any [`LiveHost`] with [`LiveSet::capture`].
//!
//! # TOML Format
//!
//! ```toml
//! name = "Pro-Q rack"
//! description = "Rack with one chain holding an EQ plugin"
//!
//! [[tracks]]
//! name = "Bus"
//! kind = "audio"
//!
//! [[tracks.devices]]
//! name = "EQ Rack"
//! class = "AudioEffectGroupDevice"
//!
//! [[tracks.devices.macros]]
//! index = 0
//! name = "Gain"
//!
//! [[tracks.devices.mappings]]
//! macro_index = 0
//! target = [0, 0]        # (chain, device) pairs below this rack
//! parameter = 0
//!
//! [[tracks.devices.chains]]
//! name = "Chain 1"
//!
//! [[tracks.devices.chains.devices]]
//! name = "Pro-Q 3"
//! class = "PluginDevice"
//!
//! [[tracks.devices.chains.devices.parameters]]
//! name = "Output Gain"
//! value = 0.5
//! min = 0.0
//! max = 1.0
//! ```
//!
//! Racks always get "Device On" plus eight macros ahead of any listed
//! parameters, and native devices get "Device On". Plugins expose exactly the
//! listed parameters.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use rackmap_core::sim::{Container, DeviceSpec, SimParameter};
use rackmap_core::{
    DeviceClass, DeviceHandle, DeviceId, DeviceRole, HostError, LiveHost, MACRO_COUNT,
    MacroIndex, RawMacroMapping, RawParameter, SimHost, TrackKind, subtree, track_devices,
};

use crate::error::ConfigError;
use crate::validation::{ValidationError, validate_live_set};

const DEVICE_ON: &str = "Device On";

/// A complete set description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSet {
    /// Set name.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Tracks, in order.
    #[serde(default)]
    pub tracks: Vec<TrackConfig>,
}

/// One track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    /// Track name.
    pub name: String,
    /// Audio, MIDI or return.
    #[serde(default)]
    pub kind: TrackKind,
    /// Top-level devices, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<DeviceConfig>,
}

/// One device, possibly a rack with chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Display name.
    pub name: String,
    /// Host class name, e.g. `PluginDevice` or `AudioEffectGroupDevice`.
    pub class: String,
    /// Role override; defaults follow the class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<DeviceRole>,
    /// Parameters after the standard ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterConfig>,
    /// Rack macro overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub macros: Vec<MacroConfig>,
    /// Rack macro mappings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<MappingConfig>,
    /// Rack chains.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chains: Vec<ChainConfig>,
}

/// One rack chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain name.
    pub name: String,
    /// Devices, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<DeviceConfig>,
}

/// One parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterConfig {
    /// Display name.
    pub name: String,
    /// Initial value.
    pub value: f32,
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
    /// Accepts writes.
    #[serde(default = "yes", skip_serializing_if = "is_true")]
    pub enabled: bool,
    /// Accepts automation and remote writes.
    #[serde(default = "yes", skip_serializing_if = "is_true")]
    pub automatable: bool,
    /// Discrete values only.
    #[serde(default, skip_serializing_if = "is_false")]
    pub quantized: bool,
    /// Evenly spaced step count when quantized; whole numbers otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
}

/// Override for one rack macro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroConfig {
    /// Macro index, 0-7.
    pub index: usize,
    /// Display name; defaults to "Macro N".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Lower bound.
    #[serde(default)]
    pub min: f32,
    /// Upper bound.
    #[serde(default = "one")]
    pub max: f32,
    /// Initial value.
    #[serde(default)]
    pub value: f32,
}

/// One macro mapping, relative to the rack that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Controlling macro, 0-7.
    pub macro_index: usize,
    /// `(chain, device)` pairs from the rack down to the target.
    pub target: Vec<usize>,
    /// Parameter index on the target.
    pub parameter: usize,
}

fn yes() -> bool {
    true
}

fn one() -> f32 {
    1.0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_true(b: &bool) -> bool {
    *b
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

impl LiveSet {
    /// Create an empty set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tracks: Vec::new(),
        }
    }

    /// Append a track.
    pub fn with_track(mut self, track: TrackConfig) -> Self {
        self.tracks.push(track);
        self
    }

    /// Load a set from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a set from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Convert the set to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the set to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        std::fs::write(path, self.to_toml()?).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Check the set for structural and range errors.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_live_set(self)
    }

    /// Total number of devices at every nesting level.
    pub fn device_count(&self) -> usize {
        fn count(devices: &[DeviceConfig]) -> usize {
            devices
                .iter()
                .map(|d| 1 + d.chains.iter().map(|c| count(&c.devices)).sum::<usize>())
                .sum()
        }
        self.tracks.iter().map(|t| count(&t.devices)).sum()
    }

    /// Validate the set and build a simulated host from it.
    pub fn build_host(&self) -> Result<SimHost, ConfigError> {
        self.validate()?;
        let mut host = SimHost::new();
        for track in &self.tracks {
            let t = host.add_track(&track.name, track.kind);
            for device in &track.devices {
                build_device(&mut host, Container::Track(t), device)?;
            }
        }
        tracing::debug!(
            set = %self.name,
            tracks = self.tracks.len(),
            devices = self.device_count(),
            "built host from set"
        );
        Ok(host)
    }

    /// Read the current device tree of a host back into a set description.
    ///
    /// Quantization step counts are not reported by hosts; captured quantized
    /// parameters snap to whole numbers when rebuilt.
    pub fn capture<H: LiveHost + ?Sized>(
        host: &H,
        name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let mut set = LiveSet::new(name);
        for t in 0..host.track_count()? {
            let info = host.track_info(t)?;
            let devices = track_devices(host, t)?
                .iter()
                .map(|h| capture_device(host, h))
                .collect::<Result<Vec<_>, _>>()?;
            set.tracks.push(TrackConfig {
                name: info.name,
                kind: info.kind,
                devices,
            });
        }
        Ok(set)
    }
}

impl TrackConfig {
    /// Create an empty track.
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            name: name.into(),
            kind,
            devices: Vec::new(),
        }
    }

    /// Append a device.
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.devices.push(device);
        self
    }
}

impl DeviceConfig {
    /// Create a device of the given host class.
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            role: None,
            parameters: Vec::new(),
            macros: Vec::new(),
            mappings: Vec::new(),
            chains: Vec::new(),
        }
    }

    /// Append a parameter.
    pub fn with_parameter(mut self, parameter: ParameterConfig) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append a chain.
    pub fn with_chain(mut self, chain: ChainConfig) -> Self {
        self.chains.push(chain);
        self
    }

    /// Append a macro override.
    pub fn with_macro(mut self, macro_config: MacroConfig) -> Self {
        self.macros.push(macro_config);
        self
    }

    /// Append a macro mapping.
    pub fn with_mapping(mut self, mapping: MappingConfig) -> Self {
        self.mappings.push(mapping);
        self
    }

    /// Parsed host class.
    pub fn device_class(&self) -> DeviceClass {
        DeviceClass::from_class_name(&self.class)
    }

    /// Number of parameters the built device exposes.
    pub fn built_parameter_count(&self) -> usize {
        standard_parameter_count(self.device_class()) + self.parameters.len()
    }
}

impl ChainConfig {
    /// Create an empty chain.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            devices: Vec::new(),
        }
    }

    /// Append a device.
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.devices.push(device);
        self
    }
}

impl ParameterConfig {
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

    fn to_sim(&self) -> SimParameter {
        SimParameter {
            name: self.name.clone(),
            value: self.value,
            min: self.min,
            max: self.max,
            enabled: self.enabled,
            automatable: self.automatable,
            quantized: self.quantized || self.steps.is_some(),
            steps: self.steps,
        }
    }

    fn from_raw(raw: &RawParameter) -> Self {
        Self {
            name: raw.name.clone(),
            value: raw.value,
            min: raw.min,
            max: raw.max,
            enabled: raw.is_enabled,
            automatable: raw.is_automatable,
            quantized: raw.is_quantized,
            steps: None,
        }
    }
}

impl MacroConfig {
    fn default_name(index: usize) -> String {
        format!("Macro {}", index + 1)
    }

    fn is_default(&self) -> bool {
        self.name.is_none() && self.min == 0.0 && self.max == 1.0 && self.value == 0.0
    }
}

/// Parameters every device of this class carries ahead of its own.
fn standard_parameter_count(class: DeviceClass) -> usize {
    if class.is_rack() {
        1 + MACRO_COUNT
    } else if class.is_plugin() {
        0
    } else {
        1
    }
}

fn default_role(class: DeviceClass) -> DeviceRole {
    class.rack_role().unwrap_or(DeviceRole::AudioEffect)
}

fn build_device(
    host: &mut SimHost,
    container: Container,
    config: &DeviceConfig,
) -> Result<DeviceId, ConfigError> {
    let class = config.device_class();
    let mut spec = if class.is_rack() {
        DeviceSpec::rack(class, &config.name)
    } else if class.is_plugin() {
        DeviceSpec::plugin_of(class, &config.name)
    } else {
        DeviceSpec::native(&config.class, &config.name)
    };
    spec = spec.with_role(config.role.unwrap_or(default_role(class)));

    for m in &config.macros {
        let index = MacroIndex::new(m.index).map_err(|_| ValidationError::InvalidMacroIndex {
            device: config.name.clone(),
            index: m.index,
        })?;
        let name = m.name.clone().unwrap_or_else(|| MacroConfig::default_name(m.index));
        spec = spec.with_macro(index, name, m.min, m.max);
        if let Some(p) = spec.parameters.get_mut(index.default_parameter_index()) {
            p.value = m.value;
        }
    }
    spec = spec.with_parameters(config.parameters.iter().map(ParameterConfig::to_sim));

    let id = host.push_device(container, spec)?;
    for chain in &config.chains {
        let chain_id = host.add_chain(id, &chain.name)?;
        for device in &chain.devices {
            build_device(host, Container::Chain(chain_id), device)?;
        }
    }
    for mapping in &config.mappings {
        let macro_index =
            MacroIndex::new(mapping.macro_index).map_err(|_| ValidationError::InvalidMacroIndex {
                device: config.name.clone(),
                index: mapping.macro_index,
            })?;
        let target = walk(host, id, &mapping.target)?;
        host.add_macro_mapping(
            id,
            RawMacroMapping {
                macro_index,
                target,
                parameter_index: mapping.parameter,
            },
        )?;
    }
    Ok(id)
}

/// Follows `(chain, device)` pairs down from a rack.
fn walk(host: &SimHost, rack: DeviceId, path: &[usize]) -> Result<DeviceId, HostError> {
    let mut current = rack;
    for pair in path.chunks(2) {
        let [chain, device] = pair else {
            return Err(HostError::rejected(format!("odd mapping path {path:?}")));
        };
        let chains = host.device_chains(current)?;
        let chain_id = chains
            .get(*chain)
            .ok_or_else(|| HostError::rejected(format!("no chain {chain} in {current}")))?;
        let devices = host.chain_devices(*chain_id)?;
        current = *devices
            .get(*device)
            .ok_or_else(|| HostError::rejected(format!("no device {device} in {chain_id}")))?;
    }
    Ok(current)
}

fn capture_device<H: LiveHost + ?Sized>(
    host: &H,
    handle: &DeviceHandle,
) -> Result<DeviceConfig, ConfigError> {
    let class = handle.class();
    let params = host.parameters(handle.id())?;
    let mut config = DeviceConfig::new(handle.class_name(), handle.name());
    if handle.role() != default_role(class) {
        config.role = Some(handle.role());
    }

    let mut standard = vec![false; params.len()];
    if !class.is_plugin() && params.first().is_some_and(|p| p.name == DEVICE_ON) {
        standard[0] = true;
    }
    if handle.is_rack() {
        for index in MacroIndex::all() {
            let pi = host.macro_parameter_index(handle.id(), index);
            let Some(p) = params.get(pi) else { continue };
            standard[pi] = true;
            let name = (p.name != MacroConfig::default_name(index.get())).then(|| p.name.clone());
            let macro_config = MacroConfig {
                index: index.get(),
                name,
                min: p.min,
                max: p.max,
                value: p.value,
            };
            if !macro_config.is_default() {
                config.macros.push(macro_config);
            }
        }
    }
    config.parameters = params
        .iter()
        .zip(&standard)
        .filter(|(_, is_standard)| !**is_standard)
        .map(|(p, _)| ParameterConfig::from_raw(p))
        .collect();

    if handle.is_rack() {
        let nested = subtree(host, handle)?;
        let by_id: HashMap<DeviceId, &DeviceHandle> = nested.iter().map(|h| (h.id(), h)).collect();
        for raw in host.macro_mappings(handle.id())? {
            let Some(target) = by_id.get(&raw.target) else {
                tracing::warn!(rack = %handle.address(), target = %raw.target, "not capturing stale mapping");
                continue;
            };
            let Some(steps) = target.address().relative_to(handle.address()) else {
                continue;
            };
            config.mappings.push(MappingConfig {
                macro_index: raw.macro_index.get(),
                target: steps.iter().flat_map(|s| [s.chain, s.device]).collect(),
                parameter: raw.parameter_index,
            });
        }

        for (c, chain_id) in host.device_chains(handle.id())?.into_iter().enumerate() {
            let chain = host.chain(chain_id)?;
            let devices = nested
                .iter()
                .filter(|h| {
                    h.address().parent().as_ref() == Some(handle.address())
                        && h.address().steps().last().is_some_and(|s| s.chain == c)
                })
                .map(|h| capture_device(host, h))
                .collect::<Result<Vec<_>, _>>()?;
            config.chains.push(ChainConfig {
                name: chain.name,
                devices,
            });
        }
    }
    Ok(config)
}

//! In-memory host.
//!
//! [`SimHost`] implements [`LiveHost`] over an id-indexed device table. It
//! behaves the way the engine expects a real host to:
//!
//! - object ids are stable until the object is removed, then go stale
//! - quantized writes snap to the nearest allowed value
//! - writing a rack macro propagates to every mapped target, scaled linearly
//!   from the macro range into the target range
//! - a parameter is controlled by at most one macro per rack; mapping it to a
//!   second macro moves it
//! - removing a device, or moving it out of the rack, leaves mappings that
//!   point at it in place; they stop resolving and macro writes skip them
//! - [`set_offline`](SimHost::set_offline) makes every call fail with
//!   [`HostError::HostUnavailable`]
//!
//! # Example
//!
//! ```rust
//! use rackmap_core::{DeviceClass, LiveHost, SimHost, TrackKind};
//! use rackmap_core::sim::{Container, DeviceSpec, SimParameter};
//!
//! let mut host = SimHost::new();
//! let t = host.add_track("Drums", TrackKind::Midi);
//! let rack = host.push_device(Container::Track(t), DeviceSpec::rack(DeviceClass::DrumRack, "Kit"))?;
//! let chain = host.add_chain(rack, "Kick")?;
//! let comp = host.push_device(
//!     Container::Chain(chain),
//!     DeviceSpec::native("Compressor2", "Compressor")
//!         .with_parameter(SimParameter::new("Threshold", 0.0, -60.0, 0.0)),
//! )?;
//! assert_eq!(host.parameters(comp)?.len(), 2);
//! # Ok::<(), rackmap_core::HostError>(())
//! ```

mod builder;

pub use builder::{DeviceSpec, SimParameter};

use std::collections::BTreeMap;

use crate::classify::DeviceClass;
use crate::error::HostError;
use crate::host::{
    ChainId, DeviceId, HostResult, LiveHost, RawChain, RawDevice, RawMacroMapping, RawParameter,
    TrackInfo, TrackKind,
};
use crate::macro_slot::{MACRO_PARAMETER_OFFSET, MacroIndex};
use crate::scale::{ParamRange, ValueScale};

/// Where a device lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Top level of a track, by track index.
    Track(usize),
    /// Inside a rack chain.
    Chain(ChainId),
}

#[derive(Debug, Clone)]
struct SimTrack {
    info: TrackInfo,
    devices: Vec<DeviceId>,
}

#[derive(Debug, Clone)]
struct SimDevice {
    spec: DeviceSpec,
    parent: Container,
    chains: Vec<ChainId>,
    mappings: Vec<RawMacroMapping>,
}

#[derive(Debug, Clone)]
struct SimChain {
    name: String,
    rack: DeviceId,
    devices: Vec<DeviceId>,
}

/// In-memory, single-threaded [`LiveHost`].
#[derive(Debug, Clone, Default)]
pub struct SimHost {
    tracks: Vec<SimTrack>,
    devices: BTreeMap<DeviceId, SimDevice>,
    chains: BTreeMap<ChainId, SimChain>,
    next_id: u64,
    offline: Option<String>,
    writes: usize,
}

impl SimHost {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a track and returns its index.
    pub fn add_track(&mut self, name: impl Into<String>, kind: TrackKind) -> usize {
        self.tracks.push(SimTrack {
            info: TrackInfo {
                name: name.into(),
                kind,
                mute: false,
                solo: false,
                arm: false,
                volume: 0.85,
                pan: 0.0,
            },
            devices: Vec::new(),
        });
        self.tracks.len() - 1
    }

    /// Inserts a device at `position` in a container.
    pub fn insert_device(
        &mut self,
        container: Container,
        position: usize,
        spec: DeviceSpec,
    ) -> HostResult<DeviceId> {
        let id = DeviceId(self.alloc_id());
        let list = self.container_mut(container)?;
        if position > list.len() {
            return Err(HostError::rejected(format!(
                "position {position} past end of container with {} device(s)",
                list.len()
            )));
        }
        list.insert(position, id);
        self.devices.insert(
            id,
            SimDevice {
                spec,
                parent: container,
                chains: Vec::new(),
                mappings: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Appends a device to a container.
    pub fn push_device(&mut self, container: Container, spec: DeviceSpec) -> HostResult<DeviceId> {
        let len = self.container_mut(container)?.len();
        self.insert_device(container, len, spec)
    }

    /// Appends a chain to a rack.
    pub fn add_chain(&mut self, rack: DeviceId, name: impl Into<String>) -> HostResult<ChainId> {
        let class = DeviceClass::from_class_name(&self.device_ref(rack)?.spec.class_name);
        if !class.is_rack() {
            return Err(HostError::rejected(format!("{rack} is not a rack")));
        }
        let id = ChainId(self.alloc_id());
        self.chains.insert(
            id,
            SimChain {
                name: name.into(),
                rack,
                devices: Vec::new(),
            },
        );
        self.device_mut(rack)?.chains.push(id);
        Ok(id)
    }

    /// Removes a device and everything nested inside it.
    ///
    /// Mappings elsewhere that target the removed devices are left dangling.
    pub fn remove_device(&mut self, id: DeviceId) -> HostResult<()> {
        let parent = self.device_ref(id)?.parent;
        self.container_mut(parent)?.retain(|d| *d != id);
        self.drop_subtree(id);
        Ok(())
    }

    /// Moves a device to `position` in another (or the same) container.
    pub fn move_device(
        &mut self,
        id: DeviceId,
        container: Container,
        position: usize,
    ) -> HostResult<()> {
        if let Container::Chain(chain) = container {
            let rack = self.chain_ref(chain)?.rack;
            if rack == id || self.is_descendant(rack, id) {
                return Err(HostError::rejected(format!("cannot move {id} into itself")));
            }
        }
        let old = self.device_ref(id)?.parent;
        self.container_mut(container)?;
        self.container_mut(old)?.retain(|d| *d != id);
        let list = self.container_mut(container)?;
        let position = position.min(list.len());
        list.insert(position, id);
        self.device_mut(id)?.parent = container;
        Ok(())
    }

    /// Takes the host offline (`Some(reason)`) or back online (`None`).
    pub fn set_offline(&mut self, reason: Option<&str>) {
        self.offline = reason.map(str::to_string);
    }

    /// Number of `write_parameter` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn online(&self) -> HostResult<()> {
        match &self.offline {
            Some(reason) => Err(HostError::unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn device_ref(&self, id: DeviceId) -> HostResult<&SimDevice> {
        self.devices
            .get(&id)
            .ok_or_else(|| HostError::stale(id.to_string()))
    }

    fn device_mut(&mut self, id: DeviceId) -> HostResult<&mut SimDevice> {
        self.devices
            .get_mut(&id)
            .ok_or_else(|| HostError::stale(id.to_string()))
    }

    fn chain_ref(&self, id: ChainId) -> HostResult<&SimChain> {
        self.chains
            .get(&id)
            .ok_or_else(|| HostError::stale(id.to_string()))
    }

    fn container_mut(&mut self, container: Container) -> HostResult<&mut Vec<DeviceId>> {
        match container {
            Container::Track(t) => self
                .tracks
                .get_mut(t)
                .map(|t| &mut t.devices)
                .ok_or_else(|| HostError::stale(format!("track {t}"))),
            Container::Chain(c) => self
                .chains
                .get_mut(&c)
                .map(|c| &mut c.devices)
                .ok_or_else(|| HostError::stale(c.to_string())),
        }
    }

    fn drop_subtree(&mut self, id: DeviceId) {
        let Some(device) = self.devices.remove(&id) else {
            return;
        };
        for chain in device.chains {
            if let Some(chain) = self.chains.remove(&chain) {
                for child in chain.devices {
                    self.drop_subtree(child);
                }
            }
        }
    }

    /// True if `id` sits somewhere inside `rack`'s chains.
    fn is_descendant(&self, id: DeviceId, rack: DeviceId) -> bool {
        let mut current = id;
        while let Some(device) = self.devices.get(&current) {
            match device.parent {
                Container::Track(_) => return false,
                Container::Chain(c) => match self.chains.get(&c) {
                    Some(chain) if chain.rack == rack => return true,
                    Some(chain) => current = chain.rack,
                    None => return false,
                },
            }
        }
        false
    }

    fn macro_of(&self, rack: DeviceId, index: usize) -> Option<MacroIndex> {
        let device = self.devices.get(&rack)?;
        if !DeviceClass::from_class_name(&device.spec.class_name).is_rack() {
            return None;
        }
        index
            .checked_sub(MACRO_PARAMETER_OFFSET)
            .and_then(|m| MacroIndex::new(m).ok())
    }

    /// Stores a value and fans macro changes out to mapped targets.
    fn store(&mut self, id: DeviceId, index: usize, value: f32) -> HostResult<f32> {
        let device = self.device_mut(id)?;
        let param = device
            .spec
            .parameters
            .get_mut(index)
            .ok_or_else(|| HostError::stale(format!("parameter {index} of {id}")))?;
        let stored = param.snap(value);
        param.value = stored;
        let source = ParamRange::new(param.min, param.max);

        if let Some(macro_index) = self.macro_of(id, index) {
            let targets: Vec<RawMacroMapping> = self.device_ref(id)?
                .mappings
                .iter()
                .filter(|m| m.macro_index == macro_index)
                .copied()
                .collect();
            for mapping in targets {
                // Targets only ever sit strictly below the rack, so fan-out
                // always descends and terminates.
                if !self.is_descendant(mapping.target, id) {
                    continue;
                }
                let Some(target) = self
                    .devices
                    .get(&mapping.target)
                    .and_then(|d| d.spec.parameters.get(mapping.parameter_index))
                else {
                    continue;
                };
                if !(target.enabled && target.automatable) {
                    continue;
                }
                let scale = ValueScale::linear(source, ParamRange::new(target.min, target.max));
                self.store(mapping.target, mapping.parameter_index, scale.apply(stored))?;
            }
        }
        Ok(stored)
    }
}

impl LiveHost for SimHost {
    fn track_count(&self) -> HostResult<usize> {
        self.online()?;
        Ok(self.tracks.len())
    }

    fn track_info(&self, track: usize) -> HostResult<TrackInfo> {
        self.online()?;
        self.tracks
            .get(track)
            .map(|t| t.info.clone())
            .ok_or_else(|| HostError::stale(format!("track {track}")))
    }

    fn track_devices(&self, track: usize) -> HostResult<Vec<DeviceId>> {
        self.online()?;
        self.tracks
            .get(track)
            .map(|t| t.devices.clone())
            .ok_or_else(|| HostError::stale(format!("track {track}")))
    }

    fn device(&self, id: DeviceId) -> HostResult<RawDevice> {
        self.online()?;
        let device = self.device_ref(id)?;
        Ok(RawDevice {
            id,
            name: device.spec.name.clone(),
            class_name: device.spec.class_name.clone(),
            role: device.spec.role,
        })
    }

    fn device_chains(&self, id: DeviceId) -> HostResult<Vec<ChainId>> {
        self.online()?;
        Ok(self.device_ref(id)?.chains.clone())
    }

    fn chain(&self, id: ChainId) -> HostResult<RawChain> {
        self.online()?;
        Ok(RawChain {
            id,
            name: self.chain_ref(id)?.name.clone(),
        })
    }

    fn chain_devices(&self, id: ChainId) -> HostResult<Vec<DeviceId>> {
        self.online()?;
        Ok(self.chain_ref(id)?.devices.clone())
    }

    fn parameters(&self, id: DeviceId) -> HostResult<Vec<RawParameter>> {
        self.online()?;
        Ok(self
            .device_ref(id)?
            .spec
            .parameters
            .iter()
            .map(SimParameter::to_raw)
            .collect())
    }

    fn write_parameter(&mut self, id: DeviceId, index: usize, value: f32) -> HostResult<f32> {
        self.online()?;
        let param = self
            .device_ref(id)?
            .spec
            .parameters
            .get(index)
            .ok_or_else(|| HostError::stale(format!("parameter {index} of {id}")))?;
        if !(param.enabled && param.automatable) {
            return Err(HostError::rejected(format!(
                "parameter {index} of {id} is read-only"
            )));
        }
        self.writes += 1;
        self.store(id, index, value)
    }

    fn macro_mappings(&self, rack: DeviceId) -> HostResult<Vec<RawMacroMapping>> {
        self.online()?;
        Ok(self.device_ref(rack)?.mappings.clone())
    }

    fn add_macro_mapping(&mut self, rack: DeviceId, mapping: RawMacroMapping) -> HostResult<()> {
        self.online()?;
        let class = DeviceClass::from_class_name(&self.device_ref(rack)?.spec.class_name);
        if !class.is_rack() {
            return Err(HostError::rejected(format!("{rack} is not a rack")));
        }
        if !self.is_descendant(mapping.target, rack) {
            return Err(HostError::rejected(format!(
                "{} is not inside {rack}",
                mapping.target
            )));
        }
        let count = self.device_ref(mapping.target)?.spec.parameters.len();
        if mapping.parameter_index >= count {
            return Err(HostError::rejected(format!(
                "{} has no parameter {}",
                mapping.target, mapping.parameter_index
            )));
        }
        let mappings = &mut self.device_mut(rack)?.mappings;
        mappings.retain(|m| {
            m.target != mapping.target || m.parameter_index != mapping.parameter_index
        });
        mappings.push(mapping);
        Ok(())
    }

    fn remove_macro_mapping(
        &mut self,
        rack: DeviceId,
        mapping: &RawMacroMapping,
    ) -> HostResult<bool> {
        self.online()?;
        let mappings = &mut self.device_mut(rack)?.mappings;
        let before = mappings.len();
        mappings.retain(|m| m != mapping);
        Ok(mappings.len() != before)
    }
}

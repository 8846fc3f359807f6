//! Rack macro mapping engine.
//!
//! Racks carry eight macro controls. Each macro can drive any number of
//! parameters on devices nested inside the rack's own chains; each binding
//! is an independent directed edge from one macro to one target parameter.
//! This crate creates, inspects and removes those bindings through the
//! host's native mapping mechanism, and reports the linear value scale the
//! host applies from the macro range into each target range.
//!
//! Controlling a mapped plugin afterwards is a plain parameter write on the
//! rack's macro ([`set_macro`]); the host fans it out.
//!
//! # Preconditions
//!
//! Checked in this order, first failure wins:
//!
//! 1. the handle is a rack ([`AddressError::NotARack`](rackmap_core::AddressError::NotARack))
//! 2. the macro index is in `0..=7` ([`MacroError::InvalidMacroIndex`](rackmap_core::MacroError::InvalidMacroIndex))
//! 3. the target lies inside the rack ([`MacroError::TargetOutsideRack`](rackmap_core::MacroError::TargetOutsideRack))
//! 4. the target resolves and the parameter exists
//!
//! # Example
//!
//! ```rust
//! use rackmap_core::sim::{Container, DeviceSpec, SimParameter};
//! use rackmap_core::{resolve, Address, DeviceClass, ParamSelector, SimHost, TrackKind};
//! use rackmap_macros::{list_mappings, map, set_macro};
//!
//! let mut host = SimHost::new();
//! let t = host.add_track("Bus", TrackKind::Audio);
//! let rack = host.push_device(Container::Track(t), DeviceSpec::rack(DeviceClass::AudioEffectRack, "FX")).unwrap();
//! let chain = host.add_chain(rack, "Chain 1").unwrap();
//! host.push_device(
//!     Container::Chain(chain),
//!     DeviceSpec::plugin("Pro-Q 3").with_parameter(SimParameter::new("Output Gain", 0.0, 0.0, 1.0)),
//! ).unwrap();
//!
//! let rack = resolve(&host, &Address::new(0, 0)).unwrap();
//! let target = Address::new(0, 0).with_chain(0, 0);
//! map(&mut host, &rack, 0, &target, &ParamSelector::Index(0)).unwrap();
//! assert_eq!(list_mappings(&host, &rack).unwrap().len(), 1);
//!
//! set_macro(&mut host, &rack, 0, 0.8).unwrap();
//! ```

mod engine;
mod mapping;

pub use engine::{
    list_mappings, macro_parameter, macro_slots, map, prune_stale_mappings, set_macro, unmap,
};
pub use mapping::{MacroMapping, MacroSlot, MacroTable};

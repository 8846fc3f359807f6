//! rackmap core - device-tree addressing for DAW-hosted devices
//!
//! This crate holds the pieces every other rackmap crate builds on: the data
//! model for addresses and parameters, the device classifier, the error
//! taxonomy, the [`LiveHost`] interface to the host's object model, and the
//! device-tree resolver that turns an [`Address`] into a [`DeviceHandle`].
//!
//! # Core Abstractions
//!
//! ## Addressing
//!
//! - [`Address`] - `track, device` followed by zero or more `(chain, device)` pairs
//! - [`resolve()`] - walks an address through tracks, racks and chains
//! - [`DeviceHandle`] - transient, kind-tagged reference to a resolved device
//!
//! ## Parameters
//!
//! - [`ParameterDescriptor`] - normalized view of one host parameter
//! - [`ParamSelector`] - select a parameter by index or exact name
//! - [`ValueScale`] - linear translation between two [`ParamRange`]s
//!
//! ## Devices
//!
//! - [`DeviceKind`] - closed `native | plugin | rack` tag
//! - [`DeviceClass`] - host-reported device type
//! - [`classify()`] - pure mapping from host type to [`DeviceKind`]
//!
//! ## Host
//!
//! - [`LiveHost`] - everything the engine consumes from the host
//! - [`SimHost`] - in-memory host used by tests, fixtures and the CLI
//!
//! # Statelessness
//!
//! Nothing in this crate caches host state. Every query goes back to the
//! host, so structural edits between calls surface as
//! [`AddressError`]/[`HostError::StaleHandle`] instead of dangling references.
//!
//! # Example
//!
//! ```rust
//! use rackmap_core::{resolve, Address, DeviceKind, SimHost, TrackKind};
//! use rackmap_core::sim::{Container, DeviceSpec};
//! use rackmap_core::DeviceClass;
//!
//! let mut host = SimHost::new();
//! let track = host.add_track("Bus", TrackKind::Audio);
//! let rack = host
//!     .push_device(Container::Track(track), DeviceSpec::rack(DeviceClass::AudioEffectRack, "FX Rack"))
//!     .unwrap();
//! let chain = host.add_chain(rack, "Chain 1").unwrap();
//! host.push_device(Container::Chain(chain), DeviceSpec::plugin("Pro-Q 3")).unwrap();
//!
//! let handle = resolve(&host, &Address::new(0, 0).with_chain(0, 0)).unwrap();
//! assert_eq!(handle.kind(), DeviceKind::Plugin);
//! assert_eq!(handle.name(), "Pro-Q 3");
//! ```

pub mod address;
pub mod classify;
pub mod error;
pub mod host;
pub mod macro_slot;
pub mod param;
pub mod resolve;
pub mod scale;
pub mod sim;

pub use address::{Address, ChainStep};
pub use classify::{DeviceClass, DeviceKind, DeviceRole, classify};
pub use error::{AddressError, HostError, MacroError, ParameterError, RackError, Result};
pub use host::{
    ChainId, DeviceId, HostResult, LiveHost, RawChain, RawDevice, RawMacroMapping, RawParameter,
    TrackInfo, TrackKind,
};
pub use macro_slot::{MACRO_COUNT, MACRO_PARAMETER_OFFSET, MacroIndex};
pub use param::{ParamSelector, ParameterDescriptor};
pub use resolve::{
    ChainHandle, DeviceHandle, chain_devices, resolve, resolve_chain, subtree, track_devices,
};
pub use scale::{ParamRange, ValueScale};
pub use sim::SimHost;

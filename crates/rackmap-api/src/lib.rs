//! Transport-agnostic tool surface for rackmap.
//!
//! Automation clients send one JSON envelope per call and get one back:
//!
//! ```text
//! -> {"type": "get_rack_chain_devices", "params": {"track_index": 0, "device_index": 0}}
//! <- {"status": "success", "result": {"rack_name": "EQ Rack", ...}}
//! <- {"status": "error", "message": "chain_index 2 invalid: rack has 1 chain(s)", "code": "chain_not_found"}
//! ```
//!
//! Framing, sockets and authentication belong to the caller; this crate only
//! turns a request into engine calls against a [`LiveHost`](rackmap_core::LiveHost).
//! Every call re-resolves its addresses, so nothing is cached between calls.
//!
//! # Tools
//!
//! | tool | params |
//! |---|---|
//! | `get_session_info` | |
//! | `get_track_info` | `track_index` |
//! | `get_device_parameters` | `track_index`, `device_index` |
//! | `set_device_parameter` | `track_index`, `device_index`, then `parameter_name` or `parameter_index` with `value`, or a `parameters` list |
//! | `get_rack_chain_devices` | `track_index`, `device_index`, `chain_index` (default 0) |
//! | `get_rack_chain_device_parameters` | `track_index`, `device_index`, `chain_index`, `chain_device_index` |
//! | `get_parameters_at` | `address` (flat selector list) |
//! | `set_parameter_at` | `address`, `parameter_name` or `parameter_index`, `value` |
//! | `map_parameter_to_macro` | `track_index`, `device_index`, `chain_index`, `chain_device_index`, `parameter_index`, `macro_index` |
//! | `unmap_parameter_from_macro` | same as `map_parameter_to_macro` |
//! | `get_rack_macro_mappings` | `track_index`, `device_index` |
//!
//! # Example
//!
//! ```rust
//! use rackmap_core::sim::{Container, DeviceSpec, SimParameter};
//! use rackmap_core::{SimHost, TrackKind};
//! use rackmap_api::handle_json;
//!
//! let mut host = SimHost::new();
//! let t = host.add_track("Bus", TrackKind::Audio);
//! host.push_device(
//!     Container::Track(t),
//!     DeviceSpec::plugin("Pro-Q 3").with_parameter(SimParameter::new("Output Gain", 0.5, 0.0, 1.0)),
//! ).unwrap();
//!
//! let resp = handle_json(
//!     &mut host,
//!     r#"{"type":"set_device_parameter","params":{"track_index":0,"device_index":0,"parameter_name":"Output Gain","value":0.8}}"#,
//! );
//! assert!(resp.is_success());
//! ```

mod dispatch;
mod error;
mod request;
mod response;

pub use dispatch::{dispatch, handle_json};
pub use error::ApiError;
pub use request::{Envelope, Request, TOOL_NAMES, Writes};
pub use response::{
    BatchEntry, BatchSet, ChainDevices, DeviceSummary, MacroEntry, MacroMapped, MacroTarget,
    MacroUnmapped, ParameterSet, RackMacros, Response, SessionInfo, TrackDetails, TrackOverview,
};

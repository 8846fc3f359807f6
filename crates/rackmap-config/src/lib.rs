//! Configuration and set management for rackmap.
//!
//! # Features
//!
//! - **Engine config**: `config.toml` with host, logging and output sections
//! - **Live sets**: TOML descriptions of a host's device tree, built into a
//!   simulated host or captured back from a running one
//! - **Validation**: Range, macro and mapping-target checks before a set is built
//! - **Paths**: Platform-specific config and set directories
//! - **Factory sets**: Built-in sets for trying tools out
//!
//! # Example
//!
//! ```rust
//! use rackmap_config::{LiveSet, load_set};
//! use rackmap_core::{Address, resolve};
//!
//! let set = load_set("pro-q-rack").unwrap();
//! let host = set.build_host().unwrap();
//! let eq = resolve(&host, &Address::new(0, 0).with_chain(0, 0)).unwrap();
//! assert_eq!(eq.name(), "Pro-Q 3");
//!
//! let captured = LiveSet::capture(&host, "snapshot").unwrap();
//! assert_eq!(captured.tracks.len(), set.tracks.len());
//! ```

mod engine_config;
mod error;
mod live_set;

pub mod factory_sets;
pub mod paths;
pub mod validation;

pub use engine_config::{EngineConfig, HostConfig, LoggingConfig, OutputConfig};
pub use error::{ConfigError, FileOp};
pub use factory_sets::{
    FACTORY_SET_NAMES, factory_set_names, factory_sets, get_factory_set, is_factory_set,
};
pub use live_set::{
    ChainConfig, DeviceConfig, LiveSet, MacroConfig, MappingConfig, ParameterConfig, TrackConfig,
};
pub use paths::{config_file, find_set, list_user_sets, user_config_dir, user_sets_dir};
pub use validation::{ValidationError, ValidationResult, validate_live_set};

/// Load a set by path, by name in the user sets directory, or by factory name.
///
/// Files win over factory sets of the same name.
pub fn load_set(name: &str) -> Result<LiveSet, ConfigError> {
    if let Some(path) = paths::find_set(name) {
        tracing::debug!(path = %path.display(), "loading set file");
        return LiveSet::load(path);
    }
    get_factory_set(name).ok_or_else(|| ConfigError::SetNotFound(name.to_string()))
}

//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use anyhow::Context as _;
use rackmap_config::{EngineConfig, LiveSet, load_set};
use rackmap_core::SimHost;

/// Set loaded when neither `--set` nor the config names one.
pub const DEFAULT_SET: &str = "empty";

/// Settings shared by every command.
pub struct Context {
    /// Loaded engine config.
    pub config: EngineConfig,
    /// `--set` override.
    set: Option<String>,
    /// `--pretty` override.
    pretty: bool,
}

impl Context {
    pub fn new(config: EngineConfig, set: Option<String>, pretty: bool) -> Self {
        Self {
            config,
            set,
            pretty,
        }
    }

    /// Set name from `--set`, then `[host] set`, then the default.
    pub fn set_name(&self) -> &str {
        self.set
            .as_deref()
            .or(self.config.host.set.as_deref())
            .unwrap_or(DEFAULT_SET)
    }

    /// Pretty output from `--pretty` or `[output] pretty`.
    pub fn pretty(&self) -> bool {
        self.pretty || self.config.output.pretty
    }

    /// Load the selected set and build a host from it.
    pub fn open_host(&self) -> anyhow::Result<(LiveSet, SimHost)> {
        let name = self.set_name();
        let set = load_set(name).with_context(|| {
            format!("Set '{name}' not found. Use 'rackmap sets list' to see available sets.")
        })?;
        let host = set
            .build_host()
            .with_context(|| format!("failed to build set '{}'", set.name))?;
        tracing::info!(set = %set.name, tracks = set.tracks.len(), "set loaded");
        Ok((set, host))
    }
}

/// Capture the host's current state and write it as a set file.
pub fn save_host(host: &SimHost, name: &str, path: &Path) -> anyhow::Result<()> {
    LiveSet::capture(host, name)?
        .save(path)
        .with_context(|| format!("failed to save set to {}", path.display()))?;
    tracing::info!(path = %path.display(), "set saved");
    Ok(())
}

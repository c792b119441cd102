// src/host/mod.rs

//! Host-side wiring around the supervision primitives.
//!
//! - [`registry`]: tools registered from configuration.
//! - [`reconfigure`]: the reload hook handed to the
//!   [`ReloadSupervisor`](crate::watch::ReloadSupervisor).
//! - [`status`]: how a tool run is rendered to the user.

pub mod reconfigure;
pub mod registry;
pub mod status;

use std::path::Path;

use anyhow::Result;

use crate::bridge::BridgeOptions;
use crate::config::ConfigFile;
use crate::watch::{SupervisorOptions, WatchSet};

pub use reconfigure::{HostState, Reconfigure};
pub use registry::{RegistryDiff, ToolRegistry, ToolSpec};
pub use status::Status;

/// Build the watch set from `[watch]`, resolving relative paths against
/// `root` (the config file's directory).
pub fn watch_set_from_config(cfg: &ConfigFile, root: &Path) -> Result<WatchSet> {
    let section = cfg.watch_section();
    let paths: Vec<_> = section.paths.iter().map(|p| root.join(p)).collect();
    WatchSet::from_paths(&paths, &section.patterns)
}

pub fn supervisor_options(cfg: &ConfigFile) -> SupervisorOptions {
    SupervisorOptions {
        quiescence: cfg.quiescence(),
        env_suffix: cfg.watch_section().env_file.clone(),
    }
}

pub fn bridge_options(cfg: &ConfigFile, tool: &ToolSpec) -> BridgeOptions {
    BridgeOptions {
        poll_interval: cfg.poll_interval(),
        timeout: tool.timeout,
    }
}

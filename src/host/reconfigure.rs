// src/host/reconfigure.rs

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::config::{load_and_validate, ConfigFile};
use crate::host::registry::ToolRegistry;

/// Configuration plus the tools registered from it.
#[derive(Debug, Clone)]
pub struct HostState {
    pub config: ConfigFile,
    pub registry: ToolRegistry,
}

impl HostState {
    pub fn new(config: ConfigFile) -> Result<Self> {
        let registry = ToolRegistry::from_config(&config)?;
        Ok(Self { config, registry })
    }
}

/// The reload hook: re-read the config file and re-register tools.
///
/// Cheap to clone; every clone shares the same state.
#[derive(Debug, Clone)]
pub struct Reconfigure {
    config_path: PathBuf,
    state: Arc<RwLock<HostState>>,
}

impl Reconfigure {
    pub fn new(config_path: impl Into<PathBuf>, state: HostState) -> Self {
        Self {
            config_path: config_path.into(),
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn state(&self) -> Arc<RwLock<HostState>> {
        Arc::clone(&self.state)
    }

    /// Load, validate and apply the config. A config that fails to load
    /// leaves the previous state in place.
    pub fn reload(&self) -> Result<()> {
        let config = load_and_validate(&self.config_path)?;

        let mut state = self
            .state
            .write()
            .map_err(|_| anyhow!("host state lock poisoned"))?;

        let diff = state.registry.replace_from(&config)?;
        if watch_settings_changed(&state.config, &config) {
            warn!("[watch] settings changed; restart cait to apply them");
        }
        state.config = config;

        info!(
            generation = state.registry.generation(),
            tools = ?state.registry.names().collect::<Vec<_>>(),
            added = ?diff.added,
            removed = ?diff.removed,
            changed = ?diff.changed,
            "tools re-registered"
        );
        Ok(())
    }
}

fn watch_settings_changed(old: &ConfigFile, new: &ConfigFile) -> bool {
    let (a, b) = (old.watch_section(), new.watch_section());
    a.paths != b.paths
        || a.patterns != b.patterns
        || a.env_file != b.env_file
        || old.quiescence() != new.quiescence()
}

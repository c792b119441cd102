// src/host/registry.rs

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::ConfigFile;
use crate::exec::CommandWork;

/// A tool the host can run through the progress bridge.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub cmd: String,
    pub description: Option<String>,
    pub timeout: Option<Duration>,
    pub progress_filter: Option<Regex>,
}

impl ToolSpec {
    /// Blocking work for one run of this tool.
    pub fn work(&self) -> CommandWork {
        let work = CommandWork::new(&self.name, &self.cmd);
        match &self.progress_filter {
            Some(re) => work.with_progress_filter(re.clone()),
            None => work,
        }
    }

    fn same_definition(&self, other: &ToolSpec) -> bool {
        self.cmd == other.cmd
            && self.description == other.description
            && self.timeout == other.timeout
            && self.progress_filter.as_ref().map(Regex::as_str)
                == other.progress_filter.as_ref().map(Regex::as_str)
    }
}

/// Names affected by a re-registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl RegistryDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// The set of tools currently registered with the host.
///
/// Rebuilt from configuration on every accepted reload; `generation` counts
/// how many times that has happened.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolSpec>,
    generation: u64,
}

impl ToolRegistry {
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let mut registry = Self::default();
        registry.replace_from(cfg)?;
        Ok(registry)
    }

    /// Re-register every tool from `cfg`, returning what changed.
    ///
    /// On error the registry is left untouched.
    pub fn replace_from(&mut self, cfg: &ConfigFile) -> Result<RegistryDiff> {
        let mut tools = BTreeMap::new();
        for (name, tool) in cfg.tools() {
            let progress_filter = tool
                .progress_on_stdout
                .as_deref()
                .map(Regex::new)
                .transpose()
                .with_context(|| format!("compiling progress_on_stdout for tool '{name}'"))?;
            tools.insert(
                name.clone(),
                ToolSpec {
                    name: name.clone(),
                    cmd: tool.cmd.clone(),
                    description: tool.description.clone(),
                    timeout: cfg.tool_timeout(name),
                    progress_filter,
                },
            );
        }

        let mut diff = RegistryDiff::default();
        for (name, spec) in &tools {
            match self.tools.get(name) {
                None => diff.added.push(name.clone()),
                Some(old) if !old.same_definition(spec) => diff.changed.push(name.clone()),
                Some(_) => {}
            }
        }
        diff.removed = self
            .tools
            .keys()
            .filter(|name| !tools.contains_key(*name))
            .cloned()
            .collect();

        self.tools = tools;
        self.generation += 1;
        Ok(diff)
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RawConfigFile, ToolConfig};

    fn config(tools: &[(&str, &str)]) -> ConfigFile {
        let mut raw = RawConfigFile::default();
        for (name, cmd) in tools {
            raw.tool.insert(
                name.to_string(),
                ToolConfig {
                    cmd: cmd.to_string(),
                    description: None,
                    timeout: None,
                    progress_on_stdout: None,
                },
            );
        }
        ConfigFile::try_from(raw).unwrap()
    }

    #[test]
    fn reregistration_reports_added_removed_and_changed() {
        let mut registry =
            ToolRegistry::from_config(&config(&[("restart", "echo r"), ("status", "echo s")])).unwrap();
        assert_eq!(registry.generation(), 1);

        let diff = registry
            .replace_from(&config(&[("restart", "echo R"), ("backup", "echo b")]))
            .unwrap();

        assert_eq!(diff.added, vec!["backup"]);
        assert_eq!(diff.removed, vec!["status"]);
        assert_eq!(diff.changed, vec!["restart"]);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["backup", "restart"]);
        assert_eq!(registry.generation(), 2);
    }

    #[test]
    fn identical_config_yields_empty_diff() {
        let cfg = config(&[("restart", "echo r")]);
        let mut registry = ToolRegistry::from_config(&cfg).unwrap();
        assert!(registry.replace_from(&cfg).unwrap().is_empty());
    }
}

#![allow(dead_code)]

use cait::config::{ConfigFile, RawConfigFile, ToolConfig};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_tool(mut self, name: &str, tool: ToolConfig) -> Self {
        self.config.tool.insert(name.to_string(), tool);
        self
    }

    pub fn with_watch_paths(mut self, paths: &[&str]) -> Self {
        self.config.watch.paths = paths.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_patterns(mut self, patterns: &[&str]) -> Self {
        self.config.watch.patterns = patterns.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_quiescence(mut self, value: &str) -> Self {
        self.config.watch.quiescence = value.to_string();
        self
    }

    pub fn with_bridge_timeout(mut self, value: &str) -> Self {
        self.config.bridge.timeout = Some(value.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ToolConfig`.
pub struct ToolConfigBuilder {
    tool: ToolConfig,
}

impl ToolConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            tool: ToolConfig {
                cmd: cmd.to_string(),
                description: None,
                timeout: None,
                progress_on_stdout: None,
            },
        }
    }

    pub fn description(mut self, text: &str) -> Self {
        self.tool.description = Some(text.to_string());
        self
    }

    pub fn timeout(mut self, value: &str) -> Self {
        self.tool.timeout = Some(value.to_string());
        self
    }

    pub fn progress_on_stdout(mut self, pattern: &str) -> Self {
        self.tool.progress_on_stdout = Some(pattern.to_string());
        self
    }

    pub fn build(self) -> ToolConfig {
        self.tool
    }
}

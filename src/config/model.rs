// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

/// Configuration exactly as read from a `Cait.toml` file, before validation.
///
/// ```toml
/// [watch]
/// paths = ["tools", ".env"]
/// patterns = [".toml", ".env"]
/// quiescence = "1s"
///
/// [bridge]
/// poll_interval = "100ms"
/// timeout = "5m"
///
/// [tool.restart]
/// cmd = "sudo service enshrouded restart"
/// ```
///
/// All sections are optional and have reasonable defaults. Use
/// `ConfigFile::try_from` to obtain a validated config.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub bridge: BridgeSection,

    /// All tools from `[tool.<name>]`, keyed by tool name.
    #[serde(default)]
    pub tool: BTreeMap<String, ToolConfig>,
}

/// `[watch]` section: what the reload supervisor monitors.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directories or individual files to watch, relative to the config file.
    #[serde(default = "default_watch_paths")]
    pub paths: Vec<String>,

    /// Filename suffixes (`".toml"`) or globs (`"*.local.toml"`) that count
    /// as relevant changes.
    #[serde(default = "default_watch_patterns")]
    pub patterns: Vec<String>,

    /// Minimum time between two accepted reloads.
    #[serde(default = "default_quiescence")]
    pub quiescence: String,

    /// Suffix identifying the environment file. A change to it reloads
    /// process environment variables before the reload hook runs.
    #[serde(default = "default_env_file")]
    pub env_file: String,
}

fn default_watch_paths() -> Vec<String> {
    vec![".".to_string()]
}

fn default_watch_patterns() -> Vec<String> {
    vec![".toml".to_string(), ".env".to_string()]
}

fn default_quiescence() -> String {
    "1s".to_string()
}

fn default_env_file() -> String {
    ".env".to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            paths: default_watch_paths(),
            patterns: default_watch_patterns(),
            quiescence: default_quiescence(),
            env_file: default_env_file(),
        }
    }
}

/// `[bridge]` section: how progress is relayed from running tools.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeSection {
    /// Bounded wait used by the relay loop when polling for progress.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,

    /// Optional host-side timeout for a single tool run.
    #[serde(default)]
    pub timeout: Option<String>,
}

fn default_poll_interval() -> String {
    "100ms".to_string()
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            timeout: None,
        }
    }
}

/// `[tool.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    /// Shell command executed when the tool runs.
    pub cmd: String,

    /// Human-readable description shown by `cait check`.
    #[serde(default)]
    pub description: Option<String>,

    /// Per-tool timeout, overriding `[bridge].timeout`.
    #[serde(default)]
    pub timeout: Option<String>,

    /// Regex selecting which stdout lines are relayed as progress. When
    /// unset, every non-empty line is relayed.
    #[serde(default)]
    pub progress_on_stdout: Option<String>,
}

/// Validated configuration.
///
/// Constructed through `TryFrom<RawConfigFile>` (see `validate.rs`), which
/// also resolves every duration string once.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: WatchSection,
    bridge: BridgeSection,
    tool: BTreeMap<String, ToolConfig>,
    quiescence: Duration,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        raw: RawConfigFile,
        quiescence: Duration,
        poll_interval: Duration,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            watch: raw.watch,
            bridge: raw.bridge,
            tool: raw.tool,
            quiescence,
            poll_interval,
            timeout,
        }
    }

    pub fn watch_section(&self) -> &WatchSection {
        &self.watch
    }

    pub fn bridge_section(&self) -> &BridgeSection {
        &self.bridge
    }

    pub fn tools(&self) -> &BTreeMap<String, ToolConfig> {
        &self.tool
    }

    pub fn quiescence(&self) -> Duration {
        self.quiescence
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Effective timeout for a tool: its own `timeout`, else `[bridge].timeout`.
    pub fn tool_timeout(&self, name: &str) -> Option<Duration> {
        self.tool
            .get(name)
            .and_then(|t| t.timeout.as_deref())
            .and_then(|s| super::parse_duration(s).ok())
            .or(self.timeout)
    }
}

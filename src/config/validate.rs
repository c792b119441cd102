// src/config/validate.rs

use std::time::Duration;

use regex::Regex;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::config::parse_duration;
use crate::errors::{CaitError, Result};
use crate::watch::PatternSet;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CaitError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_watch_section(&raw)?;
        validate_tools(&raw)?;

        let quiescence = duration_field("[watch].quiescence", &raw.watch.quiescence)?;
        let poll_interval = duration_field("[bridge].poll_interval", &raw.bridge.poll_interval)?;
        if poll_interval.is_zero() {
            return Err(CaitError::ConfigError(
                "[bridge].poll_interval must be greater than zero".to_string(),
            ));
        }
        let timeout = raw
            .bridge
            .timeout
            .as_deref()
            .map(|s| duration_field("[bridge].timeout", s))
            .transpose()?;

        Ok(ConfigFile::new_unchecked(raw, quiescence, poll_interval, timeout))
    }
}

fn duration_field(field: &str, value: &str) -> Result<Duration> {
    parse_duration(value)
        .map_err(|e| CaitError::ConfigError(format!("{field} = \"{value}\": {e}")))
}

fn validate_watch_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.paths.is_empty() {
        return Err(CaitError::ConfigError(
            "[watch].paths must list at least one path".to_string(),
        ));
    }
    if cfg.watch.patterns.is_empty() {
        return Err(CaitError::ConfigError(
            "[watch].patterns must list at least one pattern".to_string(),
        ));
    }
    if cfg.watch.patterns.iter().any(|p| p.trim().is_empty()) {
        return Err(CaitError::ConfigError(
            "[watch].patterns must not contain empty patterns".to_string(),
        ));
    }
    PatternSet::new(&cfg.watch.patterns).map_err(|e| {
        CaitError::ConfigError(format!("[watch].patterns contains an invalid glob: {e:#}"))
    })?;
    if cfg.watch.env_file.trim().is_empty() {
        return Err(CaitError::ConfigError(
            "[watch].env_file must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_tools(cfg: &RawConfigFile) -> Result<()> {
    let name_re = Regex::new(r"^[A-Za-z0-9_-]+$").map_err(anyhow::Error::from)?;

    for (name, tool) in cfg.tool.iter() {
        if !name_re.is_match(name) {
            return Err(CaitError::ConfigError(format!(
                "tool name '{name}' may only contain letters, digits, '-' and '_'"
            )));
        }
        if tool.cmd.trim().is_empty() {
            return Err(CaitError::ConfigError(format!(
                "tool '{name}' has an empty `cmd`"
            )));
        }
        if let Some(ref timeout) = tool.timeout {
            duration_field(&format!("[tool.{name}].timeout"), timeout)?;
        }
        if let Some(ref pattern) = tool.progress_on_stdout {
            Regex::new(pattern).map_err(|e| {
                CaitError::ConfigError(format!(
                    "tool '{name}' has an invalid progress_on_stdout regex: {e}"
                ))
            })?;
        }
    }
    Ok(())
}

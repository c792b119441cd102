// tests/config_loading.rs

mod common;
use crate::common::builders::{ConfigFileBuilder, ToolConfigBuilder};

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::{tempdir, NamedTempFile};

use cait::config::{load_and_validate, ConfigFile};
use cait::errors::CaitError;
use cait::host::{bridge_options, watch_set_from_config, ToolRegistry};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_is_loaded_with_parsed_durations() {
    let file = write_config(
        r#"
[watch]
paths = ["tools", "settings.toml"]
patterns = [".toml", "*.local.cfg"]
quiescence = "2s"

[bridge]
poll_interval = "50ms"
timeout = "5m"

[tool.restart]
cmd = "echo restarting"
description = "Restart the server"

[tool.backup]
cmd = "echo backing up"
timeout = "30s"
progress_on_stdout = "^PROGRESS"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.quiescence(), Duration::from_secs(2));
    assert_eq!(cfg.poll_interval(), Duration::from_millis(50));
    assert_eq!(cfg.tool_timeout("restart"), Some(Duration::from_secs(300)));
    assert_eq!(cfg.tool_timeout("backup"), Some(Duration::from_secs(30)));
    assert_eq!(cfg.tools().len(), 2);
    assert_eq!(cfg.watch_section().env_file, ".env");
}

#[test]
fn empty_file_uses_defaults() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.watch_section().paths, vec!["."]);
    assert_eq!(cfg.watch_section().patterns, vec![".toml", ".env"]);
    assert_eq!(cfg.quiescence(), Duration::from_secs(1));
    assert_eq!(cfg.poll_interval(), Duration::from_millis(100));
    assert!(cfg.tools().is_empty());
}

#[test]
fn empty_command_returns_config_error() {
    let file = write_config("[tool.broken]\ncmd = \"   \"\n");

    match load_and_validate(file.path()) {
        Err(CaitError::ConfigError(msg)) => {
            assert!(msg.contains("broken"));
            assert!(msg.contains("empty"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn invalid_duration_names_the_field() {
    let file = write_config("[watch]\nquiescence = \"soon\"\n");

    match load_and_validate(file.path()) {
        Err(CaitError::ConfigError(msg)) => assert!(msg.contains("[watch].quiescence")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn zero_poll_interval_is_rejected() {
    let file = write_config("[bridge]\npoll_interval = \"0ms\"\n");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(CaitError::ConfigError(_))
    ));
}

#[test]
fn malformed_toml_returns_toml_error() {
    let file = write_config("[tool.x\ncmd = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(CaitError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(load_and_validate(dir.path().join("nope.toml")).is_err());
}

#[test]
fn invalid_tool_name_and_regex_are_rejected() {
    let bad_name = ConfigFileBuilder::new()
        .with_tool("has space", ToolConfigBuilder::new("echo").build())
        .raw();
    assert!(matches!(
        ConfigFile::try_from(bad_name),
        Err(CaitError::ConfigError(_))
    ));

    let bad_regex = ConfigFileBuilder::new()
        .with_tool("t", ToolConfigBuilder::new("echo").progress_on_stdout("(").build())
        .raw();
    assert!(matches!(
        ConfigFile::try_from(bad_regex),
        Err(CaitError::ConfigError(_))
    ));
}

#[test]
fn watch_paths_resolve_against_the_config_directory() {
    let cfg = ConfigFileBuilder::new()
        .with_watch_paths(&["tools", "/etc/cait"])
        .build();

    let set = watch_set_from_config(&cfg, Path::new("/srv/app")).unwrap();
    let roots: Vec<_> = set.entries().iter().map(|e| e.path().to_path_buf()).collect();

    assert_eq!(roots, vec![Path::new("/srv/app/tools"), Path::new("/etc/cait")]);
}

#[test]
fn bridge_options_follow_tool_timeouts() {
    let cfg = ConfigFileBuilder::new()
        .with_bridge_timeout("1m")
        .with_tool("fast", ToolConfigBuilder::new("true").timeout("5s").build())
        .with_tool("default", ToolConfigBuilder::new("true").build())
        .build();
    let registry = ToolRegistry::from_config(&cfg).unwrap();

    let fast = bridge_options(&cfg, registry.get("fast").unwrap());
    let default = bridge_options(&cfg, registry.get("default").unwrap());

    assert_eq!(fast.timeout, Some(Duration::from_secs(5)));
    assert_eq!(default.timeout, Some(Duration::from_secs(60)));
}

#[test]
fn invalid_watch_glob_is_rejected_at_load_time() {
    let file = write_config("[watch]\npatterns = [\"[.cfg\"]\n");

    match load_and_validate(file.path()) {
        Err(CaitError::ConfigError(msg)) => {
            assert!(msg.contains("[watch].patterns"), "{msg}");
            assert!(msg.contains("[.cfg"), "{msg}");
        }
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn out_of_range_duration_is_a_config_error() {
    let file = write_config("[watch]\nquiescence = \"307445734561825861m\"\n");

    match load_and_validate(file.path()) {
        Err(CaitError::ConfigError(msg)) => assert!(msg.contains("out of range"), "{msg}"),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }
}

// tests/run_tool.rs
#![cfg(unix)]

mod common;
use crate::common::builders::{ConfigFileBuilder, ToolConfigBuilder};
use crate::common::{init_tracing, with_timeout, RecordingSink};

use std::fs;

use tempfile::tempdir;

use cait::bridge::ProgressBridge;
use cait::cli::{CliArgs, Command};
use cait::host::{bridge_options, Status, ToolRegistry};

#[tokio::test]
async fn registered_tool_streams_stdout_as_progress() {
    init_tracing();
    let cfg = ConfigFileBuilder::new()
        .with_tool(
            "deploy",
            ToolConfigBuilder::new("echo 'step: build'; echo chatter; sleep 0.2; echo 'step: ship'; sleep 0.3")
                .progress_on_stdout("^step:")
                .build(),
        )
        .build();
    let registry = ToolRegistry::from_config(&cfg).unwrap();
    let spec = registry.get("deploy").unwrap();
    let sink = RecordingSink::new();
    let work = spec.work();

    let result = with_timeout(
        ProgressBridge::new(bridge_options(&cfg, spec)).run(move |p| work.run(p), sink.clone()),
    )
    .await;

    assert_eq!(result, Ok("Successfully ran deploy".to_string()));
    assert_eq!(
        sink.messages(),
        vec!["Starting deploy...", "step: build", "step: ship"]
    );
    assert_eq!(
        Status::from_result(&result).to_string(),
        "✅ Successfully ran deploy"
    );
}

#[tokio::test]
async fn failing_tool_renders_an_error_status() {
    init_tracing();
    let cfg = ConfigFileBuilder::new()
        .with_tool("restart", ToolConfigBuilder::new("echo 'no such unit' >&2; exit 5").build())
        .build();
    let registry = ToolRegistry::from_config(&cfg).unwrap();
    let spec = registry.get("restart").unwrap();
    let work = spec.work();

    let result = with_timeout(
        ProgressBridge::new(bridge_options(&cfg, spec))
            .run(move |p| work.run(p), RecordingSink::new()),
    )
    .await;

    let status = Status::from_result(&result);
    assert!(status.is_failure());
    let line = status.to_string();
    assert!(line.starts_with("❌ Error:"), "{line}");
    assert!(line.contains("exit code 5"), "{line}");
}

#[tokio::test]
async fn run_command_executes_tool_from_config_file() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = dir.path().join("Cait.toml");
    fs::write(&config, "[tool.hello]\ncmd = \"echo hi\"\n").unwrap();

    let args = |command| CliArgs {
        config: config.to_string_lossy().into_owned(),
        log_level: None,
        command,
    };

    with_timeout(cait::run(args(Command::Run { tool: "hello".to_string() })))
        .await
        .unwrap();
    with_timeout(cait::run(args(Command::Check))).await.unwrap();

    let missing = with_timeout(cait::run(args(Command::Run { tool: "nope".to_string() }))).await;
    let err = missing.unwrap_err();
    assert!(format!("{err:#}").contains("nope"));
}

// src/lib.rs

pub mod bridge;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod host;
pub mod logging;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};

use crate::bridge::ProgressBridge;
use crate::cli::{CliArgs, Command};
use crate::config::{config_root_dir, load_and_validate, ConfigFile};
use crate::errors::CaitError;
use crate::host::{HostState, Reconfigure, Status, ToolRegistry};
use crate::watch::ReloadSupervisor;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - `.env` and config loading
/// - the tool registry
/// - the reload supervisor (`watch`)
/// - the progress bridge (`run`)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let root_dir = config_root_dir(&config_path);
    load_startup_env(&root_dir);

    let cfg = load_and_validate(&config_path)?;

    match args.command {
        Command::Check => {
            print_check(&cfg, &root_dir);
            Ok(())
        }
        Command::Run { tool } => run_tool(&cfg, &tool).await,
        Command::Watch => watch(cfg, config_path, &root_dir).await,
    }
}

/// Load `.env` next to the config without overriding the real environment.
fn load_startup_env(root_dir: &Path) {
    let path = root_dir.join(".env");
    if !path.is_file() {
        return;
    }
    match dotenvy::from_path(&path) {
        Ok(()) => debug!(path = ?path, "loaded environment file"),
        Err(err) => warn!(path = ?path, error = %err, "failed to load environment file"),
    }
}

/// Run one tool through the progress bridge, printing status lines.
async fn run_tool(cfg: &ConfigFile, name: &str) -> Result<()> {
    let registry = ToolRegistry::from_config(cfg)?;
    let spec = registry
        .get(name)
        .ok_or_else(|| CaitError::ToolNotFound(name.to_string()))?;

    let bridge = ProgressBridge::new(host::bridge_options(cfg, spec));
    let work = spec.work();
    debug!(tool = work.name(), options = ?bridge.options(), "running tool");

    println!("{}", Status::Pending);
    let result = bridge
        .run(
            move |progress| work.run(progress),
            |message: String| async move {
                println!("{}", Status::Progress(message));
                Ok::<(), anyhow::Error>(())
            },
        )
        .await;

    let status = Status::from_result(&result);
    println!("{status}");
    if status.is_failure() {
        return Err(anyhow!("tool '{name}' did not complete successfully"));
    }
    Ok(())
}

/// Watch configured paths and re-register tools until Ctrl-C.
async fn watch(cfg: ConfigFile, config_path: PathBuf, root_dir: &Path) -> Result<()> {
    let watch_set = host::watch_set_from_config(&cfg, root_dir)?;
    let options = host::supervisor_options(&cfg);

    let hook = Reconfigure::new(config_path, HostState::new(cfg)?);
    {
        let state = hook.state();
        let state = state.read().map_err(|_| anyhow!("host state lock poisoned"))?;
        info!(tools = ?state.registry.names().collect::<Vec<_>>(), "tools registered");
    }

    let mut supervisor = ReloadSupervisor::new(options);
    let reload_hook = hook.clone();
    supervisor.start(watch_set, move || reload_hook.reload())?;
    info!(
        config = ?hook.config_path(),
        paths = ?supervisor.watched_paths(),
        "watching for changes (Ctrl-C to stop)"
    );

    let signal = tokio::signal::ctrl_c().await;
    supervisor.stop();
    signal.map_err(|e| anyhow!("failed to listen for Ctrl+C: {e}"))?;

    info!("shutdown complete");
    Ok(())
}

/// Dry-run output: what would be watched and which tools exist.
fn print_check(cfg: &ConfigFile, root_dir: &Path) {
    let watch = cfg.watch_section();
    println!("cait check");
    println!("  watch.paths = {:?} (relative to {:?})", watch.paths, root_dir);
    println!("  watch.patterns = {:?}", watch.patterns);
    println!("  watch.quiescence = {:?}", cfg.quiescence());
    println!("  watch.env_file = {}", watch.env_file);
    println!("  bridge.poll_interval = {:?}", cfg.poll_interval());
    if let Some(ref timeout) = cfg.bridge_section().timeout {
        println!("  bridge.timeout = {timeout}");
    }
    println!();

    println!("tools ({}):", cfg.tools().len());
    for (name, tool) in cfg.tools() {
        println!("  - {name}");
        println!("      cmd: {}", tool.cmd);
        if let Some(ref description) = tool.description {
            println!("      description: {description}");
        }
        if let Some(timeout) = cfg.tool_timeout(name) {
            println!("      timeout: {timeout:?}");
        }
        if let Some(ref pattern) = tool.progress_on_stdout {
            println!("      progress_on_stdout: {pattern}");
        }
    }

    debug!("check complete (nothing executed)");
}

// src/watch/env.rs

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Re-read an environment file, overriding variables already set in the
/// process so the reload hook observes the fresh values.
///
/// Must run before any code that reads the affected variables concurrently;
/// the reload supervisor only calls it from its single notification thread.
pub fn reload_env_file(path: &Path) -> Result<()> {
    dotenvy::from_path_override(path)
        .with_context(|| format!("reloading environment from {:?}", path))?;
    info!(path = ?path, "environment variables reloaded");
    Ok(())
}

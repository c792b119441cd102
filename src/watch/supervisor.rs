// src/watch/supervisor.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::errors::{CaitError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::debounce::{DebounceWindow, DEFAULT_QUIESCENCE};
use crate::watch::fingerprint::FileFingerprint;
use crate::watch::handler::ReloadHandler;
use crate::watch::watch_set::WatchSet;

/// Tunables for a [`ReloadSupervisor`].
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    /// Minimum time between two accepted reloads.
    pub quiescence: Duration,
    /// Path suffix of the environment file (`.env`).
    pub env_suffix: String,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            quiescence: DEFAULT_QUIESCENCE,
            env_suffix: ".env".to_string(),
        }
    }
}

/// Watches a [`WatchSet`] and invokes a reload hook on qualifying changes.
///
/// The hook runs on the watcher's notification thread, not on the thread
/// that called [`start`](Self::start). Hosts that need the reload to happen
/// elsewhere must forward it themselves (e.g. over a channel).
///
/// Dropping the supervisor stops it.
pub struct ReloadSupervisor {
    options: SupervisorOptions,
    fs: Arc<dyn FileSystem>,
    watcher: Option<RecommendedWatcher>,
    watched: Vec<PathBuf>,
}

impl std::fmt::Debug for ReloadSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadSupervisor")
            .field("options", &self.options)
            .field("watched", &self.watched)
            .field("running", &self.is_running())
            .finish()
    }
}

impl ReloadSupervisor {
    pub fn new(options: SupervisorOptions) -> Self {
        Self::with_fs(options, Arc::new(RealFileSystem))
    }

    pub fn with_fs(options: SupervisorOptions, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            options,
            fs,
            watcher: None,
            watched: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    /// Roots currently being watched (canonical paths).
    pub fn watched_paths(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Scan the watch set, subscribe to notifications and start invoking
    /// `on_reload` for qualifying changes.
    ///
    /// Any failure to resolve a root or subscribe is returned and leaves the
    /// supervisor stopped.
    pub fn start<F>(&mut self, watch_set: WatchSet, on_reload: F) -> Result<()>
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        if self.is_running() {
            return Err(CaitError::AlreadyRunning);
        }
        if watch_set.is_empty() {
            return Err(CaitError::ConfigError(
                "watch set must contain at least one path".to_string(),
            ));
        }

        let watch_set = watch_set.resolve(self.fs.as_ref())?;
        let fingerprint = FileFingerprint::scan(self.fs.as_ref(), &watch_set);
        info!(
            roots = watch_set.entries().len(),
            files = fingerprint.len(),
            "baseline fingerprint recorded"
        );

        let roots: Vec<(PathBuf, RecursiveMode)> = watch_set
            .entries()
            .iter()
            .map(|e| {
                let mode = if self.fs.is_dir(e.path()) {
                    RecursiveMode::Recursive
                } else {
                    RecursiveMode::NonRecursive
                };
                (e.path().to_path_buf(), mode)
            })
            .collect();

        let mut handler = ReloadHandler::new(
            watch_set,
            fingerprint,
            DebounceWindow::new(self.options.quiescence),
            self.options.env_suffix.clone(),
            Arc::clone(&self.fs),
            Box::new(on_reload),
        );

        // Called synchronously by notify on its own thread.
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| handler.handle_notify(res),
            Config::default(),
        )?;

        for (root, mode) in &roots {
            // On error the local watcher is dropped, releasing earlier subscriptions.
            watcher.watch(root, *mode)?;
            info!(path = ?root, ?mode, "watching");
        }

        self.watched = roots.into_iter().map(|(p, _)| p).collect();
        self.watcher = Some(watcher);
        Ok(())
    }

    /// Stop monitoring and release watcher resources. Idempotent.
    pub fn stop(&mut self) {
        let Some(mut watcher) = self.watcher.take() else {
            debug!("stop called on a supervisor that is not running");
            return;
        };
        for root in self.watched.drain(..) {
            if let Err(err) = watcher.unwatch(&root) {
                warn!(path = ?root, error = %err, "failed to unwatch path");
            }
        }
        drop(watcher);
        info!("reload supervisor stopped");
    }
}

impl Default for ReloadSupervisor {
    fn default() -> Self {
        Self::new(SupervisorOptions::default())
    }
}

impl Drop for ReloadSupervisor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent_without_start() {
        let mut sup = ReloadSupervisor::default();
        sup.stop();
        sup.stop();
        assert!(!sup.is_running());
    }

    #[test]
    fn start_with_missing_root_fails_and_stays_stopped() {
        let mut sup = ReloadSupervisor::default();
        let set = WatchSet::from_paths(&["/definitely/not/here/cait"], &[".cfg"]).unwrap();

        assert!(sup.start(set, || Ok(())).is_err());
        assert!(!sup.is_running());
        sup.stop();
    }

    #[test]
    fn empty_watch_set_is_rejected() {
        let mut sup = ReloadSupervisor::default();
        let err = sup.start(WatchSet::new(), || Ok(())).unwrap_err();
        assert!(matches!(err, CaitError::ConfigError(_)));
    }
}

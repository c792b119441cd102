// src/watch/handler.rs

//! Per-notification decision logic for the reload supervisor.
//!
//! [`ReloadHandler`] owns the fingerprint and debounce state. It is moved
//! into the notify callback, so it is only ever touched from the watcher's
//! notification thread.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use notify::event::{CreateKind, RemoveKind};
use notify::{Event, EventKind};
use tracing::{debug, error, info, warn};

use crate::errors::panic_message;
use crate::fs::FileSystem;
use crate::watch::debounce::DebounceWindow;
use crate::watch::env::reload_env_file;
use crate::watch::fingerprint::{FileFingerprint, Observation};
use crate::watch::watch_set::WatchSet;

/// Host-supplied reconfigure hook.
pub type ReloadCallback = Box<dyn FnMut() -> anyhow::Result<()> + Send + 'static>;

/// Coarse classification of a notify event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    Directory,
}

impl ChangeKind {
    /// Map a notify event kind; `None` for access and other non-changes.
    pub fn from_event_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => {
                Some(Self::Directory)
            }
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Modify(_) | EventKind::Any => Some(Self::Modified),
            EventKind::Remove(_) => Some(Self::Removed),
            EventKind::Access(_) | EventKind::Other => None,
        }
    }
}

/// What happened to a single changed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    IgnoredDirectory,
    IgnoredPattern,
    /// Same modification time as already recorded.
    Unchanged,
    Debounced,
    Reloaded,
    /// The hook returned an error or panicked; monitoring continues.
    ReloadFailed(String),
}

pub struct ReloadHandler {
    watch_set: WatchSet,
    fingerprint: FileFingerprint,
    debounce: DebounceWindow,
    env_suffix: String,
    fs: Arc<dyn FileSystem>,
    on_reload: ReloadCallback,
}

impl ReloadHandler {
    pub fn new(
        watch_set: WatchSet,
        fingerprint: FileFingerprint,
        debounce: DebounceWindow,
        env_suffix: impl Into<String>,
        fs: Arc<dyn FileSystem>,
        on_reload: ReloadCallback,
    ) -> Self {
        Self {
            watch_set,
            fingerprint,
            debounce,
            env_suffix: env_suffix.into(),
            fs,
            on_reload,
        }
    }

    pub fn fingerprint(&self) -> &FileFingerprint {
        &self.fingerprint
    }

    /// Entry point for raw notify results.
    pub fn handle_notify(&mut self, res: notify::Result<Event>) {
        match res {
            Ok(event) => {
                debug!(?event, "received notify event");
                self.handle_event_at(&event, Instant::now());
            }
            Err(err) => error!(error = %err, "file watch error"),
        }
    }

    pub fn handle_event_at(&mut self, event: &Event, now: Instant) -> Vec<HandleOutcome> {
        let Some(kind) = ChangeKind::from_event_kind(&event.kind) else {
            return Vec::new();
        };
        event
            .paths
            .iter()
            .map(|path| self.handle_path_at(path, kind, now))
            .collect()
    }

    pub fn handle_path_at(&mut self, path: &Path, kind: ChangeKind, now: Instant) -> HandleOutcome {
        if kind == ChangeKind::Directory || self.fs.is_dir(path) {
            return HandleOutcome::IgnoredDirectory;
        }

        if !self.watch_set.matches(path) {
            return HandleOutcome::IgnoredPattern;
        }

        let observation = match (kind, self.fs.modified(path)) {
            (ChangeKind::Removed, _) | (_, Err(_)) => self.fingerprint.forget(path),
            (_, Ok(mtime)) => self.fingerprint.observe(path, mtime),
        };
        if !observation.is_real_change() {
            debug!(path = ?path, ?observation, "notification without content change");
            return HandleOutcome::Unchanged;
        }

        if !self.debounce.try_accept(now) {
            debug!(path = ?path, "change within quiescence interval; dropped");
            return HandleOutcome::Debounced;
        }

        info!(path = ?path, "detected change, reloading");

        if observation != Observation::Removed
            && path.to_string_lossy().ends_with(self.env_suffix.as_str())
        {
            if let Err(err) = reload_env_file(path) {
                warn!(error = %format!("{err:#}"), "environment reload failed; continuing with reload");
            }
        }

        self.invoke_reload()
    }

    fn invoke_reload(&mut self) -> HandleOutcome {
        let on_reload = &mut self.on_reload;
        match panic::catch_unwind(AssertUnwindSafe(|| on_reload())) {
            Ok(Ok(())) => {
                info!("reload complete");
                HandleOutcome::Reloaded
            }
            Ok(Err(err)) => {
                let msg = format!("{err:#}");
                error!(error = %msg, "reload callback failed");
                HandleOutcome::ReloadFailed(msg)
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!(error = %msg, "reload callback panicked");
                HandleOutcome::ReloadFailed(msg)
            }
        }
    }
}

// src/watch/mod.rs

//! Reload supervision: file watching with debounced reloads.
//!
//! This module is responsible for:
//! - Describing what to watch (`WatchSet`, `PatternSet`).
//! - Recording a baseline of modification times (`FileFingerprint`).
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Turning bursts of notifications into a single reload call
//!   (`DebounceWindow`, `ReloadHandler`).
//!
//! It does **not** know what a reload means; the host supplies the hook.

pub mod debounce;
pub mod env;
pub mod fingerprint;
pub mod handler;
pub mod patterns;
pub mod supervisor;
pub mod watch_set;

pub use debounce::{DebounceWindow, DEFAULT_QUIESCENCE};
pub use fingerprint::{FileFingerprint, Observation};
pub use handler::{ChangeKind, HandleOutcome, ReloadCallback, ReloadHandler};
pub use patterns::PatternSet;
pub use supervisor::{ReloadSupervisor, SupervisorOptions};
pub use watch_set::{WatchEntry, WatchSet};

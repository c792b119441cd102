// src/watch/watch_set.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::fs::FileSystem;
use crate::watch::patterns::PatternSet;

/// One watched root: a directory (watched recursively) or a single file.
#[derive(Debug, Clone)]
pub struct WatchEntry {
    path: PathBuf,
    patterns: PatternSet,
}

impl WatchEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Whether `path` is this root or lies underneath it.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.path)
    }
}

/// Ordered collection of roots to monitor, each with its own patterns.
///
/// A root with no matching files still participates: files created later
/// that match its patterns are picked up without re-registration.
#[derive(Debug, Clone, Default)]
pub struct WatchSet {
    entries: Vec<WatchEntry>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set where every path shares the same patterns.
    pub fn from_paths<P, S>(paths: &[P], patterns: &[S]) -> Result<Self>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let patterns = PatternSet::new(patterns)?;
        Ok(Self {
            entries: paths
                .iter()
                .map(|p| WatchEntry {
                    path: p.as_ref().to_path_buf(),
                    patterns: patterns.clone(),
                })
                .collect(),
        })
    }

    /// Add a root with its own pattern list.
    pub fn watch<S: AsRef<str>>(mut self, path: impl Into<PathBuf>, patterns: &[S]) -> Result<Self> {
        self.entries.push(WatchEntry {
            path: path.into(),
            patterns: PatternSet::new(patterns)?,
        });
        Ok(self)
    }

    pub fn entries(&self) -> &[WatchEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any root containing `path` has a pattern matching it.
    /// Individually watched files are filtered the same way.
    pub fn matches(&self, path: &Path) -> bool {
        self.entries
            .iter()
            .any(|e| e.contains(path) && e.patterns.matches(path))
    }

    /// Canonicalize every root so event paths reported by the OS can be
    /// compared against them. A root that does not exist is an error.
    pub fn resolve(self, fs: &dyn FileSystem) -> Result<Self> {
        let entries = self
            .entries
            .into_iter()
            .map(|e| {
                let path = fs
                    .canonicalize(&e.path)
                    .with_context(|| format!("resolving watch path {:?}", e.path))?;
                Ok(WatchEntry {
                    path,
                    patterns: e.patterns,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }
}

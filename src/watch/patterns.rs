// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Characters that turn a pattern into a glob instead of a plain suffix.
const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}'];

/// Compiled set of path patterns a watch root cares about.
///
/// Plain patterns (`".cfg"`, `"settings.toml"`) match any path ending with
/// that text. Patterns containing glob metacharacters (`"*.local.toml"`) are
/// compiled with `globset` and matched against the full path.
#[derive(Clone, Default)]
pub struct PatternSet {
    suffixes: Vec<String>,
    globs: Option<GlobSet>,
    sources: Vec<String>,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("patterns", &self.sources)
            .finish_non_exhaustive()
    }
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut suffixes = Vec::new();
        let mut sources = Vec::with_capacity(patterns.len());
        let mut builder = GlobSetBuilder::new();
        let mut has_globs = false;

        for pat in patterns {
            let pat = pat.as_ref();
            sources.push(pat.to_string());
            if pat.contains(GLOB_META) {
                let glob = Glob::new(pat)
                    .with_context(|| format!("invalid glob pattern: {pat}"))?;
                builder.add(glob);
                has_globs = true;
            } else {
                suffixes.push(pat.to_string());
            }
        }

        let globs = if has_globs {
            Some(builder.build().context("building watch globset")?)
        } else {
            None
        };

        Ok(Self {
            suffixes,
            globs,
            sources,
        })
    }

    /// The patterns as originally given.
    pub fn patterns(&self) -> &[String] {
        &self.sources
    }

    pub fn matches(&self, path: &Path) -> bool {
        let s = path.to_string_lossy().replace('\\', "/");
        if self.suffixes.iter().any(|suffix| s.ends_with(suffix.as_str())) {
            return true;
        }
        self.globs.as_ref().is_some_and(|g| g.is_match(&s))
    }
}

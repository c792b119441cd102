// src/watch/fingerprint.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::watch::watch_set::WatchSet;

/// Last observed modification time of every relevant file.
///
/// Built once by [`FileFingerprint::scan`] and updated as change events
/// arrive. It lets the event handler tell a real content change from a
/// duplicate notification for a write it has already seen. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct FileFingerprint {
    mtimes: HashMap<PathBuf, SystemTime>,
}

/// What an observation did to the fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First time this file was seen.
    New,
    /// The modification time moved.
    Changed,
    /// Same modification time as last recorded.
    Unchanged,
    /// A previously known file went away.
    Removed,
    /// A file that was never recorded went away.
    UnknownRemoved,
}

impl Observation {
    pub fn is_real_change(self) -> bool {
        matches!(self, Self::New | Self::Changed | Self::Removed)
    }
}

impl FileFingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the baseline for every matching file in the watch set.
    ///
    /// Directories are walked recursively; individually watched files are
    /// stat'ed directly. Unreadable entries are logged and skipped.
    pub fn scan(fs: &dyn FileSystem, watch_set: &WatchSet) -> Self {
        let mut fingerprint = Self::new();

        for entry in watch_set.entries() {
            let root = entry.path();
            if fs.is_file(root) {
                fingerprint.record_from_fs(fs, root);
                continue;
            }

            let mut stack = vec![root.to_path_buf()];
            while let Some(dir) = stack.pop() {
                let children = match fs.read_dir(&dir) {
                    Ok(c) => c,
                    Err(err) => {
                        warn!(dir = ?dir, error = %err, "skipping unreadable directory during scan");
                        continue;
                    }
                };
                for path in children {
                    if fs.is_dir(&path) {
                        stack.push(path);
                    } else if entry.patterns().matches(&path) {
                        fingerprint.record_from_fs(fs, &path);
                    }
                }
            }
        }

        debug!(files = fingerprint.len(), "initial fingerprint scan complete");
        fingerprint
    }

    fn record_from_fs(&mut self, fs: &dyn FileSystem, path: &Path) {
        match fs.modified(path) {
            Ok(mtime) => {
                self.mtimes.insert(path.to_path_buf(), mtime);
            }
            Err(err) => warn!(path = ?path, error = %err, "could not stat watched file"),
        }
    }

    /// Record a freshly observed modification time.
    pub fn observe(&mut self, path: &Path, mtime: SystemTime) -> Observation {
        match self.mtimes.insert(path.to_path_buf(), mtime) {
            None => Observation::New,
            Some(prev) if prev == mtime => Observation::Unchanged,
            Some(_) => Observation::Changed,
        }
    }

    /// Record that a file no longer exists.
    pub fn forget(&mut self, path: &Path) -> Observation {
        match self.mtimes.remove(path) {
            Some(_) => Observation::Removed,
            None => Observation::UnknownRemoved,
        }
    }

    pub fn get(&self, path: &Path) -> Option<SystemTime> {
        self.mtimes.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.mtimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mtimes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn scan_records_only_matching_files_recursively() {
        let fs = MockFileSystem::new();
        fs.add_file("/app/a.cfg", at(1));
        fs.add_file("/app/nested/deep/b.cfg", at(2));
        fs.add_file("/app/readme.md", at(3));
        fs.add_file("/etc/cait.env", at(4));

        let set = WatchSet::from_paths(&["/app", "/etc/cait.env"], &[".cfg"]).unwrap();
        let fp = FileFingerprint::scan(&fs, &set);

        assert_eq!(fp.len(), 3);
        assert_eq!(fp.get(Path::new("/app/a.cfg")), Some(at(1)));
        assert_eq!(fp.get(Path::new("/app/nested/deep/b.cfg")), Some(at(2)));
        assert_eq!(fp.get(Path::new("/etc/cait.env")), Some(at(4)));
        assert_eq!(fp.get(Path::new("/app/readme.md")), None);
    }

    #[test]
    fn empty_directory_scans_to_empty_fingerprint() {
        let fs = MockFileSystem::new();
        fs.add_dir("/app");
        let set = WatchSet::from_paths(&["/app"], &[".cfg"]).unwrap();
        assert!(FileFingerprint::scan(&fs, &set).is_empty());
    }

    #[test]
    fn observe_distinguishes_new_changed_and_unchanged() {
        let mut fp = FileFingerprint::new();
        let p = Path::new("/app/a.cfg");

        assert_eq!(fp.observe(p, at(1)), Observation::New);
        assert_eq!(fp.observe(p, at(1)), Observation::Unchanged);
        assert_eq!(fp.observe(p, at(2)), Observation::Changed);
        assert_eq!(fp.forget(p), Observation::Removed);
        assert_eq!(fp.forget(p), Observation::UnknownRemoved);
    }
}

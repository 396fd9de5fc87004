use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// A file in the cache directory produced by expanding a remote archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    path: PathBuf,
    file_name: String,
    modified: SystemTime,
    len: u64,
}

impl CacheEntry {
    pub(crate) fn new(path: PathBuf, file_name: String, modified: SystemTime, len: u64) -> Self {
        Self {
            path,
            file_name,
            modified,
            len,
        }
    }

    /// Full path of the entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name within the cache directory.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Filesystem modification time.
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Size in bytes at scan time.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` for a zero-byte entry. The reader never returns one.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Modification time in UTC.
    pub fn modified_utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.modified)
    }

    /// Staleness age at `now`. Zero if the entry is newer than `now`.
    pub fn age_at(&self, now: SystemTime) -> Duration {
        now.duration_since(self.modified).unwrap_or_default()
    }

    /// Staleness age in whole minutes at `now`.
    pub fn age_minutes_at(&self, now: SystemTime) -> u64 {
        self.age_at(now).as_secs() / 60
    }
}

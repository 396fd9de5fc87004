//! Newest-entry lookup over the cache directory.
//!
//! The directory is written concurrently by the refresh task without a lock.
//! Every call re-scans it; nothing is memoized, so staleness is always
//! derived from the current directory state.

use super::entry::CacheEntry;
use super::shapefile::{self, Bounds};
use crate::error::Result;
use std::fs::{File, ReadDir};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};

/// Scans a cache directory for the authoritative entry of a selector.
#[derive(Debug, Clone)]
pub struct CacheReader {
    root: PathBuf,
}

impl CacheReader {
    /// Create a reader over `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The scanned directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the newest complete file whose name contains `selector`
    /// (case-insensitive) and ends with `suffix`.
    ///
    /// `Ok(None)` means "not yet available": the directory is missing, empty,
    /// or holds no complete match. Zero-byte files and `.shp` files whose
    /// header disagrees with their on-disk length are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory exists but cannot be listed.
    pub fn latest(&self, selector: &str, suffix: &str) -> Result<Option<CacheEntry>> {
        let dir = match std::fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(root = %self.root.display(), "cache directory not created yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        // Newest first; only the would-be winner pays for a header read.
        for candidate in ranked_candidates(dir, selector, suffix) {
            match open_complete(&candidate.path) {
                Some((len, modified)) => {
                    return Ok(Some(CacheEntry::new(
                        candidate.path,
                        candidate.file_name,
                        modified,
                        len,
                    )));
                }
                None => trace!(file = %candidate.file_name, "skipping incomplete cache entry"),
            }
        }

        Ok(None)
    }
}

#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    file_name: String,
    modified: SystemTime,
}

/// Regular files matching `selector` and `suffix`, newest listed mtime first.
///
/// Ties keep listing order.
fn ranked_candidates(dir: ReadDir, selector: &str, suffix: &str) -> Vec<Candidate> {
    let needle = selector.to_lowercase();
    let mut candidates = Vec::new();

    for item in dir {
        // Entries can disappear between listing and stat while a rename lands.
        let Ok(item) = item else { continue };
        let file_name = item.file_name().to_string_lossy().into_owned();
        if !file_name.to_lowercase().contains(&needle) || !file_name.ends_with(suffix) {
            continue;
        }
        let Ok(meta) = item.metadata() else { continue };
        if !meta.is_file() {
            continue;
        }
        let Ok(modified) = meta.modified() else { continue };
        candidates.push(Candidate {
            path: item.path(),
            file_name,
            modified,
        });
    }

    candidates.sort_by(|a, b| b.modified.cmp(&a.modified));
    candidates
}

/// Open `path` once and return its length and mtime if it is complete.
///
/// Length, mtime and header all come from the same handle, so a rename that
/// lands mid-check cannot pair one inode's length with another's header.
fn open_complete(path: &Path) -> Option<(u64, SystemTime)> {
    let mut file = File::open(path).ok()?;
    let meta = file.metadata().ok()?;
    let len = meta.len();
    if !meta.is_file() || len == 0 {
        return None;
    }
    let is_shp = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("shp"));
    if is_shp && !shapefile::is_complete(&mut file, len) {
        return None;
    }
    meta.modified().ok().map(|modified| (len, modified))
}

/// Bounding box from the header of a `.shp` cache entry.
///
/// Returns `None` for non-shapefiles and unreadable headers.
pub fn shapefile_bounds(entry: &CacheEntry) -> Option<Bounds> {
    match shapefile::read_header(entry.path()) {
        Ok(header) => header.map(|h| h.bounds),
        Err(e) => {
            debug!(file = %entry.file_name(), error = %e, "cannot read shapefile header");
            None
        }
    }
}

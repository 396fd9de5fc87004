//! Unpack a downloaded archive into the cache directory.
//!
//! 1. Writes the payload to a uniquely named temporary archive file
//! 2. Expands every entry into a uniquely named staging directory
//! 3. Renames each staged file into the cache directory, sidecars before
//!    the primary file
//! 4. Removes the temporary archive and the staging directory
//!
//! Both temporaries live inside the cache directory so step 3 is a
//! same-filesystem `rename`: a concurrent reader sees either the previous
//! file or the complete new one.

use crate::error::{MirrorError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What one archive installation produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallSummary {
    /// Installed paths, relative to the cache directory, in install order.
    pub files: Vec<String>,
    /// Size of the downloaded archive.
    pub bytes: u64,
    /// Hex SHA-256 of the downloaded archive.
    pub digest: String,
}

/// Expand `payload` (a zip archive) into `cache_dir`.
///
/// Files whose name ends with `primary_suffix` are installed last.
///
/// # Errors
///
/// Returns [`MirrorError::Archive`] if the payload is not a readable archive,
/// holds an unsafe entry path, or holds no files, and
/// [`MirrorError::Install`] / [`MirrorError::Io`] for local filesystem failures.
pub fn install_archive(
    cache_dir: &Path,
    key: &str,
    payload: &[u8],
    primary_suffix: &str,
) -> Result<InstallSummary> {
    std::fs::create_dir_all(cache_dir)?;

    let id = uuid::Uuid::new_v4().simple();
    let stem = sanitize_key(key);
    let archive_path = cache_dir.join(format!(".{stem}-{id}.zip.part"));
    let staging_dir = cache_dir.join(format!(".staging-{stem}-{id}"));

    let result = std::fs::write(&archive_path, payload)
        .map_err(MirrorError::from)
        .and_then(|()| std::fs::create_dir(&staging_dir).map_err(MirrorError::from))
        .and_then(|()| expand(&archive_path, &staging_dir))
        .and_then(|staged| promote(&staging_dir, cache_dir, staged, primary_suffix));

    remove_quietly(&archive_path, false);
    remove_quietly(&staging_dir, true);

    let files = result?;
    Ok(InstallSummary {
        files,
        bytes: payload.len() as u64,
        digest: format!("{:x}", Sha256::digest(payload)),
    })
}

/// Expand every file entry of the archive into `staging_dir`.
///
/// Returns the staged paths relative to `staging_dir`.
fn expand(archive_path: &Path, staging_dir: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| MirrorError::Archive(format!("cannot open archive: {e}")))?;

    let mut staged = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| MirrorError::Archive(format!("cannot read entry {index}: {e}")))?;
        if entry.is_dir() {
            continue;
        }
        let Some(relative) = entry.enclosed_name() else {
            return Err(MirrorError::Archive(format!(
                "unsafe entry path: {}",
                entry.name()
            )));
        };

        let dest = staging_dir.join(&relative);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&dest)?;
        std::io::copy(&mut entry, &mut out).map_err(|e| {
            MirrorError::Archive(format!("cannot expand {}: {e}", relative.display()))
        })?;
        out.sync_all()?;
        staged.push(relative);
    }

    if staged.is_empty() {
        return Err(MirrorError::Archive("archive contains no files".into()));
    }
    Ok(staged)
}

/// Rename staged files into `cache_dir`, primary files last.
fn promote(
    staging_dir: &Path,
    cache_dir: &Path,
    mut staged: Vec<PathBuf>,
    primary_suffix: &str,
) -> Result<Vec<String>> {
    staged.sort_by_key(|p| p.to_string_lossy().ends_with(primary_suffix));

    let mut installed = Vec::with_capacity(staged.len());
    for relative in staged {
        let target = cache_dir.join(&relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(staging_dir.join(&relative), &target).map_err(|e| {
            MirrorError::Install(format!("cannot install {}: {e}", target.display()))
        })?;
        debug!(file = %relative.display(), "installed cache entry");
        installed.push(relative.to_string_lossy().into_owned());
    }
    Ok(installed)
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn remove_quietly(path: &Path, is_dir: bool) {
    let result = if is_dir {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "cannot remove temporary file"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, body) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn expands_and_removes_temporaries() {
        let dir = tempfile::tempdir().unwrap();
        let payload = build_zip(&[
            ("day1otlk_20240101_cat.shp", b"geometry"),
            ("day1otlk_20240101_cat.dbf", b"attributes"),
            ("day1otlk_20240101_cat.shx", b"index"),
        ]);

        let summary = install_archive(dir.path(), "Day1", &payload, ".shp").unwrap();

        assert_eq!(
            listing(dir.path()),
            [
                "day1otlk_20240101_cat.dbf",
                "day1otlk_20240101_cat.shp",
                "day1otlk_20240101_cat.shx",
            ]
        );
        assert_eq!(summary.files.len(), 3);
        assert_eq!(summary.files.last().map(String::as_str), Some("day1otlk_20240101_cat.shp"));
        assert_eq!(summary.bytes, payload.len() as u64);
        assert_eq!(summary.digest.len(), 64);
        assert_eq!(
            std::fs::read(dir.path().join("day1otlk_20240101_cat.dbf")).unwrap(),
            b"attributes"
        );
    }

    #[test]
    fn reinstall_replaces_identically_named_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = build_zip(&[("day2otlk_cat.shp", b"v1")]);
        let second = build_zip(&[("day2otlk_cat.shp", b"v2")]);

        install_archive(dir.path(), "Day2", &first, ".shp").unwrap();
        install_archive(dir.path(), "Day2", &second, ".shp").unwrap();

        assert_eq!(listing(dir.path()), ["day2otlk_cat.shp"]);
        assert_eq!(std::fs::read(dir.path().join("day2otlk_cat.shp")).unwrap(), b"v2");
    }

    #[test]
    fn same_payload_has_same_digest() {
        let dir = tempfile::tempdir().unwrap();
        let payload = build_zip(&[("day3otlk_cat.shp", b"same")]);
        let a = install_archive(dir.path(), "Day3", &payload, ".shp").unwrap();
        let b = install_archive(dir.path(), "Day3", &payload, ".shp").unwrap();
        assert_eq!(a.digest, b.digest);
    }

    #[test]
    fn non_zip_payload_is_malformed_and_leaves_no_debris() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("day1_prev.shp"), b"previous").unwrap();

        let err = install_archive(dir.path(), "Day1", b"<html>maintenance</html>", ".shp")
            .unwrap_err();

        assert!(matches!(err, MirrorError::Archive(_)), "got: {err}");
        assert_eq!(listing(dir.path()), ["day1_prev.shp"]);
    }

    #[test]
    fn empty_archive_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let payload = build_zip(&[]);
        let err = install_archive(dir.path(), "Day1", &payload, ".shp").unwrap_err();
        assert!(err.to_string().contains("no files"));
        assert!(listing(dir.path()).is_empty());
    }

    #[test]
    fn traversal_entry_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let payload = build_zip(&[("../escape.shp", b"nope")]);
        let err = install_archive(&cache, "Day1", &payload, ".shp").unwrap_err();
        assert!(matches!(err, MirrorError::Archive(_)));
        assert!(!dir.path().join("escape.shp").exists());
    }

    #[test]
    fn creates_missing_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("outlooks").join("spc");
        let payload = build_zip(&[("day1otlk_cat.shp", b"x")]);
        install_archive(&cache, "Day1", &payload, ".shp").unwrap();
        assert!(cache.join("day1otlk_cat.shp").is_file());
    }

    #[test]
    fn keys_are_sanitized_for_temp_names() {
        assert_eq!(sanitize_key("Day1"), "Day1");
        assert_eq!(sanitize_key("../x y"), "___x_y");
    }
}

//! Centralized directory paths for stormwatch.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/stormwatch/` | `~/.config/stormwatch/` |
//! | Cache | `~/Library/Caches/stormwatch/` | `~/.cache/stormwatch/` |
//!
//! # Environment Overrides
//!
//! - `STORMWATCH_CONFIG_DIR`: overrides [`config_dir`]
//! - `STORMWATCH_CACHE_DIR`: overrides [`cache_dir`]
//! - `STORMWATCH_CONFIG`: overrides [`config_file`]

use std::path::PathBuf;

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/stormwatch/` by default. Override with
/// the `STORMWATCH_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("STORMWATCH_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("stormwatch"))
        .unwrap_or_else(|| PathBuf::from("/tmp/stormwatch-config"))
}

/// Application cache directory.
///
/// Holds the mirrored outlook archives. Everything under it can be deleted
/// at any time; the next refresh cycle repopulates it.
#[must_use]
pub fn cache_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("STORMWATCH_CACHE_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::cache_dir()
        .map(|d| d.join("stormwatch"))
        .unwrap_or_else(|| PathBuf::from("/tmp/stormwatch-cache"))
}

/// Convective outlook mirror (`cache_dir()/outlooks/spc/convective/`).
#[must_use]
pub fn convective_outlook_dir() -> PathBuf {
    cache_dir().join("outlooks").join("spc").join("convective")
}

/// Main config file path (`config_dir()/config.toml`).
///
/// `STORMWATCH_CONFIG` points at an explicit file instead.
#[must_use]
pub fn config_file() -> PathBuf {
    if let Some(path) = std::env::var_os("STORMWATCH_CONFIG") {
        return PathBuf::from(path);
    }
    config_dir().join("config.toml")
}

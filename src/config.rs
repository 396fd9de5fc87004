//! Configuration types for the outlook mirror and dashboard view.

use crate::error::{MirrorError, Result};
use crate::render::{RiskPalette, TileLayer};
use crate::resource::RemoteResource;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stormwatch_feeds::FeedConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StormwatchConfig {
    /// Cache directory settings.
    pub cache: CacheConfig,
    /// Background refresh settings.
    pub refresh: RefreshConfig,
    /// Archives mirrored each cycle, in refresh order.
    pub resources: Vec<RemoteResource>,
    /// Foreground view settings.
    pub render: RenderConfig,
    /// Alert / discussion / station panel feeds.
    pub feeds: FeedConfig,
}

impl Default for StormwatchConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            refresh: RefreshConfig::default(),
            resources: RemoteResource::spc_convective_defaults(),
            render: RenderConfig::default(),
            feeds: FeedConfig::default(),
        }
    }
}

/// Cache directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory the archives are expanded into.
    pub root_dir: PathBuf,
    /// Suffix of the file the reader hands to the renderer.
    ///
    /// Matched case-sensitively, as in `.shp`.
    pub suffix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root_dir: crate::app_dirs::convective_outlook_dir(),
            suffix: ".shp".to_owned(),
        }
    }
}

/// Background refresh configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Sleep between the end of one cycle and the start of the next.
    pub interval_secs: u64,
    /// Per-fetch timeout.
    pub fetch_timeout_secs: u64,
    /// User-Agent sent with archive requests.
    pub user_agent: String,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 900,
            fetch_timeout_secs: 60,
            user_agent: format!("stormwatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RefreshConfig {
    /// Interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Fetch timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Foreground view configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Auto-refresh tick for the foreground render pass.
    pub tick_secs: u64,
    /// Initial zoom level for the map.
    pub default_zoom: u8,
    /// Risk label -> fill color overrides (e.g. `SLGT = "#ffff00"`).
    pub risk_colors: BTreeMap<String, String>,
    /// Base map layers, drawn in the listed order.
    pub tile_layers: Vec<TileLayer>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tick_secs: 60,
            default_zoom: 5,
            risk_colors: BTreeMap::new(),
            tile_layers: TileLayer::defaults(),
        }
    }
}

impl StormwatchConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| MirrorError::Config(e.to_string()))
    }

    /// Load the config at `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MirrorError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }

    /// Validates this configuration.
    ///
    /// Checks:
    /// - at least one resource, with unique non-empty keys and http(s) URLs
    /// - `interval_secs` and `fetch_timeout_secs` greater than 0
    /// - `suffix` not empty
    /// - `tick_secs` greater than 0
    /// - risk color overrides name known categories and use `#rrggbb`
    /// - the feed configuration
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.resources.is_empty() {
            return Err(MirrorError::Config(
                "at least one resource must be configured".into(),
            ));
        }
        let mut seen = HashSet::new();
        for resource in &self.resources {
            if resource.key.trim().is_empty() {
                return Err(MirrorError::Config("resource key must not be empty".into()));
            }
            if !seen.insert(resource.key.to_lowercase()) {
                return Err(MirrorError::Config(format!(
                    "duplicate resource key: {}",
                    resource.key
                )));
            }
            let parsed = url::Url::parse(&resource.url).map_err(|e| {
                MirrorError::Config(format!("invalid url for {}: {e}", resource.key))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(MirrorError::Config(format!(
                    "unsupported url scheme for {}: {}",
                    resource.key,
                    parsed.scheme()
                )));
            }
        }
        if self.refresh.interval_secs == 0 {
            return Err(MirrorError::Config(
                "interval_secs must be greater than 0".into(),
            ));
        }
        if self.refresh.fetch_timeout_secs == 0 {
            return Err(MirrorError::Config(
                "fetch_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.cache.suffix.is_empty() {
            return Err(MirrorError::Config("cache suffix must not be empty".into()));
        }
        if self.render.tick_secs == 0 {
            return Err(MirrorError::Config("tick_secs must be greater than 0".into()));
        }
        RiskPalette::with_overrides(&self.render.risk_colors).map_err(MirrorError::Config)?;
        self.feeds
            .validate()
            .map_err(|e| MirrorError::Config(e.to_string()))?;
        Ok(())
    }
}

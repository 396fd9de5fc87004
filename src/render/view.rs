use super::style::RiskPalette;
use super::{Framing, RenderSurface, TileLayer};
use crate::cache::{CacheEntry, CacheReader, shapefile_bounds};
use crate::config::StormwatchConfig;
use crate::error::{MirrorError, Result};
use crate::resource::OutlookDay;
use std::time::SystemTime;
use stormwatch_feeds::{PanelEntry, PanelValue};
use tracing::debug;

/// Shown when the cache holds no usable file for the selected day.
pub const PENDING_NOTICE: &str = "No shapefile found yet. Waiting for background update.";

/// Metric label for the entry's modification time.
pub const LAST_UPDATED_LABEL: &str = "Last Updated (UTC)";

/// Metric label for the entry's staleness.
pub const DATASET_AGE_LABEL: &str = "Dataset Age (minutes)";

/// What a render pass showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing mirrored yet; the pending notice was shown.
    Pending,
    /// The outlook in `entry` was drawn.
    Rendered {
        /// Cache entry that was drawn.
        entry: CacheEntry,
        /// Staleness in whole minutes at render time.
        age_minutes: u64,
    },
}

/// Read-only view over the mirrored outlooks.
#[derive(Debug, Clone)]
pub struct OutlookView {
    reader: CacheReader,
    suffix: String,
    zoom: u8,
    layers: Vec<TileLayer>,
    palette: RiskPalette,
}

impl OutlookView {
    /// View over `reader` looking for files ending in `suffix`, with default styling.
    pub fn new(reader: CacheReader, suffix: impl Into<String>) -> Self {
        Self {
            reader,
            suffix: suffix.into(),
            zoom: 5,
            layers: TileLayer::defaults(),
            palette: RiskPalette::default(),
        }
    }

    /// Build the view from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Config`] if a risk color override is invalid.
    pub fn from_config(config: &StormwatchConfig) -> Result<Self> {
        let palette =
            RiskPalette::with_overrides(&config.render.risk_colors).map_err(MirrorError::Config)?;
        Ok(Self {
            reader: CacheReader::new(config.cache.root_dir.clone()),
            suffix: config.cache.suffix.clone(),
            zoom: config.render.default_zoom,
            layers: config.render.tile_layers.clone(),
            palette,
        })
    }

    /// The active palette.
    pub fn palette(&self) -> &RiskPalette {
        &self.palette
    }

    /// Run one render pass for `day` onto `surface`, computing age at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the cache directory exists but cannot be read.
    pub fn render<S: RenderSurface>(
        &self,
        day: OutlookDay,
        surface: &mut S,
        now: SystemTime,
    ) -> Result<RenderOutcome> {
        let Some(entry) = self.reader.latest(day.selector(), &self.suffix)? else {
            debug!(day = %day, "no cached outlook yet");
            surface.show_notice(PENDING_NOTICE);
            return Ok(RenderOutcome::Pending);
        };

        let age_minutes = entry.age_minutes_at(now);
        surface.show_metrics(&[
            PanelEntry::new(
                LAST_UPDATED_LABEL,
                PanelValue::Text(entry.modified_utc().format("%Y-%m-%d %H:%M").to_string()),
            ),
            PanelEntry::new(
                DATASET_AGE_LABEL,
                PanelValue::Integer(i64::try_from(age_minutes).unwrap_or(i64::MAX)),
            ),
        ]);

        surface.frame(&Framing::for_bounds(shapefile_bounds(&entry), self.zoom));
        for layer in &self.layers {
            surface.add_base_layer(layer);
        }
        surface.draw_outlook(&entry, &self.palette);
        surface.show_legend(&self.palette.legend());

        debug!(day = %day, file = %entry.file_name(), age_minutes, "outlook rendered");
        Ok(RenderOutcome::Rendered { entry, age_minutes })
    }
}

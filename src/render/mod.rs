//! Foreground render pass for the outlook dashboard.
//!
//! [`OutlookView`] asks the [`CacheReader`](crate::cache::CacheReader) for the
//! newest file of the selected day and drives a [`RenderSurface`]: metrics,
//! framing, base layers, the outlook layer and the legend, or a "waiting"
//! notice when nothing has been mirrored yet.

pub mod style;
pub mod text;
pub mod view;

pub use style::{FeatureStyle, LegendItem, RiskCategory, RiskPalette};
pub use text::TextSurface;
pub use view::{OutlookView, RenderOutcome};

use crate::cache::{Bounds, CacheEntry};
use serde::{Deserialize, Serialize};
use stormwatch_feeds::PanelEntry;

/// Center of the contiguous United States, `(lat, lon)`.
pub const CONUS_CENTER: (f64, f64) = (39.8, -98.6);

/// Zoom used with [`CONUS_CENTER`].
pub const CONUS_ZOOM: u8 = 4;

/// A raster tile layer drawn beneath (or over) the outlook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Name shown in the layer switcher.
    pub name: String,
    /// Tile URL with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Attribution text.
    pub attribution: String,
    /// `true` for a toggleable overlay, `false` for a base map.
    #[serde(default)]
    pub overlay: bool,
}

impl TileLayer {
    /// NEXRAD radar overlay followed by the Esri satellite base map.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                name: "Radar".to_owned(),
                url_template:
                    "https://mesonet.agron.iastate.edu/cache/tile.py/1.0.0/nexrad-n0r/{z}/{x}/{y}.png"
                        .to_owned(),
                attribution: "NEXRAD".to_owned(),
                overlay: true,
            },
            Self {
                name: "Satellite".to_owned(),
                url_template: "https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_owned(),
                attribution: "Esri".to_owned(),
                overlay: false,
            },
        ]
    }
}

/// Initial map viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    /// `(lat, lon)` of the initial center.
    pub center: (f64, f64),
    /// Initial zoom.
    pub zoom: u8,
    /// Box the map should fit after loading, if known.
    pub fit_bounds: Option<Bounds>,
}

impl Framing {
    /// Frame `bounds` at `zoom`, or the CONUS view when the box is unusable.
    pub fn for_bounds(bounds: Option<Bounds>, zoom: u8) -> Self {
        match bounds {
            Some(b) if b.is_geographic() => Self {
                center: b.center_lat_lon(),
                zoom,
                fit_bounds: Some(b),
            },
            _ => Self {
                center: CONUS_CENTER,
                zoom: CONUS_ZOOM,
                fit_bounds: None,
            },
        }
    }
}

/// Output collaborator for a render pass.
///
/// Implementations decide how things look; the view decides what is shown
/// and in which order.
pub trait RenderSurface {
    /// Show the metrics row (last update time, dataset age).
    fn show_metrics(&mut self, metrics: &[PanelEntry]);

    /// Set the viewport.
    fn frame(&mut self, framing: &Framing);

    /// Add a tile layer. Called in stacking order.
    fn add_base_layer(&mut self, layer: &TileLayer);

    /// Draw the outlook polygons from `entry`, styled with `palette`.
    fn draw_outlook(&mut self, entry: &CacheEntry, palette: &RiskPalette);

    /// Show the risk legend.
    fn show_legend(&mut self, legend: &[LegendItem]);

    /// Show a status message in place of the map.
    fn show_notice(&mut self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layers_are_radar_then_satellite() {
        let layers = TileLayer::defaults();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].attribution, "NEXRAD");
        assert!(layers[0].overlay);
        assert!(layers[0].url_template.contains("nexrad-n0r/{z}/{x}/{y}.png"));
        assert_eq!(layers[1].attribution, "Esri");
        assert!(!layers[1].overlay);
        assert!(layers[1].url_template.ends_with("{z}/{y}/{x}"));
    }

    #[test]
    fn framing_centers_on_geographic_bounds() {
        let bounds = Bounds {
            xmin: -110.0,
            ymin: 30.0,
            xmax: -90.0,
            ymax: 44.0,
        };
        let framing = Framing::for_bounds(Some(bounds), 5);
        assert_eq!(framing.center, (37.0, -100.0));
        assert_eq!(framing.zoom, 5);
        assert_eq!(framing.fit_bounds, Some(bounds));
    }

    #[test]
    fn framing_falls_back_to_conus() {
        let projected = Bounds {
            xmin: -2_000_000.0,
            ymin: 100_000.0,
            xmax: 2_000_000.0,
            ymax: 3_000_000.0,
        };
        for bounds in [None, Some(projected)] {
            let framing = Framing::for_bounds(bounds, 5);
            assert_eq!(framing.center, CONUS_CENTER);
            assert_eq!(framing.zoom, CONUS_ZOOM);
            assert!(framing.fit_bounds.is_none());
        }
    }
}

//! Line-oriented surface, used by the daemon's log output.

use super::style::{LegendItem, RiskCategory, RiskPalette};
use super::{Framing, RenderSurface, TileLayer};
use crate::cache::CacheEntry;
use stormwatch_feeds::PanelEntry;

/// Heading written before every pass.
pub const DASHBOARD_TITLE: &str = "Operational Severe Weather Dashboard";

/// Collects a render pass as plain text lines.
#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    lines: Vec<String>,
}

impl TextSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pass with the dashboard title and a section heading.
    pub fn begin(&mut self, section: &str) {
        self.lines.push(format!("== {DASHBOARD_TITLE}: {section} =="));
    }

    /// Append free-form panel rows under `heading`.
    pub fn show_panel(&mut self, heading: &str, entries: &[PanelEntry]) {
        self.lines.push(format!("[{heading}]"));
        for entry in entries {
            self.lines.push(format!("  {}: {}", entry.label, entry.value));
        }
    }

    /// Lines written so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume the surface, joining all lines.
    pub fn into_text(self) -> String {
        self.lines.join("\n")
    }
}

impl RenderSurface for TextSurface {
    fn show_metrics(&mut self, metrics: &[PanelEntry]) {
        let row: Vec<String> = metrics
            .iter()
            .map(|m| format!("{}: {}", m.label, m.value))
            .collect();
        self.lines.push(row.join(" | "));
    }

    fn frame(&mut self, framing: &Framing) {
        let (lat, lon) = framing.center;
        let mut line = format!("view: center {lat:.2},{lon:.2} zoom {}", framing.zoom);
        if let Some(b) = framing.fit_bounds {
            line.push_str(&format!(
                " fit [{:.2},{:.2}]-[{:.2},{:.2}]",
                b.ymin, b.xmin, b.ymax, b.xmax
            ));
        }
        self.lines.push(line);
    }

    fn add_base_layer(&mut self, layer: &TileLayer) {
        let kind = if layer.overlay { "overlay" } else { "base" };
        self.lines
            .push(format!("layer ({kind}): {} [{}]", layer.name, layer.attribution));
    }

    fn draw_outlook(&mut self, entry: &CacheEntry, palette: &RiskPalette) {
        self.lines.push(format!(
            "outlook: {} ({} bytes)",
            entry.file_name(),
            entry.len()
        ));
        // Attributes are not parsed here, so list the style each category would get.
        for category in RiskCategory::ALL {
            let style = palette.style_for(Some(category.label()));
            self.lines.push(format!(
                "  style {}: fill {} opacity {:.1} stroke {} {}px",
                category.label(),
                style.fill_color,
                style.fill_opacity,
                style.color,
                style.weight
            ));
        }
    }

    fn show_legend(&mut self, legend: &[LegendItem]) {
        self.lines.push("Risk Legend".to_owned());
        for item in legend {
            self.lines.push(format!(
                "  {} {} {}",
                item.category.label(),
                item.color,
                item.category.description()
            ));
        }
    }

    fn show_notice(&mut self, message: &str) {
        self.lines.push(format!("! {message}"));
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::cache::Bounds;
    use stormwatch_feeds::PanelValue;

    #[test]
    fn metrics_render_on_one_row() {
        let mut surface = TextSurface::new();
        surface.show_metrics(&[
            PanelEntry::new("Last Updated (UTC)", PanelValue::Text("2024-01-02 00:15".into())),
            PanelEntry::new("Dataset Age (minutes)", PanelValue::Integer(30)),
        ]);
        assert_eq!(
            surface.lines(),
            ["Last Updated (UTC): 2024-01-02 00:15 | Dataset Age (minutes): 30"]
        );
    }

    #[test]
    fn framing_includes_fit_box() {
        let mut surface = TextSurface::new();
        surface.frame(&Framing::for_bounds(
            Some(Bounds {
                xmin: -100.0,
                ymin: 30.0,
                xmax: -90.0,
                ymax: 40.0,
            }),
            5,
        ));
        assert_eq!(
            surface.lines(),
            ["view: center 35.00,-95.00 zoom 5 fit [30.00,-100.00]-[40.00,-90.00]"]
        );
    }

    #[test]
    fn legend_and_notice() {
        let mut surface = TextSurface::new();
        surface.begin("Day1");
        surface.show_notice("waiting");
        surface.show_legend(&RiskPalette::default().legend());
        let text = surface.into_text();
        assert!(text.starts_with("== Operational Severe Weather Dashboard: Day1 =="));
        assert!(text.contains("! waiting"));
        assert!(text.contains("  HIGH #cc00cc High"));
    }

    #[test]
    fn outlook_lists_category_styles() {
        let entry = CacheEntry::new(
            "/cache/day1otlk_cat.shp".into(),
            "day1otlk_cat.shp".into(),
            std::time::SystemTime::UNIX_EPOCH,
            120,
        );
        let overrides =
            std::collections::BTreeMap::from([("SLGT".to_owned(), "#eeee00".to_owned())]);
        let palette = RiskPalette::with_overrides(&overrides).unwrap();

        let mut surface = TextSurface::new();
        surface.draw_outlook(&entry, &palette);

        let lines = surface.lines();
        assert_eq!(lines[0], "outlook: day1otlk_cat.shp (120 bytes)");
        assert_eq!(lines.len(), 1 + RiskCategory::ALL.len());
        assert_eq!(lines[3], "  style SLGT: fill #eeee00 opacity 0.5 stroke black 1px");
    }

    #[test]
    fn panel_rows_are_indented() {
        let mut surface = TextSurface::new();
        surface.show_panel("Alerts", &[PanelEntry::new("Active Alerts", PanelValue::Integer(3))]);
        assert_eq!(surface.lines(), ["[Alerts]", "  Active Alerts: 3"]);
    }
}

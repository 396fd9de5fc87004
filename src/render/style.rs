//! Risk categories, colors and per-feature styling for outlook polygons.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fill color for features whose risk label is missing or unrecognised.
pub const UNKNOWN_COLOR: &str = "#999999";

/// Convective outlook risk category, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskCategory {
    /// General thunderstorms.
    Tstm,
    /// Marginal risk.
    Mrgl,
    /// Slight risk.
    Slgt,
    /// Enhanced risk.
    Enh,
    /// Moderate risk.
    Mdt,
    /// High risk.
    High,
}

impl RiskCategory {
    /// All categories in legend order.
    pub const ALL: [Self; 6] = [
        Self::Tstm,
        Self::Mrgl,
        Self::Slgt,
        Self::Enh,
        Self::Mdt,
        Self::High,
    ];

    /// Short label as it appears in outlook attributes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tstm => "TSTM",
            Self::Mrgl => "MRGL",
            Self::Slgt => "SLGT",
            Self::Enh => "ENH",
            Self::Mdt => "MDT",
            Self::High => "HIGH",
        }
    }

    /// Human-readable name.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Tstm => "General Thunderstorms",
            Self::Mrgl => "Marginal",
            Self::Slgt => "Slight",
            Self::Enh => "Enhanced",
            Self::Mdt => "Moderate",
            Self::High => "High",
        }
    }

    /// Built-in fill color.
    pub fn default_color(&self) -> &'static str {
        match self {
            Self::Tstm => "#66ccff",
            Self::Mrgl => "#00ff00",
            Self::Slgt => "#ffff00",
            Self::Enh => "#ff9900",
            Self::Mdt => "#ff0000",
            Self::High => "#cc00cc",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stroke and fill applied to one outlook polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStyle {
    /// Fill color (`#rrggbb`).
    pub fill_color: String,
    /// Stroke color.
    pub color: &'static str,
    /// Stroke weight in pixels.
    pub weight: u8,
    /// Fill opacity, 0.0 - 1.0.
    pub fill_opacity: f32,
}

/// One row of the risk legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendItem {
    /// Risk category.
    pub category: RiskCategory,
    /// Fill color shown for the category.
    pub color: String,
}

/// Category -> fill color mapping, with configured overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskPalette {
    colors: BTreeMap<RiskCategory, String>,
}

impl Default for RiskPalette {
    fn default() -> Self {
        Self {
            colors: RiskCategory::ALL
                .into_iter()
                .map(|c| (c, c.default_color().to_owned()))
                .collect(),
        }
    }
}

impl RiskPalette {
    /// Built-in palette with `overrides` (label -> color) applied.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first unknown label or malformed color.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Result<Self, String> {
        let mut palette = Self::default();
        for (label, color) in overrides {
            let category = RiskCategory::from_label(label)
                .ok_or_else(|| format!("unknown risk category: {label}"))?;
            if !is_hex_color(color) {
                return Err(format!("invalid color for {label}: {color}"));
            }
            palette.colors.insert(category, color.to_lowercase());
        }
        Ok(palette)
    }

    /// Fill color for `category`.
    pub fn color(&self, category: RiskCategory) -> &str {
        self.colors
            .get(&category)
            .map_or_else(|| category.default_color(), String::as_str)
    }

    /// Fill color for a raw attribute label; unknown labels get [`UNKNOWN_COLOR`].
    pub fn color_for_label(&self, label: &str) -> &str {
        RiskCategory::from_label(label).map_or(UNKNOWN_COLOR, |c| self.color(c))
    }

    /// Style for a feature carrying risk label `label`.
    pub fn style_for(&self, label: Option<&str>) -> FeatureStyle {
        FeatureStyle {
            fill_color: label
                .map_or(UNKNOWN_COLOR, |l| self.color_for_label(l))
                .to_owned(),
            color: "black",
            weight: 1,
            fill_opacity: 0.5,
        }
    }

    /// Legend rows in category order.
    pub fn legend(&self) -> Vec<LegendItem> {
        RiskCategory::ALL
            .into_iter()
            .map(|category| LegendItem {
                category,
                color: self.color(category).to_owned(),
            })
            .collect()
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_palette_colors() {
        let palette = RiskPalette::default();
        assert_eq!(palette.color_for_label("TSTM"), "#66ccff");
        assert_eq!(palette.color_for_label("MRGL"), "#00ff00");
        assert_eq!(palette.color_for_label("SLGT"), "#ffff00");
        assert_eq!(palette.color_for_label("ENH"), "#ff9900");
        assert_eq!(palette.color_for_label("MDT"), "#ff0000");
        assert_eq!(palette.color_for_label("HIGH"), "#cc00cc");
    }

    #[test]
    fn unknown_label_is_gray() {
        let palette = RiskPalette::default();
        assert_eq!(palette.color_for_label("SIGN"), UNKNOWN_COLOR);
        assert_eq!(palette.color_for_label(""), UNKNOWN_COLOR);
        assert_eq!(palette.style_for(None).fill_color, UNKNOWN_COLOR);
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(RiskCategory::from_label(" slgt "), Some(RiskCategory::Slgt));
        assert_eq!(RiskCategory::from_label("High"), Some(RiskCategory::High));
        assert_eq!(RiskCategory::from_label("2"), None);
    }

    #[test]
    fn feature_style_fixed_stroke() {
        let style = RiskPalette::default().style_for(Some("ENH"));
        assert_eq!(style.fill_color, "#ff9900");
        assert_eq!(style.color, "black");
        assert_eq!(style.weight, 1);
        assert!((style.fill_opacity - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn overrides_replace_single_category() {
        let overrides = BTreeMap::from([("slgt".to_owned(), "#EEEE00".to_owned())]);
        let palette = RiskPalette::with_overrides(&overrides).unwrap();
        assert_eq!(palette.color(RiskCategory::Slgt), "#eeee00");
        assert_eq!(palette.color(RiskCategory::Mdt), "#ff0000");
    }

    #[test]
    fn bad_overrides_rejected() {
        let unknown = BTreeMap::from([("EXTREME".to_owned(), "#000000".to_owned())]);
        assert!(RiskPalette::with_overrides(&unknown).unwrap_err().contains("EXTREME"));

        let bad_color = BTreeMap::from([("MDT".to_owned(), "red".to_owned())]);
        assert!(RiskPalette::with_overrides(&bad_color).unwrap_err().contains("red"));
    }

    #[test]
    fn legend_lists_every_category_in_order() {
        let legend = RiskPalette::default().legend();
        let labels: Vec<&str> = legend.iter().map(|i| i.category.label()).collect();
        assert_eq!(labels, ["TSTM", "MRGL", "SLGT", "ENH", "MDT", "HIGH"]);
        assert_eq!(legend[5].color, "#cc00cc");
    }
}

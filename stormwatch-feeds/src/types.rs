//! Panel value types shared with the dashboard.

use serde::{Deserialize, Serialize};

/// A single panel value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PanelValue {
    /// Whole number (counts, minutes).
    Integer(i64),
    /// Measurement.
    Float(f64),
    /// Free text.
    Text(String),
}

impl std::fmt::Display for PanelValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.1}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// A labelled panel row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelEntry {
    /// Row label.
    pub label: String,
    /// Row value.
    pub value: PanelValue,
}

impl PanelEntry {
    /// Create a row.
    pub fn new(label: impl Into<String>, value: PanelValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Which feed produced a set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// Active weather alerts.
    Alerts,
    /// Mesoscale discussions.
    Discussion,
    /// Surface station observations.
    Station,
}

impl FeedKind {
    /// Panel heading.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Alerts => "Alerts",
            Self::Discussion => "Discussions",
            Self::Station => "Station",
        }
    }
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

//! Latest surface observation for one station (NWS `observations/latest`).

use crate::error::FeedError;
use crate::feed::{Feed, property_str};
use crate::types::{FeedKind, PanelEntry, PanelValue};

/// Measurement properties: (property, label, scale applied to the value).
const READINGS: [(&str, &str, f64); 5] = [
    ("temperature", "Temperature (°C)", 1.0),
    ("dewpoint", "Dewpoint (°C)", 1.0),
    ("windSpeed", "Wind Speed (km/h)", 1.0),
    ("windGust", "Wind Gust (km/h)", 1.0),
    // Reported in Pa.
    ("barometricPressure", "Pressure (hPa)", 0.01),
];

/// Temperature, wind, pressure and conditions at one station.
pub struct StationFeed {
    station: String,
    url: String,
}

impl StationFeed {
    /// Feed for `station`, reading `url`.
    pub fn new(station: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            url: url.into(),
        }
    }

    /// Station identifier.
    pub fn station(&self) -> &str {
        &self.station
    }
}

impl Feed for StationFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::Station
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn summarize(&self, document: &serde_json::Value) -> Result<Vec<PanelEntry>, FeedError> {
        let properties = document
            .get("properties")
            .and_then(serde_json::Value::as_object)
            .ok_or_else(|| {
                FeedError::Parse(format!("{}: observation has no properties", self.station))
            })?;

        let mut entries = Vec::new();
        for (key, label, scale) in READINGS {
            // Missing sensors report {"value": null}.
            let value = properties
                .get(key)
                .and_then(|q| q.get("value"))
                .and_then(serde_json::Value::as_f64);
            if let Some(value) = value {
                entries.push(PanelEntry::new(
                    format!("{} {label}", self.station),
                    PanelValue::Float(value * scale),
                ));
            }
        }
        if let Some(text) = property_str(document, "textDescription") {
            entries.push(PanelEntry::new(
                format!("{} Conditions", self.station),
                PanelValue::Text(text.to_owned()),
            ));
        }
        Ok(entries)
    }
}

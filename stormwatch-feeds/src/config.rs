//! Feed configuration with working defaults.
//!
//! [`FeedConfig`] names the endpoints behind each panel, the request
//! timeout, and how long fetched panels are cached.

use crate::error::FeedError;
use serde::{Deserialize, Serialize};

/// NWS active alerts, GeoJSON.
pub const DEFAULT_ALERTS_URL: &str = "https://api.weather.gov/alerts/active";

/// SPC mesoscale discussions from the NOAA map service, GeoJSON.
pub const DEFAULT_DISCUSSION_URL: &str = "https://mapservices.weather.noaa.gov/vector/rest/services/outlooks/spc_mesoscale_discussion/MapServer/0/query?where=1%3D1&outFields=*&f=geojson";

/// NWS API root used to build station observation URLs.
pub const DEFAULT_STATION_BASE_URL: &str = "https://api.weather.gov";

/// Configuration for the auxiliary panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Active alerts feed. `None` disables the alerts panel.
    pub alerts_url: Option<String>,
    /// Mesoscale discussion feed. `None` disables the discussion panel.
    pub discussion_url: Option<String>,
    /// Root for `stations/{id}/observations/latest`.
    pub station_base_url: String,
    /// Station identifiers (e.g. `KOKC`) with a telemetry panel each.
    pub stations: Vec<String>,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// How long fetched panels are reused. Set to 0 to disable caching.
    pub cache_ttl_seconds: u64,
    /// User-Agent sent with every request. The NWS API rejects requests without one.
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            alerts_url: Some(DEFAULT_ALERTS_URL.to_owned()),
            discussion_url: Some(DEFAULT_DISCUSSION_URL.to_owned()),
            station_base_url: DEFAULT_STATION_BASE_URL.to_owned(),
            stations: Vec::new(),
            timeout_seconds: 15,
            cache_ttl_seconds: 300,
            user_agent: format!("stormwatch-feeds/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FeedConfig {
    /// Observation URL for `station`.
    pub fn station_url(&self, station: &str) -> String {
        format!(
            "{}/stations/{}/observations/latest",
            self.station_base_url.trim_end_matches('/'),
            station.trim().to_uppercase()
        )
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `user_agent` must not be empty
    /// - every URL must be http or https
    /// - station identifiers must be non-empty and alphanumeric
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.timeout_seconds == 0 {
            return Err(FeedError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(FeedError::Config("user_agent must not be empty".into()));
        }
        for (field, value) in [
            ("alerts_url", self.alerts_url.as_deref()),
            ("discussion_url", self.discussion_url.as_deref()),
            ("station_base_url", Some(self.station_base_url.as_str())),
        ] {
            if let Some(value) = value {
                check_http_url(field, value)?;
            }
        }
        for station in &self.stations {
            let id = station.trim();
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(FeedError::Config(format!(
                    "invalid station identifier: {station:?}"
                )));
            }
        }
        Ok(())
    }
}

fn check_http_url(field: &str, value: &str) -> Result<(), FeedError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| FeedError::Config(format!("{field} is not a valid URL: {e}")))?;
    if matches!(parsed.scheme(), "http" | "https") {
        Ok(())
    } else {
        Err(FeedError::Config(format!(
            "{field} must use http or https, got {}",
            parsed.scheme()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = FeedConfig::default();
        assert_eq!(config.alerts_url.as_deref(), Some(DEFAULT_ALERTS_URL));
        assert!(config.discussion_url.is_some());
        assert!(config.stations.is_empty());
        assert_eq!(config.timeout_seconds, 15);
        assert_eq!(config.cache_ttl_seconds, 300);
        assert!(config.user_agent.starts_with("stormwatch-feeds/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn station_url_is_normalised() {
        let config = FeedConfig {
            station_base_url: "https://api.weather.gov/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.station_url(" kokc "),
            "https://api.weather.gov/stations/KOKC/observations/latest"
        );
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = FeedConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn empty_user_agent_rejected() {
        let config = FeedConfig {
            user_agent: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_url_rejected() {
        let config = FeedConfig {
            alerts_url: Some("file:///etc/passwd".into()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("alerts_url"));
    }

    #[test]
    fn disabled_feeds_are_valid() {
        let config = FeedConfig {
            alerts_url: None,
            discussion_url: None,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_station_rejected() {
        let config = FeedConfig {
            stations: vec!["KOKC".into(), "../x".into()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("station"));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: FeedConfig = serde_json::from_str(r#"{"stations": ["KTUL"]}"#).unwrap();
        assert_eq!(config.stations, ["KTUL"]);
        assert_eq!(config.timeout_seconds, 15);
    }
}

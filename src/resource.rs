//! Remote archive definitions and the outlook days the view offers.

use serde::{Deserialize, Serialize};

/// Base URL of the SPC convective outlook shapefile archives.
pub const SPC_OUTLOOK_BASE: &str = "https://www.spc.noaa.gov/products/outlook";

/// A downloadable archive: a URL plus the logical key it is mirrored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResource {
    /// Logical key (e.g. `"Day1"`). Also the log label for the resource.
    pub key: String,
    /// Archive URL.
    pub url: String,
}

impl RemoteResource {
    /// Create a resource definition.
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
        }
    }

    /// The SPC Day 1-3 convective outlook archives, in refresh order.
    pub fn spc_convective_defaults() -> Vec<Self> {
        OutlookDay::ALL
            .iter()
            .map(|day| Self::new(day.key(), day.spc_archive_url()))
            .collect()
    }
}

/// Forecast horizon selectable in the outlook view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutlookDay {
    /// Day 1 outlook.
    Day1,
    /// Day 2 outlook.
    Day2,
    /// Day 3 outlook.
    Day3,
}

impl OutlookDay {
    /// All horizons in display order.
    pub const ALL: [Self; 3] = [Self::Day1, Self::Day2, Self::Day3];

    /// Logical key, matched case-insensitively against cached filenames.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Day1 => "Day1",
            Self::Day2 => "Day2",
            Self::Day3 => "Day3",
        }
    }

    /// Filename fragment the cache reader looks for.
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Day1 => "day1",
            Self::Day2 => "day2",
            Self::Day3 => "day3",
        }
    }

    /// Upstream SPC archive URL for this horizon.
    pub fn spc_archive_url(&self) -> String {
        format!("{SPC_OUTLOOK_BASE}/{}otlk-shp.zip", self.selector())
    }
}

impl std::fmt::Display for OutlookDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for OutlookDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown outlook day: {s}"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn defaults_are_in_day_order() {
        let resources = RemoteResource::spc_convective_defaults();
        let keys: Vec<&str> = resources.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["Day1", "Day2", "Day3"]);
        assert_eq!(
            resources[0].url,
            "https://www.spc.noaa.gov/products/outlook/day1otlk-shp.zip"
        );
        assert_eq!(
            resources[2].url,
            "https://www.spc.noaa.gov/products/outlook/day3otlk-shp.zip"
        );
    }

    #[test]
    fn outlook_day_parses_case_insensitively() {
        assert_eq!("day2".parse::<OutlookDay>().unwrap(), OutlookDay::Day2);
        assert_eq!("DAY3".parse::<OutlookDay>().unwrap(), OutlookDay::Day3);
        assert!("day4".parse::<OutlookDay>().is_err());
    }

    #[test]
    fn selector_matches_upstream_file_names() {
        for day in OutlookDay::ALL {
            assert!(day.spc_archive_url().contains(day.selector()));
        }
    }

    #[test]
    fn outlook_day_display_is_key() {
        assert_eq!(OutlookDay::Day1.to_string(), "Day1");
    }
}

//! Active weather alerts (NWS `alerts/active`).

use crate::error::FeedError;
use crate::feed::{Feed, features, property_str};
use crate::types::{FeedKind, PanelEntry, PanelValue};
use std::collections::BTreeMap;

/// Counts active alerts and surfaces the most severe headline.
pub struct AlertsFeed {
    url: String,
}

impl AlertsFeed {
    /// Feed reading `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// CAP severity, higher is worse.
fn severity_rank(severity: Option<&str>) -> u8 {
    match severity {
        Some("Extreme") => 4,
        Some("Severe") => 3,
        Some("Moderate") => 2,
        Some("Minor") => 1,
        _ => 0,
    }
}

impl Feed for AlertsFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::Alerts
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn summarize(&self, document: &serde_json::Value) -> Result<Vec<PanelEntry>, FeedError> {
        let alerts = features(document)?;
        let total = i64::try_from(alerts.len()).unwrap_or(i64::MAX);
        let mut entries = vec![PanelEntry::new("Active Alerts", PanelValue::Integer(total))];

        let mut by_event: BTreeMap<&str, i64> = BTreeMap::new();
        for alert in alerts {
            let event = property_str(alert, "event").unwrap_or("Unknown Event");
            *by_event.entry(event).or_default() += 1;
        }
        let mut counts: Vec<(&str, i64)> = by_event.into_iter().collect();
        // Most frequent first; BTreeMap order breaks ties alphabetically.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        entries.extend(
            counts
                .into_iter()
                .map(|(event, n)| PanelEntry::new(event, PanelValue::Integer(n))),
        );

        let worst = alerts
            .iter()
            .max_by_key(|a| severity_rank(property_str(a, "severity")));
        if let Some(alert) = worst {
            let headline = property_str(alert, "headline")
                .or_else(|| property_str(alert, "event"))
                .unwrap_or("Unknown Event");
            entries.push(PanelEntry::new(
                "Most Severe",
                PanelValue::Text(headline.to_owned()),
            ));
        }

        Ok(entries)
    }
}

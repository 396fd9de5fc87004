//! SPC mesoscale discussions (GeoJSON feature collection).

use crate::error::FeedError;
use crate::feed::{Feed, features, property_str};
use crate::types::{FeedKind, PanelEntry, PanelValue};

/// Property holding the discussion name (e.g. `MD 1234`).
const NAME_FIELDS: [&str; 3] = ["name", "NAME", "title"];

/// Numeric issue-time property used to find the latest discussion.
const ISSUED_FIELD: &str = "idp_filedate";

/// Counts active discussions and names the latest.
pub struct DiscussionFeed {
    url: String,
}

impl DiscussionFeed {
    /// Feed reading `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

fn name_of(feature: &serde_json::Value) -> Option<&str> {
    NAME_FIELDS.iter().find_map(|key| property_str(feature, key))
}

fn issued_of(feature: &serde_json::Value) -> Option<i64> {
    feature.get("properties")?.get(ISSUED_FIELD)?.as_i64()
}

impl Feed for DiscussionFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::Discussion
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn summarize(&self, document: &serde_json::Value) -> Result<Vec<PanelEntry>, FeedError> {
        let discussions = features(document)?;
        let total = i64::try_from(discussions.len()).unwrap_or(i64::MAX);
        let mut entries = vec![PanelEntry::new(
            "Active Discussions",
            PanelValue::Integer(total),
        )];

        // Without issue times the feed order wins: last one listed.
        let latest = discussions
            .iter()
            .enumerate()
            .max_by_key(|(i, d)| (issued_of(d), *i))
            .and_then(|(_, d)| name_of(d));
        if let Some(name) = latest {
            entries.push(PanelEntry::new(
                "Latest Discussion",
                PanelValue::Text(name.to_owned()),
            ));
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn latest_by_issue_time() {
        let document = json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"name": "MD 0412", "idp_filedate": 1_714_000_000_000_i64}},
                {"properties": {"name": "MD 0414", "idp_filedate": 1_714_000_900_000_i64}},
                {"properties": {"name": "MD 0413", "idp_filedate": 1_714_000_500_000_i64}},
            ]
        });
        let entries = DiscussionFeed::new("http://x").summarize(&document).unwrap();
        assert_eq!(
            entries,
            [
                PanelEntry::new("Active Discussions", PanelValue::Integer(3)),
                PanelEntry::new("Latest Discussion", PanelValue::Text("MD 0414".into())),
            ]
        );
    }

    #[test]
    fn falls_back_to_feed_order() {
        let document = json!({
            "features": [
                {"properties": {"NAME": "MD 0001"}},
                {"properties": {"NAME": "MD 0002"}},
            ]
        });
        let entries = DiscussionFeed::new("http://x").summarize(&document).unwrap();
        assert_eq!(entries[1].value, PanelValue::Text("MD 0002".into()));
    }

    #[test]
    fn empty_collection_has_only_count() {
        let entries = DiscussionFeed::new("http://x")
            .summarize(&json!({"features": []}))
            .unwrap();
        assert_eq!(
            entries,
            [PanelEntry::new("Active Discussions", PanelValue::Integer(0))]
        );
    }
}

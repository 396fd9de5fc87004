//! Trait definition for panel feeds.
//!
//! Each feed fetches one GeoJSON document and boils it down to a handful of
//! [`PanelEntry`] rows. Parsing is split from fetching so the summaries can
//! be tested against fixture documents.

use crate::error::FeedError;
use crate::http;
use crate::types::{FeedKind, PanelEntry};

/// A source of panel rows.
///
/// All implementations must be `Send + Sync` for concurrent fetches.
pub trait Feed: Send + Sync {
    /// Which panel this feed fills.
    fn kind(&self) -> FeedKind;

    /// URL the feed reads. Also the cache key.
    fn url(&self) -> &str;

    /// Summarise a fetched document.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Parse`] if the document lacks the expected shape.
    fn summarize(&self, document: &serde_json::Value) -> Result<Vec<PanelEntry>, FeedError>;

    /// Fetch and summarise the feed.
    ///
    /// # Errors
    ///
    /// Returns the fetch or parse error.
    fn fetch(
        &self,
        client: &reqwest::Client,
    ) -> impl std::future::Future<Output = Result<Vec<PanelEntry>, FeedError>> + Send {
        async move {
            let document = http::get_json(client, self.url()).await?;
            self.summarize(&document)
        }
    }
}

/// The `features` array of a GeoJSON `FeatureCollection`.
pub(crate) fn features(document: &serde_json::Value) -> Result<&[serde_json::Value], FeedError> {
    document
        .get("features")
        .and_then(serde_json::Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| FeedError::Parse("document has no features array".into()))
}

/// String property `key` of a GeoJSON feature.
pub(crate) fn property_str<'a>(feature: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    feature
        .get("properties")?
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

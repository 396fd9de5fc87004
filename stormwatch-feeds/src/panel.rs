//! Concurrent panel collection.
//!
//! Fetches every configured feed at once and keeps whatever succeeds. A
//! failed feed is logged and listed in [`PanelSnapshot::errors`]; it never
//! fails the whole panel. [`spawn_panel_refresh`] keeps the latest snapshot
//! in a `watch` channel so readers never wait on the network.

use crate::cache;
use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::feed::Feed;
use crate::feeds::{AlertsFeed, DiscussionFeed, StationFeed};
use crate::http;
use crate::types::{FeedKind, PanelEntry};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Rows from one feed.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSection {
    /// Feed that produced the rows.
    pub kind: FeedKind,
    /// Rows in display order.
    pub entries: Vec<PanelEntry>,
}

/// Result of one panel collection pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelSnapshot {
    /// Successful feeds, in configuration order.
    pub entries: Vec<PanelSection>,
    /// One message per failed feed.
    pub errors: Vec<String>,
}

impl PanelSnapshot {
    /// All rows, flattened.
    pub fn rows(&self) -> impl Iterator<Item = &PanelEntry> {
        self.entries.iter().flat_map(|s| s.entries.iter())
    }

    /// Rows from `kind` feeds.
    pub fn section(&self, kind: FeedKind) -> Vec<&PanelEntry> {
        self.entries
            .iter()
            .filter(|s| s.kind == kind)
            .flat_map(|s| s.entries.iter())
            .collect()
    }
}

/// The configured feeds, dispatched to their concrete implementations.
enum AnyFeed {
    Alerts(AlertsFeed),
    Discussion(DiscussionFeed),
    Station(StationFeed),
}

impl AnyFeed {
    fn kind(&self) -> FeedKind {
        match self {
            Self::Alerts(f) => f.kind(),
            Self::Discussion(f) => f.kind(),
            Self::Station(f) => f.kind(),
        }
    }

    fn url(&self) -> &str {
        match self {
            Self::Alerts(f) => f.url(),
            Self::Discussion(f) => f.url(),
            Self::Station(f) => f.url(),
        }
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<PanelEntry>, FeedError> {
        match self {
            Self::Alerts(f) => f.fetch(client).await,
            Self::Discussion(f) => f.fetch(client).await,
            Self::Station(f) => f.fetch(client).await,
        }
    }
}

fn configured_feeds(config: &FeedConfig) -> Vec<AnyFeed> {
    let mut feeds = Vec::new();
    if let Some(url) = &config.alerts_url {
        feeds.push(AnyFeed::Alerts(AlertsFeed::new(url.clone())));
    }
    if let Some(url) = &config.discussion_url {
        feeds.push(AnyFeed::Discussion(DiscussionFeed::new(url.clone())));
    }
    for station in &config.stations {
        let id = station.trim().to_uppercase();
        let url = config.station_url(&id);
        feeds.push(AnyFeed::Station(StationFeed::new(id, url)));
    }
    feeds
}

/// Fetch every configured feed concurrently.
///
/// Never fails: configuration and per-feed errors are reported in the
/// snapshot's `errors`.
pub async fn collect_panel(config: &FeedConfig) -> PanelSnapshot {
    let mut snapshot = PanelSnapshot::default();

    if let Err(e) = config.validate() {
        snapshot.errors.push(e.to_string());
        return snapshot;
    }
    let client = match http::build_client(config) {
        Ok(client) => client,
        Err(e) => {
            snapshot.errors.push(e.to_string());
            return snapshot;
        }
    };

    let feeds = configured_feeds(config);
    let ttl = config.cache_ttl_seconds;
    let futures: Vec<_> = feeds
        .iter()
        .map(|feed| {
            let client = &client;
            async move {
                if let Some(hit) = cache::get(feed.url(), ttl).await {
                    tracing::trace!(kind = %feed.kind(), "panel cache hit");
                    return Ok(hit);
                }
                let entries = feed.fetch(client).await?;
                cache::insert(feed.url(), entries.clone(), ttl).await;
                Ok::<_, FeedError>(entries)
            }
        })
        .collect();

    let outcomes = futures::future::join_all(futures).await;

    for (feed, outcome) in feeds.iter().zip(outcomes) {
        match outcome {
            Ok(entries) => {
                tracing::debug!(kind = %feed.kind(), rows = entries.len(), "feed refreshed");
                snapshot.entries.push(PanelSection {
                    kind: feed.kind(),
                    entries,
                });
            }
            Err(err) => {
                tracing::warn!(kind = %feed.kind(), url = feed.url(), error = %err, "feed failed");
                snapshot.errors.push(format!("{}: {err}", feed.kind()));
            }
        }
    }

    snapshot
}

/// Collect the panel now and then every `every` in a background task.
///
/// The receiver starts with an empty snapshot and is updated after each
/// pass. The task ends once every receiver has been dropped.
pub fn spawn_panel_refresh(
    config: FeedConfig,
    every: Duration,
) -> (watch::Receiver<PanelSnapshot>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(PanelSnapshot::default());
    let join = tokio::spawn(async move {
        let mut tick = tokio::time::interval(every.max(Duration::from_millis(1)));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                _ = tick.tick() => {}
            }
            let snapshot = tokio::select! {
                _ = tx.closed() => break,
                snapshot = collect_panel(&config) => snapshot,
            };
            if tx.send(snapshot).is_err() {
                break;
            }
        }
        tracing::debug!("panel refresh stopped");
    });
    (rx, join)
}

//! # stormwatch-feeds
//!
//! Auxiliary panels for the stormwatch dashboard: active alerts, mesoscale
//! discussions and surface station telemetry.
//!
//! ## Design
//!
//! - Each feed reads one GeoJSON document and summarises it into
//!   [`PanelEntry`] rows
//! - Feeds are fetched concurrently; a failed feed is logged and reported,
//!   the others still show
//! - Results are cached per URL in a process-wide TTL cache
//! - A background task can keep the latest snapshot in a `watch` channel

pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod feeds;
pub mod http;
pub mod panel;
pub mod types;

pub use config::FeedConfig;
pub use error::{FeedError, Result};
pub use feed::Feed;
pub use panel::{PanelSection, PanelSnapshot, collect_panel, spawn_panel_refresh};
pub use types::{FeedKind, PanelEntry, PanelValue};

//! Stormwatch: a local mirror of the SPC convective outlooks.
//!
//! A background task keeps the Day 1-3 outlook shapefiles fresh on a fixed
//! cadence while a foreground render pass reads the newest cached file and
//! reports how stale it is.
//!
//! # Architecture
//!
//! - **Refresh**: [`refresh::RefreshScheduler`] runs [`refresh::Mirror`]
//!   cycles: download each archive, expand it beside the cache, rename the
//!   files into place
//! - **Cache**: [`cache::CacheReader`] returns the newest complete file for a
//!   selector, with its modification time
//! - **Render**: [`render::OutlookView`] drives a [`render::RenderSurface`]
//!   with metrics, framing, tile layers, the styled outlook and a legend
//!
//! The filesystem is the only channel between the writer and the reader.

pub mod app_dirs;
pub mod cache;
pub mod config;
pub mod error;
pub mod refresh;
pub mod render;
pub mod resource;

pub use cache::{CacheEntry, CacheReader};
pub use config::StormwatchConfig;
pub use error::{FailureKind, MirrorError, Result};
pub use refresh::{CycleReport, Mirror, RefreshScheduler, SchedulerHandle};
pub use render::{OutlookView, RenderOutcome, RenderSurface};
pub use resource::{OutlookDay, RemoteResource};

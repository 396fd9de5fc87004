//! Local mirror of the outlook archives, as seen by the foreground.
//!
//! The refresh task writes here; [`CacheReader`] picks the authoritative
//! entry for a selector by modification time.

pub mod entry;
pub mod reader;
pub mod shapefile;

pub use entry::CacheEntry;
pub use reader::{CacheReader, shapefile_bounds};
pub use shapefile::Bounds;

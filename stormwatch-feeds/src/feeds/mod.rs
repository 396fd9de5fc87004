//! Concrete feed implementations.

pub mod alerts;
pub mod discussion;
pub mod station;

pub use alerts::AlertsFeed;
pub use discussion::DiscussionFeed;
pub use station::StationFeed;

//! Error types for the stormwatch-feeds crate.

/// Errors that can occur while fetching or summarising a feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request exceeded the configured timeout.
    #[error("feed timed out: {0}")]
    Timeout(String),

    /// The response was not the expected GeoJSON shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid feed configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for stormwatch-feeds results.
pub type Result<T> = std::result::Result<T, FeedError>;

//! Shared HTTP client and JSON fetch for the feeds.

use crate::config::FeedConfig;
use crate::error::FeedError;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;

/// Build a [`reqwest::Client`] for GeoJSON feeds.
///
/// # Errors
///
/// Returns [`FeedError::Http`] if the client cannot be constructed.
pub fn build_client(config: &FeedConfig) -> Result<reqwest::Client, FeedError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/geo+json, application/json"),
    );

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| FeedError::Http(format!("failed to build HTTP client: {e}")))
}

/// GET `url` and decode the body as JSON.
///
/// # Errors
///
/// Returns [`FeedError::Timeout`], [`FeedError::Http`] for transport failures
/// and non-success statuses, and [`FeedError::Parse`] for undecodable bodies.
pub async fn get_json(client: &reqwest::Client, url: &str) -> Result<serde_json::Value, FeedError> {
    let response = client.get(url).send().await.map_err(|e| request_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Http(format!("HTTP {status} from {url}")));
    }

    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                request_error(url, &e)
            } else {
                FeedError::Parse(format!("invalid JSON from {url}: {e}"))
            }
        })
}

fn request_error(url: &str, err: &reqwest::Error) -> FeedError {
    if err.is_timeout() {
        FeedError::Timeout(url.to_owned())
    } else {
        FeedError::Http(format!("{url}: {err}"))
    }
}

//! Archive download.

use crate::config::RefreshConfig;
use crate::error::{MirrorError, Result};
use crate::resource::RemoteResource;
use bytes::Bytes;
use tracing::debug;

/// Build the HTTP client used for archive requests.
///
/// The per-request timeout from `config` covers connect, headers and body.
///
/// # Errors
///
/// Returns [`MirrorError::Config`] if the client cannot be constructed.
pub fn build_client(config: &RefreshConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.fetch_timeout())
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| MirrorError::Config(format!("failed to build HTTP client: {e}")))
}

/// Download the archive for `resource`.
///
/// # Errors
///
/// Returns [`MirrorError::Fetch`] on transport errors, timeouts and
/// non-success status codes.
pub async fn fetch_archive(client: &reqwest::Client, resource: &RemoteResource) -> Result<Bytes> {
    let response = client
        .get(&resource.url)
        .send()
        .await
        .map_err(|e| fetch_error(resource, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::Fetch(format!(
            "{}: HTTP {status} from {}",
            resource.key, resource.url
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| fetch_error(resource, &e))?;
    debug!(key = %resource.key, bytes = body.len(), "archive downloaded");
    Ok(body)
}

fn fetch_error(resource: &RemoteResource, err: &reqwest::Error) -> MirrorError {
    if err.is_timeout() {
        MirrorError::Fetch(format!("{}: timed out fetching {}", resource.key, resource.url))
    } else {
        MirrorError::Fetch(format!("{}: {err}", resource.key))
    }
}

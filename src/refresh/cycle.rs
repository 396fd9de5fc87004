//! One refresh cycle: fetch-unpack-install for every configured resource.

use super::fetch::{build_client, fetch_archive};
use super::install::{InstallSummary, install_archive};
use crate::config::StormwatchConfig;
use crate::error::{FailureKind, MirrorError, Result};
use crate::resource::RemoteResource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of refreshing a single resource within a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResourceOutcome {
    /// Archive fetched and installed.
    Installed {
        /// Resource key.
        key: String,
        /// What the installation produced.
        summary: InstallSummary,
    },
    /// Fetch or unpack failed; previous cache entries are untouched.
    Failed {
        /// Resource key.
        key: String,
        /// Failure class.
        kind: FailureKind,
        /// Error message.
        message: String,
    },
}

impl ResourceOutcome {
    /// Resource key this outcome belongs to.
    pub fn key(&self) -> &str {
        match self {
            Self::Installed { key, .. } | Self::Failed { key, .. } => key,
        }
    }

    /// Returns `true` if the resource was installed.
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }
}

/// Aggregated outcome of one refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// Cycle number, starting at 1.
    pub cycle: u64,
    /// When the cycle started.
    pub started_at: DateTime<Utc>,
    /// When the last resource was attempted.
    pub finished_at: DateTime<Utc>,
    /// Per-resource outcomes, in refresh order.
    pub outcomes: Vec<ResourceOutcome>,
}

impl CycleReport {
    /// Number of resources installed.
    pub fn installed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_installed()).count()
    }

    /// Number of resources that failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.installed_count()
    }

    /// Returns `true` if every resource was installed.
    pub fn is_clean(&self) -> bool {
        self.failed_count() == 0
    }

    /// Outcome for `key`, if that resource was part of the cycle.
    pub fn outcome(&self, key: &str) -> Option<&ResourceOutcome> {
        self.outcomes.iter().find(|o| o.key() == key)
    }

    /// Log one line per failed resource plus a cycle summary.
    pub fn log(&self) {
        for outcome in &self.outcomes {
            if let ResourceOutcome::Failed { key, kind, message } = outcome {
                warn!(cycle = self.cycle, key = %key, kind = %kind, error = %message, "resource refresh failed");
            }
        }
        let elapsed_ms = (self.finished_at - self.started_at).num_milliseconds();
        info!(
            cycle = self.cycle,
            installed = self.installed_count(),
            failed = self.failed_count(),
            elapsed_ms,
            "refresh cycle finished"
        );
    }
}

/// A unit of work the scheduler runs once per tick.
pub trait RefreshJob: Send + Sync + 'static {
    /// Run cycle number `cycle` to completion.
    ///
    /// Implementations must not fail as a whole; per-resource failures are
    /// recorded in the report.
    fn run_cycle(&self, cycle: u64) -> impl Future<Output = CycleReport> + Send;
}

/// Mirrors a fixed set of remote archives into a cache directory.
#[derive(Debug, Clone)]
pub struct Mirror {
    client: reqwest::Client,
    resources: Vec<RemoteResource>,
    root: PathBuf,
    suffix: String,
}

impl Mirror {
    /// Create a mirror from its parts.
    pub fn new(
        client: reqwest::Client,
        resources: Vec<RemoteResource>,
        root: impl Into<PathBuf>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            resources,
            root: root.into(),
            suffix: suffix.into(),
        }
    }

    /// Build a mirror from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &StormwatchConfig) -> Result<Self> {
        let client = build_client(&config.refresh)?;
        Ok(Self::new(
            client,
            config.resources.clone(),
            config.cache.root_dir.clone(),
            config.cache.suffix.clone(),
        ))
    }

    /// Cache directory the mirror writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configured resources, in refresh order.
    pub fn resources(&self) -> &[RemoteResource] {
        &self.resources
    }

    /// Create the cache directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Fetch, unpack and install one resource.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the fetch-unpack-install sequence.
    pub async fn refresh_resource(&self, resource: &RemoteResource) -> Result<InstallSummary> {
        let payload = fetch_archive(&self.client, resource).await?;

        let root = self.root.clone();
        let key = resource.key.clone();
        let suffix = self.suffix.clone();
        tokio::task::spawn_blocking(move || install_archive(&root, &key, &payload, &suffix))
            .await
            .map_err(|e| MirrorError::Scheduler(format!("install task failed: {e}")))?
    }
}

impl RefreshJob for Mirror {
    async fn run_cycle(&self, cycle: u64) -> CycleReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(self.resources.len());

        for resource in &self.resources {
            let outcome = match self.refresh_resource(resource).await {
                Ok(summary) => {
                    info!(
                        key = %resource.key,
                        files = summary.files.len(),
                        bytes = summary.bytes,
                        "resource refreshed"
                    );
                    ResourceOutcome::Installed {
                        key: resource.key.clone(),
                        summary,
                    }
                }
                Err(e) => ResourceOutcome::Failed {
                    key: resource.key.clone(),
                    kind: e.kind(),
                    message: e.to_string(),
                },
            };
            outcomes.push(outcome);
        }

        CycleReport {
            cycle,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn installed(key: &str) -> ResourceOutcome {
        ResourceOutcome::Installed {
            key: key.into(),
            summary: InstallSummary {
                files: vec![format!("{}.shp", key.to_lowercase())],
                bytes: 10,
                digest: "00".into(),
            },
        }
    }

    fn failed(key: &str) -> ResourceOutcome {
        ResourceOutcome::Failed {
            key: key.into(),
            kind: FailureKind::TransientFetch,
            message: "fetch error: HTTP 500".into(),
        }
    }

    #[test]
    fn report_counts() {
        let now = Utc::now();
        let report = CycleReport {
            cycle: 1,
            started_at: now,
            finished_at: now,
            outcomes: vec![installed("Day1"), failed("Day2"), installed("Day3")],
        };
        assert_eq!(report.installed_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.is_clean());
        assert!(report.outcome("Day2").is_some_and(|o| !o.is_installed()));
        assert!(report.outcome("Day4").is_none());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(failed("Day2")).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "transient_fetch");
        assert_eq!(json["key"], "Day2");
    }

    #[tokio::test]
    async fn unreachable_resource_fails_without_touching_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::config::RefreshConfig {
            fetch_timeout_secs: 2,
            ..Default::default()
        };
        let mirror = Mirror::new(
            build_client(&config).unwrap(),
            vec![RemoteResource::new("Day1", "http://127.0.0.1:9/day1.zip")],
            dir.path(),
            ".shp",
        );

        let report = mirror.run_cycle(1).await;

        assert_eq!(report.failed_count(), 1);
        assert!(matches!(
            report.outcome("Day1"),
            Some(ResourceOutcome::Failed {
                kind: FailureKind::TransientFetch,
                ..
            })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

//! Refresh scheduler background loop.
//!
//! Spawns a tokio task that runs a refresh cycle, sleeps for the configured
//! interval, and repeats until stopped. Each cycle runs in its own task so a
//! panic inside one cycle is logged and the loop carries on.

use super::cycle::{CycleReport, RefreshJob, ResourceOutcome};
use super::guard::{PROCESS_GUARD, StartGuard};
use crate::error::{MirrorError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Background scheduler that keeps the cache directory fresh.
pub struct RefreshScheduler<J: RefreshJob> {
    job: Arc<J>,
    interval: Duration,
    report_tx: Option<mpsc::UnboundedSender<CycleReport>>,
    cancel: CancellationToken,
    last_digests: HashMap<String, String>,
}

impl<J: RefreshJob> RefreshScheduler<J> {
    /// Create a scheduler that runs `job` every `interval`.
    pub fn new(job: J, interval: Duration) -> Self {
        Self {
            job: Arc::new(job),
            interval,
            report_tx: None,
            cancel: CancellationToken::new(),
            last_digests: HashMap::new(),
        }
    }

    /// Send every finished [`CycleReport`] to `tx`.
    pub fn with_reports(mut self, tx: mpsc::UnboundedSender<CycleReport>) -> Self {
        self.report_tx = Some(tx);
        self
    }

    /// Use an externally owned stop signal.
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Start the loop unless the process-wide guard was already claimed.
    ///
    /// Returns `None` when a scheduler is already running in this process.
    pub fn start(self) -> Option<SchedulerHandle> {
        self.start_once(&PROCESS_GUARD)
    }

    /// Start the loop unless `guard` was already claimed.
    pub fn start_once(self, guard: &StartGuard) -> Option<SchedulerHandle> {
        if !guard.try_claim() {
            debug!("refresh scheduler already started, ignoring");
            return None;
        }
        Some(self.run())
    }

    /// Start the loop unconditionally.
    pub fn run(self) -> SchedulerHandle {
        let cancel = self.cancel.clone();
        let join = tokio::spawn(self.run_loop());
        SchedulerHandle { cancel, join }
    }

    async fn run_loop(mut self) {
        info!(interval_secs = self.interval.as_secs(), "refresh scheduler started");
        let mut cycle: u64 = 0;

        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            cycle += 1;

            let job = Arc::clone(&self.job);
            let mut task = tokio::spawn(async move { job.run_cycle(cycle).await });
            let joined = tokio::select! {
                joined = &mut task => joined,
                _ = self.cancel.cancelled() => {
                    task.abort();
                    info!(cycle, "refresh scheduler stopped during cycle");
                    return;
                }
            };

            match joined {
                Ok(report) => self.handle_report(report),
                Err(e) if e.is_panic() => {
                    error!(cycle, "refresh cycle panicked, continuing with next cycle");
                }
                Err(e) => warn!(cycle, error = %e, "refresh cycle task did not complete"),
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("refresh scheduler stopped");
    }

    fn handle_report(&mut self, report: CycleReport) {
        report.log();

        for outcome in &report.outcomes {
            if let ResourceOutcome::Installed { key, summary } = outcome {
                let previous = self
                    .last_digests
                    .insert(key.clone(), summary.digest.clone());
                if previous.as_deref() == Some(summary.digest.as_str()) {
                    debug!(key = %key, "upstream archive unchanged since last cycle");
                }
            }
        }

        let closed = self
            .report_tx
            .as_ref()
            .is_some_and(|tx| tx.send(report).is_err());
        if closed {
            // Nobody listens any more; keep refreshing regardless.
            debug!("cycle report channel closed");
            self.report_tx = None;
        }
    }
}

/// Handle to a running scheduler.
#[derive(Debug)]
pub struct SchedulerHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// The stop signal shared with the loop.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns `true` once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signal the loop to stop and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Scheduler`] if the loop task panicked.
    pub async fn stop(self) -> Result<()> {
        self.cancel.cancel();
        self.join
            .await
            .map_err(|e| MirrorError::Scheduler(format!("scheduler task failed: {e}")))
    }
}

//! Background refresh of the mirrored outlook archives.
//!
//! A single [`RefreshScheduler`] task runs a [`RefreshJob`] cycle, sleeps,
//! and repeats until its stop signal fires. [`Mirror`] is the production job:
//! for each [`RemoteResource`](crate::resource::RemoteResource) it downloads
//! the archive, expands it next to the cache, and renames the files into
//! place. A failure is recorded for that resource only and retried on the
//! next cycle.

pub mod cycle;
pub mod fetch;
pub mod guard;
pub mod install;
pub mod runner;

pub use cycle::{CycleReport, Mirror, RefreshJob, ResourceOutcome};
pub use guard::{PROCESS_GUARD, StartGuard};
pub use install::InstallSummary;
pub use runner::{RefreshScheduler, SchedulerHandle};

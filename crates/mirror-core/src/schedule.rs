//! Periodic execution of synchronization passes
//!
//! The scheduler runs one pass immediately, then one pass per period, until
//! its [`CancellationToken`] is cancelled. Passes run one at a time on the
//! blocking pool; cancellation is only observed before a pass starts and
//! while waiting for the next tick, so a pass in flight always completes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::sync::{SyncReport, synchronize};
use crate::{Error, Result};

/// Lifecycle of a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Created, no pass started yet
    Idle,
    /// A pass is in progress
    Running,
    /// Between passes, waiting for the period to elapse
    WaitingForNextTick,
    /// Terminal: no further passes will run
    Stopped,
}

/// What the scheduler did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Passes started (every started pass also finished)
    pub passes: u64,
    /// Passes that ended with an error
    pub failed_passes: u64,
}

/// Runs [`synchronize`] on a fixed period until cancelled.
pub struct Scheduler {
    period: Duration,
    source: PathBuf,
    replica: PathBuf,
    cancel: CancellationToken,
    state: watch::Sender<SchedulerState>,
}

impl Scheduler {
    /// Create a scheduler in the [`SchedulerState::Idle`] state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPeriod`] for a zero period, which would turn
    /// the loop into a busy loop.
    pub fn new(
        period: Duration,
        source: impl Into<PathBuf>,
        replica: impl Into<PathBuf>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        if period.is_zero() {
            return Err(Error::InvalidPeriod { value: 0 });
        }
        let (state, _) = watch::channel(SchedulerState::Idle);
        Ok(Self {
            period,
            source: source.into(),
            replica: replica.into(),
            cancel,
            state,
        })
    }

    /// Subscribe to state transitions.
    pub fn state(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    /// Run the loop on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<RunSummary> {
        tokio::spawn(self.run())
    }

    /// Run the loop until cancelled and report what happened.
    pub async fn run(self) -> RunSummary {
        let mut summary = RunSummary::default();

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            self.state.send_replace(SchedulerState::Running);
            info!("Executing periodic task...");
            summary.passes += 1;

            match self.run_pass().await {
                Ok(report) => info!(
                    dirs_created = report.dirs_created,
                    files_copied = report.files_copied,
                    files_updated = report.files_updated,
                    files_unchanged = report.files_unchanged,
                    dirs_deleted = report.dirs_deleted,
                    files_deleted = report.files_deleted,
                    "Synchronization pass complete"
                ),
                Err(e) => {
                    summary.failed_passes += 1;
                    error!(error = %e, "Error synchronizing files");
                }
            }

            self.state.send_replace(SchedulerState::WaitingForNextTick);
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.period) => {}
            }
        }

        self.state.send_replace(SchedulerState::Stopped);
        info!(
            passes = summary.passes,
            failed_passes = summary.failed_passes,
            "Scheduler stopped"
        );
        summary
    }

    async fn run_pass(&self) -> Result<SyncReport> {
        let source = self.source.clone();
        let replica = self.replica.clone();
        tokio::task::spawn_blocking(move || synchronize(&source, &replica)).await?
    }
}

/// Run [`synchronize`] every `period` until `cancel` is raised.
///
/// The first pass starts immediately. Failed passes are logged and do not
/// stop the loop.
pub async fn run_periodically(
    period: Duration,
    cancel: CancellationToken,
    source: &Path,
    replica: &Path,
) -> Result<RunSummary> {
    let scheduler = Scheduler::new(period, source, replica, cancel)?;
    Ok(scheduler.run().await)
}

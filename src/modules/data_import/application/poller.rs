//! Progress poll loop for a submitted import job.
//!
//! The loop waits an initial delay, then requests a snapshot at a fixed
//! interval until the job reaches a terminal state, the time budget runs out,
//! a request fails, or the cancellation token fires. Failed requests are not
//! retried; the operator can recheck manually.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::progress_tracker::ProgressTracker;
use crate::modules::data_import::domain::{
    ImportJob, ImportJobService, ImportReport, ImportResult, ProgressId, ProgressSnapshot,
    ReloadPolicy,
};
use crate::shared::config::PollConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::Clock;
use crate::{log_debug, log_info, log_warn};

pub use crate::modules::data_import::domain::UNKNOWN_ERROR;

pub const CONNECTION_LOST_MESSAGE: &str =
    "Lost connection while checking import progress. The import may still be running on the server.";
pub const CANCELLED_MESSAGE: &str = "Stopped checking import progress";

pub fn timeout_message(max_duration: Duration) -> String {
    format!(
        "Import is still running on the server but this client stopped waiting after {} seconds. Check its progress again later.",
        max_duration.as_secs()
    )
}

/// A completed job together with its display model
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedImport {
    pub job: ImportJob,
    pub result: ImportResult,
    pub report: ImportReport,
    /// Set when front-ends should refresh after this delay
    pub reload_after: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed(CompletedImport),
    /// The job reported `error`
    Failed { message: String },
    /// The client gave up; the job may still be running
    TimedOut { elapsed: Duration, message: String },
    /// A progress request failed
    ConnectionLost { message: String },
    Cancelled,
}

impl PollOutcome {
    pub fn into_result(self) -> AppResult<CompletedImport> {
        match self {
            PollOutcome::Completed(done) => Ok(done),
            PollOutcome::Failed { message } => Err(AppError::JobError(message)),
            PollOutcome::TimedOut { message, .. } => Err(AppError::TimeoutError(message)),
            PollOutcome::ConnectionLost { message } => Err(AppError::TransportError(message)),
            PollOutcome::Cancelled => Err(AppError::Cancelled(CANCELLED_MESSAGE.to_string())),
        }
    }
}

pub struct ProgressPoller {
    job_service: Arc<dyn ImportJobService>,
    clock: Arc<dyn Clock>,
    config: PollConfig,
    reload_policy: ReloadPolicy,
    tracker: ProgressTracker,
    snapshots: Arc<DashMap<ProgressId, ProgressSnapshot>>,
}

impl ProgressPoller {
    pub fn new(
        job_service: Arc<dyn ImportJobService>,
        clock: Arc<dyn Clock>,
        config: PollConfig,
        tracker: ProgressTracker,
        snapshots: Arc<DashMap<ProgressId, ProgressSnapshot>>,
    ) -> Self {
        Self {
            reload_policy: ReloadPolicy::from_config(&config),
            job_service,
            clock,
            config,
            tracker,
            snapshots,
        }
    }

    /// Drive the poll loop for `job` until it ends
    pub async fn run(&self, job: &ImportJob, cancel: &CancellationToken) -> PollOutcome {
        let progress_id = job.progress_id();
        let started = self.clock.now();
        let mut requests: u32 = 0;

        log_info!("Polling progress of import {}", progress_id);

        if !self.pause(self.config.initial_delay, cancel).await {
            return self.cancelled(progress_id);
        }

        loop {
            let elapsed = self.clock.now().duration_since(started);
            if elapsed >= self.config.max_duration {
                let message = timeout_message(self.config.max_duration);
                log_warn!(
                    "Stopped polling import {} after {:?} and {} requests",
                    progress_id,
                    elapsed,
                    requests
                );
                self.tracker.emit_timed_out(progress_id, &message);
                return PollOutcome::TimedOut { elapsed, message };
            }

            requests += 1;
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(progress_id),
                fetched = self.job_service.fetch_progress(progress_id) => fetched,
            };

            let snapshot = match fetched {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log_warn!("Progress request for import {} failed: {}", progress_id, e);
                    let message = format!("{} ({})", CONNECTION_LOST_MESSAGE, e.user_message());
                    self.tracker.emit_connection_lost(progress_id, &message);
                    return PollOutcome::ConnectionLost { message };
                }
            };

            self.snapshots.insert(progress_id.clone(), snapshot.clone());
            self.tracker.emit_progress(progress_id, &snapshot);

            if snapshot.status.is_terminal() {
                return self.finish(job, &snapshot);
            }
            log_debug!(
                "Import {} still {} after {} requests",
                progress_id,
                snapshot.status,
                requests
            );

            if !self.pause(self.config.interval, cancel).await {
                return self.cancelled(progress_id);
            }
        }
    }

    fn finish(&self, job: &ImportJob, snapshot: &ProgressSnapshot) -> PollOutcome {
        let Some(result) = snapshot.completed_result() else {
            let message = snapshot
                .failure_message()
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            log_warn!("Import {} failed: {}", job.progress_id(), message);
            self.tracker.emit_failed(job.progress_id(), &message);
            return PollOutcome::Failed { message };
        };

        if snapshot.result.is_none() {
            log_warn!(
                "Import {} completed without a result payload",
                job.progress_id()
            );
        }

        let report = ImportReport::from_result(&result);
        let reload_after = self.reload_policy.reload_after(job, &result);

        log_info!(
            "Import {} completed: {} processed, {} created, {} updated, {} skipped in {}",
            job.progress_id(),
            result.records_processed,
            result.records_created,
            result.records_updated,
            result.records_skipped,
            report.execution_time
        );

        self.tracker.emit_completed(job, report.clone());

        PollOutcome::Completed(CompletedImport {
            job: job.clone(),
            result,
            report,
            reload_after,
        })
    }

    fn cancelled(&self, progress_id: &ProgressId) -> PollOutcome {
        log_info!("Polling of import {} cancelled", progress_id);
        self.tracker.emit_cancelled(progress_id);
        PollOutcome::Cancelled
    }

    /// Sleep unless cancelled first. Returns false on cancellation.
    async fn pause(&self, duration: Duration, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = self.clock.sleep(duration) => true,
        }
    }
}

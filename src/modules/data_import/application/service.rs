use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::poll_handle::PollHandle;
use super::poller::{CompletedImport, PollOutcome, ProgressPoller};
use super::progress_tracker::ProgressTracker;
use crate::modules::data_import::domain::{
    Confirmation, ImportEvent, ImportJob, ImportJobService, ImportRequest, ProgressId,
    ProgressSnapshot, UploadFile, ValidationReport,
};
use crate::shared::config::PollConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::EventBus;
use crate::shared::utils::{Clock, TimedOperation, Validator};
use crate::{log_info, log_warn};

pub const DELETE_CONFIRMATION_PROMPT: &str = "This will permanently delete ALL existing data before importing. This cannot be undone. Continue?";

/// Import service - the single entry point front-ends use for imports
///
/// Submission, polling and validation are delegated to the injected
/// `ImportJobService`; this type owns the workflow rules around them.
#[derive(Clone)]
pub struct ImportService {
    job_service: Arc<dyn ImportJobService>,
    clock: Arc<dyn Clock>,
    config: PollConfig,
    tracker: ProgressTracker,
    snapshots: Arc<DashMap<ProgressId, ProgressSnapshot>>,
    active_polls: Arc<DashMap<ProgressId, CancellationToken>>,
}

impl ImportService {
    pub fn new(
        job_service: Arc<dyn ImportJobService>,
        clock: Arc<dyn Clock>,
        config: PollConfig,
        events: EventBus<ImportEvent>,
    ) -> Self {
        Self {
            job_service,
            clock,
            config,
            tracker: ProgressTracker::new(events),
            snapshots: Arc::new(DashMap::new()),
            active_polls: Arc::new(DashMap::new()),
        }
    }

    pub fn events(&self) -> &EventBus<ImportEvent> {
        self.tracker.events()
    }

    /// Validate the request, confirm destructive options, and start the job
    pub async fn submit_import(
        &self,
        request: ImportRequest,
        confirmation: &dyn Confirmation,
    ) -> AppResult<ImportJob> {
        let timer = TimedOperation::new("submit_import");

        let destructive = request.is_destructive();
        let submission = request.into_submission()?;

        if destructive && !confirmation.confirm(DELETE_CONFIRMATION_PROMPT) {
            log_info!("Destructive import of {} declined", submission.file.file_name);
            return Err(AppError::Cancelled(
                "Import cancelled; existing data was left untouched".to_string(),
            ));
        }

        let progress_id = self.job_service.submit(&submission).await?;
        let job = ImportJob::new(progress_id, submission.dry_run, submission.conflict_strategy);

        timer.finish_with_info(&format!(
            "{} as {}{}",
            submission.file.file_name,
            job.progress_id(),
            if job.dry_run() { ", dry run" } else { "" }
        ));
        self.tracker.emit_submitted(&job);

        Ok(job)
    }

    /// Start the poll chain for a submitted job
    ///
    /// Only one chain per progress id may run at a time.
    pub fn start_polling(&self, job: ImportJob) -> AppResult<PollHandle> {
        let progress_id = job.progress_id().clone();
        let cancel = CancellationToken::new();

        match self.active_polls.entry(progress_id.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::ValidationError(format!(
                    "Import {} is already being tracked",
                    progress_id
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(cancel.clone());
            }
        }

        let poller = ProgressPoller::new(
            Arc::clone(&self.job_service),
            Arc::clone(&self.clock),
            self.config.clone(),
            self.tracker.clone(),
            Arc::clone(&self.snapshots),
        );
        let active_polls = Arc::clone(&self.active_polls);
        let snapshots = Arc::clone(&self.snapshots);
        let clock = Arc::clone(&self.clock);
        let tracker = self.tracker.clone();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let outcome = poller.run(&job, &token).await;
            active_polls.remove(job.progress_id());
            snapshots.remove(job.progress_id());

            if let PollOutcome::Completed(done) = &outcome {
                if let Some(delay) = done.reload_after {
                    schedule_reload(clock, tracker, job.progress_id().clone(), delay);
                }
            }

            outcome
        });

        Ok(PollHandle::new(progress_id, cancel, task))
    }

    /// Submit, poll to the end, and return the completed import
    pub async fn import(
        &self,
        request: ImportRequest,
        confirmation: &dyn Confirmation,
    ) -> AppResult<CompletedImport> {
        let job = self.submit_import(request, confirmation).await?;
        let handle = self.start_polling(job)?;
        handle.wait().await?.into_result()
    }

    /// Dry-check a file; nothing is persisted and no job is started
    pub async fn validate_file(
        &self,
        file: Option<UploadFile>,
        adapter_name: &str,
    ) -> AppResult<ValidationReport> {
        let timer = TimedOperation::new("validate_file");

        let file = file.ok_or_else(|| {
            AppError::ValidationError("Please select a file to validate".to_string())
        })?;
        Validator::validate_file_selected(&file.file_name, file.size())?;
        Validator::validate_adapter_name(adapter_name)?;

        let outcome = self.job_service.validate(&file, adapter_name).await?;
        let report = ValidationReport::build(&outcome);

        timer.finish_with_info(&format!(
            "{}: {} records, {} errors",
            file.file_name,
            report.records_found,
            report.errors.total
        ));

        Ok(report)
    }

    /// One-off progress request for a job, e.g. after the poll loop gave up
    pub async fn check_progress(&self, progress_id: &ProgressId) -> AppResult<ProgressSnapshot> {
        let timer = TimedOperation::new("check_progress");
        let snapshot = self.job_service.fetch_progress(progress_id).await?;
        timer.finish();
        // Only jobs with a running chain are cached; the chain evicts its entry
        if let Some(mut cached) = self.snapshots.get_mut(progress_id) {
            *cached = snapshot.clone();
        }
        self.tracker.emit_progress(progress_id, &snapshot);
        Ok(snapshot)
    }

    /// Most recent snapshot seen for a job whose polling chain is still running
    pub fn last_snapshot(&self, progress_id: &ProgressId) -> Option<ProgressSnapshot> {
        self.snapshots
            .get(progress_id)
            .map(|entry| entry.value().clone())
    }

    pub fn is_polling(&self, progress_id: &ProgressId) -> bool {
        self.active_polls.contains_key(progress_id)
    }
}

fn schedule_reload(
    clock: Arc<dyn Clock>,
    tracker: ProgressTracker,
    progress_id: ProgressId,
    delay: Duration,
) {
    tracker.emit_reload_scheduled(&progress_id, delay);
    tokio::spawn(async move {
        clock.sleep(delay).await;
        if !tracker.emit_reload_requested(&progress_id) {
            log_warn!(
                "Reload after import {} requested but no view is listening",
                progress_id
            );
        }
    });
}

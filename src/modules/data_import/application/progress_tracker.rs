use crate::log_debug;
use crate::modules::data_import::domain::{
    ImportEvent, ImportJob, ImportReport, ProgressId, ProgressSnapshot, ProgressView,
};
use crate::shared::infrastructure::EventBus;
use crate::shared::utils::LogContext;
use std::time::Duration;

/// Publishes import lifecycle events to subscribed front-ends
#[derive(Clone)]
pub struct ProgressTracker {
    events: EventBus<ImportEvent>,
}

impl ProgressTracker {
    pub fn new(events: EventBus<ImportEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &EventBus<ImportEvent> {
        &self.events
    }

    fn emit(&self, event: ImportEvent) -> bool {
        let event_type = event.event_type();
        let delivered = self.events.publish(event);
        if !delivered {
            log_debug!("{} not delivered: no subscribers", event_type);
        }
        delivered
    }

    pub fn emit_submitted(&self, job: &ImportJob) -> bool {
        self.emit(ImportEvent::Submitted {
            progress_id: job.progress_id().clone(),
            dry_run: job.dry_run(),
        })
    }

    /// Publish the bounded indicator state for a snapshot
    pub fn emit_progress(&self, progress_id: &ProgressId, snapshot: &ProgressSnapshot) -> bool {
        let view = ProgressView::from_snapshot(snapshot);
        LogContext::import_progress(progress_id.as_str(), view.percentage, &view.message);
        self.emit(ImportEvent::Progress {
            progress_id: progress_id.clone(),
            view,
        })
    }

    pub fn emit_completed(&self, job: &ImportJob, report: ImportReport) -> bool {
        self.emit(ImportEvent::Completed {
            progress_id: job.progress_id().clone(),
            dry_run: job.dry_run(),
            report,
        })
    }

    pub fn emit_failed(&self, progress_id: &ProgressId, message: &str) -> bool {
        self.emit(ImportEvent::Failed {
            progress_id: progress_id.clone(),
            message: message.to_string(),
        })
    }

    pub fn emit_timed_out(&self, progress_id: &ProgressId, message: &str) -> bool {
        self.emit(ImportEvent::TimedOut {
            progress_id: progress_id.clone(),
            message: message.to_string(),
        })
    }

    pub fn emit_connection_lost(&self, progress_id: &ProgressId, message: &str) -> bool {
        self.emit(ImportEvent::ConnectionLost {
            progress_id: progress_id.clone(),
            message: message.to_string(),
        })
    }

    pub fn emit_cancelled(&self, progress_id: &ProgressId) -> bool {
        self.emit(ImportEvent::Cancelled {
            progress_id: progress_id.clone(),
        })
    }

    pub fn emit_reload_scheduled(&self, progress_id: &ProgressId, delay: Duration) -> bool {
        self.emit(ImportEvent::ReloadScheduled {
            progress_id: progress_id.clone(),
            delay,
        })
    }

    pub fn emit_reload_requested(&self, progress_id: &ProgressId) -> bool {
        self.emit(ImportEvent::ReloadRequested {
            progress_id: progress_id.clone(),
        })
    }
}

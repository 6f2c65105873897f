/// Events published while an import moves through its lifecycle
///
/// Front-ends subscribe to these through the application's `EventBus` instead
/// of reaching into shared state.
use serde::Serialize;
use std::time::Duration;

use crate::modules::data_import::domain::services::report_renderer::{ImportReport, ProgressView};
use crate::modules::data_import::domain::value_objects::ProgressId;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImportEvent {
    Submitted {
        progress_id: ProgressId,
        dry_run: bool,
    },
    Progress {
        progress_id: ProgressId,
        view: ProgressView,
    },
    Completed {
        progress_id: ProgressId,
        dry_run: bool,
        report: ImportReport,
    },
    Failed {
        progress_id: ProgressId,
        message: String,
    },
    TimedOut {
        progress_id: ProgressId,
        message: String,
    },
    ConnectionLost {
        progress_id: ProgressId,
        message: String,
    },
    Cancelled {
        progress_id: ProgressId,
    },
    ReloadScheduled {
        progress_id: ProgressId,
        #[serde(with = "duration_millis")]
        delay: Duration,
    },
    /// Views showing imported data should be refreshed wholesale
    ReloadRequested {
        progress_id: ProgressId,
    },
}

impl ImportEvent {
    pub fn progress_id(&self) -> &ProgressId {
        match self {
            ImportEvent::Submitted { progress_id, .. }
            | ImportEvent::Progress { progress_id, .. }
            | ImportEvent::Completed { progress_id, .. }
            | ImportEvent::Failed { progress_id, .. }
            | ImportEvent::TimedOut { progress_id, .. }
            | ImportEvent::ConnectionLost { progress_id, .. }
            | ImportEvent::Cancelled { progress_id }
            | ImportEvent::ReloadScheduled { progress_id, .. }
            | ImportEvent::ReloadRequested { progress_id } => progress_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            ImportEvent::Submitted { .. } => "ImportSubmitted",
            ImportEvent::Progress { .. } => "ImportProgress",
            ImportEvent::Completed { .. } => "ImportCompleted",
            ImportEvent::Failed { .. } => "ImportFailed",
            ImportEvent::TimedOut { .. } => "ImportTimedOut",
            ImportEvent::ConnectionLost { .. } => "ImportConnectionLost",
            ImportEvent::Cancelled { .. } => "ImportPollingCancelled",
            ImportEvent::ReloadScheduled { .. } => "ReloadScheduled",
            ImportEvent::ReloadRequested { .. } => "ReloadRequested",
        }
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

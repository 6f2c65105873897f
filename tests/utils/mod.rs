#![allow(dead_code)]

pub mod factories;
pub mod fakes;

use outcomes_import_lib::modules::data_import::domain::{ImportEvent, ImportJobService};
use outcomes_import_lib::shared::config::AppConfig;
use outcomes_import_lib::shared::infrastructure::EventEnvelope;
use outcomes_import_lib::shared::utils::TokioClock;
use outcomes_import_lib::AppContext;
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;

/// Context wired to a test double and the tokio clock
pub fn context_with(job_service: Arc<dyn ImportJobService>) -> AppContext {
    AppContext::with_job_service(AppConfig::default(), job_service, Arc::new(TokioClock))
}

/// Everything published so far, without waiting
pub fn drain(events: &mut Receiver<EventEnvelope<ImportEvent>>) -> Vec<ImportEvent> {
    let mut seen = Vec::new();
    while let Ok(envelope) = events.try_recv() {
        seen.push(envelope.payload);
    }
    seen
}

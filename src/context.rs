//! Wiring of the long-lived services shared by every front-end command.

use std::sync::Arc;

use crate::modules::data_import::domain::{ImportEvent, ImportJobService};
use crate::modules::data_import::{HttpImportJobService, ImportService};
use crate::shared::config::AppConfig;
use crate::shared::errors::AppResult;
use crate::shared::infrastructure::EventBus;
use crate::shared::utils::{Clock, TokioClock};
use crate::{log_info, log_warn};

pub struct AppContext {
    pub config: AppConfig,
    pub events: EventBus<ImportEvent>,
    pub import_service: Arc<ImportService>,
}

impl AppContext {
    /// Build the HTTP-backed context without touching the network
    ///
    /// A CSRF token read from `csrf_page` is fetched by the first request.
    pub fn initialize(config: AppConfig) -> AppResult<Self> {
        let job_service = HttpImportJobService::new(&config)?;

        match (job_service.has_csrf_token(), job_service.csrf_page()) {
            (true, _) => log_info!("Using the configured CSRF token"),
            (false, Some(page)) => log_info!("CSRF token will be read from {}", page),
            (false, None) => {
                log_warn!("No CSRF token configured; the server may reject uploads")
            }
        }

        Ok(Self::with_job_service(
            config,
            Arc::new(job_service),
            Arc::new(TokioClock),
        ))
    }

    pub fn with_job_service(
        config: AppConfig,
        job_service: Arc<dyn ImportJobService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let events = EventBus::default();
        let import_service = Arc::new(ImportService::new(
            job_service,
            clock,
            config.poll.clone(),
            events.clone(),
        ));

        Self {
            config,
            events,
            import_service,
        }
    }
}

//! Front-end entry points for the import workflow
//!
//! Each handler takes the shared `AppContext`, turns raw operator input into
//! domain requests, and logs the outcome. Rendering is left to the caller.

use std::path::{Path, PathBuf};

use crate::context::AppContext;
use crate::modules::data_import::application::CompletedImport;
use crate::modules::data_import::domain::{
    Confirmation, ConflictStrategy, ImportReport, ImportRequest, ProgressId, ProgressView,
    UploadFile, ValidationReport, DEFAULT_ADAPTER,
};
use crate::shared::errors::AppResult;
use crate::shared::utils::LogContext;
use crate::{log_debug, log_info};

#[derive(Debug, Clone, Default)]
pub struct ImportFileRequest {
    pub path: Option<PathBuf>,
    pub conflict_strategy: ConflictStrategy,
    pub dry_run: bool,
    pub adapter_name: Option<String>,
    pub delete_existing: bool,
}

/// Where a job stands according to a single progress request
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub progress_id: ProgressId,
    pub view: ProgressView,
    pub report: Option<ImportReport>,
    pub error: Option<String>,
}

pub async fn import_file(
    ctx: &AppContext,
    request: ImportFileRequest,
    confirmation: &dyn Confirmation,
) -> AppResult<CompletedImport> {
    log_debug!(
        "import_file called for {:?} (strategy {}, dry run {})",
        request.path,
        request.conflict_strategy,
        request.dry_run
    );

    let import_request = ImportRequest {
        file: load_file(request.path.as_deref()).await?,
        conflict_strategy: request.conflict_strategy,
        dry_run: request.dry_run,
        adapter_name: adapter_or_default(request.adapter_name),
        delete_existing: request.delete_existing,
    };

    let result = ctx.import_service.import(import_request, confirmation).await;

    match &result {
        Ok(done) => {
            log_info!(
                "Import {} finished - Created: {}, Updated: {}, Errors: {}",
                done.job.progress_id(),
                done.result.records_created,
                done.result.records_updated,
                done.report.errors.total
            );
        }
        Err(e) => LogContext::error_with_context(e, "Import failed"),
    }

    result
}

pub async fn validate_file(
    ctx: &AppContext,
    path: Option<&Path>,
    adapter_name: Option<String>,
) -> AppResult<ValidationReport> {
    log_debug!("validate_file called for {:?}", path);

    let file = load_file(path).await?;
    let adapter_name = adapter_or_default(adapter_name);
    let report = ctx.import_service.validate_file(file, &adapter_name).await?;

    log_info!(
        "Validation of {} finished - valid: {}, records: {}",
        report.filename,
        report.valid,
        report.records_found
    );
    Ok(report)
}

pub async fn check_status(ctx: &AppContext, progress_id: &str) -> AppResult<StatusReport> {
    let progress_id = ProgressId::new(progress_id)?;
    let snapshot = ctx.import_service.check_progress(&progress_id).await?;

    Ok(StatusReport {
        view: ProgressView::from_snapshot(&snapshot),
        report: snapshot
            .completed_result()
            .map(|result| ImportReport::from_result(&result)),
        error: snapshot.failure_message(),
        progress_id,
    })
}

async fn load_file(path: Option<&Path>) -> AppResult<Option<UploadFile>> {
    match path {
        Some(path) => Ok(Some(UploadFile::from_path(path).await?)),
        None => Ok(None),
    }
}

fn adapter_or_default(adapter_name: Option<String>) -> String {
    adapter_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_ADAPTER.to_string())
}

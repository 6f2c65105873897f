//! Import service and command handler tests against a mocked job service
//!
//! Tests cover:
//! - Local checks that must stop a submission before any request is sent
//! - Confirmation of destructive imports
//! - Validation reports
//! - Command handlers reading files from disk
mod utils;

use mockall::mock;
use outcomes_import_lib::modules::data_import::commands::{self, ImportFileRequest};
use outcomes_import_lib::modules::data_import::domain::{
    BannerStyle, Confirmation, ConflictStrategy, FileInfo, ImportJobService, ImportRequest,
    ImportResult, ImportSubmission, ProgressId, ProgressSnapshot, StaticConfirmation, UploadFile,
    ValidationOutcome, UNKNOWN_ERROR,
};
use outcomes_import_lib::modules::data_import::application::DELETE_CONFIRMATION_PROMPT;
use outcomes_import_lib::shared::errors::{AppError, AppResult};
use std::io::Write;
use std::sync::{Arc, Mutex};
use utils::{context_with, factories};

mock! {
    JobService {}

    #[async_trait::async_trait]
    impl ImportJobService for JobService {
        async fn submit(&self, submission: &ImportSubmission) -> AppResult<ProgressId>;
        async fn fetch_progress(&self, progress_id: &ProgressId) -> AppResult<ProgressSnapshot>;
        async fn validate(&self, file: &UploadFile, adapter_name: &str) -> AppResult<ValidationOutcome>;
    }
}

/// Answers every prompt the same way and remembers what was asked
struct RecordingConfirmation {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl RecordingConfirmation {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirmation for RecordingConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

fn spreadsheet_on_disk(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("outcomes")
        .suffix(".xlsx")
        .tempfile()
        .unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

// ================================================================================================
// SUBMISSION
// ================================================================================================

#[tokio::test]
async fn submit_without_file_sends_nothing() {
    let mut job_service = MockJobService::new();
    job_service.expect_submit().never();
    let ctx = context_with(Arc::new(job_service));

    let request = ImportRequest {
        file: None,
        ..factories::import_request()
    };
    let err = ctx
        .import_service
        .submit_import(request, &StaticConfirmation(true))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
    assert_eq!(err.user_message(), "Please select a file to import");
}

#[tokio::test]
async fn empty_file_is_rejected_locally() {
    let mut job_service = MockJobService::new();
    job_service.expect_submit().never();
    let ctx = context_with(Arc::new(job_service));

    let request = ImportRequest {
        file: Some(UploadFile::new("empty.xlsx", Vec::new())),
        ..factories::import_request()
    };
    let err = ctx
        .import_service
        .submit_import(request, &StaticConfirmation(true))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let mut job_service = MockJobService::new();
    job_service.expect_submit().never();
    let ctx = context_with(Arc::new(job_service));
    let confirmation = RecordingConfirmation::answering(false);

    let err = ctx
        .import_service
        .submit_import(factories::destructive_request(), &confirmation)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Cancelled(_)));
    assert_eq!(confirmation.prompts(), vec![DELETE_CONFIRMATION_PROMPT]);
}

#[tokio::test]
async fn confirmed_delete_is_submitted_with_all_options() {
    let mut job_service = MockJobService::new();
    job_service
        .expect_submit()
        .withf(|submission| {
            submission.delete_existing
                && !submission.dry_run
                && submission.conflict_strategy == ConflictStrategy::Merge
                && submission.adapter_name == "banner"
                && submission.file.file_name == "courses.xlsx"
        })
        .times(1)
        .returning(|_| ProgressId::new("job-7"));
    let ctx = context_with(Arc::new(job_service));
    let confirmation = RecordingConfirmation::answering(true);

    let request = ImportRequest {
        conflict_strategy: ConflictStrategy::Merge,
        adapter_name: "banner".to_string(),
        ..factories::destructive_request()
    };
    let job = ctx
        .import_service
        .submit_import(request, &confirmation)
        .await
        .unwrap();

    assert_eq!(job.progress_id().as_str(), "job-7");
    assert!(!job.dry_run());
    assert_eq!(confirmation.prompts().len(), 1);
}

#[tokio::test]
async fn plain_import_does_not_ask_for_confirmation() {
    let mut job_service = MockJobService::new();
    job_service
        .expect_submit()
        .times(1)
        .returning(|_| ProgressId::new("job-8"));
    let ctx = context_with(Arc::new(job_service));
    let confirmation = RecordingConfirmation::answering(false);

    ctx.import_service
        .submit_import(factories::import_request(), &confirmation)
        .await
        .unwrap();

    assert!(confirmation.prompts().is_empty());
}

#[tokio::test]
async fn rejected_submission_surfaces_service_message() {
    let mut job_service = MockJobService::new();
    job_service
        .expect_submit()
        .returning(|_| Err(AppError::ServiceError("Unsupported file format".to_string())));
    let ctx = context_with(Arc::new(job_service));

    let err = ctx
        .import_service
        .submit_import(factories::import_request(), &StaticConfirmation(true))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Unsupported file format");
}

// ================================================================================================
// VALIDATION
// ================================================================================================

#[tokio::test]
async fn validate_without_file_sends_nothing() {
    let mut job_service = MockJobService::new();
    job_service.expect_validate().never();
    let ctx = context_with(Arc::new(job_service));

    let err = ctx
        .import_service
        .validate_file(None, "generic")
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Please select a file to validate");
}

#[tokio::test]
async fn invalid_file_gets_warning_banner_with_all_errors() {
    let mut job_service = MockJobService::new();
    job_service.expect_validate().times(1).returning(|_, _| {
        Ok(ValidationOutcome {
            valid: false,
            file_info: FileInfo {
                filename: "courses.xlsx".to_string(),
                adapter: "generic".to_string(),
            },
            records_found: 40,
            potential_conflicts: 2,
            errors: (1..=12).map(|i| format!("Row {}: missing term", i)).collect(),
            warnings: vec!["Column 'notes' ignored".to_string()],
        })
    });
    let ctx = context_with(Arc::new(job_service));

    let report = ctx
        .import_service
        .validate_file(Some(factories::spreadsheet()), "generic")
        .await
        .unwrap();

    assert!(!report.valid);
    assert_eq!(report.banner, BannerStyle::Warning);
    assert_eq!(report.records_found, 40);
    assert_eq!(report.potential_conflicts, 2);
    assert_eq!(report.errors.visible.len(), 12);
    assert_eq!(report.warnings.total, 1);
}

// ================================================================================================
// COMMAND HANDLERS
// ================================================================================================

#[tokio::test]
async fn import_command_without_path_is_rejected() {
    let mut job_service = MockJobService::new();
    job_service.expect_submit().never();
    let ctx = context_with(Arc::new(job_service));

    let err = commands::import_file(
        &ctx,
        ImportFileRequest::default(),
        &StaticConfirmation(true),
    )
    .await
    .unwrap_err();

    assert_eq!(err.user_message(), "Please select a file to import");
}

#[tokio::test]
async fn import_command_with_missing_file_reports_io_error() {
    let mut job_service = MockJobService::new();
    job_service.expect_submit().never();
    let ctx = context_with(Arc::new(job_service));

    let request = ImportFileRequest {
        path: Some("/definitely/not/here.xlsx".into()),
        ..Default::default()
    };
    let err = commands::import_file(&ctx, request, &StaticConfirmation(true))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::IoError(_)));
}

#[tokio::test]
async fn validate_command_reads_file_and_defaults_adapter() {
    let file = spreadsheet_on_disk(b"PK\x03\x04 rows");
    let expected_name = file
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();

    let mut job_service = MockJobService::new();
    job_service
        .expect_validate()
        .withf(move |upload, adapter| {
            upload.file_name == expected_name
                && upload.content == b"PK\x03\x04 rows".to_vec()
                && adapter == "generic"
        })
        .times(1)
        .returning(|_, _| {
            Ok(ValidationOutcome {
                valid: true,
                records_found: 3,
                ..Default::default()
            })
        });
    let ctx = context_with(Arc::new(job_service));

    let report = commands::validate_file(&ctx, Some(file.path()), None)
        .await
        .unwrap();

    assert_eq!(report.banner, BannerStyle::Success);
    assert_eq!(report.records_found, 3);
}

#[tokio::test]
async fn status_command_builds_report_for_completed_job() {
    let mut job_service = MockJobService::new();
    job_service
        .expect_fetch_progress()
        .withf(|progress_id| progress_id.as_str() == "abc")
        .returning(|_| {
            Ok(ProgressSnapshot::completed(factories::import_result(5, 1)))
        });
    let ctx = context_with(Arc::new(job_service));

    let status = commands::check_status(&ctx, "abc").await.unwrap();

    assert_eq!(status.view.percentage, 100);
    assert!(status.error.is_none());
    let report = status.report.unwrap();
    assert_eq!(report.counters.created, 5);
    assert_eq!(report.counters.updated, 1);
}

#[tokio::test]
async fn status_command_reports_failed_job() {
    let mut job_service = MockJobService::new();
    job_service
        .expect_fetch_progress()
        .returning(|_| Ok(ProgressSnapshot::failed("Duplicate course codes")));
    let ctx = context_with(Arc::new(job_service));

    let status = commands::check_status(&ctx, "abc").await.unwrap();

    assert!(status.report.is_none());
    assert_eq!(status.error.as_deref(), Some("Duplicate course codes"));
}

#[tokio::test]
async fn status_command_falls_back_for_blank_failure_message() {
    let mut job_service = MockJobService::new();
    job_service
        .expect_fetch_progress()
        .returning(|_| Ok(ProgressSnapshot::failed("")));
    let ctx = context_with(Arc::new(job_service));

    let status = commands::check_status(&ctx, "abc").await.unwrap();

    assert_eq!(status.error.as_deref(), Some(UNKNOWN_ERROR));
    assert!(status.report.is_none());
}

#[tokio::test]
async fn status_command_treats_missing_result_as_empty_report() {
    let mut job_service = MockJobService::new();
    job_service.expect_fetch_progress().returning(|_| {
        let mut snapshot = ProgressSnapshot::completed(ImportResult::default());
        snapshot.result = None;
        Ok(snapshot)
    });
    let ctx = context_with(Arc::new(job_service));

    let status = commands::check_status(&ctx, "abc").await.unwrap();

    let report = status.report.unwrap();
    assert_eq!(report.counters.labelled().map(|(_, value)| value), [0, 0, 0, 0]);
    assert_eq!(report.execution_time, "0.00s");
    assert!(status.error.is_none());
}

#[tokio::test]
async fn status_command_rejects_blank_progress_id() {
    let mut job_service = MockJobService::new();
    job_service.expect_fetch_progress().never();
    let ctx = context_with(Arc::new(job_service));

    let err = commands::check_status(&ctx, "   ").await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

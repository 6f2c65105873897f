/// Domain entities for the spreadsheet import workflow
///
/// An import is submitted once, tracked through progress snapshots while the
/// server works, and ends with an `ImportResult` when it completes.
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use super::value_objects::{ConflictStrategy, ProgressId, ProgressStatus};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::Validator;

pub const DEFAULT_ADAPTER: &str = "generic";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Treat an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A spreadsheet selected for upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// Read a file from disk, keeping only its final path component as the upload name
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let content = tokio::fs::read(path).await.map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, content })
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// What the operator asked for, before any checks
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub file: Option<UploadFile>,
    pub conflict_strategy: ConflictStrategy,
    pub dry_run: bool,
    pub adapter_name: String,
    pub delete_existing: bool,
}

impl Default for ImportRequest {
    fn default() -> Self {
        Self {
            file: None,
            conflict_strategy: ConflictStrategy::default(),
            dry_run: false,
            adapter_name: DEFAULT_ADAPTER.to_string(),
            delete_existing: false,
        }
    }
}

impl ImportRequest {
    /// Deleting existing data is only meaningful for a real import
    pub fn is_destructive(&self) -> bool {
        !self.dry_run && self.delete_existing
    }

    /// Check operator input and produce a submission ready to send
    pub fn into_submission(self) -> AppResult<ImportSubmission> {
        let file = self.file.ok_or_else(|| {
            AppError::ValidationError("Please select a file to import".to_string())
        })?;
        Validator::validate_file_selected(&file.file_name, file.size())?;
        Validator::validate_adapter_name(&self.adapter_name)?;

        Ok(ImportSubmission {
            delete_existing: !self.dry_run && self.delete_existing,
            file,
            conflict_strategy: self.conflict_strategy,
            dry_run: self.dry_run,
            adapter_name: self.adapter_name,
        })
    }
}

/// A validated request as sent to the import service
#[derive(Debug, Clone)]
pub struct ImportSubmission {
    pub file: UploadFile,
    pub conflict_strategy: ConflictStrategy,
    pub dry_run: bool,
    pub adapter_name: String,
    pub delete_existing: bool,
}

/// A submitted import, keyed by the service-assigned progress id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJob {
    progress_id: ProgressId,
    dry_run: bool,
    conflict_strategy: ConflictStrategy,
}

impl ImportJob {
    pub fn new(progress_id: ProgressId, dry_run: bool, conflict_strategy: ConflictStrategy) -> Self {
        Self {
            progress_id,
            dry_run,
            conflict_strategy,
        }
    }

    pub fn progress_id(&self) -> &ProgressId {
        &self.progress_id
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn conflict_strategy(&self) -> ConflictStrategy {
        self.conflict_strategy
    }
}

/// One response from the progress endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub status: ProgressStatus,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub records_processed: Option<u64>,
    #[serde(default)]
    pub total_records: Option<u64>,
    #[serde(default)]
    pub result: Option<ImportResult>,
}

impl ProgressSnapshot {
    pub fn running(percentage: f64, message: &str) -> Self {
        Self {
            status: ProgressStatus::Running,
            percentage: Some(percentage),
            message: message.to_string(),
            records_processed: None,
            total_records: None,
            result: None,
        }
    }

    pub fn completed(result: ImportResult) -> Self {
        Self {
            status: ProgressStatus::Completed,
            percentage: Some(100.0),
            message: String::new(),
            records_processed: Some(result.records_processed),
            total_records: Some(result.records_processed),
            result: Some(result),
        }
    }

    /// Result of a completed job; a completed snapshot without a payload counts as empty
    pub fn completed_result(&self) -> Option<ImportResult> {
        (self.status == ProgressStatus::Completed)
            .then(|| self.result.clone().unwrap_or_default())
    }

    /// Failure reason of a job in `error` state, never blank
    pub fn failure_message(&self) -> Option<String> {
        (self.status == ProgressStatus::Error).then(|| {
            if self.message.trim().is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                self.message.clone()
            }
        })
    }

    pub fn failed(message: &str) -> Self {
        Self {
            status: ProgressStatus::Error,
            percentage: None,
            message: message.to_string(),
            records_processed: None,
            total_records: None,
            result: None,
        }
    }
}

/// Outcome of a completed import job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records_processed: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records_created: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records_updated: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records_skipped: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conflicts_detected: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub execution_time: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conflicts: Vec<Conflict>,
}

impl ImportResult {
    /// Explicit success flag when the service sends one, otherwise "no errors"
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(self.errors.is_empty())
    }
}

/// A field-level collision detected during import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_name: String,
    #[serde(default)]
    pub existing_value: serde_json::Value,
    #[serde(default)]
    pub import_value: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resolution: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adapter: String,
}

/// Result of a dry validation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub file_info: FileInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records_found: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub potential_conflicts: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
}

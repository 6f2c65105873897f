/// Ports for the import workflow
///
/// The import job service lives on the server; infrastructure provides an
/// HTTP implementation and tests provide scripted ones.
use crate::modules::data_import::domain::entities::{
    ImportSubmission, ProgressSnapshot, UploadFile, ValidationOutcome,
};
use crate::modules::data_import::domain::value_objects::ProgressId;
use crate::shared::errors::AppResult;
use async_trait::async_trait;

#[async_trait]
pub trait ImportJobService: Send + Sync {
    /// Start an import job and return the id used to poll its progress
    async fn submit(&self, submission: &ImportSubmission) -> AppResult<ProgressId>;

    /// Fetch the current progress of a job
    ///
    /// Any failure here, including non-2xx responses, is a transport error.
    async fn fetch_progress(&self, progress_id: &ProgressId) -> AppResult<ProgressSnapshot>;

    /// Dry-check a file without starting a job
    async fn validate(&self, file: &UploadFile, adapter_name: &str)
        -> AppResult<ValidationOutcome>;
}

/// Asks the operator to approve an irreversible action
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Fixed answer, for non-interactive use (`--yes`) and tests
#[derive(Debug, Clone, Copy)]
pub struct StaticConfirmation(pub bool);

impl Confirmation for StaticConfirmation {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

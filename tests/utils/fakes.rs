/// In-memory import service doubles driven by tokio's (paused) clock
use async_trait::async_trait;
use outcomes_import_lib::modules::data_import::domain::{
    ImportJobService, ImportSubmission, ProgressId, ProgressSnapshot, UploadFile,
    ValidationOutcome,
};
use outcomes_import_lib::shared::errors::{AppError, AppResult};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

enum Step {
    Snapshot(ProgressSnapshot),
    Unreachable(String),
}

/// Plays back a fixed sequence of progress responses
///
/// Once the script runs out every request sees `fallback`.
pub struct ScriptedJobService {
    progress_id: String,
    script: Mutex<VecDeque<Step>>,
    fallback: ProgressSnapshot,
    validation: ValidationOutcome,
    created_at: Instant,
    submissions: Mutex<Vec<ImportSubmission>>,
    progress_requests: Mutex<Vec<Instant>>,
    validations: Mutex<Vec<(String, String)>>,
}

impl ScriptedJobService {
    pub fn new(progress_id: &str) -> Self {
        Self {
            progress_id: progress_id.to_string(),
            script: Mutex::new(VecDeque::new()),
            fallback: ProgressSnapshot::running(10.0, "Working"),
            validation: ValidationOutcome::default(),
            created_at: Instant::now(),
            submissions: Mutex::new(Vec::new()),
            progress_requests: Mutex::new(Vec::new()),
            validations: Mutex::new(Vec::new()),
        }
    }

    pub fn then_progress(self, snapshot: ProgressSnapshot) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Step::Snapshot(snapshot));
        self
    }

    pub fn then_unreachable(self, reason: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Step::Unreachable(reason.to_string()));
        self
    }

    pub fn with_validation(mut self, outcome: ValidationOutcome) -> Self {
        self.validation = outcome;
        self
    }

    pub fn submissions(&self) -> Vec<ImportSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn validations(&self) -> Vec<(String, String)> {
        self.validations.lock().unwrap().clone()
    }

    pub fn progress_request_count(&self) -> usize {
        self.progress_requests.lock().unwrap().len()
    }

    /// When each progress request arrived, relative to construction
    pub fn progress_request_offsets(&self) -> Vec<Duration> {
        self.progress_requests
            .lock()
            .unwrap()
            .iter()
            .map(|at| at.duration_since(self.created_at))
            .collect()
    }
}

#[async_trait]
impl ImportJobService for ScriptedJobService {
    async fn submit(&self, submission: &ImportSubmission) -> AppResult<ProgressId> {
        self.submissions.lock().unwrap().push(submission.clone());
        ProgressId::new(self.progress_id.clone())
    }

    async fn fetch_progress(&self, progress_id: &ProgressId) -> AppResult<ProgressSnapshot> {
        assert_eq!(progress_id.as_str(), self.progress_id);
        self.progress_requests.lock().unwrap().push(Instant::now());

        match self.script.lock().unwrap().pop_front() {
            Some(Step::Snapshot(snapshot)) => Ok(snapshot),
            Some(Step::Unreachable(reason)) => Err(AppError::TransportError(reason)),
            None => Ok(self.fallback.clone()),
        }
    }

    async fn validate(
        &self,
        file: &UploadFile,
        adapter_name: &str,
    ) -> AppResult<ValidationOutcome> {
        self.validations
            .lock()
            .unwrap()
            .push((file.file_name.clone(), adapter_name.to_string()));
        Ok(self.validation.clone())
    }
}

pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-exports for easy external access
pub use application::{CompletedImport, ImportService, PollHandle, PollOutcome};
pub use domain::{ImportJobService, ImportReport, ImportRequest, ValidationReport};
pub use infrastructure::HttpImportJobService;

// Re-export common types for shorter imports
pub use domain::{
    ConflictStrategy, ImportEvent, ImportJob, ImportResult, ProgressId, ProgressSnapshot,
    ProgressStatus, UploadFile,
};

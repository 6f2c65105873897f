pub mod entities;
pub mod events;
pub mod repository;
pub mod services;
pub mod value_objects;

// Re-exports for easy access
pub use entities::{
    Conflict, FileInfo, ImportJob, ImportRequest, ImportResult, ImportSubmission,
    ProgressSnapshot, UploadFile, ValidationOutcome, DEFAULT_ADAPTER, UNKNOWN_ERROR,
};
pub use events::ImportEvent;
pub use repository::{Confirmation, ImportJobService, StaticConfirmation};
pub use services::{
    BannerStyle, CappedList, ConflictRow, CoreCounters, ImportReport, ProgressView,
    ReloadPolicy, ValidationReport,
};
pub use value_objects::{ConflictStrategy, ProgressId, ProgressStatus};

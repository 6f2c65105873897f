pub mod poll_handle;
pub mod poller;
pub mod progress_tracker;
pub mod service;

pub use poll_handle::PollHandle;
pub use poller::{CompletedImport, PollOutcome, ProgressPoller};
pub use progress_tracker::ProgressTracker;
pub use service::{ImportService, DELETE_CONFIRMATION_PROMPT};

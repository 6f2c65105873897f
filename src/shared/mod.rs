// Shared kernel: cross-cutting concerns used by every module

pub mod config; // Environment-driven configuration
pub mod errors; // Shared error types
pub mod infrastructure; // Event bus
pub mod utils; // Logging, clock, input validation

// Re-exports for convenience
pub use config::{AppConfig, PollConfig};
pub use infrastructure::{EventBus, EventEnvelope};

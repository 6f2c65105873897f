/// Shared infrastructure concerns
///
/// This module contains infrastructure implementations that are shared across
/// multiple bounded contexts (modules).
pub mod event_bus;

// Re-exports for convenience
pub use event_bus::{EventBus, EventEnvelope};

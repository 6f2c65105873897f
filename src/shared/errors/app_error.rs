use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// Input rejected before any request was made
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The request never produced an HTTP response
    #[error("Connection error: {0}")]
    TransportError(String),

    /// Non-2xx response or a `{success: false}` payload
    #[error("Service error: {0}")]
    ServiceError(String),

    /// The import job itself reported a terminal error
    #[error("Import failed: {0}")]
    JobError(String),

    /// Client stopped waiting; the job may still be running server-side
    #[error("Timed out: {0}")]
    TimeoutError(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::TransportError("Request timeout".to_string())
        } else if err.is_connect() {
            AppError::TransportError("Failed to connect to the import service".to_string())
        } else if err.is_decode() {
            AppError::SerializationError(format!("Invalid response body: {}", err))
        } else if let Some(status) = err.status() {
            AppError::ServiceError(format!("HTTP {}", status))
        } else {
            AppError::TransportError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::ConfigError(format!("Invalid number: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Background task failed: {}", err))
    }
}

impl AppError {
    /// Message suitable for showing to the operator, without the category prefix
    pub fn user_message(&self) -> &str {
        match self {
            AppError::ValidationError(msg)
            | AppError::TransportError(msg)
            | AppError::ServiceError(msg)
            | AppError::JobError(msg)
            | AppError::TimeoutError(msg)
            | AppError::Cancelled(msg)
            | AppError::SerializationError(msg)
            | AppError::ConfigError(msg)
            | AppError::IoError(msg)
            | AppError::InternalError(msg) => msg,
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Value objects for the import domain
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::errors::AppError;
use crate::shared::utils::Validator;

/// Policy for field-level collisions between imported and existing records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    KeepExisting,
    #[default]
    UseTheirs,
    Merge,
}

impl ConflictStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictStrategy::KeepExisting => "keep_existing",
            ConflictStrategy::UseTheirs => "use_theirs",
            ConflictStrategy::Merge => "merge",
        }
    }
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConflictStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep_existing" => Ok(ConflictStrategy::KeepExisting),
            "use_theirs" => Ok(ConflictStrategy::UseTheirs),
            "merge" => Ok(ConflictStrategy::Merge),
            _ => Err(format!(
                "Invalid conflict strategy: {} (expected keep_existing, use_theirs or merge)",
                s
            )),
        }
    }
}

/// Status reported by the progress endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Starting,
    Running,
    Completed,
    Error,
}

impl ProgressStatus {
    /// `completed` and `error` end the poll loop
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressStatus::Completed | ProgressStatus::Error)
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::Starting => write!(f, "starting"),
            ProgressStatus::Running => write!(f, "running"),
            ProgressStatus::Completed => write!(f, "completed"),
            ProgressStatus::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for ProgressStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "starting" => Ok(ProgressStatus::Starting),
            "running" => Ok(ProgressStatus::Running),
            "completed" => Ok(ProgressStatus::Completed),
            "error" => Ok(ProgressStatus::Error),
            _ => Err(format!("Invalid progress status: {}", s)),
        }
    }
}

/// Opaque token assigned by the import service at submission
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressId(String);

impl ProgressId {
    pub fn new(value: impl Into<String>) -> Result<Self, AppError> {
        let value = value.into();
        Validator::validate_progress_id(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

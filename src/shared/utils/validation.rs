use regex::Regex;
use std::sync::OnceLock;

use crate::shared::errors::AppError;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_\-]+$").expect("identifier pattern is a valid regex")
    })
}

pub struct Validator;

impl Validator {
    /// A file counts as selected when it has a name and some content
    pub fn validate_file_selected(file_name: &str, size: usize) -> Result<(), AppError> {
        if file_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Please select a file to import".to_string(),
            ));
        }
        if size == 0 {
            return Err(AppError::ValidationError(format!(
                "Selected file '{}' is empty",
                file_name
            )));
        }
        Ok(())
    }

    pub fn validate_adapter_name(name: &str) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Adapter name cannot be empty".to_string(),
            ));
        }
        if name.len() > 64 {
            return Err(AppError::ValidationError(
                "Adapter name too long (max 64 characters)".to_string(),
            ));
        }
        if !identifier_pattern().is_match(name) {
            return Err(AppError::ValidationError(format!(
                "Adapter name '{}' contains invalid characters",
                name
            )));
        }
        Ok(())
    }

    pub fn validate_progress_id(progress_id: &str) -> Result<(), AppError> {
        if progress_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Progress id cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

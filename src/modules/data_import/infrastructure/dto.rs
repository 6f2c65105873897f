use serde::Deserialize;

use crate::modules::data_import::domain::ValidationOutcome;

/// Body of `POST /api/import/excel`
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub progress_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST /api/import/validate`
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub validation: Option<ValidationOutcome>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error payload some endpoints attach to non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|message| !message.trim().is_empty())
    }
}

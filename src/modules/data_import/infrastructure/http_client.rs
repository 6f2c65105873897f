//! HTTP implementation of the import job service
//!
//! Talks to the server's REST endpoints with multipart uploads and JSON
//! responses. Every request carries the CSRF header when a token is known.
//! A token read from a server page is fetched on the first request that needs
//! it, so commands rejected locally never touch the network.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::csrf::{CsrfToken, CSRF_HEADER};
use super::dto::{ErrorEnvelope, SubmitResponse, ValidateResponse};
use crate::modules::data_import::domain::{
    ImportJobService, ImportSubmission, ProgressId, ProgressSnapshot, UploadFile,
    ValidationOutcome,
};
use crate::shared::config::AppConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::LogContext;

pub const SUBMIT_PATH: &str = "/api/import/excel";
pub const PROGRESS_PATH: &str = "/api/import/progress";
pub const VALIDATE_PATH: &str = "/api/import/validate";

pub struct HttpImportJobService {
    client: Client,
    base_url: String,
    csrf_token: OnceCell<CsrfToken>,
    csrf_page: Option<String>,
}

impl HttpImportJobService {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            csrf_token: OnceCell::new_with(config.csrf_token.clone().and_then(CsrfToken::new)),
            csrf_page: config.csrf_page.clone(),
        })
    }

    pub fn with_csrf_token(mut self, token: CsrfToken) -> Self {
        self.csrf_token = OnceCell::new_with(Some(token));
        self
    }

    /// Whether a token is already known, configured or discovered
    pub fn has_csrf_token(&self) -> bool {
        self.csrf_token.initialized()
    }

    pub fn csrf_page(&self) -> Option<&str> {
        self.csrf_page.as_deref()
    }

    /// Load a server page and pick up the token from its csrf-token meta tag
    ///
    /// The client keeps cookies, so the session that issued the token is
    /// reused by later requests.
    pub async fn discover_csrf_token(&self, page_path: &str) -> AppResult<CsrfToken> {
        let url = self.url(page_path);
        let response = self.send(self.client.get(&url), "GET page").await?;

        if !response.status().is_success() {
            return Err(AppError::ServiceError(format!(
                "Could not load {} to read the CSRF token: HTTP {}",
                page_path,
                response.status()
            )));
        }

        let html = response.text().await?;
        CsrfToken::from_meta_tag(&html).ok_or_else(|| {
            AppError::ServiceError(format!("No csrf-token meta tag found at {}", page_path))
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the CSRF header, discovering the token once if only a page is configured
    async fn authorized(&self, builder: RequestBuilder) -> AppResult<RequestBuilder> {
        let token = match (self.csrf_token.get(), self.csrf_page.as_deref()) {
            (Some(token), _) => Some(token),
            (None, Some(page)) => {
                let token = self
                    .csrf_token
                    .get_or_try_init(|| async {
                        let token = self.discover_csrf_token(page).await?;
                        info!("CSRF token read from {}", page);
                        Ok::<_, AppError>(token)
                    })
                    .await?;
                Some(token)
            }
            (None, None) => None,
        };

        Ok(match token {
            Some(token) => builder.header(CSRF_HEADER, token.as_str()),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> AppResult<Response> {
        LogContext::api_call(endpoint, "", None);
        let started = Instant::now();

        let response = builder.send().await.map_err(|e| {
            warn!("{} failed before a response arrived: {}", endpoint, e);
            AppError::from(e)
        })?;

        LogContext::api_call(
            endpoint,
            response.status().as_str(),
            Some(started.elapsed().as_millis() as u64),
        );
        Ok(response)
    }

    /// Turn a non-2xx response into a service error, preferring the payload's message
    async fn service_error(response: Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(ErrorEnvelope::into_message)
            .unwrap_or_else(|| http_status_message(status));
        AppError::ServiceError(message)
    }
}

#[async_trait]
impl ImportJobService for HttpImportJobService {
    async fn submit(&self, submission: &ImportSubmission) -> AppResult<ProgressId> {
        let form = Form::new()
            .part("file", file_part(&submission.file)?)
            .text("conflict_strategy", submission.conflict_strategy.as_str())
            .text("dry_run", bool_field(submission.dry_run))
            .text("adapter_name", submission.adapter_name.clone())
            .text("delete_existing_db", bool_field(submission.delete_existing));

        let request = self
            .authorized(self.client.post(self.url(SUBMIT_PATH)).multipart(form))
            .await?;
        let response = self.send(request, "POST import").await?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        let body: SubmitResponse = response.json().await?;
        if !body.success {
            return Err(AppError::ServiceError(
                body.error.unwrap_or_else(|| "Import failed".to_string()),
            ));
        }

        let progress_id = body.progress_id.ok_or_else(|| {
            AppError::ServiceError("Import service did not return a progress id".to_string())
        })?;
        debug!("Import accepted with progress id {}", progress_id);
        ProgressId::new(progress_id)
    }

    async fn fetch_progress(&self, progress_id: &ProgressId) -> AppResult<ProgressSnapshot> {
        let url = self.url(&format!(
            "{}/{}",
            PROGRESS_PATH,
            urlencoding::encode(progress_id.as_str())
        ));

        let request = self.authorized(self.client.get(&url)).await?;
        let response = self.send(request, "GET progress").await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::TransportError(http_status_message(status)));
        }

        response.json::<ProgressSnapshot>().await.map_err(|e| {
            AppError::TransportError(format!("Unreadable progress response: {}", e))
        })
    }

    async fn validate(
        &self,
        file: &UploadFile,
        adapter_name: &str,
    ) -> AppResult<ValidationOutcome> {
        let form = Form::new()
            .part("file", file_part(file)?)
            .text("adapter_name", adapter_name.to_string());

        let request = self
            .authorized(self.client.post(self.url(VALIDATE_PATH)).multipart(form))
            .await?;
        let response = self.send(request, "POST validate").await?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        let body: ValidateResponse = response.json().await?;
        if !body.success {
            return Err(AppError::ServiceError(
                body.error.unwrap_or_else(|| "Validation failed".to_string()),
            ));
        }

        body.validation.ok_or_else(|| {
            AppError::ServiceError("Validation response did not include a report".to_string())
        })
    }
}

fn file_part(file: &UploadFile) -> AppResult<Part> {
    Part::bytes(file.content.clone())
        .file_name(file.file_name.clone())
        .mime_str(mime_for(&file.file_name))
        .map_err(|e| AppError::InternalError(format!("Invalid upload content type: {}", e)))
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

fn bool_field(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn http_status_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

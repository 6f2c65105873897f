//! Runtime configuration loaded from the environment (and `.env` when present).

use crate::log_info;
use crate::shared::errors::{AppError, AppResult};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Timing policy for the progress poll loop and the post-import refresh
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Delay before the first progress request
    pub initial_delay: Duration,
    /// Delay between consecutive progress requests
    pub interval: Duration,
    /// Total wall-clock time after which the client stops waiting
    pub max_duration: Duration,
    /// Delay between a successful import and the refresh request
    pub reload_delay: Duration,
    /// Also refresh when an import only updated existing records
    pub reload_on_updates: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            interval: Duration::from_millis(1000),
            max_duration: Duration::from_millis(300_000),
            reload_delay: Duration::from_millis(3000),
            reload_on_updates: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub base_url: String,
    pub csrf_token: Option<String>,
    /// Page whose csrf-token meta tag supplies the token when none is configured
    pub csrf_page: Option<String>,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub poll: PollConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            csrf_token: None,
            csrf_page: None,
            request_timeout: Duration::from_secs(30),
            user_agent: format!("outcomes-import/{}", env!("CARGO_PKG_VERSION")),
            poll: PollConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        log_info!("Import service configured at {}", config.base_url);
        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup, applying defaults
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("OUTCOMES_API_BASE_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);
        let base_url = Self::validate_base_url(&base_url)?;

        let csrf_token = lookup("OUTCOMES_CSRF_TOKEN").filter(|t| !t.trim().is_empty());
        let csrf_page = lookup("OUTCOMES_CSRF_PAGE").filter(|p| !p.trim().is_empty());

        let read_millis = |key: &str, default: Duration| -> AppResult<Duration> {
            match lookup(key) {
                Some(raw) => {
                    let millis: u64 = raw.trim().parse().map_err(|e| {
                        AppError::ConfigError(format!("{} must be a number: {}", key, e))
                    })?;
                    Ok(Duration::from_millis(millis))
                }
                None => Ok(default),
            }
        };

        let request_timeout = match lookup("OUTCOMES_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>()?),
            None => defaults.request_timeout,
        };

        let poll_defaults = PollConfig::default();
        let poll = PollConfig {
            initial_delay: read_millis(
                "OUTCOMES_POLL_INITIAL_DELAY_MS",
                poll_defaults.initial_delay,
            )?,
            interval: read_millis("OUTCOMES_POLL_INTERVAL_MS", poll_defaults.interval)?,
            max_duration: read_millis(
                "OUTCOMES_POLL_MAX_DURATION_MS",
                poll_defaults.max_duration,
            )?,
            reload_delay: read_millis("OUTCOMES_RELOAD_DELAY_MS", poll_defaults.reload_delay)?,
            reload_on_updates: match lookup("OUTCOMES_RELOAD_ON_UPDATES") {
                Some(raw) => parse_flag("OUTCOMES_RELOAD_ON_UPDATES", &raw)?,
                None => poll_defaults.reload_on_updates,
            },
        };

        if poll.interval.is_zero() {
            return Err(AppError::ConfigError(
                "OUTCOMES_POLL_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            csrf_token,
            csrf_page,
            request_timeout,
            user_agent: defaults.user_agent,
            poll,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> AppResult<Self> {
        self.base_url = Self::validate_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    fn validate_base_url(base_url: &str) -> AppResult<String> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::ConfigError(format!(
                "Base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        Ok(base_url.trim_end_matches('/').to_string())
    }
}

fn parse_flag(key: &str, raw: &str) -> AppResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::ConfigError(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

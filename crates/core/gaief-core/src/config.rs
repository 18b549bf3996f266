//! Configuration management and environment variable loading

use crate::{GaiefError, Result};
use std::env;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default backend address (the API server's development port)
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Load environment variables from a .env file
///
/// A missing file is not an error; a malformed one is.
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(GaiefError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(GaiefError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Load environment variables from a specific file
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    dotenvy::from_path(path.as_ref()).map_err(|e| {
        GaiefError::config(format!(
            "Failed to load {} environment file: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    tracing::info!("Loaded environment from: {}", path.as_ref().display());
    Ok(())
}

/// Get required environment variable
pub fn get_required_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| {
        GaiefError::config(format!(
            "Required environment variable '{}' is not set. \
             Check your .env file or system environment.",
            key
        ))
    })
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Client-side settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the tutoring backend
    pub api_base_url: String,
    /// Third-party OCR summary function, if deployed
    pub ocr_summary_url: Option<String>,
    /// Upper bound on a single request
    pub request_timeout_secs: u64,
    /// Fallback log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            ocr_summary_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Build from `GAIEF_*` environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            api_base_url: get_env_or("GAIEF_API_URL", DEFAULT_API_URL),
            ocr_summary_url: env::var("GAIEF_OCR_SUMMARY_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            request_timeout_secs: get_env_int(
                "GAIEF_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            log_level: get_env_or("GAIEF_LOG_LEVEL", "info"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the backend URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the OCR summary endpoint
    pub fn with_ocr_summary_url(mut self, url: impl Into<String>) -> Self {
        self.ocr_summary_url = Some(url.into());
        self
    }

    /// Check URLs and timeout
    pub fn validate(&self) -> Result<()> {
        parse_http_url("GAIEF_API_URL", &self.api_base_url)?;
        if let Some(ocr) = &self.ocr_summary_url {
            parse_http_url("GAIEF_OCR_SUMMARY_URL", ocr)?;
        }
        if self.request_timeout_secs == 0 {
            return Err(GaiefError::config(
                "GAIEF_REQUEST_TIMEOUT_SECS must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parse a URL and require an http(s) scheme
pub fn parse_http_url(name: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| GaiefError::config(format!("{} is not a valid URL ({}): {}", name, raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(GaiefError::config(format!(
            "{} must use http or https, got '{}'",
            name, other
        ))),
    }
}

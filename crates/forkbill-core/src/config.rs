//! Configuration module
//!
//! Client configuration sourced from the environment: backend endpoint,
//! optional API key, and receipt upload limits.

use std::env;

// Common constants
const MAX_FILE_SIZE_MB: usize = 10;
const HTTP_TIMEOUT_SECS: u64 = 60;

/// Application configuration for the forkbill client.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the expense backend.
    pub api_url: String,
    /// Optional API key sent as X-API-Key.
    pub api_key: Option<String>,
    /// Frontend base URL used to build shareable expense links.
    pub frontend_url: Option<String>,
    /// HTTP request timeout in seconds.
    pub http_timeout_secs: u64,
    /// Maximum accepted receipt size before compression, in bytes.
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let api_url = env::var("FORKBILL_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let api_key = env::var("FORKBILL_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok();

        let frontend_url = env::var("FORKBILL_FRONTEND_URL").ok();

        let http_timeout_secs = env::var("FORKBILL_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
            .parse::<u64>()?;

        let max_file_size_mb = env::var("FORKBILL_MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()?;

        let allowed_extensions = env::var("FORKBILL_ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "jpg,jpeg,png,webp,heic".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let allowed_content_types = env::var("FORKBILL_ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| "image/jpeg,image/png,image/webp,image/heic".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            frontend_url,
            http_timeout_secs,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
            allowed_content_types,
        })
    }

    /// Shareable link for an expense routing reference, if a frontend URL
    /// is configured.
    pub fn share_url(&self, routing_ref: &str) -> Option<String> {
        self.frontend_url
            .as_deref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), routing_ref))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            api_key: None,
            frontend_url: None,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
                "heic".to_string(),
            ],
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
                "image/heic".to_string(),
            ],
        }
    }
}

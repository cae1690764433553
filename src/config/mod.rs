//! Configuration management

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default endpoint of the public dog.ceo API
pub const DEFAULT_API_BASE_URL: &str = "https://dog.ceo/api";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API base URL cannot be empty")]
    EmptyBaseUrl,
    #[error("API base URL must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the breeds API (default: https://dog.ceo/api)
    pub api_base_url: String,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,
    /// User agent sent with every request
    pub user_agent: String,
    /// Log level (default: info)
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 10,
            user_agent: format!("dog-breeds/{}", crate::VERSION),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.api_base_url.clone()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full URL of the endpoint listing every breed and its sub-breeds
    pub fn list_all_url(&self) -> String {
        format!("{}/breeds/list/all", self.api_base_url.trim().trim_end_matches('/'))
    }
}

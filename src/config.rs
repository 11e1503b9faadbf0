// Configuration - Environment variables

use std::env;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Application configuration loaded from environment
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the hub backend API
    pub api_base_url: String,
    /// Optional log file path for the file tracing layer
    pub log_file: Option<String>,
    /// Optional override for the local state file path
    pub state_file: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("HUB_API_BASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            log_file: env::var("HUB_LOG_FILE").ok(),
            state_file: env::var("HUB_STATE_FILE").ok(),
        }
    }

    /// Validate that required configuration is present
    pub fn validate(&self) -> Result<(), String> {
        if self.api_base_url == DEFAULT_API_BASE_URL {
            tracing::warn!("HUB_API_BASE_URL not set - using {}", DEFAULT_API_BASE_URL);
        }
        Ok(())
    }
}

// Account and AI-provider configuration models

use serde::{Deserialize, Serialize};

/// Authenticated account as returned by `POST /login` and `POST /register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Supported AI providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Gemini,
    Kimi,
    Glm,
    Qwen,
}

impl ModelProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelProvider::Gemini => "gemini",
            ModelProvider::Kimi => "kimi",
            ModelProvider::Glm => "glm",
            ModelProvider::Qwen => "qwen",
        }
    }
}

/// Per-user AI configuration, persisted through `/user/config`.
///
/// `api_key_tested` is the gate: summary generation and aggregation are
/// refused until a connection check has succeeded for the current key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub provider: ModelProvider,
    pub model_name: String,
    pub api_key: String,
    #[serde(default)]
    pub api_key_tested: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbox_retention_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_retention_days: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::Gemini,
            model_name: "gemini-2.5-flash".to_string(),
            api_key: String::new(),
            api_key_tested: false,
            inbox_retention_days: None,
            archive_retention_days: None,
        }
    }
}

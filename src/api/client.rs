// REST boundary client - consumes the backend persistence and AI endpoints.
// One method per endpoint; no retries, no client-side timeouts beyond
// transport defaults. Every failure is terminal for that one user action.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::HubError;
use crate::models::{AppConfig, LogEntry, NewLog, NewReport, Report, User, WeeklySummary};

/// Response envelope for `POST /login` and `POST /register`.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: User,
}

/// Response envelope for `POST /logs/aggregate`.
#[derive(Debug, Deserialize)]
pub struct AggregateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub summary_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConnectionCheck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

// Backend rejections carry a FastAPI-style detail field.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Serialize)]
struct ModelRequest<'a> {
    model_type: &'a str,
    model_name: &'a str,
    api_key: &'a str,
}

/// HTTP client for the hub backend.
pub struct HubApi {
    client: Client,
    base_url: String,
}

impl HubApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response to its JSON body, converting non-2xx into `Rejected`
    /// with the backend's detail message when one is present.
    async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T, HubError> {
        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorBody>().await {
                Ok(body) => body.detail,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_string(),
            };
            return Err(HubError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response.json().await?)
    }

    // ------------------------------------------------------------------
    // Account
    // ------------------------------------------------------------------

    pub async fn register(
        &self,
        username: &str,
        phone: &str,
        password: &str,
    ) -> Result<AuthResponse, HubError> {
        let response = self
            .client
            .post(self.url("/register"))
            .json(&json!({ "username": username, "phone": phone, "password": password }))
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn login(&self, phone: &str, password: &str) -> Result<AuthResponse, HubError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "phone": phone, "password": password }))
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        username: &str,
        email: Option<&str>,
    ) -> Result<StatusResponse, HubError> {
        let response = self
            .client
            .put(self.url("/user/profile"))
            .query(&[("user_id", user_id)])
            .json(&json!({ "username": username, "email": email }))
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<StatusResponse, HubError> {
        let response = self
            .client
            .put(self.url("/user/password"))
            .query(&[("user_id", user_id)])
            .json(&json!({ "old_password": old_password, "new_password": new_password }))
            .send()
            .await?;
        Self::expect_json(response).await
    }

    // ------------------------------------------------------------------
    // AI configuration
    // ------------------------------------------------------------------

    pub async fn fetch_config(&self, user_id: i64) -> Result<AppConfig, HubError> {
        let response = self
            .client
            .get(self.url("/user/config"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn save_config(
        &self,
        user_id: i64,
        config: &AppConfig,
    ) -> Result<StatusResponse, HubError> {
        let response = self
            .client
            .put(self.url("/user/config"))
            .query(&[("user_id", user_id)])
            .json(config)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    /// Validate provider credentials before they are trusted for generation.
    pub async fn check_connection(&self, config: &AppConfig) -> Result<ConnectionCheck, HubError> {
        let response = self
            .client
            .post(self.url("/check-connection"))
            .json(&ModelRequest {
                model_type: config.provider.as_str(),
                model_name: &config.model_name,
                api_key: &config.api_key,
            })
            .send()
            .await?;
        Self::expect_json(response).await
    }

    // ------------------------------------------------------------------
    // Logs
    // ------------------------------------------------------------------

    pub async fn fetch_logs(
        &self,
        user_id: i64,
        query: Option<&str>,
    ) -> Result<Vec<LogEntry>, HubError> {
        let mut request = self
            .client
            .get(self.url("/logs"))
            .query(&[("user_id", user_id)]);
        if let Some(q) = query {
            request = request.query(&[("q", q)]);
        }
        let response = request.send().await?;
        Self::expect_json(response).await
    }

    pub async fn save_log(&self, log: &NewLog) -> Result<LogEntry, HubError> {
        let response = self
            .client
            .post(self.url("/logs"))
            .json(log)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn delete_log(&self, log_id: &str, user_id: i64) -> Result<StatusResponse, HubError> {
        let response = self
            .client
            .delete(self.url(&format!("/logs/{}", log_id)))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    /// Trigger backend aggregation of the user's inbox. The backend owns the
    /// processed flags; callers reload afterwards.
    pub async fn aggregate(&self, user_id: i64) -> Result<AggregateResponse, HubError> {
        let response = self
            .client
            .post(self.url("/logs/aggregate"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    // ------------------------------------------------------------------
    // Summaries and reports
    // ------------------------------------------------------------------

    pub async fn generate_summary(
        &self,
        config: &AppConfig,
        logs: &[LogEntry],
    ) -> Result<WeeklySummary, HubError> {
        let response = self
            .client
            .post(self.url("/generate-summary"))
            .json(&json!({
                "model_type": config.provider.as_str(),
                "model_name": config.model_name,
                "api_key": config.api_key,
                "logs": logs,
            }))
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn fetch_reports(&self, user_id: i64) -> Result<Vec<Report>, HubError> {
        let response = self
            .client
            .get(self.url("/reports"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn save_report(&self, user_id: i64, report: &NewReport) -> Result<Report, HubError> {
        let response = self
            .client
            .post(self.url("/reports"))
            .query(&[("user_id", user_id)])
            .json(report)
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn delete_report(
        &self,
        report_id: i64,
        user_id: i64,
    ) -> Result<StatusResponse, HubError> {
        let response = self
            .client
            .delete(self.url(&format!("/reports/{}", report_id)))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        Self::expect_json(response).await
    }
}

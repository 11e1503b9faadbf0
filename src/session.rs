// Session - owns the in-memory collections and orchestrates network calls
// around the pure core. Created on login, dropped on logout; nothing here is
// global. Mutations are optimistic: applied locally first, with no rollback
// if a later sync fails.

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::api::{AggregateResponse, HubApi};
use crate::error::HubError;
use crate::models::{
    AppConfig, LogEntry, NewLog, NewReport, Report, Todo, User, WeeklySummary,
};

/// Outcome of a manual aggregation trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateOutcome {
    /// Backend accepted the request and the log collection was reloaded.
    Completed { message: Option<String> },
    /// A previous trigger from this session is still in flight.
    AlreadyRunning,
    /// No logged-in user; silently a no-op.
    NoUser,
}

pub struct Session {
    api: HubApi,
    user: Option<User>,
    config: AppConfig,
    logs: Vec<LogEntry>,
    todos: Vec<Todo>,
    last_summary: Option<WeeklySummary>,
    aggregate_in_flight: bool,
}

impl Session {
    pub fn new(api: HubApi) -> Self {
        Self {
            api,
            user: None,
            config: AppConfig::default(),
            logs: Vec::new(),
            todos: Vec::new(),
            last_summary: None,
            aggregate_in_flight: false,
        }
    }

    /// Rebuild a session from state cached between CLI invocations.
    pub fn resume(api: HubApi, user: Option<User>, config: AppConfig, todos: Vec<Todo>) -> Self {
        Self {
            api,
            user,
            config,
            logs: Vec::new(),
            todos,
            last_summary: None,
            aggregate_in_flight: false,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn last_summary(&self) -> Option<&WeeklySummary> {
        self.last_summary.as_ref()
    }

    fn require_user(&self) -> Result<i64, HubError> {
        self.user
            .as_ref()
            .map(|u| u.id)
            .ok_or_else(|| HubError::validation("not logged in"))
    }

    // ------------------------------------------------------------------
    // Account lifecycle
    // ------------------------------------------------------------------

    /// Mainland-China mobile number format, checked before any network call.
    pub fn valid_phone(phone: &str) -> bool {
        // The pattern is a literal constant; compilation cannot fail.
        Regex::new(r"^1[3-9]\d{9}$")
            .map(|re| re.is_match(phone))
            .unwrap_or(false)
    }

    pub async fn register(
        &self,
        username: &str,
        phone: &str,
        password: &str,
    ) -> Result<User, HubError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(HubError::validation("username and password are required"));
        }
        if !Self::valid_phone(phone) {
            return Err(HubError::validation("invalid phone number format"));
        }
        let response = self.api.register(username, phone, password).await?;
        Ok(response.user)
    }

    pub async fn login(&mut self, phone: &str, password: &str) -> Result<User, HubError> {
        if phone.is_empty() || password.is_empty() {
            return Err(HubError::validation("phone and password are required"));
        }
        let response = self.api.login(phone, password).await?;
        tracing::info!("Logged in as {}", response.user.username);

        // Pull the persisted AI config; a missing one keeps the defaults.
        match self.api.fetch_config(response.user.id).await {
            Ok(config) => self.config = config,
            Err(e) => tracing::warn!("Failed to fetch AI config, using defaults: {}", e),
        }

        self.user = Some(response.user.clone());
        Ok(response.user)
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.logs.clear();
        self.last_summary = None;
        self.config = AppConfig::default();
    }

    pub async fn update_profile(
        &mut self,
        username: &str,
        email: Option<&str>,
    ) -> Result<(), HubError> {
        if username.trim().is_empty() {
            return Err(HubError::validation("username is required"));
        }
        let user_id = self.require_user()?;
        self.api.update_profile(user_id, username, email).await?;
        if let Some(user) = self.user.as_mut() {
            user.username = username.to_string();
            user.email = email.map(str::to_string);
        }
        Ok(())
    }

    pub async fn change_password(&self, old: &str, new: &str) -> Result<(), HubError> {
        if old.is_empty() || new.is_empty() {
            return Err(HubError::validation("both passwords are required"));
        }
        let user_id = self.require_user()?;
        self.api.change_password(user_id, old, new).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // AI configuration
    // ------------------------------------------------------------------

    /// Run a connection check for the current provider credentials. On
    /// success the tested gate opens and the config is persisted for the
    /// logged-in user.
    pub async fn verify_connection(&mut self) -> Result<String, HubError> {
        if self.config.api_key.trim().is_empty() {
            return Err(HubError::validation("API key is required"));
        }
        let check = self.api.check_connection(&self.config).await?;
        if !check.success {
            return Err(HubError::Rejected {
                status: 200,
                detail: check.message,
            });
        }
        self.config.api_key_tested = true;

        if let Some(user) = &self.user {
            if let Err(e) = self.api.save_config(user.id, &self.config).await {
                tracing::warn!("Connection verified but config save failed: {}", e);
            }
        }
        Ok(check.message)
    }

    pub async fn save_config(&self) -> Result<(), HubError> {
        let user_id = self.require_user()?;
        self.api.save_config(user_id, &self.config).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Log lifecycle
    // ------------------------------------------------------------------

    /// Capture raw input as a new log and submit it. If the save fails the
    /// entry is kept client-side under a local id rather than being lost;
    /// it will never become processed and carries no owner linkage. Without a
    /// logged-in user there is nothing to attribute the entry to, so the
    /// backend is not called at all and the entry stays local.
    pub async fn add_log(&mut self, content: &str) -> Result<&LogEntry, HubError> {
        if content.trim().is_empty() {
            return Err(HubError::validation("log content is required"));
        }
        let user_id = self.user.as_ref().map(|u| u.id);
        let new_log = NewLog::capture(content, user_id, Utc::now());

        let entry = if user_id.is_none() {
            new_log.into_local_entry()
        } else {
            match self.api.save_log(&new_log).await {
                Ok(saved) => saved,
                Err(e) => {
                    tracing::warn!("Save log failed, keeping local copy: {}", e);
                    new_log.into_local_entry()
                }
            }
        };
        self.logs.insert(0, entry);
        Ok(&self.logs[0])
    }

    /// Wholesale replace the collection with the backend's authoritative
    /// state. Last resolved reload wins; there is no merge.
    pub async fn reload_logs(&mut self) -> Result<usize, HubError> {
        let user_id = self.require_user()?;
        self.logs = self.api.fetch_logs(user_id, None).await?;
        Ok(self.logs.len())
    }

    /// Server-side search. Local-only entries are not covered; use
    /// `views::search` over `logs()` for the in-memory collection.
    pub async fn search_logs(&self, query: &str) -> Result<Vec<LogEntry>, HubError> {
        let user_id = self.require_user()?;
        self.api.fetch_logs(user_id, Some(query)).await
    }

    /// Delete an entry. Local-fallback entries were never persisted, so they
    /// are only dropped from memory.
    pub async fn delete_log(&mut self, log_id: &str) -> Result<bool, HubError> {
        let Some(idx) = self.logs.iter().position(|l| l.id.as_str() == log_id) else {
            return Ok(false);
        };
        if !self.logs[idx].id.is_local() {
            let user_id = self.require_user()?;
            self.api.delete_log(log_id, user_id).await?;
        }
        self.logs.remove(idx);
        Ok(true)
    }

    fn with_log(&mut self, log_id: &str, f: impl FnOnce(&mut LogEntry) -> bool) -> bool {
        match self.logs.iter_mut().find(|l| l.id.as_str() == log_id) {
            Some(log) => f(log),
            None => false,
        }
    }

    pub fn toggle_status(&mut self, log_id: &str) -> bool {
        self.with_log(log_id, LogEntry::toggle_status)
    }

    pub fn convert_to_task(&mut self, log_id: &str) -> bool {
        self.with_log(log_id, LogEntry::convert_to_task)
    }

    pub fn revert_to_note(&mut self, log_id: &str) -> bool {
        self.with_log(log_id, LogEntry::revert_to_note)
    }

    pub fn postpone(&mut self, log_id: &str) -> bool {
        self.with_log(log_id, LogEntry::postpone)
    }

    pub fn toggle_pinned(&mut self, log_id: &str) -> bool {
        self.with_log(log_id, |log| {
            log.toggle_pinned();
            true
        })
    }

    pub fn edit_log(&mut self, log_id: &str, content: &str) -> bool {
        self.with_log(log_id, |log| {
            log.set_content(content);
            true
        })
    }

    // ------------------------------------------------------------------
    // Aggregation
    // ------------------------------------------------------------------

    /// Trigger backend aggregation of the inbox. The client never marks
    /// entries processed itself; on success it reloads and trusts the
    /// backend's state. A second trigger while one is outstanding is
    /// refused; concurrent triggers from other sessions are the backend's
    /// problem.
    pub async fn aggregate_inbox(&mut self) -> Result<AggregateOutcome, HubError> {
        let Some(user_id) = self.user.as_ref().map(|u| u.id) else {
            return Ok(AggregateOutcome::NoUser);
        };
        if self.aggregate_in_flight {
            return Ok(AggregateOutcome::AlreadyRunning);
        }

        self.aggregate_in_flight = true;
        let result = self.api.aggregate(user_id).await;
        self.aggregate_in_flight = false;

        let response: AggregateResponse = result?;
        if !response.success {
            return Err(HubError::Rejected {
                status: 200,
                detail: response
                    .message
                    .unwrap_or_else(|| "aggregation failed".to_string()),
            });
        }

        tracing::info!(summary_id = ?response.summary_id, "Aggregation completed, reloading logs");
        self.reload_logs().await?;
        Ok(AggregateOutcome::Completed {
            message: response.message,
        })
    }

    // ------------------------------------------------------------------
    // Weekly reports
    // ------------------------------------------------------------------

    /// Generate a weekly summary from the current log collection. Gated on a
    /// verified API key.
    pub async fn generate_report(&mut self) -> Result<WeeklySummary, HubError> {
        if !self.config.api_key_tested {
            return Err(HubError::validation(
                "API key has not been verified; run a connection check first",
            ));
        }
        let summary = self.api.generate_summary(&self.config, &self.logs).await?;
        self.last_summary = Some(summary.clone());
        Ok(summary)
    }

    /// Persist the last generated summary to report history.
    pub async fn save_report(&self, title: &str) -> Result<Report, HubError> {
        if title.trim().is_empty() {
            return Err(HubError::validation("report title is required"));
        }
        let user_id = self.require_user()?;
        let summary = self
            .last_summary
            .as_ref()
            .ok_or_else(|| HubError::validation("no summary generated yet"))?;

        let (start, end) = self.log_date_range();
        let report = NewReport {
            title: title.to_string(),
            content: summary.clone(),
            start_date: start,
            end_date: end,
        };
        self.api.save_report(user_id, &report).await
    }

    fn log_date_range(&self) -> (Option<String>, Option<String>) {
        let mut stamps: Vec<DateTime<Utc>> = self.logs.iter().map(|l| l.timestamp).collect();
        stamps.sort();
        let fmt = |ts: &DateTime<Utc>| ts.format("%Y-%m-%d").to_string();
        (stamps.first().map(fmt), stamps.last().map(fmt))
    }

    pub async fn fetch_reports(&self) -> Result<Vec<Report>, HubError> {
        let user_id = self.require_user()?;
        self.api.fetch_reports(user_id).await
    }

    pub async fn delete_report(&self, report_id: i64) -> Result<(), HubError> {
        let user_id = self.require_user()?;
        self.api.delete_report(report_id, user_id).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Todos (client-local)
    // ------------------------------------------------------------------

    pub fn add_todo(&mut self, content: &str, list_name: &str) -> Result<&Todo, HubError> {
        if content.trim().is_empty() {
            return Err(HubError::validation("todo content is required"));
        }
        self.todos.insert(0, Todo::new(content, list_name, Utc::now()));
        Ok(&self.todos[0])
    }

    pub fn toggle_todo(&mut self, todo_id: &str) -> bool {
        match self.todos.iter_mut().find(|t| t.id == todo_id) {
            Some(todo) => {
                todo.toggle(Utc::now());
                true
            }
            None => false,
        }
    }

    pub fn delete_todo(&mut self, todo_id: &str) -> bool {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != todo_id);
        self.todos.len() != before
    }
}

// Report model - persisted snapshot of a weekly summary

use serde::{Deserialize, Serialize};

use super::summary::WeeklySummary;

/// A saved report. Created only by an explicit "save to history" action,
/// immutable once created, deletable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: WeeklySummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub created_at: String,
}

/// Body for `POST /reports`.
#[derive(Debug, Clone, Serialize)]
pub struct NewReport {
    pub title: String,
    pub content: WeeklySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

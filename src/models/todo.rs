// Todo model - the lightweight reminder list, client-local

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TODO_LIST: &str = "Scratch";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoPriority {
    High,
    Medium,
    Low,
}

/// A reminder. Parallel to `LogEntry` but simpler; the only structural link
/// is the optional `related_log_id` back-reference, used for lookup only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub list_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TodoPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_log_id: Option<String>,
}

impl Todo {
    pub fn new(content: &str, list_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            completed: false,
            completed_at: None,
            created_at: now,
            due_date: None,
            list_name: list_name.to_string(),
            priority: None,
            notes: None,
            related_log_id: None,
        }
    }

    /// Completion toggle; stamps or clears `completed_at`.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn toggle_stamps_and_clears_completion_time() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 6, 1, 17, 0, 0).unwrap();
        let mut todo = Todo::new("water plants", DEFAULT_TODO_LIST, now);

        todo.toggle(later);
        assert!(todo.completed);
        assert_eq!(todo.completed_at, Some(later));

        todo.toggle(later);
        assert!(!todo.completed);
        assert_eq!(todo.completed_at, None);
    }
}

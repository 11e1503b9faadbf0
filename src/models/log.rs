// Log entity model - the user-authored unit of record

use chrono::{DateTime, Days, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Markdown task markers recognized at capture time. Both are exactly six
/// bytes; the strip below relies on that.
pub const TASK_OPEN_MARKER: &str = "- [ ] ";
pub const TASK_DONE_MARKER: &str = "- [x] ";
const MARKER_LEN: usize = 6;

/// Closed kind enumeration. `Summary` entries are emitted only by the backend
/// aggregation; the client never creates them but must classify them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Task,
    Note,
    AiSuggestion,
    Summary,
}

impl LogKind {
    /// Aggregation output kinds: excluded from the inbox and the archive,
    /// always shown on the main board.
    pub fn is_summary_like(self) -> bool {
        matches!(self, LogKind::AiSuggestion | LogKind::Summary)
    }
}

/// Task status. `Pending` survives on the wire but no local transition
/// produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    InProgress,
    Done,
    Pending,
}

/// Identifier with explicit save state: `Saved` ids come from the backend,
/// `Local` ids are generated client-side when a save fails so the entry is
/// not lost. A reconciliation pass can pick out `Local` entries for
/// re-submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogId {
    Saved(String),
    Local(String),
}

impl LogId {
    /// Fallback id derived from the capture time, millisecond precision.
    pub fn local_from(now: DateTime<Utc>) -> Self {
        LogId::Local(now.timestamp_millis().to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            LogId::Saved(id) | LogId::Local(id) => id,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, LogId::Local(_))
    }
}

// On the wire an id is a plain string; anything the backend hands us is by
// definition saved.
impl Serialize for LogId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Supabase may return numeric ids; accept both.
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => Ok(LogId::Saved(s)),
            serde_json::Value::Number(n) => Ok(LogId::Saved(n.to_string())),
            other => Err(de::Error::custom(format!("invalid log id: {}", other))),
        }
    }
}

/// A captured note, task or aggregation artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: LogId,
    #[serde(rename = "type")]
    pub kind: LogKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LogStatus>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub is_processed: bool,
    #[serde(default)]
    pub is_pinned: bool,
}

/// Body for `POST /logs`: an entry minus its id, plus the owner reference.
#[derive(Debug, Clone, Serialize)]
pub struct NewLog {
    #[serde(rename = "type")]
    pub kind: LogKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LogStatus>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl NewLog {
    /// Parse raw input into a new log. A leading `- [ ] ` yields an
    /// in-progress task, `- [x] ` a done task, anything else a note. The
    /// marker is stripped as a fixed six-byte prefix.
    pub fn capture(input: &str, user_id: Option<i64>, now: DateTime<Utc>) -> Self {
        let (kind, status, content) = if input.starts_with(TASK_OPEN_MARKER) {
            (LogKind::Task, Some(LogStatus::InProgress), &input[MARKER_LEN..])
        } else if input.starts_with(TASK_DONE_MARKER) {
            (LogKind::Task, Some(LogStatus::Done), &input[MARKER_LEN..])
        } else {
            (LogKind::Note, None, input)
        };

        Self {
            kind,
            status,
            content: content.to_string(),
            timestamp: now,
            tags: Vec::new(),
            user_id,
        }
    }

    /// Keep the entry client-side with a locally generated id. Used when the
    /// save call fails; durability traded for availability.
    pub fn into_local_entry(self) -> LogEntry {
        LogEntry {
            id: LogId::local_from(self.timestamp),
            kind: self.kind,
            status: self.status,
            content: self.content,
            timestamp: self.timestamp,
            tags: self.tags,
            category: None,
            // No owner linkage guarantee for local fallback entries.
            user_id: None,
            is_processed: false,
            is_pinned: false,
        }
    }
}

impl LogEntry {
    /// Note -> Task(InProgress). No-op on anything that is not a note.
    pub fn convert_to_task(&mut self) -> bool {
        if self.kind != LogKind::Note {
            return false;
        }
        self.kind = LogKind::Task;
        self.status = Some(LogStatus::InProgress);
        true
    }

    /// Task(*) -> Note, status cleared. No-op on non-tasks.
    pub fn revert_to_note(&mut self) -> bool {
        if self.kind != LogKind::Task {
            return false;
        }
        self.kind = LogKind::Note;
        self.status = None;
        true
    }

    /// Done <-> InProgress. Never visits `Pending`; no-op on notes and on
    /// pending tasks.
    pub fn toggle_status(&mut self) -> bool {
        if self.kind != LogKind::Task {
            return false;
        }
        match self.status {
            Some(LogStatus::Done) => {
                self.status = Some(LogStatus::InProgress);
                true
            }
            Some(LogStatus::InProgress) => {
                self.status = Some(LogStatus::Done);
                true
            }
            _ => false,
        }
    }

    /// Push the timestamp forward by exactly one calendar day. Defined only
    /// for tasks that are not done.
    pub fn postpone(&mut self) -> bool {
        if self.kind != LogKind::Task || self.status == Some(LogStatus::Done) {
            return false;
        }
        match self.timestamp.checked_add_days(Days::new(1)) {
            Some(ts) => {
                self.timestamp = ts;
                true
            }
            None => false,
        }
    }

    pub fn toggle_pinned(&mut self) {
        self.is_pinned = !self.is_pinned;
    }

    /// Replace the content in place; kind, status and timestamp are kept.
    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
    }

    /// Case-insensitive substring match on the content or any tag.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.content.to_lowercase().contains(&q)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap()
    }

    fn note(content: &str) -> LogEntry {
        NewLog::capture(content, None, at(2025, 6, 1)).into_local_entry()
    }

    #[test]
    fn capture_open_marker_creates_in_progress_task() {
        let log = NewLog::capture("- [ ] buy milk", Some(7), at(2025, 6, 1));
        assert_eq!(log.kind, LogKind::Task);
        assert_eq!(log.status, Some(LogStatus::InProgress));
        assert_eq!(log.content, "buy milk");
        assert_eq!(log.user_id, Some(7));
    }

    #[test]
    fn capture_done_marker_creates_done_task() {
        let log = NewLog::capture("- [x] ship release", None, at(2025, 6, 1));
        assert_eq!(log.kind, LogKind::Task);
        assert_eq!(log.status, Some(LogStatus::Done));
        assert_eq!(log.content, "ship release");
    }

    #[test]
    fn capture_plain_text_creates_note() {
        let log = NewLog::capture("an idea", None, at(2025, 6, 1));
        assert_eq!(log.kind, LogKind::Note);
        assert_eq!(log.status, None);
        assert_eq!(log.content, "an idea");
    }

    #[test]
    fn capture_marker_must_be_prefix() {
        let log = NewLog::capture("note with - [ ] inline", None, at(2025, 6, 1));
        assert_eq!(log.kind, LogKind::Note);
        assert_eq!(log.content, "note with - [ ] inline");
    }

    #[test]
    fn toggle_status_is_its_own_inverse() {
        let mut log = note("- [ ] t");
        let original = log.status;
        assert!(log.toggle_status());
        assert_eq!(log.status, Some(LogStatus::Done));
        assert!(log.toggle_status());
        assert_eq!(log.status, original);
    }

    #[test]
    fn toggle_status_ignores_notes_and_pending() {
        let mut plain = note("just a note");
        assert!(!plain.toggle_status());
        assert_eq!(plain.status, None);

        let mut pending = note("- [ ] t");
        pending.status = Some(LogStatus::Pending);
        assert!(!pending.toggle_status());
        assert_eq!(pending.status, Some(LogStatus::Pending));
    }

    #[test]
    fn convert_then_revert_round_trips() {
        let original = note("remember this");
        let mut log = original.clone();
        assert!(log.convert_to_task());
        assert_eq!(log.kind, LogKind::Task);
        assert_eq!(log.status, Some(LogStatus::InProgress));
        assert!(log.revert_to_note());
        assert_eq!(log, original);
    }

    #[test]
    fn convert_to_task_only_from_note() {
        let mut log = note("- [ ] already a task");
        assert!(!log.convert_to_task());
    }

    #[test]
    fn postpone_advances_one_calendar_day() {
        let mut log = note("- [ ] t");
        log.timestamp = at(2025, 3, 14);
        assert!(log.postpone());
        assert_eq!(log.timestamp, at(2025, 3, 15));
    }

    #[test]
    fn postpone_crosses_month_and_year_boundaries() {
        let mut log = note("- [ ] t");
        log.timestamp = at(2025, 1, 31);
        assert!(log.postpone());
        assert_eq!(log.timestamp, at(2025, 2, 1));

        log.timestamp = at(2024, 12, 31);
        assert!(log.postpone());
        assert_eq!(log.timestamp, at(2025, 1, 1));
    }

    #[test]
    fn postpone_rejects_done_tasks_and_notes() {
        let mut done = note("- [x] t");
        let ts = done.timestamp;
        assert!(!done.postpone());
        assert_eq!(done.timestamp, ts);

        let mut plain = note("n");
        assert!(!plain.postpone());
    }

    #[test]
    fn local_entry_has_local_id_and_no_owner() {
        let entry = NewLog::capture("x", Some(3), at(2025, 6, 1)).into_local_entry();
        assert!(entry.id.is_local());
        assert_eq!(entry.user_id, None);
    }

    #[test]
    fn matches_query_is_case_insensitive_over_content_and_tags() {
        let mut log = note("Deep work session");
        log.tags = vec!["work".to_string()];
        assert!(log.matches_query("WORK"));
        assert!(log.matches_query("deep"));
        assert!(!log.matches_query("gym"));
    }

    #[test]
    fn wire_format_round_trip() {
        let json = r#"{
            "id": 42,
            "type": "ai_suggestion",
            "content": "try batching emails",
            "timestamp": "2025-06-01T10:30:00Z",
            "tags": [],
            "user_id": 7,
            "is_processed": true
        }"#;
        let log: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(log.id, LogId::Saved("42".to_string()));
        assert_eq!(log.kind, LogKind::AiSuggestion);
        assert!(log.is_processed);
        assert!(!log.is_pinned);

        let back = serde_json::to_value(&log).unwrap();
        assert_eq!(back["type"], "ai_suggestion");
        assert_eq!(back["id"], "42");
    }
}

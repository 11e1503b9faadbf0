// Classification & filtering engine - derives the Inbox / Main Board /
// Archive partitions from the full log collection. Pure functions, no I/O.

use chrono::{DateTime, Days, Months, Utc};

use crate::models::LogEntry;

/// Time window applied to the main board. Ignored while a search query is
/// active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
    Month,
}

impl TimeWindow {
    /// Whether `ts` falls inside the window relative to `now`. Future
    /// timestamps (postponed tasks) are always outside.
    pub fn contains(self, ts: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            TimeWindow::Day => ts.date_naive() == now.date_naive(),
            TimeWindow::Week => {
                let floor = now.checked_sub_days(Days::new(7)).unwrap_or(now);
                ts >= floor && ts <= now
            }
            TimeWindow::Month => {
                let floor = now.checked_sub_months(Months::new(1)).unwrap_or(now);
                ts >= floor && ts <= now
            }
        }
    }
}

impl std::str::FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            other => Err(format!("unknown time window: {}", other)),
        }
    }
}

// Pinned entries first, then newest first. Shared by inbox and board.
fn sort_pinned_first(logs: &mut [&LogEntry]) {
    logs.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then(b.timestamp.cmp(&a.timestamp))
    });
}

/// Search mode: every log of any kind/status whose content or any tag
/// contains the query, case-insensitively. Bypasses all partition rules.
pub fn search<'a>(logs: &'a [LogEntry], query: &str) -> Vec<&'a LogEntry> {
    let mut hits: Vec<&LogEntry> = logs.iter().filter(|l| l.matches_query(query)).collect();
    sort_pinned_first(&mut hits);
    hits
}

/// Inbox: unprocessed, unpinned, non-summary entries awaiting aggregation.
pub fn inbox(logs: &[LogEntry]) -> Vec<&LogEntry> {
    let mut entries: Vec<&LogEntry> = logs
        .iter()
        .filter(|l| !l.is_processed && !l.is_pinned && !l.kind.is_summary_like())
        .collect();
    sort_pinned_first(&mut entries);
    entries
}

/// Main board: pinned, processed and summary-kind entries. Pinned and
/// summary-kind entries are exempt from the time window; everything else must
/// fall inside it.
pub fn main_board(logs: &[LogEntry], window: TimeWindow, now: DateTime<Utc>) -> Vec<&LogEntry> {
    let mut entries: Vec<&LogEntry> = logs
        .iter()
        .filter(|l| l.is_pinned || l.is_processed || l.kind.is_summary_like())
        .filter(|l| {
            l.is_pinned || l.kind.is_summary_like() || window.contains(l.timestamp, now)
        })
        .collect();
    sort_pinned_first(&mut entries);
    entries
}

/// Archive: processed raw entries, summaries excluded (those stay on the main
/// board). Not time-windowed; sorted purely newest first.
pub fn archive(logs: &[LogEntry]) -> Vec<&LogEntry> {
    let mut entries: Vec<&LogEntry> = logs
        .iter()
        .filter(|l| l.is_processed && !l.kind.is_summary_like())
        .collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogId, LogKind, LogStatus, NewLog};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn entry(id: &str, content: &str, ts: DateTime<Utc>) -> LogEntry {
        let mut e = NewLog::capture(content, None, ts).into_local_entry();
        e.id = LogId::Saved(id.to_string());
        e
    }

    fn sample(now: DateTime<Utc>) -> Vec<LogEntry> {
        let mut fresh = entry("fresh", "- [ ] buy milk", now);
        fresh.tags = vec!["errand".to_string()];

        let mut processed = entry("processed", "old note", now - chrono::Duration::days(2));
        processed.is_processed = true;

        let mut pinned = entry("pinned", "keep me around", now - chrono::Duration::days(40));
        pinned.is_pinned = true;

        let mut suggestion = entry("ai", "batch your emails", now - chrono::Duration::days(90));
        suggestion.kind = LogKind::AiSuggestion;

        let mut daily = entry("summary", "daily digest", now - chrono::Duration::days(90));
        daily.kind = LogKind::Summary;
        daily.is_processed = true;

        vec![fresh, processed, pinned, suggestion, daily]
    }

    fn ids<'a>(view: &[&'a LogEntry]) -> Vec<&'a str> {
        view.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn fresh_capture_lands_in_inbox_only() {
        let now = at(2025, 6, 10);
        let logs = vec![entry("a", "- [ ] buy milk", now)];
        assert_eq!(ids(&inbox(&logs)), vec!["a"]);
        assert!(main_board(&logs, TimeWindow::Week, now).is_empty());
        assert!(archive(&logs).is_empty());
        assert_eq!(logs[0].status, Some(LogStatus::InProgress));
    }

    #[test]
    fn processing_moves_entry_to_board_and_archive() {
        let now = at(2025, 6, 10);
        let mut logs = vec![entry("a", "note", now)];
        logs[0].is_processed = true;
        assert!(inbox(&logs).is_empty());
        assert_eq!(ids(&main_board(&logs, TimeWindow::Week, now)), vec!["a"]);
        assert_eq!(ids(&archive(&logs)), vec!["a"]);
    }

    #[test]
    fn pinning_removes_from_inbox_and_ignores_window() {
        let now = at(2025, 6, 10);
        let mut logs = vec![entry("a", "note", now - chrono::Duration::days(365))];
        logs[0].is_pinned = true;
        assert!(inbox(&logs).is_empty());
        assert_eq!(ids(&main_board(&logs, TimeWindow::Day, now)), vec!["a"]);
    }

    #[test]
    fn inbox_and_archive_are_disjoint() {
        let now = at(2025, 6, 10);
        let logs = sample(now);
        let inbox_ids = ids(&inbox(&logs));
        let archive_ids = ids(&archive(&logs));
        assert!(inbox_ids.iter().all(|id| !archive_ids.contains(id)));
        assert!(inbox(&logs).iter().all(|l| !l.is_processed));
        assert!(archive(&logs).iter().all(|l| l.is_processed));
    }

    #[test]
    fn summaries_never_reach_inbox_or_archive() {
        let now = at(2025, 6, 10);
        let logs = sample(now);
        assert!(inbox(&logs).iter().all(|l| !l.kind.is_summary_like()));
        assert!(archive(&logs).iter().all(|l| !l.kind.is_summary_like()));
        let board = main_board(&logs, TimeWindow::Week, now);
        assert!(ids(&board).contains(&"ai"));
        assert!(ids(&board).contains(&"summary"));
    }

    #[test]
    fn every_entry_is_reachable_somewhere() {
        let now = at(2025, 6, 10);
        let logs = sample(now);
        for log in &logs {
            let id = log.id.as_str();
            let reachable = ids(&inbox(&logs)).contains(&id)
                || ids(&main_board(&logs, TimeWindow::Month, now)).contains(&id)
                || ids(&archive(&logs)).contains(&id)
                || ids(&search(&logs, "")).contains(&id);
            assert!(reachable, "entry {} lost by every view", id);
        }
    }

    #[test]
    fn search_matches_tags_case_insensitively_and_ignores_partitions() {
        let now = at(2025, 6, 10);
        let mut logs = sample(now);
        logs[1].tags = vec!["work".to_string()];
        let hits = search(&logs, "WORK");
        assert_eq!(ids(&hits), vec!["processed"]);
        // Summary-kind entries are searchable too.
        assert_eq!(ids(&search(&logs, "digest")), vec!["summary"]);
    }

    #[test]
    fn board_is_ordered_pinned_first_then_newest() {
        let now = at(2025, 6, 10);
        let mut a = entry("old-pinned", "a", now - chrono::Duration::days(30));
        a.is_pinned = true;
        let mut b = entry("new", "b", now);
        b.is_processed = true;
        let mut c = entry("older", "c", now - chrono::Duration::days(1));
        c.is_processed = true;
        let logs = vec![c, b, a];
        assert_eq!(
            ids(&main_board(&logs, TimeWindow::Week, now)),
            vec!["old-pinned", "new", "older"]
        );
    }

    #[test]
    fn day_window_is_calendar_day_not_24_hours() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 1, 0, 0).unwrap();
        let last_night = Utc.with_ymd_and_hms(2025, 6, 9, 23, 0, 0).unwrap();
        assert!(!TimeWindow::Day.contains(last_night, now));
        let this_morning = Utc.with_ymd_and_hms(2025, 6, 10, 0, 30, 0).unwrap();
        assert!(TimeWindow::Day.contains(this_morning, now));
    }

    #[test]
    fn week_window_excludes_postponed_future_tasks() {
        let now = at(2025, 6, 10);
        let tomorrow = at(2025, 6, 11);
        assert!(!TimeWindow::Week.contains(tomorrow, now));
        assert!(TimeWindow::Week.contains(now - chrono::Duration::days(7), now));
        assert!(!TimeWindow::Week.contains(now - chrono::Duration::days(8), now));
    }

    #[test]
    fn month_window_spans_one_calendar_month() {
        let now = at(2025, 3, 31);
        assert!(TimeWindow::Month.contains(at(2025, 3, 1), now));
        assert!(!TimeWindow::Month.contains(at(2025, 2, 27), now));
    }
}

// Activity statistics - pure read models behind the dashboard sidebar,
// heatmap, task timeline and tag insights

use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::HashMap;

use crate::models::{LogEntry, LogKind, LogStatus};

pub const HEATMAP_DAYS: usize = 28;
pub const TIMELINE_CAP: usize = 10;
const TAG_CAP: usize = 6;
const UNCATEGORIZED: &str = "Uncategorized";

/// Dashboard sidebar numbers plus the 7-day activity bars.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub completed: usize,
    /// Percent of tasks done, rounded; 0 when there are no tasks.
    pub completion_rate: u32,
    /// Log counts per day, oldest first, ending today.
    pub last_week: Vec<DayCount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

pub fn dashboard_stats(logs: &[LogEntry], now: DateTime<Utc>) -> DashboardStats {
    let completed = logs
        .iter()
        .filter(|l| l.status == Some(LogStatus::Done))
        .count();
    let tasks = logs.iter().filter(|l| l.kind == LogKind::Task).count();
    let completion_rate = if tasks > 0 {
        ((completed as f64 / tasks as f64) * 100.0).round() as u32
    } else {
        0
    };

    DashboardStats {
        completed,
        completion_rate,
        last_week: counts_per_day(logs, now, 7),
    }
}

fn counts_per_day(logs: &[LogEntry], now: DateTime<Utc>, days: usize) -> Vec<DayCount> {
    let today = now.date_naive();
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back as u64)))
        .map(|date| DayCount {
            date,
            count: logs
                .iter()
                .filter(|l| l.timestamp.date_naive() == date)
                .count(),
        })
        .collect()
}

/// Heatmap intensity buckets, lightest to most intense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Intensity {
    None,
    Low,
    Medium,
    High,
    Intense,
}

impl Intensity {
    pub fn for_count(count: usize) -> Self {
        match count {
            0 => Intensity::None,
            1..=2 => Intensity::Low,
            3..=5 => Intensity::Medium,
            6..=8 => Intensity::High,
            _ => Intensity::Intense,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: usize,
    pub intensity: Intensity,
}

/// Last 28 days of capture activity, oldest first.
pub fn activity_heatmap(logs: &[LogEntry], now: DateTime<Utc>) -> Vec<HeatmapCell> {
    counts_per_day(logs, now, HEATMAP_DAYS)
        .into_iter()
        .map(|day| HeatmapCell {
            date: day.date,
            count: day.count,
            intensity: Intensity::for_count(day.count),
        })
        .collect()
}

/// One Gantt-style row per task.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRow {
    /// Content truncated to 20 characters with an ellipsis.
    pub label: String,
    pub full_content: String,
    pub start: DateTime<Utc>,
    pub done: bool,
}

/// Task timeline: earliest first, capped at ten rows.
pub fn task_timeline(logs: &[LogEntry]) -> Vec<TimelineRow> {
    let mut rows: Vec<TimelineRow> = logs
        .iter()
        .filter(|l| l.kind == LogKind::Task)
        .map(|l| TimelineRow {
            label: truncate_label(&l.content),
            full_content: l.content.clone(),
            start: l.timestamp,
            done: l.status == Some(LogStatus::Done),
        })
        .collect();
    rows.sort_by_key(|r| r.start);
    rows.truncate(TIMELINE_CAP);
    rows
}

fn truncate_label(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() > 20 {
        let mut label: String = chars[..20].iter().collect();
        label.push_str("...");
        label
    } else {
        content.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Tag frequency over the whole collection, top six descending. Untagged
/// entries are bucketed as uncategorized so they stay visible in the balance.
pub fn tag_insights(logs: &[LogEntry]) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for log in logs {
        if log.tags.is_empty() {
            *counts.entry(UNCATEGORIZED).or_default() += 1;
        } else {
            for tag in &log.tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
    }
    let mut out: Vec<TagCount> = counts
        .into_iter()
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then(a.name.cmp(&b.name)));
    out.truncate(TAG_CAP);
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendDay {
    pub date: NaiveDate,
    pub completed: usize,
    pub total: usize,
}

/// 7-day productivity trend: completed tasks vs. total captures per day.
pub fn weekly_trend(logs: &[LogEntry], now: DateTime<Utc>) -> Vec<TrendDay> {
    let today = now.date_naive();
    (0..7)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let day_logs: Vec<&LogEntry> = logs
                .iter()
                .filter(|l| l.timestamp.date_naive() == date)
                .collect();
            TrendDay {
                date,
                completed: day_logs
                    .iter()
                    .filter(|l| l.kind == LogKind::Task && l.status == Some(LogStatus::Done))
                    .count(),
                total: day_logs.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewLog;
    use chrono::TimeZone;

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 12, 0, 0).unwrap()
    }

    fn logs() -> Vec<LogEntry> {
        vec![
            NewLog::capture("- [x] done task", None, at(10)).into_local_entry(),
            NewLog::capture("- [ ] open task", None, at(10)).into_local_entry(),
            NewLog::capture("a note", None, at(9)).into_local_entry(),
            NewLog::capture("- [x] older done", None, at(1)).into_local_entry(),
        ]
    }

    #[test]
    fn completion_rate_over_tasks_only() {
        let stats = dashboard_stats(&logs(), at(10));
        assert_eq!(stats.completed, 2);
        // 2 of 3 tasks done; the note does not count.
        assert_eq!(stats.completion_rate, 67);
        assert_eq!(stats.last_week.len(), 7);
        assert_eq!(stats.last_week[6].count, 2);
        assert_eq!(stats.last_week[5].count, 1);
    }

    #[test]
    fn completion_rate_is_zero_without_tasks() {
        let only_notes = vec![NewLog::capture("n", None, at(10)).into_local_entry()];
        assert_eq!(dashboard_stats(&only_notes, at(10)).completion_rate, 0);
    }

    #[test]
    fn heatmap_covers_28_days_with_bucketed_intensity() {
        let cells = activity_heatmap(&logs(), at(10));
        assert_eq!(cells.len(), HEATMAP_DAYS);
        let today = cells.last().unwrap();
        assert_eq!(today.count, 2);
        assert_eq!(today.intensity, Intensity::Low);
        assert_eq!(Intensity::for_count(0), Intensity::None);
        assert_eq!(Intensity::for_count(5), Intensity::Medium);
        assert_eq!(Intensity::for_count(9), Intensity::Intense);
    }

    #[test]
    fn timeline_keeps_tasks_only_earliest_first() {
        let rows = task_timeline(&logs());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].full_content, "older done");
        assert!(rows[0].done);
        assert!(!rows[2].done || rows[2].full_content == "done task");
    }

    #[test]
    fn timeline_truncates_long_labels() {
        let long = NewLog::capture(
            "- [ ] a very long task description that keeps going",
            None,
            at(5),
        )
        .into_local_entry();
        let rows = task_timeline(&[long]);
        assert_eq!(rows[0].label, "a very long task des...");
    }

    #[test]
    fn tag_insights_buckets_untagged_and_sorts_desc() {
        let mut tagged = NewLog::capture("x", None, at(10)).into_local_entry();
        tagged.tags = vec!["work".to_string(), "focus".to_string()];
        let mut more_work = NewLog::capture("y", None, at(10)).into_local_entry();
        more_work.tags = vec!["work".to_string()];
        let untagged = NewLog::capture("z", None, at(10)).into_local_entry();

        let insights = tag_insights(&[tagged, more_work, untagged]);
        assert_eq!(insights[0].name, "work");
        assert_eq!(insights[0].count, 2);
        assert!(insights.iter().any(|t| t.name == UNCATEGORIZED));
    }

    #[test]
    fn weekly_trend_counts_completed_vs_total() {
        let trend = weekly_trend(&logs(), at(10));
        assert_eq!(trend.len(), 7);
        let today = trend.last().unwrap();
        assert_eq!(today.total, 2);
        assert_eq!(today.completed, 1);
    }
}

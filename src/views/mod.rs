// Views module - pure derivations of the in-memory collections

pub mod board;
pub mod stats;
pub mod summary;
pub mod todos;

pub use board::{archive, inbox, main_board, search, TimeWindow};
pub use stats::{
    activity_heatmap, dashboard_stats, tag_insights, task_timeline, weekly_trend, DashboardStats,
    HeatmapCell, Intensity, TagCount, TimelineRow, TrendDay,
};
pub use summary::{emphasis_spans, render_plain, Span};
pub use todos::{filter_todos, list_counts, ListCounts, TodoList};

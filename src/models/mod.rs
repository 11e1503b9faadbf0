// Models module

pub mod log;
pub mod report;
pub mod summary;
pub mod todo;
pub mod user;

pub use log::{LogEntry, LogId, LogKind, LogStatus, NewLog, TASK_DONE_MARKER, TASK_OPEN_MARKER};
pub use report::{NewReport, Report};
pub use summary::{FocusArea, Highlight, PulseStats, WeeklySummary};
pub use todo::{Todo, TodoPriority, DEFAULT_TODO_LIST};
pub use user::{AppConfig, ModelProvider, User};

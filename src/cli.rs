// Command-line surface. Each subcommand maps to one session operation or one
// derived view; state between invocations lives in `LocalState`.

use clap::{Parser, Subcommand};

use crate::error::HubError;
use crate::local_state::LocalState;
use crate::models::{LogEntry, LogKind, LogStatus, ModelProvider, DEFAULT_TODO_LIST};
use crate::session::{AggregateOutcome, Session};
use crate::views;
use crate::views::{HeatmapCell, Intensity, TimeWindow, TodoList, TrendDay};

pub const GUIDE_HINT: &str = "Tip: capture with `hub add \"- [ ] task\"`, review with `hub inbox`, \
then `hub aggregate`. Dismiss this hint with `hub close-guide`.";

/// One-time onboarding hint, shown until dismissed.
pub fn guide_hint(state: &LocalState) -> Option<&'static str> {
    if state.has_closed_guide {
        None
    } else {
        Some(GUIDE_HINT)
    }
}

#[derive(Parser)]
#[command(name = "hub")]
#[command(about = "Personal log hub - capture, classify, aggregate")]
#[command(version)]
pub struct Cli {
    /// Override the backend API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Register {
        username: String,
        /// Mainland-China mobile number
        phone: String,
        password: String,
    },
    /// Log in and cache the account locally
    Login { phone: String, password: String },
    /// Clear the cached account
    Logout,

    /// Capture a new log entry ("- [ ] " prefix makes it a task)
    Add {
        /// Raw input text
        content: String,
    },
    /// Show unprocessed entries awaiting aggregation
    Inbox,
    /// Show the main board (pinned, processed and summary entries)
    Board {
        /// Time window: day, week or month
        #[arg(long, default_value = "week")]
        window: TimeWindow,
    },
    /// Show processed entries, newest first
    Archive,
    /// Search all entries by content or tag
    Search { query: String },

    /// Toggle a task between done and in-progress
    Toggle { id: String },
    /// Pin or unpin an entry
    Pin { id: String },
    /// Push a task's date one day forward
    Postpone { id: String },
    /// Convert a note into a task
    ToTask { id: String },
    /// Revert a task back into a note
    ToNote { id: String },
    /// Replace an entry's content
    Edit { id: String, content: String },
    /// Delete an entry
    Delete { id: String },

    /// Trigger backend aggregation of the inbox
    Aggregate,
    /// Show the activity dashboard
    Stats,

    /// Weekly report operations
    #[command(subcommand)]
    Report(ReportCommands),

    /// Todo list operations
    #[command(subcommand)]
    Todo(TodoCommands),

    /// AI provider configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Update the cached profile
    Profile {
        username: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the account password
    Password { old: String, new: String },
    /// Dismiss the first-run guide
    CloseGuide,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Generate a weekly summary from the current logs
    Generate,
    /// Save the last generated summary to report history
    Save { title: String },
    /// List saved reports
    List,
    /// Delete a saved report
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum TodoCommands {
    /// Add a todo
    Add {
        content: String,
        #[arg(long, default_value = DEFAULT_TODO_LIST)]
        list: String,
    },
    /// Show todos for a smart or named list (all, today, planned, completed)
    List {
        #[arg(default_value = "all")]
        list: TodoList,
    },
    /// Toggle a todo's completion
    Done { id: String },
    /// Delete a todo
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current AI configuration
    Show,
    /// Update AI configuration fields (resets the verified flag)
    Set {
        /// Provider: gemini, kimi, glm or qwen
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Run a connection check against the configured provider
    Test,
}

fn intensity_glyph(intensity: Intensity) -> char {
    match intensity {
        Intensity::None => '.',
        Intensity::Low => '░',
        Intensity::Medium => '▒',
        Intensity::High => '▓',
        Intensity::Intense => '█',
    }
}

/// One glyph per day, oldest first.
fn heatmap_line(cells: &[HeatmapCell]) -> String {
    cells.iter().map(|c| intensity_glyph(c.intensity)).collect()
}

fn trend_line(day: &TrendDay) -> String {
    format!("{}  {}/{}", day.date.format("%m-%d"), day.completed, day.total)
}

fn status_glyph(log: &LogEntry) -> &'static str {
    match (log.kind, log.status) {
        (LogKind::Task, Some(LogStatus::Done)) => "[x]",
        (LogKind::Task, _) => "[ ]",
        (LogKind::Summary, _) | (LogKind::AiSuggestion, _) => "[*]",
        (LogKind::Note, _) => "[-]",
    }
}

fn print_logs(entries: &[&LogEntry]) {
    if entries.is_empty() {
        println!("(empty)");
        return;
    }
    for log in entries {
        let pin = if log.is_pinned { "📌 " } else { "" };
        let tags = if log.tags.is_empty() {
            String::new()
        } else {
            format!("  #{}", log.tags.join(" #"))
        };
        println!(
            "{} {} {}{}{}  ({})",
            log.timestamp.format("%Y-%m-%d %H:%M"),
            status_glyph(log),
            pin,
            log.content,
            tags,
            log.id.as_str(),
        );
    }
}

pub async fn handle_register(
    session: &Session,
    username: String,
    phone: String,
    password: String,
) -> Result<(), HubError> {
    let user = session.register(&username, &phone, &password).await?;
    println!("Registered {} (id {})", user.username, user.id);
    Ok(())
}

pub async fn handle_login(
    session: &mut Session,
    state: &mut LocalState,
    phone: String,
    password: String,
) -> Result<(), HubError> {
    let user = session.login(&phone, &password).await?;
    println!("Logged in as {}", user.username);
    state.user = Some(user.clone());
    state.config = session.config().clone();
    Ok(())
}

pub fn handle_logout(session: &mut Session, state: &mut LocalState) {
    session.logout();
    state.user = None;
    println!("Logged out");
}

pub async fn handle_add(session: &mut Session, content: String) -> Result<(), HubError> {
    let entry = session.add_log(&content).await?;
    if entry.id.is_local() {
        println!("Saved locally only (backend unreachable): {}", entry.id.as_str());
    } else {
        println!("Saved: {}", entry.id.as_str());
    }
    Ok(())
}

pub async fn handle_inbox(session: &mut Session) -> Result<(), HubError> {
    session.reload_logs().await?;
    print_logs(&views::inbox(session.logs()));
    Ok(())
}

pub async fn handle_board(session: &mut Session, window: TimeWindow) -> Result<(), HubError> {
    session.reload_logs().await?;
    print_logs(&views::main_board(session.logs(), window, chrono::Utc::now()));
    Ok(())
}

pub async fn handle_archive(session: &mut Session) -> Result<(), HubError> {
    session.reload_logs().await?;
    print_logs(&views::archive(session.logs()));
    Ok(())
}

pub async fn handle_search(session: &mut Session, query: String) -> Result<(), HubError> {
    session.reload_logs().await?;
    print_logs(&views::search(session.logs(), &query));
    Ok(())
}

/// Apply a local mutation to one entry, printing its new state.
pub async fn handle_mutation(
    session: &mut Session,
    id: String,
    apply: impl FnOnce(&mut Session, &str) -> bool,
) -> Result<(), HubError> {
    session.reload_logs().await?;
    if !apply(session, &id) {
        return Err(HubError::validation(format!("no such entry or not applicable: {}", id)));
    }
    if let Some(log) = session.logs().iter().find(|l| l.id.as_str() == id) {
        print_logs(&[log]);
    }
    Ok(())
}

pub async fn handle_delete(session: &mut Session, id: String) -> Result<(), HubError> {
    session.reload_logs().await?;
    if session.delete_log(&id).await? {
        println!("Deleted {}", id);
        Ok(())
    } else {
        Err(HubError::validation(format!("no such entry: {}", id)))
    }
}

pub async fn handle_aggregate(session: &mut Session) -> Result<(), HubError> {
    session.reload_logs().await?;
    match session.aggregate_inbox().await? {
        AggregateOutcome::Completed { message } => {
            println!("{}", message.unwrap_or_else(|| "Aggregation completed".to_string()));
        }
        AggregateOutcome::AlreadyRunning => println!("An aggregation is already running"),
        AggregateOutcome::NoUser => println!("Log in first"),
    }
    Ok(())
}

pub async fn handle_stats(session: &mut Session) -> Result<(), HubError> {
    session.reload_logs().await?;
    let now = chrono::Utc::now();
    let logs = session.logs();

    let stats = views::dashboard_stats(logs, now);
    println!(
        "Completed {}  Completion {}%",
        stats.completed, stats.completion_rate
    );

    println!("\nLast 7 days:");
    for day in &stats.last_week {
        println!("  {}  {}", day.date.format("%m-%d"), "#".repeat(day.count));
    }

    println!("\nTask timeline:");
    for row in views::task_timeline(logs) {
        let mark = if row.done { "x" } else { " " };
        println!("  {} [{}] {}", row.start.format("%m-%d"), mark, row.label);
    }

    let heatmap = views::activity_heatmap(logs, now);
    println!("\nActivity (last {} days, oldest first):", heatmap.len());
    for week in heatmap.chunks(7) {
        if let Some(first) = week.first() {
            println!("  {}  {}", first.date.format("%m-%d"), heatmap_line(week));
        }
    }

    println!("\nCompleted vs total (last 7 days):");
    for day in views::weekly_trend(logs, now) {
        println!("  {}", trend_line(&day));
    }

    println!("\nTop tags:");
    for tag in views::tag_insights(logs) {
        println!("  {:>4}  {}", tag.count, tag.name);
    }
    Ok(())
}

pub async fn handle_report(
    session: &mut Session,
    command: ReportCommands,
) -> Result<(), HubError> {
    match command {
        ReportCommands::Generate => {
            session.reload_logs().await?;
            let summary = session.generate_report().await?;
            println!("{}", views::render_plain(&summary));
        }
        ReportCommands::Save { title } => {
            let report = session.save_report(&title).await?;
            println!("Saved report {} (id {})", report.title, report.id);
        }
        ReportCommands::List => {
            for report in session.fetch_reports().await? {
                println!("{:>6}  {}  {}", report.id, report.created_at, report.title);
            }
        }
        ReportCommands::Delete { id } => {
            session.delete_report(id).await?;
            println!("Deleted report {}", id);
        }
    }
    Ok(())
}

pub fn handle_todo(session: &mut Session, command: TodoCommands) -> Result<(), HubError> {
    match command {
        TodoCommands::Add { content, list } => {
            let todo = session.add_todo(&content, &list)?;
            println!("Added to {}: {}", todo.list_name, todo.id);
        }
        TodoCommands::List { list } => {
            let now = chrono::Utc::now();
            for todo in views::filter_todos(session.todos(), &list, now) {
                let mark = if todo.completed { "x" } else { " " };
                println!("[{}] {}  ({})", mark, todo.content, todo.id);
            }
            let counts = views::list_counts(session.todos(), now);
            println!(
                "\nall {}  today {}  planned {}  completed {}",
                counts.all, counts.today, counts.planned, counts.completed
            );
        }
        TodoCommands::Done { id } => {
            if !session.toggle_todo(&id) {
                return Err(HubError::validation(format!("no such todo: {}", id)));
            }
            println!("Toggled {}", id);
        }
        TodoCommands::Delete { id } => {
            if !session.delete_todo(&id) {
                return Err(HubError::validation(format!("no such todo: {}", id)));
            }
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

pub async fn handle_config(
    session: &mut Session,
    command: ConfigCommands,
) -> Result<(), HubError> {
    match command {
        ConfigCommands::Show => {
            let config = session.config();
            let key = if config.api_key.is_empty() { "(unset)" } else { "****" };
            println!(
                "provider {}  model {}  api_key {}  verified {}",
                config.provider.as_str(),
                config.model_name,
                key,
                config.api_key_tested
            );
        }
        ConfigCommands::Set { provider, model, api_key } => {
            let config = session.config_mut();
            if let Some(p) = provider {
                config.provider = match p.as_str() {
                    "gemini" => ModelProvider::Gemini,
                    "kimi" => ModelProvider::Kimi,
                    "glm" => ModelProvider::Glm,
                    "qwen" => ModelProvider::Qwen,
                    other => {
                        return Err(HubError::validation(format!("unknown provider: {}", other)))
                    }
                };
            }
            if let Some(m) = model {
                config.model_name = m;
            }
            if let Some(k) = api_key {
                config.api_key = k;
            }
            // Any edit invalidates the previous connection check.
            config.api_key_tested = false;
            if session.user().is_some() {
                session.save_config().await?;
            }
            println!("Configuration updated (run `hub config test` to verify)");
        }
        ConfigCommands::Test => {
            let message = session.verify_connection().await?;
            println!("{}", message);
        }
    }
    Ok(())
}

// Hub client CLI entrypoint

use std::fs::OpenOptions;
use std::io::LineWriter;
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hub_client::api::HubApi;
use hub_client::cli::{self, Cli, Commands};
use hub_client::config::ClientConfig;
use hub_client::error::HubError;
use hub_client::local_state::LocalState;
use hub_client::session::Session;

/// Custom time formatter: [HH:mm:ss] [hub]
#[derive(Clone)]
struct HubTimer;

impl FormatTime for HubTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        write!(w, "[{}] [hub]", now.format("%H:%M:%S"))
    }
}

fn init_tracing(log_file: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hub_client=info".into());

    let stdout_layer = fmt::layer()
        .with_timer(HubTimer)
        .with_target(false)
        .with_level(false)
        .with_ansi(true)
        .with_writer(std::io::stderr);

    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                // LineWriter flushes after each line so tail -f works
                let (non_blocking, guard) = tracing_appender::non_blocking(LineWriter::new(file));
                tracing_subscriber::registry()
                    .with(filter)
                    .with(stdout_layer)
                    .with(
                        fmt::layer()
                            .with_timer(HubTimer)
                            .with_target(false)
                            .with_level(false)
                            .with_ansi(false)
                            .with_writer(non_blocking),
                    )
                    .init();
                return Some(guard);
            }
            Err(e) => eprintln!("Failed to open log file {}: {}", path, e),
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .init();
    None
}

async fn run(cli: Cli, session: &mut Session, state: &mut LocalState) -> Result<(), HubError> {
    match cli.command {
        Commands::Register { username, phone, password } => {
            cli::handle_register(session, username, phone, password).await
        }
        Commands::Login { phone, password } => {
            cli::handle_login(session, state, phone, password).await
        }
        Commands::Logout => {
            cli::handle_logout(session, state);
            Ok(())
        }
        Commands::Add { content } => cli::handle_add(session, content).await,
        Commands::Inbox => cli::handle_inbox(session).await,
        Commands::Board { window } => cli::handle_board(session, window).await,
        Commands::Archive => cli::handle_archive(session).await,
        Commands::Search { query } => cli::handle_search(session, query).await,
        Commands::Toggle { id } => {
            cli::handle_mutation(session, id, |s, id| s.toggle_status(id)).await
        }
        Commands::Pin { id } => {
            cli::handle_mutation(session, id, |s, id| s.toggle_pinned(id)).await
        }
        Commands::Postpone { id } => {
            cli::handle_mutation(session, id, |s, id| s.postpone(id)).await
        }
        Commands::ToTask { id } => {
            cli::handle_mutation(session, id, |s, id| s.convert_to_task(id)).await
        }
        Commands::ToNote { id } => {
            cli::handle_mutation(session, id, |s, id| s.revert_to_note(id)).await
        }
        Commands::Edit { id, content } => {
            cli::handle_mutation(session, id, move |s, id| s.edit_log(id, &content)).await
        }
        Commands::Delete { id } => cli::handle_delete(session, id).await,
        Commands::Aggregate => cli::handle_aggregate(session).await,
        Commands::Stats => cli::handle_stats(session).await,
        Commands::Report(command) => cli::handle_report(session, command).await,
        Commands::Todo(command) => cli::handle_todo(session, command),
        Commands::Config(command) => cli::handle_config(session, command).await,
        Commands::Profile { username, email } => {
            session.update_profile(&username, email.as_deref()).await?;
            if let Some(user) = session.user() {
                state.user = Some(user.clone());
            }
            println!("Profile updated");
            Ok(())
        }
        Commands::Password { old, new } => {
            session.change_password(&old, &new).await?;
            println!("Password changed");
            Ok(())
        }
        Commands::CloseGuide => {
            state.has_closed_guide = true;
            println!("Guide dismissed");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();

    let _guard = init_tracing(config.log_file.as_deref());
    if let Err(e) = config.validate() {
        tracing::error!("Configuration error: {}", e);
    }

    let state_path = match &config.state_file {
        Some(path) => PathBuf::from(path),
        None => match LocalState::default_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
    };
    let mut state = match LocalState::load(&state_path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if !matches!(cli.command, Commands::CloseGuide) {
        if let Some(hint) = cli::guide_hint(&state) {
            println!("{}\n", hint);
        }
    }

    let base_url = cli
        .api_url
        .clone()
        .unwrap_or_else(|| config.api_base_url.clone());
    let api = HubApi::new(base_url);
    let mut session = Session::resume(
        api,
        state.user.clone(),
        state.config.clone(),
        state.todos.clone(),
    );

    let result = run(cli, &mut session, &mut state).await;

    // Persist client-local state regardless of the command's outcome.
    state.config = session.config().clone();
    state.todos = session.todos().to_vec();
    if let Err(e) = state.save(&state_path) {
        tracing::warn!("Failed to persist local state: {}", e);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

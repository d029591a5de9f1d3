mod command;
mod helper;
mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use compass_application::session::REPORT_MIN_TURNS;
use compass_application::{RejectReason, SendOutcome, SessionController, View};
use compass_infrastructure::storage::ConfigStorage;
use compass_infrastructure::{CompassPaths, FileKeyValueStore, KvHistoryRepository};
use compass_interaction::ClaudeApiGateway;

use command::Command;
use helper::CliHelper;

/// Routes log output to a daily file so it never interleaves with the dialogue.
///
/// Filter comes from `COMPASS_LOG` (default `info`). Returns `None` when the
/// logs directory is unavailable; the REPL then runs without logging.
fn init_tracing() -> Option<WorkerGuard> {
    let logs_dir = CompassPaths::logs_dir().ok()?;
    std::fs::create_dir_all(&logs_dir).ok()?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("compass")
        .filename_suffix("log")
        .build(&logs_dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("COMPASS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}

async fn build_controller() -> Result<SessionController> {
    let config_path = CompassPaths::config_file().context("Failed to resolve config path")?;
    let config = ConfigStorage::new(config_path.clone())
        .load_or_default()
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let gateway = ClaudeApiGateway::try_from_env(&config)?;
    tracing::info!("[Startup] Using model {}", gateway.model());

    let store = match &config.data_dir {
        Some(dir) => FileKeyValueStore::new(dir),
        None => FileKeyValueStore::default_location()?,
    };
    tracing::info!("[Startup] History store at {}", store.base_dir().display());
    let repository = Arc::new(KvHistoryRepository::new(Arc::new(store)));

    let controller = SessionController::new(config, Arc::new(gateway), repository);
    controller.restore_history().await;
    Ok(controller)
}

/// Handles one line of input. Returns `false` when the REPL should exit.
async fn dispatch(controller: &SessionController, command: Command) -> bool {
    match command {
        Command::Quit => return false,
        Command::Help => render::help(),
        Command::Home => {
            controller.show_welcome().await;
            render::welcome();
        }
        Command::Start => {
            controller.start_session().await;
            let snapshot = controller.snapshot().await;
            render::phase_banner(snapshot.phase);
            if let Some(greeting) = snapshot.turns.first() {
                render::turn(greeting);
            }
        }
        Command::Status => render::status(&controller.snapshot().await),
        Command::Insight => render::insight(&controller.insight().await),
        Command::History => {
            controller.show_history().await;
            let trend = controller.growth_trend().await;
            render::history(&controller.sessions().await, trend.as_ref());
        }
        Command::Report => generate_report(controller).await,
        Command::Unknown(name) => {
            println!("{}", format!("Unknown command: {} (try /help)", name).bright_black());
        }
        Command::Message(text) => send(controller, &text).await,
    }
    true
}

async fn send(controller: &SessionController, text: &str) {
    let phase_before = controller.phase().await;
    println!("{}", "COMPASS is thinking...".bright_black());

    match controller.send(text).await {
        SendOutcome::Replied {
            turn_count, phase, ..
        } => {
            if let Some(reply) = controller.turns().await.last() {
                render::turn(reply);
            }
            if phase != phase_before {
                render::phase_banner(phase);
            }
            if turn_count == REPORT_MIN_TURNS {
                println!("{}", "Your report is ready to generate: /report".bright_green());
            }
        }
        SendOutcome::Fallback { error } => {
            if let Some(reply) = controller.turns().await.last() {
                render::turn(reply);
            }
            println!("{}", format!("({})", error).bright_black());
        }
        SendOutcome::Rejected(RejectReason::NoActiveSession) => {
            println!("{}", "No active session. Type /start to begin.".yellow());
        }
        SendOutcome::Rejected(RejectReason::SessionComplete) => {
            println!(
                "{}",
                "This session is complete. Type /start for a new one.".yellow()
            );
        }
        SendOutcome::Rejected(RejectReason::InFlight) => {
            println!("{}", "Still waiting for the previous reply.".yellow());
        }
        SendOutcome::Rejected(RejectReason::Empty) | SendOutcome::Discarded => {}
    }
}

async fn generate_report(controller: &SessionController) {
    if let Some(report) = controller.report().await {
        println!(
            "{}",
            "This session already has its report. Type /start for a new one.".yellow()
        );
        render::report(&report);
        return;
    }
    if !controller.can_generate_report().await {
        let remaining = controller.turns_until_report().await;
        println!(
            "{}",
            format!("The report unlocks after {} more turn(s).", remaining).yellow()
        );
        return;
    }

    println!("{}", "Analysing your whole conversation...".bright_black());
    match controller.generate_report().await {
        Ok(report) => {
            if controller.view().await == View::Report {
                render::report(&report);
            }
        }
        Err(err) => {
            eprintln!("{}", format!("Report generation failed: {}", err).red());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = init_tracing();

    let controller = build_controller().await?;

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    render::welcome();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                if !dispatch(&controller, Command::parse(&line)).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    controller.settle_background_tasks().await;
    tracing::info!("[Shutdown] Exiting");
    Ok(())
}

//! Top-level CLI definition and session wiring.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use clap::Parser;
use colored::{Colorize, control};
use crossbeam_channel::Receiver;
use thiserror::Error;

use joint_dashboard::core::config::{Config, HookPolicy};
use joint_dashboard::core::errors::JdError;
use joint_dashboard::core::parameter::{ParameterList, ParameterSpec};
use joint_dashboard::logger::jsonl::{JsonlConfig, JsonlWriter, LogEntry};
use joint_dashboard::tui::hook::{ChannelHook, MutationHook, ValueUpdate};
use joint_dashboard::tui::runtime::{Dashboard, SessionSummary, run_dashboard};

/// Interactive terminal panel for nudging bounded joint parameters.
#[derive(Debug, Parser)]
#[command(
    name = "jdash",
    author,
    version,
    about = "Joint Dashboard - interactive parameter panel",
    long_about = None
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// TOML file with `[[parameter]]` tables (name, min, max, value).
    #[arg(long, value_name = "PATH")]
    params: Option<PathBuf>,
    /// Disable colored output in the exit summary.
    #[arg(long)]
    no_color: bool,
    /// Step applied by one left/right key press.
    #[arg(long, value_name = "STEP")]
    increment: Option<f64>,
    /// Rows shown above and below the selection.
    #[arg(long, value_name = "N")]
    flankers: Option<usize>,
    /// Where value changes are recorded.
    #[arg(long, value_name = "PATH", conflicts_with = "no_activity_log")]
    activity_log: Option<PathBuf>,
    /// Do not write an activity log.
    #[arg(long)]
    no_activity_log: bool,
    /// What to do when delivering a change fails: continue or abort.
    #[arg(long, value_name = "POLICY")]
    on_error: Option<HookPolicy>,
}

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Failure reported by the dashboard library.
    #[error("{0}")]
    Dashboard(#[from] JdError),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) => 2,
            Self::Dashboard(err) => match err.code().as_bytes().get(3) {
                Some(b'1') => 1,
                Some(b'2') => 3,
                _ => 2,
            },
        }
    }
}

/// Load configuration and parameters, then run one interactive session.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    let config = load_config(cli)?;
    let params = match &cli.params {
        Some(path) => ParameterList::load(path)?,
        None => demo_parameters()?,
    };

    if !io::stdout().is_terminal() || !io::stdin().is_terminal() {
        return Err(CliError::User(
            "jdash needs an interactive terminal on stdin and stdout".to_string(),
        ));
    }

    let mut log = if cli.no_activity_log {
        JsonlWriter::discard()
    } else {
        JsonlWriter::open(JsonlConfig::at(&config.hook.activity_log))
    };
    log.write_entry(&LogEntry::session_start(params.len()));
    log.flush();
    // Fallback output must not land on the panel.
    log.hold_stderr();

    let (channel, rx) = ChannelHook::bounded(config.hook.channel_capacity);
    let dispatcher = spawn_dispatcher(rx, log, Duration::from_millis(config.hook.delay_ms))?;

    let mut failures = Vec::new();
    let (outcome, summary) = {
        let mut channel = channel;
        let hook = |name: &str, value: f64| {
            channel.on_change(name, value).inspect_err(|err| {
                failures.push(LogEntry::hook_failure(Some(name), err));
            })
        };
        let mut dashboard = Dashboard::new(params, &config.dashboard, config.hook.on_error, hook);
        let outcome = run_dashboard(&mut dashboard);
        (outcome, dashboard.summary())
    };

    // The sender was dropped with the session, so the dispatcher drains and exits.
    let mut log = dispatcher
        .join()
        .map_err(|_| CliError::Runtime("activity dispatcher thread panicked".to_string()))?;
    for entry in &failures {
        log.write_entry(entry);
    }
    log.write_entry(&LogEntry::session_stop(
        summary.events_processed,
        summary.hook_calls,
        summary.hook_failures,
    ));
    log.flush();
    log.release_stderr();

    print_summary(&summary);
    outcome.map(|_| ()).map_err(CliError::from)
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(increment) = cli.increment {
        config.dashboard.increment = increment;
    }
    if let Some(flankers) = cli.flankers {
        config.dashboard.flanker_count = flankers;
    }
    if let Some(path) = &cli.activity_log {
        config.hook.activity_log.clone_from(path);
    }
    if let Some(policy) = cli.on_error {
        config.hook.on_error = policy;
    }
    config.validate()?;
    Ok(config)
}

/// Joints shown when no parameter file is given.
fn demo_parameters() -> Result<ParameterList, JdError> {
    const DEMO: &[(&str, f64, f64, f64)] = &[
        ("heads", 0.0, 1.0, 0.5),
        ("shoulders", 0.0, 1.0, 0.75),
        ("knees", 0.0, 3.0, 0.75),
        ("and", 1.0, 2.0, 1.5),
        ("toes", 1.0, 2.0, 1.5),
        ("eyes", 1.0, 2.0, 1.5),
        ("ears", 1.0, 2.0, 1.5),
        ("mouth", 1.0, 2.0, 1.5),
        ("and", 1.0, 2.0, 1.5),
        ("nose", 1.0, 2.0, 1.5),
    ];
    ParameterList::from_specs(
        DEMO.iter()
            .map(|&(name, min, max, value)| ParameterSpec::new(name, min, max, value)),
    )
}

/// Consume queued changes off the UI thread: log each one, then pause to
/// rate-limit downstream consumers. Returns the writer once the queue closes.
fn spawn_dispatcher(
    rx: Receiver<ValueUpdate>,
    mut log: JsonlWriter,
    delay: Duration,
) -> Result<JoinHandle<JsonlWriter>, CliError> {
    thread::Builder::new()
        .name("jdash-dispatch".to_string())
        .spawn(move || {
            for update in rx {
                log.write_entry(&LogEntry::value_change(update.seq, &update.name, update.value));
                log.flush();
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
            log
        })
        .map_err(|e| CliError::Runtime(format!("[JD-HOOK] failed to start dispatcher: {e}")))
}

fn print_summary(summary: &SessionSummary) {
    println!("{}", "Final values:".bold());
    for param in &summary.params {
        let (min, max) = param.bounds();
        println!(
            "  {:<12} {}  [{min} .. {max}]",
            param.name(),
            param.value().to_string().green(),
        );
    }
    let failures = if summary.hook_failures > 0 {
        summary.hook_failures.to_string().red().bold()
    } else {
        summary.hook_failures.to_string().normal()
    };
    println!(
        "Changes delivered: {}, failed: {failures}, events: {}",
        summary.hook_calls.saturating_sub(summary.hook_failures),
        summary.events_processed,
    );
}

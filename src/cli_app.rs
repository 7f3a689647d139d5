//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use qtop::columns::plancache;
use qtop::core::config::{Config, MAX_REFRESH_MS, MIN_REFRESH_MS};
use qtop::core::errors::QtopError;
use qtop::listview::QueryList;
use qtop::logger::JsonlWriter;
use qtop::snapshot::source::JsonFileSource;
use qtop::tui::input::HELP_BINDINGS;
use qtop::tui::theme::Theme;
use qtop::tui::{DashboardRuntimeConfig, run_dashboard};

/// qtop: live top-style view of a database query plan cache.
#[derive(Debug, Parser)]
#[command(
    name = "qtop",
    author,
    version,
    about = "Live top-style view of a database query plan cache",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Live dashboard over the plan-cache snapshot file.
    Dashboard(DashboardArgs),
    /// Print the sort-key and navigation legend.
    Keys,
    /// Print the effective configuration.
    Config,
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct DashboardArgs {
    /// Snapshot file to watch (overrides `source.snapshot_file`).
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,
    /// Refresh interval in milliseconds.
    #[arg(long, value_name = "MS")]
    refresh_ms: Option<u64>,
    /// Initial sort column id (e.g. `exec_time`).
    #[arg(long, value_name = "COLUMN")]
    sort: Option<String>,
    /// Keep focus where it is when new rows arrive.
    #[arg(long)]
    no_follow: bool,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input or configuration.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

impl From<QtopError> for CliError {
    fn from(err: QtopError) -> Self {
        match err {
            QtopError::InvalidConfig { .. }
            | QtopError::MissingConfig { .. }
            | QtopError::ConfigParse { .. } => Self::User(err.to_string()),
            _ if err.is_contract_violation() => Self::User(err.to_string()),
            _ => Self::Runtime(err.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Dashboard(args) => run_dashboard_command(cli, args),
        Command::Keys => run_keys(cli),
        Command::Config => run_config(cli),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

// ──────────────────── dashboard ────────────────────

fn run_dashboard_command(cli: &Cli, args: &DashboardArgs) -> Result<(), CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &args.snapshot {
        config.source.snapshot_file.clone_from(path);
    }
    if let Some(ms) = args.refresh_ms {
        if !(MIN_REFRESH_MS..=MAX_REFRESH_MS).contains(&ms) {
            return Err(CliError::User(format!(
                "--refresh-ms must be in [{MIN_REFRESH_MS}, {MAX_REFRESH_MS}], got {ms}"
            )));
        }
        config.dashboard.refresh_ms = ms;
    }

    let mut list = QueryList::new(plancache::default_columns()?)
        .with_follow_bottom(config.dashboard.follow_bottom && !args.no_follow);
    if let Some(column) = args.sort.as_deref().or(config.dashboard.default_sort.as_deref()) {
        list = list.with_sort_column(column)?;
    }

    let runtime = DashboardRuntimeConfig {
        refresh: Duration::from_millis(config.dashboard.refresh_ms),
        theme: Theme::resolve(cli.no_color || config.dashboard.no_color),
        config_hash: config.stable_hash().ok(),
    };
    let source = JsonFileSource::new(&config.source.snapshot_file);
    let log = JsonlWriter::from_config(&config.logging);

    run_dashboard(list, Box::new(source), log, &runtime)?;
    Ok(())
}

// ──────────────────── keys ────────────────────

fn run_keys(cli: &Cli) -> Result<(), CliError> {
    let columns = plancache::default_columns()?;
    let default_sort = columns.default_sort().clone();

    match output_mode(cli) {
        OutputMode::Human => {
            println!("{}", "Sort keys".bold());
            for column in columns.columns() {
                let marker = if column.id == default_sort {
                    " (default)"
                } else {
                    ""
                };
                println!(
                    "  {}  {}{marker}",
                    column.sort_key.to_string().cyan().bold(),
                    column.title
                );
            }
            println!();
            println!("{}", "Navigation".bold());
            for binding in &HELP_BINDINGS {
                println!("  {:<12} {}", binding.keys, binding.description);
            }
        }
        OutputMode::Json => {
            let sort_keys: Vec<Value> = columns
                .columns()
                .iter()
                .map(|column| {
                    json!({
                        "key": column.sort_key.to_string(),
                        "column": column.id.as_str(),
                        "title": column.title,
                        "default": column.id == default_sort,
                    })
                })
                .collect();
            let payload = json!({
                "command": "keys",
                "sort_keys": sort_keys,
                "bindings": HELP_BINDINGS,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────── config ────────────────────

fn run_config(cli: &Cli) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let path = config.config_file.clone();

    match output_mode(cli) {
        OutputMode::Human => {
            let toml_str = config.to_toml()?;
            println!("# {}", path.display());
            println!("{toml_str}");
        }
        OutputMode::Json => {
            let value = serde_json::to_value(&config)?;
            let payload = json!({
                "command": "config",
                "path": path.to_string_lossy(),
                "config_hash": config.stable_hash()?,
                "config": value,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────── output ────────────────────

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("QTOP_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode.map(str::to_ascii_lowercase).as_deref() {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        Some("auto") | None => fallback,
        Some(_) => fallback,
    }
}

//! Top-level CLI definition and dispatch.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell as CompletionShell, generate};

use vigil::core::config::{self, Config};
use vigil::core::errors::Result;
use vigil::logger::EventLog;
use vigil::watch;

/// vigil — periodically re-run a shell command and page through its output.
#[derive(Debug, Parser)]
#[command(
    name = "vigil",
    version,
    about = "Scrollable watch: re-run a command and page through its output",
    long_about = None,
    after_help = "While running press F1 or '?' for help.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Refresh interval in seconds (1-60).
    #[arg(short = 'n', long, value_name = "SECONDS")]
    interval: Option<u64>,
    /// Command timeout in seconds (1-60).
    #[arg(short = 't', long, value_name = "SECONDS")]
    timeout: Option<u64>,
    /// Capture buffer size in bytes; k/m/g suffixes accepted.
    #[arg(short = 'b', long, value_name = "SIZE")]
    buffer_size: Option<String>,
    /// Show line numbers in a left gutter.
    #[arg(short = 'l', long)]
    line_numbers: bool,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Append JSONL session events to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Generate shell completions and exit.
    #[arg(long, value_name = "SHELL")]
    completions: Option<CompletionShell>,
    /// The command to watch, run through the shell each interval.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present = "completions"
    )]
    command: Vec<String>,
}

/// Dispatch the parsed command line.
pub fn run(cli: &Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "vigil", &mut io::stdout());
        return Ok(());
    }

    let cfg = resolve_config(cli)?;
    let mut log = cfg
        .log_file
        .as_deref()
        .map_or_else(EventLog::disabled, EventLog::open);
    watch::run(&cfg, &mut log)
}

/// Merge defaults, config file, environment, and flags; validate once.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut cfg = Config::load(cli.config.as_deref())?;
    cfg.apply_env()?;

    if let Some(v) = cli.interval {
        cfg.interval_secs = v;
    }
    if let Some(v) = cli.timeout {
        cfg.timeout_secs = v;
    }
    if let Some(raw) = &cli.buffer_size {
        cfg.buffer_size = config::parse_buffer_size(raw)?;
    }
    if cli.line_numbers {
        cfg.show_lineno = true;
    }
    if let Some(path) = &cli.log_file {
        cfg.log_file = Some(path.clone());
    }
    cfg.command = cli.command.join(" ");

    cfg.validate()?;
    Ok(cfg)
}

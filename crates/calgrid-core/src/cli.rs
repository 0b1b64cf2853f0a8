use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "calgrid",
    version,
    about = "Scrollable calendar grids in the terminal",
    arg_required_else_help = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Path to a calgrid.toml overriding the default lookup.
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render the month grid containing DATE (default: today).
    Month {
        date: Option<String>,
        /// Pad the grid to exactly six weeks.
        #[arg(long = "six-weeks")]
        six_weeks: bool,
    },
    /// Render the display week containing DATE (default: today).
    Week { date: Option<String> },
    /// Print the normalized day payload for DATE as JSON.
    Info { date: String },
    /// Print the timeline window of period anchors around DATE.
    Window {
        date: Option<String>,
        #[arg(long, default_value_t = 50)]
        past: usize,
        #[arg(long, default_value_t = 50)]
        future: usize,
        #[arg(long, value_enum, default_value = "month")]
        unit: UnitArg,
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitArg {
    Month,
    Week,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

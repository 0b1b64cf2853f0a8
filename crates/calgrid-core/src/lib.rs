pub mod algebra;
pub mod cli;
pub mod commands;
pub mod config;
pub mod date;
pub mod grid;
pub mod locale;
pub mod render;
pub mod sync;
pub mod window;

use std::ffi::OsString;

use clap::Parser;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting calgrid CLI"
    );

    let cfg = config::Config::load(cli.config.as_deref())?;
    debug!(first_day = cfg.first_day, "configuration resolved");

    let mut renderer = render::Renderer::new(&cfg)?;
    commands::dispatch(&cfg, &mut renderer, cli.command)?;

    info!("done");
    Ok(())
}

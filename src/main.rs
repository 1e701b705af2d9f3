//! Entry point for `envtpl`, the single-file renderer.

use anyhow::Result;
use clap::Parser;
use envtpl::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::RenderCli::parse();
    logging::init_subscriber(args.verbose);

    commands::render::run(&args)
}

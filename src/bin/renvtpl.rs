//! Entry point for `renvtpl`, the recursive directory renderer.

use anyhow::Result;
use clap::Parser;
use envtpl::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::TreeCli::parse();
    logging::init_subscriber(args.verbose);

    commands::tree::run(&args)
}

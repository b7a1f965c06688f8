//! Confab command-line tool
//!
//! Builds a configuration from files, environment variables and defaults and
//! prints it as JSON or YAML.

use anyhow::Result;
use clap::Parser;
use confab::cli::{Cli, Command};
use confab::logging::{self, LogTarget};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;
    debug!(version = env!("CARGO_PKG_VERSION"), "confab starting");

    let output = match &cli.command {
        Command::Build(args) => args.execute()?,
        Command::Discover(args) => args.execute(),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

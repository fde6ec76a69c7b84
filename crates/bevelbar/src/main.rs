#![forbid(unsafe_code)]

use bevelbar::{Cli, logging};
use bevelbar_core::error::BarResult;
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("bevelbar: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> BarResult<()> {
    logging::init(cli.log_level.as_deref())?;
    let config = cli.into_config()?;
    bevelbar::run(config)
}

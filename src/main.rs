use std::process::ExitCode;

use clap::Parser;

use zxdraw::cli::{self, CliArgs};
use zxdraw::{log_info, logger};

fn main() -> ExitCode {
    // Initialize session log (overwrites previous session log)
    logger::init();

    let args = CliArgs::parse();
    log_info!("ZXDraw {} started", env!("CARGO_PKG_VERSION"));
    cli::run(args)
}

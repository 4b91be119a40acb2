// Arancel predictor - main.rs
// Parses the CLI, installs logging, and hands off to the dispatcher.

use std::process::exit;

use arancel_predictor::cli::{dispatch, Cli};
use clap::Parser;
use tracing::Level;

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(e) = dispatch(cli) {
        if e.is_startup() {
            tracing::error!("Startup failed: {e}");
        } else {
            tracing::error!("{e}");
        }
        exit(1);
    }
}

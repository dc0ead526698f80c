//! shimpack CLI - post-build finisher for SWIG Python extensions

use std::io::IsTerminal;

use clap::Parser;
use shimpack::util::diagnostic;
use shimpack::PackageError;
use tracing_subscriber::EnvFilter;

mod cli;
mod finish;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("shimpack=debug")
    } else {
        EnvFilter::new("shimpack=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = finish::execute(cli, color) {
        if let Some(err) = e.downcast_ref::<PackageError>() {
            diagnostic::emit(&err.to_diagnostic(), color);
            std::process::exit(err.exit_code());
        }
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

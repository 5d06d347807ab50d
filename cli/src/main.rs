//! hrefkit command-line entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use hrefkit::cli::Cli;

fn main() -> ExitCode {
    // Parse before logging so --help works without logs
    let cli = Cli::parse();
    hrefkit_core::init_logging_with_level(cli.log_level());
    tracing::debug!(?cli, "CLI arguments parsed");

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    match hrefkit::run(&cli, &mut stdin, &mut stdout) {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            eprintln!("hrefkit error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

//! `bootstrap` binary entry point.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use dotfiles_bootstrap::cli::{Cli, Command};
use dotfiles_bootstrap::commands;
use dotfiles_bootstrap::logging::{Logger, init_subscriber};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let command = args.command_or_default();
    if command == Command::Version {
        commands::version::run();
        return ExitCode::SUCCESS;
    }

    init_subscriber(args.verbose, "install");
    let log = Arc::new(Logger::new("install"));

    match commands::install::run(&args.global, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

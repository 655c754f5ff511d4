//! Command-line definitions.
use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfiles bootstrap.
#[derive(Parser, Debug)]
#[command(
    name = "bootstrap",
    about = "Link dotfiles packages into your home directory with GNU Stow",
    version
)]
pub struct Cli {
    /// Subcommand to run; defaults to `install`.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override dotfiles root directory
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Install dependencies, back up conflicts, link packages and run hooks
    Install,
    /// Print version information
    Version,
}

impl Cli {
    /// The subcommand to run, with `install` as the default.
    #[must_use]
    pub fn command_or_default(&self) -> Command {
        self.command.unwrap_or(Command::Install)
    }
}

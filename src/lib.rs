//! Dotfiles bootstrap.
//!
//! Prepares a macOS or Linux machine for a stow-managed dotfiles repository:
//! checks and installs prerequisites, moves conflicting plain files into a
//! timestamped backup directory, restows every package into the home
//! directory and runs the one-time shell-framework and plugin-manager hooks.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: load and validate `bootstrap.toml`
//! - **[`resources`]**: idempotent `check + apply` primitives (packages, backups, stow)
//! - **[`tasks`]**: named, ordered stages wired to resources
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;

//! Domain-specific error types for the bootstrap workflow.
//!
//! Internal modules return typed errors wrapped in [`anyhow::Error`] so that
//! context can be layered on with `.context(...)`. The single top-level
//! handler in `main` prints the chain and exits non-zero; callers that need to
//! distinguish failure kinds use [`anyhow::Error::downcast_ref`].
//!
//! # Error hierarchy
//!
//! ```text
//! ExecError: external command could not be found, spawned, or failed
//! BootstrapError: a prerequisite is missing and cannot be installed
//! ConfigError: bootstrap.toml could not be read, parsed, or validated
//! ```

use thiserror::Error;

/// Errors from invoking an external command.
///
/// Separates "the tool is not installed" from "the tool ran and returned
/// failure" so the top-level handler can report an actionable message.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The program could not be found on `PATH`.
    #[error("command not found: {program}")]
    NotFound {
        /// Name of the missing program.
        program: String,
    },

    /// The program was started but exited non-zero.
    #[error("{label} failed (exit {code}): {stderr}")]
    Failed {
        /// Human-readable command label (program name, optionally with directory).
        label: String,
        /// Exit code, or `-1` when terminated by a signal.
        code: i32,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The program could not be spawned for a reason other than "not found".
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Name of the program.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Fatal prerequisite errors: a required tool is absent and no install path exists.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// A required tool is missing and will not be installed automatically.
    #[error("required tool '{tool}' is not installed: {hint}")]
    MissingPrerequisite {
        /// Name of the missing tool.
        tool: String,
        /// What the user should do about it.
        hint: String,
    },

    /// The host platform has no supported package manager backend.
    #[error("unsupported platform '{os}': install packages manually")]
    UnsupportedPlatform {
        /// OS identifier string that was not recognised.
        os: String,
    },

    /// Linux host with neither apt nor pacman available.
    #[error("no supported package manager found (apt, pacman): please install '{package}' manually")]
    NoPackageManager {
        /// Package that could not be installed.
        package: String,
    },
}

/// Errors from loading `bootstrap.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or does not match the schema.
    #[error("invalid TOML in {path}: {message}")]
    Parse {
        /// Path to the offending file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// A value parsed but is not acceptable (e.g. absolute conflict path).
    #[error("invalid configuration value for {field}: {message}")]
    Invalid {
        /// Config key that failed validation.
        field: String,
        /// Why the value was rejected.
        message: String,
    },
}

//! External command execution.
//!
//! Every process the bootstrap spawns goes through the [`Executor`] trait so
//! tasks can be exercised against a fake system in tests. All calls are
//! synchronous: they block until the child exits.
use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::ExecError;

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over process spawning and `PATH` lookup.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command, failing with [`ExecError::Failed`] on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::NotFound`] if the program is not installed,
    /// [`ExecError::Spawn`] for other spawn failures and
    /// [`ExecError::Failed`] if the command exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with `dir` as its working directory.
    ///
    /// # Errors
    ///
    /// Same as [`Executor::run`].
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command in `dir` with extra environment variables.
    ///
    /// # Errors
    ///
    /// Same as [`Executor::run`].
    fn run_in_with_env(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult>;

    /// Whether `program` resolves on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

/// Spawn `cmd`, mapping a missing binary to [`ExecError::NotFound`].
fn spawn(mut cmd: Command, program: &str) -> Result<ExecResult> {
    let output = cmd.output().map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ExecError::NotFound {
                program: program.to_string(),
            }
        } else {
            ExecError::Spawn {
                program: program.to_string(),
                source,
            }
        }
    })?;
    Ok(ExecResult::from(output))
}

/// Spawn `cmd` and bail with [`ExecError::Failed`] on non-zero exit.
fn execute_checked(cmd: Command, program: &str, label: &str) -> Result<ExecResult> {
    let result = spawn(cmd, program)?;
    if !result.success {
        return Err(ExecError::Failed {
            label: label.to_string(),
            code: result.code.unwrap_or(-1),
            stderr: result.stderr.trim().to_string(),
        }
        .into());
    }
    Ok(result)
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_checked(cmd, program, program)
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        execute_checked(cmd, program, &format!("{program} in {}", dir.display()))
    }

    fn run_in_with_env(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        for (k, v) in env {
            cmd.env(k, v);
        }
        execute_checked(cmd, program, &format!("{program} in {}", dir.display()))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn run_echo() {
        let result = SystemExecutor.run("echo", &["hello"]).unwrap();
        assert!(result.success, "echo command should succeed");
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn run_failure_is_typed() {
        let err = SystemExecutor.run("false", &[]).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<ExecError>(),
                Some(ExecError::Failed { code: 1, .. })
            ),
            "expected ExecError::Failed, got {err:#}"
        );
    }

    #[test]
    fn run_missing_program_is_not_found() {
        let err = SystemExecutor
            .run("this-program-does-not-exist-12345", &[])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExecError>(),
            Some(ExecError::NotFound { .. })
        ));
    }

    #[test]
    fn run_in_uses_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemExecutor.run_in(dir.path(), "pwd", &[]).unwrap();
        let reported = std::fs::canonicalize(result.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn run_in_with_env_passes_variables() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemExecutor
            .run_in_with_env(
                dir.path(),
                "sh",
                &["-c", "printf %s \"$RUNZSH\""],
                &[("RUNZSH", "no")],
            )
            .unwrap();
        assert_eq!(result.stdout, "no");
    }

    #[test]
    fn which_finds_known_program() {
        assert!(SystemExecutor.which("sh"), "sh should be found on Unix");
    }

    #[test]
    fn which_missing_program() {
        assert!(
            !SystemExecutor.which("this-program-does-not-exist-12345"),
            "non-existent program should not be found"
        );
    }
}

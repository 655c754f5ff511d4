//! Named, ordered tasks that orchestrate resource changes.
pub mod backup;
mod context;
pub mod dependencies;
pub mod hooks;
pub mod link;
pub mod packages;
pub mod platform;
mod processing;

pub use context::{BACKUP_TIMESTAMP_FORMAT, Context};
pub use processing::{ProcessOpts, TaskStats, apply_resources, process_resources};

use anyhow::Result;

use crate::logging::TaskStatus;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("already installed".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task had nothing to do.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// A named, executable stage of the install workflow.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the current run.
    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails to execute, such as when a system
    /// command exits non-zero, a file cannot be moved, or a prerequisite is
    /// missing.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The install workflow, in execution order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(dependencies::CheckDependencies),
        Box::new(platform::DetectPlatform),
        Box::new(packages::InstallSystemPackages),
        Box::new(backup::BackupConflicts),
        Box::new(link::LinkPackages),
        Box::new(hooks::InstallShellFramework),
        Box::new(hooks::InstallPluginManager),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error after recording it as failed. Callers stop the
/// workflow on the first error.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            Ok(())
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e)
        }
    }
}

/// Run `tasks` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the error of the first failing task; later tasks are not run.
pub fn run_all(tasks: &[Box<dyn Task>], ctx: &Context) -> Result<()> {
    for task in tasks {
        execute(task.as_ref(), ctx)?;
    }
    Ok(())
}

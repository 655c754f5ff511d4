//! Prerequisite check for git and stow.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::error::BootstrapError;
use crate::resources::package::PackageResource;

/// Make sure the tools the workflow itself needs are present.
///
/// `git` is required and never installed automatically. `stow` is installed
/// through the platform package manager when it is missing.
#[derive(Debug)]
pub struct CheckDependencies;

impl Task for CheckDependencies {
    fn name(&self) -> &str {
        "Check dependencies"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if !ctx.executor.which("git") {
            return Err(BootstrapError::MissingPrerequisite {
                tool: "git".to_string(),
                hint: "install git with your system package manager, then re-run".to_string(),
            }
            .into());
        }
        ctx.log.debug("git found");

        let stow = PackageResource::new(
            "stow".to_string(),
            "stow".to_string(),
            &ctx.platform,
            &*ctx.executor,
            &ctx.package_index,
        );
        let stats = process_resources(ctx, std::iter::once(stow), &ProcessOpts::apply_all("install"))?;
        Ok(stats.finish(ctx))
    }
}

//! System package stage.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::package::PackageResource;

/// Install the configured system packages whose command is not on `PATH`.
#[derive(Debug)]
pub struct InstallSystemPackages;

impl Task for InstallSystemPackages {
    fn name(&self) -> &str {
        "Install packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.system_packages.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let packages = &ctx.config.system_packages;
        ctx.log
            .debug(&format!("{} system packages to check", packages.len()));

        let resources = packages.iter().map(|pkg| {
            PackageResource::new(
                pkg.name.clone(),
                pkg.command.clone(),
                &ctx.platform,
                &*ctx.executor,
                &ctx.package_index,
            )
        });
        let stats = process_resources(ctx, resources, &ProcessOpts::apply_all("install"))?;
        Ok(stats.finish(ctx))
    }
}

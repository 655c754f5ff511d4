//! Stow every package into home.
use anyhow::Result;

use super::{Context, Task, TaskResult, apply_resources};
use crate::resources::Applicable as _;
use crate::resources::stow::StowPackage;

/// Restow a single package into home, honouring dry-run.
///
/// # Errors
///
/// Returns an error if stow fails.
pub fn restow(ctx: &Context, package: &str) -> Result<()> {
    let resource = StowPackage::new(package, &ctx.config.stow_dir, &ctx.home, &*ctx.executor);
    if ctx.dry_run {
        ctx.log
            .dry_run(&format!("would restow: {}", resource.description()));
        return Ok(());
    }
    resource.apply()?;
    ctx.log.debug(&format!("restowed {package}"));
    Ok(())
}

/// Link every configured package into home with `stow --restow`, in order.
///
/// The first failing package aborts the stage; later packages are not
/// attempted.
#[derive(Debug)]
pub struct LinkPackages;

impl Task for LinkPackages {
    fn name(&self) -> &str {
        "Link dotfiles"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.packages.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resources = ctx
            .config
            .packages
            .iter()
            .map(|name| StowPackage::new(name, &ctx.config.stow_dir, &ctx.home, &*ctx.executor));
        let stats = apply_resources(ctx, resources, "restow")?;
        Ok(stats.finish(ctx))
    }
}

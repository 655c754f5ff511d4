//! One-time post-install hooks: the shell framework and the multiplexer
//! plugin manager.
use anyhow::{Context as _, Result};
use std::io::Write as _;

use super::link::restow;
use super::{Context, Task, TaskResult};
use crate::resources::helpers::fs::{ensure_parent_dir, remove_existing};

/// Install the shell framework once, then put the managed shell config back.
///
/// The framework installer writes its own config file over whatever is in
/// home, so after it runs that file is deleted and the owning package is
/// restowed.
#[derive(Debug)]
pub struct InstallShellFramework;

impl Task for InstallShellFramework {
    fn name(&self) -> &str {
        "Install shell framework"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let framework = &ctx.config.shell_framework;
        let marker = ctx.home.join(&framework.marker);
        if marker.exists() {
            ctx.log
                .info(&format!("{} already installed", marker.display()));
            return Ok(TaskResult::Skipped("already installed".to_string()));
        }

        let generated = ctx.home.join(&framework.generated_file);
        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would run installer from {}",
                framework.installer_url
            ));
            ctx.log
                .dry_run(&format!("would remove generated {}", generated.display()));
            restow(ctx, &framework.package)?;
            return Ok(TaskResult::DryRun);
        }

        let script = ctx
            .fetcher
            .fetch_text(&framework.installer_url)
            .context("downloading shell framework installer")?;
        run_installer(ctx, &script)?;

        if remove_existing(&generated)? {
            ctx.log
                .debug(&format!("removed generated {}", generated.display()));
        }
        restow(ctx, &framework.package)?;

        ctx.log.success(&format!(
            "installed shell framework into {}",
            marker.display()
        ));
        Ok(TaskResult::Ok)
    }
}

/// Write `script` to a fresh temp file and run it unattended from home.
///
/// The file is created exclusively and removed when it goes out of scope.
fn run_installer(ctx: &Context, script: &str) -> Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix("bootstrap-shell-framework-")
        .suffix(".sh")
        .tempfile()
        .context("creating installer temp file")?;
    file.write_all(script.as_bytes())
        .with_context(|| format!("writing installer to {}", file.path().display()))?;

    let path_arg = file.path().to_string_lossy();
    ctx.executor
        .run_in_with_env(
            &ctx.home,
            "sh",
            &[&path_arg, "--unattended"],
            &[("RUNZSH", "no"), ("CHSH", "no")],
        )
        .context("shell framework installer failed")?;
    Ok(())
}

/// Clone the terminal-multiplexer plugin manager once.
#[derive(Debug)]
pub struct InstallPluginManager;

impl Task for InstallPluginManager {
    fn name(&self) -> &str {
        "Install plugin manager"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let manager = &ctx.config.plugin_manager;
        let target = ctx.home.join(&manager.target);
        if target.exists() {
            ctx.log
                .info(&format!("{} already installed", target.display()));
            return Ok(TaskResult::Skipped("already installed".to_string()));
        }

        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would clone {} into {}",
                manager.repository,
                target.display()
            ));
            return Ok(TaskResult::DryRun);
        }

        ensure_parent_dir(&target)?;
        let target_arg = target.to_string_lossy();
        ctx.executor
            .run("git", &["clone", &manager.repository, &target_arg])
            .with_context(|| format!("cloning {}", manager.repository))?;

        ctx.log
            .success(&format!("cloned plugin manager into {}", target.display()));
        Ok(TaskResult::Ok)
    }
}

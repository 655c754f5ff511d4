//! The `install` command: the full bootstrap run.
use anyhow::Result;
use std::sync::Arc;

use super::{report_warnings, resolve_root, version};
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::exec::SystemExecutor;
use crate::fetch::HttpFetcher;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context};

/// Run every install stage in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the error of the first failing stage.
pub fn run_workflow(ctx: &Context) -> Result<()> {
    tasks::run_all(&tasks::all_install_tasks(), ctx)
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the root cannot be resolved, the configuration is
/// invalid, or any stage fails. Stage failures have already been logged and
/// recorded in the summary by the time this returns.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("bootstrap {}", version()));

    let root = resolve_root(global)?;
    log.debug(&format!("dotfiles root: {}", root.display()));

    let config = Config::load(&root)?;
    log.debug(&format!(
        "{} packages, {} conflict candidates, {} system packages",
        config.packages.len(),
        config.conflicts.len(),
        config.system_packages.len()
    ));
    report_warnings(&config, &**log);

    let ctx = Context::new(
        Arc::new(config),
        Arc::new(Platform::detect()),
        Arc::clone(log) as Arc<dyn Log>,
        global.dry_run,
        Arc::new(SystemExecutor),
        Arc::new(HttpFetcher),
    )?;
    if global.dry_run {
        log.info("dry run: no changes will be made");
    }

    let result = run_workflow(&ctx);
    log.print_summary();

    if result.is_err() {
        anyhow::bail!("bootstrap aborted; fix the error above and re-run");
    }
    log.success("dotfiles installed");
    Ok(())
}

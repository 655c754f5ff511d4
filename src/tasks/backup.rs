//! Conflict backup stage.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::Resource as _;
use crate::resources::backup::BackupResource;

/// Move pre-existing plain files out of the way of stow.
///
/// Candidates that are absent, already symlinks, or reached through a
/// symlinked directory are left untouched. The backup directory is only
/// created when something is actually moved.
#[derive(Debug)]
pub struct BackupConflicts;

impl Task for BackupConflicts {
    fn name(&self) -> &str {
        "Back up conflicting files"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.conflicts.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resources: Vec<BackupResource> = ctx
            .config
            .conflicts
            .iter()
            .map(|candidate| BackupResource::new(candidate, &ctx.home, &ctx.backup_dir))
            .collect();

        for resource in &resources {
            if !ctx.dry_run && resource.needs_change()? {
                ctx.log.info(&format!(
                    "moving {} to {}",
                    resource.source.display(),
                    resource.destination.display()
                ));
            }
        }

        let stats = process_resources(
            ctx,
            resources,
            &ProcessOpts::apply_all("back up").skip_missing(),
        )?;

        if stats.changed == 0 {
            ctx.log.info("no conflicts found");
        } else if !ctx.dry_run {
            ctx.log.success(&format!(
                "backed up {} file(s) to {}",
                stats.changed,
                ctx.backup_dir.display()
            ));
        }
        Ok(stats.finish(ctx))
    }
}

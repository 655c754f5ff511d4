//! Platform detection stage.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::platform::Os;

/// Report the platform detected at startup.
///
/// An unknown platform is only a warning here; stages that need a package
/// manager fail on their own if they have something to install.
#[derive(Debug)]
pub struct DetectPlatform;

impl Task for DetectPlatform {
    fn name(&self) -> &str {
        "Detect platform"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let platform = &ctx.platform;
        match platform.os {
            Os::Unknown => ctx.log.warn(&format!(
                "unrecognised platform '{}': package installation is unavailable",
                platform.ostype
            )),
            os => ctx.log.info(&format!("platform: {os} ({})", platform.ostype)),
        }
        Ok(TaskResult::Ok)
    }
}

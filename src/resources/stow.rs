//! Stow package resource.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::{Applicable, ResourceChange};
use crate::exec::Executor;

/// A dotfiles package linked into home by `stow --restow`.
///
/// The link state belongs to stow, so this resource has no state check of
/// its own: restowing is idempotent and is applied on every run.
#[derive(Debug)]
pub struct StowPackage<'a> {
    /// Package directory name under the stow directory.
    pub name: String,
    stow_dir: PathBuf,
    target: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> StowPackage<'a> {
    /// Create a stow package resource linking `stow_dir/name` into `target`.
    #[must_use]
    pub fn new(name: &str, stow_dir: &Path, target: &Path, executor: &'a dyn Executor) -> Self {
        Self {
            name: name.to_string(),
            stow_dir: stow_dir.to_path_buf(),
            target: target.to_path_buf(),
            executor,
        }
    }
}

impl Applicable for StowPackage<'_> {
    fn description(&self) -> String {
        format!("package {}", self.name)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let target = self.target.to_string_lossy();
        self.executor
            .run_in(
                &self.stow_dir,
                "stow",
                &["--restow", "--target", &target, &self.name],
            )
            .with_context(|| format!("stow failed for package '{}'", self.name))?;
        Ok(ResourceChange::Applied)
    }
}

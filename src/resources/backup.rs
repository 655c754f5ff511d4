//! Conflict backup resource.
use anyhow::{Context as _, Result, bail};
use std::path::{Path, PathBuf};

use super::helpers::fs::{ensure_parent_dir, is_symlink};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A conflict candidate under home that must not be a plain file or
/// directory when stow runs.
///
/// Symlinks are left alone because stow owns them, and so is anything reached
/// through a symlinked parent directory (stow folds a directory into a single
/// link when no other package shares it). Anything else is moved, never
/// copied or deleted, into the run's backup directory, keeping its
/// home-relative path.
#[derive(Debug, Clone)]
pub struct BackupResource {
    /// Home-relative candidate path.
    pub candidate: PathBuf,
    /// Absolute path under home.
    pub source: PathBuf,
    /// Absolute path inside the backup directory.
    pub destination: PathBuf,
    home: PathBuf,
}

impl BackupResource {
    /// Create a backup resource for `candidate`, resolved against `home` and
    /// `backup_dir`.
    #[must_use]
    pub fn new(candidate: &Path, home: &Path, backup_dir: &Path) -> Self {
        Self {
            candidate: candidate.to_path_buf(),
            source: home.join(candidate),
            destination: backup_dir.join(candidate),
            home: home.to_path_buf(),
        }
    }

    /// The nearest directory between home and the candidate that is a
    /// symlink, if any.
    fn linked_parent(&self) -> Option<PathBuf> {
        self.candidate
            .ancestors()
            .skip(1)
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(|rel| self.home.join(rel))
            .find(|dir| is_symlink(dir))
    }
}

impl Applicable for BackupResource {
    fn description(&self) -> String {
        format!("~/{}", self.candidate.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.destination)?;
        if self.destination.symlink_metadata().is_ok() {
            bail!(
                "backup destination already exists: {}",
                self.destination.display()
            );
        }
        std::fs::rename(&self.source, &self.destination).with_context(|| {
            format!(
                "moving {} to {}",
                self.source.display(),
                self.destination.display()
            )
        })?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for BackupResource {
    fn current_state(&self) -> Result<ResourceState> {
        if self.linked_parent().is_some() {
            return Ok(ResourceState::Correct);
        }
        let meta = match self.source.symlink_metadata() {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ResourceState::Correct);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("inspecting {}", self.source.display()));
            }
        };

        let file_type = meta.file_type();
        if file_type.is_symlink() {
            Ok(ResourceState::Correct)
        } else if file_type.is_dir() {
            Ok(ResourceState::Incorrect {
                current: "directory".to_string(),
            })
        } else {
            Ok(ResourceState::Incorrect {
                current: "regular file".to_string(),
            })
        }
    }
}

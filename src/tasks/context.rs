//! Shared state handed to every stage of a run.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::exec::Executor;
use crate::fetch::Fetcher;
use crate::logging::Log;
use crate::platform::Platform;
use crate::resources::package::PackageIndex;

/// Format of the per-run backup directory name.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Shared context for task execution.
pub struct Context {
    /// Configuration loaded from `bootstrap.toml`.
    pub config: Arc<Config>,
    /// Platform detected once at startup.
    pub platform: Arc<Platform>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// User's home directory path.
    pub home: PathBuf,
    /// This run's backup directory. Only created when a conflict is moved.
    pub backup_dir: PathBuf,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Remote download seam.
    pub fetcher: Arc<dyn Fetcher>,
    /// Package-manager index state shared by every install in the run.
    pub package_index: Arc<PackageIndex>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("backup_dir", &self.backup_dir)
            .field("executor", &self.executor)
            .field("fetcher", &self.fetcher)
            .field("package_index", &self.package_index)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    ///
    /// The backup directory name is fixed here from the local start time of
    /// the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new(
        config: Arc<Config>,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("HOME environment variable is not set"))?;
        let stamp = chrono::Local::now()
            .format(BACKUP_TIMESTAMP_FORMAT)
            .to_string();
        let backup_dir = home.join(&config.backup_root).join(stamp);

        Ok(Self {
            config,
            platform,
            log,
            dry_run,
            home,
            backup_dir,
            executor,
            fetcher,
            package_index: Arc::default(),
        })
    }

    /// Root directory of the dotfiles repository.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.config.root.clone()
    }

    /// Directory holding the stow packages.
    #[must_use]
    pub fn stow_dir(&self) -> PathBuf {
        self.config.stow_dir.clone()
    }

    /// Create a copy of this context with a different logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            platform: Arc::clone(&self.platform),
            log,
            dry_run: self.dry_run,
            home: self.home.clone(),
            backup_dir: self.backup_dir.clone(),
            executor: Arc::clone(&self.executor),
            fetcher: Arc::clone(&self.fetcher),
            package_index: Arc::clone(&self.package_index),
        }
    }
}

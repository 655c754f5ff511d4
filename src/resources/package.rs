//! Package installation resource.
use anyhow::{Context as _, Result};
use std::sync::atomic::{AtomicBool, Ordering};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::BootstrapError;
use crate::exec::Executor;
use crate::platform::{Os, Platform};

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Homebrew (macOS).
    Brew,
    /// apt (Debian/Ubuntu), preferred on Linux.
    Apt,
    /// pacman (Arch), Linux fallback.
    Pacman,
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brew => write!(f, "brew"),
            Self::Apt => write!(f, "apt"),
            Self::Pacman => write!(f, "pacman"),
        }
    }
}

impl PackageManager {
    /// Select the backend for `platform`.
    ///
    /// Linux backends are tried by availability in a fixed order: apt, then
    /// pacman. `package` is only used to build an actionable error message.
    ///
    /// # Errors
    ///
    /// - [`BootstrapError::MissingPrerequisite`] on macOS without Homebrew
    /// - [`BootstrapError::NoPackageManager`] on Linux without apt or pacman
    /// - [`BootstrapError::UnsupportedPlatform`] on any other platform
    pub fn resolve(
        platform: &Platform,
        executor: &dyn Executor,
        package: &str,
    ) -> Result<Self, BootstrapError> {
        match platform.os {
            Os::MacOs if executor.which("brew") => Ok(Self::Brew),
            Os::MacOs => Err(BootstrapError::MissingPrerequisite {
                tool: "brew".to_string(),
                hint: format!("install Homebrew from https://brew.sh, then re-run (needed for '{package}')"),
            }),
            Os::Linux if executor.which("apt-get") => Ok(Self::Apt),
            Os::Linux if executor.which("pacman") => Ok(Self::Pacman),
            Os::Linux => Err(BootstrapError::NoPackageManager {
                package: package.to_string(),
            }),
            Os::Unknown => Err(BootstrapError::UnsupportedPlatform {
                os: platform.ostype.clone(),
            }),
        }
    }

    /// Install `package` with this backend. May prompt for `sudo`.
    ///
    /// # Errors
    ///
    /// Returns an error if any package manager command fails.
    pub fn install(
        self,
        executor: &dyn Executor,
        package: &str,
        index: &PackageIndex,
    ) -> Result<()> {
        match self {
            Self::Brew => {
                executor.run("brew", &["install", package])?;
            }
            Self::Apt => {
                index.refresh_apt(executor)?;
                executor.run("sudo", &["apt-get", "install", "-y", package])?;
            }
            Self::Pacman => {
                executor.run("sudo", &["pacman", "-S", "--needed", "--noconfirm", package])?;
            }
        }
        Ok(())
    }
}

/// Per-run state of the package manager's index.
///
/// `apt-get update` runs before the first apt install of a run and not again.
#[derive(Debug, Default)]
pub struct PackageIndex {
    apt_refreshed: AtomicBool,
}

impl PackageIndex {
    /// Whether the apt index has been refreshed during this run.
    #[must_use]
    pub fn apt_refreshed(&self) -> bool {
        self.apt_refreshed.load(Ordering::Acquire)
    }

    fn refresh_apt(&self, executor: &dyn Executor) -> Result<()> {
        if self.apt_refreshed() {
            return Ok(());
        }
        executor.run("sudo", &["apt-get", "update"])?;
        self.apt_refreshed.store(true, Ordering::Release);
        Ok(())
    }
}

/// Install a single named package with the platform's package manager.
///
/// Returns the backend that was used.
///
/// # Errors
///
/// Returns a [`BootstrapError`] if no backend is available, or the package
/// manager's own failure.
pub fn install_package(
    package: &str,
    platform: &Platform,
    executor: &dyn Executor,
    index: &PackageIndex,
) -> Result<PackageManager> {
    let manager = PackageManager::resolve(platform, executor, package)?;
    manager
        .install(executor, package, index)
        .with_context(|| format!("installing {package} with {manager}"))?;
    Ok(manager)
}

/// A system package, considered present when its command resolves on `PATH`.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// Package name passed to the package manager.
    pub name: String,
    /// Command that the package provides.
    pub command: String,
    platform: &'a Platform,
    executor: &'a dyn Executor,
    index: &'a PackageIndex,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(
        name: String,
        command: String,
        platform: &'a Platform,
        executor: &'a dyn Executor,
        index: &'a PackageIndex,
    ) -> Self {
        Self {
            name,
            command,
            platform,
            executor,
            index,
        }
    }
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        if self.name == self.command {
            format!("package {}", self.name)
        } else {
            format!("package {} ({})", self.name, self.command)
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        install_package(&self.name, self.platform, self.executor, self.index)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PackageResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.executor.which(&self.command) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

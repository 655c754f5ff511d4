//! Immutable run configuration.
//!
//! Loaded once at startup from `<root>/bootstrap.toml`. Every key is optional;
//! the defaults are the fixed package and conflict lists the bootstrap has
//! always shipped with.
pub mod toml_loader;

use anyhow::Result;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// Name of the optional configuration file at the repository root.
pub const CONFIG_FILE: &str = "bootstrap.toml";

/// A system package installed through the platform package manager.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemPackage {
    /// Package name as understood by brew/apt/pacman.
    pub name: String,
    /// Command whose presence on `PATH` means the package is already installed.
    pub command: String,
}

/// One-time shell-framework installation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellFramework {
    /// Marker directory under home; its presence skips the installer.
    pub marker: PathBuf,
    /// Remote install script.
    pub installer_url: String,
    /// Dotfiles package to restow after the installer ran.
    pub package: String,
    /// File under home the installer overwrites.
    pub generated_file: PathBuf,
}

impl Default for ShellFramework {
    fn default() -> Self {
        Self {
            marker: PathBuf::from(".oh-my-zsh"),
            installer_url: "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh"
                .to_string(),
            package: "zsh".to_string(),
            generated_file: PathBuf::from(".zshrc"),
        }
    }
}

/// One-time terminal-multiplexer plugin-manager clone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PluginManager {
    /// Git repository to clone.
    pub repository: String,
    /// Clone destination under home; its presence skips the clone.
    pub target: PathBuf,
}

impl Default for PluginManager {
    fn default() -> Self {
        Self {
            repository: "https://github.com/tmux-plugins/tpm".to_string(),
            target: PathBuf::from(".tmux/plugins/tpm"),
        }
    }
}

/// On-disk shape of `bootstrap.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    stow_dir: PathBuf,
    packages: Vec<String>,
    conflicts: Vec<PathBuf>,
    backup_root: PathBuf,
    system_packages: Vec<SystemPackage>,
    shell_framework: ShellFramework,
    plugin_manager: PluginManager,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            stow_dir: PathBuf::from("packages"),
            packages: ["zsh", "git", "nvim", "tmux"]
                .into_iter()
                .map(String::from)
                .collect(),
            conflicts: [".zshrc", ".gitconfig", ".config/nvim/init.lua", ".tmux.conf"]
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            backup_root: PathBuf::from(".dotfiles_backup"),
            system_packages: [("zsh", "zsh"), ("tmux", "tmux"), ("neovim", "nvim")]
                .into_iter()
                .map(|(name, command)| SystemPackage {
                    name: name.to_string(),
                    command: command.to_string(),
                })
                .collect(),
            shell_framework: ShellFramework::default(),
            plugin_manager: PluginManager::default(),
        }
    }
}

/// All configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dotfiles repository root.
    pub root: PathBuf,
    /// Directory holding one subdirectory per package (absolute).
    pub stow_dir: PathBuf,
    /// Ordered PackageList handed to stow.
    pub packages: Vec<String>,
    /// ConflictCandidate paths, relative to home.
    pub conflicts: Vec<PathBuf>,
    /// Parent of the timestamped backup directories, relative to home.
    pub backup_root: PathBuf,
    /// Packages installed before linking.
    pub system_packages: Vec<SystemPackage>,
    /// Shell-framework hook settings.
    pub shell_framework: ShellFramework,
    /// Plugin-manager hook settings.
    pub plugin_manager: PluginManager,
}

impl Config {
    /// Load `<root>/bootstrap.toml`, falling back to defaults for absent keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value
    /// fails validation (see [`ConfigError::Invalid`]).
    pub fn load(root: &Path) -> Result<Self> {
        let raw: RawConfig = toml_loader::load_config(&root.join(CONFIG_FILE))?;
        Ok(Self::from_raw(root, raw)?)
    }

    /// The built-in configuration for `root`, ignoring any config file.
    #[must_use]
    pub fn defaults(root: &Path) -> Self {
        Self::build(root, RawConfig::default())
    }

    fn from_raw(root: &Path, raw: RawConfig) -> Result<Self, ConfigError> {
        for name in &raw.packages {
            check_package_name("packages", name)?;
        }
        check_package_name("shell_framework.package", &raw.shell_framework.package)?;
        for candidate in &raw.conflicts {
            check_home_relative("conflicts", candidate)?;
        }
        check_home_relative("backup_root", &raw.backup_root)?;
        check_home_relative("shell_framework.marker", &raw.shell_framework.marker)?;
        check_home_relative(
            "shell_framework.generated_file",
            &raw.shell_framework.generated_file,
        )?;
        check_home_relative("plugin_manager.target", &raw.plugin_manager.target)?;

        Ok(Self::build(root, raw))
    }

    fn build(root: &Path, raw: RawConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            // `join` keeps an absolute stow_dir as-is.
            stow_dir: root.join(&raw.stow_dir),
            packages: raw.packages,
            conflicts: raw.conflicts,
            backup_root: raw.backup_root,
            system_packages: raw.system_packages,
            shell_framework: raw.shell_framework,
            plugin_manager: raw.plugin_manager,
        }
    }

    /// Non-fatal consistency checks between the config and the package tree.
    ///
    /// Reports packages without a directory and conflict candidates that no
    /// package provides. The conflict list is maintained by hand, so drift is
    /// expected and only warned about.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for package in &self.packages {
            if !self.stow_dir.join(package).is_dir() {
                warnings.push(format!(
                    "package '{package}' has no directory in {}",
                    self.stow_dir.display()
                ));
            }
        }

        for candidate in &self.conflicts {
            let provided = self.packages.iter().any(|package| {
                self.stow_dir
                    .join(package)
                    .join(candidate)
                    .symlink_metadata()
                    .is_ok()
            });
            if !provided {
                warnings.push(format!(
                    "conflict candidate '{}' is not provided by any package",
                    candidate.display()
                ));
            }
        }

        warnings
    }
}

fn check_package_name(field: &str, name: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConfigError::Invalid {
            field: field.to_string(),
            message: format!("'{name}' must be a single directory name"),
        }),
    }
}

fn check_home_relative(field: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            message: "path must not be empty".to_string(),
        });
    }
    if !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            message: format!(
                "'{}' must be relative to the home directory without '..'",
                path.display()
            ),
        });
    }
    Ok(())
}

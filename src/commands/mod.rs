//! Subcommand implementations and root resolution.
pub mod install;
pub mod version;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::config::Config;

/// Environment variable overriding the dotfiles root.
pub const ROOT_ENV: &str = "BOOTSTRAP_ROOT";

/// Version string embedded at build time.
#[must_use]
pub fn version() -> &'static str {
    option_env!("BOOTSTRAP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Resolve the dotfiles root directory from CLI arguments or auto-detection.
///
/// # Errors
///
/// Returns an error if the root directory cannot be determined.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    resolve_root_from(
        global,
        std::env::var(ROOT_ENV).ok(),
        std::env::current_exe().ok(),
        &std::env::current_dir()?,
    )
}

/// Root resolution with the process environment passed in.
///
/// Order: `--root`, [`ROOT_ENV`], a directory containing the stow packages
/// relative to the binary (`target/release/` or `bin/`), then `cwd`.
fn resolve_root_from(
    global: &GlobalOpts,
    env_root: Option<String>,
    exe: Option<PathBuf>,
    cwd: &Path,
) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }

    if let Some(root) = env_root.filter(|r| !r.is_empty()) {
        return Ok(PathBuf::from(root));
    }

    if let Some(parent) = exe.as_deref().and_then(Path::parent) {
        let candidates = [
            parent.join("../.."), // target/release/ → repo root
            parent.join(".."),    // bin/ → repo root
        ];
        for candidate in &candidates {
            if is_dotfiles_root(candidate) {
                return Ok(std::fs::canonicalize(candidate)?);
            }
        }
    }

    if is_dotfiles_root(cwd) {
        return Ok(cwd.to_path_buf());
    }

    anyhow::bail!("cannot determine dotfiles root. Use --root or set {ROOT_ENV} env var");
}

/// A directory is a dotfiles root when it holds the default stow directory
/// or a config file.
fn is_dotfiles_root(dir: &Path) -> bool {
    dir.join("packages").is_dir() || dir.join(crate::config::CONFIG_FILE).is_file()
}

/// Log configuration warnings.
fn report_warnings(config: &Config, log: &dyn crate::logging::Log) {
    let warnings = config.validate();
    if warnings.is_empty() {
        return;
    }
    log.warn(&format!(
        "found {} configuration warning(s):",
        warnings.len()
    ));
    for warning in &warnings {
        log.warn(&format!("  {warning}"));
    }
}

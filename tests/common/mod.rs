// Shared helpers for integration tests.
//
// Provides a temporary dotfiles repository, a temporary home directory and a
// `FakeSystem` executor that simulates the external tools the workflow calls,
// so each test can run the real install stages without touching the host.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use dotfiles_bootstrap::config::Config;
use dotfiles_bootstrap::error::ExecError;
use dotfiles_bootstrap::exec::{ExecResult, Executor};
use dotfiles_bootstrap::fetch::Fetcher;
use dotfiles_bootstrap::logging::{Log, Logger};
use dotfiles_bootstrap::platform::{Os, Platform};
use dotfiles_bootstrap::tasks::Context;

/// Package files written by [`setup_repo`], relative to the stow directory.
pub const PACKAGE_FILES: &[(&str, &str)] = &[
    ("zsh/.zshrc", "# managed zshrc\n"),
    ("git/.gitconfig", "[core]\n\teditor = nvim\n"),
    ("nvim/.config/nvim/init.lua", "vim.o.number = true\n"),
    ("tmux/.tmux.conf", "set -g mouse on\n"),
];

/// Write the default package tree into `root/packages`.
pub fn setup_repo(root: &Path) {
    for (rel, content) in PACKAGE_FILES {
        let path = root.join("packages").join(rel);
        std::fs::create_dir_all(path.parent().expect("package file has a parent"))
            .expect("create package dir");
        std::fs::write(&path, content).expect("write package file");
    }
}

/// An isolated dotfiles repository and home directory.
pub struct TestEnv {
    /// Temporary dotfiles repository.
    pub repo: tempfile::TempDir,
    /// Temporary home directory.
    pub home: tempfile::TempDir,
}

impl TestEnv {
    /// Create a repository with the default packages and an empty home.
    pub fn new() -> Self {
        let repo = tempfile::tempdir().expect("create repo dir");
        let home = tempfile::tempdir().expect("create home dir");
        setup_repo(repo.path());
        Self { repo, home }
    }

    /// Path to the repository root.
    pub fn root(&self) -> &Path {
        self.repo.path()
    }

    /// Path to the home directory.
    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Write a plain file under home.
    pub fn write_home_file(&self, rel: &str, content: &str) {
        let path = self.home().join(rel);
        std::fs::create_dir_all(path.parent().expect("home file has a parent"))
            .expect("create home parent");
        std::fs::write(path, content).expect("write home file");
    }

    /// Load the repository configuration.
    pub fn config(&self) -> Config {
        Config::load(self.root()).expect("load config")
    }

    /// Build a run context on Linux with the given backup directory name.
    pub fn context(
        &self,
        system: &Arc<FakeSystem>,
        stamp: &str,
        dry_run: bool,
    ) -> (Context, Arc<Logger>) {
        self.context_for(system, Platform::new(Os::Linux), stamp, dry_run)
    }

    /// Build a run context for an explicit platform.
    pub fn context_for(
        &self,
        system: &Arc<FakeSystem>,
        platform: Platform,
        stamp: &str,
        dry_run: bool,
    ) -> (Context, Arc<Logger>) {
        let config = self.config();
        let log = Arc::new(Logger::new("test"));
        let ctx = Context {
            backup_dir: self.home().join(&config.backup_root).join(stamp),
            config: Arc::new(config),
            platform: Arc::new(platform),
            log: Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            home: self.home().to_path_buf(),
            executor: Arc::clone(system) as Arc<dyn Executor>,
            fetcher: Arc::new(StubFetcher::default()),
            package_index: Arc::default(),
        };
        (ctx, log)
    }
}

/// Fetcher that returns a fixed script without network access.
#[derive(Debug, Default)]
pub struct StubFetcher {
    /// Number of downloads performed.
    pub fetches: AtomicU32,
}

impl Fetcher for StubFetcher {
    fn fetch_text(&self, _url: &str) -> anyhow::Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok("#!/bin/sh\necho installing\n".to_string())
    }
}

/// Executor that simulates `stow`, the shell-framework installer and
/// `git clone` on the real filesystem and records every call.
#[derive(Debug)]
pub struct FakeSystem {
    calls: Mutex<Vec<String>>,
    available: HashSet<String>,
    fail_on: Option<String>,
}

impl Default for FakeSystem {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            available: ["git", "stow", "zsh", "tmux", "nvim", "apt-get"]
                .into_iter()
                .map(String::from)
                .collect(),
            fail_on: None,
        }
    }
}

impl FakeSystem {
    /// A system where every tool is present and every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any command whose recorded line equals `line`.
    pub fn failing_on(mut self, line: &str) -> Self {
        self.fail_on = Some(line.to_string());
        self
    }

    /// Remove `program` from `PATH`.
    pub fn without(mut self, program: &str) -> Self {
        self.available.remove(program);
        self
    }

    /// Every command issued so far, as `"program arg1 arg2"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Calls whose program is `program`.
    pub fn calls_to(&self, program: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.split(' ').next() == Some(program))
            .collect()
    }

    fn record(&self, program: &str, args: &[&str]) -> anyhow::Result<()> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().expect("calls lock").push(line.clone());
        if self.fail_on.as_deref() == Some(line.as_str()) {
            return Err(ExecError::Failed {
                label: program.to_string(),
                code: 1,
                stderr: "simulated failure".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn simulate(&self, dir: Option<&Path>, program: &str, args: &[&str]) -> anyhow::Result<()> {
        match (program, args) {
            ("stow", ["--restow", "--target", target, package]) => {
                let stow_dir = dir.expect("stow runs inside the stow directory");
                restow(&stow_dir.join(package), &stow_dir.join(package), Path::new(target))
            }
            ("sh", [_, "--unattended"]) => {
                let home = dir.expect("installer runs in home");
                std::fs::create_dir_all(home.join(".oh-my-zsh"))?;
                let zshrc = home.join(".zshrc");
                if zshrc.symlink_metadata().is_ok() {
                    std::fs::remove_file(&zshrc)?;
                }
                std::fs::write(zshrc, "# generated by the framework installer\n")?;
                Ok(())
            }
            ("git", ["clone", _, target]) => {
                std::fs::create_dir_all(target)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle(&self, dir: Option<&Path>, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.record(program, args)?;
        self.simulate(dir, program, args)?;
        Ok(ExecResult {
            success: true,
            code: Some(0),
            ..ExecResult::default()
        })
    }
}

/// Link the contents of `source` into `target` the way GNU stow does.
///
/// A free target path gets a single link, so a directory no other package
/// uses is folded into one symlink. A real directory is descended into, a
/// link back into `package_root` is replaced, and anything else conflicts.
fn restow(package_root: &Path, source: &Path, target: &Path) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(source)? {
        let path = entry?.path();
        let name = path.file_name().expect("directory entry has a name");
        let link = target.join(name);
        match link.symlink_metadata() {
            Err(_) => std::os::unix::fs::symlink(&path, &link)?,
            Ok(meta) if meta.file_type().is_symlink() => {
                if !std::fs::read_link(&link)?.starts_with(package_root) {
                    return Err(conflict(package_root, &path));
                }
                std::fs::remove_file(&link)?;
                std::os::unix::fs::symlink(&path, &link)?;
            }
            Ok(meta) if meta.is_dir() && path.is_dir() => restow(package_root, &path, &link)?,
            Ok(_) => return Err(conflict(package_root, &path)),
        }
    }
    Ok(())
}

fn conflict(package_root: &Path, path: &Path) -> anyhow::Error {
    let rel = path.strip_prefix(package_root).unwrap_or(path);
    ExecError::Failed {
        label: "stow".to_string(),
        code: 1,
        stderr: format!("existing target is not owned by stow: {}", rel.display()),
    }
    .into()
}

impl Executor for FakeSystem {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.handle(None, program, args)
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.handle(Some(dir), program, args)
    }

    fn run_in_with_env(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        _env: &[(&str, &str)],
    ) -> anyhow::Result<ExecResult> {
        self.handle(Some(dir), program, args)
    }

    fn which(&self, program: &str) -> bool {
        self.available.contains(program)
    }
}

/// Returns the link target if `path` is a symlink.
pub fn link_target(path: &Path) -> Option<PathBuf> {
    std::fs::read_link(path).ok()
}

/// Returns `true` if `path` resolves, through any symlinked component, to a
/// location inside `dir`.
pub fn resolves_into(path: &Path, dir: &Path) -> bool {
    match (std::fs::canonicalize(path), std::fs::canonicalize(dir)) {
        (Ok(resolved), Ok(dir)) => resolved.starts_with(dir),
        _ => false,
    }
}

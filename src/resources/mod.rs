//! Idempotent resource primitives (check + apply pattern).
pub mod backup;
pub mod helpers;
pub mod package;
pub mod stow;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
///
/// Resources whose state is owned by an external tool (e.g. stow-managed
/// links) implement only this trait and are applied unconditionally.
/// Resources that can determine their own state implement the richer
/// [`Resource`] super-trait.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be applied: an external command
    /// failed, a path could not be moved, or a prerequisite is missing.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "regular file".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(wrong, correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// What is there instead.
        current: String,
    },
    /// Resource cannot be applied.
    Invalid {
        /// Why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped.
    Skipped {
        /// Why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined (e.g. an I/O error
    /// other than "not found").
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Resource::current_state`].
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}

/// Shared test helpers for resource and task unit tests.
#[cfg(test)]
pub mod test_helpers {
    use crate::exec::{ExecResult, Executor};
    use std::collections::{HashSet, VecDeque};
    use std::path::Path;
    use std::sync::Mutex;

    /// A configurable mock executor.
    ///
    /// Maintains a queue of `(success, stdout)` responses consumed in FIFO
    /// order. When the queue is empty every call succeeds with empty output.
    /// Every invocation is recorded as `"program arg1 arg2 …"` so tests can
    /// assert on the exact command sequence.
    #[derive(Debug, Default)]
    pub struct MockExecutor {
        responses: Mutex<VecDeque<(bool, String)>>,
        available: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockExecutor {
        /// Create a mock where every call succeeds.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock from an ordered list of `(success, stdout)` pairs.
        #[must_use]
        pub fn with_responses(responses: Vec<(bool, String)>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Self::default()
            }
        }

        /// Mark `programs` as present on `PATH`.
        #[must_use]
        pub fn with_programs(mut self, programs: &[&str]) -> Self {
            self.available
                .extend(programs.iter().map(|p| (*p).to_string()));
            self
        }

        /// Every command issued so far.
        #[must_use]
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().map_or_else(|_| vec![], |g| g.clone())
        }

        fn next(&self, program: &str, args: &[&str]) -> (bool, String) {
            if let Ok(mut calls) = self.calls.lock() {
                let mut line = program.to_string();
                for arg in args {
                    line.push(' ');
                    line.push_str(arg);
                }
                calls.push(line);
            }
            self.responses
                .lock()
                .ok()
                .and_then(|mut guard| guard.pop_front())
                .unwrap_or((true, String::new()))
        }

        fn next_result(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
            let (success, stdout) = self.next(program, args);
            if success {
                Ok(ExecResult {
                    stdout,
                    stderr: String::new(),
                    success: true,
                    code: Some(0),
                })
            } else {
                Err(crate::error::ExecError::Failed {
                    label: program.to_string(),
                    code: 1,
                    stderr: "mock command failed".to_string(),
                }
                .into())
            }
        }
    }

    impl Executor for MockExecutor {
        fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
            self.next_result(program, args)
        }

        fn run_in(&self, _: &Path, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
            self.next_result(program, args)
        }

        fn run_in_with_env(
            &self,
            _: &Path,
            program: &str,
            args: &[&str],
            _: &[(&str, &str)],
        ) -> anyhow::Result<ExecResult> {
            self.next_result(program, args)
        }

        fn which(&self, program: &str) -> bool {
            self.available.contains(program)
        }
    }
}

//! Scripted git backend for testing
//!
//! `ScriptedGit` simulates a remote repository on top of a `MockSystem`, so
//! pipeline tests can force clone, sparse-checkout and branch failures
//! deterministically.

use crate::error::GitFailure;
use crate::git::backend::{GitResult, SparseGit};
use crate::system::{MockSystem, System as _};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory remote repository driven through the `SparseGit` interface
///
/// # Example
/// ```
/// use sparsepick::git::{ScriptedGit, SparseGit};
/// use sparsepick::system::{MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new();
/// let git = ScriptedGit::new(system.clone())
///     .with_branch("main", &[("services/api/main.rs", "fn main() {}")]);
///
/// let ws = Path::new("/ws");
/// git.clone_without_checkout("https://example.com/mono.git", ws).unwrap();
/// git.enable_sparse_cone(ws).unwrap();
/// git.set_sparse_path(ws, "services/api").unwrap();
/// git.checkout(ws, Some("main")).unwrap();
///
/// assert!(system.is_file(Path::new("/ws/services/api/main.rs")));
/// ```
#[derive(Clone)]
pub struct ScriptedGit {
    system: MockSystem,
    state: Arc<Mutex<ScriptedState>>,
}

#[derive(Default)]
struct ScriptedState {
    branches: BTreeMap<String, Vec<(String, String)>>,
    default_branch: Option<String>,
    clone_failure: Option<CloneFailure>,
    fail_sparse_init: bool,
    fail_sparse_set: bool,
    sparse: HashMap<PathBuf, Option<String>>,
    calls: Vec<String>,
}

#[derive(Clone, Copy)]
enum CloneFailure {
    Clean,
    Partial,
}

impl ScriptedGit {
    #[must_use]
    pub fn new(system: MockSystem) -> Self {
        Self {
            system,
            state: Arc::new(Mutex::new(ScriptedState::default())),
        }
    }

    /// Add a branch with `(path, contents)` files (builder pattern)
    ///
    /// The first branch added becomes the default branch unless
    /// `with_default_branch` says otherwise.
    #[must_use]
    pub fn with_branch(self, name: &str, files: &[(&str, &str)]) -> Self {
        {
            let mut state = self.state();
            state.branches.insert(
                name.to_owned(),
                files
                    .iter()
                    .map(|(path, contents)| ((*path).to_owned(), (*contents).to_owned()))
                    .collect(),
            );
            if state.default_branch.is_none() {
                state.default_branch = Some(name.to_owned());
            }
        }
        self
    }

    /// Set the branch the remote's HEAD points to (builder pattern)
    #[must_use]
    pub fn with_default_branch(self, name: &str) -> Self {
        self.state().default_branch = Some(name.to_owned());
        self
    }

    /// Make the clone fail; `partial` leaves a half-created workspace behind
    #[must_use]
    pub fn failing_clone(self, partial: bool) -> Self {
        self.state().clone_failure = Some(if partial {
            CloneFailure::Partial
        } else {
            CloneFailure::Clean
        });
        self
    }

    /// Make `sparse-checkout init` fail (builder pattern)
    #[must_use]
    pub fn failing_sparse_init(self) -> Self {
        self.state().fail_sparse_init = true;
        self
    }

    /// Make `sparse-checkout set` fail (builder pattern)
    #[must_use]
    pub fn failing_sparse_set(self) -> Self {
        self.state().fail_sparse_set = true;
        self
    }

    /// Every call made so far, rendered like the equivalent git command
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn io_failure(command: &str, err: &std::io::Error) -> GitFailure {
        GitFailure::new(command, err.to_string())
    }

    /// Whether `file` is materialized under a cone-mode restriction to `sparse`
    fn in_cone(file: &str, sparse: Option<&str>) -> bool {
        match sparse {
            None => true,
            // Cone mode always keeps files at the repository root
            Some(dir) => {
                !file.contains('/') || file.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

impl SparseGit for ScriptedGit {
    fn clone_without_checkout(&self, url: &str, destination: &Path) -> GitResult {
        let command = format!("git clone --no-checkout {url} {}", destination.display());
        let failure = {
            let mut state = self.state();
            state.calls.push(command.clone());
            state.clone_failure
        };

        match failure {
            Some(CloneFailure::Clean) => Err(GitFailure::new(
                command,
                format!("fatal: repository '{url}' not found"),
            )),
            Some(CloneFailure::Partial) => {
                self.system
                    .create_dir_all(&destination.join(".git"))
                    .map_err(|e| Self::io_failure(&command, &e))?;
                Err(GitFailure::new(
                    command,
                    "fatal: early EOF while receiving pack",
                ))
            }
            None => {
                let git_dir = destination.join(".git");
                self.system
                    .create_dir_all(&git_dir.join("info"))
                    .and_then(|()| self.system.write(&git_dir.join("HEAD"), b"ref: refs/heads/main\n"))
                    .map_err(|e| Self::io_failure(&command, &e))
            }
        }
    }

    fn enable_sparse_cone(&self, repo: &Path) -> GitResult {
        let command = "git sparse-checkout init --cone".to_owned();
        let mut state = self.state();
        state.calls.push(command.clone());
        if state.fail_sparse_init {
            return Err(GitFailure::new(command, "fatal: not a git repository"));
        }
        state.sparse.insert(repo.to_path_buf(), None);
        Ok(())
    }

    fn set_sparse_path(&self, repo: &Path, path: &str) -> GitResult {
        let command = format!("git sparse-checkout set {path}");
        {
            let mut state = self.state();
            state.calls.push(command.clone());
            if state.fail_sparse_set {
                return Err(GitFailure::new(
                    command,
                    format!("fatal: '{path}' is not a directory"),
                ));
            }
            state.sparse.insert(repo.to_path_buf(), Some(path.to_owned()));
        }

        self.system
            .write(
                &repo.join(".git/info/sparse-checkout"),
                format!("/*\n!/*/\n/{path}/\n").as_bytes(),
            )
            .map_err(|e| Self::io_failure(&command, &e))
    }

    fn checkout(&self, repo: &Path, branch: Option<&str>) -> GitResult {
        let command = match branch {
            Some(name) => format!("git checkout {name}"),
            None => "git checkout".to_owned(),
        };

        let (files, sparse) = {
            let mut state = self.state();
            state.calls.push(command.clone());

            let name = match branch {
                Some(name) => Some(name.to_owned()),
                None => state.default_branch.clone(),
            };
            let files = name.and_then(|n| state.branches.get(&n).cloned());
            let sparse = state.sparse.get(repo).cloned().flatten();
            (files, sparse)
        };

        let Some(files) = files else {
            return Err(GitFailure::new(
                command,
                format!(
                    "error: pathspec '{}' did not match any file(s) known to git",
                    branch.unwrap_or("HEAD")
                ),
            ));
        };

        for (file, contents) in files
            .iter()
            .filter(|(file, _)| Self::in_cone(file, sparse.as_deref()))
        {
            let path = repo.join(file);
            if let Some(parent) = path.parent() {
                self.system
                    .create_dir_all(parent)
                    .map_err(|e| Self::io_failure(&command, &e))?;
            }
            self.system
                .write(&path, contents.as_bytes())
                .map_err(|e| Self::io_failure(&command, &e))?;
        }

        Ok(())
    }
}

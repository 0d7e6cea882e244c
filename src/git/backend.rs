//! Capability interface over the version-control tool

use crate::error::GitFailure;
use std::path::Path;

/// Outcome of a single git capability call
pub type GitResult = Result<(), GitFailure>;

/// Git operations the extraction pipeline depends on
///
/// # Implementations
/// - `GitCli`: Production implementation running the `git` binary
/// - `ScriptedGit`: Test implementation over `MockSystem`
pub trait SparseGit: Send + Sync {
    /// Clone `url` into `destination` with history but no working files
    fn clone_without_checkout(&self, url: &str, destination: &Path) -> GitResult;

    /// Enable cone-mode sparse checkout inside `repo`
    fn enable_sparse_cone(&self, repo: &Path) -> GitResult;

    /// Restrict the sparse checkout of `repo` to exactly `path`
    fn set_sparse_path(&self, repo: &Path, path: &str) -> GitResult;

    /// Materialize files for `branch`, or for the remote default branch when `None`
    fn checkout(&self, repo: &Path, branch: Option<&str>) -> GitResult;
}

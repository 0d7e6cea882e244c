//! `git` command-line backend

use crate::error::{ExtractError, GitFailure};
use crate::git::backend::{GitResult, SparseGit};
use anyhow::{Context as _, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Oldest git release with `sparse-checkout --cone`
pub const MIN_GIT_VERSION: (u32, u32, u32) = (2, 25, 0);

/// Runs the `git` binary found on `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Check that git is available and new enough for cone-mode sparse checkout
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The Git command is not found
    /// - The Git command failed to execute properly
    /// - The Git version is too old
    #[inline]
    pub fn ensure_available(&self) -> Result<()> {
        let output = Command::new("git")
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                ExtractError::git(format!(
                    "Git command not found ({e}). Please ensure Git is installed and available in PATH"
                ))
            })?;

        if !output.status.success() {
            return Err(ExtractError::git("Git command failed to execute properly").into());
        }

        let version_output = String::from_utf8_lossy(&output.stdout);
        debug!("Detected {}", version_output.trim());

        // "git version 2.39.2 (Apple Git-143)" -> "2.39.2"
        if let Some(version_part) = version_output.split_whitespace().nth(2)
            && let Ok(version) = parse_git_version(version_part)
            && version < MIN_GIT_VERSION
        {
            return Err(ExtractError::git(format!(
                "Git version {version_part} is too old. Sparse extraction requires Git 2.25.0 or later"
            ))
            .into());
        }

        Ok(())
    }

    fn run(&self, args: &[&OsStr], cwd: Option<&Path>) -> GitResult {
        let rendered = format!(
            "git {}",
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        debug!("Running {rendered}");

        let mut command = Command::new("git");
        command
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .map_err(|e| GitFailure::new(rendered.clone(), e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            let details = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(GitFailure::new(rendered, details));
        }

        Ok(())
    }
}

impl SparseGit for GitCli {
    fn clone_without_checkout(&self, url: &str, destination: &Path) -> GitResult {
        self.run(
            &[
                OsStr::new("clone"),
                OsStr::new("--filter=blob:none"),
                OsStr::new("--no-checkout"),
                OsStr::new("--"),
                OsStr::new(url),
                destination.as_os_str(),
            ],
            None,
        )
    }

    fn enable_sparse_cone(&self, repo: &Path) -> GitResult {
        self.run(
            &[
                OsStr::new("sparse-checkout"),
                OsStr::new("init"),
                OsStr::new("--cone"),
            ],
            Some(repo),
        )
    }

    fn set_sparse_path(&self, repo: &Path, path: &str) -> GitResult {
        self.run(
            &[
                OsStr::new("sparse-checkout"),
                OsStr::new("set"),
                OsStr::new(path),
            ],
            Some(repo),
        )
    }

    fn checkout(&self, repo: &Path, branch: Option<&str>) -> GitResult {
        match branch {
            Some(name) => self.run(&[OsStr::new("checkout"), OsStr::new(name)], Some(repo)),
            None => self.run(&[OsStr::new("checkout")], Some(repo)),
        }
    }
}

/// Parse Git version string into tuple (major, minor, patch)
///
/// # Errors
///
/// Returns an error if:
/// - The version string is invalid
#[inline]
pub fn parse_git_version(version: &str) -> Result<(u32, u32, u32)> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() >= 3 {
        let major = parts[0].parse().context("Invalid major version")?;
        let minor = parts[1].parse().context("Invalid minor version")?;
        // "2.41.0.windows.1" and "2.45.0-rc1" keep only the leading digits
        let patch_digits: String = parts[2].chars().take_while(char::is_ascii_digit).collect();
        let patch = patch_digits.parse().context("Invalid patch version")?;
        Ok((major, minor, patch))
    } else {
        Err(anyhow::anyhow!("Invalid version format"))
    }
}

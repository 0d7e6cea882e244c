//! Temporary clone workspace with guaranteed cleanup

use crate::error::{ExtractError, Stage};
use crate::git::RepositoryName;
use crate::system::System;
use anyhow::Result;
use core::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Suffix that marks a directory as a sparsepick workspace
pub const WORKSPACE_SUFFIX: &str = "_temp_sparse_checkout";

/// Scratch clone owned by a single run
///
/// The directory is removed when the workspace is released or dropped,
/// whichever happens first, so every exit path cleans up.
pub struct Workspace<'sys> {
    path: PathBuf,
    system: &'sys dyn System,
}

impl<'sys> Workspace<'sys> {
    /// Claim `<parent>/<name>_temp_sparse_checkout` for this run
    ///
    /// A leftover directory with that name is removed first; each run starts
    /// from a fresh clone. Nothing is created here: the clone creates the
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A leftover workspace cannot be removed
    #[inline]
    pub fn acquire(system: &'sys dyn System, parent: &Path, name: &RepositoryName) -> Result<Self> {
        let path = parent.join(format!("{name}{WORKSPACE_SUFFIX}"));

        if system.exists(&path) {
            warn!(
                "Removing leftover workspace from an earlier run: {}",
                path.display()
            );
            system.remove_dir_all(&path).map_err(|e| {
                ExtractError::filesystem(Stage::Setup, format!(
                    "Cannot remove leftover workspace '{}': {e}",
                    path.display()
                ))
            })?;
        }

        Ok(Self { path, system })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.system.exists(&self.path)
    }

    /// Location of `subdirectory` inside the workspace
    #[must_use]
    pub fn subtree(&self, subdirectory: &str) -> PathBuf {
        subdirectory
            .split('/')
            .fold(self.path.clone(), |path, segment| path.join(segment))
    }

    /// Remove the workspace now, reporting failure
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The workspace directory exists but cannot be removed
    #[inline]
    pub fn release(self) -> Result<()> {
        // Drop repeats the removal, which is a no-op once the directory is gone
        self.remove()
    }

    fn remove(&self) -> Result<()> {
        if !self.exists() {
            return Ok(());
        }

        debug!("Removing workspace {}", self.path.display());
        self.system.remove_dir_all(&self.path).map_err(|e| {
            ExtractError::filesystem(Stage::Cleanup, format!(
                "Failed to remove workspace '{}': {e}",
                self.path.display()
            ))
        })?;
        Ok(())
    }

    /// Describe what the checkout actually materialized
    ///
    /// Useful when the requested subtree is missing.
    #[must_use]
    pub fn diagnostics(&self, subdirectory: &str) -> String {
        let mut report = String::new();

        writeln!(
            report,
            "Sparse checkout diagnostics:\n  Workspace: {}\n  Requested path: {subdirectory}",
            self.path.display()
        )
        .ok();

        report.push_str("  Checked out entries:\n");
        match self.system.read_dir(&self.path) {
            Ok(entries) => {
                let found: Vec<String> = entries
                    .iter()
                    .filter_map(|entry| entry.file_name())
                    .map(|name| name.to_string_lossy().into_owned())
                    .filter(|name| name != ".git")
                    .collect();

                if found.is_empty() {
                    report.push_str("    (empty - no files were checked out)\n");
                } else {
                    for item in found {
                        writeln!(report, "    - {item}").ok();
                    }
                }
            }
            Err(_) => report.push_str("    (unable to read directory)\n"),
        }

        let patterns = self.path.join(".git/info/sparse-checkout");
        if let Ok(content) = self.system.read_to_string(&patterns) {
            report.push_str("  Sparse-checkout patterns:\n");
            for line in content.lines() {
                writeln!(report, "    {line}").ok();
            }
        }

        report
    }
}

impl Drop for Workspace<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            error!("{e}");
        }
    }
}

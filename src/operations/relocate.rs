//! Moving the extracted subtree into the working directory

use crate::error::{ExtractError, Stage};
use crate::system::System;
use crate::utils::path::final_segment;
use anyhow::{Context as _, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where the extracted subtree ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationTarget {
    pub name: String,
    pub path: PathBuf,
}

impl DestinationTarget {
    /// Name the destination after the final segment of `subdirectory`
    ///
    /// # Errors
    ///
    /// Returns a usage error if `subdirectory` has no final segment
    #[inline]
    pub fn for_subdirectory(subdirectory: &str, working_dir: &Path) -> Result<Self> {
        let name = final_segment(subdirectory).ok_or_else(|| {
            ExtractError::usage(format!(
                "Cannot derive a destination name from '{subdirectory}'"
            ))
        })?;

        Ok(Self {
            name: name.to_owned(),
            path: working_dir.join(name),
        })
    }

    /// Fail if anything already occupies the destination
    ///
    /// # Errors
    ///
    /// Returns a destination collision error if an entry exists at the path
    #[inline]
    pub fn ensure_free(&self, system: &dyn System) -> Result<()> {
        if system.exists(&self.path) {
            return Err(ExtractError::destination_collision(&self.path).into());
        }
        Ok(())
    }
}

/// What the relocation step did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relocation {
    /// The subtree now lives at this path
    Moved(PathBuf),
    /// The expected subtree was absent; nothing was moved
    SourceMissing(PathBuf),
}

/// Move `source` to `target`, checking the destination first
///
/// # Errors
///
/// Returns an error if:
/// - The destination already exists
/// - The move fails
#[inline]
pub fn relocate(system: &dyn System, source: &Path, target: &DestinationTarget) -> Result<Relocation> {
    target.ensure_free(system)?;

    if !system.is_dir(source) {
        return Ok(Relocation::SourceMissing(source.to_path_buf()));
    }

    move_tree(system, source, &target.path)?;
    Ok(Relocation::Moved(target.path.clone()))
}

/// Rename `from` to `to`, copying when they are on different filesystems
///
/// A copy that fails partway is removed again, so `to` either holds the whole
/// subtree or does not exist.
fn move_tree(system: &dyn System, from: &Path, to: &Path) -> Result<()> {
    match system.rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                "Rename crosses filesystems, copying {} to {}",
                from.display(),
                to.display()
            );
            if let Err(e) = copy_tree(system, from, to) {
                if system.exists(to)
                    && let Err(cleanup) = system.remove_dir_all(to)
                {
                    warn!("Failed to remove partial copy {}: {cleanup}", to.display());
                }
                return Err(ExtractError::filesystem(
                    Stage::Relocation,
                    format!("Failed to copy {} to {}: {e:#}", from.display(), to.display()),
                )
                .into());
            }
            // The source sits inside the workspace, whose cleanup reports failures
            if let Err(e) = system.remove_dir_all(from) {
                warn!("Failed to remove source after copy {}: {e}", from.display());
            }
            Ok(())
        }
        Err(e) => Err(ExtractError::filesystem(
            Stage::Relocation,
            format!("Failed to move {} to {}: {e}", from.display(), to.display()),
        )
        .into()),
    }
}

/// Copy a directory recursively
fn copy_tree(system: &dyn System, source: &Path, target: &Path) -> Result<usize> {
    system
        .create_dir_all(target)
        .with_context(|| format!("Failed to create target directory: {}", target.display()))?;

    let mut files_copied = 0;

    for entry in system
        .walk_dir(source)
        .with_context(|| format!("Failed to read directory: {}", source.display()))?
    {
        let relative_path = entry
            .path
            .strip_prefix(source)
            .context("Failed to calculate relative path")?;
        let target_path = target.join(relative_path);

        if entry.is_dir {
            system.create_dir_all(&target_path).with_context(|| {
                format!("Failed to create directory: {}", target_path.display())
            })?;
        } else if entry.is_file {
            system.copy(&entry.path, &target_path).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    entry.path.display(),
                    target_path.display()
                )
            })?;
            files_copied += 1;
        } else {
            debug!("Skipping special file {}", entry.path.display());
        }
    }

    Ok(files_copied)
}

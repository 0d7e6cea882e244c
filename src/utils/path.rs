//! Path manipulation and validation utilities

use crate::error::ExtractError;
use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {
                // Skip '.' components
            }
            Component::ParentDir => {
                // Keep leading '..' so escapes stay visible to the caller
                if matches!(components.last(), None | Some(Component::ParentDir)) {
                    components.push(component);
                } else {
                    components.pop();
                }
            }
            _ => {
                components.push(component);
            }
        }
    }

    components.iter().collect()
}

/// Validate a path inside the repository and return its `/`-separated form
///
/// The result is the form handed to `git sparse-checkout set`.
///
/// # Errors
///
/// Returns a usage error if:
/// - The path is absolute
/// - The path escapes the repository root
/// - The path resolves to the repository root itself
pub fn repository_relative_path(path: &str) -> Result<String> {
    let path_obj = Path::new(path);

    if path_obj.has_root() {
        return Err(ExtractError::usage(format!(
            "Subdirectory must be relative to the repository root: '{path}'"
        ))
        .into());
    }

    let normalized = normalize_path(path_obj);
    let mut segments = Vec::new();

    for component in normalized.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            Component::ParentDir => {
                return Err(ExtractError::usage(format!(
                    "Subdirectory contains unsafe directory traversal: '{path}'"
                ))
                .into());
            }
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {
                return Err(ExtractError::usage(format!(
                    "Subdirectory must be relative to the repository root: '{path}'"
                ))
                .into());
            }
        }
    }

    if segments.is_empty() {
        return Err(ExtractError::usage(format!(
            "Subdirectory must name a directory inside the repository, not its root: '{path}'"
        ))
        .into());
    }

    Ok(segments.join("/"))
}

/// Final path segment of a `/`-separated repository path
#[must_use]
pub fn final_segment(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

//! Validated extraction request

use crate::error::ExtractError;
use crate::utils::path::repository_relative_path;
use anyhow::Result;

/// What to extract and from where
///
/// Constructed once from validated input and never mutated. Both fields are
/// non-empty; `subdirectory` is normalized to its `/`-separated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    repository_url: String,
    subdirectory: String,
}

impl ExtractionRequest {
    /// Validate raw input into a request
    ///
    /// # Errors
    ///
    /// Returns a usage error if:
    /// - The repository URL is empty
    /// - The subdirectory is empty, absolute, escapes the repository, or names
    ///   the repository root
    #[inline]
    pub fn new(repository_url: &str, subdirectory: &str) -> Result<Self> {
        let repository_url = repository_url.trim();
        if repository_url.is_empty() {
            return Err(ExtractError::usage("Repository URL cannot be empty").into());
        }

        let subdirectory = subdirectory.trim();
        if subdirectory.is_empty() {
            return Err(ExtractError::usage("Subdirectory path cannot be empty").into());
        }

        Ok(Self {
            repository_url: repository_url.to_owned(),
            subdirectory: repository_relative_path(subdirectory)?,
        })
    }

    #[must_use]
    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    #[must_use]
    pub fn subdirectory(&self) -> &str {
        &self.subdirectory
    }
}

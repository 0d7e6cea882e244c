//! Custom error types with exit codes

use core::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage an error was raised from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Stage {
    Validation,
    Setup,
    Clone,
    SparseConfig,
    Branch,
    Relocation,
    Cleanup,
}

impl fmt::Display for Stage {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::Validation => "validation",
            Self::Setup => "setup",
            Self::Clone => "clone",
            Self::SparseConfig => "sparse-config",
            Self::Branch => "branch",
            Self::Relocation => "relocation",
            Self::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Main error type for sparsepick operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExtractError {
    /// Usage Error - malformed invocation
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// Git Error - the git tool is missing or unusable
    #[error("Git error: {message}")]
    Git { message: String },

    /// Clone Error - repository unreachable or invalid
    #[error("Failed to clone repository '{url}': {details}")]
    Clone { url: String, details: String },

    /// Sparse Config Error - sparse checkout could not be configured
    #[error("Failed to configure sparse checkout for '{path}': {details}")]
    SparseConfig { path: String, details: String },

    /// Destination Collision Error - target name already taken
    #[error("Destination '{}' already exists; refusing to overwrite it", path.display())]
    DestinationCollision { path: PathBuf },

    /// Filesystem Error - file operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { stage: Stage, message: String },

    /// Nothing Extracted - strict mode and the run produced no destination
    #[error("Nothing extracted: {message}")]
    NothingExtracted { message: String },

    /// Interrupted - the run was cancelled by a signal
    #[error("Interrupted during {stage}")]
    Interrupted { stage: Stage },
}

impl ExtractError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Interrupted { .. } => 130,
            Self::Usage { .. }
            | Self::Git { .. }
            | Self::Clone { .. }
            | Self::SparseConfig { .. }
            | Self::DestinationCollision { .. }
            | Self::Filesystem { .. }
            | Self::NothingExtracted { .. } => 1,
        }
    }

    /// Get the pipeline stage that produced this error
    #[must_use]
    #[inline]
    pub const fn stage(&self) -> Stage {
        match *self {
            Self::Usage { .. } => Stage::Validation,
            Self::Git { .. } => Stage::Setup,
            Self::Clone { .. } => Stage::Clone,
            Self::SparseConfig { .. } => Stage::SparseConfig,
            Self::DestinationCollision { .. } | Self::NothingExtracted { .. } => Stage::Relocation,
            Self::Filesystem { stage, .. } | Self::Interrupted { stage } => stage,
        }
    }

    /// Create a usage error
    #[inline]
    pub fn usage<S: Into<String>>(message: S) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a git error
    #[inline]
    pub fn git<S: Into<String>>(message: S) -> Self {
        Self::Git {
            message: message.into(),
        }
    }

    /// Create a clone error
    #[inline]
    pub fn clone_failed<U: Into<String>, D: Into<String>>(url: U, details: D) -> Self {
        Self::Clone {
            url: url.into(),
            details: details.into(),
        }
    }

    /// Create a sparse configuration error
    #[inline]
    pub fn sparse_config<P: Into<String>, D: Into<String>>(path: P, details: D) -> Self {
        Self::SparseConfig {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create a destination collision error
    #[inline]
    pub fn destination_collision<P: Into<PathBuf>>(path: P) -> Self {
        Self::DestinationCollision { path: path.into() }
    }

    /// Create a filesystem error raised during `stage`
    #[inline]
    pub fn filesystem<S: Into<String>>(stage: Stage, message: S) -> Self {
        Self::Filesystem {
            stage,
            message: message.into(),
        }
    }

    /// Create an interrupted error observed during `stage`
    #[inline]
    pub const fn interrupted(stage: Stage) -> Self {
        Self::Interrupted { stage }
    }

    /// Create a nothing-extracted error
    #[inline]
    pub fn nothing_extracted<S: Into<String>>(message: S) -> Self {
        Self::NothingExtracted {
            message: message.into(),
        }
    }
}

/// Structured failure reported by a git capability call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{command}` failed: {details}")]
pub struct GitFailure {
    pub command: String,
    pub details: String,
}

impl GitFailure {
    #[inline]
    pub fn new<C: Into<String>, D: Into<String>>(command: C, details: D) -> Self {
        Self {
            command: command.into(),
            details: details.into(),
        }
    }
}

/// Non-fatal conditions collected while a run continues
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractWarning {
    /// Every branch candidate failed to check out
    #[error("Could not check out any branch (tried: {})", attempted.join(", "))]
    BranchResolution { attempted: Vec<String> },

    /// The requested subdirectory was not materialized
    #[error("Subdirectory '{path}' not found in the repository; nothing was extracted")]
    SubdirectoryMissing { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExtractError::usage("x").exit_code(), 1);
        assert_eq!(ExtractError::clone_failed("u", "d").exit_code(), 1);
        assert_eq!(ExtractError::sparse_config("p", "d").exit_code(), 1);
        assert_eq!(ExtractError::destination_collision("/a").exit_code(), 1);
        assert_eq!(ExtractError::nothing_extracted("x").exit_code(), 1);
        assert_eq!(ExtractError::interrupted(Stage::Clone).exit_code(), 130);
    }

    #[test]
    fn test_stages() {
        assert_eq!(ExtractError::usage("x").stage(), Stage::Validation);
        assert_eq!(ExtractError::clone_failed("u", "d").stage(), Stage::Clone);
        assert_eq!(
            ExtractError::sparse_config("p", "d").stage(),
            Stage::SparseConfig
        );
        assert_eq!(
            ExtractError::destination_collision("/a").stage(),
            Stage::Relocation
        );
        assert_eq!(Stage::SparseConfig.to_string(), "sparse-config");
    }

    #[test]
    fn test_stage_follows_failure_site() {
        assert_eq!(
            ExtractError::filesystem(Stage::Relocation, "Failed to move a to b").stage(),
            Stage::Relocation
        );
        assert_eq!(
            ExtractError::filesystem(Stage::Cleanup, "Failed to remove workspace").stage(),
            Stage::Cleanup
        );
        let interrupted = ExtractError::interrupted(Stage::Branch);
        assert_eq!(interrupted.stage(), Stage::Branch);
        assert_eq!(interrupted.to_string(), "Interrupted during branch");
    }

    #[test]
    fn test_warning_messages() {
        let warning = ExtractWarning::BranchResolution {
            attempted: vec!["main".to_owned(), "master".to_owned()],
        };
        assert_eq!(
            warning.to_string(),
            "Could not check out any branch (tried: main, master)"
        );

        let warning = ExtractWarning::SubdirectoryMissing {
            path: "services/api".to_owned(),
        };
        assert!(warning.to_string().contains("services/api"));
    }
}

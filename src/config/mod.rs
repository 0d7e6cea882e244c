//! Run configuration
//!
//! There is no configuration file: a run is described by an
//! `ExtractionRequest` plus `ExtractSettings` assembled from flags and
//! environment variables.

pub mod request;

pub use request::ExtractionRequest;

use crate::git::{BranchCandidate, branch_candidates};

/// Per-run knobs that do not change what is extracted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct ExtractSettings {
    /// Branch tried before the conventional fallbacks
    pub preferred_branch: Option<String>,
    /// Treat a run that extracted nothing as a failure
    pub strict: bool,
}

impl ExtractSettings {
    #[must_use]
    pub const fn new(preferred_branch: Option<String>, strict: bool) -> Self {
        Self {
            preferred_branch,
            strict,
        }
    }

    /// Ordered checkout candidates for this run
    #[must_use]
    pub fn branch_candidates(&self) -> Vec<BranchCandidate> {
        branch_candidates(self.preferred_branch.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_permissive() {
        let settings = ExtractSettings::default();
        assert!(!settings.strict);
        assert_eq!(settings.branch_candidates().len(), 3);
    }

    #[test]
    fn test_preferred_branch_is_first_candidate() {
        let settings = ExtractSettings::new(Some("release".to_owned()), true);
        assert_eq!(
            settings.branch_candidates().first(),
            Some(&BranchCandidate::Named("release".to_owned()))
        );
    }
}

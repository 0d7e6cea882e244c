use crate::config::{ExtractSettings, ExtractionRequest};
use anyhow::Result;
use clap::Parser;

/// Command-line arguments for sparsepick
#[derive(Parser, Debug, Clone)]
#[command(name = "sparsepick")]
#[command(about = "A CLI tool for extracting a single subdirectory from a Git repository")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Git repository URL (HTTPS, SSH, file:// or a local path)
    #[arg(value_name = "REPOSITORY_URL")]
    pub repository: String,

    /// Path of the subdirectory inside the repository, e.g. services/api
    #[arg(value_name = "SUBDIRECTORY")]
    pub subdirectory: String,

    /// Branch to try before falling back to main, master and the default branch
    #[arg(long, value_name = "BRANCH", env = "SPARSEPICK_BRANCH")]
    pub branch: Option<String>,

    /// Exit with an error when nothing was extracted
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Validate the positional arguments into an extraction request
    ///
    /// # Errors
    ///
    /// Returns a usage error if either positional argument is invalid
    #[inline]
    pub fn to_request(&self) -> Result<ExtractionRequest> {
        ExtractionRequest::new(&self.repository, &self.subdirectory)
    }

    #[must_use]
    #[inline]
    pub fn settings(&self) -> ExtractSettings {
        ExtractSettings::new(self.branch.clone(), self.strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_two_positionals() {
        let args =
            Args::try_parse_from(["sparsepick", "https://x/mono.git", "services/api"]).unwrap();
        assert_eq!(args.repository, "https://x/mono.git");
        assert_eq!(args.subdirectory, "services/api");
        assert!(!args.strict);
        assert_eq!(args.to_request().unwrap().subdirectory(), "services/api");
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let err = Args::try_parse_from(["sparsepick"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Args::try_parse_from(["sparsepick", "https://x/mono.git"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Args::try_parse_from(["sparsepick", "a", "b", "c"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "sparsepick",
            "--branch",
            "develop",
            "--strict",
            "-v",
            "https://x/mono.git",
            "lib",
        ])
        .unwrap();
        let settings = args.settings();
        assert_eq!(settings.preferred_branch.as_deref(), Some("develop"));
        assert!(settings.strict);
        assert!(args.verbose);
    }
}

//! Repository URL handling and short-name derivation

use core::fmt;

/// Fallback name when a URL has no usable final segment
const FALLBACK_NAME: &str = "repository";

/// Short name of a repository, derived from its URL
///
/// Only used to name the temporary workspace; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Derive the short name by dropping a trailing `.git` and any path prefix
    ///
    /// Handles HTTPS, SSH (`git@host:org/repo.git`), `file://` URLs and plain
    /// filesystem paths.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let trimmed = url.trim().trim_end_matches(['/', '\\']);
        let without_suffix = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        let without_suffix = without_suffix.trim_end_matches(['/', '\\']);

        let name = without_suffix
            .rsplit(['/', '\\', ':'])
            .next()
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .unwrap_or(FALLBACK_NAME);

        Self(name.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A remote repository as given on the command line
#[derive(Debug, Clone)]
pub struct Repository {
    url: String,
    name: RepositoryName,
}

impl Repository {
    /// Create a repository from its URL; the URL is handed to git unchanged
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            name: RepositoryName::from_url(url),
        }
    }

    /// Get the URL as provided
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_https_url() {
        assert_eq!(
            RepositoryName::from_url("https://github.com/myorg/mono-repo.git").as_str(),
            "mono-repo"
        );
        assert_eq!(
            RepositoryName::from_url("https://github.com/myorg/mono-repo").as_str(),
            "mono-repo"
        );
        assert_eq!(
            RepositoryName::from_url("https://github.com/myorg/mono-repo/").as_str(),
            "mono-repo"
        );
    }

    #[test]
    fn test_name_from_ssh_url() {
        assert_eq!(
            RepositoryName::from_url("git@github.com:myorg/mono-repo.git").as_str(),
            "mono-repo"
        );
        assert_eq!(
            RepositoryName::from_url("git@github.com:mono-repo.git").as_str(),
            "mono-repo"
        );
    }

    #[test]
    fn test_name_from_local_paths() {
        assert_eq!(
            RepositoryName::from_url("file:///srv/git/tools.git").as_str(),
            "tools"
        );
        assert_eq!(RepositoryName::from_url("../tools/").as_str(), "tools");
        assert_eq!(RepositoryName::from_url("tools.git").as_str(), "tools");
    }

    #[test]
    fn test_name_fallback() {
        assert_eq!(RepositoryName::from_url(".git").as_str(), "repository");
        assert_eq!(RepositoryName::from_url("..").as_str(), "repository");
        assert_eq!(RepositoryName::from_url("https://").as_str(), "repository");
    }

    #[test]
    fn test_repository_keeps_url_verbatim() {
        let repo = Repository::new("https://example.com/org/app.git");
        assert_eq!(repo.url(), "https://example.com/org/app.git");
        assert_eq!(repo.name().to_string(), "app");
    }
}

//! Branch candidate ordering and fallback checkout

use crate::git::backend::SparseGit;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use std::path::Path;
use tracing::{debug, info};

/// Conventional primary branch name
pub const PRIMARY_BRANCH: &str = "main";

/// Conventional legacy primary branch name
pub const LEGACY_PRIMARY_BRANCH: &str = "master";

/// One checkout attempt in the fallback order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchCandidate {
    /// A branch checked out by name
    Named(String),
    /// Whatever branch the remote's HEAD points to
    RemoteDefault,
}

impl BranchCandidate {
    /// Branch name passed to `git checkout`, if any
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::RemoteDefault => None,
        }
    }
}

impl fmt::Display for BranchCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::RemoteDefault => f.write_str("<default branch>"),
        }
    }
}

/// Build the ordered candidate list
///
/// `preferred` goes first when given; `main`, `master` and the remote default
/// follow. A preferred name equal to a conventional one is not tried twice.
#[must_use]
pub fn branch_candidates(preferred: Option<&str>) -> Vec<BranchCandidate> {
    let mut candidates = Vec::new();

    let named = preferred
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .into_iter()
        .chain([PRIMARY_BRANCH, LEGACY_PRIMARY_BRANCH]);

    for name in named {
        let candidate = BranchCandidate::Named(name.to_owned());
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    candidates.push(BranchCandidate::RemoteDefault);
    candidates
}

/// Result of walking the candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchResolution {
    /// The first candidate whose checkout succeeded
    Resolved(BranchCandidate),
    /// Every candidate failed; carries them in the order tried
    Unresolved { attempted: Vec<BranchCandidate> },
    /// The run was interrupted before a candidate succeeded
    Interrupted { attempted: Vec<BranchCandidate> },
}

/// Tries checkout candidates strictly in order, stopping at the first success
#[derive(Debug, Clone)]
pub struct BranchResolver {
    candidates: Vec<BranchCandidate>,
}

impl BranchResolver {
    #[must_use]
    pub const fn new(candidates: Vec<BranchCandidate>) -> Self {
        Self { candidates }
    }

    #[must_use]
    pub fn candidates(&self) -> &[BranchCandidate] {
        &self.candidates
    }

    /// Check out the first candidate that succeeds
    ///
    /// A failed attempt only advances to the next candidate; exhausting the
    /// list is reported as `Unresolved`, never as an error. Once `interrupted`
    /// is set no further candidate is tried.
    pub fn resolve(
        &self,
        git: &dyn SparseGit,
        repo: &Path,
        interrupted: &AtomicBool,
    ) -> BranchResolution {
        let mut attempted = Vec::new();

        for candidate in &self.candidates {
            if interrupted.load(Ordering::SeqCst) {
                debug!("Interrupted, not trying {candidate}");
                return BranchResolution::Interrupted { attempted };
            }

            debug!("Trying to check out {candidate}");
            attempted.push(candidate.clone());
            match git.checkout(repo, candidate.name()) {
                Ok(()) => {
                    info!("Checked out {candidate}");
                    return BranchResolution::Resolved(candidate.clone());
                }
                Err(failure) => debug!("Checkout of {candidate} failed: {failure}"),
            }
        }

        if interrupted.load(Ordering::SeqCst) {
            return BranchResolution::Interrupted { attempted };
        }
        BranchResolution::Unresolved { attempted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitFailure;
    use crate::git::backend::GitResult;
    use std::sync::{Arc, Mutex};

    /// Backend that only knows a fixed set of branches and records attempts
    struct BranchOnly {
        branches: Vec<&'static str>,
        default_works: bool,
        attempts: Mutex<Vec<Option<String>>>,
        interrupt_on_checkout: Option<Arc<AtomicBool>>,
    }

    impl SparseGit for BranchOnly {
        fn clone_without_checkout(&self, _url: &str, _destination: &Path) -> GitResult {
            Ok(())
        }

        fn enable_sparse_cone(&self, _repo: &Path) -> GitResult {
            Ok(())
        }

        fn set_sparse_path(&self, _repo: &Path, _path: &str) -> GitResult {
            Ok(())
        }

        fn checkout(&self, _repo: &Path, branch: Option<&str>) -> GitResult {
            self.attempts.lock().unwrap().push(branch.map(str::to_owned));
            if let Some(flag) = &self.interrupt_on_checkout {
                // SIGINT reaches git too, so the checkout dies with it
                flag.store(true, Ordering::SeqCst);
                return Err(GitFailure::new("git checkout", "killed by signal 2"));
            }
            let ok = match branch {
                Some(name) => self.branches.contains(&name),
                None => self.default_works,
            };
            if ok {
                Ok(())
            } else {
                Err(GitFailure::new("git checkout", "no such branch"))
            }
        }
    }

    fn backend(branches: Vec<&'static str>, default_works: bool) -> BranchOnly {
        BranchOnly {
            branches,
            default_works,
            attempts: Mutex::new(Vec::new()),
            interrupt_on_checkout: None,
        }
    }

    #[test]
    fn test_default_candidate_order() {
        assert_eq!(
            branch_candidates(None),
            vec![
                BranchCandidate::Named("main".to_owned()),
                BranchCandidate::Named("master".to_owned()),
                BranchCandidate::RemoteDefault,
            ]
        );
    }

    #[test]
    fn test_preferred_branch_goes_first_without_duplicates() {
        assert_eq!(
            branch_candidates(Some("develop")),
            vec![
                BranchCandidate::Named("develop".to_owned()),
                BranchCandidate::Named("main".to_owned()),
                BranchCandidate::Named("master".to_owned()),
                BranchCandidate::RemoteDefault,
            ]
        );
        assert_eq!(branch_candidates(Some("master")).len(), 3);
        assert_eq!(branch_candidates(Some("  ")).len(), 3);
    }

    #[test]
    fn test_resolve_stops_at_first_success() {
        let git = backend(vec!["main", "master"], true);
        let resolver = BranchResolver::new(branch_candidates(None));

        let resolution = resolver.resolve(&git, Path::new("/ws"), &AtomicBool::new(false));

        assert_eq!(
            resolution,
            BranchResolution::Resolved(BranchCandidate::Named("main".to_owned()))
        );
        assert_eq!(*git.attempts.lock().unwrap(), vec![Some("main".to_owned())]);
    }

    #[test]
    fn test_resolve_falls_back_to_master() {
        let git = backend(vec!["master"], true);
        let resolver = BranchResolver::new(branch_candidates(None));

        let resolution = resolver.resolve(&git, Path::new("/ws"), &AtomicBool::new(false));

        assert_eq!(
            resolution,
            BranchResolution::Resolved(BranchCandidate::Named("master".to_owned()))
        );
        assert_eq!(
            *git.attempts.lock().unwrap(),
            vec![Some("main".to_owned()), Some("master".to_owned())]
        );
    }

    #[test]
    fn test_resolve_falls_back_to_remote_default() {
        let git = backend(vec!["trunk"], true);
        let resolver = BranchResolver::new(branch_candidates(None));

        assert_eq!(
            resolver.resolve(&git, Path::new("/ws"), &AtomicBool::new(false)),
            BranchResolution::Resolved(BranchCandidate::RemoteDefault)
        );
        assert_eq!(git.attempts.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_resolve_reports_every_attempt_when_all_fail() {
        let git = backend(Vec::new(), false);
        let resolver = BranchResolver::new(branch_candidates(None));

        match resolver.resolve(&git, Path::new("/ws"), &AtomicBool::new(false)) {
            BranchResolution::Unresolved { attempted } => {
                assert_eq!(attempted, resolver.candidates());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_resolve_stops_trying_once_interrupted() {
        let flag = Arc::new(AtomicBool::new(false));
        let git = BranchOnly {
            interrupt_on_checkout: Some(Arc::clone(&flag)),
            ..backend(vec!["main", "master"], true)
        };
        let resolver = BranchResolver::new(branch_candidates(None));

        let resolution = resolver.resolve(&git, Path::new("/ws"), &flag);

        assert_eq!(
            resolution,
            BranchResolution::Interrupted {
                attempted: vec![BranchCandidate::Named("main".to_owned())]
            }
        );
        assert_eq!(*git.attempts.lock().unwrap(), vec![Some("main".to_owned())]);
    }

    #[test]
    fn test_resolve_tries_nothing_when_already_interrupted() {
        let git = backend(vec!["main"], true);
        let resolver = BranchResolver::new(branch_candidates(None));

        let resolution = resolver.resolve(&git, Path::new("/ws"), &AtomicBool::new(true));

        assert_eq!(
            resolution,
            BranchResolution::Interrupted {
                attempted: Vec::new()
            }
        );
        assert!(git.attempts.lock().unwrap().is_empty());
    }
}

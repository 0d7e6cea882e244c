//! Extraction pipeline coordination

use crate::config::{ExtractSettings, ExtractionRequest};
use crate::error::{ExtractError, ExtractWarning, Stage};
use crate::git::{BranchResolution, BranchResolver, Repository, SparseGit};
use crate::operations::relocate::{DestinationTarget, Relocation, relocate};
use crate::operations::workspace::Workspace;
use crate::system::System;
use crate::utils::progress::spinner;
use anyhow::Result;
use core::sync::atomic::{AtomicBool, Ordering};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a run that did not fail ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The subtree was moved to `destination`
    Extracted {
        destination: PathBuf,
        warnings: Vec<ExtractWarning>,
    },
    /// The run finished but produced no destination
    NothingExtracted { warnings: Vec<ExtractWarning> },
}

impl RunOutcome {
    #[must_use]
    pub fn warnings(&self) -> &[ExtractWarning] {
        match self {
            Self::Extracted { warnings, .. } | Self::NothingExtracted { warnings } => warnings,
        }
    }

    #[must_use]
    pub const fn destination(&self) -> Option<&PathBuf> {
        match self {
            Self::Extracted { destination, .. } => Some(destination),
            Self::NothingExtracted { .. } => None,
        }
    }
}

/// Coordinates one extraction from clone to cleanup
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "ExtractOperation")]
pub struct ExtractOperation<'src> {
    request: ExtractionRequest,
    settings: ExtractSettings,
    system: &'src dyn System,
    git: &'src dyn SparseGit,
    interrupted: Arc<AtomicBool>,
}

impl<'src> ExtractOperation<'src> {
    #[must_use]
    #[inline]
    pub fn new(
        request: ExtractionRequest,
        settings: ExtractSettings,
        system: &'src dyn System,
        git: &'src dyn SparseGit,
    ) -> Self {
        Self {
            request,
            settings,
            system,
            git,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Observe `flag` between stages (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = flag;
        self
    }

    /// Run the pipeline
    ///
    /// The workspace is removed on every path out of this function.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The working directory cannot be determined
    /// - The clone fails
    /// - Sparse checkout cannot be configured
    /// - The destination already exists or the move fails
    /// - The workspace cannot be removed
    /// - The run is interrupted
    /// - Strict mode is on and nothing was extracted
    #[inline]
    pub fn execute(&self) -> Result<RunOutcome> {
        let url = self.request.repository_url();
        let subdirectory = self.request.subdirectory();

        let working_dir = self.system.current_dir().map_err(|e| {
            ExtractError::filesystem(
                Stage::Setup,
                format!("Cannot determine working directory: {e}"),
            )
        })?;
        let repository = Repository::new(url);
        let target = DestinationTarget::for_subdirectory(subdirectory, &working_dir)?;
        debug!("Repository URL: {}", repository.url());
        debug!("Destination: {}", target.path.display());

        let workspace = Workspace::acquire(self.system, &working_dir, repository.name())?;
        self.check_interrupted(Stage::Setup)?;

        info!("Cloning {} ...", repository.url());
        let progress = spinner(&format!("Cloning {}", repository.name()));
        let cloned = self
            .git
            .clone_without_checkout(repository.url(), workspace.path());
        progress.finish_and_clear();
        // A clone killed by Ctrl-C fails too; report the interrupt instead
        self.check_interrupted(Stage::Clone)?;
        if let Err(failure) = cloned {
            return Err(ExtractError::clone_failed(url, failure.details).into());
        }

        debug!("Restricting checkout to {subdirectory}");
        let configured = self
            .git
            .enable_sparse_cone(workspace.path())
            .and_then(|()| self.git.set_sparse_path(workspace.path(), subdirectory));
        self.check_interrupted(Stage::SparseConfig)?;
        if let Err(failure) = configured {
            if let Err(e) = workspace.release() {
                warn!("{e}");
            }
            return Err(ExtractError::sparse_config(subdirectory, failure.to_string()).into());
        }

        let mut warnings = Vec::new();

        let resolver = BranchResolver::new(self.settings.branch_candidates());
        let progress = spinner("Checking out files");
        let resolution = resolver.resolve(self.git, workspace.path(), &self.interrupted);
        progress.finish_and_clear();
        match resolution {
            BranchResolution::Resolved(_) => {}
            BranchResolution::Unresolved { attempted } => {
                let warning = ExtractWarning::BranchResolution {
                    attempted: attempted.iter().map(ToString::to_string).collect(),
                };
                warn!("{warning}");
                warnings.push(warning);
            }
            BranchResolution::Interrupted { .. } => {
                return Err(ExtractError::interrupted(Stage::Branch).into());
            }
        }
        self.check_interrupted(Stage::Branch)?;

        let relocation = relocate(self.system, &workspace.subtree(subdirectory), &target)?;
        if let Relocation::SourceMissing(_) = relocation {
            let warning = ExtractWarning::SubdirectoryMissing {
                path: subdirectory.to_owned(),
            };
            warn!("{warning}");
            debug!("{}", workspace.diagnostics(subdirectory));
            warnings.push(warning);
        }

        workspace.release()?;

        match relocation {
            Relocation::Moved(destination) => Ok(RunOutcome::Extracted {
                destination,
                warnings,
            }),
            Relocation::SourceMissing(_) if self.settings.strict => {
                Err(ExtractError::nothing_extracted(format!(
                    "'{subdirectory}' was not extracted from {url}"
                ))
                .into())
            }
            Relocation::SourceMissing(_) => Ok(RunOutcome::NothingExtracted { warnings }),
        }
    }

    fn check_interrupted(&self, stage: Stage) -> Result<()> {
        if self.interrupted.load(Ordering::SeqCst) {
            return Err(ExtractError::interrupted(stage).into());
        }
        Ok(())
    }
}

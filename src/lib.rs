//! `sparsepick` - extract a single subdirectory from a remote Git repository
//!
//! The repository is cloned without checking out files, restricted to one
//! directory with cone-mode sparse checkout, checked out from the first
//! branch that works (`main`, `master`, then the remote default), and the
//! requested directory is moved into the working directory. The temporary
//! clone is removed on every exit path.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod operations;
pub mod system;
pub mod utils;

use anyhow::Result;
use cli::Args;
use core::sync::atomic::{AtomicBool, Ordering};
use git::GitCli;
use operations::{ExtractOperation, RunOutcome};
use std::sync::Arc;
use system::RealSystem;
use tracing::warn;

/// Main entry point for the sparsepick library
///
/// # Errors
///
/// Returns an error if:
/// - The arguments do not describe a valid extraction
/// - Git is missing or too old
/// - Any fatal pipeline stage fails
#[inline]
pub fn run(args: &Args) -> Result<RunOutcome> {
    let request = args.to_request()?;
    let settings = args.settings();

    let system = RealSystem::new();
    let git = GitCli::new();
    git.ensure_available()?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    }) {
        warn!("Could not install interrupt handler: {e}");
    }

    ExtractOperation::new(request, settings, &system, &git)
        .with_interrupt_flag(interrupted)
        .execute()
}

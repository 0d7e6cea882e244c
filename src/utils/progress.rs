//! Terminal progress indicators

use core::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner for long-running blocking steps
///
/// The spinner draws to stderr and stays hidden when stderr is not a terminal.
#[must_use]
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

//! Utility modules
//!
//! Path handling and terminal progress helpers

pub mod path;
pub mod progress;

pub use path::*;
pub use progress::*;

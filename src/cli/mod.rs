//! Command-line interface module
//!
//! Handles argument parsing and the usage contract

pub mod args;
pub mod commands;

pub use args::*;
pub use commands::*;

//! Git operations module
//!
//! Repository naming, the capability interface the pipeline drives, the real
//! `git` backend, a scripted backend for tests, and branch fallback.

pub mod backend;
pub mod branch;
pub mod command;
pub mod fake;
pub mod repository;

pub use backend::*;
pub use branch::*;
pub use command::*;
pub use fake::ScriptedGit;
pub use repository::*;

//! Operations module
//!
//! Coordinates an extraction: the scoped clone workspace, relocation of the
//! requested subtree, and the pipeline that ties the stages together

pub mod extract;
pub mod relocate;
pub mod workspace;

pub use extract::*;
pub use relocate::*;
pub use workspace::*;

//! Infrastructure layer: I/O implementations
//!
//! This layer implements the domain's I/O boundary traits.

pub mod source;

pub use source::DirectorySource;

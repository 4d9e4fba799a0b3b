//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic over the infrastructure's sources.

pub mod error;
pub mod preselect;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use preselect::Preselection;

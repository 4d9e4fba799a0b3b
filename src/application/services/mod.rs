//! Application services

pub mod selection;

pub use selection::{SelectionService, Toggle, TracingObserver};

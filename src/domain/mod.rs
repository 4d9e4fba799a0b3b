//! Domain layer: selection tree, propagation and flattening
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod assembly;
pub mod builder;
pub mod entities;
pub mod error;
pub mod natural;
pub mod observer;

pub use arena::{NodeData, SelectionTree, TreeNode};
pub use assembly::assemble;
pub use builder::{Flatten, HierarchySource, Listing, TreeBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use natural::natural_cmp;
pub use observer::{NoopObserver, SelectionObserver};

//! Hierarchical tri-state selection over a directory tree.
//!
//! A directory is flattened into pre-ordered [`domain::FlatEntry`] records
//! ([`domain::TreeBuilder`]), assembled into a [`domain::SelectionTree`]
//! ([`domain::assemble`]), and then edited through
//! [`domain::SelectionTree::set_state`], which cascades a new state to every
//! descendant and recomputes ancestors so that each inner node is checked,
//! unchecked or indeterminate according to its children.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

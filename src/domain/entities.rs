//! Domain entities: core data structures

use std::fmt;

use generational_arena::Index;

use crate::domain::error::DomainError;

/// Selection state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriState {
    Checked,
    Unchecked,
    /// Children disagree; only ever derived, never requested.
    Indeterminate,
}

impl TriState {
    /// Derive a parent's state from its children's states.
    ///
    /// Returns `None` when there are no children: a leaf keeps its own state.
    pub fn aggregate<I>(states: I) -> Option<TriState>
    where
        I: IntoIterator<Item = TriState>,
    {
        let mut result = None;
        for state in states {
            result = match (result, state) {
                (_, TriState::Indeterminate) => return Some(TriState::Indeterminate),
                (None, s) => Some(s),
                (Some(prev), s) if prev == s => Some(prev),
                (Some(_), _) => return Some(TriState::Indeterminate),
            };
        }
        result
    }

    /// Checkbox marker used when rendering.
    pub fn marker(self) -> &'static str {
        match self {
            TriState::Checked => "[x]",
            TriState::Unchecked => "[ ]",
            TriState::Indeterminate => "[-]",
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TriState::Checked => "checked",
            TriState::Unchecked => "unchecked",
            TriState::Indeterminate => "indeterminate",
        };
        write!(f, "{}", s)
    }
}

/// A state a caller may request for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Checked,
    Unchecked,
}

impl From<Selection> for TriState {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::Checked => TriState::Checked,
            Selection::Unchecked => TriState::Unchecked,
        }
    }
}

impl From<bool> for Selection {
    fn from(checked: bool) -> Self {
        if checked {
            Selection::Checked
        } else {
            Selection::Unchecked
        }
    }
}

impl TryFrom<TriState> for Selection {
    type Error = DomainError;

    fn try_from(state: TriState) -> Result<Self, Self::Error> {
        match state {
            TriState::Checked => Ok(Selection::Checked),
            TriState::Unchecked => Ok(Selection::Unchecked),
            TriState::Indeterminate => Err(DomainError::InvalidStateRequest(state)),
        }
    }
}

/// Whether an entry can hold children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Directory
    Container,
    /// File
    Leaf,
}

/// One record of a flattened hierarchy, emitted in pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    pub name: String,
    /// Distance from the root (root = 0)
    pub depth: usize,
    /// Sibling counter scoped to the emitting level; not unique across the tree
    pub parent_index: usize,
    /// Unique id in emission order (root = 0)
    pub id: usize,
    /// Id of the enclosing entry, None for the root
    pub parent_id: Option<usize>,
    pub kind: EntryKind,
}

impl fmt::Display for FlatEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", "  ".repeat(self.depth), self.name)?;
        if self.kind == EntryKind::Container {
            write!(f, "/")?;
        }
        Ok(())
    }
}

/// A node whose state actually changed during one propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub node: Index,
    pub previous: TriState,
    pub current: TriState,
}

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::domain::entities::{EntryKind, Selection, StateChange, TriState};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::observer::SelectionObserver;

/// Data payload for tree nodes representing filesystem entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Display name of the entry
    pub caption: String,
    /// Directory or file
    pub kind: EntryKind,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.caption)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Entry data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in display order
    pub children: Vec<Index>,
    state: TriState,
}

impl TreeNode {
    pub fn state(&self) -> TriState {
        self.state
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based selection tree.
///
/// Nodes reference their parent by index, so upward walks are O(1) per step
/// without any reference cycles. The structure is fixed after assembly; only
/// states and captions change afterwards.
#[derive(Debug)]
pub struct SelectionTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for SelectionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Adds a node below `parent`, or as the root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
            state: TriState::Unchecked,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    /// Primes every node's state once after assembly: leaves from the predicate,
    /// inner nodes from their children. Emits no notifications.
    #[instrument(level = "debug", skip(self, is_preselected))]
    pub(crate) fn initialize<F>(&mut self, is_preselected: F)
    where
        F: Fn(&str) -> bool,
    {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in order {
            let state = match self.derived_state(idx) {
                Some(state) => state,
                None => Selection::from(is_preselected(&self.arena[idx].data.caption)).into(),
            };
            self.arena[idx].state = state;
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn state_of(&self, idx: Index) -> Option<TriState> {
        self.get_node(idx).map(TreeNode::state)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Number of levels, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();

        while let Some((idx, level)) = stack.pop() {
            max_depth = max_depth.max(level);
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.children.iter().map(|&child| (child, level + 1)));
            }
        }
        max_depth
    }

    /// Paths of all leaf nodes in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.leaves_where(|_| true)
    }

    /// Paths of all checked leaves in pre-order: the batch the user picked.
    #[instrument(level = "debug", skip(self))]
    pub fn selected_leaves(&self) -> Vec<String> {
        self.leaves_where(|node| node.state == TriState::Checked)
    }

    fn leaves_where<P>(&self, predicate: P) -> Vec<String>
    where
        P: Fn(&TreeNode) -> bool,
    {
        self.iter()
            .filter(|&(_, node)| node.is_leaf() && predicate(node))
            .filter_map(|(idx, _)| self.path_of(idx))
            .collect()
    }

    /// Slash-joined captions below the root; the root itself is `""`.
    pub fn path_of(&self, idx: Index) -> Option<String> {
        let mut segments = Vec::new();
        let mut cursor = self.get_node(idx)?;
        while let Some(parent) = cursor.parent {
            segments.push(cursor.data.caption.as_str());
            cursor = self.get_node(parent)?;
        }
        segments.reverse();
        Some(segments.join("/"))
    }

    /// Resolves a path produced by [`SelectionTree::path_of`].
    ///
    /// Segments are separated by `/` only; any other character, backslash included,
    /// belongs to a caption. Empty segments are ignored, so `""`, `"/"` and `"."`
    /// all name the root.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, path: &str) -> Option<Index> {
        let mut current = self.root?;
        for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            let node = self.get_node(current)?;
            current = node
                .children
                .iter()
                .copied()
                .find(|&child| self.arena[child].data.caption == segment)?;
        }
        Some(current)
    }

    /// Sets a node's state and keeps the whole tree consistent.
    ///
    /// Cascades the new state to every descendant, then recomputes ancestors
    /// bottom-up until one of them does not change. Returns every node whose
    /// state changed, the target first, each node at most once.
    #[instrument(level = "debug", skip(self))]
    pub fn set_state(&mut self, idx: Index, selection: Selection) -> DomainResult<Vec<StateChange>> {
        let new_state = TriState::from(selection);
        let current = self.state_of(idx).ok_or(DomainError::UnknownNode)?;
        if current == new_state {
            trace!("state unchanged, nothing to propagate");
            return Ok(Vec::new());
        }

        let mut changes = Vec::new();

        // Downward cascade. A descendant already in the new state heads a uniform subtree.
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            let node = &mut self.arena[i];
            if i != idx && node.state == new_state {
                continue;
            }
            changes.push(StateChange {
                node: i,
                previous: node.state,
                current: new_state,
            });
            node.state = new_state;
            stack.extend(node.children.iter().rev().copied());
        }

        // Upward recomputation.
        let mut cursor = self.arena[idx].parent;
        while let Some(p) = cursor {
            let previous = self.arena[p].state;
            let derived = self.derived_state(p).unwrap_or(previous);
            if derived == previous {
                break;
            }
            self.arena[p].state = derived;
            changes.push(StateChange {
                node: p,
                previous,
                current: derived,
            });
            cursor = self.arena[p].parent;
        }

        debug!(changed = changes.len(), "propagated");
        Ok(changes)
    }

    /// [`SelectionTree::set_state`] followed by one notification per changed node.
    pub fn apply<O>(
        &mut self,
        idx: Index,
        selection: Selection,
        observer: &mut O,
    ) -> DomainResult<Vec<StateChange>>
    where
        O: SelectionObserver + ?Sized,
    {
        let changes = self.set_state(idx, selection)?;
        for change in &changes {
            let caption = &self.arena[change.node].data.caption;
            observer.on_state_changed(change.node, caption, change.current);
        }
        Ok(changes)
    }

    /// Runtime entry point for callers holding a [`TriState`]; rejects Indeterminate.
    pub fn request_state<O>(
        &mut self,
        idx: Index,
        state: TriState,
        observer: &mut O,
    ) -> DomainResult<Vec<StateChange>>
    where
        O: SelectionObserver + ?Sized,
    {
        let selection = Selection::try_from(state)?;
        self.apply(idx, selection, observer)
    }

    /// Renames a node; notifies only when the caption actually changes.
    pub fn set_caption<O>(
        &mut self,
        idx: Index,
        caption: impl Into<String>,
        observer: &mut O,
    ) -> DomainResult<bool>
    where
        O: SelectionObserver + ?Sized,
    {
        let caption = caption.into();
        let node = self.arena.get_mut(idx).ok_or(DomainError::UnknownNode)?;
        if node.data.caption == caption {
            return Ok(false);
        }
        node.data.caption = caption;
        observer.on_caption_changed(idx, &node.data.caption);
        Ok(true)
    }

    /// State implied by the children, None for a leaf.
    fn derived_state(&self, idx: Index) -> Option<TriState> {
        let node = &self.arena[idx];
        TriState::aggregate(node.children.iter().map(|&child| self.arena[child].state))
    }

    /// Checks structure and tri-state rules on every node.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self) -> DomainResult<()> {
        let malformed = |msg: String| Err(DomainError::MalformedHierarchy(msg));

        let Some(root) = self.root else {
            return if self.arena.is_empty() {
                Ok(())
            } else {
                malformed("nodes without a root".to_string())
            };
        };
        if self.arena[root].parent.is_some() {
            return malformed("root has a parent".to_string());
        }

        let mut reached = 0;
        for (idx, node) in self.iter() {
            reached += 1;
            for &child in &node.children {
                if self.get_node(child).and_then(|c| c.parent) != Some(idx) {
                    return malformed(format!("child of '{}' points elsewhere", node.data));
                }
            }
            match self.derived_state(idx) {
                None if node.state == TriState::Indeterminate => {
                    return malformed(format!("leaf '{}' is indeterminate", node.data));
                }
                Some(expected) if expected != node.state => {
                    return malformed(format!(
                        "'{}' is {} but its children make it {}",
                        node.data, node.state, expected
                    ));
                }
                _ => {}
            }
        }
        if reached != self.arena.len() {
            return malformed(format!(
                "{} of {} nodes unreachable from the root",
                self.arena.len() - reached,
                self.arena.len()
            ));
        }
        Ok(())
    }
}

pub struct TreeIterator<'a> {
    tree: &'a SelectionTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a SelectionTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.tree.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev().copied());
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a SelectionTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a SelectionTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

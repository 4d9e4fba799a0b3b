//! Assembles flat entries into a [`SelectionTree`].

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, SelectionTree};
use crate::domain::entities::FlatEntry;
use crate::domain::error::{DomainError, DomainResult};

/// Build a selection tree from pre-ordered entries.
///
/// Entries link to their parent by `parent_id`, so any depth works. Leaves start
/// checked when `is_preselected` accepts their name; inner nodes are derived from
/// their children. No partial tree is ever returned.
#[instrument(level = "debug", skip_all)]
pub fn assemble<I, F>(entries: I, is_preselected: F) -> DomainResult<SelectionTree>
where
    I: IntoIterator<Item = FlatEntry>,
    F: Fn(&str) -> bool,
{
    let malformed = |msg: String| DomainError::MalformedHierarchy(msg);

    let mut tree = SelectionTree::new();
    // id -> (arena index, depth)
    let mut seen: HashMap<usize, (Index, usize)> = HashMap::new();

    for entry in entries {
        if seen.contains_key(&entry.id) {
            return Err(malformed(format!("duplicate id {} ('{}')", entry.id, entry.name)));
        }

        let parent = match (entry.depth, entry.parent_id) {
            (0, None) if tree.root().is_none() => None,
            (0, None) => {
                return Err(malformed(format!("second root '{}'", entry.name)));
            }
            (0, Some(_)) => {
                return Err(malformed(format!("root '{}' has a parent", entry.name)));
            }
            (_, _) if tree.root().is_none() => {
                return Err(malformed(format!("'{}' appears before the root", entry.name)));
            }
            (depth, Some(parent_id)) => {
                let &(parent_idx, parent_depth) = seen.get(&parent_id).ok_or_else(|| {
                    malformed(format!("'{}' references unknown parent {}", entry.name, parent_id))
                })?;
                if parent_depth + 1 != depth {
                    return Err(malformed(format!(
                        "'{}' at depth {} under parent at depth {}",
                        entry.name, depth, parent_depth
                    )));
                }
                Some(parent_idx)
            }
            (_, None) => {
                return Err(malformed(format!("'{}' has no parent", entry.name)));
            }
        };

        let idx = tree.insert_node(
            NodeData {
                caption: entry.name,
                kind: entry.kind,
            },
            parent,
        );
        seen.insert(entry.id, (idx, entry.depth));
    }

    if tree.root().is_none() {
        return Err(malformed("no root entry".to_string()));
    }

    tree.initialize(is_preselected);
    debug!(nodes = tree.len(), depth = tree.depth(), "assembled");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EntryKind, TriState};

    fn entry(id: usize, name: &str, depth: usize, parent_id: Option<usize>) -> FlatEntry {
        FlatEntry {
            name: name.to_string(),
            depth,
            parent_index: 0,
            id,
            parent_id,
            kind: EntryKind::Leaf,
        }
    }

    #[test]
    fn given_entry_before_root_when_assembling_then_malformed() {
        let entries = vec![entry(1, "child", 1, Some(0)), entry(0, "root", 0, None)];
        assert!(matches!(
            assemble(entries, |_| false),
            Err(DomainError::MalformedHierarchy(_))
        ));
    }

    #[test]
    fn given_depth_gap_when_assembling_then_malformed() {
        let entries = vec![entry(0, "root", 0, None), entry(1, "deep", 2, Some(0))];
        assert!(matches!(
            assemble(entries, |_| false),
            Err(DomainError::MalformedHierarchy(_))
        ));
    }

    #[test]
    fn given_duplicate_id_when_assembling_then_malformed() {
        let entries = vec![entry(0, "root", 0, None), entry(0, "again", 1, Some(0))];
        assert!(matches!(
            assemble(entries, |_| false),
            Err(DomainError::MalformedHierarchy(_))
        ));
    }

    #[test]
    fn given_root_only_when_assembling_then_root_is_leaf_with_predicate_state() {
        let tree = assemble(vec![entry(0, "movie.mp4", 0, None)], |n| n.ends_with(".mp4")).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.state_of(root), Some(TriState::Checked));
    }
}

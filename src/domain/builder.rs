//! Tree builder: flattens a hierarchical source into pre-ordered entries.

use std::fmt::Debug;

use tracing::{instrument, trace, warn};

use crate::domain::entities::{EntryKind, FlatEntry};
use crate::domain::error::DomainResult;
use crate::domain::natural::natural_cmp;

/// Immediate children of one container, unsorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<N> {
    /// Child containers with their names
    pub containers: Vec<(String, N)>,
    /// Names of child leaves
    pub leaves: Vec<String>,
}

impl<N> Default for Listing<N> {
    fn default() -> Self {
        Self {
            containers: Vec::new(),
            leaves: Vec::new(),
        }
    }
}

/// Anything that can enumerate a hierarchy one level at a time.
pub trait HierarchySource {
    /// Handle for a container (a directory path for the filesystem).
    type Node: Clone + Debug;

    /// Display name of a container.
    fn name(&self, node: &Self::Node) -> String;

    /// Immediate child containers and leaves of `node`.
    ///
    /// Fails with `SourceUnavailable` when the container cannot be read.
    fn list(&self, node: &Self::Node) -> DomainResult<Listing<Self::Node>>;
}

/// Pending work on the traversal stack.
enum Frame<N> {
    Container {
        node: N,
        name: String,
        depth: usize,
        parent_index: usize,
        parent_id: Option<usize>,
    },
    Leaf {
        name: String,
        depth: usize,
        parent_index: usize,
        parent_id: usize,
    },
}

/// Constructs the flat, pre-ordered entry sequence for a source.
pub struct TreeBuilder;

impl TreeBuilder {
    /// Lazily walk `root` depth-first.
    ///
    /// Subdirectories (and their subtrees) come before files at each level, both in
    /// natural order. The walk stops at the first unreadable container: that error is
    /// yielded once and the iterator is exhausted afterwards.
    #[instrument(level = "debug", skip(source))]
    pub fn flatten<S>(source: &S, root: S::Node) -> Flatten<'_, S>
    where
        S: HierarchySource,
    {
        let name = source.name(&root);
        Flatten {
            source,
            stack: vec![Frame::Container {
                node: root,
                name,
                depth: 0,
                parent_index: 0,
                parent_id: None,
            }],
            next_id: 0,
            failed: false,
        }
    }
}

/// Single-pass iterator returned by [`TreeBuilder::flatten`].
pub struct Flatten<'a, S: HierarchySource> {
    source: &'a S,
    stack: Vec<Frame<S::Node>>,
    next_id: usize,
    failed: bool,
}

impl<S: HierarchySource> Flatten<'_, S> {
    fn allocate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue the children of a container so they pop in display order.
    fn schedule_children(
        &mut self,
        node: &S::Node,
        depth: usize,
        parent_index: usize,
        id: usize,
    ) -> DomainResult<()> {
        let Listing {
            mut containers,
            mut leaves,
        } = self.source.list(node)?;
        containers.sort_by(|a, b| natural_cmp(&a.0, &b.0));
        leaves.sort_by(|a, b| natural_cmp(a, b));

        // Leaves carry the counter value left after all subdirectories.
        let leaf_index = parent_index + containers.len();
        for name in leaves.into_iter().rev() {
            self.stack.push(Frame::Leaf {
                name,
                depth: depth + 1,
                parent_index: leaf_index,
                parent_id: id,
            });
        }
        for (offset, (name, child)) in containers.into_iter().enumerate().rev() {
            self.stack.push(Frame::Container {
                node: child,
                name,
                depth: depth + 1,
                parent_index: parent_index + offset,
                parent_id: Some(id),
            });
        }
        Ok(())
    }
}

impl<S: HierarchySource> Iterator for Flatten<'_, S> {
    type Item = DomainResult<FlatEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let entry = match self.stack.pop()? {
            Frame::Leaf {
                name,
                depth,
                parent_index,
                parent_id,
            } => FlatEntry {
                name,
                depth,
                parent_index,
                id: self.allocate_id(),
                parent_id: Some(parent_id),
                kind: EntryKind::Leaf,
            },
            Frame::Container {
                node,
                name,
                depth,
                parent_index,
                parent_id,
            } => {
                let id = self.allocate_id();
                if let Err(e) = self.schedule_children(&node, depth, parent_index, id) {
                    warn!(error = %e, "aborting walk");
                    self.failed = true;
                    self.stack.clear();
                    return Some(Err(e));
                }
                FlatEntry {
                    name,
                    depth,
                    parent_index,
                    id,
                    parent_id,
                    kind: EntryKind::Container,
                }
            }
        };
        trace!(
            name = %entry.name,
            depth = entry.depth,
            parent_index = entry.parent_index,
            "entry"
        );
        Some(Ok(entry))
    }
}

impl<S: HierarchySource> std::iter::FusedIterator for Flatten<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// In-memory hierarchy keyed by slash path; containers end with '/'.
    struct MapSource {
        dirs: HashMap<String, Listing<String>>,
    }

    impl MapSource {
        fn new(spec: &[(&str, &[&str], &[&str])]) -> Self {
            let dirs = spec
                .iter()
                .map(|(dir, subdirs, files)| {
                    let listing = Listing {
                        containers: subdirs
                            .iter()
                            .map(|s| (s.to_string(), format!("{}/{}", dir, s)))
                            .collect(),
                        leaves: files.iter().map(|f| f.to_string()).collect(),
                    };
                    (dir.to_string(), listing)
                })
                .collect();
            Self { dirs }
        }
    }

    impl HierarchySource for MapSource {
        type Node = String;

        fn name(&self, node: &String) -> String {
            node.rsplit('/').next().unwrap_or_default().to_string()
        }

        fn list(&self, node: &String) -> DomainResult<Listing<String>> {
            self.dirs
                .get(node)
                .cloned()
                .ok_or_else(|| DomainError::SourceUnavailable {
                    path: PathBuf::from(node),
                    reason: "missing".to_string(),
                })
        }
    }

    #[test]
    fn given_nested_source_when_flattening_then_preorder_dirs_before_files() {
        let source = MapSource::new(&[
            ("root", &["d10", "d2"], &["z.txt", "a.txt"]),
            ("root/d2", &[], &["f1"]),
            ("root/d10", &[], &[]),
        ]);

        let entries: Vec<FlatEntry> = TreeBuilder::flatten(&source, "root".to_string())
            .collect::<DomainResult<_>>()
            .unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["root", "d2", "f1", "d10", "a.txt", "z.txt"]);
        let depths: Vec<_> = entries.iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 1, 1]);
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        let parents: Vec<_> = entries.iter().map(|e| e.parent_id).collect();
        assert_eq!(parents, vec![None, Some(0), Some(1), Some(0), Some(0), Some(0)]);
    }

    #[test]
    fn given_sibling_dirs_when_flattening_then_local_counter_increments() {
        let source = MapSource::new(&[
            ("root", &["a", "b"], &["f"]),
            ("root/a", &[], &["a1"]),
            ("root/b", &[], &["b1"]),
        ]);

        let entries: Vec<FlatEntry> = TreeBuilder::flatten(&source, "root".to_string())
            .collect::<DomainResult<_>>()
            .unwrap();

        let counters: Vec<_> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.parent_index))
            .collect();
        assert_eq!(
            counters,
            vec![("root", 0), ("a", 0), ("a1", 0), ("b", 1), ("b1", 1), ("f", 2)]
        );
    }

    #[test]
    fn given_unreadable_subtree_when_flattening_then_single_error_and_fused() {
        let source = MapSource::new(&[("root", &["gone"], &["f"])]);

        let mut walk = TreeBuilder::flatten(&source, "root".to_string());
        assert!(walk.next().unwrap().is_ok());
        assert!(matches!(
            walk.next(),
            Some(Err(DomainError::SourceUnavailable { .. }))
        ));
        assert!(walk.next().is_none());
        assert!(walk.next().is_none());
    }
}

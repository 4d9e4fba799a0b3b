/*
Rendering of the selection tree for terminals.
termtree::Tree lives outside this crate, so the conversion is a trait implemented
for our tree rather than an inherent impl on theirs.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::{EntryKind, SelectionTree, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn label(node: &TreeNode) -> String {
    let suffix = match node.data.kind {
        EntryKind::Container => "/",
        EntryKind::Leaf => "",
    };
    format!("{} {}{}", node.state().marker(), node.data.caption, suffix)
}

impl TreeNodeConvert for SelectionTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        // Post-order: a node's finished children are the last entries on the stack.
        let mut finished: Vec<Tree<String>> = Vec::new();
        for (_, node) in self.iter_postorder() {
            let start = finished.len() - node.children.len();
            let leaves: Vec<Tree<String>> = finished.drain(start..).collect();
            finished.push(Tree::new(label(node)).with_leaves(leaves));
        }
        finished
            .pop()
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

//! Depth-first traversal and predicate search over decoded UI trees
//!
//! Predicates receive `(node, parent)`. Top-level nodes get a parent whose
//! attributes are all empty (`Node::default()`).

use crate::error::{AdbError, Result};
use crate::uixml::hierarchy::{Hierarchy, Node};

/// Visit `node` and every descendant in preorder, left to right
///
/// `parent` is handed to the visitor alongside `node` itself; each child is
/// then visited with its own parent. The whole subtree is always visited.
pub fn walk<'a: 'p, 'p, F>(node: &'a Node, parent: &'p Node, mut visit: F)
where
    F: FnMut(&'a Node, &'p Node),
{
    // Explicit stack so deep dumps can't overflow the call stack.
    let mut stack = vec![(node, parent)];

    while let Some((current, current_parent)) = stack.pop() {
        visit(current, current_parent);
        for child in current.children.iter().rev() {
            stack.push((child, current));
        }
    }
}

/// Collect every node under `root` (inclusive) accepted by `predicate`
pub fn find_all_in<'a: 'p, 'p, F>(
    root: &'a Node,
    parent: &'p Node,
    mut predicate: F,
) -> Vec<&'a Node>
where
    F: FnMut(&Node, &Node) -> bool,
{
    let mut out = Vec::new();
    walk(root, parent, |n, pn| {
        if predicate(n, pn) {
            out.push(n);
        }
    });
    out
}

impl Hierarchy {
    /// First match, taken per top-level subtree
    ///
    /// Each top-level subtree is searched in full. Only the first match of a
    /// subtree is considered: if it is a placeholder (empty class name) the
    /// remaining matches of that subtree are skipped and the search moves on to
    /// the next top-level node.
    pub fn find<F>(&self, mut predicate: F) -> Result<&Node>
    where
        F: FnMut(&Node, &Node) -> bool,
    {
        let no_parent = Node::default();
        for node in &self.nodes {
            let matches = find_all_in(node, &no_parent, &mut predicate);
            if let Some(&first) = matches.first() {
                if !first.is_placeholder() {
                    return Ok(first);
                }
            }
        }
        Err(AdbError::NotFound)
    }

    /// All matches across the tree in document order; empty when none match
    pub fn find_all<F>(&self, mut predicate: F) -> Vec<&Node>
    where
        F: FnMut(&Node, &Node) -> bool,
    {
        let no_parent = Node::default();
        let mut out = Vec::new();
        for node in &self.nodes {
            out.extend(find_all_in(node, &no_parent, &mut predicate));
        }
        out
    }

    /// Like [`Hierarchy::find_all`], but no match is a `NotFound` error
    pub fn find_nodes<F>(&self, predicate: F) -> Result<Vec<&Node>>
    where
        F: FnMut(&Node, &Node) -> bool,
    {
        let nodes = self.find_all(predicate);
        if nodes.is_empty() {
            return Err(AdbError::NotFound);
        }
        Ok(nodes)
    }

    /// Clickable node whose content description is exactly `name`
    pub fn find_button(&self, name: &str) -> Result<&Node> {
        self.find(|n, _| n.content_desc == name && n.clickable == "true")
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(Node::subtree_size).sum()
    }
}

impl Node {
    /// This node plus all of its descendants
    pub fn subtree_size(&self) -> usize {
        let mut size = 0;
        walk(self, self, |_, _| size += 1);
        size
    }
}

//! Tree-to-list conversion for list-style rendering.

use std::collections::HashSet;

use crate::models::{FlatNode, ResourceNode};

/// Dedup key used when a record arrives with an empty code.
const FALLBACK_KEY: &str = "0";

/// Flatten one resolved tree into a leveled pre-order list.
pub fn flatten(root: &ResourceNode) -> Vec<FlatNode> {
    flatten_forest(std::slice::from_ref(root))
}

/// Flatten a root set into a single leveled pre-order list.
///
/// The dedup set is shared across the whole forest: exactly one entry is
/// emitted per code, and a node seen twice keeps only its first
/// occurrence's subtree. Entries start collapsed. An explicit stack
/// bounds the walk for arbitrarily deep or wide trees.
pub fn flatten_forest(roots: &[ResourceNode]) -> Vec<FlatNode> {
    let mut result: Vec<FlatNode> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    // (node, level, index of the parent's flat entry)
    let mut stack: Vec<(&ResourceNode, usize, Option<usize>)> = Vec::new();
    for root in roots.iter().rev() {
        stack.push((root, 0, None));
    }

    while let Some((node, level, parent)) = stack.pop() {
        let key = if node.code.is_empty() {
            FALLBACK_KEY
        } else {
            node.code.as_str()
        };
        if !seen.insert(key) {
            continue;
        }

        let index = result.len();
        result.push(FlatNode {
            code: node.code.clone(),
            parent_code: node.parent_code.clone(),
            name: node.name.clone(),
            kind: node.kind.clone(),
            sort_order: node.sort_order,
            level,
            expanded: false,
            parent,
            child_codes: node.children.iter().map(|c| c.code.clone()).collect(),
        });

        // Reverse push so a plain pop yields pre-order: parent, then its
        // first child's whole subtree, then the next child.
        for child in node.children.iter().rev() {
            stack.push((child, level + 1, Some(index)));
        }
    }

    result
}

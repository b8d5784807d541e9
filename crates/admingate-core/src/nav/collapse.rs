//! Expand/collapse state for flattened navigation lists.

use std::collections::HashSet;

use crate::models::FlatNode;

/// Toggle the expansion state of the entry with `code`.
///
/// Expanding marks only the named entry. Collapsing folds the entry and
/// every transitive descendant, matched by code through `child_codes`, so
/// re-expanding the ancestor later reveals a fully collapsed subtree.
/// Nothing is ever removed from the list; hiding collapsed rows is the
/// renderer's concern. A leaf or unknown code is a no-op beyond its own
/// flag.
pub fn set_expanded(list: &mut [FlatNode], code: &str, expanded: bool) {
    if expanded {
        if let Some(entry) = list.iter_mut().find(|n| n.code == code) {
            entry.expanded = true;
        }
        return;
    }
    collapse_subtree(list, code);
}

fn collapse_subtree(list: &mut [FlatNode], code: &str) {
    let mut pending: Vec<String> = vec![code.to_string()];
    // Codes form a tree, but a malformed list must not loop the walk.
    let mut visited: HashSet<String> = HashSet::new();

    while let Some(current) = pending.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if let Some(entry) = list.iter_mut().find(|n| n.code == current) {
            entry.expanded = false;
            pending.extend(entry.child_codes.iter().cloned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceNode;
    use crate::nav::flatten;

    fn tree(code: &str, children: Vec<ResourceNode>) -> ResourceNode {
        ResourceNode {
            code: code.to_string(),
            parent_code: None,
            name: code.to_uppercase(),
            kind: None,
            sort_order: 0,
            children,
        }
    }

    fn sample_list() -> Vec<FlatNode> {
        // a -> (a1 -> b, a2), plus unrelated root z
        let mut list = crate::nav::flatten_forest(&[
            tree(
                "a",
                vec![tree("a1", vec![tree("b", vec![])]), tree("a2", vec![])],
            ),
            tree("z", vec![tree("z1", vec![])]),
        ]);
        for entry in &mut list {
            entry.expanded = true;
        }
        list
    }

    fn expanded(list: &[FlatNode], code: &str) -> bool {
        list.iter().find(|n| n.code == code).expect("entry exists").expanded
    }

    #[test]
    fn test_collapse_folds_whole_subtree() {
        let mut list = sample_list();
        set_expanded(&mut list, "a", false);

        assert!(!expanded(&list, "a"));
        assert!(!expanded(&list, "a1"));
        assert!(!expanded(&list, "b"));
        assert!(!expanded(&list, "a2"));
    }

    #[test]
    fn test_collapse_leaves_non_descendants_alone() {
        let mut list = sample_list();
        set_expanded(&mut list, "a1", false);

        assert!(!expanded(&list, "a1"));
        assert!(!expanded(&list, "b"));
        // Parent, sibling and the other root keep their state
        assert!(expanded(&list, "a"));
        assert!(expanded(&list, "a2"));
        assert!(expanded(&list, "z"));
        assert!(expanded(&list, "z1"));
    }

    #[test]
    fn test_expand_marks_only_the_entry() {
        let mut list = sample_list();
        set_expanded(&mut list, "a", false);
        set_expanded(&mut list, "a", true);

        assert!(expanded(&list, "a"));
        // Descendants stay collapsed until expanded themselves
        assert!(!expanded(&list, "a1"));
        assert!(!expanded(&list, "a2"));
    }

    #[test]
    fn test_collapse_leaf_is_noop_for_the_rest() {
        let mut list = sample_list();
        set_expanded(&mut list, "b", false);

        assert!(!expanded(&list, "b"));
        assert!(expanded(&list, "a1"));
        assert!(expanded(&list, "a"));
    }

    #[test]
    fn test_unknown_code_changes_nothing() {
        let mut list = sample_list();
        set_expanded(&mut list, "missing", false);
        assert!(list.iter().all(|n| n.expanded));
    }

    #[test]
    fn test_nothing_is_removed() {
        let mut list = sample_list();
        let before = list.len();
        set_expanded(&mut list, "a", false);
        assert_eq!(list.len(), before);
    }

    #[test]
    fn test_cyclic_child_codes_terminate() {
        let mut list = flatten(&tree("a", vec![tree("a1", vec![])]));
        // Malformed: a1 claims its ancestor as a child
        list[1].child_codes.push("a".to_string());
        set_expanded(&mut list, "a", false);
        assert!(list.iter().all(|n| !n.expanded));
    }
}

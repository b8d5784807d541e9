use serde::{Deserialize, Serialize};

/// Sentinel parent code identifying root-level resources.
pub const ROOT_CODE: &str = "0";

/// A coded resource record as returned by the search endpoints.
///
/// The API returns these one level at a time (no descendants populated);
/// `TreeResolver` fills in `children` recursively. A node with no children
/// keeps `children` empty rather than carrying an empty placeholder on the
/// wire, so leaf detection is a plain `is_leaf()` check downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    pub code: String,
    #[serde(rename = "parentCode")]
    pub parent_code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(rename = "sortOrder", default)]
    pub sort_order: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResourceNode>,
}

impl ResourceNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True for records that belong at the top of the tree
    /// (parent code absent or the `"0"` sentinel).
    pub fn is_root(&self) -> bool {
        match self.parent_code.as_deref() {
            None => true,
            Some(code) => code == ROOT_CODE,
        }
    }
}

/// Order sibling lists the way the console renders them.
pub fn sort_siblings(nodes: &mut [ResourceNode]) {
    nodes.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// One entry of a flattened tree.
///
/// `parent` is an index into the same flat list (never a second owning
/// handle into the tree), usable for walking back up while rendering.
/// `child_codes` carries enough structure for leaf detection and for
/// collapse propagation without keeping the subtree alive.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatNode {
    pub code: String,
    pub parent_code: Option<String>,
    pub name: String,
    pub kind: Option<String>,
    pub sort_order: i64,
    pub level: usize,
    pub expanded: bool,
    pub parent: Option<usize>,
    pub child_codes: Vec<String>,
}

impl FlatNode {
    pub fn is_leaf(&self) -> bool {
        self.child_codes.is_empty()
    }
}

/// Paged response wrapper (`{content, totalElements, ...}`) returned by
/// some deployments' search endpoints in place of a bare array.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(rename = "totalElements", default)]
    pub total_elements: Option<i64>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource_node() {
        let json = r#"{"code":"sys","parentCode":"0","name":"System","kind":"dir","sortOrder":2}"#;
        let node: ResourceNode = serde_json::from_str(json).expect("Failed to parse node");
        assert_eq!(node.code, "sys");
        assert_eq!(node.parent_code.as_deref(), Some("0"));
        assert_eq!(node.sort_order, 2);
        assert!(node.is_root());
        assert!(node.is_leaf());
    }

    #[test]
    fn test_parse_node_minimal_fields() {
        // kind and sortOrder are optional on the wire
        let json = r#"{"code":"u1","parentCode":"sys","name":"Users"}"#;
        let node: ResourceNode = serde_json::from_str(json).expect("Failed to parse node");
        assert_eq!(node.kind, None);
        assert_eq!(node.sort_order, 0);
        assert!(!node.is_root());
    }

    #[test]
    fn test_children_omitted_when_empty() {
        let node = ResourceNode {
            code: "a".into(),
            parent_code: None,
            name: "A".into(),
            kind: None,
            sort_order: 0,
            children: vec![],
        };
        let json = serde_json::to_string(&node).expect("Failed to serialize node");
        assert!(!json.contains("children"));
    }

    #[test]
    fn test_sort_siblings_order_then_name() {
        let mk = |code: &str, name: &str, order: i64| ResourceNode {
            code: code.into(),
            parent_code: None,
            name: name.into(),
            kind: None,
            sort_order: order,
            children: vec![],
        };
        let mut nodes = vec![mk("c", "Charlie", 2), mk("b", "Bravo", 1), mk("a", "Alpha", 2)];
        sort_siblings(&mut nodes);
        let codes: Vec<&str> = nodes.iter().map(|n| n.code.as_str()).collect();
        assert_eq!(codes, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_page_wrapper() {
        let json = r#"{"content":[{"code":"a","parentCode":null,"name":"A"}],"totalElements":1,"pageable":{"pageNumber":0}}"#;
        let page: Page<ResourceNode> = serde_json::from_str(json).expect("Failed to parse page");
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, Some(1));
    }
}

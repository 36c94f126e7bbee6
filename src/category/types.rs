use serde::{Deserialize, Serialize};
use std::fmt;

/// Level of a top-level category.
pub const ROOT_LEVEL: u8 = 1;

/// Deepest level a category may live at. A node at this level cannot
/// receive children.
pub const MAX_LEVEL: u8 = 4;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque, server-assigned category identifier.
///
/// Backends in the wild send either strings or integers; both deserialize
/// into the same textual id and always serialize back as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct CategoryId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for CategoryId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        }
    }
}

impl From<CategoryId> for String {
    fn from(id: CategoryId) -> Self {
        id.0
    }
}

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// Category Node
// ============================================================================

fn root_level() -> u8 {
    ROOT_LEVEL
}

/// One category and, recursively, everything below it.
///
/// Children are owned and ordered; their order is display order. There is
/// no parent pointer: ancestry is recomputed from the roots
/// (see [`resolve_path`](super::resolve_path)).
///
/// Depth-dependent behaviour (pinning, cover images, accepting children) is
/// exposed as capability checks on `level` rather than separate node types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cover image reference. Only roots display one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default = "root_level")]
    pub level: u8,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// A childless, unpinned node at `level`.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            background_image: None,
            level,
            is_pinned: false,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<CategoryNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = is_pinned;
        self
    }

    pub fn is_root(&self) -> bool {
        self.level == ROOT_LEVEL
    }

    /// Whether a child may be created under this node.
    pub fn can_have_children(&self) -> bool {
        self.level < MAX_LEVEL
    }

    /// Only roots may be pinned.
    pub fn can_pin(&self) -> bool {
        self.is_root()
    }

    /// Only roots carry a cover image.
    pub fn accepts_image(&self) -> bool {
        self.is_root()
    }

    /// A copy of this node without its subtree.
    ///
    /// Forms and background tasks only need a node's own fields and level;
    /// cloning the whole subtree for them would be wasted work.
    pub fn detached(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            background_image: self.background_image.clone(),
            level: self.level,
            is_pinned: self.is_pinned,
            children: Vec::new(),
        }
    }

    /// Number of nodes below this one (not counting itself).
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

// ============================================================================
// Mutation Inputs
// ============================================================================

/// User input for a new category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
    /// Cover image reference; dropped unless the new node is a root.
    pub image: Option<String>,
}

impl CategoryDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A partial update. `None` fields are left untouched on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_pinned: Option<bool>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.is_pinned.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_tree() {
        let json = r#"[{
            "id": "1",
            "name": "Fiction",
            "backgroundImage": "https://cdn.example.com/fiction.jpg",
            "level": 1,
            "isPinned": true,
            "children": [{"id": "2", "name": "Fantasy", "level": 2}]
        }]"#;

        let forest: Vec<CategoryNode> = serde_json::from_str(json).unwrap();
        assert_eq!(forest.len(), 1);
        assert!(forest[0].is_pinned);
        assert_eq!(
            forest[0].background_image.as_deref(),
            Some("https://cdn.example.com/fiction.jpg")
        );
        assert_eq!(forest[0].children[0].name, "Fantasy");
        assert!(!forest[0].children[0].is_pinned);
        assert!(forest[0].children[0].children.is_empty());
    }

    #[test]
    fn test_numeric_ids_accepted() {
        let node: CategoryNode = serde_json::from_str(r#"{"id": 42, "name": "Maps"}"#).unwrap();
        assert_eq!(node.id, CategoryId::new("42"));
        assert_eq!(node.level, ROOT_LEVEL);

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["id"], "42");
    }

    #[test]
    fn test_capabilities_follow_level() {
        let root = CategoryNode::new("1", "Root", 1);
        let deep = CategoryNode::new("4", "Deep", MAX_LEVEL);
        let mid = CategoryNode::new("2", "Mid", 2);

        assert!(root.can_pin() && root.accepts_image() && root.can_have_children());
        assert!(!mid.can_pin() && !mid.accepts_image() && mid.can_have_children());
        assert!(!deep.can_have_children());
    }

    #[test]
    fn test_descendant_count_and_detached() {
        let tree = CategoryNode::new("1", "A", 1).with_children(vec![
            CategoryNode::new("2", "B", 2)
                .with_children(vec![CategoryNode::new("3", "C", 3)]),
            CategoryNode::new("4", "D", 2),
        ]);
        assert_eq!(tree.descendant_count(), 3);

        let lone = tree.detached();
        assert_eq!(lone.id, tree.id);
        assert!(lone.children.is_empty());
    }

    #[test]
    fn test_changes_is_empty() {
        assert!(CategoryChanges::default().is_empty());
        let changes = CategoryChanges {
            description: Some(String::new()),
            ..CategoryChanges::default()
        };
        assert!(!changes.is_empty());
    }
}

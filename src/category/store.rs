use super::expansion::ExpansionState;
use super::path::find_node;
use super::pin::order_roots;
use super::types::{CategoryId, CategoryNode, ROOT_LEVEL};

/// One visible line of the category tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: CategoryId,
    pub name: String,
    pub level: u8,
    /// Indentation depth (0 = root).
    pub depth: usize,
    pub is_pinned: bool,
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
}

/// The canonical category forest for one session.
///
/// Only two things change it: a fresh forest from the backend
/// ([`replace`](Self::replace), last write wins) and the node returned by a
/// successful create ([`insert`](Self::insert)). Failed mutations never touch
/// it.
#[derive(Debug, Default)]
pub struct CategoryStore {
    roots: Vec<CategoryNode>,
    in_flight: usize,
    loaded: bool,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_forest(forest: Vec<CategoryNode>) -> Self {
        let mut store = Self::new();
        store.replace(forest);
        store
    }

    /// Roots in backend order. Use [`order_roots`] for display order.
    pub fn roots(&self) -> &[CategoryNode] {
        &self.roots
    }

    /// True once a forest has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Swap in a freshly fetched forest.
    ///
    /// Levels are re-derived from position, and pin flags or cover images on
    /// non-roots are cleared, so the stored tree always satisfies the level
    /// invariants regardless of what the backend sent.
    pub fn replace(&mut self, mut forest: Vec<CategoryNode>) {
        let fixed = normalize(&mut forest, ROOT_LEVEL);
        if fixed > 0 {
            tracing::warn!(fixed, "Normalized inconsistent category data from backend");
        }
        tracing::debug!(roots = forest.len(), "Category tree replaced");
        self.roots = forest;
        self.loaded = true;
    }

    /// Append `node` to the end of `parent`'s children, or to the root list.
    ///
    /// Returns `false` (and leaves the tree alone) if `parent` is not in the
    /// tree.
    pub fn insert(&mut self, parent: Option<&CategoryId>, mut node: CategoryNode) -> bool {
        match parent {
            None => {
                normalize(std::slice::from_mut(&mut node), ROOT_LEVEL);
                self.roots.push(node);
                true
            }
            Some(parent_id) => match find_node_mut(&mut self.roots, parent_id) {
                Some(parent) => {
                    normalize(std::slice::from_mut(&mut node), parent.level + 1);
                    parent.children.push(node);
                    true
                }
                None => {
                    tracing::warn!(parent_id = %parent_id, "Insert target missing from tree");
                    false
                }
            },
        }
    }

    pub fn find(&self, id: &CategoryId) -> Option<&CategoryNode> {
        find_node(&self.roots, id)
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.find(id).is_some()
    }

    /// Size of the subtree rooted at `id`, counting the node itself.
    pub fn subtree_size(&self, id: &CategoryId) -> Option<usize> {
        self.find(id).map(|n| 1 + n.descendant_count())
    }

    /// Total number of categories in the forest.
    pub fn len(&self) -> usize {
        self.roots.iter().map(|r| 1 + r.descendant_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Mark a backend request as started.
    pub fn begin_request(&mut self) {
        self.in_flight += 1;
    }

    /// Mark a backend request as finished, successfully or not.
    pub fn finish_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Whether the tree should be treated as stale.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Flatten the forest into the rows a tree view shows.
    ///
    /// Roots come in pin order, children in insertion order, and a node's
    /// children appear only while it is expanded.
    pub fn visible_rows(
        &self,
        expansion: &ExpansionState,
        selected: Option<&CategoryId>,
    ) -> Vec<TreeRow> {
        let mut rows = Vec::with_capacity(self.roots.len());
        for root in order_roots(&self.roots) {
            push_rows(&mut rows, root, 0, expansion, selected);
        }
        rows
    }
}

fn push_rows(
    rows: &mut Vec<TreeRow>,
    node: &CategoryNode,
    depth: usize,
    expansion: &ExpansionState,
    selected: Option<&CategoryId>,
) {
    let is_expanded = expansion.is_expanded(&node.id);
    rows.push(TreeRow {
        id: node.id.clone(),
        name: node.name.clone(),
        level: node.level,
        depth,
        is_pinned: node.is_pinned,
        has_children: !node.children.is_empty(),
        is_expanded,
        is_selected: selected == Some(&node.id),
    });

    if is_expanded {
        for child in &node.children {
            push_rows(rows, child, depth + 1, expansion, selected);
        }
    }
}

fn find_node_mut<'a>(
    nodes: &'a mut [CategoryNode],
    id: &CategoryId,
) -> Option<&'a mut CategoryNode> {
    for node in nodes {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Enforce level invariants on `nodes` placed at `level`. Returns the number
/// of corrections made.
fn normalize(nodes: &mut [CategoryNode], level: u8) -> usize {
    let mut fixed = 0;
    for node in nodes {
        if node.level != level {
            tracing::debug!(category_id = %node.id, reported = node.level, level, "Correcting level");
            node.level = level;
            fixed += 1;
        }
        if level != ROOT_LEVEL {
            if node.is_pinned {
                node.is_pinned = false;
                fixed += 1;
            }
            if node.background_image.take().is_some() {
                fixed += 1;
            }
        }
        fixed += normalize(&mut node.children, level.saturating_add(1));
    }
    fixed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::testing::{all_ids, forest_strategy};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn catalogue() -> Vec<CategoryNode> {
        vec![
            CategoryNode::new("1", "Fiction", 1).with_children(vec![
                CategoryNode::new("11", "Fantasy", 2)
                    .with_children(vec![CategoryNode::new("111", "Epic", 3)]),
                CategoryNode::new("12", "Mystery", 2),
            ]),
            CategoryNode::new("2", "Children", 1).pinned(true),
        ]
    }

    fn row_ids(rows: &[TreeRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_replace_keeps_backend_order() {
        let store = CategoryStore::from_forest(catalogue());
        assert!(store.is_loaded());
        assert_eq!(store.roots()[0].id.as_str(), "1");
        assert_eq!(store.len(), 5);
        assert_eq!(store.subtree_size(&CategoryId::new("1")), Some(4));
        assert_eq!(store.subtree_size(&CategoryId::new("12")), Some(1));
        assert_eq!(store.subtree_size(&CategoryId::new("x")), None);
    }

    #[test]
    fn test_replace_normalizes_levels_and_root_only_flags() {
        let mut child = CategoryNode::new("2", "Child", 7).pinned(true);
        child.background_image = Some("x.jpg".to_string());
        let forest = vec![CategoryNode::new("1", "Root", 3).with_children(vec![child])];

        let store = CategoryStore::from_forest(forest);
        let root = &store.roots()[0];
        assert_eq!(root.level, 1);
        assert_eq!(root.children[0].level, 2);
        assert!(!root.children[0].is_pinned);
        assert!(root.children[0].background_image.is_none());
    }

    #[test]
    fn test_insert_appends_at_end() {
        let mut store = CategoryStore::from_forest(catalogue());

        assert!(store.insert(Some(&CategoryId::new("1")), CategoryNode::new("13", "Horror", 1)));
        let fiction = store.find(&CategoryId::new("1")).unwrap();
        assert_eq!(fiction.children.last().unwrap().id.as_str(), "13");
        assert_eq!(fiction.children.last().unwrap().level, 2);

        assert!(store.insert(None, CategoryNode::new("3", "Travel", 1)));
        assert_eq!(store.roots().last().unwrap().id.as_str(), "3");
    }

    #[test]
    fn test_insert_under_missing_parent_is_noop() {
        let mut store = CategoryStore::from_forest(catalogue());
        let before = store.len();
        assert!(!store.insert(Some(&CategoryId::new("nope")), CategoryNode::new("x", "X", 2)));
        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_visible_rows_pin_order_and_collapsed() {
        let store = CategoryStore::from_forest(catalogue());
        let rows = store.visible_rows(&ExpansionState::new(), None);
        assert_eq!(row_ids(&rows), ["2", "1"]);
        assert!(rows[1].has_children);
        assert!(!rows[1].is_expanded);
    }

    #[test]
    fn test_visible_rows_follow_expansion() {
        let store = CategoryStore::from_forest(catalogue());
        let mut expansion = ExpansionState::new();
        expansion.expand(&CategoryId::new("1"));

        let selected = CategoryId::new("12");
        let rows = store.visible_rows(&expansion, Some(&selected));
        assert_eq!(row_ids(&rows), ["2", "1", "11", "12"]);
        assert_eq!(rows[2].depth, 1);
        assert!(rows[3].is_selected);
        assert_eq!(rows.iter().filter(|r| r.is_selected).count(), 1);

        // Expanding a child whose parent is collapsed reveals nothing
        let mut hidden = ExpansionState::new();
        hidden.expand(&CategoryId::new("11"));
        assert_eq!(row_ids(&store.visible_rows(&hidden, None)), ["2", "1"]);
    }

    #[test]
    fn test_loading_counter() {
        let mut store = CategoryStore::new();
        assert!(!store.is_loading());
        store.begin_request();
        store.begin_request();
        store.finish_request();
        assert!(store.is_loading());
        store.finish_request();
        store.finish_request();
        assert!(!store.is_loading());
    }

    proptest! {
        #[test]
        fn prop_fully_expanded_rows_cover_every_node(forest in forest_strategy()) {
            let store = CategoryStore::from_forest(forest.clone());
            let mut expansion = ExpansionState::new();
            expansion.expand_all(store.roots());

            let rows = store.visible_rows(&expansion, None);
            prop_assert_eq!(rows.len(), store.len());
            prop_assert_eq!(rows.len(), all_ids(&forest).len());
            for row in &rows {
                prop_assert_eq!(row.depth + 1, row.level as usize);
            }
        }
    }
}

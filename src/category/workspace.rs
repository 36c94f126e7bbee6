use super::confirm::{ConfirmedDelete, PendingDelete};
use super::error::CategoryError;
use super::expansion::ExpansionState;
use super::gateway::CategoryGateway;
use super::path::resolve_path;
use super::store::{CategoryStore, TreeRow};
use super::types::{CategoryChanges, CategoryDraft, CategoryId, CategoryNode};
use crate::api::CategoryApi;

/// One admin session over the category tree: the store, what is expanded,
/// and what is selected.
///
/// The `apply_*` methods take backend results and update the session; the
/// async methods wrap a gateway call and apply its result. The UI drives
/// the former from spawned tasks, `--print` and the tests use the latter.
#[derive(Debug, Default)]
pub struct CategoryWorkspace {
    store: CategoryStore,
    expansion: ExpansionState,
    selected: Option<CategoryId>,
}

impl CategoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn selected(&self) -> Option<&CategoryId> {
        self.selected.as_ref()
    }

    pub fn selected_node(&self) -> Option<&CategoryNode> {
        self.selected.as_ref().and_then(|id| self.store.find(id))
    }

    /// Root-to-selection path; empty when nothing is selected.
    pub fn breadcrumbs(&self) -> Vec<&CategoryNode> {
        resolve_path(self.selected.as_ref(), self.store.roots())
    }

    pub fn visible_rows(&self) -> Vec<TreeRow> {
        self.store
            .visible_rows(&self.expansion, self.selected.as_ref())
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn begin_request(&mut self) {
        self.store.begin_request();
    }

    pub fn finish_request(&mut self) {
        self.store.finish_request();
    }

    // ========================================================================
    // Applying Backend Results
    // ========================================================================

    /// Replace the tree with a fresh forest.
    ///
    /// If the selected category is gone, the selection falls back to its
    /// nearest ancestor that survived, or to nothing. Expanded ids of
    /// categories that no longer exist are dropped.
    pub fn apply_tree(&mut self, forest: Vec<CategoryNode>) {
        let ancestry: Vec<CategoryId> = self
            .breadcrumbs()
            .into_iter()
            .map(|n| n.id.clone())
            .collect();

        self.store.replace(forest);
        let store = &self.store;
        self.expansion.retain(|id| store.contains(id));

        if let Some(selected) = &self.selected {
            if !self.store.contains(selected) {
                let fallback = ancestry
                    .into_iter()
                    .rev()
                    .find(|id| self.store.contains(id));
                tracing::debug!(
                    lost = %selected,
                    fallback = ?fallback.as_ref().map(CategoryId::as_str),
                    "Selected category no longer exists"
                );
                self.selected = fallback;
            }
        }
    }

    /// Add a freshly created node, expand its parent, and select it.
    pub fn apply_created(&mut self, parent: Option<&CategoryId>, node: CategoryNode) {
        let id = node.id.clone();
        if self.store.insert(parent, node) {
            if let Some(parent) = parent {
                self.expansion.expand(parent);
            }
            self.selected = Some(id);
        }
    }

    // ========================================================================
    // Selection & Expansion
    // ========================================================================

    pub fn select(&mut self, id: Option<CategoryId>) {
        self.selected = id.filter(|id| self.store.contains(id));
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    pub fn select_prev(&mut self) {
        self.step_selection(-1);
    }

    fn step_selection(&mut self, delta: isize) {
        let rows = self.visible_rows();
        if rows.is_empty() {
            return;
        }
        let next = match rows.iter().position(|r| r.is_selected) {
            Some(pos) => pos
                .saturating_add_signed(delta)
                .min(rows.len() - 1),
            None if delta < 0 => rows.len() - 1,
            None => 0,
        };
        self.selected = Some(rows[next].id.clone());
    }

    /// Toggle expansion of `id`. Returns whether it is now expanded.
    pub fn toggle_expanded(&mut self, id: &CategoryId) -> bool {
        self.expansion.toggle(id)
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected.clone() {
            if self.has_children(&id) {
                self.expansion.toggle(&id);
            }
        }
    }

    pub fn expand_selected(&mut self) {
        if let Some(id) = self.selected.clone() {
            if self.has_children(&id) {
                self.expansion.expand(&id);
            }
        }
    }

    /// Collapse the selection, or move to its parent if it is already
    /// collapsed.
    pub fn collapse_selected(&mut self) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        if self.expansion.is_expanded(&id) {
            self.expansion.collapse(&id);
            return;
        }
        let path = self.breadcrumbs();
        if path.len() >= 2 {
            let parent = path[path.len() - 2].id.clone();
            self.selected = Some(parent);
        }
    }

    fn has_children(&self, id: &CategoryId) -> bool {
        self.store
            .find(id)
            .is_some_and(|n| !n.children.is_empty())
    }

    /// Start a delete of the selected category.
    pub fn request_delete(&self) -> Option<PendingDelete> {
        self.selected_node().map(PendingDelete::for_node)
    }

    fn lookup(&self, id: &CategoryId) -> Result<CategoryNode, CategoryError> {
        self.store
            .find(id)
            .map(CategoryNode::detached)
            .ok_or_else(|| CategoryError::NotFound(id.clone()))
    }

    // ========================================================================
    // Gateway Round Trips
    // ========================================================================

    pub async fn refresh<A: CategoryApi>(
        &mut self,
        gateway: &CategoryGateway<A>,
    ) -> Result<(), CategoryError> {
        self.begin_request();
        let result = gateway.fetch_tree().await;
        self.finish_request();
        self.apply_tree(result?);
        Ok(())
    }

    /// Refetch after a successful mutation. A failure here keeps the current
    /// tree; the mutation itself already went through.
    async fn resync<A: CategoryApi>(&mut self, gateway: &CategoryGateway<A>) {
        if let Err(e) = self.refresh(gateway).await {
            tracing::warn!(error = %e, "Refetch after mutation failed; tree may be stale");
        }
    }

    pub async fn create<A: CategoryApi>(
        &mut self,
        gateway: &CategoryGateway<A>,
        parent: Option<&CategoryId>,
        draft: CategoryDraft,
    ) -> Result<CategoryNode, CategoryError> {
        let parent_node = parent.map(|id| self.lookup(id)).transpose()?;

        self.begin_request();
        let result = gateway.create(parent_node.as_ref(), draft).await;
        self.finish_request();

        let node = result?;
        self.apply_created(parent, node.clone());
        self.resync(gateway).await;
        Ok(node)
    }

    pub async fn update<A: CategoryApi>(
        &mut self,
        gateway: &CategoryGateway<A>,
        id: &CategoryId,
        changes: CategoryChanges,
    ) -> Result<(), CategoryError> {
        let node = self.lookup(id)?;
        if changes.is_empty() {
            return Ok(());
        }

        self.begin_request();
        let result = gateway.update(&node, changes).await;
        self.finish_request();

        result?;
        self.resync(gateway).await;
        Ok(())
    }

    pub async fn toggle_pin<A: CategoryApi>(
        &mut self,
        gateway: &CategoryGateway<A>,
        id: &CategoryId,
    ) -> Result<(), CategoryError> {
        let node = self.lookup(id)?;

        self.begin_request();
        let result = gateway.toggle_pin(&node).await;
        self.finish_request();

        if let Some(forest) = result? {
            self.apply_tree(forest);
        }
        Ok(())
    }

    pub async fn delete<A: CategoryApi>(
        &mut self,
        gateway: &CategoryGateway<A>,
        confirmed: ConfirmedDelete,
    ) -> Result<(), CategoryError> {
        self.begin_request();
        let result = gateway.delete(confirmed).await;
        self.finish_request();

        result?;
        self.resync(gateway).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryCategoryApi;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> CategoryId {
        CategoryId::new(s)
    }

    fn forest() -> Vec<CategoryNode> {
        vec![
            CategoryNode::new("1", "Fiction", 1).with_children(vec![
                CategoryNode::new("11", "Fantasy", 2)
                    .with_children(vec![CategoryNode::new("111", "Epic", 3)]),
            ]),
            CategoryNode::new("2", "Poetry", 1),
        ]
    }

    fn names(nodes: &[&CategoryNode]) -> Vec<String> {
        nodes.iter().map(|n| n.name.clone()).collect()
    }

    #[test]
    fn test_breadcrumbs_follow_selection() {
        let mut ws = CategoryWorkspace::new();
        ws.apply_tree(forest());
        assert!(ws.breadcrumbs().is_empty());

        ws.select(Some(id("111")));
        assert_eq!(names(&ws.breadcrumbs()), ["Fiction", "Fantasy", "Epic"]);
    }

    #[test]
    fn test_select_ignores_unknown_ids() {
        let mut ws = CategoryWorkspace::new();
        ws.apply_tree(forest());
        ws.select(Some(id("404")));
        assert_eq!(ws.selected(), None);
    }

    #[test]
    fn test_selection_falls_back_to_surviving_ancestor() {
        let mut ws = CategoryWorkspace::new();
        ws.apply_tree(forest());
        ws.select(Some(id("111")));

        let mut pruned = forest();
        pruned[0].children[0].children.clear();
        ws.apply_tree(pruned);
        assert_eq!(ws.selected(), Some(&id("11")));

        ws.apply_tree(vec![CategoryNode::new("2", "Poetry", 1)]);
        assert_eq!(ws.selected(), None);
    }

    #[test]
    fn test_expansion_survives_reload() {
        let mut ws = CategoryWorkspace::new();
        ws.apply_tree(forest());
        ws.toggle_expanded(&id("1"));
        ws.apply_tree(forest());
        assert_eq!(ws.visible_rows().len(), 3);
    }

    #[test]
    fn test_reload_forgets_deleted_expansions() {
        let mut ws = CategoryWorkspace::new();
        ws.apply_tree(forest());
        ws.toggle_expanded(&id("1"));
        ws.toggle_expanded(&id("11"));
        assert_eq!(ws.expansion().len(), 2);

        let mut pruned = forest();
        pruned[0].children.clear();
        ws.apply_tree(pruned);
        assert!(ws.expansion().is_expanded(&id("1")));
        assert!(!ws.expansion().is_expanded(&id("11")));
        assert_eq!(ws.expansion().len(), 1);
    }

    #[tokio::test]
    async fn test_unchanged_update_makes_no_calls() {
        let gateway = CategoryGateway::new(MemoryCategoryApi::new(forest()));
        let mut ws = CategoryWorkspace::new();
        ws.refresh(&gateway).await.unwrap();
        let calls = gateway.api().calls();

        ws.update(&gateway, &id("1"), CategoryChanges::default())
            .await
            .unwrap();
        assert_eq!(gateway.api().calls(), calls);
    }

    #[test]
    fn test_keyboard_navigation() {
        let mut ws = CategoryWorkspace::new();
        ws.apply_tree(forest());

        ws.select_next();
        assert_eq!(ws.selected(), Some(&id("1")));
        ws.expand_selected();
        ws.select_next();
        assert_eq!(ws.selected(), Some(&id("11")));

        // Collapsed child: move to parent
        ws.collapse_selected();
        assert_eq!(ws.selected(), Some(&id("1")));
        // Expanded node: collapse in place
        ws.collapse_selected();
        assert_eq!(ws.selected(), Some(&id("1")));
        assert!(!ws.expansion().is_expanded(&id("1")));

        ws.select_prev();
        assert_eq!(ws.selected(), Some(&id("1")));
        ws.select_next();
        ws.select_next();
        assert_eq!(ws.selected(), Some(&id("2")));
    }

    #[test]
    fn test_apply_created_expands_parent() {
        let mut ws = CategoryWorkspace::new();
        ws.apply_tree(forest());
        ws.apply_created(Some(&id("2")), CategoryNode::new("21", "Sonnets", 2));

        assert!(ws.expansion().is_expanded(&id("2")));
        assert_eq!(ws.selected(), Some(&id("21")));
    }

    #[test]
    fn test_request_delete_needs_selection() {
        let mut ws = CategoryWorkspace::new();
        ws.apply_tree(forest());
        assert!(ws.request_delete().is_none());

        ws.select(Some(id("1")));
        let pending = ws.request_delete().unwrap();
        assert_eq!(pending.descendants(), 2);
    }

    #[tokio::test]
    async fn test_create_root_via_gateway() {
        let gateway = CategoryGateway::new(MemoryCategoryApi::new(Vec::new()));
        let mut ws = CategoryWorkspace::new();
        ws.refresh(&gateway).await.unwrap();

        let node = ws
            .create(&gateway, None, CategoryDraft::named("Fiction"))
            .await
            .unwrap();
        assert_eq!(node.level, 1);
        assert!(!node.is_pinned);
        assert_eq!(ws.store().roots().len(), 1);
        assert!(!ws.is_loading());
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_tree_alone() {
        let gateway = CategoryGateway::new(MemoryCategoryApi::new(forest()));
        let mut ws = CategoryWorkspace::new();
        ws.refresh(&gateway).await.unwrap();
        let before = ws.store().roots().to_vec();

        gateway.api().fail_next(500);
        let result = ws
            .create(&gateway, Some(&id("1")), CategoryDraft::named("Horror"))
            .await;
        assert!(matches!(result, Err(CategoryError::Failed(_))));
        assert_eq!(ws.store().roots(), &before[..]);
        assert!(!ws.is_loading());
    }

    #[tokio::test]
    async fn test_toggle_pin_reorders_roots() {
        let gateway = CategoryGateway::new(MemoryCategoryApi::new(forest()));
        let mut ws = CategoryWorkspace::new();
        ws.refresh(&gateway).await.unwrap();

        ws.toggle_pin(&gateway, &id("2")).await.unwrap();
        let rows = ws.visible_rows();
        assert_eq!(rows[0].id, id("2"));
        assert!(rows[0].is_pinned);
    }
}

use super::confirm::ConfirmedDelete;
use super::error::CategoryError;
use super::rules::{validate_create, validate_pin, validate_update};
use super::types::{CategoryChanges, CategoryDraft, CategoryNode, ROOT_LEVEL};
use crate::api::{ApiError, CategoryApi, UpdateCategory};
use std::sync::Arc;

/// Validates category mutations and dispatches them to the backend.
///
/// Rule violations are reported as [`CategoryError::Validation`] without
/// any network call. Backend failures are mapped into [`CategoryError`] so
/// callers only deal with one error type. The gateway never edits a tree
/// itself; callers apply results to their [`CategoryStore`](super::CategoryStore).
///
/// Cloning is cheap (the backend is shared), so a clone can be moved into
/// a spawned task.
pub struct CategoryGateway<A> {
    api: Arc<A>,
}

impl<A> Clone for CategoryGateway<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: CategoryApi> CategoryGateway<A> {
    pub fn new(api: A) -> Self {
        Self { api: Arc::new(api) }
    }

    pub fn from_shared(api: Arc<A>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn fetch_tree(&self) -> Result<Vec<CategoryNode>, CategoryError> {
        let forest = self.api.fetch_tree().await?;
        tracing::debug!(roots = forest.len(), "Fetched category tree");
        Ok(forest)
    }

    /// Create a category under `parent`, or a new root when `parent` is `None`.
    ///
    /// The returned node carries the server-assigned id and the level implied
    /// by its parent.
    pub async fn create(
        &self,
        parent: Option<&CategoryNode>,
        draft: CategoryDraft,
    ) -> Result<CategoryNode, CategoryError> {
        let payload = validate_create(parent, draft)?;
        tracing::info!(
            name = %payload.name,
            parent_id = ?payload.parent_id,
            "Creating category"
        );

        let mut node = self.api.create_category(payload).await.map_err(|e| {
            tracing::error!(error = %e, "Category create failed");
            CategoryError::Failed(e)
        })?;

        node.level = parent.map_or(ROOT_LEVEL, |p| p.level + 1);
        if parent.is_some() {
            node.is_pinned = false;
            node.background_image = None;
        }
        Ok(node)
    }

    /// Apply a partial update to `node`. An empty change set is a no-op.
    pub async fn update(
        &self,
        node: &CategoryNode,
        changes: CategoryChanges,
    ) -> Result<(), CategoryError> {
        let payload = validate_update(node, changes)?;
        if payload.is_empty() {
            tracing::debug!(category_id = %node.id, "Nothing to update");
            return Ok(());
        }

        tracing::info!(category_id = %node.id, "Updating category");
        self.api
            .update_category(&node.id, payload)
            .await
            .map_err(|e| {
                tracing::error!(category_id = %node.id, error = %e, "Category update failed");
                CategoryError::Failed(e)
            })
    }

    /// Flip the pin of a root category and refetch the forest.
    ///
    /// The tree is not patched locally: the backend's answer is the only
    /// source of truth after a pin change. `Ok` means the flip was applied;
    /// the forest is `None` when only the refetch failed.
    pub async fn toggle_pin(
        &self,
        node: &CategoryNode,
    ) -> Result<Option<Vec<CategoryNode>>, CategoryError> {
        validate_pin(node)?;

        let payload = UpdateCategory {
            is_pinned: Some(!node.is_pinned),
            ..UpdateCategory::default()
        };
        tracing::info!(category_id = %node.id, pinned = !node.is_pinned, "Toggling pin");
        self.api
            .update_category(&node.id, payload)
            .await
            .map_err(|e| {
                tracing::error!(category_id = %node.id, error = %e, "Pin toggle failed");
                CategoryError::Failed(e)
            })?;

        match self.fetch_tree().await {
            Ok(forest) => Ok(Some(forest)),
            Err(e) => {
                tracing::warn!(category_id = %node.id, error = %e, "Refetch after pin toggle failed");
                Ok(None)
            }
        }
    }

    /// Delete a confirmed category and its subtree.
    pub async fn delete(&self, confirmed: ConfirmedDelete) -> Result<(), CategoryError> {
        tracing::info!(
            category_id = %confirmed.id(),
            descendants = confirmed.descendants(),
            "Deleting category"
        );

        match self.api.delete_category(confirmed.id()).await {
            Ok(()) => Ok(()),
            Err(ApiError::InUse) => Err(CategoryError::InUse {
                name: confirmed.name().to_string(),
            }),
            Err(e) => {
                tracing::error!(category_id = %confirmed.id(), error = %e, "Category delete failed");
                Err(CategoryError::Failed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryCategoryApi;
    use crate::category::{CategoryId, PendingDelete, ValidationError, MAX_LEVEL};

    fn gateway() -> CategoryGateway<MemoryCategoryApi> {
        CategoryGateway::new(MemoryCategoryApi::with_sample_catalogue())
    }

    #[tokio::test]
    async fn test_create_root() {
        let gw = gateway();
        let node = gw.create(None, CategoryDraft::named("Poetry")).await.unwrap();

        assert_eq!(node.level, 1);
        assert!(!node.is_pinned);
        assert_eq!(gw.api().calls(), 1);
    }

    #[tokio::test]
    async fn test_create_child_sets_level() {
        let gw = gateway();
        let parent = CategoryNode::new("11", "Fantasy", 2);
        let node = gw
            .create(Some(&parent), CategoryDraft::named("Grimdark"))
            .await
            .unwrap();
        assert_eq!(node.level, 3);
    }

    #[tokio::test]
    async fn test_create_under_max_level_makes_no_call() {
        let gw = gateway();
        let parent = CategoryNode::new("1111", "Sword & Sorcery", MAX_LEVEL);

        let result = gw.create(Some(&parent), CategoryDraft::named("X")).await;
        assert!(matches!(
            result,
            Err(CategoryError::Validation(ValidationError::MaxDepthExceeded))
        ));
        assert_eq!(gw.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_create_empty_name_makes_no_call() {
        let gw = gateway();
        let result = gw.create(None, CategoryDraft::named("   ")).await;
        assert!(matches!(
            result,
            Err(CategoryError::Validation(ValidationError::EmptyName))
        ));
        assert_eq!(gw.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_create_backend_failure_is_generic() {
        let gw = gateway();
        gw.api().fail_next(500);
        let err = gw.create(None, CategoryDraft::named("Poetry")).await.unwrap_err();
        assert!(matches!(err, CategoryError::Failed(ApiError::HttpStatus(500))));
    }

    #[tokio::test]
    async fn test_toggle_pin_non_root_makes_no_call() {
        let gw = gateway();
        let child = CategoryNode::new("11", "Fantasy", 2);

        let result = gw.toggle_pin(&child).await;
        assert!(matches!(
            result,
            Err(CategoryError::Validation(ValidationError::PinNotAllowed))
        ));
        assert_eq!(gw.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_toggle_pin_refetches() {
        let gw = gateway();
        let fiction = CategoryNode::new("1", "Fiction", 1);

        let forest = gw.toggle_pin(&fiction).await.unwrap().unwrap();
        assert!(forest.iter().any(|n| n.id == fiction.id && n.is_pinned));
        // update + fetch
        assert_eq!(gw.api().calls(), 2);
    }

    #[tokio::test]
    async fn test_toggle_pin_survives_failed_refetch() {
        let gw = gateway();
        let fiction = CategoryNode::new("1", "Fiction", 1);
        gw.api().fail_next_fetch(503);

        let forest = gw.toggle_pin(&fiction).await.unwrap();
        assert!(forest.is_none());

        let stored = gw.fetch_tree().await.unwrap();
        assert!(stored.iter().any(|n| n.id == fiction.id && n.is_pinned));
    }

    #[tokio::test]
    async fn test_update_with_pin_on_child_rejected() {
        let gw = gateway();
        let child = CategoryNode::new("12", "Mystery", 2);
        let changes = CategoryChanges {
            is_pinned: Some(true),
            ..CategoryChanges::default()
        };
        assert!(gw.update(&child, changes).await.is_err());
        assert_eq!(gw.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_update_skips_backend() {
        let gw = gateway();
        let root = CategoryNode::new("1", "Fiction", 1);
        gw.update(&root, CategoryChanges::default()).await.unwrap();
        assert_eq!(gw.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_in_use_is_distinct() {
        let gw = gateway();
        gw.api().mark_in_use("12");
        let node = CategoryNode::new("12", "Mystery", 2);

        let err = gw
            .delete(PendingDelete::for_node(&node).confirm())
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryError::InUse { ref name } if name == "Mystery"));
    }

    #[tokio::test]
    async fn test_delete_removes_subtree() {
        let gw = gateway();
        let forest = gw.fetch_tree().await.unwrap();
        let fantasy = crate::category::find_node(&forest, &CategoryId::new("11")).unwrap();

        gw.delete(PendingDelete::for_node(fantasy).confirm())
            .await
            .unwrap();

        let after = gw.fetch_tree().await.unwrap();
        assert!(crate::category::find_node(&after, &CategoryId::new("111")).is_none());
    }
}

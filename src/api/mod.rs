//! Backend collaborators for the category tree.
//!
//! [`CategoryApi`] is the REST contract the mutation gateway relies on.
//! Two implementations ship with the crate:
//!
//! - [`HttpCategoryApi`] - JSON over HTTPS with `reqwest`
//! - [`MemoryCategoryApi`] - in-process backend for `--demo` and tests

mod error;
mod http;
mod memory;

pub use error::ApiError;
pub use http::HttpCategoryApi;
pub use memory::MemoryCategoryApi;

use crate::category::{CategoryId, CategoryNode};
use serde::Serialize;
use std::future::Future;

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Body of a partial update. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
}

impl UpdateCategory {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.is_pinned.is_none()
    }
}

/// The REST operations the category screen consumes.
///
/// Implementations are shared across spawned tasks, so they must be
/// `Send + Sync` and their futures `Send`.
pub trait CategoryApi: Send + Sync + 'static {
    /// The full forest in backend display order.
    fn fetch_tree(&self) -> impl Future<Output = Result<Vec<CategoryNode>, ApiError>> + Send;

    fn create_category(
        &self,
        payload: CreateCategory,
    ) -> impl Future<Output = Result<CategoryNode, ApiError>> + Send;

    fn update_category(
        &self,
        id: &CategoryId,
        payload: UpdateCategory,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Removes the category and its subtree. Fails with [`ApiError::InUse`]
    /// when other entities still reference it.
    fn delete_category(&self, id: &CategoryId)
        -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_payload_omits_unset_fields() {
        let payload = UpdateCategory {
            is_pinned: Some(true),
            ..UpdateCategory::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "isPinned": true }));
    }

    #[test]
    fn test_create_payload_camel_case() {
        let payload = CreateCategory {
            name: "Fantasy".to_string(),
            description: None,
            parent_id: Some(CategoryId::new("7")),
            image: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Fantasy", "parentId": "7" }));
    }
}

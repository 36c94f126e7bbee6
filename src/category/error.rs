use super::types::{CategoryId, MAX_LEVEL};
use crate::api::ApiError;
use thiserror::Error;

/// Problems caught before anything is sent to the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Category name cannot be empty")]
    EmptyName,

    #[error("Category name is too long (max {max} characters)")]
    NameTooLong { max: usize },

    /// The parent already sits at the deepest allowed level.
    #[error("Maximum category depth ({}) exceeded", MAX_LEVEL)]
    MaxDepthExceeded,

    #[error("Only root categories can be pinned")]
    PinNotAllowed,
}

/// Outcome of a failed gateway operation, ready to show to the user.
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Delete refused because books (or other records) still reference it.
    #[error("Cannot delete \"{name}\": it is still in use")]
    InUse { name: String },

    /// The category is not in the current tree (it may have been removed
    /// by another session).
    #[error("Category {0} no longer exists")]
    NotFound(CategoryId),

    #[error("Operation failed: {0}")]
    Failed(#[from] ApiError),
}

impl CategoryError {
    /// True if the error was detected locally, without a network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, CategoryError::Validation(_) | CategoryError::NotFound(_))
    }

    /// Short notification text. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            CategoryError::Validation(e) => e.to_string(),
            CategoryError::InUse { name } => {
                format!("Cannot delete \"{}\": it is still in use", name)
            }
            CategoryError::NotFound(_) => "Category no longer exists; refresh the tree".to_string(),
            CategoryError::Failed(e) if e.is_transient() => {
                "Operation failed (backend unavailable); please try again".to_string()
            }
            CategoryError::Failed(_) => "Operation failed".to_string(),
        }
    }
}

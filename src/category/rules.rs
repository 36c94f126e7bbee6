//! Client-side checks applied before a mutation is dispatched.
//!
//! The backend stays the final authority; these rules only turn obviously
//! invalid requests into immediate [`ValidationError`]s and shape the wire
//! payloads.

use super::error::ValidationError;
use super::types::{CategoryChanges, CategoryDraft, CategoryNode};
use crate::api::{CreateCategory, UpdateCategory};
use crate::util::strip_control_chars;

/// Longest accepted category name, in characters.
pub const MAX_NAME_LEN: usize = 120;

/// Strip control characters, trim, and reject empty or oversized names.
pub fn sanitize_name(name: &str) -> Result<String, ValidationError> {
    let cleaned = strip_control_chars(name);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(trimmed.to_owned())
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| strip_control_chars(&v).trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Validate a new category under `parent` (or as a root).
///
/// An image is only carried for roots; under a parent it is dropped.
pub fn validate_create(
    parent: Option<&CategoryNode>,
    draft: CategoryDraft,
) -> Result<CreateCategory, ValidationError> {
    let name = sanitize_name(&draft.name)?;

    if let Some(parent) = parent {
        if !parent.can_have_children() {
            return Err(ValidationError::MaxDepthExceeded);
        }
    }

    let image = match parent {
        None => clean_optional(draft.image),
        Some(parent) => {
            if draft.image.is_some() {
                tracing::debug!(parent_id = %parent.id, "Ignoring image for non-root category");
            }
            None
        }
    };

    Ok(CreateCategory {
        name,
        description: clean_optional(draft.description),
        parent_id: parent.map(|p| p.id.clone()),
        image,
    })
}

/// Validate a partial update of `node`.
///
/// Pinning is refused for non-roots. An image on a non-root is dropped, the
/// same as on create. Descriptions and images may be cleared with an empty
/// string.
pub fn validate_update(
    node: &CategoryNode,
    changes: CategoryChanges,
) -> Result<UpdateCategory, ValidationError> {
    if changes.is_pinned.is_some() {
        validate_pin(node)?;
    }

    let name = changes.name.as_deref().map(sanitize_name).transpose()?;
    let description = changes
        .description
        .map(|d| strip_control_chars(&d).trim().to_owned());
    let image = match changes.image {
        Some(image) if node.accepts_image() => Some(image.trim().to_owned()),
        Some(_) => {
            tracing::debug!(category_id = %node.id, "Ignoring image for non-root category");
            None
        }
        None => None,
    };

    Ok(UpdateCategory {
        name,
        description,
        image,
        is_pinned: changes.is_pinned,
    })
}

pub fn validate_pin(node: &CategoryNode) -> Result<(), ValidationError> {
    if node.can_pin() {
        Ok(())
    } else {
        Err(ValidationError::PinNotAllowed)
    }
}

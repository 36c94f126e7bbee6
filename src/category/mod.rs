//! The category tree: data model, derived views, and the mutation gateway.
//!
//! [`CategoryStore`] owns the forest fetched from the backend. Views are
//! computed from it on demand ([`resolve_path`], [`order_roots`],
//! [`CategoryStore::visible_rows`]) while [`ExpansionState`] tracks what the
//! user has opened. Every change goes through [`CategoryGateway`], which
//! rejects invalid requests before they reach the network.

mod confirm;
mod error;
mod expansion;
mod form;
mod gateway;
mod path;
mod pin;
mod rules;
mod store;
mod types;
mod workspace;

pub use confirm::{ConfirmedDelete, PendingDelete};
pub use error::{CategoryError, ValidationError};
pub use expansion::ExpansionState;
pub use form::{CategoryForm, FormField, FormState, FormTarget, Submission};
pub use gateway::CategoryGateway;
pub use path::{find_node, resolve_path};
pub use pin::order_roots;
pub use rules::{sanitize_name, validate_create, validate_pin, validate_update, MAX_NAME_LEN};
pub use store::{CategoryStore, TreeRow};
pub use types::{CategoryChanges, CategoryDraft, CategoryId, CategoryNode, MAX_LEVEL, ROOT_LEVEL};
pub use workspace::CategoryWorkspace;

#[cfg(test)]
pub(crate) mod testing {
    //! Random forests for property tests.

    use super::{CategoryId, CategoryNode, MAX_LEVEL, ROOT_LEVEL};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Shape(Vec<Shape>);

    fn shape_strategy() -> impl Strategy<Value = Shape> {
        let leaf = Just(Shape(Vec::new()));
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(Shape)
        })
    }

    fn build(shape: &Shape, level: u8, next_id: &mut u32, pinned: bool) -> CategoryNode {
        *next_id += 1;
        let id = *next_id;
        let children = if level < MAX_LEVEL {
            shape
                .0
                .iter()
                .map(|child| build(child, level + 1, next_id, false))
                .collect()
        } else {
            Vec::new()
        };
        CategoryNode::new(id.to_string(), format!("Category {}", id), level)
            .pinned(pinned)
            .with_children(children)
    }

    /// A forest of up to six roots with unique ids, valid levels, and random
    /// pin flags on the roots.
    pub(crate) fn forest_strategy() -> impl Strategy<Value = Vec<CategoryNode>> {
        prop::collection::vec((shape_strategy(), any::<bool>()), 0..6).prop_map(|roots| {
            let mut next_id = 0;
            roots
                .iter()
                .map(|(shape, pinned)| build(shape, ROOT_LEVEL, &mut next_id, *pinned))
                .collect()
        })
    }

    /// Every id in the forest, depth-first.
    pub(crate) fn all_ids(forest: &[CategoryNode]) -> Vec<CategoryId> {
        fn walk(nodes: &[CategoryNode], out: &mut Vec<CategoryId>) {
            for node in nodes {
                out.push(node.id.clone());
                walk(&node.children, out);
            }
        }
        let mut out = Vec::new();
        walk(forest, &mut out);
        out
    }
}

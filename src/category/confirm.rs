use super::types::{CategoryId, CategoryNode};

/// A delete the user has asked for but not yet confirmed.
///
/// Deleting cascades to the whole subtree, so the gateway only accepts a
/// [`ConfirmedDelete`], and the only way to get one is [`confirm`](Self::confirm).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    id: CategoryId,
    name: String,
    descendants: usize,
}

impl PendingDelete {
    pub fn for_node(node: &CategoryNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            descendants: node.descendant_count(),
        }
    }

    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// How many categories go with it.
    pub fn descendants(&self) -> usize {
        self.descendants
    }

    /// The user said yes.
    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete(self)
    }
}

/// Proof that the user confirmed a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDelete(PendingDelete);

impl ConfirmedDelete {
    pub fn id(&self) -> &CategoryId {
        &self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn descendants(&self) -> usize {
        self.0.descendants
    }
}

use super::types::{CategoryId, CategoryNode};
use std::collections::HashSet;

/// Which tree rows are expanded.
///
/// Purely presentational and keyed by id, so it survives a full reload of
/// the tree as long as ids are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<CategoryId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `id`, returning whether it is now expanded.
    pub fn toggle(&mut self, id: &CategoryId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    pub fn is_expanded(&self, id: &CategoryId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: &CategoryId) {
        if !self.expanded.contains(id) {
            self.expanded.insert(id.clone());
        }
    }

    pub fn collapse(&mut self, id: &CategoryId) {
        self.expanded.remove(id);
    }

    /// Expand every node that has children.
    pub fn expand_all(&mut self, forest: &[CategoryNode]) {
        for node in forest {
            if !node.children.is_empty() {
                self.expand(&node.id);
                self.expand_all(&node.children);
            }
        }
    }

    /// Keep only the ids for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&CategoryId) -> bool) {
        self.expanded.retain(|id| keep(id));
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut state = ExpansionState::new();
        let id = CategoryId::new("7");

        assert!(state.toggle(&id));
        assert!(state.is_expanded(&id));
        assert!(!state.toggle(&id));
        assert!(!state.is_expanded(&id));
    }

    #[test]
    fn test_expand_is_idempotent() {
        let mut state = ExpansionState::new();
        let id = CategoryId::new("1");
        state.expand(&id);
        state.expand(&id);
        assert_eq!(state.len(), 1);
        state.collapse(&id);
        assert!(state.is_empty());
    }

    #[test]
    fn test_expand_all_skips_leaves() {
        let forest = vec![
            CategoryNode::new("1", "A", 1).with_children(vec![CategoryNode::new("2", "B", 2)
                .with_children(vec![CategoryNode::new("3", "C", 3)])]),
            CategoryNode::new("4", "D", 1),
        ];
        let mut state = ExpansionState::new();
        state.expand_all(&forest);

        assert!(state.is_expanded(&CategoryId::new("1")));
        assert!(state.is_expanded(&CategoryId::new("2")));
        assert!(!state.is_expanded(&CategoryId::new("3")));
        assert!(!state.is_expanded(&CategoryId::new("4")));
    }

    proptest! {
        #[test]
        fn prop_double_toggle_is_identity(
            initial in prop::collection::hash_set("[a-e]{1,2}", 0..8),
            target in "[a-e]{1,2}",
        ) {
            let mut state = ExpansionState::new();
            for id in &initial {
                state.expand(&CategoryId::new(id.clone()));
            }
            let before = state.clone();

            let id = CategoryId::new(target);
            state.toggle(&id);
            state.toggle(&id);
            prop_assert_eq!(state, before);
        }
    }
}

use super::types::{CategoryId, CategoryNode};

/// Ancestry of `target`, root first and `target` last.
///
/// Roots are searched in order, each subtree depth-first before the next
/// root. Returns an empty path when `target` is `None` or absent. If an id
/// occurs more than once, the first occurrence in that order wins.
pub fn resolve_path<'a>(
    target: Option<&CategoryId>,
    forest: &'a [CategoryNode],
) -> Vec<&'a CategoryNode> {
    let Some(target) = target else {
        return Vec::new();
    };

    let mut trail = Vec::new();
    for root in forest {
        if descend(root, target, &mut trail) {
            return trail;
        }
    }
    Vec::new()
}

fn descend<'a>(
    node: &'a CategoryNode,
    target: &CategoryId,
    trail: &mut Vec<&'a CategoryNode>,
) -> bool {
    trail.push(node);
    if &node.id == target {
        return true;
    }
    for child in &node.children {
        if descend(child, target, trail) {
            return true;
        }
    }
    trail.pop();
    false
}

/// First node with `id`, in the same traversal order as [`resolve_path`].
pub fn find_node<'a>(forest: &'a [CategoryNode], id: &CategoryId) -> Option<&'a CategoryNode> {
    forest.iter().find_map(|node| {
        if &node.id == id {
            Some(node)
        } else {
            find_node(&node.children, id)
        }
    })
}

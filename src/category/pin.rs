use super::types::CategoryNode;

/// Display order for root categories: pinned ones first.
///
/// A stable partition. Order inside each group is exactly the input order
/// (no alphabetical re-sort). Only meant for the root list; child lists are
/// always shown in insertion order.
pub fn order_roots(roots: &[CategoryNode]) -> Vec<&CategoryNode> {
    let (pinned, unpinned): (Vec<&CategoryNode>, Vec<&CategoryNode>) =
        roots.iter().partition(|node| node.is_pinned);
    pinned.into_iter().chain(unpinned).collect()
}

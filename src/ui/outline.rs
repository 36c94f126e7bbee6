use crate::category::{CategoryStore, ExpansionState};
use crate::util::{single_line, strip_control_chars};
use std::fmt::Write;

/// Plain-text rendering of the whole tree for `--print`.
///
/// Every node is expanded; roots appear in pin order.
pub fn outline(store: &CategoryStore) -> String {
    let mut expansion = ExpansionState::new();
    expansion.expand_all(store.roots());

    let mut out = String::new();
    for row in store.visible_rows(&expansion, None) {
        let pin = if row.is_pinned { " *" } else { "" };
        let name = strip_control_chars(&row.name);
        let _ = writeln!(
            out,
            "{}{} [L{}]{}",
            "  ".repeat(row.depth),
            single_line(&name),
            row.level,
            pin
        );
    }
    out
}

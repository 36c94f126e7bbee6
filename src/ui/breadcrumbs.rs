use crate::app::App;
use crate::category::CategoryNode;
use crate::util::{single_line, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub(super) const SEPARATOR: &str = " › ";
pub(super) const ALL_CATEGORIES: &str = "All categories";

/// Widest a single crumb may be before it is ellipsized.
const MAX_CRUMB_WIDTH: usize = 28;

/// Crumb labels for a root-to-target path.
pub(super) fn crumb_labels(path: &[&CategoryNode]) -> Vec<String> {
    if path.is_empty() {
        return vec![ALL_CATEGORIES.to_string()];
    }
    path.iter()
        .map(|node| truncate_to_width(&single_line(&node.name), MAX_CRUMB_WIDTH).into_owned())
        .collect()
}

/// Render the breadcrumb bar for the current selection.
pub fn render<A>(f: &mut Frame, app: &App<A>, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let labels = crumb_labels(&app.workspace.breadcrumbs());
    let last = labels.len() - 1;

    let mut spans = Vec::with_capacity(labels.len() * 2 + 1);
    spans.push(Span::raw(" "));
    for (i, label) in labels.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(SEPARATOR, app.style("breadcrumb_separator")));
        }
        let style = if i == last {
            app.style("breadcrumb_current")
        } else {
            app.style("breadcrumb")
        };
        spans.push(Span::styled(label, style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

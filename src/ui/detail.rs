use crate::app::App;
use crate::category::{CategoryNode, MAX_LEVEL};
use crate::util::strip_control_chars;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn field<'a>(label: &'a str, value: String, label_style: Style, value_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), label_style),
        Span::styled(value, value_style),
    ])
}

/// Lines describing `node`. Image and pin rows only appear for roots.
pub(super) fn detail_lines<'a, A>(app: &App<A>, node: &'a CategoryNode) -> Vec<Line<'a>> {
    let label = app.style("detail_label");
    let value = app.style("detail_value");
    let muted = app.style("detail_muted");

    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&node.name).into_owned(),
            app.style("detail_title"),
        )),
        Line::default(),
        field("Id", node.id.to_string(), label, value),
        field("Level", format!("{} of {}", node.level, MAX_LEVEL), label, value),
    ];

    if node.is_root() {
        let pinned = if node.is_pinned { "yes" } else { "no" };
        lines.push(field("Pinned", pinned.to_string(), label, value));
        lines.push(match &node.background_image {
            Some(image) => field("Image", strip_control_chars(image).into_owned(), label, value),
            None => field("Image", "none".to_string(), label, muted),
        });
    }

    lines.push(field("Children", node.children.len().to_string(), label, value));
    lines.push(field("Subtree", (1 + node.descendant_count()).to_string(), label, value));
    if !node.can_have_children() {
        lines.push(Line::from(Span::styled(
            "Deepest level: no subcategories allowed",
            muted,
        )));
    }

    lines.push(Line::default());
    match node.description.as_deref() {
        Some(description) => lines.push(Line::from(Span::styled(
            strip_control_chars(description).into_owned(),
            value,
        ))),
        None => lines.push(Line::from(Span::styled("No description", muted))),
    }
    lines
}

/// Render the detail panel for the selected category.
pub fn render<A>(f: &mut Frame, app: &App<A>, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let lines = match app.workspace.selected_node() {
        Some(node) => detail_lines(app, node),
        None => {
            let store = app.workspace.store();
            let summary = if store.is_loaded() {
                format!(
                    "{} categories in {} root groups",
                    store.len(),
                    store.roots().len()
                )
            } else {
                "Loading categories...".to_string()
            };
            vec![
                Line::from(Span::styled(summary, app.style("detail_value"))),
                Line::default(),
                Line::from(Span::styled(
                    "Select a category with j/k, or press 'a' to add a root",
                    app.style("detail_muted"),
                )),
            ]
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(" Details "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryCategoryApi;
    use crate::category::CategoryGateway;
    use crate::theme::ThemeVariant;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn test_app() -> App<MemoryCategoryApi> {
        App::new(
            CategoryGateway::new(MemoryCategoryApi::default()),
            ThemeVariant::Dark,
        )
    }

    #[test]
    fn test_root_shows_pin_and_image() {
        let app = test_app();
        let node = CategoryNode::new("1", "Fiction", 1).pinned(true);
        let out = text(&detail_lines(&app, &node));
        assert!(out.contains("Pinned      yes"));
        assert!(out.contains("Image       none"));
    }

    #[test]
    fn test_child_hides_root_only_fields() {
        let app = test_app();
        let node = CategoryNode::new("4", "Deep", MAX_LEVEL);
        let out = text(&detail_lines(&app, &node));
        assert!(!out.contains("Pinned"));
        assert!(!out.contains("Image"));
        assert!(out.contains("no subcategories allowed"));
    }
}

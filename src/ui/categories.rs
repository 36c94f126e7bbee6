use crate::app::App;
use crate::category::TreeRow;
use crate::util::{single_line, strip_control_chars};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::loop_runner::SPINNER_FRAMES;

const SPINNER: [&str; SPINNER_FRAMES] = ["|", "/", "-", "\\"];

fn marker(row: &TreeRow) -> &'static str {
    match (row.has_children, row.is_expanded) {
        (false, _) => "  ",
        (true, true) => "▾ ",
        (true, false) => "▸ ",
    }
}

/// Render the category tree sidebar.
pub fn render<A>(f: &mut Frame, app: &App<A>, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let rows = app.workspace.visible_rows();
    let loading = app.workspace.is_loading();
    let selected_idx = rows.iter().position(|r| r.is_selected);

    let style_normal = if loading {
        app.style("tree_stale")
    } else {
        app.style("tree_normal")
    };
    let style_selected = app.style("tree_selected");
    let style_marker = app.style("tree_marker");
    let style_pin = app.style("tree_pin");

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let style = if row.is_selected {
                style_selected
            } else {
                style_normal
            };

            let mut spans = Vec::with_capacity(4);
            spans.push(Span::styled("  ".repeat(row.depth), style));
            spans.push(Span::styled(marker(row), style_marker.patch(style)));
            if row.is_pinned {
                spans.push(Span::styled("★ ", style_pin.patch(style)));
            }
            spans.push(Span::styled(
                single_line(&strip_control_chars(&row.name)).into_owned(),
                style,
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if loading {
        format!(" Categories {} ", SPINNER[app.spinner_frame % SPINNER_FRAMES])
    } else {
        format!(" Categories ({}) ", app.workspace.store().len())
    };

    let border_style = if app.has_modal() {
        app.style("panel_border")
    } else {
        app.style("panel_border_focused")
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .highlight_style(Style::default());

    let mut state = ListState::default().with_selected(selected_idx);
    f.render_stateful_widget(list, area, &mut state);
}

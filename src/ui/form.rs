use crate::app::App;
use crate::category::CategoryForm;
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::loop_runner::SPINNER_FRAMES;
use super::render::centered_rect;

/// Render the create/edit modal.
pub fn render<A>(f: &mut Frame, app: &App<A>, form: &CategoryForm) {
    let submitting = app.form.is_submitting();

    let focused = app.style("form_field_focused");
    let normal = app.style("form_field");
    let label = app.style("detail_label");

    let mut lines = Vec::new();
    for field in form.fields() {
        let is_focused = *field == form.focus() && !submitting;
        let marker = if is_focused { "> " } else { "  " };
        let style = if is_focused { focused } else { normal };
        let cursor = if is_focused { "_" } else { "" };

        lines.push(Line::from(Span::styled(format!("{}{}", marker, field.label()), label)));
        lines.push(Line::from(Span::styled(
            format!("    {}{}", form.value(*field), cursor),
            style,
        )));
    }

    lines.push(Line::default());
    if let Some(error) = form.error() {
        lines.push(Line::from(Span::styled(error.to_string(), app.style("form_error"))));
    }
    let footer = if submitting {
        format!("Saving {}", ".".repeat(app.spinner_frame % SPINNER_FRAMES + 1))
    } else {
        "(Tab) Next field  (Enter) Save  (Esc) Cancel".to_string()
    };
    lines.push(Line::from(Span::styled(footer, app.style("detail_muted"))));

    let height = (lines.len() as u16).saturating_add(2);
    let overlay = centered_rect(f.area(), 60, height);
    if overlay.width < 20 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(format!(" {} ", form.title()))
                .title_alignment(Alignment::Center),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, overlay);
}

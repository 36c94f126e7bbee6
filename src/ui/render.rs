//! Render functions for the TUI.
//!
//! Lays out the breadcrumb bar, the tree and detail panels, and the status
//! bar, then draws any open modal on top.

use crate::app::App;
use crate::category::PendingDelete;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{breadcrumbs, categories, detail, form, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
pub(super) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

pub(super) fn render<A>(f: &mut Frame, app: &App<A>) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    breadcrumbs::render(f, app, rows[0]);
    categories::render(f, app, panels[0]);
    detail::render(f, app, panels[1]);
    status::render(f, app, rows[2]);

    if let Some(form) = app.form.form() {
        form::render(f, app, form);
    }

    if let Some(pending) = &app.pending_confirm {
        render_confirm_overlay(f, app, pending);
    }
}

pub(super) fn confirm_text(pending: &PendingDelete) -> String {
    let cascade = match pending.descendants() {
        0 => "It has no subcategories.".to_string(),
        1 => "Its 1 subcategory will be deleted too.".to_string(),
        n => format!("Its {} subcategories will be deleted too.", n),
    };
    format!("Delete \"{}\"?\n\n{}", pending.name(), cascade)
}

/// Render the delete confirmation centered on screen.
fn render_confirm_overlay<A>(f: &mut Frame, app: &App<A>, pending: &PendingDelete) {
    let overlay = centered_rect(f.area(), 54, 8);
    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    let mut lines: Vec<Line> = confirm_text(pending)
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(y) Delete  (n/Esc) Cancel",
        app.style("dialog_warning"),
    )));

    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("dialog_warning"))
                .title(" Confirm delete "),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, overlay);
}

use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

const HINTS_TREE: &str =
    "[j/k]move [h/l]fold [a]dd root [c]hild [e]dit [p]in [d]elete [r]efresh [t]heme [q]uit";
const HINTS_FORM: &str = "Type to edit | TAB next field | ENTER save | ESC cancel";
const HINTS_CONFIRM: &str = "y confirm | n/ESC cancel";

pub(super) fn status_text<A>(app: &App<A>) -> Cow<'_, str> {
    if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.workspace.is_loading() {
        Cow::Borrowed("Loading…")
    } else if app.pending_confirm.is_some() {
        Cow::Borrowed(HINTS_CONFIRM)
    } else if !app.form.is_closed() {
        Cow::Borrowed(HINTS_FORM)
    } else {
        Cow::Borrowed(HINTS_TREE)
    }
}

/// Render the status bar.
pub fn render<A>(f: &mut Frame, app: &App<A>, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }
    let paragraph = Paragraph::new(status_text(app)).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryCategoryApi;
    use crate::category::CategoryGateway;
    use crate::theme::ThemeVariant;

    #[test]
    fn test_status_priority() {
        let mut app = App::new(
            CategoryGateway::new(MemoryCategoryApi::default()),
            ThemeVariant::Dark,
        );
        assert_eq!(status_text(&app), HINTS_TREE);

        app.workspace.begin_request();
        assert_eq!(status_text(&app), "Loading…");

        app.set_status("Saved");
        assert_eq!(status_text(&app), "Saved");
    }
}

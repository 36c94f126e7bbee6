//! Keyboard input handling.
//!
//! Modals capture all keys while open: the delete confirmation first, then
//! the create/edit form. Otherwise keys drive the category tree.

use crate::api::CategoryApi;
use crate::app::{App, AppEvent};
use crate::category::{validate_pin, Submission, ValidationError};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{spawn_delete, spawn_refresh, spawn_submit, spawn_toggle_pin};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input<A: CategoryApi>(
    app: &mut App<A>,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if app.pending_confirm.is_some() {
        handle_confirm_input(app, code, event_tx);
        return Action::Continue;
    }

    if !app.form.is_closed() {
        handle_form_input(app, code, modifiers, event_tx);
        return Action::Continue;
    }

    handle_tree_input(app, code, event_tx)
}

fn handle_tree_input<A: CategoryApi>(
    app: &mut App<A>,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.workspace.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.workspace.select_prev(),
        KeyCode::Char('l') | KeyCode::Right => app.workspace.expand_selected(),
        KeyCode::Char('h') | KeyCode::Left => app.workspace.collapse_selected(),
        KeyCode::Char(' ') | KeyCode::Enter => app.workspace.toggle_selected(),
        KeyCode::Esc => app.workspace.clear_selection(),
        KeyCode::Char('a') => {
            app.form.open_create(None);
        }
        KeyCode::Char('c') => match app.workspace.selected_node() {
            Some(parent) if !parent.can_have_children() => {
                app.set_status(ValidationError::MaxDepthExceeded.to_string());
            }
            Some(parent) => {
                let parent = parent.detached();
                app.form.open_create(Some(&parent));
            }
            None => app.set_status("Select a parent category first"),
        },
        KeyCode::Char('e') => match app.workspace.selected_node() {
            Some(node) => {
                let node = node.detached();
                app.form.open_edit(&node);
            }
            None => app.set_status("Select a category to edit"),
        },
        KeyCode::Char('p') => match app.workspace.selected_node().map(validate_pin) {
            Some(Ok(())) => spawn_toggle_pin(app, event_tx),
            Some(Err(e)) => app.set_status(e.to_string()),
            None => app.set_status("Select a root category to pin"),
        },
        KeyCode::Char('d') => match app.workspace.request_delete() {
            Some(pending) => app.pending_confirm = Some(pending),
            None => app.set_status("Select a category to delete"),
        },
        KeyCode::Char('r') => {
            app.set_status("Refreshing...");
            spawn_refresh(app, event_tx);
        }
        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        _ => {}
    }
    Action::Continue
}

/// y confirms the delete, n/Esc cancels. Other keys are swallowed.
fn handle_confirm_input<A: CategoryApi>(
    app: &mut App<A>,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(pending) = app.pending_confirm.take() {
                app.set_status(format!("Deleting \"{}\"...", pending.name()));
                spawn_delete(app, pending.confirm(), event_tx);
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_confirm = None;
            app.set_status("Cancelled");
        }
        _ => {}
    }
}

fn handle_form_input<A: CategoryApi>(
    app: &mut App<A>,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match code {
        KeyCode::Esc => {
            if !app.form.cancel() {
                app.set_status("Saving, please wait");
            }
        }
        KeyCode::Enter => match app.form.begin_submit() {
            Some(Submission::Edit { ref changes, .. }) if changes.is_empty() => {
                tracing::debug!("Edit submitted without changes");
                app.form.succeed();
            }
            Some(submission) => spawn_submit(app, submission, event_tx),
            None => {}
        },
        _ => {
            let Some(form) = app.form.form_mut() else {
                return;
            };
            match code {
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                    form.insert_char(c)
                }
                _ => {}
            }
        }
    }
}

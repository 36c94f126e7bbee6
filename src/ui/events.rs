//! Background task event processing.
//!
//! Applies task results to the application state. Failed mutations never
//! touch the tree; successful ones are followed by a full refetch.

use crate::api::CategoryApi;
use crate::app::{App, AppEvent, Mutation};
use crate::category::{CategoryError, CategoryId, CategoryNode};
use tokio::sync::mpsc;

use super::helpers::spawn_refresh;

pub(super) fn handle_app_event<A: CategoryApi>(
    app: &mut App<A>,
    event: AppEvent,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    app.workspace.finish_request();

    match event {
        AppEvent::TreeLoaded(forest) => {
            app.workspace.apply_tree(forest);
        }
        AppEvent::TreeLoadFailed(error) => {
            tracing::error!(error = %error, "Failed to load category tree");
            app.set_status(format!("Refresh failed: {}", error.user_message()));
        }
        AppEvent::CategoryCreated { parent, node } => {
            handle_created(app, parent, node, event_tx);
        }
        AppEvent::CategoryUpdated { name } => {
            app.form.succeed();
            app.set_status(format!("Saved \"{}\"", name));
            spawn_refresh(app, event_tx);
        }
        AppEvent::PinToggled {
            name,
            pinned,
            forest,
        } => {
            let verb = if pinned { "Pinned" } else { "Unpinned" };
            match forest {
                Some(forest) => {
                    app.workspace.apply_tree(forest);
                    app.set_status(format!("{} \"{}\"", verb, name));
                }
                None => app.set_status(format!(
                    "{} \"{}\"; refresh failed, press r to reload",
                    verb, name
                )),
            }
        }
        AppEvent::CategoryDeleted { name, descendants } => {
            tracing::info!(name = %name, descendants, "Category deleted");
            let msg = match descendants {
                0 => format!("Deleted \"{}\"", name),
                1 => format!("Deleted \"{}\" and 1 subcategory", name),
                n => format!("Deleted \"{}\" and {} subcategories", name, n),
            };
            app.set_status(msg);
            spawn_refresh(app, event_tx);
        }
        AppEvent::MutationFailed { mutation, error } => {
            handle_mutation_failed(app, mutation, error);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Task panicked");
            if app.form.is_submitting() {
                app.form.fail("Internal error (see log)");
            }
            app.set_status(format!("Internal error in {}", task));
        }
    }
}

fn handle_created<A: CategoryApi>(
    app: &mut App<A>,
    parent: Option<CategoryId>,
    node: CategoryNode,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    tracing::info!(category_id = %node.id, level = node.level, "Category created");
    app.form.succeed();
    app.set_status(format!("Created \"{}\"", node.name));
    app.workspace.apply_created(parent.as_ref(), node);
    spawn_refresh(app, event_tx);
}

fn handle_mutation_failed<A>(app: &mut App<A>, mutation: Mutation, error: CategoryError) {
    if error.is_validation() {
        tracing::debug!(?mutation, error = %error, "Mutation rejected before dispatch");
    } else {
        tracing::error!(?mutation, error = %error, "Mutation failed");
    }

    let message = error.user_message();
    match mutation {
        Mutation::Create | Mutation::Update => app.form.fail(message),
        Mutation::Pin | Mutation::Delete => app.set_status(message),
    }
}

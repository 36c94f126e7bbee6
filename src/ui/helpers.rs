//! Background task spawning shared by the input and event handlers.
//!
//! Every spawn marks the tree as loading before the task starts; the matching
//! `AppEvent` handler marks it finished.

use crate::api::CategoryApi;
use crate::app::{App, AppEvent, Mutation};
use crate::category::{ConfirmedDelete, Submission};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Without this a panicking task just disappears and the loading counter
/// never comes back down.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Run `work` in the background and deliver its event, or `TaskPanicked`.
fn spawn_task<F>(task: &'static str, event_tx: &mpsc::Sender<AppEvent>, work: F)
where
    F: Future<Output = AppEvent> + Send + 'static,
{
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let event = match catch_task_panic(work).await {
            Ok(event) => event,
            Err(panic_msg) => {
                tracing::error!(task, error = %panic_msg, "Background task panicked");
                AppEvent::TaskPanicked {
                    task,
                    error: panic_msg,
                }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(task, error = %e, "Channel send failed (receiver dropped)");
        }
    });
}

pub(super) fn spawn_refresh<A: CategoryApi>(app: &mut App<A>, event_tx: &mpsc::Sender<AppEvent>) {
    app.workspace.begin_request();
    let gateway = app.gateway.clone();
    spawn_task("refresh", event_tx, async move {
        match gateway.fetch_tree().await {
            Ok(forest) => AppEvent::TreeLoaded(forest),
            Err(error) => AppEvent::TreeLoadFailed(error),
        }
    });
}

pub(super) fn spawn_submit<A: CategoryApi>(
    app: &mut App<A>,
    submission: Submission,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    app.workspace.begin_request();
    let gateway = app.gateway.clone();
    match submission {
        Submission::Create { parent, draft } => {
            spawn_task("create_category", event_tx, async move {
                match gateway.create(parent.as_ref(), draft).await {
                    Ok(node) => AppEvent::CategoryCreated {
                        parent: parent.map(|p| p.id),
                        node,
                    },
                    Err(error) => AppEvent::MutationFailed {
                        mutation: Mutation::Create,
                        error,
                    },
                }
            });
        }
        Submission::Edit { node, changes } => {
            spawn_task("update_category", event_tx, async move {
                match gateway.update(&node, changes).await {
                    Ok(()) => AppEvent::CategoryUpdated { name: node.name },
                    Err(error) => AppEvent::MutationFailed {
                        mutation: Mutation::Update,
                        error,
                    },
                }
            });
        }
    }
}

pub(super) fn spawn_toggle_pin<A: CategoryApi>(
    app: &mut App<A>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let Some(node) = app.workspace.selected_node().map(|n| n.detached()) else {
        return;
    };
    app.workspace.begin_request();
    let gateway = app.gateway.clone();
    spawn_task("toggle_pin", event_tx, async move {
        match gateway.toggle_pin(&node).await {
            Ok(forest) => AppEvent::PinToggled {
                name: node.name,
                pinned: !node.is_pinned,
                forest,
            },
            Err(error) => AppEvent::MutationFailed {
                mutation: Mutation::Pin,
                error,
            },
        }
    });
}

pub(super) fn spawn_delete<A: CategoryApi>(
    app: &mut App<A>,
    confirmed: ConfirmedDelete,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    app.workspace.begin_request();
    let gateway = app.gateway.clone();
    spawn_task("delete_category", event_tx, async move {
        let name = confirmed.name().to_string();
        let descendants = confirmed.descendants();
        match gateway.delete(confirmed).await {
            Ok(()) => AppEvent::CategoryDeleted { name, descendants },
            Err(error) => AppEvent::MutationFailed {
                mutation: Mutation::Delete,
                error,
            },
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catch_task_panic_ok() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_message() {
        let result: Result<(), String> = catch_task_panic(async { panic!("boom") }).await;
        assert_eq!(result, Err("boom".to_string()));
    }
}

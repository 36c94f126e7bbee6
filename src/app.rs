use crate::api::CategoryApi;
use crate::category::{
    CategoryError, CategoryGateway, CategoryId, CategoryNode, CategoryWorkspace, FormState,
    PendingDelete,
};
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::time::Instant;

/// How long a status message stays up.
pub const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Event Types
// ============================================================================

/// Which mutation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Pin,
    Delete,
}

/// Events from background tasks.
///
/// Every spawned task sends exactly one of these, so the loading counter
/// can be decremented on each.
#[derive(Debug)]
pub enum AppEvent {
    TreeLoaded(Vec<CategoryNode>),
    TreeLoadFailed(CategoryError),
    CategoryCreated {
        parent: Option<CategoryId>,
        node: CategoryNode,
    },
    CategoryUpdated {
        name: String,
    },
    PinToggled {
        name: String,
        pinned: bool,
        /// `None` when the pin was applied but the refetch failed.
        forest: Option<Vec<CategoryNode>>,
    },
    CategoryDeleted {
        name: String,
        descendants: usize,
    },
    MutationFailed {
        mutation: Mutation,
        error: CategoryError,
    },
    /// A background task panicked.
    TaskPanicked {
        task: &'static str,
        error: String,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
pub struct App<A> {
    pub gateway: CategoryGateway<A>,
    pub workspace: CategoryWorkspace,

    /// Create/edit modal.
    pub form: FormState,
    /// Delete waiting for a yes/no.
    pub pending_confirm: Option<PendingDelete>,

    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub spinner_frame: usize,
    /// Set whenever state changes; cleared after a frame is drawn.
    pub needs_redraw: bool,
}

impl<A: CategoryApi> App<A> {
    pub fn new(gateway: CategoryGateway<A>, theme_variant: ThemeVariant) -> Self {
        Self {
            gateway,
            workspace: CategoryWorkspace::new(),
            form: FormState::default(),
            pending_confirm: None,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            status_message: None,
            spinner_frame: 0,
            needs_redraw: true,
        }
    }
}

impl<A> App<A> {
    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme and return its name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Set status message (auto-expires after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message if it has expired. Returns true if cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Whether a modal currently captures input.
    pub fn has_modal(&self) -> bool {
        self.pending_confirm.is_some() || !self.form.is_closed()
    }
}

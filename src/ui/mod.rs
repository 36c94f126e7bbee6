//! Terminal user interface.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `helpers` - Task spawning and panic capture
//! - `render` - Layout and modal overlays
//! - `breadcrumbs` - Path to the selected category
//! - `categories` - Category tree sidebar
//! - `detail` - Selected category details
//! - `form` - Create/edit modal
//! - `outline` - Plain-text tree for non-interactive output
//! - `status` - Status bar

mod breadcrumbs;
mod categories;
mod detail;
mod events;
mod form;
mod helpers;
mod input;
mod loop_runner;
mod outline;
mod render;
mod status;

pub use loop_runner::{run, Action};
pub use outline::outline;

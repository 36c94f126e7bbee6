//! Text helpers shared by validation and rendering.
//!
//! Category names come from an admin-facing backend and are echoed straight
//! into a terminal, so everything displayed goes through [`strip_control_chars`]
//! first and is fitted to its column with [`truncate_to_width`].
//!
//! # Examples
//!
//! ```
//! use shelfctl::util::{display_width, strip_control_chars, truncate_to_width};
//!
//! assert_eq!(strip_control_chars("\x1b[1mFiction\x1b[0m"), "Fiction");
//! assert_eq!(display_width("Bücher"), 6);
//! assert_eq!(truncate_to_width("Science Fiction", 10), "Science...");
//! ```

mod text;

pub use text::{display_width, single_line, strip_control_chars, truncate_to_width};

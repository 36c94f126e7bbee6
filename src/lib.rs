//! shelfctl: terminal administration for a bookstore's category tree.
//!
//! The category hierarchy (at most four levels deep, pinnable roots) lives in
//! [`category`]; [`api`] talks to the admin REST service; [`ui`] is the
//! interactive console built on top of both.

pub mod api;
pub mod app;
pub mod category;
pub mod config;
pub mod theme;
pub mod ui;
pub mod util;

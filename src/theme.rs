//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Category tree --
    pub tree_normal: Style,
    pub tree_selected: Style,
    pub tree_marker: Style,
    pub tree_pin: Style,
    pub tree_stale: Style,

    // -- Breadcrumbs --
    pub breadcrumb: Style,
    pub breadcrumb_current: Style,
    pub breadcrumb_separator: Style,

    // -- Detail panel --
    pub detail_title: Style,
    pub detail_label: Style,
    pub detail_value: Style,
    pub detail_muted: Style,

    // -- Modals --
    pub form_field: Style,
    pub form_field_focused: Style,
    pub form_error: Style,
    pub dialog_warning: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            tree_normal: Style::default(),
            tree_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            tree_marker: Style::default().fg(Color::Cyan),
            tree_pin: Style::default().fg(Color::Yellow),
            tree_stale: Style::default().fg(Color::Gray),

            breadcrumb: Style::default().fg(Color::Gray),
            breadcrumb_current: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            breadcrumb_separator: Style::default().fg(Color::DarkGray),

            detail_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_label: Style::default().fg(Color::DarkGray),
            detail_value: Style::default(),
            detail_muted: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            form_field: Style::default(),
            form_field_focused: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            form_error: Style::default().fg(Color::Red),
            dialog_warning: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            tree_normal: Style::default().fg(Color::Black),
            tree_selected: Style::default().bg(Color::Blue).fg(Color::White),
            tree_marker: Style::default().fg(Color::Blue),
            tree_pin: Style::default().fg(Color::Magenta),
            tree_stale: Style::default().fg(Color::DarkGray),

            breadcrumb: Style::default().fg(Color::DarkGray),
            breadcrumb_current: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            breadcrumb_separator: Style::default().fg(Color::Gray),

            detail_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            detail_label: Style::default().fg(Color::DarkGray),
            detail_value: Style::default().fg(Color::Black),
            detail_muted: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            form_field: Style::default().fg(Color::Black),
            form_field_focused: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            form_error: Style::default().fg(Color::Red),
            dialog_warning: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup, so render code can name roles without
/// reaching into the palette struct.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

const ROLE_NAMES: [&str; 19] = [
    "tree_normal",
    "tree_selected",
    "tree_marker",
    "tree_pin",
    "tree_stale",
    "breadcrumb",
    "breadcrumb_current",
    "breadcrumb_separator",
    "detail_title",
    "detail_label",
    "detail_value",
    "detail_muted",
    "form_field",
    "form_field_focused",
    "form_error",
    "dialog_warning",
    "status_bar",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 19] = [
            p.tree_normal,
            p.tree_selected,
            p.tree_marker,
            p.tree_pin,
            p.tree_stale,
            p.breadcrumb,
            p.breadcrumb_current,
            p.breadcrumb_separator,
            p.detail_title,
            p.detail_label,
            p.detail_value,
            p.detail_muted,
            p.form_field,
            p.form_field_focused,
            p.form_error,
            p.dialog_warning,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.into_iter().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name. Unknown roles get `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

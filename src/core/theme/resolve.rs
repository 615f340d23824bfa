//! Style resolution shared by every widget renderer.
//!
//! Widget styles resolve in two steps. First the per-widget override is laid
//! over `widgets.general` ([`effective_widget_style`]). Then each color picks
//! the first present layer from component override, widget style and global
//! role ([`cascade`]). Empty strings count as absent.

use super::{ThemeConfig, WidgetKind, WidgetStyle, WidgetStyles};

/// Substitute for pure-white surfaces so widget outlines stay visible on a
/// white page.
pub const SAFE_SURFACE_GRAY: &str = "#D9D9D9";

/// Substitute for pure-white borders.
pub const SAFE_BORDER_GRAY: &str = "#999";

/// A fully resolved widget style: no field can be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWidgetStyle {
    pub background_color: String,
    pub text_color: String,
    pub border_color: String,
    pub accent_color: String,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Three-tier color fallback: the first present component candidate, then the
/// widget-level color, then the global role.
pub fn cascade<'a>(component: &[Option<&'a str>], widget: Option<&'a str>, global: &'a str) -> &'a str {
    component
        .iter()
        .copied()
        .find_map(present)
        .or_else(|| present(widget))
        .unwrap_or(global)
}

/// `merge(widgets.general, widgets[kind])`.
pub fn effective_widget_style(widgets: &WidgetStyles, kind: WidgetKind) -> WidgetStyle {
    match widgets.override_for(kind) {
        Some(over) => widgets.general.overlay(over),
        None => widgets.general.clone(),
    }
}

/// Completes the effective widget style from the global color roles.
pub fn resolve_widget_style(theme: &ThemeConfig, kind: WidgetKind) -> ResolvedWidgetStyle {
    let style = effective_widget_style(&theme.widgets, kind);
    let colors = &theme.colors;
    ResolvedWidgetStyle {
        background_color: cascade(&[], style.background_color.as_deref(), &colors.surface)
            .to_string(),
        text_color: cascade(&[], style.text_color.as_deref(), &colors.text_primary).to_string(),
        border_color: cascade(&[], style.border_color.as_deref(), &colors.neutral).to_string(),
        accent_color: cascade(&[], style.accent_color.as_deref(), &colors.accent).to_string(),
    }
}

/// True for `#ffffff`, `#fff` and `white`, ignoring case and whitespace.
pub fn is_pure_white(color: &str) -> bool {
    let normalized: String = color
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    matches!(normalized.as_str(), "#ffffff" | "#fff" | "white")
}

pub fn safe_surface(color: &str) -> String {
    if is_pure_white(color) {
        SAFE_SURFACE_GRAY.to_string()
    } else {
        color.to_string()
    }
}

pub fn safe_border(color: &str) -> String {
    if is_pure_white(color) {
        SAFE_BORDER_GRAY.to_string()
    } else {
        color.to_string()
    }
}

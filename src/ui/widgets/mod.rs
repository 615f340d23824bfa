//! View models for the rich-reply widgets.
//!
//! Each submodule turns a widget payload plus the active theme into the
//! resolved colors and data needed to draw it, and builds the response string
//! that is fed back as the next user turn.

pub mod carousel;
pub mod date_picker;
pub mod dropdown;
pub mod feedback;
pub mod file_upload;
pub mod form;
pub mod quick_replies;

use crate::core::theme::resolve::{cascade, effective_widget_style, ResolvedWidgetStyle};
use crate::core::theme::{ThemeConfig, WidgetKind};

/// Colors of the call-to-action inside card-like widgets: the bot message
/// accent (or its background) wins over the widget accent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionColors {
    pub accent: String,
    pub text: String,
}

pub(crate) fn action_colors(theme: &ThemeConfig, kind: WidgetKind) -> ActionColors {
    let style = effective_widget_style(&theme.widgets, kind);
    let bot = &theme.components.bot_message;
    ActionColors {
        accent: cascade(
            &[bot.accent_color.as_deref(), Some(&bot.background_color)],
            style.accent_color.as_deref(),
            &theme.colors.accent,
        )
        .to_string(),
        text: cascade(
            &[Some(&bot.text_color)],
            style.text_color.as_deref(),
            &theme.colors.text_primary,
        )
        .to_string(),
    }
}

/// Container colors straight from the widget style.
pub(crate) fn frame(theme: &ThemeConfig, kind: WidgetKind) -> ResolvedWidgetStyle {
    crate::core::theme::resolve::resolve_widget_style(theme, kind)
}

pub(crate) fn title_or(title: Option<&str>, fallback: &str) -> String {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::default_theme;

    #[test]
    fn action_colors_prefer_bot_message() {
        let mut theme = default_theme();
        theme.components.bot_message.accent_color = Some("#a1a1a1".into());
        theme.components.bot_message.text_color = "#b2b2b2".into();
        let colors = action_colors(&theme, WidgetKind::Form);
        assert_eq!(colors.accent, "#a1a1a1");
        assert_eq!(colors.text, "#b2b2b2");

        theme.components.bot_message.accent_color = None;
        theme.components.bot_message.background_color = "#c3c3c3".into();
        assert_eq!(action_colors(&theme, WidgetKind::Form).accent, "#c3c3c3");
    }

    #[test]
    fn blank_titles_use_fallback() {
        assert_eq!(title_or(Some("  "), "Pick"), "Pick");
        assert_eq!(title_or(None, "Pick"), "Pick");
        assert_eq!(title_or(Some("Mine"), "Pick"), "Mine");
    }
}

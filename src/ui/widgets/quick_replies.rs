use crate::core::theme::resolve::{cascade, effective_widget_style};
use crate::core::theme::{ThemeConfig, WidgetKind};
use crate::core::widget::{QuickRepliesData, QuickReplyOption};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickRepliesView {
    pub labels: Vec<String>,
    pub background: String,
    /// Border and label color; also the fill of a highlighted chip.
    pub accent: String,
    pub highlight_text: String,
}

fn default_options() -> Vec<QuickReplyOption> {
    vec![QuickReplyOption::Choice {
        title: "Yes".to_string(),
        value: Some("yes".to_string()),
    }]
}

pub fn view(data: &QuickRepliesData, theme: &ThemeConfig) -> QuickRepliesView {
    let style = effective_widget_style(&theme.widgets, WidgetKind::QuickReplies);
    let bot = &theme.components.bot_message;
    let options = if data.options.is_empty() {
        default_options()
    } else {
        data.options.clone()
    };

    QuickRepliesView {
        labels: options.iter().map(|o| o.label().to_string()).collect(),
        background: cascade(
            &[Some(bot.background_color.as_str())],
            style.background_color.as_deref(),
            &theme.colors.surface,
        )
        .to_string(),
        accent: cascade(
            &[bot.accent_color.as_deref()],
            style.accent_color.as_deref(),
            &theme.colors.accent,
        )
        .to_string(),
        highlight_text: "#ffffff".to_string(),
    }
}

/// The chosen option's label is the response: by 1-based position or by its
/// label, ignoring case.
pub fn respond(view: &QuickRepliesView, input: &str) -> Option<String> {
    let input = input.trim();
    if let Ok(position) = input.parse::<usize>() {
        if let Some(label) = position.checked_sub(1).and_then(|i| view.labels.get(i)) {
            return Some(label.clone());
        }
    }
    view.labels
        .iter()
        .find(|label| label.eq_ignore_ascii_case(input))
        .cloned()
}

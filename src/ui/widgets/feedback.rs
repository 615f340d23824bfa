use super::title_or;
use crate::core::theme::resolve::{cascade, effective_widget_style};
use crate::core::theme::{ThemeConfig, WidgetKind};
use crate::core::widget::FeedbackData;

pub const MAX_STARS: u8 = 5;

const UNLIT_STAR: &str = "#aaa";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackView {
    pub title: String,
    pub background: String,
    pub border: String,
    pub title_color: String,
    pub star: String,
    pub unlit_star: String,
}

pub fn view(data: &FeedbackData, theme: &ThemeConfig) -> FeedbackView {
    let style = effective_widget_style(&theme.widgets, WidgetKind::Feedback);
    let bot = &theme.components.bot_message;
    FeedbackView {
        title: title_or(data.title.as_deref(), "How was your experience?"),
        background: cascade(
            &[Some(&bot.background_color)],
            style.background_color.as_deref(),
            &theme.colors.surface,
        )
        .to_string(),
        border: theme.colors.neutral.clone(),
        title_color: cascade(
            &[Some(&bot.text_color)],
            style.text_color.as_deref(),
            &theme.colors.text_primary,
        )
        .to_string(),
        star: cascade(
            &[Some(&bot.text_color)],
            style.accent_color.as_deref(),
            &theme.colors.accent,
        )
        .to_string(),
        unlit_star: UNLIT_STAR.to_string(),
    }
}

/// `Rated: N stars` for a rating between 1 and 5.
pub fn response(rating: u8) -> Option<String> {
    (1..=MAX_STARS)
        .contains(&rating)
        .then(|| format!("Rated: {rating} stars"))
}

pub fn respond(input: &str) -> Option<String> {
    input.trim().parse::<u8>().ok().and_then(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::default_theme;

    #[test]
    fn ratings_outside_range_are_rejected() {
        assert_eq!(response(1).as_deref(), Some("Rated: 1 stars"));
        assert_eq!(response(5).as_deref(), Some("Rated: 5 stars"));
        assert_eq!(response(0), None);
        assert_eq!(response(6), None);
        assert_eq!(respond(" 4 ").as_deref(), Some("Rated: 4 stars"));
        assert_eq!(respond("four"), None);
    }

    #[test]
    fn stars_use_bot_text_color() {
        let theme = default_theme();
        let view = view(&FeedbackData::default(), &theme);
        assert_eq!(view.star, theme.components.bot_message.text_color);
        assert_eq!(view.background, theme.components.bot_message.background_color);
        assert_eq!(view.title, "How was your experience?");
    }
}

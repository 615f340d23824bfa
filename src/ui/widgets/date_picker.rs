use chrono::{Days, NaiveDate};

use super::title_or;
use crate::core::theme::resolve::{cascade, effective_widget_style, safe_border, safe_surface};
use crate::core::theme::{ThemeConfig, WidgetKind};
use crate::core::widget::DatePickerData;

/// Today plus the following five days.
pub const DAYS_OFFERED: u64 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateChoice {
    /// `yyyy-MM-dd`; sent back verbatim.
    pub value: String,
    pub day: String,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePickerView {
    pub title: String,
    pub days: Vec<DateChoice>,
    pub background: String,
    pub border: String,
    pub text: String,
    pub highlight_background: String,
    pub highlight_text: String,
}

pub fn view(data: &DatePickerData, theme: &ThemeConfig, today: NaiveDate) -> DatePickerView {
    let style = effective_widget_style(&theme.widgets, WidgetKind::DatePicker);
    let colors = &theme.colors;
    let bot = &theme.components.bot_message;

    DatePickerView {
        title: title_or(data.title.as_deref(), "Select a Date"),
        days: (0..DAYS_OFFERED)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .map(|date| DateChoice {
                value: date.format("%Y-%m-%d").to_string(),
                day: date.format("%-d").to_string(),
                month: date.format("%b").to_string(),
            })
            .collect(),
        background: safe_surface(cascade(
            &[],
            style.background_color.as_deref(),
            &colors.surface,
        )),
        border: safe_border(cascade(&[], style.border_color.as_deref(), &colors.neutral)),
        text: cascade(
            &[Some(&bot.text_color)],
            style.text_color.as_deref(),
            &colors.text_primary,
        )
        .to_string(),
        highlight_background: cascade(
            &[Some(&bot.background_color)],
            style.accent_color.as_deref(),
            &colors.accent,
        )
        .to_string(),
        highlight_text: cascade(&[Some(&bot.text_color)], None, &colors.text_inverse).to_string(),
    }
}

/// Accepts a 1-based position in the offered days or a date among them.
pub fn respond(view: &DatePickerView, input: &str) -> Option<String> {
    let input = input.trim();
    if let Ok(position) = input.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| view.days.get(index))
            .map(|choice| choice.value.clone());
    }
    view.days
        .iter()
        .find(|choice| choice.value == input)
        .map(|choice| choice.value.clone())
}

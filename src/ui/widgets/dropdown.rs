use super::{frame, title_or};
use crate::core::theme::{ThemeConfig, WidgetKind};
use crate::core::widget::DropdownData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownChoice {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownView {
    pub title: String,
    pub placeholder: String,
    pub options: Vec<DropdownChoice>,
    pub background: String,
    pub border: String,
    pub text: String,
    pub select_border: String,
}

pub fn view(data: &DropdownData, theme: &ThemeConfig) -> DropdownView {
    let style = frame(theme, WidgetKind::Dropdown);
    DropdownView {
        title: title_or(data.title.as_deref(), "Choose an option"),
        placeholder: "Select...".to_string(),
        options: data
            .options
            .iter()
            .map(|option| DropdownChoice {
                label: option.label().to_string(),
                value: option.value().to_string(),
            })
            .collect(),
        background: style.background_color,
        border: style.border_color,
        text: style.text_color,
        select_border: theme.colors.neutral.clone(),
    }
}

/// Response for a selected value: the matching option's label, or an empty
/// string when nothing matches.
pub fn response_for_value(view: &DropdownView, value: &str) -> String {
    view.options
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label.clone())
        .unwrap_or_default()
}

/// Select by 1-based position or by value. Input matching neither is not an
/// answer.
pub fn respond(view: &DropdownView, input: &str) -> Option<String> {
    let input = input.trim();
    let option = match input.parse::<usize>() {
        Ok(position) => position.checked_sub(1).and_then(|i| view.options.get(i)),
        Err(_) => view.options.iter().find(|option| option.value == input),
    }?;
    Some(response_for_value(view, &option.value))
}

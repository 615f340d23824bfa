use serde_json::{Map, Value};

use super::{action_colors, frame, title_or, ActionColors};
use crate::core::theme::{ThemeConfig, WidgetKind};
use crate::core::widget::{FormData, FormField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: String,
    pub fields: Vec<FormField>,
    pub submit_label: String,
    pub background: String,
    pub border: String,
    pub label_color: String,
    pub input_border: String,
    pub action: ActionColors,
}

fn default_fields() -> Vec<FormField> {
    vec![FormField {
        name: "input".to_string(),
        label: "Input".to_string(),
        input_type: "text".to_string(),
        placeholder: None,
    }]
}

pub fn view(data: &FormData, theme: &ThemeConfig) -> FormView {
    let style = frame(theme, WidgetKind::Form);
    FormView {
        title: title_or(data.title.as_deref(), "Please fill details"),
        fields: if data.fields.is_empty() {
            default_fields()
        } else {
            data.fields.clone()
        },
        submit_label: "Submit".to_string(),
        background: style.background_color,
        border: style.border_color,
        label_color: style.text_color,
        input_border: theme.colors.neutral.clone(),
        action: action_colors(theme, WidgetKind::Form),
    }
}

/// Every field is required.
pub fn missing_fields<'a>(view: &'a FormView, values: &[(String, String)]) -> Vec<&'a str> {
    view.fields
        .iter()
        .filter(|field| {
            !values
                .iter()
                .any(|(name, value)| *name == field.name && !value.trim().is_empty())
        })
        .map(|field| field.name.as_str())
        .collect()
}

/// Submitted values as a JSON object keyed by field name, in the order the
/// fields were filled. A repeated name keeps its first position and last value.
pub fn response(values: &[(String, String)]) -> String {
    let object: Map<String, Value> = values
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();
    Value::Object(object).to_string()
}

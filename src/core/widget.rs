//! Widget payload typing shared by reply interpretation and the renderers.
//!
//! A model turn carries exactly one [`Widget`]: a closed union whose variant is
//! the turn's `type` tag and whose data is the matching `widgetData` payload.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::theme::WidgetKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetType {
    Text,
    DatePicker,
    QuickReplies,
    Dropdown,
    Carousel,
    Form,
    Feedback,
    FileUpload,
}

impl WidgetType {
    pub const ALL: [WidgetType; 8] = [
        WidgetType::Text,
        WidgetType::DatePicker,
        WidgetType::QuickReplies,
        WidgetType::Dropdown,
        WidgetType::Carousel,
        WidgetType::Form,
        WidgetType::Feedback,
        WidgetType::FileUpload,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WidgetType::Text => "text",
            WidgetType::DatePicker => "date_picker",
            WidgetType::QuickReplies => "quick_replies",
            WidgetType::Dropdown => "dropdown",
            WidgetType::Carousel => "carousel",
            WidgetType::Form => "form",
            WidgetType::Feedback => "feedback",
            WidgetType::FileUpload => "file_upload",
        }
    }

    /// Unknown tags yield `None`; callers treat that as text.
    pub fn from_tag(tag: &str) -> Option<WidgetType> {
        WidgetType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag.trim())
    }

    /// The theme slot that styles this widget, if any.
    pub fn style_kind(self) -> Option<WidgetKind> {
        match self {
            WidgetType::Text => None,
            WidgetType::DatePicker => Some(WidgetKind::DatePicker),
            WidgetType::QuickReplies => Some(WidgetKind::QuickReplies),
            WidgetType::Dropdown => Some(WidgetKind::Dropdown),
            WidgetType::Carousel => Some(WidgetKind::Carousel),
            WidgetType::Form => Some(WidgetKind::Form),
            WidgetType::Feedback => Some(WidgetKind::Feedback),
            WidgetType::FileUpload => Some(WidgetKind::FileUpload),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Text,
    DatePicker(DatePickerData),
    QuickReplies(QuickRepliesData),
    Dropdown(DropdownData),
    Carousel(CarouselData),
    Form(FormData),
    Feedback(FeedbackData),
    FileUpload(FileUploadData),
}

impl Widget {
    pub fn widget_type(&self) -> WidgetType {
        match self {
            Widget::Text => WidgetType::Text,
            Widget::DatePicker(_) => WidgetType::DatePicker,
            Widget::QuickReplies(_) => WidgetType::QuickReplies,
            Widget::Dropdown(_) => WidgetType::Dropdown,
            Widget::Carousel(_) => WidgetType::Carousel,
            Widget::Form(_) => WidgetType::Form,
            Widget::Feedback(_) => WidgetType::Feedback,
            Widget::FileUpload(_) => WidgetType::FileUpload,
        }
    }

    /// Build the widget for `widget_type` from its raw payload. A missing or
    /// null payload yields the widget's defaults; a payload of the wrong shape
    /// is an error.
    pub fn from_payload(
        widget_type: WidgetType,
        payload: Option<Value>,
    ) -> Result<Widget, serde_json::Error> {
        fn parse<T: for<'de> Deserialize<'de> + Default>(
            payload: Option<Value>,
        ) -> Result<T, serde_json::Error> {
            match payload {
                None | Some(Value::Null) => Ok(T::default()),
                Some(value) => serde_json::from_value(value),
            }
        }

        Ok(match widget_type {
            WidgetType::Text => Widget::Text,
            WidgetType::DatePicker => Widget::DatePicker(parse(payload)?),
            WidgetType::QuickReplies => Widget::QuickReplies(parse(payload)?),
            WidgetType::Dropdown => Widget::Dropdown(parse(payload)?),
            WidgetType::Carousel => Widget::Carousel(parse(payload)?),
            WidgetType::Form => Widget::Form(parse(payload)?),
            WidgetType::Feedback => Widget::Feedback(parse(payload)?),
            WidgetType::FileUpload => Widget::FileUpload(parse(payload)?),
        })
    }
}

/// Accepts strings, numbers and booleans as text; ids and values produced by a
/// language model are not reliably quoted.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected a string, found {other}"))),
    }
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected a string, found {other}"))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatePickerData {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuickRepliesData {
    pub options: Vec<QuickReplyOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuickReplyOption {
    Text(String),
    Choice {
        #[serde(alias = "label")]
        title: String,
        #[serde(default, deserialize_with = "lenient_opt_string")]
        value: Option<String>,
    },
}

impl QuickReplyOption {
    pub fn label(&self) -> &str {
        match self {
            QuickReplyOption::Text(text) => text,
            QuickReplyOption::Choice { title, .. } => title,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropdownData {
    pub title: Option<String>,
    pub options: Vec<DropdownOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DropdownOption {
    Text(String),
    Choice {
        label: String,
        #[serde(default, deserialize_with = "lenient_opt_string")]
        value: Option<String>,
    },
}

impl DropdownOption {
    pub fn label(&self) -> &str {
        match self {
            DropdownOption::Text(text) => text,
            DropdownOption::Choice { label, .. } => label,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            DropdownOption::Text(text) => text,
            DropdownOption::Choice { label, value } => value.as_deref().unwrap_or(label),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselData {
    pub items: Vec<CarouselItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselItem {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    pub description: Option<String>,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub actions: Vec<CarouselAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselAction {
    #[serde(deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormData {
    pub title: Option<String>,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub input_type: String,
    #[serde(default)]
    pub placeholder: Option<String>,
}

fn default_field_type() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedbackData {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileUploadData {
    pub title: Option<String>,
    pub allowed_types: Vec<String>,
}

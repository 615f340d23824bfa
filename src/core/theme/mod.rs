//! Theme configuration model and the resolver store built on top of it.
//!
//! A [`ThemeConfig`] is always complete: every color role, shape and component
//! surface carries a value. Partial documents (manual edits, imported JSON,
//! generated palettes) travel as [`ThemePatch`] values and are merged over a
//! complete configuration by the [`ThemeStore`].

pub mod image;
pub mod patch;
pub mod persist;
pub mod resolve;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use patch::ThemePatch;
pub use store::{ThemeEvent, ThemeStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub colors: ColorPalette,
    pub shapes: Shapes,
    pub components: Components,
    pub widgets: WidgetStyles,
}

/// Named semantic color roles shared by every surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub neutral: String,
    pub surface: String,
    pub text_primary: String,
    pub text_inverse: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shapes {
    pub border_radius: u32,
    pub has_shadow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    pub header: SurfaceStyle,
    pub bot_message: SurfaceStyle,
    pub user_message: SurfaceStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceStyle {
    pub background_color: String,
    pub text_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

/// Style overrides for a widget. Every field is optional; missing fields fall
/// back to `widgets.general` and then to the global color roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

impl WidgetStyle {
    /// Field-by-field overlay: values present in `top` win.
    pub fn overlay(&self, top: &WidgetStyle) -> WidgetStyle {
        WidgetStyle {
            background_color: top
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            text_color: top.text_color.clone().or_else(|| self.text_color.clone()),
            border_color: top
                .border_color
                .clone()
                .or_else(|| self.border_color.clone()),
            accent_color: top
                .accent_color
                .clone()
                .or_else(|| self.accent_color.clone()),
        }
    }

    pub fn field(&self, field: WidgetStyleField) -> Option<&str> {
        match field {
            WidgetStyleField::BackgroundColor => self.background_color.as_deref(),
            WidgetStyleField::TextColor => self.text_color.as_deref(),
            WidgetStyleField::BorderColor => self.border_color.as_deref(),
            WidgetStyleField::AccentColor => self.accent_color.as_deref(),
        }
    }

    pub fn with_field(field: WidgetStyleField, value: String) -> WidgetStyle {
        let mut style = WidgetStyle::default();
        match field {
            WidgetStyleField::BackgroundColor => style.background_color = Some(value),
            WidgetStyleField::TextColor => style.text_color = Some(value),
            WidgetStyleField::BorderColor => style.border_color = Some(value),
            WidgetStyleField::AccentColor => style.accent_color = Some(value),
        }
        style
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetStyles {
    #[serde(default)]
    pub general: WidgetStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_picker: Option<WidgetStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropdown: Option<WidgetStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carousel: Option<WidgetStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<WidgetStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<WidgetStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<WidgetStyle>,
    #[serde(
        default,
        rename = "file_upload",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_upload: Option<WidgetStyle>,
}

impl WidgetStyles {
    pub fn override_for(&self, kind: WidgetKind) -> Option<&WidgetStyle> {
        self.slot(kind).as_ref()
    }

    pub fn slot(&self, kind: WidgetKind) -> &Option<WidgetStyle> {
        match kind {
            WidgetKind::DatePicker => &self.date_picker,
            WidgetKind::Dropdown => &self.dropdown,
            WidgetKind::Carousel => &self.carousel,
            WidgetKind::Form => &self.form,
            WidgetKind::QuickReplies => &self.quick_replies,
            WidgetKind::Feedback => &self.feedback,
            WidgetKind::FileUpload => &self.file_upload,
        }
    }

    pub fn slot_mut(&mut self, kind: WidgetKind) -> &mut Option<WidgetStyle> {
        match kind {
            WidgetKind::DatePicker => &mut self.date_picker,
            WidgetKind::Dropdown => &mut self.dropdown,
            WidgetKind::Carousel => &mut self.carousel,
            WidgetKind::Form => &mut self.form,
            WidgetKind::QuickReplies => &mut self.quick_replies,
            WidgetKind::Feedback => &mut self.feedback,
            WidgetKind::FileUpload => &mut self.file_upload,
        }
    }
}

/// Widget types that can carry a style override under `widgets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    DatePicker,
    Dropdown,
    Carousel,
    Form,
    QuickReplies,
    Feedback,
    FileUpload,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 7] = [
        WidgetKind::DatePicker,
        WidgetKind::Dropdown,
        WidgetKind::Carousel,
        WidgetKind::Form,
        WidgetKind::QuickReplies,
        WidgetKind::Feedback,
        WidgetKind::FileUpload,
    ];

    /// Key used for this widget under `widgets` in the theme document.
    pub fn config_key(self) -> &'static str {
        match self {
            WidgetKind::DatePicker => "datePicker",
            WidgetKind::Dropdown => "dropdown",
            WidgetKind::Carousel => "carousel",
            WidgetKind::Form => "form",
            WidgetKind::QuickReplies => "quickReplies",
            WidgetKind::Feedback => "feedback",
            WidgetKind::FileUpload => "file_upload",
        }
    }
}

impl FromStr for WidgetKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        WidgetKind::ALL
            .into_iter()
            .find(|kind| kind.config_key() == value)
            .ok_or_else(|| format!("unknown widget: {value}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetStyleField {
    BackgroundColor,
    TextColor,
    BorderColor,
    AccentColor,
}

impl FromStr for WidgetStyleField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "backgroundColor" => Ok(WidgetStyleField::BackgroundColor),
            "textColor" => Ok(WidgetStyleField::TextColor),
            "borderColor" => Ok(WidgetStyleField::BorderColor),
            "accentColor" => Ok(WidgetStyleField::AccentColor),
            _ => Err(format!("unknown widget style field: {value}")),
        }
    }
}

/// Global semantic color roles under `colors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
    Neutral,
    Surface,
    TextPrimary,
    TextInverse,
}

impl ColorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Accent => "accent",
            ColorRole::Neutral => "neutral",
            ColorRole::Surface => "surface",
            ColorRole::TextPrimary => "textPrimary",
            ColorRole::TextInverse => "textInverse",
        }
    }
}

impl FromStr for ColorRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "primary" => Ok(ColorRole::Primary),
            "secondary" => Ok(ColorRole::Secondary),
            "accent" => Ok(ColorRole::Accent),
            "neutral" => Ok(ColorRole::Neutral),
            "surface" => Ok(ColorRole::Surface),
            "textPrimary" => Ok(ColorRole::TextPrimary),
            "textInverse" => Ok(ColorRole::TextInverse),
            _ => Err(format!("unknown color role: {value}")),
        }
    }
}

impl ColorPalette {
    pub fn get(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::Primary => &self.primary,
            ColorRole::Secondary => &self.secondary,
            ColorRole::Accent => &self.accent,
            ColorRole::Neutral => &self.neutral,
            ColorRole::Surface => &self.surface,
            ColorRole::TextPrimary => &self.text_primary,
            ColorRole::TextInverse => &self.text_inverse,
        }
    }
}

/// A single editable color slot, as addressed by manual edits.
///
/// Textual form: `colors.<role>`, `widgets.general.<field>` or
/// `widgets.<widget>.<field>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Global(ColorRole),
    WidgetGeneral(WidgetStyleField),
    Widget(WidgetKind, WidgetStyleField),
}

impl FromStr for ColorTarget {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split('.').collect();
        match parts.as_slice() {
            ["colors", role] => Ok(ColorTarget::Global(role.parse()?)),
            ["widgets", "general", field] => Ok(ColorTarget::WidgetGeneral(field.parse()?)),
            ["widgets", widget, field] => {
                Ok(ColorTarget::Widget(widget.parse()?, field.parse()?))
            }
            _ => Err(format!(
                "invalid color target '{value}' (expected colors.<role> or widgets.<widget>.<field>)"
            )),
        }
    }
}

impl fmt::Display for ColorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field_name(field: WidgetStyleField) -> &'static str {
            match field {
                WidgetStyleField::BackgroundColor => "backgroundColor",
                WidgetStyleField::TextColor => "textColor",
                WidgetStyleField::BorderColor => "borderColor",
                WidgetStyleField::AccentColor => "accentColor",
            }
        }
        match self {
            ColorTarget::Global(role) => write!(f, "colors.{}", role.as_str()),
            ColorTarget::WidgetGeneral(field) => {
                write!(f, "widgets.general.{}", field_name(*field))
            }
            ColorTarget::Widget(kind, field) => {
                write!(f, "widgets.{}.{}", kind.config_key(), field_name(*field))
            }
        }
    }
}

/// The built-in default theme shipped with the crate.
pub fn default_theme() -> ThemeConfig {
    const DEFAULT_THEME: &str = include_str!("../../default_theme.json");
    serde_json::from_str(DEFAULT_THEME).expect("Failed to parse default_theme.json")
}

impl Default for ThemeConfig {
    fn default() -> Self {
        default_theme()
    }
}

impl ThemeConfig {
    /// Pretty-printed JSON document of the full configuration.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The swatches shown as the detected palette, in display order.
    pub fn palette(&self) -> [(&'static str, &str); 5] {
        [
            ("Pri", self.colors.primary.as_str()),
            ("Sec", self.colors.secondary.as_str()),
            ("Acc", self.colors.accent.as_str()),
            ("Neu", self.colors.neutral.as_str()),
            ("Bg", self.colors.surface.as_str()),
        ]
    }
}

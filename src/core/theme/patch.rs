//! Partial theme documents and the per-zone merge rules.

use serde::{Deserialize, Serialize};

use super::{
    ColorPalette, ColorRole, ColorTarget, Components, Shapes, SurfaceStyle, ThemeConfig,
    WidgetKind, WidgetStyle, WidgetStyles,
};

/// A partial or full theme document. Absent fields leave the base untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorPalettePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes: Option<ShapesPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widgets: Option<WidgetStylesPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalettePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_inverse: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_shadow: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SurfacePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_message: Option<SurfacePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<SurfacePatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfacePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

/// Widget overrides already use optional fields, so [`WidgetStyle`] doubles as
/// its own patch type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetStylesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<WidgetStyle>,
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

impl WidgetStylesPatch {
    fn slot(&self, kind: WidgetKind) -> Option<&WidgetStyle> {
        match kind {
            WidgetKind::DatePicker => self.date_picker.as_ref(),
            WidgetKind::Dropdown => self.dropdown.as_ref(),
            WidgetKind::Carousel => self.carousel.as_ref(),
            WidgetKind::Form => self.form.as_ref(),
            WidgetKind::QuickReplies => self.quick_replies.as_ref(),
            WidgetKind::Feedback => self.feedback.as_ref(),
            WidgetKind::FileUpload => self.file_upload.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: WidgetKind) -> &mut Option<WidgetStyle> {
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

impl ThemePatch {
    pub fn from_json(text: &str) -> Result<ThemePatch, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// A patch that changes exactly one color slot.
    pub fn single_color(target: ColorTarget, value: impl Into<String>) -> ThemePatch {
        let value = value.into();
        match target {
            ColorTarget::Global(role) => {
                let mut colors = ColorPalettePatch::default();
                let slot = match role {
                    ColorRole::Primary => &mut colors.primary,
                    ColorRole::Secondary => &mut colors.secondary,
                    ColorRole::Accent => &mut colors.accent,
                    ColorRole::Neutral => &mut colors.neutral,
                    ColorRole::Surface => &mut colors.surface,
                    ColorRole::TextPrimary => &mut colors.text_primary,
                    ColorRole::TextInverse => &mut colors.text_inverse,
                };
                *slot = Some(value);
                ThemePatch {
                    colors: Some(colors),
                    ..ThemePatch::default()
                }
            }
            ColorTarget::WidgetGeneral(field) => ThemePatch {
                widgets: Some(WidgetStylesPatch {
                    general: Some(WidgetStyle::with_field(field, value)),
                    ..WidgetStylesPatch::default()
                }),
                ..ThemePatch::default()
            },
            ColorTarget::Widget(kind, field) => {
                let mut widgets = WidgetStylesPatch::default();
                *widgets.slot_mut(kind) = Some(WidgetStyle::with_field(field, value));
                ThemePatch {
                    widgets: Some(widgets),
                    ..ThemePatch::default()
                }
            }
        }
    }
}

impl From<&ThemeConfig> for ThemePatch {
    fn from(theme: &ThemeConfig) -> Self {
        fn surface(style: &SurfaceStyle) -> SurfacePatch {
            SurfacePatch {
                background_color: Some(style.background_color.clone()),
                text_color: Some(style.text_color.clone()),
                accent_color: style.accent_color.clone(),
            }
        }

        let colors = &theme.colors;
        let widgets = &theme.widgets;
        ThemePatch {
            colors: Some(ColorPalettePatch {
                primary: Some(colors.primary.clone()),
                secondary: Some(colors.secondary.clone()),
                accent: Some(colors.accent.clone()),
                neutral: Some(colors.neutral.clone()),
                surface: Some(colors.surface.clone()),
                text_primary: Some(colors.text_primary.clone()),
                text_inverse: Some(colors.text_inverse.clone()),
            }),
            shapes: Some(ShapesPatch {
                border_radius: Some(theme.shapes.border_radius),
                has_shadow: Some(theme.shapes.has_shadow),
            }),
            components: Some(ComponentsPatch {
                header: Some(surface(&theme.components.header)),
                bot_message: Some(surface(&theme.components.bot_message)),
                user_message: Some(surface(&theme.components.user_message)),
            }),
            widgets: Some(WidgetStylesPatch {
                general: Some(widgets.general.clone()),
                date_picker: widgets.date_picker.clone(),
                dropdown: widgets.dropdown.clone(),
                carousel: widgets.carousel.clone(),
                form: widgets.form.clone(),
                quick_replies: widgets.quick_replies.clone(),
                feedback: widgets.feedback.clone(),
                file_upload: widgets.file_upload.clone(),
            }),
        }
    }
}

fn pick(base: &str, over: &Option<String>) -> String {
    over.clone().unwrap_or_else(|| base.to_string())
}

impl ColorPalette {
    fn merged(&self, patch: &ColorPalettePatch) -> ColorPalette {
        ColorPalette {
            primary: pick(&self.primary, &patch.primary),
            secondary: pick(&self.secondary, &patch.secondary),
            accent: pick(&self.accent, &patch.accent),
            neutral: pick(&self.neutral, &patch.neutral),
            surface: pick(&self.surface, &patch.surface),
            text_primary: pick(&self.text_primary, &patch.text_primary),
            text_inverse: pick(&self.text_inverse, &patch.text_inverse),
        }
    }
}

impl Shapes {
    fn merged(&self, patch: &ShapesPatch) -> Shapes {
        Shapes {
            border_radius: patch.border_radius.unwrap_or(self.border_radius),
            has_shadow: patch.has_shadow.unwrap_or(self.has_shadow),
        }
    }
}

impl SurfaceStyle {
    fn merged(&self, patch: Option<&SurfacePatch>) -> SurfaceStyle {
        let Some(patch) = patch else {
            return self.clone();
        };
        SurfaceStyle {
            background_color: pick(&self.background_color, &patch.background_color),
            text_color: pick(&self.text_color, &patch.text_color),
            accent_color: patch
                .accent_color
                .clone()
                .or_else(|| self.accent_color.clone()),
        }
    }
}

impl Components {
    fn merged(&self, patch: &ComponentsPatch) -> Components {
        Components {
            header: self.header.merged(patch.header.as_ref()),
            bot_message: self.bot_message.merged(patch.bot_message.as_ref()),
            user_message: self.user_message.merged(patch.user_message.as_ref()),
        }
    }
}

impl WidgetStyles {
    fn merged(&self, patch: &WidgetStylesPatch) -> WidgetStyles {
        let mut merged = self.clone();
        if let Some(general) = &patch.general {
            merged.general = self.general.overlay(general);
        }
        for kind in WidgetKind::ALL {
            if let Some(over) = patch.slot(kind) {
                let base = self.override_for(kind).cloned().unwrap_or_default();
                *merged.slot_mut(kind) = Some(base.overlay(over));
            }
        }
        merged
    }
}

impl ThemeConfig {
    /// Shallow per-zone merge: colors and shapes key by key, components key by
    /// key per surface, widgets key by key per widget.
    pub fn merged(&self, patch: &ThemePatch) -> ThemeConfig {
        ThemeConfig {
            colors: match &patch.colors {
                Some(colors) => self.colors.merged(colors),
                None => self.colors.clone(),
            },
            shapes: match &patch.shapes {
                Some(shapes) => self.shapes.merged(shapes),
                None => self.shapes.clone(),
            },
            components: match &patch.components {
                Some(components) => self.components.merged(components),
                None => self.components.clone(),
            },
            widgets: match &patch.widgets {
                Some(widgets) => self.widgets.merged(widgets),
                None => self.widgets.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::{default_theme, WidgetStyleField};

    #[test]
    fn empty_patch_is_identity() {
        let theme = default_theme();
        assert_eq!(theme.merged(&ThemePatch::default()), theme);
    }

    #[test]
    fn colors_merge_key_by_key() {
        let theme = default_theme();
        let patch = ThemePatch::from_json(r##"{"colors":{"primary":"#000000"}}"##)
            .expect("valid patch");
        let merged = theme.merged(&patch);
        assert_eq!(merged.colors.primary, "#000000");
        assert_eq!(merged.colors.secondary, theme.colors.secondary);
        assert_eq!(merged.components, theme.components);
    }

    #[test]
    fn components_merge_per_surface() {
        let theme = default_theme();
        let patch = ThemePatch::from_json(
            r##"{"components":{"botMessage":{"textColor":"#abcdef"}}}"##,
        )
        .expect("valid patch");
        let merged = theme.merged(&patch);
        assert_eq!(merged.components.bot_message.text_color, "#abcdef");
        assert_eq!(
            merged.components.bot_message.background_color,
            theme.components.bot_message.background_color
        );
        assert_eq!(
            merged.components.bot_message.accent_color,
            theme.components.bot_message.accent_color
        );
        assert_eq!(merged.components.header, theme.components.header);
    }

    #[test]
    fn widgets_merge_per_widget_field() {
        let mut theme = default_theme();
        theme.widgets.carousel = Some(WidgetStyle {
            background_color: Some("#101010".into()),
            ..WidgetStyle::default()
        });
        let patch = ThemePatch::from_json(
            r##"{"widgets":{"carousel":{"accentColor":"#ff0000"},"file_upload":{"textColor":"#00ff00"}}}"##,
        )
        .expect("valid patch");
        let merged = theme.merged(&patch);
        let carousel = merged.widgets.carousel.expect("carousel override");
        assert_eq!(carousel.background_color.as_deref(), Some("#101010"));
        assert_eq!(carousel.accent_color.as_deref(), Some("#ff0000"));
        let upload = merged.widgets.file_upload.expect("upload override");
        assert_eq!(upload.text_color.as_deref(), Some("#00ff00"));
        assert_eq!(merged.widgets.general, theme.widgets.general);
    }

    #[test]
    fn full_patch_reproduces_theme() {
        let mut source = default_theme();
        source.colors.accent = "#ff00ff".into();
        source.widgets.form = Some(WidgetStyle::with_field(
            WidgetStyleField::BorderColor,
            "#444444".into(),
        ));
        let patch = ThemePatch::from(&source);
        assert_eq!(default_theme().merged(&patch), source);
    }

    #[test]
    fn single_color_patch_touches_one_slot() {
        let theme = default_theme();
        let patch = ThemePatch::single_color(
            ColorTarget::Widget(WidgetKind::Dropdown, WidgetStyleField::TextColor),
            "#0a0a0a",
        );
        let merged = theme.merged(&patch);
        let dropdown = merged.widgets.dropdown.clone().expect("dropdown override");
        assert_eq!(dropdown.text_color.as_deref(), Some("#0a0a0a"));
        assert_eq!(dropdown.background_color, None);
        assert_eq!(merged.colors, theme.colors);
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        assert!(ThemePatch::from_json(r#"{"shapes":{"borderRadius":"round"}}"#).is_err());
    }
}

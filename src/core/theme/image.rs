//! Turning an image into a previewable theme via the generation collaborator.

use serde_json::{json, Value};
use std::error::Error;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::patch::ThemePatch;
use super::{default_theme, ThemeConfig};
use crate::core::generator::{GenerationError, Generator, ImagePayload};
use crate::core::reply::strip_code_fence;

/// Message shown to the user whenever image-based generation fails.
pub const THEME_GENERATION_FAILED: &str = "Failed to generate theme. Try another image.";

#[derive(Debug)]
pub enum ThemeGenerationError {
    /// The collaborator call itself failed.
    Generation(GenerationError),

    /// The answer was not a JSON theme document.
    Parse(serde_json::Error),

    /// The answer was JSON but did not match the theme schema.
    Schema(Vec<String>),
}

impl ThemeGenerationError {
    pub fn user_message(&self) -> &'static str {
        THEME_GENERATION_FAILED
    }
}

impl fmt::Display for ThemeGenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeGenerationError::Generation(err) => write!(f, "theme generation failed: {err}"),
            ThemeGenerationError::Parse(err) => write!(f, "generated theme is not valid JSON: {err}"),
            ThemeGenerationError::Schema(errors) => {
                write!(f, "generated theme does not match schema: {}", errors.join("; "))
            }
        }
    }
}

impl Error for ThemeGenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ThemeGenerationError::Generation(err) => Some(err),
            ThemeGenerationError::Parse(err) => Some(err),
            ThemeGenerationError::Schema(_) => None,
        }
    }
}

impl From<GenerationError> for ThemeGenerationError {
    fn from(err: GenerationError) -> Self {
        ThemeGenerationError::Generation(err)
    }
}

/// JSON Schema for the subset of a theme the collaborator is asked to produce.
pub fn theme_json_schema() -> Value {
    let surface = json!({
        "type": "object",
        "properties": {
            "backgroundColor": { "type": "string" },
            "textColor": { "type": "string" },
            "accentColor": { "type": "string" }
        }
    });
    json!({
        "type": "object",
        "properties": {
            "colors": {
                "type": "object",
                "properties": {
                    "primary": { "type": "string" },
                    "secondary": { "type": "string" },
                    "accent": { "type": "string" },
                    "neutral": { "type": "string" },
                    "surface": { "type": "string" },
                    "textPrimary": { "type": "string" },
                    "textInverse": { "type": "string" }
                },
                "required": ["primary", "secondary", "neutral", "surface", "textPrimary"]
            },
            "shapes": {
                "type": "object",
                "properties": {
                    "borderRadius": { "type": "integer", "minimum": 0 },
                    "hasShadow": { "type": "boolean" }
                }
            },
            "components": {
                "type": "object",
                "properties": {
                    "header": surface.clone(),
                    "botMessage": surface.clone(),
                    "userMessage": surface
                }
            }
        }
    })
}

static THEME_VALIDATOR: LazyLock<jsonschema::Validator> = LazyLock::new(|| {
    jsonschema::validator_for(&theme_json_schema()).expect("theme schema must compile")
});

/// Validate a generated document and build a complete theme from it.
///
/// The result is laid over the built-in default, not the active theme.
/// Widget overrides are reset to the defaults so global colors take over, and
/// the bot accent falls back to the generated bot background when absent.
pub fn theme_from_generated_json(raw: &str) -> Result<ThemeConfig, ThemeGenerationError> {
    let body = strip_code_fence(raw);
    let body = if body.trim().is_empty() { "{}" } else { body };
    let value: Value = serde_json::from_str(body).map_err(ThemeGenerationError::Parse)?;

    let errors: Vec<String> = THEME_VALIDATOR
        .iter_errors(&value)
        .map(|err| err.to_string())
        .collect();
    if !errors.is_empty() {
        return Err(ThemeGenerationError::Schema(errors));
    }

    let generated: ThemePatch =
        serde_json::from_value(value).map_err(ThemeGenerationError::Parse)?;
    let defaults = default_theme();

    let generated_bot = generated
        .components
        .as_ref()
        .and_then(|components| components.bot_message.as_ref());
    let accent = generated_bot
        .and_then(|bot| bot.accent_color.clone())
        .or_else(|| generated_bot.and_then(|bot| bot.background_color.clone()))
        .or_else(|| defaults.components.bot_message.accent_color.clone())
        .unwrap_or_else(|| defaults.components.bot_message.background_color.clone());

    let mut theme = defaults.merged(&ThemePatch {
        widgets: None,
        ..generated
    });
    theme.components.bot_message.accent_color = Some(accent);
    theme.widgets = defaults.widgets;
    Ok(theme)
}

pub async fn generate_theme(
    generator: &dyn Generator,
    image: &ImagePayload,
) -> Result<ThemeConfig, ThemeGenerationError> {
    debug!(mime_type = %image.mime_type, bytes = image.data.len(), "requesting theme from image");
    let raw = generator.theme_from_image(image).await.map_err(|err| {
        warn!(error = %err, "theme generation request failed");
        ThemeGenerationError::from(err)
    })?;
    theme_from_generated_json(&raw).inspect_err(|err| {
        warn!(error = %err, "rejecting generated theme");
    })
}

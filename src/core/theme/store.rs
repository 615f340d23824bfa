use std::error::Error;
use std::fmt;
use tokio::sync::broadcast;
use tracing::debug;

use super::image::{generate_theme, ThemeGenerationError};
use super::patch::ThemePatch;
use super::{default_theme, ColorTarget, ThemeConfig};
use crate::core::generator::{Generator, ImagePayload};

const EVENT_CAPACITY: usize = 32;

/// Notifications sent to theme consumers after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeEvent {
    Previewed,
    Deployed,
    Reset,
}

#[derive(Debug)]
pub enum ThemeImportError {
    Parse(serde_json::Error),
}

impl fmt::Display for ThemeImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeImportError::Parse(err) => write!(f, "Invalid theme JSON: {err}"),
        }
    }
}

impl Error for ThemeImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ThemeImportError::Parse(err) => Some(err),
        }
    }
}

/// Owns the committed theme and at most one preview.
///
/// Only one theme is ever active: the preview when present, otherwise the
/// committed theme.
pub struct ThemeStore {
    builtin: ThemeConfig,
    committed: ThemeConfig,
    preview: Option<ThemeConfig>,
    events: broadcast::Sender<ThemeEvent>,
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeStore {
    pub fn new() -> Self {
        Self::with_committed(default_theme())
    }

    /// Start from a previously deployed theme.
    pub fn with_committed(committed: ThemeConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            builtin: default_theme(),
            committed,
            preview: None,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ThemeEvent> {
        self.events.subscribe()
    }

    pub fn active(&self) -> &ThemeConfig {
        self.preview.as_ref().unwrap_or(&self.committed)
    }

    pub fn committed(&self) -> &ThemeConfig {
        &self.committed
    }

    pub fn builtin(&self) -> &ThemeConfig {
        &self.builtin
    }

    /// A preview is pending deployment.
    pub fn is_dirty(&self) -> bool {
        self.preview.is_some()
    }

    /// The active theme differs from the built-in default.
    pub fn is_custom(&self) -> bool {
        *self.active() != self.builtin
    }

    /// Merge `patch` over the active theme and make the result the preview.
    pub fn set_preview(&mut self, patch: &ThemePatch) {
        let next = self.active().merged(patch);
        debug!(custom = next != self.builtin, "previewing theme");
        self.preview = Some(next);
        self.notify(ThemeEvent::Previewed);
    }

    /// Reinstate a preview saved earlier, exactly as it was.
    pub fn restore_preview(&mut self, preview: ThemeConfig) {
        self.preview = Some(preview);
        self.notify(ThemeEvent::Previewed);
    }

    /// Promote the preview to the committed theme. Without a preview this does
    /// nothing and returns false.
    pub fn deploy(&mut self) -> bool {
        match self.preview.take() {
            Some(preview) => {
                self.committed = preview;
                debug!("deployed preview theme");
                self.notify(ThemeEvent::Deployed);
                true
            }
            None => false,
        }
    }

    /// Discard any preview and restore the built-in default.
    pub fn reset(&mut self) {
        self.preview = None;
        self.committed = self.builtin.clone();
        debug!("theme reset to defaults");
        self.notify(ThemeEvent::Reset);
    }

    pub fn edit_color(&mut self, target: ColorTarget, value: impl Into<String>) {
        self.set_preview(&ThemePatch::single_color(target, value));
    }

    /// Preview a (partial) JSON theme document. Invalid JSON leaves the store
    /// untouched.
    pub fn import_json(&mut self, text: &str) -> Result<(), ThemeImportError> {
        let patch = ThemePatch::from_json(text).map_err(ThemeImportError::Parse)?;
        self.set_preview(&patch);
        Ok(())
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.active().to_pretty_json()
    }

    /// Ask the collaborator for a theme matching `image` and preview it. On any
    /// failure the active theme is left as it was.
    pub async fn preview_from_image(
        &mut self,
        generator: &dyn Generator,
        image: &ImagePayload,
    ) -> Result<(), ThemeGenerationError> {
        let generated = generate_theme(generator, image).await?;
        self.set_preview(&ThemePatch::from(&generated));
        Ok(())
    }

    fn notify(&self, event: ThemeEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

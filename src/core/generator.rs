//! The external generation collaborator seam.
//!
//! Implementations return the raw text of the model's answer. Interpreting
//! that text (chat replies, generated themes) is done by the caller so every
//! backend shares the same recovery rules.

use async_trait::async_trait;
use base64::Engine as _;
use std::error::Error;
use std::fmt;

use crate::core::message::Role;

/// One prior conversation turn as sent to the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub role: Role,
    pub text: String,
}

/// An inline image: mime type plus base64 data without any data-URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

const DATA_URL_MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("webp", "image/webp"),
];

impl ImagePayload {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::prelude::BASE64_STANDARD.encode(bytes),
        }
    }

    /// Accepts either a `data:image/<png|jpeg|jpg|webp>;base64,` URL or bare
    /// base64, which is assumed to be PNG.
    pub fn from_data_url(url: &str) -> Self {
        for (subtype, mime) in DATA_URL_MIME_TYPES {
            let prefix = format!("data:image/{subtype};base64,");
            if let Some(data) = url.strip_prefix(&prefix) {
                return Self {
                    mime_type: (*mime).to_string(),
                    data: data.to_string(),
                };
            }
        }
        Self {
            mime_type: "image/png".to_string(),
            data: url.to_string(),
        }
    }

    /// Guess the mime type from a file extension, defaulting to PNG.
    pub fn mime_type_for_extension(extension: Option<&str>) -> &'static str {
        let extension = extension.map(|e| e.to_ascii_lowercase());
        DATA_URL_MIME_TYPES
            .iter()
            .find(|(subtype, _)| extension.as_deref() == Some(*subtype))
            .map(|(_, mime)| *mime)
            .unwrap_or("image/png")
    }
}

#[derive(Debug)]
pub enum GenerationError {
    /// No API key is configured; the call was never attempted.
    MissingCredential,

    /// The request could not be sent or the response body could not be read.
    Transport(String),

    /// The service answered with a non-success status.
    Status { status: u16, body: String },

    /// The service answered without any text.
    EmptyResponse,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::MissingCredential => write!(f, "API Key missing"),
            GenerationError::Transport(message) => write!(f, "Transport error: {message}"),
            GenerationError::Status { status, body } => {
                write!(f, "API request failed with status {status}: {body}")
            }
            GenerationError::EmptyResponse => write!(f, "No response"),
        }
    }
}

impl Error for GenerationError {}

#[async_trait]
pub trait Generator: Send + Sync {
    /// Ask for the next structured chat reply given prior turns and the new
    /// user utterance.
    async fn reply(&self, history: &[HistoryTurn], utterance: &str)
        -> Result<String, GenerationError>;

    /// Ask for a theme document describing the palette of an image.
    async fn theme_from_image(&self, image: &ImagePayload) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_prefix_is_stripped() {
        let payload = ImagePayload::from_data_url("data:image/jpeg;base64,QUJD");
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(payload.data, "QUJD");

        let payload = ImagePayload::from_data_url("data:image/webp;base64,WFla");
        assert_eq!(payload.mime_type, "image/webp");
        assert_eq!(payload.data, "WFla");
    }

    #[test]
    fn bare_base64_defaults_to_png() {
        let payload = ImagePayload::from_data_url("QUJD");
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, "QUJD");
    }

    #[test]
    fn bytes_are_base64_encoded() {
        let payload = ImagePayload::from_bytes(b"ABC", "image/png");
        assert_eq!(payload.data, "QUJD");
    }

    #[test]
    fn extension_maps_to_mime_type() {
        assert_eq!(ImagePayload::mime_type_for_extension(Some("JPG")), "image/jpeg");
        assert_eq!(ImagePayload::mime_type_for_extension(Some("webp")), "image/webp");
        assert_eq!(ImagePayload::mime_type_for_extension(Some("gif")), "image/png");
        assert_eq!(ImagePayload::mime_type_for_extension(None), "image/png");
    }
}

//! [`Generator`] backed by the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::api::{
    format_api_error, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};
use crate::core::config::Config;
use crate::core::generator::{GenerationError, Generator, HistoryTurn, ImagePayload};
use crate::utils::url::model_action_url;

const JSON_MIME_TYPE: &str = "application/json";

const WIDGET_SYSTEM_INSTRUCTION: &str = r#"You are an intelligent chatbot assistant. Your goal is to help the user.
You can respond with standard text, or you can trigger specific UI widgets when appropriate.

Available Widgets:
1. 'date_picker': Use when the user wants to schedule something.
2. 'quick_replies': Use when the user needs to choose from a few simple options (Yes/No, Categories).
3. 'dropdown': Use for selecting from a long list (like countries or categories).
4. 'carousel': Use when showing products, places, or visual items.
5. 'form': Use when you need to collect multiple pieces of data (name, email, etc.).
6. 'feedback': Use when you want to ask the user for a rating or satisfaction score.
7. 'file_upload': Use when you need the user to upload a document or image.

Response Format:
You MUST return a JSON object (no markdown formatting).
{
  "type": "text" | "date_picker" | "quick_replies" | "dropdown" | "carousel" | "form" | "feedback" | "file_upload",
  "content": "The text message to display",
  "widgetData": { ... specific data for the widget ... }
}

Examples:
- User: "Book a meeting."
  -> { "type": "date_picker", "content": "Select a meeting date:", "widgetData": { "title": "Pick a date" } }
- User: "Do you like pizza?"
  -> { "type": "quick_replies", "content": "Choose an answer:", "widgetData": { "options": ["Yes", "No"] } }
- User: "Pick a country from Asia"
  -> { "type": "dropdown", "content": "Select a country:", "widgetData": { "title": "Country", "options": [{"label":"India","value":"IN"},{"label":"Japan","value":"JP"}] } }
- User: "Show me mobile phones"
  -> { "type": "carousel", "content": "Here are some options:", "widgetData": { "items": [ { "title": "iPhone 15", "description": "Latest model", "imageUrl": "https://..." }, { "title": "Samsung S24", "description": "New release", "imageUrl": "https://..." } ] } }
- User: "Fill my contact form"
  -> { "type": "form", "content": "Enter your information:", "widgetData": { "title": "Contact Info", "fields": [ { "name": "name", "label": "Full Name", "type": "text" }, { "name": "email", "label": "Email", "type": "email" } ] } }
- User: "Rate our service"
  -> { "type": "feedback", "content": "How was your experience?", "widgetData": { "title": "Rate us" } }
- User: "Upload my ID"
  -> { "type": "file_upload", "content": "Please upload your ID:", "widgetData": { "allowedTypes": ["image/*", ".pdf"] } }
"#;

const THEME_PROMPT: &str = "Analyze this image. Create a UI theme JSON. Extract dominant colors. \
If image is dark, ensure text is light. Return JSON.";

/// Response schema for theme generation. Component styles are kept shallow;
/// anything left out is filled from the built-in theme.
fn theme_response_schema() -> Value {
    let string = json!({ "type": "STRING" });
    json!({
        "type": "OBJECT",
        "properties": {
            "colors": {
                "type": "OBJECT",
                "properties": {
                    "primary": string,
                    "secondary": string,
                    "accent": string,
                    "neutral": string,
                    "surface": string,
                    "textPrimary": string,
                    "textInverse": string
                },
                "required": ["primary", "secondary", "neutral", "surface", "textPrimary"]
            },
            "shapes": {
                "type": "OBJECT",
                "properties": {
                    "borderRadius": { "type": "INTEGER" },
                    "hasShadow": { "type": "BOOLEAN" }
                }
            },
            "components": {
                "type": "OBJECT",
                "properties": {
                    "header": {
                        "type": "OBJECT",
                        "properties": { "backgroundColor": string, "textColor": string }
                    },
                    "botMessage": {
                        "type": "OBJECT",
                        "properties": {
                            "backgroundColor": string,
                            "textColor": string,
                            "accentColor": string
                        }
                    },
                    "userMessage": {
                        "type": "OBJECT",
                        "properties": { "backgroundColor": string, "textColor": string }
                    }
                }
            }
        }
    })
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &Config, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.effective_base_url().to_string(),
            model: config.effective_model().to_string(),
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn chat_request(history: &[HistoryTurn], utterance: &str) -> GenerateContentRequest {
        // The endpoint rejects parts with empty text; widget-only turns are skipped.
        let mut contents: Vec<Content> = history
            .iter()
            .filter(|turn| !turn.text.trim().is_empty())
            .map(|turn| Content::text(Some(turn.role.as_str()), turn.text.clone()))
            .collect();
        contents.push(Content::text(Some("user"), utterance));

        GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text(None, WIDGET_SYSTEM_INSTRUCTION)),
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE.to_string(),
                response_schema: None,
            },
        }
    }

    fn theme_request(image: &ImagePayload) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::inline(image.mime_type.clone(), image.data.clone()),
                    Part::text(THEME_PROMPT),
                ],
            }],
            system_instruction: None,
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE.to_string(),
                response_schema: Some(theme_response_schema()),
            },
        }
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;
        let url = model_action_url(&self.base_url, &self.model, "generateContent");
        debug!(%url, contents = request.contents.len(), "generateContent request");

        let response = self
            .client
            .post(url)
            .header("Content-Type", JSON_MIME_TYPE)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            warn!(status = status.as_u16(), "{}", format_api_error(&body));
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        body.text().ok_or(GenerationError::EmptyResponse)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn reply(
        &self,
        history: &[HistoryTurn],
        utterance: &str,
    ) -> Result<String, GenerationError> {
        self.generate(&Self::chat_request(history, utterance)).await
    }

    async fn theme_from_image(&self, image: &ImagePayload) -> Result<String, GenerationError> {
        self.generate(&Self::theme_request(image)).await
    }
}

//! Interpreting structured replies from the generation collaborator.

use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use tracing::{debug, warn};

use crate::core::generator::GenerationError;
use crate::core::widget::{Widget, WidgetType};

/// Shown when the collaborator fails or answers with something unreadable.
pub const FALLBACK_REPLY: &str = "I'm having trouble connecting right now.";

/// Standing reply while no API key is configured.
pub const MISSING_CREDENTIAL_REPLY: &str =
    "Error: API Key is missing. Check your environment variables.";

/// The interpreted content of one model turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: String,
    pub widget: Widget,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            widget: Widget::Text,
        }
    }
}

#[derive(Debug)]
pub struct ReplyParseError(serde_json::Error);

impl fmt::Display for ReplyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed reply: {}", self.0)
    }
}

impl Error for ReplyParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReply {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    widget_data: Option<Value>,
}

/// Remove a surrounding Markdown code fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`), which may run straight into the
    // body on a one-line fence.
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim_start_matches(|c: char| c.is_ascii_alphabetic()).trim(),
    }
}

/// Parse a raw reply document.
///
/// An absent or unknown `type` is treated as text. A payload that does not
/// match its declared type also degrades to text, so a renderer never sees a
/// mismatched payload.
pub fn interpret_reply(raw: &str) -> Result<Reply, ReplyParseError> {
    let raw: RawReply = serde_json::from_str(strip_code_fence(raw)).map_err(ReplyParseError)?;
    let content = raw.content.unwrap_or_default();

    let widget_type = match raw.kind.as_deref() {
        Some(tag) => WidgetType::from_tag(tag).unwrap_or_else(|| {
            debug!(tag, "unrecognized reply type, rendering as text");
            WidgetType::Text
        }),
        None => WidgetType::Text,
    };

    let widget = match Widget::from_payload(widget_type, raw.widget_data) {
        Ok(widget) => widget,
        Err(err) => {
            warn!(
                widget_type = widget_type.as_str(),
                error = %err,
                "widget payload does not match its type, rendering as text"
            );
            Widget::Text
        }
    };

    Ok(Reply { content, widget })
}

/// Turn the outcome of a collaborator call into the reply to append. Never
/// fails: every error becomes a text reply.
pub fn reply_from_outcome(outcome: Result<String, GenerationError>) -> Reply {
    match outcome {
        Ok(raw) => interpret_reply(&raw).unwrap_or_else(|err| {
            warn!(error = %err, "could not parse reply");
            Reply::text(FALLBACK_REPLY)
        }),
        Err(GenerationError::MissingCredential) => Reply::text(MISSING_CREDENTIAL_REPLY),
        Err(err) => {
            warn!(error = %err, "chat request failed");
            Reply::text(FALLBACK_REPLY)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::widget::{DatePickerData, QuickReplyOption};

    #[test]
    fn date_picker_reply_is_typed() {
        let reply = interpret_reply(
            r#"{"type":"date_picker","content":"Select a meeting date:","widgetData":{"title":"Pick a date"}}"#,
        )
        .expect("valid reply");
        assert_eq!(reply.content, "Select a meeting date:");
        assert_eq!(
            reply.widget,
            Widget::DatePicker(DatePickerData {
                title: Some("Pick a date".into())
            })
        );
    }

    #[test]
    fn quick_replies_keep_option_order() {
        let reply = interpret_reply(
            r#"{"type":"quick_replies","content":"Choose an answer:","widgetData":{"options":["Yes","No"]}}"#,
        )
        .expect("valid reply");
        let Widget::QuickReplies(data) = reply.widget else {
            panic!("expected quick replies");
        };
        assert_eq!(
            data.options,
            vec![
                QuickReplyOption::Text("Yes".into()),
                QuickReplyOption::Text("No".into())
            ]
        );
    }

    #[test]
    fn unknown_type_renders_as_text() {
        let reply = interpret_reply(r#"{"type":"hologram","content":"Beam me up"}"#)
            .expect("valid reply");
        assert_eq!(reply, Reply::text("Beam me up"));
    }

    #[test]
    fn missing_type_renders_as_text() {
        let reply = interpret_reply(r#"{"content":"Plain"}"#).expect("valid reply");
        assert_eq!(reply, Reply::text("Plain"));
    }

    #[test]
    fn mismatched_payload_degrades_to_text() {
        let reply = interpret_reply(
            r#"{"type":"carousel","content":"Look","widgetData":{"items":42}}"#,
        )
        .expect("valid reply");
        assert_eq!(reply, Reply::text("Look"));
    }

    #[test]
    fn fenced_json_is_accepted() {
        let reply = interpret_reply("```json\n{\"type\":\"text\",\"content\":\"hi\"}\n```")
            .expect("valid reply");
        assert_eq!(reply, Reply::text("hi"));
    }

    #[test]
    fn strip_code_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```{}```"), "{}");
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json [1] ```"), "[1]");
    }

    #[test]
    fn one_line_fence_with_info_string_is_accepted() {
        let reply = interpret_reply(r#"```json{"type":"text","content":"hi"}```"#)
            .expect("valid reply");
        assert_eq!(reply, Reply::text("hi"));
    }

    #[test]
    fn unparseable_reply_is_an_error() {
        assert!(interpret_reply("Sure! Here you go").is_err());
        assert!(interpret_reply("[1,2,3]").is_err());
    }

    #[test]
    fn outcome_errors_become_fallback_text() {
        assert_eq!(
            reply_from_outcome(Err(GenerationError::Transport("refused".into()))),
            Reply::text(FALLBACK_REPLY)
        );
        assert_eq!(
            reply_from_outcome(Ok("not json".into())),
            Reply::text(FALLBACK_REPLY)
        );
        assert_eq!(
            reply_from_outcome(Err(GenerationError::MissingCredential)),
            Reply::text(MISSING_CREDENTIAL_REPLY)
        );
    }
}

//! The conversation store and widget dispatcher.
//!
//! A [`Conversation`] owns the append-only list of turns. Sending a message
//! appends the user turn immediately, asks the [`Generator`] for a structured
//! reply and appends exactly one model turn, whatever the outcome. Widgets feed
//! their results back through [`Conversation::on_widget_response`]; they never
//! talk to the generator themselves.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::core::generator::{Generator, HistoryTurn};
use crate::core::message::Message;
use crate::core::reply::{reply_from_outcome, Reply};
use crate::utils::logging::LoggingState;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEvent {
    MessageAppended(Message),
    TypingChanged(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationError {
    /// A previous request has not resolved yet; input is disabled until it
    /// does.
    Busy,

    /// Nothing to send.
    EmptyMessage,
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationError::Busy => write!(f, "Still waiting for the previous reply"),
            ConversationError::EmptyMessage => write!(f, "Message is empty"),
        }
    }
}

impl Error for ConversationError {}

#[derive(Default)]
struct ConversationState {
    messages: Vec<Message>,
    typing: bool,
    next_id: u64,
}

pub struct Conversation {
    generator: Arc<dyn Generator>,
    state: Mutex<ConversationState>,
    request_gate: tokio::sync::Mutex<()>,
    events: broadcast::Sender<ConversationEvent>,
    transcript: Mutex<LoggingState>,
}

/// Clears the typing indicator when dropped, including when the request
/// future is dropped mid-flight.
struct TypingGuard<'a> {
    conversation: &'a Conversation,
}

impl Drop for TypingGuard<'_> {
    fn drop(&mut self) {
        self.conversation.set_typing(false);
    }
}

impl Conversation {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            generator,
            state: Mutex::new(ConversationState::default()),
            request_gate: tokio::sync::Mutex::new(()),
            events,
            transcript: Mutex::new(LoggingState::default()),
        }
    }

    /// Append every turn to a transcript file as well.
    pub fn with_transcript(mut self, transcript: LoggingState) -> Self {
        self.transcript = Mutex::new(transcript);
        self
    }

    /// Start writing the transcript to `path`.
    pub fn set_transcript_file(&self, path: String) -> Result<String, Box<dyn Error>> {
        self.lock_transcript().set_log_file(path)
    }

    /// Pause or resume the transcript.
    pub fn toggle_transcript(&self) -> Result<String, Box<dyn Error>> {
        self.lock_transcript().toggle_logging("Logging paused")
    }

    pub fn transcript_status(&self) -> String {
        self.lock_transcript().get_status_string()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock_state().messages.clone()
    }

    pub fn is_typing(&self) -> bool {
        self.lock_state().typing
    }

    /// True while a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.request_gate.try_lock().is_err()
    }

    /// Send a user utterance and wait for the model's turn, which is returned.
    ///
    /// Rejected with [`ConversationError::Busy`] while another request is in
    /// flight, in which case nothing is appended.
    pub async fn send_user_message(&self, text: &str) -> Result<Message, ConversationError> {
        if text.trim().is_empty() {
            return Err(ConversationError::EmptyMessage);
        }
        let _gate = self
            .request_gate
            .try_lock()
            .map_err(|_| ConversationError::Busy)?;

        let history: Vec<HistoryTurn> = self
            .lock_state()
            .messages
            .iter()
            .map(|message| HistoryTurn {
                role: message.role,
                text: message.content.clone(),
            })
            .collect();

        self.append(|id| Message::user(id, text));
        self.set_typing(true);
        let typing = TypingGuard { conversation: self };

        debug!(turns = history.len(), "requesting reply");
        let outcome = self.generator.reply(&history, text).await;
        let Reply { content, widget } = reply_from_outcome(outcome);
        let reply = self.append(|id| Message::model(id, content, widget));

        drop(typing);
        Ok(reply)
    }

    /// Callback handed to every widget renderer: the widget's result becomes
    /// the next user turn, exactly as if it had been typed.
    pub async fn on_widget_response(&self, raw_value: &str) -> Result<Message, ConversationError> {
        debug!(value = raw_value, "widget response");
        self.send_user_message(raw_value).await
    }

    fn append(&self, build: impl FnOnce(u64) -> Message) -> Message {
        let message = {
            let mut state = self.lock_state();
            state.next_id += 1;
            let message = build(state.next_id);
            state.messages.push(message.clone());
            message
        };
        self.log_turn(&message);
        let _ = self
            .events
            .send(ConversationEvent::MessageAppended(message.clone()));
        message
    }

    fn set_typing(&self, typing: bool) {
        {
            let mut state = self.lock_state();
            if state.typing == typing {
                return;
            }
            state.typing = typing;
        }
        let _ = self.events.send(ConversationEvent::TypingChanged(typing));
    }

    fn log_turn(&self, message: &Message) {
        let transcript = self.lock_transcript();
        if !transcript.is_active() {
            return;
        }
        let line = if message.is_user() {
            format!("You: {}", message.content)
        } else if message.widget_type().style_kind().is_some() {
            format!("{} [{}]", message.content, message.widget_type().as_str())
        } else {
            message.content.clone()
        };
        if let Err(err) = transcript.log_message(&line) {
            warn!(error = %err, "failed to write transcript");
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_transcript(&self) -> MutexGuard<'_, LoggingState> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::GenerationError;
    use crate::core::message::Role;
    use crate::core::reply::FALLBACK_REPLY;
    use crate::core::widget::{DatePickerData, Widget, WidgetType};
    use crate::utils::test_utils::FakeGenerator;
    use std::time::Duration;

    fn conversation(generator: &Arc<FakeGenerator>) -> Conversation {
        Conversation::new(generator.clone())
    }

    #[tokio::test]
    async fn book_a_meeting_end_to_end() {
        let generator = Arc::new(
            FakeGenerator::new()
                .with_reply(Ok(r#"{"type":"date_picker","content":"Select a meeting date:","widgetData":{"title":"Pick a date"}}"#.to_string()))
                .with_reply(Ok(r#"{"type":"text","content":"Booked for June 1st."}"#.to_string())),
        );
        let conversation = conversation(&generator);

        let reply = conversation
            .send_user_message("Book a meeting.")
            .await
            .expect("sent");
        assert_eq!(reply.widget_type(), WidgetType::DatePicker);

        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Book a meeting.");
        assert_eq!(messages[1].role, Role::Model);
        assert_eq!(messages[1].content, "Select a meeting date:");
        assert_eq!(
            messages[1].widget,
            Widget::DatePicker(DatePickerData {
                title: Some("Pick a date".into())
            })
        );

        conversation
            .on_widget_response("2024-06-01")
            .await
            .expect("sent");
        let messages = conversation.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].role, Role::User);
        assert_eq!(messages[2].content, "2024-06-01");

        let calls = generator.reply_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].utterance, "2024-06-01");
        assert_eq!(calls[1].history.len(), 2);
        assert_eq!(calls[1].history[1].text, "Select a meeting date:");
    }

    #[tokio::test]
    async fn history_excludes_the_new_utterance() {
        let generator = Arc::new(FakeGenerator::new());
        let conversation = conversation(&generator);
        conversation.send_user_message("first").await.expect("sent");

        let calls = generator.reply_calls();
        assert!(calls[0].history.is_empty());
        assert_eq!(calls[0].utterance, "first");
    }

    #[tokio::test]
    async fn transport_failure_appends_one_fallback_and_clears_typing() {
        let generator = Arc::new(
            FakeGenerator::new().with_reply(Err(GenerationError::Transport("refused".into()))),
        );
        let conversation = conversation(&generator);
        let mut events = conversation.subscribe();

        let reply = conversation.send_user_message("hello").await.expect("sent");
        assert_eq!(reply.content, FALLBACK_REPLY);
        assert_eq!(reply.widget, Widget::Text);

        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages.iter().filter(|m| m.content == FALLBACK_REPLY).count(),
            1
        );
        assert!(!conversation.is_typing());

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert!(matches!(seen[0], ConversationEvent::MessageAppended(ref m) if m.is_user()));
        assert_eq!(seen[1], ConversationEvent::TypingChanged(true));
        assert!(matches!(seen[2], ConversationEvent::MessageAppended(ref m) if m.is_model()));
        assert_eq!(seen[3], ConversationEvent::TypingChanged(false));
    }

    #[tokio::test]
    async fn unknown_type_is_rendered_as_text() {
        let generator = Arc::new(
            FakeGenerator::new()
                .with_reply(Ok(r#"{"type":"slider","content":"Slide it"}"#.to_string())),
        );
        let conversation = conversation(&generator);
        let reply = conversation.send_user_message("hi").await.expect("sent");
        assert_eq!(reply.widget, Widget::Text);
        assert_eq!(reply.content, "Slide it");
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let generator = Arc::new(FakeGenerator::new());
        let conversation = conversation(&generator);
        assert_eq!(
            conversation.send_user_message("   ").await,
            Err(ConversationError::EmptyMessage)
        );
        assert!(conversation.messages().is_empty());
        assert!(generator.reply_calls().is_empty());
    }

    #[tokio::test]
    async fn overlapping_requests_are_rejected() {
        let generator = Arc::new(FakeGenerator::new().with_delay(Duration::from_millis(100)));
        let conversation = Arc::new(conversation(&generator));

        let first = {
            let conversation = conversation.clone();
            tokio::spawn(async move { conversation.send_user_message("first").await })
        };
        // Wait until the first request is in flight.
        while !conversation.is_typing() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(conversation.is_busy());
        assert_eq!(
            conversation.send_user_message("second").await,
            Err(ConversationError::Busy)
        );

        first.await.expect("join").expect("first sent");
        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "first");
        assert!(!conversation.is_busy());

        conversation.send_user_message("third").await.expect("sent");
        assert_eq!(conversation.messages().len(), 4);
    }

    #[tokio::test]
    async fn dropped_request_clears_typing() {
        let generator = Arc::new(FakeGenerator::new().with_delay(Duration::from_secs(5)));
        let conversation = conversation(&generator);

        let result = tokio::time::timeout(
            Duration::from_millis(20),
            conversation.send_user_message("slow"),
        )
        .await;
        assert!(result.is_err());
        assert!(!conversation.is_typing());
        assert!(!conversation.is_busy());
    }

    #[tokio::test]
    async fn message_ids_increase() {
        let generator = Arc::new(FakeGenerator::new());
        let conversation = conversation(&generator);
        conversation.send_user_message("a").await.expect("sent");
        conversation.send_user_message("b").await.expect("sent");
        let ids: Vec<u64> = conversation.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn turns_are_written_to_the_transcript() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chat.log");
        let mut transcript = LoggingState::new(None);
        transcript
            .set_log_file(path.to_string_lossy().to_string())
            .expect("log file");

        let generator = Arc::new(
            FakeGenerator::new().with_reply(Ok(
                r#"{"type":"feedback","content":"How was it?"}"#.to_string(),
            )),
        );
        let conversation = Conversation::new(generator).with_transcript(transcript);
        conversation.send_user_message("done").await.expect("sent");

        let written = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(written, "You: done\n\nHow was it? [feedback]\n\n");
    }

    #[tokio::test]
    async fn paused_transcript_skips_turns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chat.log");
        let generator = Arc::new(FakeGenerator::new());
        let conversation = conversation(&generator);
        assert_eq!(conversation.transcript_status(), "disabled");

        conversation
            .set_transcript_file(path.to_string_lossy().to_string())
            .expect("log file");
        conversation.send_user_message("one").await.expect("sent");
        conversation.toggle_transcript().expect("pause");
        conversation.send_user_message("two").await.expect("sent");
        assert_eq!(conversation.transcript_status(), "paused (chat.log)");

        let written = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(written, "You: one\n\nok\n\n## Logging paused\n\n");
    }
}

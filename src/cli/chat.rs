//! Line-based chat session: model turns are painted with their widget and the
//! next line answers that widget when it can.

use std::error::Error;
use std::io::Write;
use std::sync::Arc;

use tokio::io::{stdin, AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use crate::cli::gemini_client;
use crate::cli::theme::ThemeFiles;
use crate::core::config::Config;
use crate::core::conversation::{Conversation, ConversationError};
use crate::core::message::Message;
use crate::core::theme::ThemeConfig;
use crate::ui::chrome::{answer_hint, Painter};
use crate::ui::renderer::{answer, render_turn, WidgetView};
use crate::ui::widgets::form::{self, FormView};
use crate::utils::color::detect_color_depth;

const HELP: &str = "\
Type a message and press Enter.
When the assistant shows a widget, answer it by number or value;
anything else is sent as a normal message.
  /log <file>   write the transcript to a file
  /log          pause or resume the transcript
  /help         show this help
  /quit         leave the chat";

pub async fn run_chat(config: &Config, log: Option<String>) -> Result<(), Box<dyn Error>> {
    let theme = ThemeFiles::locate()?.load()?.active().clone();
    let client = gemini_client(config);
    println!("💬 Chatskin ({}). Type /help for help, /quit to leave.", client.model());
    let conversation = Conversation::new(Arc::new(client));

    if let Some(path) = log {
        println!("{}", conversation.set_transcript_file(path)?);
    }

    let mut session = Session {
        conversation,
        theme,
        painter: Painter::new(detect_color_depth()),
        pending: None,
    };
    let mut lines = BufReader::new(stdin()).lines();
    session.run(&mut lines).await
}

struct Session {
    conversation: Conversation,
    theme: ThemeConfig,
    painter: Painter,
    /// The last model widget, still waiting for an answer.
    pending: Option<WidgetView>,
}

impl Session {
    async fn run<R>(&mut self, lines: &mut Lines<R>) -> Result<(), Box<dyn Error>>
    where
        R: AsyncBufRead + Unpin,
    {
        loop {
            prompt(self.pending.as_ref().map(answer_hint))?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let input = line.trim();

            match input {
                "/quit" | "/exit" => break,
                "/help" => {
                    println!("{HELP}");
                    continue;
                }
                "/log" => {
                    report(self.conversation.toggle_transcript());
                    continue;
                }
                _ => {
                    if let Some(path) = input.strip_prefix("/log ") {
                        report(self.conversation.set_transcript_file(path.trim().to_string()));
                        continue;
                    }
                }
            }

            let outcome = match self.pending.take() {
                Some(WidgetView::Form(view)) if input.is_empty() => {
                    match fill_form(&view, lines).await? {
                        Some(values) => self.answer(&form::response(&values)).await,
                        None => {
                            println!("Form cancelled.");
                            continue;
                        }
                    }
                }
                Some(widget) => match answer(&widget, input) {
                    Some(value) => self.answer(&value).await,
                    None if input.is_empty() => {
                        self.pending = Some(widget);
                        continue;
                    }
                    None => self.send(input).await,
                },
                None if input.is_empty() => continue,
                None => self.send(input).await,
            };

            match outcome {
                Ok(reply) => self.show(&reply),
                Err(err) => eprintln!("⚠️  {err}"),
            }
        }
        Ok(())
    }

    async fn send(&self, text: &str) -> Result<Message, ConversationError> {
        self.typing();
        let result = self.conversation.send_user_message(text).await;
        clear_line();
        result
    }

    async fn answer(&self, value: &str) -> Result<Message, ConversationError> {
        debug!(value, "answering widget");
        println!("  ↳ {value}");
        self.typing();
        let result = self.conversation.on_widget_response(value).await;
        clear_line();
        result
    }

    fn typing(&self) {
        print!("{} ", self.painter.typing(&self.theme.colors.neutral));
        let _ = std::io::stdout().flush();
    }

    fn show(&mut self, reply: &Message) {
        let turn = render_turn(reply, &self.theme);
        for line in self.painter.turn(&turn) {
            println!("{line}");
        }
        self.pending = turn.widget;
    }
}

/// Ask for every field in turn. A blank line re-asks; `/cancel` abandons the
/// form.
async fn fill_form<R>(
    view: &FormView,
    lines: &mut Lines<R>,
) -> Result<Option<Vec<(String, String)>>, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
{
    let mut values = Vec::with_capacity(view.fields.len());
    for field in &view.fields {
        loop {
            print!("  {}: ", field.label);
            std::io::stdout().flush()?;
            let Some(line) = lines.next_line().await? else {
                return Ok(None);
            };
            let value = line.trim();
            if value == "/cancel" {
                return Ok(None);
            }
            if !value.is_empty() {
                values.push((field.name.clone(), value.to_string()));
                break;
            }
        }
    }
    debug_assert!(form::missing_fields(view, &values).is_empty());
    Ok(Some(values))
}

fn report(result: Result<String, Box<dyn Error>>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(err) => eprintln!("⚠️  {err}"),
    }
}

fn prompt(hint: Option<&str>) -> std::io::Result<()> {
    match hint {
        Some(hint) => print!("({hint}) > "),
        None => print!("> "),
    }
    std::io::stdout().flush()
}

fn clear_line() {
    print!("\r");
    let _ = std::io::stdout().flush();
}

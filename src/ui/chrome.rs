//! Paints rendered turns as ANSI-colored terminal lines.

use crate::ui::renderer::{TurnView, WidgetView};
use crate::ui::widgets::feedback::MAX_STARS;
use crate::utils::color::{paint, ColorDepth};

const AVATAR: &str = "●";
const STAR: &str = "★";

#[derive(Debug, Clone, Copy)]
pub struct Painter {
    depth: ColorDepth,
}

impl Painter {
    pub fn new(depth: ColorDepth) -> Self {
        Self { depth }
    }

    fn fg(&self, text: &str, color: &str) -> String {
        paint(text, color, None, self.depth)
    }

    fn on(&self, text: &str, fg: &str, bg: &str) -> String {
        paint(text, fg, Some(bg), self.depth)
    }

    pub fn turn(&self, turn: &TurnView) -> Vec<String> {
        let mut lines = Vec::new();
        let label = if turn.from_user { "You" } else { "Bot" };
        let avatar = self.fg(AVATAR, &turn.avatar_color);

        match &turn.bubble {
            Some(bubble) => {
                for (i, line) in bubble.text.lines().enumerate() {
                    let lead = if i == 0 {
                        format!("{avatar} {label}: ")
                    } else {
                        " ".repeat(label.len() + 4)
                    };
                    let body = self.on(&format!(" {line} "), &bubble.text_color, &bubble.background);
                    lines.push(format!("{lead}{body}"));
                }
            }
            None => lines.push(format!("{avatar} {label}:")),
        }

        if let Some(widget) = &turn.widget {
            lines.extend(self.widget(widget).into_iter().map(|line| format!("    {line}")));
        }
        lines
    }

    pub fn widget(&self, widget: &WidgetView) -> Vec<String> {
        match widget {
            WidgetView::DatePicker(view) => {
                let days: Vec<String> = view
                    .days
                    .iter()
                    .enumerate()
                    .map(|(i, day)| {
                        let cell = format!(" {} {} {} ", i + 1, day.day, day.month);
                        if i == 0 {
                            self.on(&cell, &view.highlight_text, &view.highlight_background)
                        } else {
                            self.on(&cell, &view.text, &view.background)
                        }
                    })
                    .collect();
                vec![
                    self.on(&format!(" {} ", view.title), &view.text, &view.background),
                    days.join(&self.fg("│", &view.border)),
                ]
            }
            WidgetView::QuickReplies(view) => {
                let chips: Vec<String> = view
                    .labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| self.on(&format!(" {} {label} ", i + 1), &view.accent, &view.background))
                    .collect();
                vec![chips.join(" ")]
            }
            WidgetView::Dropdown(view) => {
                let mut lines = vec![
                    self.fg(&view.title, &view.text),
                    self.fg(&format!("[{} ▾]", view.placeholder), &view.select_border),
                ];
                lines.extend(
                    view.options
                        .iter()
                        .enumerate()
                        .map(|(i, choice)| self.on(&format!(" {}. {} ", i + 1, choice.label), &view.text, &view.background)),
                );
                lines
            }
            WidgetView::Carousel(view) => {
                let mut lines = Vec::new();
                for (i, card) in view.cards.iter().enumerate() {
                    let mut header = format!(" {}. {} ", i + 1, card.title);
                    if let Some(blurb) = &card.blurb {
                        header.push_str(&format!("- {blurb} "));
                    }
                    let button = self.on(&format!(" {} ", card.button_label), &view.action.text, &view.action.accent);
                    lines.push(format!("{} {button}", self.on(&header, &view.title_color, &view.background)));
                    if let Some(url) = &card.image_url {
                        lines.push(format!("    {}", self.fg(url, &view.border)));
                    }
                }
                if lines.is_empty() {
                    lines.push(self.fg("(no items)", &view.border));
                }
                lines
            }
            WidgetView::Form(view) => {
                let mut lines = vec![self.on(&format!(" {} ", view.title), &view.label_color, &view.background)];
                for field in &view.fields {
                    let hint = field.placeholder.as_deref().unwrap_or(&field.input_type);
                    lines.push(format!(
                        "{} {}",
                        self.fg(&field.label, &view.label_color),
                        self.fg(&format!("[{hint}]"), &view.input_border)
                    ));
                }
                lines.push(self.on(&format!(" {} ", view.submit_label), &view.action.text, &view.action.accent));
                lines
            }
            WidgetView::Feedback(view) => {
                let stars: String = (0..MAX_STARS).map(|_| STAR).collect();
                vec![
                    self.on(&format!(" {} ", view.title), &view.title_color, &view.background),
                    format!("{} {}", self.fg(&stars, &view.star), self.fg("(1-5)", &view.unlit_star)),
                ]
            }
            WidgetView::FileUpload(view) => {
                let mut lines = vec![self.on(&format!(" {} ", view.title), &view.action.text, &view.action.accent)];
                if !view.accept.is_empty() {
                    lines.push(self.fg(&format!("accepts {}", view.accept), &view.border));
                }
                lines
            }
        }
    }

    pub fn typing(&self, color: &str) -> String {
        self.fg("…", color)
    }
}

/// What the REPL asks for while a widget is waiting for an answer.
pub fn answer_hint(widget: &WidgetView) -> &'static str {
    match widget {
        WidgetView::DatePicker(_) => "pick a day number or type a date (yyyy-mm-dd)",
        WidgetView::QuickReplies(_) => "pick a number or type a reply",
        WidgetView::Dropdown(_) => "pick an option number",
        WidgetView::Carousel(_) => "pick a card number",
        WidgetView::Form(_) => "press enter to fill in the form",
        WidgetView::Feedback(_) => "rate from 1 to 5",
        WidgetView::FileUpload(_) => "enter a file path",
    }
}

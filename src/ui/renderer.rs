//! Closed dispatch from a conversation turn to its view.

use chrono::{Local, NaiveDate};

use crate::core::message::Message;
use crate::core::theme::ThemeConfig;
use crate::core::widget::Widget;
use crate::ui::widgets::{
    carousel, date_picker, dropdown, feedback, file_upload, form, quick_replies,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetView {
    DatePicker(date_picker::DatePickerView),
    QuickReplies(quick_replies::QuickRepliesView),
    Dropdown(dropdown::DropdownView),
    Carousel(carousel::CarouselView),
    Form(form::FormView),
    Feedback(feedback::FeedbackView),
    FileUpload(file_upload::FileUploadView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub text: String,
    pub background: String,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    pub from_user: bool,
    pub avatar_color: String,
    /// Absent when the turn has no text.
    pub bubble: Option<Bubble>,
    /// Widgets are only drawn on model turns.
    pub widget: Option<WidgetView>,
}

pub fn render_turn(message: &Message, theme: &ThemeConfig) -> TurnView {
    render_turn_on(message, theme, Local::now().date_naive())
}

/// As [`render_turn`], with `today` anchoring the date picker.
pub fn render_turn_on(message: &Message, theme: &ThemeConfig, today: NaiveDate) -> TurnView {
    let from_user = message.is_user();
    let surface = if from_user {
        &theme.components.user_message
    } else {
        &theme.components.bot_message
    };

    let bubble = (!message.content.is_empty()).then(|| Bubble {
        text: message.content.clone(),
        background: surface.background_color.clone(),
        text_color: surface.text_color.clone(),
    });

    let widget = if message.is_model() {
        render_widget(&message.widget, theme, today)
    } else {
        None
    };

    TurnView {
        from_user,
        avatar_color: if from_user {
            theme.colors.primary.clone()
        } else {
            theme.colors.neutral.clone()
        },
        bubble,
        widget,
    }
}

pub fn render_widget(widget: &Widget, theme: &ThemeConfig, today: NaiveDate) -> Option<WidgetView> {
    Some(match widget {
        Widget::Text => return None,
        Widget::DatePicker(data) => {
            WidgetView::DatePicker(date_picker::view(data, theme, today))
        }
        Widget::QuickReplies(data) => WidgetView::QuickReplies(quick_replies::view(data, theme)),
        Widget::Dropdown(data) => WidgetView::Dropdown(dropdown::view(data, theme)),
        Widget::Carousel(data) => WidgetView::Carousel(carousel::view(data, theme)),
        Widget::Form(data) => WidgetView::Form(form::view(data, theme)),
        Widget::Feedback(data) => WidgetView::Feedback(feedback::view(data, theme)),
        Widget::FileUpload(data) => WidgetView::FileUpload(file_upload::view(data, theme)),
    })
}

/// Interpret a typed answer to a widget as its response value. Forms are
/// filled field by field and never answer from a single line.
pub fn answer(widget: &WidgetView, input: &str) -> Option<String> {
    match widget {
        WidgetView::DatePicker(view) => date_picker::respond(view, input),
        WidgetView::QuickReplies(view) => quick_replies::respond(view, input),
        WidgetView::Dropdown(view) => dropdown::respond(view, input),
        WidgetView::Carousel(view) => carousel::respond(view, input),
        WidgetView::Form(_) => None,
        WidgetView::Feedback(_) => feedback::respond(input),
        WidgetView::FileUpload(_) => file_upload::respond(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reply::interpret_reply;
    use crate::core::theme::default_theme;
    use crate::core::widget::{DatePickerData, WidgetType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }

    #[test]
    fn user_turns_are_plain_bubbles() {
        let theme = default_theme();
        let view = render_turn_on(&Message::user(1, "Book a meeting."), &theme, today());
        assert!(view.from_user);
        assert_eq!(view.avatar_color, theme.colors.primary);
        let bubble = view.bubble.expect("bubble");
        assert_eq!(bubble.background, theme.components.user_message.background_color);
        assert_eq!(bubble.text_color, theme.components.user_message.text_color);
        assert!(view.widget.is_none());
    }

    #[test]
    fn model_turn_without_text_shows_only_widget() {
        let theme = default_theme();
        let message = Message::model(2, "", Widget::DatePicker(DatePickerData::default()));
        let view = render_turn_on(&message, &theme, today());
        assert_eq!(view.avatar_color, theme.colors.neutral);
        assert!(view.bubble.is_none());
        assert!(matches!(view.widget, Some(WidgetView::DatePicker(_))));
    }

    #[test]
    fn every_widget_type_dispatches_to_its_renderer() {
        let theme = default_theme();
        for widget_type in WidgetType::ALL {
            let raw = format!(r#"{{"type":"{}","content":"x"}}"#, widget_type.as_str());
            let reply = interpret_reply(&raw).expect("valid reply");
            let view = render_widget(&reply.widget, &theme, today());
            let rendered = match view {
                None => WidgetType::Text,
                Some(WidgetView::DatePicker(_)) => WidgetType::DatePicker,
                Some(WidgetView::QuickReplies(_)) => WidgetType::QuickReplies,
                Some(WidgetView::Dropdown(_)) => WidgetType::Dropdown,
                Some(WidgetView::Carousel(_)) => WidgetType::Carousel,
                Some(WidgetView::Form(_)) => WidgetType::Form,
                Some(WidgetView::Feedback(_)) => WidgetType::Feedback,
                Some(WidgetView::FileUpload(_)) => WidgetType::FileUpload,
            };
            assert_eq!(rendered, widget_type);
        }
    }

    #[test]
    fn theme_change_restyles_existing_turns() {
        let mut theme = default_theme();
        let message = Message::model(3, "hello", Widget::Text);
        let before = render_turn_on(&message, &theme, today());
        theme.components.bot_message.background_color = "#000000".into();
        let after = render_turn_on(&message, &theme, today());
        assert_ne!(before.bubble, after.bubble);
        assert_eq!(after.bubble.expect("bubble").background, "#000000");
    }

    #[test]
    fn answers_route_to_the_widget() {
        let theme = default_theme();
        let quick = render_widget(
            &interpret_reply(r#"{"type":"quick_replies","widgetData":{"options":["Yes","No"]}}"#)
                .expect("reply")
                .widget,
            &theme,
            today(),
        )
        .expect("widget");
        assert_eq!(answer(&quick, "2").as_deref(), Some("No"));

        let picker = render_widget(
            &Widget::DatePicker(DatePickerData::default()),
            &theme,
            today(),
        )
        .expect("widget");
        assert_eq!(answer(&picker, "1").as_deref(), Some("2024-06-01"));
        assert_eq!(answer(&picker, "2024-07-01"), None);

        let form = render_widget(
            &interpret_reply(r#"{"type":"form"}"#).expect("reply").widget,
            &theme,
            today(),
        )
        .expect("widget");
        assert_eq!(answer(&form, "anything"), None);
    }
}

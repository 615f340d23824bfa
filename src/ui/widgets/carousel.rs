use super::{action_colors, frame, ActionColors};
use crate::core::theme::{ThemeConfig, WidgetKind};
use crate::core::widget::{CarouselData, CarouselItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselCard {
    pub title: String,
    pub blurb: Option<String>,
    pub image_url: Option<String>,
    pub button_label: String,
    /// Sent back when the card's button is pressed.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselView {
    pub cards: Vec<CarouselCard>,
    pub background: String,
    pub border: String,
    pub title_color: String,
    pub action: ActionColors,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// First action value, else the item id, else its title, else its position.
pub fn item_value(item: &CarouselItem, index: usize) -> String {
    let first_action = item.actions.first();
    present(first_action.and_then(|a| a.value.as_deref()))
        .or_else(|| present(item.id.as_deref()))
        .or_else(|| present(Some(item.title.as_str())))
        .map(str::to_string)
        .unwrap_or_else(|| index.to_string())
}

pub fn button_label(item: &CarouselItem) -> String {
    present(item.actions.first().map(|a| a.text.as_str()))
        .unwrap_or("Select")
        .to_string()
}

pub fn view(data: &CarouselData, theme: &ThemeConfig) -> CarouselView {
    let style = frame(theme, WidgetKind::Carousel);
    CarouselView {
        cards: data
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| CarouselCard {
                title: item.title.clone(),
                blurb: present(item.description.as_deref())
                    .or_else(|| present(item.subtitle.as_deref()))
                    .map(str::to_string),
                image_url: item.image_url.clone(),
                button_label: button_label(item),
                value: item_value(item, index),
            })
            .collect(),
        background: style.background_color,
        border: style.border_color,
        title_color: style.text_color,
        action: action_colors(theme, WidgetKind::Carousel),
    }
}

/// Press the button of the card at a 1-based position.
pub fn respond(view: &CarouselView, input: &str) -> Option<String> {
    let position = input.trim().parse::<usize>().ok()?;
    position
        .checked_sub(1)
        .and_then(|i| view.cards.get(i))
        .map(|card| card.value.clone())
}

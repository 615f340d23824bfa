use serde::{Deserialize, Serialize};

use crate::core::widget::{Widget, WidgetType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_model(self) -> bool {
        self == Role::Model
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "model" => Ok(Role::Model),
            _ => Err(format!("invalid role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

/// One conversation turn. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    /// Display text; may be empty when the widget carries the whole turn.
    pub content: String,
    pub widget: Widget,
}

impl Message {
    pub fn user(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            widget: Widget::Text,
        }
    }

    pub fn model(id: u64, content: impl Into<String>, widget: Widget) -> Self {
        Self {
            id,
            role: Role::Model,
            content: content.into(),
            widget,
        }
    }

    pub fn widget_type(&self) -> WidgetType {
        self.widget.widget_type()
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_model(&self) -> bool {
        self.role.is_model()
    }
}

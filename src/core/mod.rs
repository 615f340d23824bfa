pub mod config;
pub mod conversation;
pub mod credentials;
pub mod generator;
pub mod message;
pub mod reply;
pub mod theme;
pub mod widget;

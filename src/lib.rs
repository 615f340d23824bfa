//! Chatskin is a themeable widget chat client for the terminal.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, reply interpretation, widget payloads,
//!   configuration, credentials, and the theme store with its color cascade.
//! - [`ui`] turns conversation turns into styled widget views and paints them
//!   as terminal lines.
//! - [`api`] holds the Gemini wire types and the HTTP generation client.
//! - [`utils`] carries transcript logging, terminal color handling, and URL
//!   helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into the chat REPL or the
//! theme, auth, and config commands.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;

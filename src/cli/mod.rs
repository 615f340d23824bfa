//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and dispatches to the chat REPL,
//! theme management, credential setup, or config edits.

pub mod auth;
pub mod chat;
pub mod theme;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use crate::api::gemini::GeminiClient;
use crate::cli::auth::{interactive_auth, remove_auth};
use crate::cli::chat::run_chat;
use crate::cli::theme::run_theme_command;
use crate::core::config::Config;
use crate::core::credentials::{CredentialStore, API_KEY_ENV};

#[derive(Parser)]
#[command(name = "chatskin")]
#[command(about = "A themeable widget chat client for the terminal")]
#[command(
    long_about = "Chatskin is a terminal chat client whose assistant answers with interactive \
widgets (date pickers, quick replies, dropdowns, carousels, forms, ratings and file uploads). \
Every widget is colored by a theme you can edit by hand, import as JSON, or generate from an image.\n\n\
Authentication:\n\
  Use 'chatskin auth' to store your Gemini API key in the system keyring.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    API key (takes precedence over the keyring)\n\
  RUST_LOG          Diagnostic log filter, e.g. chatskin=debug\n\
  NO_COLOR          Disable colored output\n\n\
Commands inside chat:\n\
  /help             Show chat help\n\
  /quit             Leave the chat"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for generation
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Base URL of the generation API
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat {
        /// Append the transcript to this file
        #[arg(short = 'l', long)]
        log: Option<String>,
    },
    /// Inspect, preview, deploy or reset the theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Store the API key in the system keyring
    Auth,
    /// Remove the stored API key
    Deauth,
    /// Set a configuration value (model or base-url)
    Set { key: String, value: String },
    /// Unset a configuration value
    Unset { key: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ThemeAction {
    /// Show the active theme
    Show,
    /// Print the active theme as JSON
    Export,
    /// Preview a theme from a JSON file
    Import { file: PathBuf },
    /// Preview a theme generated from an image
    FromImage { file: PathBuf },
    /// Preview a single color change, e.g. `colors.primary #112233`
    Set { target: String, value: String },
    /// Commit the previewed theme
    Deploy,
    /// Discard any preview and return to the built-in theme
    Reset,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

fn init_tracing() {
    // Diagnostics go to stderr so they never mix with the chat transcript.
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = Config::load()?.with_overrides(args.model, args.base_url);

    match args.command.unwrap_or(Commands::Chat { log: None }) {
        Commands::Chat { log } => run_chat(&config, log).await,
        Commands::Theme { action } => run_theme_command(&config, action).await,
        Commands::Auth => interactive_auth(),
        Commands::Deauth => remove_auth(),
        Commands::Set { key, value } => {
            let mut stored = Config::load()?;
            stored.set_value(&key, &value)?;
            stored.save()?;
            println!("✅ Set {key} to: {}", value.trim());
            Ok(())
        }
        Commands::Unset { key } => {
            let mut stored = Config::load()?;
            stored.unset_value(&key)?;
            stored.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
    }
}

/// Build the generation client. A missing or unreadable key is not fatal:
/// requests then fail with the standing missing-credential reply.
pub(crate) fn gemini_client(config: &Config) -> GeminiClient {
    let api_key = match CredentialStore::new().resolve_api_key() {
        Ok(key) => key,
        Err(err) => {
            warn!(error = %err, "could not read API key from keyring");
            None
        }
    };
    if api_key.is_none() {
        eprintln!("⚠️  No API key found. Set {API_KEY_ENV} or run 'chatskin auth'.");
    }
    GeminiClient::new(config, api_key)
}

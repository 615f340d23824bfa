use std::error::Error;
use std::io::{self, Write};

use crate::core::credentials::{CredentialStore, API_KEY_ENV};

pub fn interactive_auth() -> Result<(), Box<dyn Error>> {
    println!("🔐 Chatskin Authentication Setup");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    if std::env::var(API_KEY_ENV).is_ok_and(|v| !v.trim().is_empty()) {
        println!("Note: {API_KEY_ENV} is set and takes precedence over the keyring.");
    }

    let key = prompt("Enter your Gemini API key: ")?;
    let key = key.trim();
    if key.is_empty() {
        return Err("API key cannot be empty".into());
    }

    CredentialStore::new().set_key(key)?;
    println!("✅ API key stored in the system keyring");
    Ok(())
}

pub fn remove_auth() -> Result<(), Box<dyn Error>> {
    if CredentialStore::new().remove_key()? {
        println!("✅ API key removed from the system keyring");
    } else {
        println!("No stored API key found");
    }
    Ok(())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

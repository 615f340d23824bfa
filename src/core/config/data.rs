use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Generation model name, e.g. "gemini-2.5-flash"
    pub model: Option<String>,
    /// Root of the generation API, without the `models/...` path
    pub base_url: Option<String>,
}

impl Config {
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// Command-line values win over the file.
    pub fn with_overrides(mut self, model: Option<String>, base_url: Option<String>) -> Self {
        if model.is_some() {
            self.model = model;
        }
        if base_url.is_some() {
            self.base_url = base_url;
        }
        self
    }

    /// Set a key by its command-line name (`model` or `base-url`).
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {key}"));
        }
        *self.slot(key)? = Some(value.to_string());
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), String> {
        *self.slot(key)? = None;
        Ok(())
    }

    fn slot(&mut self, key: &str) -> Result<&mut Option<String>, String> {
        match key {
            "model" => Ok(&mut self.model),
            "base-url" | "base_url" => Ok(&mut self.base_url),
            _ => Err(format!("Unknown config key: {key} (expected model or base-url)")),
        }
    }
}

/// Get a user-friendly display string for a path.
/// Paths under `$HOME` use `~` notation on Unix-like systems.
///
/// # Examples
/// - Unix: `/home/user/.config/chatskin/theme.json` → `~/.config/chatskin/theme.json`
/// - Windows: paths are shown unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = Config {
            model: Some("  ".into()),
            base_url: None,
        };
        assert_eq!(config.effective_model(), DEFAULT_MODEL);
        assert_eq!(config.effective_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = Config {
            model: Some("gemini-from-file".into()),
            base_url: Some("https://file.test".into()),
        }
        .with_overrides(Some("gemini-from-flag".into()), None);
        assert_eq!(config.effective_model(), "gemini-from-flag");
        assert_eq!(config.effective_base_url(), "https://file.test");
    }

    #[test]
    fn set_and_unset_by_key() {
        let mut config = Config::default();
        config.set_value("model", " gemini-2.5-pro ").expect("set");
        config.set_value("base_url", "http://localhost:8080").expect("set");
        assert_eq!(config.effective_model(), "gemini-2.5-pro");
        assert_eq!(config.effective_base_url(), "http://localhost:8080");

        config.unset_value("base-url").expect("unset");
        assert_eq!(config.base_url, None);
        assert!(config.set_value("model", "   ").is_err());
        assert!(config.set_value("theme", "dark").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn paths_outside_home_are_unchanged() {
        assert_eq!(path_display("/definitely/not/home"), "/definitely/not/home");
    }
}

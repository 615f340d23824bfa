//! Reading and writing the committed theme as a JSON document on disk.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::patch::ThemePatch;
use super::{default_theme, ThemeConfig};
use crate::core::config::data::path_display;

#[derive(Debug)]
pub enum ThemeFileError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Write {
        path: PathBuf,
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl fmt::Display for ThemeFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeFileError::Read { path, source } => {
                write!(f, "Failed to read theme at {}: {}", path_display(path), source)
            }
            ThemeFileError::Parse { path, source } => {
                write!(f, "Failed to parse theme at {}: {}", path_display(path), source)
            }
            ThemeFileError::Write { path, source } => {
                write!(f, "Failed to write theme at {}: {}", path_display(path), source)
            }
        }
    }
}

impl StdError for ThemeFileError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ThemeFileError::Read { source, .. } => Some(source),
            ThemeFileError::Parse { source, .. } => Some(source),
            ThemeFileError::Write { source, .. } => Some(source.as_ref()),
        }
    }
}

/// Load a committed theme. A missing file means no theme was ever deployed.
/// Partial documents are laid over the built-in default.
pub fn load_committed(path: &Path) -> Result<Option<ThemeConfig>, ThemeFileError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| ThemeFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let patch = ThemePatch::from_json(&contents).map_err(|source| ThemeFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(default_theme().merged(&patch)))
}

/// Atomically replace the theme file with `theme`.
pub fn save_committed(path: &Path, theme: &ThemeConfig) -> Result<(), ThemeFileError> {
    let write_error = |source: Box<dyn StdError + Send + Sync>| ThemeFileError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir).map_err(|err| write_error(Box::new(err)))?;
    }

    let contents = theme
        .to_pretty_json()
        .map_err(|err| write_error(Box::new(err)))?;
    let mut temp_file = match parent {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(|err| write_error(Box::new(err)))?;

    temp_file
        .write_all(contents.as_bytes())
        .map_err(|err| write_error(Box::new(err)))?;
    temp_file
        .as_file_mut()
        .sync_all()
        .map_err(|err| write_error(Box::new(err)))?;
    temp_file
        .persist(path)
        .map_err(|err| write_error(Box::new(err)))?;
    Ok(())
}

/// Delete a theme file; one that is already gone is not an error.
pub fn remove_theme_file(path: &Path) -> Result<(), ThemeFileError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ThemeFileError::Write {
            path: path.to_path_buf(),
            source: Box::new(err),
        }),
    }
}

use std::path::Path;

use super::{action_colors, frame, title_or, ActionColors};
use crate::core::theme::{ThemeConfig, WidgetKind};
use crate::core::widget::FileUploadData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUploadView {
    pub title: String,
    /// Comma-joined accept filter, e.g. `image/*,.pdf`. Empty accepts anything.
    pub accept: String,
    pub background: String,
    pub border: String,
    pub action: ActionColors,
}

pub fn view(data: &FileUploadData, theme: &ThemeConfig) -> FileUploadView {
    let style = frame(theme, WidgetKind::FileUpload);
    FileUploadView {
        title: title_or(data.title.as_deref(), "Upload Document"),
        accept: data.allowed_types.join(","),
        background: style.background_color,
        border: style.border_color,
        action: action_colors(theme, WidgetKind::FileUpload),
    }
}

/// Only the chosen file's name is sent back.
pub fn response(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| !name.is_empty())
}

/// Treats `input` as a path; only an existing file is accepted.
pub fn respond(input: &str) -> Option<String> {
    let path = Path::new(input.trim());
    if path.is_file() {
        response(path)
    } else {
        None
    }
}

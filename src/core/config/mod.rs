pub mod data;
pub mod io;

pub use data::{path_display, Config, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use io::{config_dir, theme_path, theme_preview_path, ConfigError};

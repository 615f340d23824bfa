//! `chatskin theme ...`: preview, deploy and reset the theme on disk.
//!
//! A preview lives in its own file next to the committed theme until it is
//! deployed or reset, so edits can be stacked across invocations.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use crate::cli::{gemini_client, ThemeAction};
use crate::core::config::{path_display, theme_path, theme_preview_path, Config, ConfigError};
use crate::core::generator::{Generator, ImagePayload};
use crate::core::theme::persist::{
    load_committed, remove_theme_file, save_committed, ThemeFileError,
};
use crate::core::theme::resolve::resolve_widget_style;
use crate::core::theme::{ColorTarget, SurfaceStyle, ThemeConfig, ThemeStore, WidgetKind};
use crate::utils::color::{detect_color_depth, paint, ColorDepth};

pub struct ThemeFiles {
    pub committed: PathBuf,
    pub preview: PathBuf,
}

impl ThemeFiles {
    pub fn locate() -> Result<Self, ConfigError> {
        Ok(Self {
            committed: theme_path()?,
            preview: theme_preview_path()?,
        })
    }

    pub fn load(&self) -> Result<ThemeStore, ThemeFileError> {
        let mut store = match load_committed(&self.committed)? {
            Some(committed) => ThemeStore::with_committed(committed),
            None => ThemeStore::new(),
        };
        if let Some(preview) = load_committed(&self.preview)? {
            store.restore_preview(preview);
        }
        Ok(store)
    }

    /// Mirror the store on disk. A committed theme equal to the built-in one
    /// is not written.
    pub fn save(&self, store: &ThemeStore) -> Result<(), ThemeFileError> {
        if store.committed() == store.builtin() {
            remove_theme_file(&self.committed)?;
        } else {
            save_committed(&self.committed, store.committed())?;
        }
        if store.is_dirty() {
            save_committed(&self.preview, store.active())
        } else {
            remove_theme_file(&self.preview)
        }
    }
}

pub async fn run_theme_command(config: &Config, action: ThemeAction) -> Result<(), Box<dyn Error>> {
    let files = ThemeFiles::locate()?;
    let mut store = files.load()?;

    match action {
        ThemeAction::Show => {
            for line in describe(&store, detect_color_depth()) {
                println!("{line}");
            }
            return Ok(());
        }
        ThemeAction::Export => {
            println!("{}", store.export_json()?);
            return Ok(());
        }
        ThemeAction::FromImage { file } => {
            let client = gemini_client(config);
            println!("🎨 Generating theme from {} ...", path_display(&file));
            preview_image(&mut store, &client, &file).await?;
        }
        other => apply(&mut store, other)?,
    }

    files.save(&store)?;
    println!("{}", status_line(&store));
    if store.is_dirty() {
        println!("Run 'chatskin theme deploy' to keep it or 'chatskin theme reset' to discard.");
    }
    Ok(())
}

/// Apply an action that needs no collaborator.
pub fn apply(store: &mut ThemeStore, action: ThemeAction) -> Result<(), Box<dyn Error>> {
    match action {
        ThemeAction::Import { file } => {
            let text = fs::read_to_string(&file)?;
            store.import_json(&text)?;
        }
        ThemeAction::Set { target, value } => {
            let target: ColorTarget = target.parse()?;
            let value = value.trim();
            if value.is_empty() {
                return Err(format!("A color value is required for {target}").into());
            }
            store.edit_color(target, value);
        }
        ThemeAction::Deploy => {
            if !store.deploy() {
                println!("Nothing to deploy: no theme preview is pending.");
            }
        }
        ThemeAction::Reset => store.reset(),
        ThemeAction::Show | ThemeAction::Export | ThemeAction::FromImage { .. } => {}
    }
    Ok(())
}

pub async fn preview_image(
    store: &mut ThemeStore,
    generator: &dyn Generator,
    file: &std::path::Path,
) -> Result<(), Box<dyn Error>> {
    let bytes = fs::read(file)?;
    let extension = file.extension().and_then(|e| e.to_str());
    let image = ImagePayload::from_bytes(&bytes, ImagePayload::mime_type_for_extension(extension));
    store
        .preview_from_image(generator, &image)
        .await
        .map_err(|err| err.user_message())?;
    Ok(())
}

fn status_line(store: &ThemeStore) -> &'static str {
    match (store.is_dirty(), store.is_custom()) {
        (true, _) => "👀 Previewing theme (not deployed)",
        (false, true) => "✅ Custom theme active",
        (false, false) => "✅ Default theme active",
    }
}

pub fn describe(store: &ThemeStore, depth: ColorDepth) -> Vec<String> {
    let theme = store.active();
    let mut lines = vec![status_line(store).to_string(), String::new()];

    let swatches: Vec<String> = theme
        .palette()
        .iter()
        .map(|&(label, color)| {
            format!("{} {label} {color}", paint("  ", &theme.colors.text_primary, Some(color), depth))
        })
        .collect();
    lines.push(format!("Palette: {}", swatches.join("  ")));
    lines.push(format!(
        "Shapes:  radius {}px, shadow {}",
        theme.shapes.border_radius,
        if theme.shapes.has_shadow { "on" } else { "off" }
    ));
    lines.push(String::new());

    lines.push(bubble_sample("Bot ", &theme.components.bot_message, depth));
    lines.push(bubble_sample("User", &theme.components.user_message, depth));
    lines.push(String::new());

    for kind in WidgetKind::ALL {
        lines.push(widget_sample(theme, kind, depth));
    }
    lines
}

fn bubble_sample(label: &str, surface: &SurfaceStyle, depth: ColorDepth) -> String {
    format!(
        "{label}  {}",
        paint(" Sample message ", &surface.text_color, Some(&surface.background_color), depth)
    )
}

fn widget_sample(theme: &ThemeConfig, kind: WidgetKind, depth: ColorDepth) -> String {
    let style = resolve_widget_style(theme, kind);
    let sample = paint(
        &format!(" {:<13}", kind.config_key()),
        &style.text_color,
        Some(&style.background_color),
        depth,
    );
    format!(
        "{sample} {} {}  bg {} text {} border {} accent {}",
        paint("▌", &style.border_color, None, depth),
        paint("●", &style.accent_color, None, depth),
        style.background_color,
        style.text_color,
        style.border_color,
        style.accent_color
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::default_theme;
    use crate::utils::test_utils::FakeGenerator;
    use tempfile::tempdir;

    fn files_in(dir: &std::path::Path) -> ThemeFiles {
        ThemeFiles {
            committed: dir.join("theme.json"),
            preview: dir.join("theme.preview.json"),
        }
    }

    fn set(target: &str, value: &str) -> ThemeAction {
        ThemeAction::Set {
            target: target.into(),
            value: value.into(),
        }
    }

    #[test]
    fn preview_survives_reload_until_deployed() {
        let dir = tempdir().expect("tempdir");
        let files = files_in(dir.path());

        let mut store = files.load().expect("load");
        apply(&mut store, set("colors.primary", "#123456")).expect("set");
        files.save(&store).expect("save");
        assert!(files.preview.exists());
        assert!(!files.committed.exists());

        let mut store = files.load().expect("reload");
        assert!(store.is_dirty());
        assert_eq!(store.active().colors.primary, "#123456");
        assert_eq!(*store.committed(), default_theme());

        apply(&mut store, ThemeAction::Deploy).expect("deploy");
        files.save(&store).expect("save");
        assert!(!files.preview.exists());

        let store = files.load().expect("reload");
        assert!(!store.is_dirty());
        assert_eq!(store.committed().colors.primary, "#123456");
    }

    #[test]
    fn edits_stack_on_pending_preview() {
        let dir = tempdir().expect("tempdir");
        let files = files_in(dir.path());

        let mut store = files.load().expect("load");
        apply(&mut store, set("colors.accent", "#aa0000")).expect("set");
        files.save(&store).expect("save");

        let mut store = files.load().expect("reload");
        apply(&mut store, set("widgets.carousel.backgroundColor", "#00aa00")).expect("set");
        assert_eq!(store.active().colors.accent, "#aa0000");
        assert_eq!(
            store.active().widgets.carousel.as_ref().and_then(|w| w.background_color.as_deref()),
            Some("#00aa00")
        );
    }

    #[test]
    fn reset_removes_both_files() {
        let dir = tempdir().expect("tempdir");
        let files = files_in(dir.path());

        let mut store = files.load().expect("load");
        apply(&mut store, set("colors.primary", "#010101")).expect("set");
        apply(&mut store, ThemeAction::Deploy).expect("deploy");
        apply(&mut store, set("colors.primary", "#020202")).expect("set");
        files.save(&store).expect("save");
        assert!(files.committed.exists() && files.preview.exists());

        apply(&mut store, ThemeAction::Reset).expect("reset");
        files.save(&store).expect("save");
        assert!(!files.committed.exists());
        assert!(!files.preview.exists());
    }

    #[test]
    fn deploy_without_preview_is_a_no_op() {
        let dir = tempdir().expect("tempdir");
        let files = files_in(dir.path());

        let mut store = files.load().expect("load");
        apply(&mut store, ThemeAction::Deploy).expect("deploy succeeds");
        assert!(!store.is_dirty());
        assert!(!store.is_custom());
        assert_eq!(*store.active(), default_theme());

        files.save(&store).expect("save");
        assert!(!files.committed.exists());
        assert!(!files.preview.exists());
    }

    #[test]
    fn bad_target_and_bad_json_leave_store_untouched() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").expect("write");

        let mut store = ThemeStore::new();
        assert!(apply(&mut store, set("colors.sparkle", "#fff")).is_err());
        assert!(apply(&mut store, ThemeAction::Import { file: path }).is_err());
        assert!(!store.is_dirty());
    }

    #[test]
    fn imported_file_is_previewed() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("dark.json");
        fs::write(&path, r##"{"colors":{"surface":"#111111"}}"##).expect("write");

        let mut store = ThemeStore::new();
        apply(&mut store, ThemeAction::Import { file: path }).expect("import");
        assert!(store.is_dirty());
        assert_eq!(store.active().colors.surface, "#111111");
    }

    #[tokio::test]
    async fn failed_image_generation_reports_user_message() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("sunset.jpg");
        fs::write(&path, b"jpeg bytes").expect("write");

        let generator = FakeGenerator::new();
        let mut store = ThemeStore::new();
        let err = preview_image(&mut store, &generator, &path)
            .await
            .expect_err("default fake has no theme");
        assert_eq!(err.to_string(), "Failed to generate theme. Try another image.");
        assert!(!store.is_dirty());
        assert_eq!(generator.theme_calls()[0].mime_type, "image/jpeg");
    }

    #[test]
    fn describe_lists_every_widget() {
        let lines = describe(&ThemeStore::new(), ColorDepth::Plain);
        assert_eq!(lines[0], "✅ Default theme active");
        for kind in WidgetKind::ALL {
            assert!(lines.iter().any(|line| line.contains(kind.config_key())));
        }
    }
}

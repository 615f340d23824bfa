use std::error::Error;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Plain-text transcript of a chat session.
#[derive(Debug, Default)]
pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    /// Remembers `log_file` without opening it; call [`set_log_file`] to start
    /// writing.
    ///
    /// [`set_log_file`]: LoggingState::set_log_file
    pub fn new(log_file: Option<String>) -> Self {
        LoggingState {
            file_path: log_file,
            is_active: false,
        }
    }

    pub fn set_log_file(&mut self, path: String) -> Result<String, Box<dyn Error>> {
        // Fail now rather than on the first turn
        OpenOptions::new().create(true).append(true).open(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;

        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(&mut self, pause_message: &str) -> Result<String, Box<dyn Error>> {
        match &self.file_path {
            Some(path) => {
                let path = path.clone();
                if self.is_active {
                    self.log_message(&format!("## {pause_message}"))?;
                    self.is_active = false;
                    Ok(format!("Logging paused (file: {path})"))
                } else {
                    self.is_active = true;
                    Ok(format!("Logging resumed to: {path}"))
                }
            }
            None => Err("No log file specified. Use /log <filename> to enable logging first.".into()),
        }
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn Error>> {
        let Some(file_path) = self.file_path.as_ref().filter(|_| self.is_active) else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);
        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between turns
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_status_string(&self) -> String {
        let file_name = |path: &str| {
            Path::new(path)
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn inactive_logger_writes_nothing() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("chat.log");
        let logging = LoggingState::new(Some(path.to_string_lossy().to_string()));
        logging.log_message("hello").expect("noop");
        assert!(!path.exists());
        assert_eq!(logging.get_status_string(), "paused (chat.log)");
    }

    #[test]
    fn pause_and_resume() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("chat.log");
        let mut logging = LoggingState::default();
        assert_eq!(logging.get_status_string(), "disabled");
        assert!(logging.toggle_logging("paused").is_err());

        logging
            .set_log_file(path.to_string_lossy().to_string())
            .expect("enable");
        logging.log_message("one\ntwo").expect("write");
        logging.toggle_logging("Logging paused").expect("pause");
        logging.log_message("skipped").expect("noop");
        logging.toggle_logging("Logging paused").expect("resume");
        assert!(logging.is_active());
        logging.log_message("three").expect("write");

        let written = std::fs::read_to_string(&path).expect("read");
        assert_eq!(written, "one\ntwo\n\n## Logging paused\n\nthree\n\n");
    }
}

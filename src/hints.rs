//! Example-query hints panel, loaded once at startup from a text file.

use std::fs;
use std::path::{Path, PathBuf};

/// File of example queries, one per line, looked up next to the executable
/// unless the config overrides the path.
pub const HINTS_FILE_NAME: &str = "sql_hints.txt";

#[derive(Debug, Default)]
pub struct Hints {
    pub lines: Vec<String>,
    pub visible: bool,
}

impl Hints {
    /// Loads the hint file. A missing or unreadable file does not fail the
    /// application; the panel shows a placeholder instead.
    pub fn load(path: &Path) -> Self {
        let lines = match fs::read_to_string(path) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            Err(_) => vec![format!("Failed to load {}", path.display())],
        };
        Self {
            lines,
            visible: false,
        }
    }

    /// Default location: `sql_hints.txt` in the executable's directory.
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default()
            .join(HINTS_FILE_NAME)
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Label for the toggle control, reflecting what pressing it will do.
    pub fn toggle_label(&self) -> &'static str {
        if self.visible {
            "Hide Examples"
        } else {
            "Show Examples"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Hints;
    use std::io::Write;

    #[test]
    fn loads_lines_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SELECT * FROM events").unwrap();
        writeln!(file, "SELECT count(*) FROM runs").unwrap();
        let hints = Hints::load(file.path());
        assert_eq!(hints.lines.len(), 2);
        assert_eq!(hints.lines[0], "SELECT * FROM events");
        assert!(!hints.visible);
    }

    #[test]
    fn missing_file_shows_placeholder() {
        let hints = Hints::load(std::path::Path::new("/no/such/hints.txt"));
        assert_eq!(hints.lines.len(), 1);
        assert!(hints.lines[0].starts_with("Failed to load "));
    }

    #[test]
    fn toggle_relabels() {
        let mut hints = Hints::default();
        assert_eq!(hints.toggle_label(), "Show Examples");
        hints.toggle();
        assert!(hints.visible);
        assert_eq!(hints.toggle_label(), "Hide Examples");
        hints.toggle();
        assert!(!hints.visible);
    }
}

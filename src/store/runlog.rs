//! Per-group run log
//!
//! An append-only `<group>.txt` next to the group directory, mirroring the
//! run's major events in a human-readable form. The log is a convenience
//! artifact: a write failure is reported once via tracing and never aborts
//! archiving.

use crate::store::layout;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only run log for one group
pub struct RunLog {
    group: String,
    path: Option<PathBuf>,
}

impl RunLog {
    /// Creates a run log writing to `<root>/<group>.txt`
    pub fn new(root: &Path, group: &str) -> Self {
        Self {
            group: group.to_string(),
            path: Some(layout::run_log_path(root, group)),
        }
    }

    /// Creates a disabled run log that drops every line
    pub fn disabled(group: &str) -> Self {
        Self {
            group: group.to_string(),
            path: None,
        }
    }

    pub fn info(&self, message: &str) {
        self.append("INFO", message);
    }

    pub fn warn(&self, message: &str) {
        self.append("WARNING", message);
    }

    pub fn error(&self, message: &str) {
        self.append("ERROR", message);
    }

    fn append(&self, level: &str, message: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let line = format!(
            "[{} {} {}] {}\n",
            level,
            Utc::now().format("%Y-%m-%d %H:%M:%S"),
            self.group,
            message
        );
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = result {
            tracing::warn!("could not append to run log {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_are_appended_with_level_and_group() {
        let dir = TempDir::new().unwrap();
        let log = RunLog::new(dir.path(), "demo");

        log.info("archiving group 'demo' in mode 'update'");
        log.warn("message 2 not found");

        let content = std::fs::read_to_string(dir.path().join("demo.txt")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[INFO "));
        assert!(lines[0].ends_with("demo] archiving group 'demo' in mode 'update'"));
        assert!(lines[1].starts_with("[WARNING "));
    }

    #[test]
    fn test_disabled_log_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let log = RunLog::disabled("demo");

        log.info("nothing should land on disk");

        assert!(!dir.path().join("demo.txt").exists());
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let log = RunLog {
            group: "demo".to_string(),
            path: Some(PathBuf::from("/nonexistent-root/demo.txt")),
        };
        log.error("this line is dropped with a warning");
    }
}

//! Append-only store of free-text analysis constraints.
//!
//! Rules are never edited or removed, duplicates are kept, and the whole
//! store is re-read on every `load()`. A single writer is assumed: two
//! processes appending at once may interleave.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, warn};

use crate::error::StoreError;

/// Durable constraint storage, swappable behind `load`/`append`.
pub trait ConstraintStore: Send + Sync {
    /// Full accumulated constraint text, or `""` when nothing was ever saved.
    /// Read failures are reported as empty, never as errors.
    fn load(&self) -> String;

    /// Append one rule (trimmed, newline-prefixed).
    fn append(&self, rule: &str) -> Result<(), StoreError>;

    /// Saved rules, one per non-empty line, in insertion order.
    fn rules(&self) -> Vec<String> {
        self.load()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Constraints kept in a UTF-8 text file.
pub struct FileConstraintStore {
    path: PathBuf,
}

impl FileConstraintStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &tenderlens_core::Config) -> Self {
        Self::new(config.storage.constraints_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ConstraintStore for FileConstraintStore {
    fn load(&self) -> String {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No constraints saved yet");
                String::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Failed to read constraints, using none: {}", e);
                String::new()
            }
        }
    }

    fn append(&self, rule: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(format!("\n{}", rule.trim()).as_bytes())
            .map_err(|e| self.io_error(e))?;
        info!(path = %self.path.display(), "Constraint saved");
        Ok(())
    }
}

/// In-memory store with the same append semantics as the file store.
#[derive(Default)]
pub struct MemoryConstraintStore {
    text: RwLock<String>,
}

impl MemoryConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConstraintStore for MemoryConstraintStore {
    fn load(&self) -> String {
        self.text.read().map(|t| t.clone()).unwrap_or_default()
    }

    fn append(&self, rule: &str) -> Result<(), StoreError> {
        let mut text = self
            .text
            .write()
            .map_err(|_| StoreError::Other("constraint store lock poisoned".into()))?;
        text.push('\n');
        text.push_str(rule.trim());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileConstraintStore) {
        let dir = tempfile::tempdir().expect("create tempdir");
        let store = FileConstraintStore::new(dir.path().join("data").join("constraints.txt"));
        (dir, store)
    }

    #[test]
    fn fresh_store_loads_empty() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load(), "");
        assert!(store.rules().is_empty());
    }

    #[test]
    fn appends_in_order_with_newline_separator() {
        let (_dir, store) = temp_store();
        store.append("X").unwrap();
        store.append("Y").unwrap();

        let text = store.load();
        assert_eq!(text, "\nX\nY");
        let x = text.find('X').unwrap();
        let y = text.find('Y').unwrap();
        assert!(x < y);
        assert_eq!(&text[x + 1..y], "\n");
    }

    #[test]
    fn rules_are_trimmed_and_duplicates_kept() {
        let (_dir, store) = temp_store();
        store.append("  Ignore furniture items  \n").unwrap();
        store.append("Ignore furniture items").unwrap();
        assert_eq!(
            store.rules(),
            vec!["Ignore furniture items", "Ignore furniture items"]
        );
    }

    #[test]
    fn existing_content_is_preserved() {
        let (dir, store) = temp_store();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(store.path(), "Report prices in SAR").unwrap();

        store.append("Mention the CD").unwrap();
        assert_eq!(store.load(), "Report prices in SAR\nMention the CD");
    }

    #[test]
    fn unreadable_store_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be: reading fails, but not with NotFound.
        let store = FileConstraintStore::new(dir.path());
        assert_eq!(store.load(), "");
    }

    #[test]
    fn append_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConstraintStore::new(dir.path());
        assert!(matches!(store.append("rule"), Err(StoreError::Io { .. })));
    }

    #[test]
    fn memory_store_matches_file_semantics() {
        let store = MemoryConstraintStore::new();
        assert_eq!(store.load(), "");
        store.append(" X ").unwrap();
        store.append("Y").unwrap();
        assert_eq!(store.load(), "\nX\nY");
        assert_eq!(store.rules(), vec!["X", "Y"]);
    }
}

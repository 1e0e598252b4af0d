use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StorageResult;

/// String key/value store persisted as one JSON object on disk.
///
/// Plays the role browser `localStorage` plays for a web client: created once at
/// startup and handed to whatever needs persistence. Every `set_item`/`remove_item`
/// is written through immediately. Concurrent processes are not coordinated; the last
/// writer wins.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage_path: PathBuf,
}

impl LocalStorage {
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }

    /// `~/.nutrition-calc/local_storage.json`, or the working directory when there is no
    /// home directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".nutrition-calc")
            .join("local_storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) -> StorageResult<()> {
        let mut items = self.read_all();
        items.insert(key.to_string(), value.into());
        self.write_all(&items)
    }

    pub fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut items = self.read_all();
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }

    // A missing or unreadable file reads as an empty store.
    fn read_all(&self) -> BTreeMap<String, String> {
        let contents = match fs::read_to_string(&self.storage_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.storage_path.display(), error = %e, "failed to read local storage");
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %self.storage_path.display(), error = %e, "local storage is malformed, ignoring it");
            BTreeMap::new()
        })
    }

    /// Write through a temporary file and an atomic rename to avoid partial writes.
    fn write_all(&self, items: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp = self.storage_path.with_extension("tmp");
        let mut f = File::create(&temp)?;
        let content = serde_json::to_string_pretty(items)?;
        f.write_all(content.as_bytes())?;
        f.sync_all()?;
        fs::rename(temp, &self.storage_path)?;
        Ok(())
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("missing.json"));
        assert_eq!(storage.get_item("savedNutrition"), None);
    }

    #[test]
    fn items_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        LocalStorage::new(&path).set_item("a", "1").unwrap();
        LocalStorage::new(&path).set_item("b", "2").unwrap();

        let reopened = LocalStorage::new(&path);
        assert_eq!(reopened.get_item("a").as_deref(), Some("1"));
        assert_eq!(reopened.get_item("b").as_deref(), Some("2"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn remove_item_drops_only_that_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("store.json"));
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();

        storage.remove_item("a").unwrap();
        storage.remove_item("never-set").unwrap();

        assert_eq!(storage.get_item("a"), None);
        assert_eq!(storage.get_item("b").as_deref(), Some("2"));
    }

    #[test]
    fn malformed_file_reads_as_empty_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = LocalStorage::new(&path);
        assert_eq!(storage.get_item("a"), None);

        storage.set_item("a", "1").unwrap();
        assert_eq!(storage.get_item("a").as_deref(), Some("1"));
    }
}

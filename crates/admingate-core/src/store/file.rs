use std::path::{Path, PathBuf};

use tracing::warn;

use super::TokenStore;

/// File extension for persisted entries
const ENTRY_EXT: &str = "json";

/// Token store persisting each key as a small file under a directory,
/// typically `Config::cache_dir()`. I/O failures degrade to no-op
/// behavior: they are logged and the operation reports absence.
#[derive(Debug)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, ENTRY_EXT))
    }

    fn is_entry(path: &Path) -> bool {
        path.extension().map(|ext| ext == ENTRY_EXT).unwrap_or(false)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                warn!(key, error = %e, "Failed to read store entry");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!(key, error = %e, "Failed to create store directory");
            return;
        }
        if let Err(e) = std::fs::write(self.entry_path(key), value) {
            warn!(key, error = %e, "Failed to write store entry");
        }
    }

    fn remove(&mut self, key: &str) {
        let path = self.entry_path(key);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(key, error = %e, "Failed to remove store entry");
            }
        }
    }

    fn clear(&mut self) {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if Self::is_entry(&path) {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %e, "Failed to remove store entry");
                }
            }
        }
    }
}

//! File-backed local store.
//!
//! All keys live in a single JSON object at `~/.gestor/storage.json`
//! (or `$GESTOR_HOME/storage.json`).

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::traits::{LocalStore, StorageError};

/// The storage directory name under the home directory.
const STORAGE_DIR: &str = ".gestor";

/// The storage file name.
const STORAGE_FILE: &str = "storage.json";

/// Local store persisted as a JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Store at the default location under the home directory.
    pub fn new() -> Result<Self, StorageError> {
        let home = dirs::home_dir().ok_or_else(|| {
            StorageError::Unavailable("Failed to determine home directory".to_string())
        })?;
        Ok(Self::in_dir(home.join(STORAGE_DIR)))
    }

    /// Store inside an explicit directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_FILE),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let file = File::open(&self.path).map_err(|e| StorageError::ReadFailed(e.to_string()))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            if e.is_io() {
                StorageError::ReadFailed(e.to_string())
            } else {
                StorageError::Serialization(e.to_string())
            }
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            }
        }

        // Write to a temp file, then rename.
        let temp_path = self.path.with_extension("tmp");
        let file =
            File::create(&temp_path).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        drop(writer);
        fs::rename(&temp_path, &self.path).map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard();
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard();
        // A corrupt file is replaced rather than blocking every future write.
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StorageError::Serialization(_)) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StorageError::Serialization(_)) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        if !self.path.exists() {
            return Ok(());
        }
        entries.remove(key);
        if entries.is_empty() {
            fs::remove_file(&self.path).map_err(|e| StorageError::WriteFailed(e.to_string()))
        } else {
            self.write_all(&entries)
        }
    }
}

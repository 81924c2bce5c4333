//! File-backed key/value store, one file per slot.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use barface_core::error::StoreError;
use barface_core::storage::{KeyValueStore, StorageKey};
use log::{debug, warn};

/// Environment variable selecting the store directory.
pub const STORE_DIR_ENV: &str = "BARFACE_STORE_DIR";

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store rooted at `$BARFACE_STORE_DIR`, or `<temp>/barface` if unset.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(STORE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("barface"));
        Self::new(dir)
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: StorageKey, buf: &mut [u8]) -> Result<Option<usize>, StoreError> {
        let bytes = match fs::read(self.path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                warn!("Failed to read {:?}: {}", key, e);
                return Err(StoreError::Io);
            }
        };
        let dest = buf.get_mut(..bytes.len()).ok_or(StoreError::Capacity)?;
        dest.copy_from_slice(&bytes);
        Ok(Some(bytes.len()))
    }

    fn write(&mut self, key: StorageKey, value: &[u8]) -> Result<(), StoreError> {
        let result = fs::create_dir_all(&self.dir).and_then(|()| fs::write(self.path(key), value));
        match result {
            Ok(()) => {
                debug!("Wrote {} bytes to {:?}", value.len(), key);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to write {:?}: {}", key, e);
                Err(StoreError::Io)
            }
        }
    }

    fn delete(&mut self, key: StorageKey) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!("Failed to delete {:?}: {}", key, e);
                Err(StoreError::Io)
            }
        }
    }

    fn exists(&self, key: StorageKey) -> bool {
        self.path(key).exists()
    }
}

//! Persistent key/value storage
//!
//! The device exposes a tiny key/value store with a handful of fixed slots.
//! Settings are stored as a postcard blob guarded by a schema version slot;
//! the last temperature and step count are stored as little-endian `i32`s so
//! the display can be seeded immediately at startup.

use log::{info, warn};

use crate::error::StoreError;
use crate::settings::Settings;

/// Current settings layout version. Blobs written with any other version are
/// discarded on load.
pub const SETTINGS_SCHEMA_VERSION: i32 = 5;

/// Largest value any slot holds.
pub const MAX_VALUE_LEN: usize = 128;

/// Fixed storage slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Version,
    Settings,
    Temperature,
    Steps,
}

impl StorageKey {
    pub const COUNT: usize = 4;

    pub const ALL: [StorageKey; Self::COUNT] = [
        StorageKey::Version,
        StorageKey::Settings,
        StorageKey::Temperature,
        StorageKey::Steps,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// File name used by file-backed stores.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Version => "version.bin",
            Self::Settings => "settings.bin",
            Self::Temperature => "temperature.bin",
            Self::Steps => "steps.bin",
        }
    }
}

/// Minimal persistent store contract.
pub trait KeyValueStore {
    /// Copy the value stored under `key` into `buf`.
    ///
    /// Returns the value length, or `None` if nothing is stored. Fails with
    /// [`StoreError::Capacity`] if `buf` is too small.
    fn read(&self, key: StorageKey, buf: &mut [u8]) -> Result<Option<usize>, StoreError>;

    fn write(&mut self, key: StorageKey, value: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`. Deleting a missing key succeeds.
    fn delete(&mut self, key: StorageKey) -> Result<(), StoreError>;

    fn exists(&self, key: StorageKey) -> bool;
}

/// Read a scalar slot.
pub fn read_i32<S>(store: &S, key: StorageKey) -> Result<Option<i32>, StoreError>
where
    S: KeyValueStore + ?Sized,
{
    let mut buf = [0u8; 4];
    match store.read(key, &mut buf)? {
        Some(4) => Ok(Some(i32::from_le_bytes(buf))),
        Some(_) => Err(StoreError::Corrupted),
        None => Ok(None),
    }
}

pub fn write_i32<S>(store: &mut S, key: StorageKey, value: i32) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
{
    store.write(key, &value.to_le_bytes())
}

/// Read a scalar slot, logging and discarding failures.
pub fn load_i32<S>(store: &S, key: StorageKey) -> Option<i32>
where
    S: KeyValueStore + ?Sized,
{
    read_i32(store, key).unwrap_or_else(|e| {
        warn!("Failed to read {:?}: {}", key, e);
        None
    })
}

/// Load settings, falling back to defaults when nothing usable is stored.
///
/// A blob written under a different schema version is deleted.
pub fn load_settings<S>(store: &mut S) -> Settings
where
    S: KeyValueStore + ?Sized,
{
    if !store.exists(StorageKey::Settings) {
        info!("No saved settings, using defaults");
        return Settings::default();
    }

    if !store.exists(StorageKey::Version) {
        warn!("Saved settings have no schema version, using defaults");
        return Settings::default();
    }

    let version = load_i32(&*store, StorageKey::Version);
    if version != Some(SETTINGS_SCHEMA_VERSION) {
        info!(
            "Discarding settings saved with schema {:?} (current {})",
            version, SETTINGS_SCHEMA_VERSION
        );
        if let Err(e) = store.delete(StorageKey::Settings) {
            warn!("Failed to delete stale settings: {}", e);
        }
        return Settings::default();
    }

    let mut buf = [0u8; MAX_VALUE_LEN];
    let len = match store.read(StorageKey::Settings, &mut buf) {
        Ok(Some(len)) => len,
        Ok(None) => return Settings::default(),
        Err(e) => {
            warn!("Failed to read settings: {}", e);
            return Settings::default();
        }
    };

    match postcard::from_bytes::<Settings>(&buf[..len]) {
        Ok(settings) if settings.enabled_count() > 0 => {
            info!("Settings loaded from storage");
            settings
        }
        Ok(_) => {
            warn!("Saved settings enable no bars, using defaults");
            Settings::default()
        }
        Err(e) => {
            warn!("Saved settings are unreadable ({}), using defaults", e);
            Settings::default()
        }
    }
}

/// Persist settings together with the current schema version.
pub fn save_settings<S>(store: &mut S, settings: &Settings) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
{
    let mut buf = [0u8; MAX_VALUE_LEN];
    let encoded = postcard::to_slice(settings, &mut buf).map_err(|_| StoreError::Encoding)?;
    write_i32(store, StorageKey::Version, SETTINGS_SCHEMA_VERSION)?;
    store.write(StorageKey::Settings, encoded)?;
    info!("Settings saved to storage ({} bytes)", encoded.len());
    Ok(())
}

/// RAM-backed store, used by tests and by hosts without flash.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: [Option<heapless::Vec<u8, MAX_VALUE_LEN>>; StorageKey::COUNT],
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: StorageKey, buf: &mut [u8]) -> Result<Option<usize>, StoreError> {
        let Some(value) = &self.slots[key.index()] else {
            return Ok(None);
        };
        let dest = buf.get_mut(..value.len()).ok_or(StoreError::Capacity)?;
        dest.copy_from_slice(value);
        Ok(Some(value.len()))
    }

    fn write(&mut self, key: StorageKey, value: &[u8]) -> Result<(), StoreError> {
        let value = heapless::Vec::from_slice(value).map_err(|_| StoreError::Capacity)?;
        self.slots[key.index()] = Some(value);
        Ok(())
    }

    fn delete(&mut self, key: StorageKey) -> Result<(), StoreError> {
        self.slots[key.index()] = None;
        Ok(())
    }

    fn exists(&self, key: StorageKey) -> bool {
        self.slots[key.index()].is_some()
    }
}

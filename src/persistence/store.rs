//! Storage backends for the profile record

use std::cell::RefCell;

/// Failure at the storage boundary
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem read/write failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Record could not be encoded
    #[error("could not encode profile: {0}")]
    Encode(#[from] serde_json::Error),
    /// The backing store is not reachable (no window, storage disabled...)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Raw string storage for the single profile record
///
/// `load_raw` returns `Ok(None)` when nothing has been saved yet.
pub trait ProfileStore {
    fn load_raw(&self) -> Result<Option<String>, StoreError>;
    fn save_raw(&self, json: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(json: &str) -> Self {
        Self {
            record: RefCell::new(Some(json.to_string())),
        }
    }

    /// Current raw record, if any
    pub fn record(&self) -> Option<String> {
        self.record.borrow().clone()
    }
}

impl ProfileStore for MemoryStore {
    fn load_raw(&self) -> Result<Option<String>, StoreError> {
        Ok(self.record.borrow().clone())
    }

    fn save_raw(&self, json: &str) -> Result<(), StoreError> {
        *self.record.borrow_mut() = Some(json.to_string());
        Ok(())
    }
}

/// JSON file on disk; writes go to a temp file that is renamed over the record
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn tmp_path(&self) -> std::path::PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tmp.into()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ProfileStore for FileStore {
    fn load_raw(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_raw(&self, json: &str) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Browser LocalStorage under a fixed key
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "licht_kaefer_profile";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("localStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ProfileStore for LocalStorageStore {
    fn load_raw(&self) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(Self::STORAGE_KEY)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn save_raw(&self, json: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(Self::STORAGE_KEY, json)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

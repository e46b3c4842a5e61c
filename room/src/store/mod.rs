use std::collections::HashMap;
use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage corrupted: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A tiny string key-value store, the room's stand-in for browser storage.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> StoreResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore(HashMap<String, String>);

impl Store for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.0.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        self.0.insert(key.to_string(), value);
        Ok(())
    }
}

/// All keys live in one JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> StoreResult<HashMap<String, String>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == IoErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

/// A corrupted file is replaced rather than kept forever; any other read
/// failure leaves the file alone.
fn writable(existing: StoreResult<HashMap<String, String>>) -> StoreResult<HashMap<String, String>> {
    match existing {
        Err(StoreError::Json(_)) => Ok(HashMap::new()),
        other => other,
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        let mut all = writable(self.read_all())?;
        all.insert(key.to_string(), value);
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec(&all)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

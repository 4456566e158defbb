//! Key-value persistence for solve states and settings.
//!
//! The [`KeyValueStore`] trait is the only thing the solve service knows
//! about storage. Values are opaque bytes; the service encodes them as
//! JSON.
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`MemoryStore`] | Tests and single-process runs |
//! | [`FileStore`] | Persisting across runs, one file per key |
//!
//! [`StoreBackend`] picks one of them from configuration.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::{StoreConfig, StoreKind};
use std::future::Future;

/// Byte-valued store keyed by strings.
///
/// Implementations must be thread-safe (`Send + Sync`) for use across
/// async tasks, and perform no retries of their own.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: Vec<u8>)
        -> impl Future<Output = Result<(), StoreError>> + Send;
}

pub(crate) fn check_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Store chosen at startup.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Memory(MemoryStore),
    File(FileStore),
}

impl StoreBackend {
    /// Opens the backend described by `config`.
    ///
    /// A file backend without a directory uses `./.pwc/store`.
    ///
    /// # Errors
    ///
    /// [`StoreError::DirectoryCreation`] if the file store directory
    /// cannot be created.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.backend {
            StoreKind::Memory => Ok(Self::Memory(MemoryStore::new())),
            StoreKind::File => {
                let dir = config
                    .dir
                    .clone()
                    .unwrap_or_else(|| std::path::PathBuf::from(".pwc/store"));
                Ok(Self::File(FileStore::new(dir)?))
            }
        }
    }
}

impl KeyValueStore for StoreBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self {
            Self::Memory(store) => store.get(key).await,
            Self::File(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.set(key, value).await,
            Self::File(store) => store.set(key, value).await,
        }
    }
}

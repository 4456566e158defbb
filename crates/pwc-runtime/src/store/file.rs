//! One-file-per-key store.
//!
//! ```text
//! <dir>/
//! ├── state%3Acrossword%3Astreamer.json
//! ├── settings%3Acrossword%3Astreamer.json
//! └── ...
//! ```
//!
//! Key bytes outside `[A-Za-z0-9_-]` are written as `%XX`. Writes go to a
//! hidden temp file that is then renamed over the target.

use super::{check_key, KeyValueStore, StoreError};
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// [`StoreError::DirectoryCreation`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| StoreError::directory_creation(&dir, e))?;
        }
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape(key)))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", escape(key)))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        check_key(key)?;
        match fs::read(self.path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        check_key(key)?;
        let temp = self.temp_path(key);
        fs::write(&temp, &value).await?;
        fs::rename(&temp, self.path(key)).await?;
        Ok(())
    }
}

fn escape(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn escapes_reserved_bytes() {
        assert_eq!(escape("state:crossword:a_b-c"), "state%3Acrossword%3Aa_b-c");
        assert_eq!(escape("../x"), "%2E%2E%2Fx");
    }

    #[tokio::test]
    async fn round_trip_and_missing() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("nested/store")).unwrap();
        assert!(store.dir().is_dir());

        assert!(store.get("state:crossword:a").await.unwrap().is_none());
        store.set("state:crossword:a", b"{\"status\":\"selected\"}".to_vec()).await.unwrap();
        assert_eq!(
            store.get("state:crossword:a").await.unwrap().unwrap(),
            b"{\"status\":\"selected\"}"
        );
        assert!(tmp.path().join("nested/store/state%3Acrossword%3Aa.json").exists());
        assert!(!tmp.path().join("nested/store/.state%3Acrossword%3Aa.json.tmp").exists());
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path()).unwrap();
        store.set("k", b"one".to_vec()).await.unwrap();
        store.set("k", b"two".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().unwrap(), b"two");
    }

    #[tokio::test]
    async fn reopened_store_sees_data() {
        let tmp = TempDir::new().unwrap();
        FileStore::new(tmp.path()).unwrap().set("k", b"v".to_vec()).await.unwrap();
        let reopened = FileStore::new(tmp.path()).unwrap();
        assert_eq!(reopened.get("k").await.unwrap().unwrap(), b"v");
    }
}

use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::prelude::*;

/// Key-value blob storage shared between application runs.
#[async_trait]
pub trait BlobStore: Sync {
    /// Read the blob, `None` means that there is no such key.
    ///
    /// Any other failure is a storage fault.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn put(&self, key: &str, body: &[u8]) -> Result;

    /// Best-effort removal, failures are only logged.
    async fn delete(&self, key: &str);
}

/// Stores every key as a file in the root directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub async fn try_new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("failed to create `{}`", root.display()))?;
        Ok(Self { root })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl BlobStore for FileStore {
    #[instrument(skip_all, fields(key = key))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(key)).await {
            Ok(body) => {
                debug!(len = body.len(), "read");
                Ok(Some(body))
            }
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!("not found");
                Ok(None)
            }
            Err(error) => Err(Error::from(error).context(format!("failed to read `{key}`"))),
        }
    }

    /// Write into a temporary file next to the target, and then move it into place.
    #[instrument(skip_all, fields(key = key, len = body.len()))]
    async fn put(&self, key: &str, body: &[u8]) -> Result {
        debug!("writing…");
        let root = self.root.clone();
        let path = self.path(key);
        let body = body.to_vec();
        tokio::task::spawn_blocking(move || -> Result {
            let mut file = NamedTempFile::new_in(&root)?;
            file.write_all(&body)?;
            file.as_file().sync_all()?;
            file.persist(&path)?;
            Ok(())
        })
        .await
        .context("the writer has crashed")?
        .with_context(|| format!("failed to write `{key}`"))
    }

    #[instrument(skip_all, fields(key = key))]
    async fn delete(&self, key: &str) {
        if let Err(error) = tokio::fs::remove_file(self.path(key)).await
            && error.kind() != ErrorKind::NotFound
        {
            warn!("failed to delete: {error:#}");
        }
    }
}

#[cfg(test)]
pub mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use super::*;

    /// In-memory store.
    #[derive(Default)]
    pub struct MemoryStore {
        pub blobs: Mutex<HashMap<String, Vec<u8>>>,
        pub is_faulty: bool,
        pub is_read_only: bool,
    }

    impl MemoryStore {
        pub fn with(key: &str, body: &[u8]) -> Self {
            let this = Self::default();
            this.blobs.lock().unwrap().insert(key.to_owned(), body.to_vec());
            this
        }

        pub fn faulty() -> Self {
            Self { is_faulty: true, ..Self::default() }
        }

        /// Reads work, writes fail.
        pub fn read_only() -> Self {
            Self { is_read_only: true, ..Self::default() }
        }

        pub fn contains(&self, key: &str) -> bool {
            self.blobs.lock().unwrap().contains_key(key)
        }
    }

    #[async_trait]
    impl BlobStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            ensure!(!self.is_faulty, "access denied");
            Ok(self.blobs.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, key: &str, body: &[u8]) -> Result {
            ensure!(!self.is_faulty && !self.is_read_only, "access denied");
            self.blobs.lock().unwrap().insert(key.to_owned(), body.to_vec());
            Ok(())
        }

        async fn delete(&self, key: &str) {
            self.blobs.lock().unwrap().remove(key);
        }
    }

    #[tokio::test]
    async fn test_file_store_round_trip() -> Result {
        let directory = tempfile::tempdir()?;
        let store = FileStore::try_new(directory.path()).await?;
        assert_eq!(store.get("missing.json").await?, None);
        store.put("prices.json", b"{}").await?;
        assert_eq!(store.get("prices.json").await?.as_deref(), Some(b"{}".as_slice()));
        store.delete("prices.json").await;
        assert_eq!(store.get("prices.json").await?, None);
        store.delete("prices.json").await;
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_put_replaces_atomically() -> Result {
        let directory = tempfile::tempdir()?;
        let store = FileStore::try_new(directory.path()).await?;
        store.put("prices.json", b"old").await?;
        store.put("prices.json", b"new").await?;
        assert_eq!(store.get("prices.json").await?.as_deref(), Some(b"new".as_slice()));
        assert_eq!(std::fs::read_dir(directory.path())?.count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_fault_is_not_missing() -> Result {
        let directory = tempfile::tempdir()?;
        let store = FileStore::try_new(directory.path()).await?;
        std::fs::create_dir(directory.path().join("directory.json"))?;
        assert!(store.get("directory.json").await.is_err());
        Ok(())
    }
}

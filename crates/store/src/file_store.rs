use crate::client::{ListPage, ListRequest, ParameterStore, PutRequest, PutResult};
use crate::error::{BackendError, Result};
use crate::memory::MemoryStore;
use crate::param::RawParameter;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    parameters: Vec<RawParameter>,
}

/// Parameter store persisted as a JSON snapshot on disk.
///
/// Reads are served from memory; every successful put rewrites the file.
/// A put whose snapshot cannot be written is undone in memory as well.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
    // Held for a whole put, from the in-memory write to the snapshot rename.
    write_lock: tokio::sync::Mutex<()>,
}

impl FileStore {
    /// Load the snapshot at `path`; a missing file opens an empty store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let parameters = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Snapshot>(&bytes)?.parameters,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No parameter snapshot at {}, starting empty", path.display());
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };
        log::debug!("Loaded {} parameters from {}", parameters.len(), path.display());
        Ok(Self {
            path,
            inner: MemoryStore::with_parameters(parameters),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.inner = self.inner.with_page_size(page_size);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Callers hold `write_lock`.
    async fn persist(&self) -> Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            parameters: self.inner.snapshot().await,
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }
}

#[async_trait]
impl ParameterStore for FileStore {
    async fn list_by_path(
        &self,
        request: &ListRequest,
    ) -> std::result::Result<ListPage, BackendError> {
        self.inner.list_by_path(request).await
    }

    async fn get_parameter(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> std::result::Result<Option<RawParameter>, BackendError> {
        self.inner.get_parameter(name, with_decryption).await
    }

    async fn put_parameter(
        &self,
        request: &PutRequest,
    ) -> std::result::Result<PutResult, BackendError> {
        let _guard = self.write_lock.lock().await;
        let previous = self.inner.get_parameter(&request.name, true).await?;
        let result = self.inner.put_parameter(request).await?;
        if let Err(err) = self.persist().await {
            log::warn!("Snapshot write failed, rolling back {}", request.name);
            self.inner.restore(&request.name, previous).await;
            return Err(err.into());
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileStore::open(dir.path().join("store.json")).await.expect("open");
        let page = store
            .list_by_path(&ListRequest {
                path: "/".to_string(),
                recursive: true,
                with_decryption: false,
                next_token: None,
                max_results: None,
            })
            .await
            .expect("list");
        assert!(page.parameters.is_empty());
    }

    #[tokio::test]
    async fn puts_survive_reopen() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("store.json");
        let store = FileStore::open(&path).await.expect("open");
        store
            .put_parameter(&PutRequest {
                name: "/org/prod/api/DB_HOST".to_string(),
                value: "db1".to_string(),
                param_type: ParamType::Plain,
                overwrite: false,
            })
            .await
            .expect("put");

        let reopened = FileStore::open(&path).await.expect("reopen");
        let stored = reopened
            .get_parameter("/org/prod/api/DB_HOST", true)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(stored.value, "db1");
        assert!(!path.with_extension("json.tmp").exists());
    }

    fn put(name: &str, value: &str, overwrite: bool) -> PutRequest {
        PutRequest {
            name: name.to_string(),
            value: value.to_string(),
            param_type: ParamType::Plain,
            overwrite,
        }
    }

    #[tokio::test]
    async fn failed_snapshot_write_rolls_back_put() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("store.json");
        let store = FileStore::open(&path).await.expect("open");
        store.put_parameter(&put("/org/prod/api/A", "v1", false)).await.expect("put");

        // A non-empty directory in place of the snapshot makes the rename fail.
        std::fs::remove_file(&path).expect("remove snapshot");
        std::fs::create_dir(&path).expect("mkdir");
        std::fs::write(path.join("blocker"), b"x").expect("blocker");

        assert!(store.put_parameter(&put("/org/prod/api/A", "v2", true)).await.is_err());
        let kept = store.get_parameter("/org/prod/api/A", true).await.expect("get");
        assert_eq!(kept.map(|p| p.value).as_deref(), Some("v1"));

        assert!(store.put_parameter(&put("/org/prod/api/K", "v", false)).await.is_err());
        assert!(store.get_parameter("/org/prod/api/K", true).await.expect("get").is_none());

        std::fs::remove_dir_all(&path).expect("cleanup");
        let retried = store
            .put_parameter(&put("/org/prod/api/K", "v", false))
            .await
            .expect("retry without overwrite");
        assert_eq!(retried.version, 1);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, b"not json").await.expect("write");
        assert!(FileStore::open(&path).await.is_err());
    }
}

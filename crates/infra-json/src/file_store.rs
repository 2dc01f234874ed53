// File-backed result store
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use rebound_core::port::result_store::{ResultStore, StoreError};

/// Result document stored as a single file, rewritten in full on each save
///
/// No locking and no atomic rename: concurrent writers lose updates and a
/// crash mid-write can truncate the file (which the recorder then treats as
/// corrupt and reinitializes).
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ResultStore for JsonFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_raw(&self) -> Result<Option<String>, StoreError> {
        match tokio::fs::read(&self.path).await {
            // Invalid UTF-8 is handed on as text so the recorder can reinitialize
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Result store does not exist yet");
                Ok(None)
            }
            Err(source) => Err(StoreError::Read {
                location: self.location(),
                source,
            }),
        }
    }

    async fn write_raw(&self, contents: &str) -> Result<(), StoreError> {
        let write_err = |source: std::io::Error| StoreError::Write {
            location: self.location(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(write_err)?;

        debug!(path = %self.path.display(), bytes = contents.len(), "Result store written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("rebound_store_{}", uuid::Uuid::new_v4()))
            .join("iteration_results.json")
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let store = JsonFileStore::new(temp_path());
        assert!(store.read_raw().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_reads_back() {
        let path = temp_path();
        let store = JsonFileStore::new(&path);

        tokio_test::assert_ok!(store.write_raw(r#"{"iterations": []}"#).await);
        let contents = store.read_raw().await.unwrap().unwrap();
        assert_eq!(contents, r#"{"iterations": []}"#);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_write_replaces_whole_document() {
        let path = temp_path();
        let store = JsonFileStore::new(&path);

        store.write_raw("a much longer first document").await.unwrap();
        store.write_raw("short").await.unwrap();
        assert_eq!(store.read_raw().await.unwrap().as_deref(), Some("short"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_directory_in_place_of_file_is_a_read_error() {
        let dir = std::env::temp_dir().join(format!("rebound_dir_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let store = JsonFileStore::new(&dir);

        let result = store.read_raw().await;
        assert!(matches!(result, Err(StoreError::Read { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

// Result Store Port
// Raw, whole-document access; parsing and recovery rules live in ResultRecorder

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store read failed ({location}): {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Store write failed ({location}): {source}")]
    Write {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

/// Named persistent resource holding the cumulative result document
///
/// Read-modify-write on every append; not safe for concurrent writers.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Human-readable location (path, URL) for logs and errors
    fn location(&self) -> String;

    /// Read the whole document, `None` if it does not exist yet
    async fn read_raw(&self) -> Result<Option<String>, StoreError>;

    /// Replace the whole document
    async fn write_raw(&self, contents: &str) -> Result<(), StoreError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory store
    #[derive(Clone, Default)]
    pub struct MemoryResultStore {
        contents: Arc<Mutex<Option<String>>>,
        fail_writes: Arc<Mutex<bool>>,
    }

    impl MemoryResultStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_contents(contents: impl Into<String>) -> Self {
            let store = Self::default();
            *store.contents.lock().unwrap() = Some(contents.into());
            store
        }

        pub fn contents(&self) -> Option<String> {
            self.contents.lock().unwrap().clone()
        }

        pub fn set_fail_writes(&self, fail: bool) {
            *self.fail_writes.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl ResultStore for MemoryResultStore {
        fn location(&self) -> String {
            "memory".to_string()
        }

        async fn read_raw(&self) -> Result<Option<String>, StoreError> {
            Ok(self.contents.lock().unwrap().clone())
        }

        async fn write_raw(&self, contents: &str) -> Result<(), StoreError> {
            if *self.fail_writes.lock().unwrap() {
                return Err(StoreError::Write {
                    location: self.location(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            *self.contents.lock().unwrap() = Some(contents.to_string());
            Ok(())
        }
    }
}

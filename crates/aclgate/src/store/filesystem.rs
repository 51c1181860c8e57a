//! Filesystem-backed control document reads

use super::{ControlDocumentStore, ReadError};
use async_trait::async_trait;
use tokio::fs;

/// Reads control documents directly from the local filesystem.
///
/// Paths handed to this store are absolute physical paths produced by a
/// [`ResourceMapper`](crate::ResourceMapper).
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemStore;

impl FilesystemStore {
    /// Create a filesystem store
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ControlDocumentStore for FilesystemStore {
    async fn read_text(&self, path: &str) -> Result<String, ReadError> {
        let bytes = fs::read(path).await?;
        String::from_utf8(bytes)
            .map_err(|e| ReadError::unreadable(format!("Document is not valid UTF-8: {e}")))
    }
}

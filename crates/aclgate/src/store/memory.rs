//! In-memory control document store
//!
//! Holds documents in a map and can be told to fail reads at chosen paths,
//! which is how tests exercise the unreadable-document branch.

use super::{ControlDocumentStore, ReadError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
enum Entry {
    Document(String),
    Failing(String),
}

/// In-memory store with read accounting and failure injection
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    reads: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document at `path`
    pub async fn insert(&self, path: impl Into<String>, text: impl Into<String>) {
        self.entries
            .write()
            .await
            .insert(path.into(), Entry::Document(text.into()));
    }

    /// Make every read of `path` fail with an unreadable error
    pub async fn fail_reads(&self, path: impl Into<String>, reason: impl Into<String>) {
        self.entries
            .write()
            .await
            .insert(path.into(), Entry::Failing(reason.into()));
    }

    /// Remove whatever is stored at `path`
    pub async fn remove(&self, path: &str) -> bool {
        self.entries.write().await.remove(path).is_some()
    }

    /// Number of reads served so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ControlDocumentStore for MemoryStore {
    async fn read_text(&self, path: &str) -> Result<String, ReadError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.entries.read().await.get(path) {
            Some(Entry::Document(text)) => Ok(text.clone()),
            Some(Entry::Failing(reason)) => Err(ReadError::unreadable(reason.clone())),
            None => Err(ReadError::NotFound),
        }
    }
}

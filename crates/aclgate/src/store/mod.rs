//! Storage read primitive for control documents
//!
//! The checker only ever reads. A store must report a missing document as
//! [`ReadError::NotFound`] and every other failure as
//! [`ReadError::Unreadable`]; the walk moves upward on the first and stops on
//! the second.

use async_trait::async_trait;

mod filesystem;
mod memory;

pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;

/// Failure reading a candidate control document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// No document exists at the path
    #[error("Not found")]
    NotFound,

    /// A document may exist but could not be read
    #[error("Unreadable: {reason}")]
    Unreadable {
        /// Underlying failure
        reason: String,
    },
}

impl ReadError {
    /// Create an unreadable error
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::Unreadable {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for ReadError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::unreadable(err.to_string()),
        }
    }
}

/// Byte-level read access to control documents
#[async_trait]
pub trait ControlDocumentStore: Send + Sync {
    /// Read the document at `path` as UTF-8 text
    async fn read_text(&self, path: &str) -> Result<String, ReadError>;
}

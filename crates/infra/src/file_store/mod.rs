//! Image file storage boundary.
//!
//! Uploaded images are written once and referenced by path from the product
//! document. Deletion is idempotent and non-fatal on missing files: the
//! gateway treats stale-file cleanup as a best-effort side effect and only
//! logs failures.

pub mod in_memory;
pub mod local;

use std::sync::Arc;

use thiserror::Error;

pub use in_memory::InMemoryFileStore;
pub use local::LocalFileStore;

/// An uploaded file as received at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub content: Vec<u8>,
}

/// File storage operation error.
#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("file storage error: {0}")]
    Backend(String),
}

/// Store/delete uploaded images by reference path.
pub trait FileStore: Send + Sync {
    /// Persist an upload and return its reference path.
    fn store(&self, upload: &FileUpload) -> Result<String, FileStoreError>;

    /// Delete a stored file. Missing files are not an error.
    fn delete(&self, path: &str) -> Result<(), FileStoreError>;
}

impl<F> FileStore for Arc<F>
where
    F: FileStore + ?Sized,
{
    fn store(&self, upload: &FileUpload) -> Result<String, FileStoreError> {
        (**self).store(upload)
    }

    fn delete(&self, path: &str) -> Result<(), FileStoreError> {
        (**self).delete(path)
    }
}

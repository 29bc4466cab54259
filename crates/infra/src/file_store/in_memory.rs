use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use super::{FileStore, FileStoreError, FileUpload};

/// In-memory image storage for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files
            .read()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileStore for InMemoryFileStore {
    fn store(&self, upload: &FileUpload) -> Result<String, FileStoreError> {
        let path = format!("/uploads/products/{}_{}", Uuid::now_v7(), upload.filename);
        let mut files = self
            .files
            .write()
            .map_err(|_| FileStoreError::Backend("lock poisoned".to_string()))?;
        files.insert(path.clone(), upload.content.clone());
        Ok(path)
    }

    fn delete(&self, path: &str) -> Result<(), FileStoreError> {
        let mut files = self
            .files
            .write()
            .map_err(|_| FileStoreError::Backend("lock poisoned".to_string()))?;
        files.remove(path);
        Ok(())
    }
}

/// A file store that refuses every delete; used to exercise best-effort
/// cleanup paths in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FailingDeleteFileStore {
    inner: InMemoryFileStore,
}

#[cfg(test)]
impl FailingDeleteFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.contains(path)
    }
}

#[cfg(test)]
impl FileStore for FailingDeleteFileStore {
    fn store(&self, upload: &FileUpload) -> Result<String, FileStoreError> {
        self.inner.store(upload)
    }

    fn delete(&self, _path: &str) -> Result<(), FileStoreError> {
        Err(FileStoreError::Backend("disk on fire".to_string()))
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{FileStore, FileStoreError, FileUpload};

const UPLOAD_PREFIX: &str = "/uploads/products";

/// Filesystem-backed image storage under a public root directory.
///
/// Files land in `<root>/uploads/products/<uuid>_<filename>` and are
/// referenced by their path relative to the root (`/uploads/products/...`),
/// which is what gets embedded into product documents and served statically.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn absolute(&self, reference: &str) -> PathBuf {
        self.root.join(reference.trim_start_matches('/'))
    }
}

/// Strip anything that could escape the upload directory from a client
/// filename.
fn sanitize_filename(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    base.chars()
        .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl FileStore for LocalFileStore {
    fn store(&self, upload: &FileUpload) -> Result<String, FileStoreError> {
        let filename = format!("{}_{}", Uuid::now_v7(), sanitize_filename(&upload.filename));
        let reference = format!("{UPLOAD_PREFIX}/{filename}");
        let target = self.absolute(&reference);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| FileStoreError::Backend(format!("create {}: {e}", parent.display())))?;
        }
        fs::write(&target, &upload.content)
            .map_err(|e| FileStoreError::Backend(format!("write {}: {e}", target.display())))?;
        Ok(reference)
    }

    fn delete(&self, path: &str) -> Result<(), FileStoreError> {
        let target = self.absolute(path);
        match fs::remove_file(&target) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FileStoreError::Backend(format!(
                "delete {}: {e}",
                target.display()
            ))),
        }
    }
}

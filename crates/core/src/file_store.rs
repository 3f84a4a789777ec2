//! The upload root on local disk, partitioned by resource kind.
//!
//! ```text
//! <root>/sliders/slider-<millis>-<rand>.<ext>
//! <root>/gallery/{photo,video}-<millis>-<rand>.<ext>
//! <root>/blogs/blog-<millis>-<rand>.<ext>
//! ```
//!
//! Each file is also reachable under `<public_prefix>/<kind dir>/<name>`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::CoreError;
use crate::upload::{generate_file_name, AcceptedUpload, ResourceKind};

/// A file written under the upload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub kind: ResourceKind,
    /// Generated name, unique within the kind directory.
    pub file_name: String,
    pub original_name: String,
    /// Location on disk (upload root joined with kind dir and name).
    pub path: PathBuf,
    /// Public URL path the static file service answers on.
    pub url: String,
    pub size_bytes: i64,
    pub mime_type: String,
}

impl StoredFile {
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    public_prefix: String,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir_for(&self, kind: ResourceKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    pub fn public_url(&self, kind: ResourceKind, file_name: &str) -> String {
        format!("{}/{}/{}", self.public_prefix, kind.dir_name(), file_name)
    }

    /// Create the root and every kind directory. Safe to call repeatedly.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for kind in ResourceKind::ALL {
            tokio::fs::create_dir_all(self.dir_for(kind)).await?;
        }
        Ok(())
    }

    /// Write an accepted upload under a freshly generated name.
    ///
    /// The file is created with `create_new`, so an existing file is never
    /// overwritten. A partially written file is removed before returning the
    /// error.
    pub async fn save(&self, upload: &AcceptedUpload, bytes: &[u8]) -> Result<StoredFile, CoreError> {
        let dir = self.dir_for(upload.kind);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Internal(format!("Cannot create {}: {e}", dir.display())))?;

        let file_name = generate_file_name(upload);
        let path = dir.join(&file_name);

        if let Err(e) = write_new(&path, bytes).await {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(CoreError::Internal(format!(
                "Cannot write {}: {e}",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored upload");

        Ok(StoredFile {
            kind: upload.kind,
            url: self.public_url(upload.kind, &file_name),
            file_name,
            original_name: upload.original_name.clone(),
            path,
            size_bytes: bytes.len() as i64,
            mime_type: upload.mime_type.clone(),
        })
    }

    /// Remove a file under the root.
    ///
    /// Returns `Ok(false)` when the file was already gone. Paths outside the
    /// upload root are refused.
    pub async fn remove(&self, path: &Path) -> std::io::Result<bool> {
        if !path.starts_with(&self.root) {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("{} is outside the upload root", path.display()),
            ));
        }
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed upload");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

async fn write_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::tests::jpeg_bytes;
    use crate::upload::validate_upload;

    fn store(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(dir.path().join("uploads"), "/uploads/")
    }

    #[tokio::test]
    async fn ensure_dirs_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(&tmp);
        store.ensure_dirs().await.unwrap();
        store.ensure_dirs().await.unwrap();

        for kind in ResourceKind::ALL {
            assert!(store.dir_for(kind).is_dir());
        }
    }

    #[tokio::test]
    async fn save_writes_into_kind_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(&tmp);
        let bytes = jpeg_bytes(128);
        let upload = validate_upload(ResourceKind::Blog, "cover.jpg", None, &bytes).unwrap();

        let stored = store.save(&upload, &bytes).await.unwrap();

        assert!(stored.path.starts_with(store.dir_for(ResourceKind::Blog)));
        assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), bytes);
        assert_eq!(stored.url, format!("/uploads/blogs/{}", stored.file_name));
        assert_eq!(stored.size_bytes, 128);
        assert_eq!(stored.original_name, "cover.jpg");
    }

    #[tokio::test]
    async fn remove_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(&tmp);
        let bytes = jpeg_bytes(32);
        let upload = validate_upload(ResourceKind::Slider, "a.jpg", None, &bytes).unwrap();
        let stored = store.save(&upload, &bytes).await.unwrap();

        assert!(store.remove(&stored.path).await.unwrap());
        assert!(!store.remove(&stored.path).await.unwrap());
        assert!(!stored.path.exists());
    }

    #[tokio::test]
    async fn remove_refuses_paths_outside_root() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(&tmp);
        let outside = tmp.path().join("elsewhere.txt");
        tokio::fs::write(&outside, b"keep").await.unwrap();

        let err = store.remove(&outside).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(outside.exists());
    }
}

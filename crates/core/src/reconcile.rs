//! Keeps an uploaded file and the record that owns it consistent.
//!
//! A filesystem write and a database write cannot commit together, so every
//! mutation follows a fixed order and compensates on failure:
//!
//! | Operation | Order | On record failure |
//! |-----------|-------|-------------------|
//! | create    | file written, then record inserted | remove the new file |
//! | replace   | new file written, record updated, then old file removed | remove the new file, keep the old one |
//! | delete    | record removed, then its files | nothing touched when no record |
//!
//! Compensating removals are best effort. When one fails the file is left
//! as an orphan and a warning names its path; the originating error is what
//! the caller sees. Nothing is retried.

use std::fmt::Display;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::file_store::{FileStore, StoredFile};

#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    files: &'a FileStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(files: &'a FileStore) -> Self {
        Self { files }
    }

    /// Insert the record for a file that is already on disk.
    ///
    /// `insert` is only polled here, after the file exists. If it fails the
    /// file is removed and the insert error is returned unchanged.
    pub async fn create<T, E, Fut>(&self, stored: &StoredFile, insert: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        match insert.await {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(error = %e, file = %stored.file_name, "Record insert failed, discarding upload");
                self.discard(&stored.path).await;
                Err(e)
            }
        }
    }

    /// Point an existing record at `replacement`, then drop `previous`.
    ///
    /// `update` resolves to `None` when the record no longer exists. In that
    /// case, and on error, the replacement is removed and `previous` stays
    /// referenced by whatever the record still holds.
    pub async fn replace<T, E, Fut>(
        &self,
        previous: &Path,
        replacement: &StoredFile,
        update: Fut,
    ) -> Result<Option<T>, E>
    where
        Fut: Future<Output = Result<Option<T>, E>>,
        E: Display,
    {
        match update.await {
            Ok(Some(record)) => {
                self.discard(previous).await;
                Ok(Some(record))
            }
            Ok(None) => {
                self.discard(&replacement.path).await;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, file = %replacement.file_name, "Record update failed, discarding replacement");
                self.discard(&replacement.path).await;
                Err(e)
            }
        }
    }

    /// Delete a record, then every file it owned.
    ///
    /// Returns `Ok(None)` without touching the disk when `remove` finds no
    /// record. Files that are already missing are not an error.
    pub async fn delete<T, E, Fut, F>(&self, remove: Fut, owned_files: F) -> Result<Option<T>, E>
    where
        Fut: Future<Output = Result<Option<T>, E>>,
        F: FnOnce(&T) -> Vec<PathBuf>,
    {
        let Some(record) = remove.await? else {
            return Ok(None);
        };
        for path in owned_files(&record) {
            self.discard(&path).await;
        }
        Ok(Some(record))
    }

    /// Remove a file no record points at any more.
    pub async fn discard(&self, path: &Path) {
        match self.files.remove(path).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!(path = %path.display(), "File already absent"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Could not remove file, leaving orphan"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;
    use crate::types::DbId;
    use crate::upload::tests::jpeg_bytes;
    use crate::upload::{validate_upload, ResourceKind};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: DbId,
        path: PathBuf,
    }

    /// In-memory stand-in for a record table with an injectable outage.
    #[derive(Default)]
    struct Table {
        rows: Mutex<HashMap<DbId, Row>>,
        next_id: AtomicI64,
        unavailable: AtomicBool,
    }

    impl Table {
        fn fail_writes(&self, fail: bool) {
            self.unavailable.store(fail, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), CoreError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(CoreError::Internal("store unavailable".into()));
            }
            Ok(())
        }

        async fn insert(&self, path: &Path) -> Result<Row, CoreError> {
            self.check()?;
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let row = Row {
                id,
                path: path.to_path_buf(),
            };
            self.rows.lock().unwrap().insert(id, row.clone());
            Ok(row)
        }

        async fn set_path(&self, id: DbId, path: &Path) -> Result<Option<Row>, CoreError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.get_mut(&id).map(|row| {
                row.path = path.to_path_buf();
                row.clone()
            }))
        }

        async fn delete(&self, id: DbId) -> Result<Option<Row>, CoreError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().remove(&id))
        }

        fn get(&self, id: DbId) -> Option<Row> {
            self.rows.lock().unwrap().get(&id).cloned()
        }

        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    struct Fixture {
        tmp: tempfile::TempDir,
        files: FileStore,
        table: Table,
    }

    impl Fixture {
        async fn new() -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let files = FileStore::new(tmp.path().join("uploads"), "/uploads");
            files.ensure_dirs().await.unwrap();
            Self {
                tmp,
                files,
                table: Table::default(),
            }
        }

        async fn upload(&self, kind: ResourceKind, name: &str) -> StoredFile {
            let bytes = jpeg_bytes(256);
            let accepted = validate_upload(kind, name, Some("image/jpeg"), &bytes).unwrap();
            self.files.save(&accepted, &bytes).await.unwrap()
        }

        async fn files_in(&self, kind: ResourceKind) -> usize {
            let mut entries = tokio::fs::read_dir(self.files.dir_for(kind)).await.unwrap();
            let mut count = 0;
            while entries.next_entry().await.unwrap().is_some() {
                count += 1;
            }
            count
        }

        async fn create(&self, kind: ResourceKind) -> (Row, StoredFile) {
            let stored = self.upload(kind, "seed.jpg").await;
            let row = Reconciler::new(&self.files)
                .create(&stored, self.table.insert(&stored.path))
                .await
                .unwrap();
            (row, stored)
        }
    }

    // -- create --------------------------------------------------------------

    #[tokio::test]
    async fn create_links_exactly_one_file_to_one_record() {
        let fx = Fixture::new().await;
        let (row, stored) = fx.create(ResourceKind::Slider).await;

        assert_eq!(fx.table.len(), 1);
        assert_eq!(fx.files_in(ResourceKind::Slider).await, 1);
        assert_eq!(row.path, stored.path);
        assert!(stored.path.exists());
    }

    #[tokio::test]
    async fn failed_create_leaves_no_file() {
        let fx = Fixture::new().await;
        let stored = fx.upload(ResourceKind::Gallery, "pic.jpg").await;
        fx.table.fail_writes(true);

        let result = Reconciler::new(&fx.files)
            .create(&stored, fx.table.insert(&stored.path))
            .await;

        assert_matches!(result, Err(CoreError::Internal(msg)) if msg == "store unavailable");
        assert!(!stored.path.exists());
        assert_eq!(fx.files_in(ResourceKind::Gallery).await, 0);
        assert_eq!(fx.table.len(), 0);
    }

    #[tokio::test]
    async fn failed_cleanup_still_reports_the_insert_error() {
        let fx = Fixture::new().await;
        let mut stored = fx.upload(ResourceKind::Blog, "cover.jpg").await;
        // A path the store refuses to delete stands in for an I/O failure.
        let outside = fx.tmp.path().join("outside.jpg");
        tokio::fs::write(&outside, b"x").await.unwrap();
        stored.path = outside.clone();
        fx.table.fail_writes(true);

        let result = Reconciler::new(&fx.files)
            .create(&stored, fx.table.insert(&stored.path))
            .await;

        assert_matches!(result, Err(CoreError::Internal(_)));
        assert!(outside.exists(), "orphan is left in place, not retried");
    }

    #[tokio::test]
    async fn rejected_upload_never_reaches_disk() {
        let fx = Fixture::new().await;
        let result = validate_upload(
            ResourceKind::Gallery,
            "setup.exe",
            Some("application/octet-stream"),
            b"MZ\x90\x00",
        );

        assert_matches!(result, Err(CoreError::UnsupportedMediaType(_)));
        assert_eq!(fx.files_in(ResourceKind::Gallery).await, 0);
    }

    // -- replace -------------------------------------------------------------

    #[tokio::test]
    async fn successful_replace_removes_previous_file() {
        let fx = Fixture::new().await;
        let (row, old) = fx.create(ResourceKind::Slider).await;
        let new = fx.upload(ResourceKind::Slider, "new.jpg").await;

        let updated = Reconciler::new(&fx.files)
            .replace(&old.path, &new, fx.table.set_path(row.id, &new.path))
            .await
            .unwrap()
            .expect("record exists");

        assert_eq!(updated.path, new.path);
        assert!(!old.path.exists());
        assert!(new.path.exists());
        assert_eq!(fx.files_in(ResourceKind::Slider).await, 1);
    }

    #[tokio::test]
    async fn failed_replace_keeps_previous_file() {
        let fx = Fixture::new().await;
        let (row, old) = fx.create(ResourceKind::Blog).await;
        let new = fx.upload(ResourceKind::Blog, "new.jpg").await;
        fx.table.fail_writes(true);

        let result = Reconciler::new(&fx.files)
            .replace(&old.path, &new, fx.table.set_path(row.id, &new.path))
            .await;

        assert!(result.is_err());
        assert!(old.path.exists());
        assert!(!new.path.exists());
        assert_eq!(fx.table.get(row.id).unwrap().path, old.path);
    }

    #[tokio::test]
    async fn replace_of_vanished_record_discards_new_file() {
        let fx = Fixture::new().await;
        let (row, old) = fx.create(ResourceKind::Gallery).await;
        fx.table.delete(row.id).await.unwrap();
        let new = fx.upload(ResourceKind::Gallery, "new.jpg").await;

        let result = Reconciler::new(&fx.files)
            .replace(&old.path, &new, fx.table.set_path(row.id, &new.path))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(!new.path.exists());
        assert!(old.path.exists(), "previous file is not touched on a miss");
    }

    // -- delete --------------------------------------------------------------

    #[tokio::test]
    async fn delete_removes_record_and_file() {
        let fx = Fixture::new().await;
        let (row, stored) = fx.create(ResourceKind::Slider).await;
        let reconciler = Reconciler::new(&fx.files);

        let deleted = reconciler
            .delete(fx.table.delete(row.id), |r: &Row| vec![r.path.clone()])
            .await
            .unwrap();
        assert_eq!(deleted.map(|r| r.id), Some(row.id));
        assert!(!stored.path.exists());
        assert!(fx.table.get(row.id).is_none());

        // Second delete reports the miss.
        let again = reconciler
            .delete(fx.table.delete(row.id), |r: &Row| vec![r.path.clone()])
            .await
            .unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn delete_of_unknown_id_touches_no_file() {
        let fx = Fixture::new().await;
        let (_row, stored) = fx.create(ResourceKind::Blog).await;

        let result = Reconciler::new(&fx.files)
            .delete(fx.table.delete(9_999), |_: &Row| -> Vec<PathBuf> {
                panic!("no files are resolved for a missing record")
            })
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(stored.path.exists());
        assert_eq!(fx.files_in(ResourceKind::Blog).await, 1);
    }

    #[tokio::test]
    async fn delete_tolerates_already_missing_file() {
        let fx = Fixture::new().await;
        let (row, stored) = fx.create(ResourceKind::Gallery).await;
        tokio::fs::remove_file(&stored.path).await.unwrap();

        let result = Reconciler::new(&fx.files)
            .delete(fx.table.delete(row.id), |r: &Row| vec![r.path.clone()])
            .await
            .unwrap();

        assert!(result.is_some());
        assert_eq!(fx.table.len(), 0);
    }

    #[tokio::test]
    async fn delete_surfaces_store_errors_without_touching_files() {
        let fx = Fixture::new().await;
        let (row, stored) = fx.create(ResourceKind::Slider).await;
        fx.table.fail_writes(true);

        let result = Reconciler::new(&fx.files)
            .delete(fx.table.delete(row.id), |r: &Row| vec![r.path.clone()])
            .await;

        assert!(result.is_err());
        assert!(stored.path.exists());
    }
}

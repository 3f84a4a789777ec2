use std::sync::Arc;

use vitrine_core::file_store::FileStore;
use vitrine_core::reconcile::Reconciler;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or is already a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vitrine_db::DbPool,
    /// Server configuration, immutable after startup.
    pub config: Arc<ServerConfig>,
    /// Upload root the handlers write into and delete from.
    pub files: Arc<FileStore>,
}

impl AppState {
    pub fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(&self.files)
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::db::{open_database, DatabaseError};
use crate::uploads::ImageStore;

/// Shared state threaded into every handler. Each request opens its own
/// connection; SQLite serializes writers and WAL keeps readers unblocked.
#[derive(Clone)]
pub struct ApiContext {
    db_path: Arc<PathBuf>,
    pub images: Arc<ImageStore>,
}

impl ApiContext {
    pub fn new(db_path: PathBuf, images: ImageStore) -> Self {
        Self {
            db_path: Arc::new(db_path),
            images: Arc::new(images),
        }
    }

    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        open_database(&self.db_path)
    }
}

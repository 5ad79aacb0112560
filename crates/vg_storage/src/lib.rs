use std::path::Path;
use std::sync::Arc;
use vg_core::{ContentStore, Error, Result};

pub mod backends;

pub use backends::*;

/// Builds the store named by `kind` (`memory` or `sqlite`).
///
/// `path` is only consulted by the SQLite backend.
pub async fn create_storage(kind: &str, path: Option<&Path>) -> Result<Arc<dyn ContentStore>> {
    match kind {
        "memory" => Ok(Arc::new(InMemoryStorage::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = path.unwrap_or_else(|| Path::new(DEFAULT_DB_PATH));
            Ok(Arc::new(SQLiteStorage::new_with_path(path).await?))
        }
        other => {
            let _ = path;
            Err(Error::Config(format!("Unknown storage backend: {}", other)))
        }
    }
}

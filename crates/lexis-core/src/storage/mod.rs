//! Local key-value store implementations.

mod json_file;
mod memory;
mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;
use tracing::debug;

use crate::config::StorageConfig;
use crate::error::LexisResult;
use crate::traits::{KeyValueStore, StorageBackend};

/// Create a key-value store from configuration.
pub fn create_store(config: &StorageConfig) -> LexisResult<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => {
            debug!("Creating in-memory vocabulary store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::JsonFile => {
            debug!(path = %config.path.display(), "Creating file-backed vocabulary store");
            Ok(Arc::new(JsonFileStore::new(&config.path)?))
        }
        StorageBackend::Sqlite => {
            debug!(path = %config.path.display(), "Creating SQLite vocabulary store");
            Ok(Arc::new(SqliteStore::new(&config.path)?))
        }
    }
}

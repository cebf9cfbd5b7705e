//! Key-value store trait for local persistence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LexisResult;

/// Local document store. Every `set` replaces the whole value for the key;
/// implementations must never leave a partially written value behind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> LexisResult<Option<String>>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> LexisResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> LexisResult<()>;

    /// Backend name, for logs.
    fn backend_name(&self) -> &'static str;
}

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// In-process map; nothing survives the process.
    Memory,
    /// One JSON file per key inside a directory.
    JsonFile,
    /// A single SQLite table.
    #[default]
    Sqlite,
}

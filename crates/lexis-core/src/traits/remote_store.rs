//! Remote document store trait.

use async_trait::async_trait;

use crate::error::LexisResult;

/// The remote copy of the vocabulary document together with its revision marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    /// Raw document body (a JSON array of records).
    pub content: String,
    /// Opaque revision marker used for optimistic overwrite.
    pub revision: Option<String>,
}

/// A single remotely hosted document addressed by configuration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the document. `Ok(None)` means it does not exist yet.
    async fn fetch(&self) -> LexisResult<Option<RemoteDocument>>;

    /// Replace the document. When `revision` is given the remote must reject
    /// the write if its current revision differs. Returns the new revision.
    async fn put(&self, content: &str, revision: Option<String>) -> LexisResult<Option<String>>;
}

//! Remote sync merger.
//!
//! Pushes the whole local collection to a [`RemoteStore`], pulls it back,
//! and reconciles divergent copies with a last-writer-wins merge keyed on
//! each record's scheduling timestamp.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::document::{parse_document, to_pretty_document};
use crate::error::{LexisError, LexisResult};
use crate::traits::RemoteStore;
use crate::types::VocabularyRecord;

/// Merge two collections by word.
///
/// The result holds the union of words. When both sides carry the same word
/// the record with the larger `timestamp` wins in full; on a tie the local
/// record stays. Local order is kept, remote-only records follow in remote order.
pub fn merge(local: &[VocabularyRecord], remote: &[VocabularyRecord]) -> Vec<VocabularyRecord> {
    let mut merged: Vec<VocabularyRecord> = Vec::with_capacity(local.len() + remote.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(local.len() + remote.len());

    for record in local.iter().chain(remote.iter()) {
        match index.get(&record.word) {
            Some(&pos) => {
                if merged[pos].timestamp < record.timestamp {
                    merged[pos] = record.clone();
                }
            }
            None => {
                index.insert(record.word.clone(), merged.len());
                merged.push(record.clone());
            }
        }
    }

    merged
}

/// Pull timestamps later than `now` back to `now`.
///
/// A record stamped in the future would win every merge and never come due.
/// Returns how many records were clamped.
pub fn clamp_future_timestamps(records: &mut [VocabularyRecord], now: i64) -> usize {
    let mut clamped = 0;
    for record in records.iter_mut().filter(|r| r.timestamp > now) {
        warn!(
            word = %record.word,
            timestamp = record.timestamp,
            now,
            "Vocabulary record is dated in the future; clamping to now"
        );
        record.timestamp = now;
        clamped += 1;
    }
    clamped
}

/// Pushes to and pulls from the remote document.
pub struct SyncMerger {
    remote: Arc<dyn RemoteStore>,
    config: SyncConfig,
}

impl SyncMerger {
    /// Create a merger over `remote`.
    pub fn new(remote: Arc<dyn RemoteStore>, config: SyncConfig) -> Self {
        Self { remote, config }
    }

    /// Whether sync is switched on.
    pub fn is_enabled(&self) -> bool {
        self.config.enable_sync
    }

    /// The sync configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    async fn with_timeout<T, F>(&self, operation: &str, fut: F) -> LexisResult<T>
    where
        F: Future<Output = LexisResult<T>>,
    {
        let secs = self.config.timeout_secs.max(1);
        match tokio::time::timeout(Duration::from_secs(secs), fut).await {
            Ok(result) => result,
            Err(_) => Err(LexisError::timeout(operation, secs)),
        }
    }

    /// Replace the remote document with `records`.
    ///
    /// Reads the current revision first and submits the write against it, so
    /// a concurrent writer shows up as [`LexisError::ConflictOnPush`]. No retry
    /// and no merge happen here. A disabled merger returns `Ok(())` untouched.
    pub async fn push_remote(&self, records: &[VocabularyRecord]) -> LexisResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.config.validate()?;

        let current = self.with_timeout("fetch revision", self.remote.fetch()).await?;
        let revision = current.and_then(|doc| doc.revision);
        let content = to_pretty_document(records)?;

        let new_revision = self
            .with_timeout("put document", self.remote.put(&content, revision))
            .await?;

        debug!(
            count = records.len(),
            revision = new_revision.as_deref().unwrap_or("-"),
            "Pushed vocabulary to remote"
        );
        Ok(())
    }

    /// Push, logging and dropping any failure.
    pub async fn push_best_effort(&self, records: &[VocabularyRecord]) {
        if !self.is_enabled() {
            return;
        }
        match self.push_remote(records).await {
            Ok(()) => info!(count = records.len(), "Vocabulary synced to remote"),
            Err(e @ LexisError::ConflictOnPush { .. }) => {
                warn!(error = %e, "Remote changed underneath push; dropping write")
            }
            Err(e) => warn!(error = %e, "Failed to push vocabulary to remote"),
        }
    }

    /// Fetch and decode the remote collection.
    ///
    /// `Ok(None)` when the remote document does not exist yet.
    pub async fn try_pull_remote(&self) -> LexisResult<Option<Vec<VocabularyRecord>>> {
        self.config.validate()?;

        let document = self.with_timeout("fetch document", self.remote.fetch()).await?;
        match document {
            Some(doc) => {
                let records = parse_document(&doc.content)
                    .map_err(|e| LexisError::remote_malformed(e.to_string()))?;
                Ok(Some(records))
            }
            None => Ok(None),
        }
    }

    /// Fetch and decode the remote collection.
    ///
    /// `None` on any failure, missing configuration, or a missing document,
    /// which is distinct from `Some(vec![])` for an empty remote.
    pub async fn pull_remote(&self) -> Option<Vec<VocabularyRecord>> {
        match self.try_pull_remote().await {
            Ok(Some(records)) => Some(records),
            Ok(None) => {
                debug!("Remote vocabulary document does not exist");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to pull vocabulary from remote");
                None
            }
        }
    }
}

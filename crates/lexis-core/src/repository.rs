//! Vocabulary repository.
//!
//! Owns the canonical local collection. Every mutation reads the whole list,
//! changes it, and writes the whole list back under [`STORAGE_KEY`]; when sync
//! is enabled the new list is then pushed to the remote on a best-effort basis.
//!
//! The public operations never fail: they return `bool` (or an empty list)
//! and log whatever went wrong. The `try_*` variants expose the error instead.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::LexisConfig;
use crate::document::{parse_document, to_document, STORAGE_KEY};
use crate::error::{LexisError, LexisResult};
use crate::scheduler::{IntervalScheduler, ScheduleUpdate};
use crate::sync::{clamp_future_timestamps, merge, SyncMerger};
use crate::storage::create_store;
use crate::traits::{KeyValueStore, RemoteStore};
use crate::types::{RecordPatch, VocabularyRecord};

/// CRUD, due-set queries and review scheduling over the local collection.
///
/// Writes through one repository are serialized, but two repositories (or two
/// processes) sharing a store can still lose an update: the second full-list
/// replace overwrites the first.
pub struct VocabularyRepository {
    store: Arc<dyn KeyValueStore>,
    sync: Option<Arc<SyncMerger>>,
    scheduler: IntervalScheduler,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl VocabularyRepository {
    /// Create a repository over `store` using wall-clock time and no sync.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            sync: None,
            scheduler: IntervalScheduler::default(),
            clock: Arc::new(SystemClock),
            write_lock: Mutex::new(()),
        }
    }

    /// Build a repository from configuration.
    ///
    /// `remote` is only used when `config.sync.enable_sync` is set.
    pub fn from_config(
        config: &LexisConfig,
        remote: Option<Arc<dyn RemoteStore>>,
    ) -> LexisResult<Self> {
        let store = create_store(&config.storage)?;
        let mut repo = Self::new(store).with_scheduler(config.scheduler);

        if config.sync.enable_sync {
            match remote {
                Some(remote) => {
                    let merger = SyncMerger::new(remote, config.sync.clone());
                    repo = repo.with_sync(Arc::new(merger));
                }
                None => warn!("Sync enabled but no remote store supplied"),
            }
        }

        Ok(repo)
    }

    /// Attach a sync merger.
    pub fn with_sync(mut self, merger: Arc<SyncMerger>) -> Self {
        self.sync = Some(merger);
        self
    }

    /// Use a different clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use different interval parameters.
    pub fn with_scheduler(mut self, scheduler: IntervalScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Current instant in epoch milliseconds.
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Whether a sync merger is attached and switched on.
    pub fn sync_enabled(&self) -> bool {
        self.sync.as_ref().map(|s| s.is_enabled()).unwrap_or(false)
    }

    async fn persist(&self, records: &[VocabularyRecord]) -> LexisResult<()> {
        let document = to_document(records)?;
        self.store.set(STORAGE_KEY, &document).await
    }

    async fn push(&self, records: &[VocabularyRecord]) {
        if let Some(ref sync) = self.sync {
            sync.push_best_effort(records).await;
        }
    }

    /// Read the collection, surfacing storage and decode errors.
    pub async fn try_get_all(&self) -> LexisResult<Vec<VocabularyRecord>> {
        match self.store.get(STORAGE_KEY).await? {
            Some(content) => parse_document(&content),
            None => Ok(Vec::new()),
        }
    }

    /// Read the collection. Storage errors degrade to an empty list.
    pub async fn get_all(&self) -> Vec<VocabularyRecord> {
        match self.try_get_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, backend = self.store.backend_name(), "Error reading vocabulary");
                Vec::new()
            }
        }
    }

    /// Look up one record.
    pub async fn find(&self, word: &str) -> Option<VocabularyRecord> {
        self.get_all().await.into_iter().find(|r| r.word == word)
    }

    /// Insert a new record, failing with `DuplicateKey` if the word exists.
    pub async fn try_add(
        &self,
        word: &str,
        description: &str,
        show_after_seconds: u64,
    ) -> LexisResult<VocabularyRecord> {
        let record = VocabularyRecord::new(word, description, show_after_seconds)?
            .with_timestamp(self.now());

        let records = {
            let _guard = self.write_lock.lock().await;
            let mut records = self.try_get_all().await?;
            if records.iter().any(|r| r.word == word) {
                return Err(LexisError::duplicate(word));
            }
            records.push(record.clone());
            self.persist(&records).await?;
            records
        };

        info!(word = %word, show_after_seconds, "Added vocabulary item");
        self.push(&records).await;
        Ok(record)
    }

    /// Insert a new record. Returns `false` (and changes nothing) if the word
    /// already exists or the write fails.
    pub async fn add(&self, word: &str, description: &str, show_after_seconds: u64) -> bool {
        match self.try_add(word, description, show_after_seconds).await {
            Ok(_) => true,
            Err(LexisError::DuplicateKey { .. }) => {
                debug!(word = %word, "Word already exists in vocabulary");
                false
            }
            Err(e) => {
                warn!(word = %word, error = %e, "Error adding vocabulary");
                false
            }
        }
    }

    /// Overwrite the fields present in `patch` on the record for `word`.
    pub async fn try_update(&self, word: &str, patch: &RecordPatch) -> LexisResult<VocabularyRecord> {
        if let Some(timestamp) = patch.timestamp {
            if timestamp > self.now() {
                return Err(LexisError::validation(format!(
                    "timestamp {} is in the future",
                    timestamp
                )));
            }
        }

        let (updated, records) = {
            let _guard = self.write_lock.lock().await;
            let mut records = self.try_get_all().await?;
            let record = records
                .iter_mut()
                .find(|r| r.word == word)
                .ok_or_else(|| LexisError::not_found(word))?;
            record.apply(patch);
            let updated = record.clone();
            self.persist(&records).await?;
            (updated, records)
        };

        debug!(word = %word, "Updated vocabulary item");
        self.push(&records).await;
        Ok(updated)
    }

    /// Overwrite the fields present in `patch`. Returns `false` if the word
    /// is unknown or the write fails.
    pub async fn update(&self, word: &str, patch: &RecordPatch) -> bool {
        match self.try_update(word, patch).await {
            Ok(_) => true,
            Err(e) => {
                warn!(word = %word, error = %e, "Error updating vocabulary");
                false
            }
        }
    }

    /// Remove the record for `word`.
    pub async fn try_delete(&self, word: &str) -> LexisResult<()> {
        let records = {
            let _guard = self.write_lock.lock().await;
            let mut records = self.try_get_all().await?;
            let before = records.len();
            records.retain(|r| r.word != word);
            if records.len() == before {
                return Err(LexisError::not_found(word));
            }
            self.persist(&records).await?;
            records
        };

        info!(word = %word, "Deleted vocabulary item");
        self.push(&records).await;
        Ok(())
    }

    /// Remove the record for `word`. Returns `false` if it does not exist.
    pub async fn delete(&self, word: &str) -> bool {
        match self.try_delete(word).await {
            Ok(()) => true,
            Err(e) => {
                warn!(word = %word, error = %e, "Error deleting vocabulary");
                false
            }
        }
    }

    /// Replace the collection with an empty list.
    pub async fn try_clear(&self) -> LexisResult<()> {
        {
            let _guard = self.write_lock.lock().await;
            self.persist(&[]).await?;
        }
        info!("Cleared vocabulary");
        self.push(&[]).await;
        Ok(())
    }

    /// Replace the collection with an empty list.
    pub async fn clear(&self) -> bool {
        match self.try_clear().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Error clearing vocabulary");
                false
            }
        }
    }

    /// Records due at `now` (epoch milliseconds), in collection order.
    pub async fn get_due_items(&self, now: i64) -> Vec<VocabularyRecord> {
        self.get_all()
            .await
            .into_iter()
            .filter(|r| r.is_due(now))
            .collect()
    }

    /// Pick one due record uniformly at random.
    pub async fn pick_due_item(&self, now: i64) -> Option<VocabularyRecord> {
        let due = self.get_due_items(now).await;
        due.choose(&mut rand::thread_rng()).cloned()
    }

    /// Pick one due record uniformly at random using `rng`.
    pub async fn pick_due_item_with_rng<R: Rng + Send>(
        &self,
        now: i64,
        rng: &mut R,
    ) -> Option<VocabularyRecord> {
        let due = self.get_due_items(now).await;
        due.choose(rng).cloned()
    }

    /// Reschedule `word` after a review.
    pub async fn try_update_review_interval(
        &self,
        word: &str,
        was_correct: bool,
    ) -> LexisResult<ScheduleUpdate> {
        let current = self
            .try_get_all()
            .await?
            .into_iter()
            .find(|r| r.word == word)
            .ok_or_else(|| LexisError::not_found(word))?;

        let update = self.scheduler.next_interval(&current, was_correct, self.now());
        self.try_update(word, &update.to_patch()).await?;

        debug!(
            word = %word,
            was_correct,
            show_after_seconds = update.show_after_seconds,
            "Rescheduled vocabulary item"
        );
        Ok(update)
    }

    /// Reschedule `word` after a review. Returns `false` if the word is unknown.
    pub async fn update_review_interval(&self, word: &str, was_correct: bool) -> bool {
        match self.try_update_review_interval(word, was_correct).await {
            Ok(_) => true,
            Err(e) => {
                warn!(word = %word, error = %e, "Error updating review interval");
                false
            }
        }
    }

    /// Records whose word or description contains `term`, ignoring case.
    pub async fn search(&self, term: &str) -> Vec<VocabularyRecord> {
        let needle = term.to_lowercase();
        self.get_all()
            .await
            .into_iter()
            .filter(|r| {
                r.word.to_lowercase().contains(&needle)
                    || r.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// The collection ordered by most recent scheduling event first.
    pub async fn list_recent_first(&self) -> Vec<VocabularyRecord> {
        let mut records = self.get_all().await;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// Pull the remote collection, merge it into the local one and persist
    /// the result. Does not push.
    ///
    /// Returns `false` without touching local state when sync is off or the
    /// remote cannot be read.
    pub async fn sync_with_remote(&self) -> bool {
        let Some(ref sync) = self.sync else {
            debug!("No remote configured; skipping sync");
            return false;
        };
        if !sync.is_enabled() {
            debug!("Sync disabled; skipping pull");
            return false;
        }

        let Some(mut remote) = sync.pull_remote().await else {
            return false;
        };
        let now = self.now();
        clamp_future_timestamps(&mut remote, now);

        let _guard = self.write_lock.lock().await;
        let mut local = match self.try_get_all().await {
            Ok(local) => local,
            Err(e) => {
                warn!(error = %e, "Failed to read local vocabulary for sync");
                return false;
            }
        };

        clamp_future_timestamps(&mut local, now);

        let merged = merge(&local, &remote);
        match self.persist(&merged).await {
            Ok(()) => {
                info!(
                    local = local.len(),
                    remote = remote.len(),
                    merged = merged.len(),
                    "Vocabulary synced from remote"
                );
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist merged vocabulary");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::SyncConfig;
    use crate::storage::MemoryStore;
    use crate::traits::{MockKeyValueStore, MockRemoteStore, RemoteDocument};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const T0: i64 = 1_700_000_000_000;

    fn repo() -> (VocabularyRepository, ManualClock) {
        let clock = ManualClock::new(T0);
        let repo = VocabularyRepository::new(Arc::new(MemoryStore::new()))
            .with_clock(Arc::new(clock.clone()));
        (repo, clock)
    }

    #[tokio::test]
    async fn test_get_all_uninitialized_is_empty() {
        let (repo, _) = repo();
        assert!(repo.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let (repo, clock) = repo();
        assert!(repo.add("cat", "feline", 10).await);

        clock.advance(5_000);
        assert!(!repo.add("cat", "other", 20).await);

        let all = repo.get_all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description, "feline");
        assert_eq!(all[0].show_after_seconds, 10);
        assert_eq!(all[0].timestamp, T0);
        assert_eq!(all[0].previous_interval, 0);
    }

    #[tokio::test]
    async fn test_try_add_reports_duplicate_distinctly() {
        let (repo, _) = repo();
        repo.try_add("cat", "", 10).await.unwrap();
        assert!(matches!(
            repo.try_add("cat", "", 10).await,
            Err(LexisError::DuplicateKey { .. })
        ));
        assert!(matches!(
            repo.try_add("", "", 10).await,
            Err(LexisError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_words_are_case_sensitive() {
        let (repo, _) = repo();
        assert!(repo.add("Cat", "", 10).await);
        assert!(repo.add("cat", "", 10).await);
        assert_eq!(repo.get_all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_insertion_order_preserved() {
        let (repo, clock) = repo();
        for word in ["b", "a", "c"] {
            repo.add(word, "", 0).await;
            clock.advance(1);
        }
        let words: Vec<String> = repo.get_all().await.into_iter().map(|r| r.word).collect();
        assert_eq!(words, vec!["b", "a", "c"]);

        let recent: Vec<String> = repo
            .list_recent_first()
            .await
            .into_iter()
            .map(|r| r.word)
            .collect();
        assert_eq!(recent, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let (repo, _) = repo();
        repo.add("cat", "feline", 10).await;

        assert!(repo.update("cat", &RecordPatch::new().description("small feline")).await);
        let record = repo.find("cat").await.unwrap();
        assert_eq!(record.description, "small feline");
        assert_eq!(record.show_after_seconds, 10);

        assert!(!repo.update("dog", &RecordPatch::new().description("x")).await);
    }

    #[tokio::test]
    async fn test_update_rejects_future_timestamp() {
        let (repo, _) = repo();
        repo.add("cat", "", 10).await;
        assert!(!repo.update("cat", &RecordPatch::new().timestamp(T0 + 1)).await);
        assert_eq!(repo.find("cat").await.unwrap().timestamp, T0);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let (repo, _) = repo();
        repo.add("a", "", 1).await;
        repo.add("b", "", 1).await;

        assert!(repo.delete("a").await);
        assert!(!repo.delete("a").await);
        assert_eq!(repo.get_all().await.len(), 1);

        assert!(repo.clear().await);
        assert!(repo.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_due_set() {
        let (repo, clock) = repo();
        clock.set(T0 - 100_000);
        repo.add("due", "", 50).await;
        repo.add("later", "", 200).await;
        clock.set(T0);

        let due = repo.get_due_items(T0).await;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].word, "due");
    }

    #[tokio::test]
    async fn test_due_boundary_is_inclusive() {
        let (repo, _) = repo();
        repo.add("edge", "", 60).await;
        assert!(repo.get_due_items(T0 + 59_999).await.is_empty());
        assert_eq!(repo.get_due_items(T0 + 60_000).await.len(), 1);
    }

    #[tokio::test]
    async fn test_pick_due_item_none_when_nothing_due() {
        let (repo, _) = repo();
        repo.add("later", "", 1_000).await;
        assert!(repo.pick_due_item(T0).await.is_none());
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn test_pick_due_item_future_is_send() {
        let (repo, _) = repo();
        repo.add("cat", "", 0).await;

        let pick = repo.pick_due_item(T0);
        assert_send(&pick);
        assert_eq!(pick.await.unwrap().word, "cat");
    }

    #[tokio::test]
    async fn test_extreme_stored_values_do_not_panic() {
        let document = serde_json::json!([
            {"word": "ancient", "description": "", "showAfterSeconds": 10, "timestamp": i64::MIN, "previousInterval": 0},
            {"word": "forever", "description": "", "showAfterSeconds": u64::MAX, "timestamp": 1000, "previousInterval": 0}
        ])
        .to_string();
        let repo = VocabularyRepository::new(Arc::new(MemoryStore::with_entry(STORAGE_KEY, document)))
            .with_clock(Arc::new(ManualClock::new(T0)));

        let due = repo.get_due_items(T0).await;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].word, "ancient");
        assert_eq!(repo.pick_due_item(T0).await.unwrap().word, "ancient");

        let forever = repo.find("forever").await.unwrap();
        assert_eq!(forever.next_review_at(), i64::MAX);
        assert_ne!(forever.describe_next_review(T0), "Due now");
    }

    #[tokio::test]
    async fn test_pick_due_item_is_uniform() {
        let (repo, clock) = repo();
        clock.set(T0 - 1_000);
        for word in ["a", "b", "c", "d"] {
            repo.add(word, "", 0).await;
        }
        repo.add("not-due", "", 10_000).await;

        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = std::collections::HashMap::new();
        let trials = 8_000;
        for _ in 0..trials {
            let picked = repo.pick_due_item_with_rng(T0, &mut rng).await.unwrap();
            *counts.entry(picked.word).or_insert(0usize) += 1;
        }

        assert_eq!(counts.len(), 4);
        assert!(!counts.contains_key("not-due"));
        let expected = trials as f64 / 4.0;
        for (word, count) in counts {
            let deviation = (count as f64 - expected).abs() / expected;
            assert!(deviation < 0.1, "{} picked {} times, expected ~{}", word, count, expected);
        }
    }

    #[tokio::test]
    async fn test_update_review_interval() {
        let (repo, clock) = repo();
        repo.add("cat", "", 10).await;
        clock.advance(60_000);

        assert!(repo.update_review_interval("cat", true).await);
        let record = repo.find("cat").await.unwrap();
        assert_eq!(record.show_after_seconds, 345_600);
        assert_eq!(record.previous_interval, 86_400);
        assert_eq!(record.timestamp, T0 + 60_000);

        assert!(repo.update_review_interval("cat", false).await);
        let record = repo.find("cat").await.unwrap();
        assert_eq!(record.show_after_seconds, 3_600);
        assert_eq!(record.previous_interval, 0);

        assert!(!repo.update_review_interval("dog", true).await);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (repo, _) = repo();
        repo.add("Ephemeral", "lasting a very short time", 0).await;
        repo.add("cat", "a small Feline", 0).await;

        assert_eq!(repo.search("ephem").await.len(), 1);
        assert_eq!(repo.search("FELINE").await[0].word, "cat");
        assert_eq!(repo.search("").await.len(), 2);
        assert!(repo.search("zebra").await.is_empty());
    }

    #[tokio::test]
    async fn test_storage_read_failure_degrades() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(LexisError::storage_read("disk gone")));
        store.expect_set().never();
        store.expect_backend_name().return_const("mock");

        let repo = VocabularyRepository::new(Arc::new(store));
        assert!(repo.get_all().await.is_empty());
        assert!(repo.get_due_items(T0).await.is_empty());
        assert!(!repo.add("cat", "", 1).await);
        assert!(!repo.update_review_interval("cat", true).await);
    }

    #[tokio::test]
    async fn test_storage_write_failure_is_false() {
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .returning(|_, _| Err(LexisError::storage_write("read-only")));
        store.expect_backend_name().return_const("mock");

        let repo = VocabularyRepository::new(Arc::new(store));
        assert!(!repo.add("cat", "", 1).await);
        assert!(!repo.clear().await);
    }

    fn synced_repo(remote: MockRemoteStore) -> (VocabularyRepository, ManualClock) {
        let clock = ManualClock::new(T0);
        let merger = SyncMerger::new(Arc::new(remote), SyncConfig::github("alice", "vocab", "t"));
        let repo = VocabularyRepository::new(Arc::new(MemoryStore::new()))
            .with_clock(Arc::new(clock.clone()))
            .with_sync(Arc::new(merger));
        (repo, clock)
    }

    #[tokio::test]
    async fn test_add_pushes_full_list() {
        let mut remote = MockRemoteStore::new();
        remote.expect_fetch().returning(|| Ok(None));
        remote
            .expect_put()
            .withf(|content, _| content.contains("\"cat\""))
            .times(1)
            .returning(|_, _| Ok(Some("r1".to_string())));

        let (repo, _) = synced_repo(remote);
        assert!(repo.add("cat", "", 10).await);
    }

    #[tokio::test]
    async fn test_push_failure_does_not_fail_add() {
        let mut remote = MockRemoteStore::new();
        remote
            .expect_fetch()
            .returning(|| Err(LexisError::authentication("bad token")));
        remote.expect_put().never();

        let (repo, _) = synced_repo(remote);
        assert!(repo.add("cat", "", 10).await);
        assert_eq!(repo.get_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sync_merges_and_persists_without_push() {
        let remote_doc = serde_json::json!([
            {"word": "shared", "description": "remote", "showAfterSeconds": 5, "timestamp": T0 + 10, "previousInterval": 0},
            {"word": "remote-only", "description": "", "showAfterSeconds": 5, "timestamp": T0, "previousInterval": 0}
        ])
        .to_string();

        let mut remote = MockRemoteStore::new();
        let mut fetches = 0;
        remote.expect_fetch().returning(move || {
            fetches += 1;
            // first fetch is the revision read for the push triggered by `add`
            if fetches == 1 {
                Ok(None)
            } else {
                Ok(Some(RemoteDocument {
                    content: remote_doc.clone(),
                    revision: Some("r2".to_string()),
                }))
            }
        });
        remote
            .expect_put()
            .times(1)
            .returning(|_, _| Ok(Some("r1".to_string())));

        let (repo, _) = synced_repo(remote);
        repo.add("shared", "local", 5).await;

        assert!(repo.sync_with_remote().await);
        let all = repo.get_all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].description, "remote");
        assert_eq!(all[1].word, "remote-only");
    }

    #[tokio::test]
    async fn test_sync_clamps_future_dated_remote_records() {
        let skewed = 9_000_000_000_000_000i64;
        let remote_doc = serde_json::json!([
            {"word": "cat", "description": "skewed", "showAfterSeconds": 10, "timestamp": skewed, "previousInterval": 0},
            {"word": "dog", "description": "", "showAfterSeconds": 0, "timestamp": skewed, "previousInterval": 0}
        ])
        .to_string();

        let mut remote = MockRemoteStore::new();
        remote.expect_fetch().returning(move || {
            Ok(Some(RemoteDocument {
                content: remote_doc.clone(),
                revision: Some("r1".to_string()),
            }))
        });
        remote.expect_put().returning(|_, _| Ok(Some("r2".to_string())));

        let (repo, clock) = synced_repo(remote);
        repo.add("cat", "local", 10).await;
        clock.advance(60_000);
        let now = T0 + 60_000;

        assert!(repo.sync_with_remote().await);
        let all = repo.get_all().await;
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|r| r.timestamp <= now));

        // clamped to the pull instant, so it still beats the older local copy
        let cat = repo.find("cat").await.unwrap();
        assert_eq!(cat.description, "skewed");
        assert_eq!(cat.timestamp, now);

        let due: Vec<String> = repo.get_due_items(now).await.into_iter().map(|r| r.word).collect();
        assert_eq!(due, vec!["dog".to_string()]);
        assert_eq!(repo.get_due_items(now + 10_000).await.len(), 2);
    }

    #[tokio::test]
    async fn test_sync_failure_leaves_local_untouched() {
        let mut remote = MockRemoteStore::new();
        remote.expect_fetch().returning(|| Err(LexisError::remote("offline")));

        let (repo, _) = synced_repo(remote);
        repo.add("cat", "", 10).await;
        assert!(!repo.sync_with_remote().await);
        assert_eq!(repo.get_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sync_without_merger_is_false() {
        let (repo, _) = repo();
        assert!(!repo.sync_enabled());
        assert!(!repo.sync_with_remote().await);
    }
}

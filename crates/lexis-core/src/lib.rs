//! lexis-core - Core library for lexis.
//!
//! Spaced-repetition vocabulary review: records become due after an interval,
//! a quiz grades the learner's answer and reschedules the record, and the
//! whole collection can be mirrored to a remote JSON document.
//!
//! # Example
//!
//! ```ignore
//! use lexis_core::{LexisConfig, ReviewEngine, ReviewEvent};
//!
//! let engine = ReviewEngine::from_config(&LexisConfig::from_env(), None)?;
//!
//! engine.handle(ReviewEvent::exposed_with_hint("ephemeral", "short-lived", "Show in 10 minutes").unwrap()).await;
//!
//! let due = engine.due_items(chrono::Utc::now().timestamp_millis()).await;
//! ```

pub mod clock;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod repository;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod sync;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LexisConfig, StorageConfig, SyncConfig};
pub use error::{ErrorCode, LexisError, LexisResult};
pub use events::{EventOutcome, ReviewEngine, ReviewEvent, ShowAfterHint};
pub use repository::VocabularyRepository;
pub use scheduler::{next_interval, IntervalScheduler, ScheduleUpdate};
pub use session::{QuizCoordinator, SessionState, Verdict};
pub use storage::{create_store, JsonFileStore, MemoryStore, SqliteStore};
pub use sync::{clamp_future_timestamps, merge, SyncMerger};
pub use traits::{KeyValueStore, RemoteDocument, RemoteStore, StorageBackend};
pub use types::{RecordPatch, VocabularyRecord};

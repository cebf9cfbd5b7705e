//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lexis_core::{LexisError, LexisResult, RemoteDocument, RemoteStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness writer.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lexis_core=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// In-process remote document with revision checking, standing in for a
/// hosted file.
#[derive(Default)]
pub struct InMemoryRemote {
    state: Mutex<Option<(String, u64)>>,
    puts: AtomicUsize,
    racing_write: Mutex<Option<String>>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: &str) -> Self {
        Self {
            state: Mutex::new(Some((content.to_string(), 1))),
            ..Self::default()
        }
    }

    pub fn content(&self) -> Option<String> {
        self.state.lock().unwrap().as_ref().map(|(c, _)| c.clone())
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Simulate another installation writing the document.
    pub fn overwrite(&self, content: &str) {
        let mut state = self.state.lock().unwrap();
        let next = state.as_ref().map(|(_, r)| r + 1).unwrap_or(1);
        *state = Some((content.to_string(), next));
    }

    /// Let another installation write `content` after the next push has
    /// read the revision but before its write lands.
    pub fn race_next_put(&self, content: &str) {
        *self.racing_write.lock().unwrap() = Some(content.to_string());
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemote {
    async fn fetch(&self) -> LexisResult<Option<RemoteDocument>> {
        Ok(self.state.lock().unwrap().as_ref().map(|(content, rev)| RemoteDocument {
            content: content.clone(),
            revision: Some(rev.to_string()),
        }))
    }

    async fn put(&self, content: &str, revision: Option<String>) -> LexisResult<Option<String>> {
        if let Some(racing) = self.racing_write.lock().unwrap().take() {
            self.overwrite(&racing);
        }
        let mut state = self.state.lock().unwrap();
        let current = state.as_ref().map(|(_, r)| r.to_string());
        if current.is_some() && current != revision {
            return Err(LexisError::conflict("revision mismatch"));
        }
        let next = state.as_ref().map(|(_, r)| r + 1).unwrap_or(1);
        *state = Some((content.to_string(), next));
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(Some(next.to_string()))
    }
}

/// Remote that refuses every call.
pub struct OfflineRemote;

#[async_trait]
impl RemoteStore for OfflineRemote {
    async fn fetch(&self) -> LexisResult<Option<RemoteDocument>> {
        Err(LexisError::remote("connection refused"))
    }

    async fn put(&self, _content: &str, _revision: Option<String>) -> LexisResult<Option<String>> {
        Err(LexisError::remote("connection refused"))
    }
}

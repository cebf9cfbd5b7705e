//! lexis-github - GitHub remote store for lexis.
//!
//! Keeps the vocabulary document in a repository file and uses the blob
//! `sha` as the revision marker for optimistic overwrite.
//!
//! # Example
//!
//! ```ignore
//! use lexis_core::{LexisConfig, VocabularyRepository};
//! use lexis_github::GithubContentsStore;
//! use std::sync::Arc;
//!
//! let config = LexisConfig::from_env();
//! let remote = Arc::new(GithubContentsStore::new(&config.sync)?);
//! let repo = VocabularyRepository::from_config(&config, Some(remote))?;
//!
//! repo.sync_with_remote().await;
//! ```

mod client;

pub use client::{contents_url, GithubContentsStore};

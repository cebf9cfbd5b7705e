//! Remote synchronization.

mod merger;

pub use merger::{clamp_future_timestamps, merge, SyncMerger};

//! Review interval scheduler.
//!
//! Computes the next due time for a record from the outcome of a review.
//! Success grows the interval by a fixed increment on top of the previous
//! successful interval (one day when there is none). Failure resets hard to
//! one hour and forgets any streak.

use serde::{Deserialize, Serialize};

use crate::types::{RecordPatch, VocabularyRecord};

/// One day, the first successful interval.
pub const FIRST_SUCCESS_INTERVAL_SECS: u64 = 24 * 60 * 60;
/// Added to the base interval on every successful review.
pub const SUCCESS_INCREMENT_SECS: u64 = 3 * 24 * 60 * 60;
/// Interval after a failed review.
pub const FAILURE_RESET_SECS: u64 = 60 * 60;

/// Scheduling fields produced by a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub show_after_seconds: u64,
    pub previous_interval: u64,
    pub timestamp: i64,
}

impl ScheduleUpdate {
    /// Convert into a patch for the repository.
    pub fn to_patch(&self) -> RecordPatch {
        RecordPatch::new()
            .show_after_seconds(self.show_after_seconds)
            .previous_interval(self.previous_interval)
            .timestamp(self.timestamp)
    }
}

/// Interval parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalScheduler {
    /// Base interval used when the record has no previous successful interval.
    pub first_interval_secs: u64,
    /// Linear growth per success.
    pub increment_secs: u64,
    /// Interval after a failure.
    pub reset_secs: u64,
}

impl IntervalScheduler {
    /// Create a scheduler with the standard parameters.
    pub fn new() -> Self {
        Self {
            first_interval_secs: FIRST_SUCCESS_INTERVAL_SECS,
            increment_secs: SUCCESS_INCREMENT_SECS,
            reset_secs: FAILURE_RESET_SECS,
        }
    }

    /// Compute the schedule after reviewing `current` at `now` (epoch ms).
    pub fn next_interval(
        &self,
        current: &VocabularyRecord,
        was_correct: bool,
        now: i64,
    ) -> ScheduleUpdate {
        if was_correct {
            let base = if current.previous_interval > 0 {
                current.previous_interval
            } else {
                self.first_interval_secs
            };

            ScheduleUpdate {
                show_after_seconds: base.saturating_add(self.increment_secs),
                previous_interval: base,
                timestamp: now,
            }
        } else {
            ScheduleUpdate {
                show_after_seconds: self.reset_secs,
                previous_interval: 0,
                timestamp: now,
            }
        }
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the schedule after a review using the standard parameters.
pub fn next_interval(current: &VocabularyRecord, was_correct: bool, now: i64) -> ScheduleUpdate {
    IntervalScheduler::new().next_interval(current, was_correct, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(previous_interval: u64, show_after_seconds: u64) -> VocabularyRecord {
        VocabularyRecord::new("cat", "feline", show_after_seconds)
            .unwrap()
            .with_timestamp(0)
            .with_previous_interval(previous_interval)
    }

    #[test]
    fn test_first_success_uses_one_day_base() {
        let update = next_interval(&record(0, 10), true, 1_000);
        assert_eq!(update.previous_interval, 86_400);
        assert_eq!(update.show_after_seconds, 86_400 + 259_200);
        assert_eq!(update.timestamp, 1_000);
    }

    #[test]
    fn test_success_from_one_day_state() {
        let update = next_interval(&record(86_400, 86_400), true, 5);
        assert_eq!(update.show_after_seconds, 345_600);
        assert_eq!(update.previous_interval, 86_400);
    }

    #[test]
    fn test_success_grows_from_previous_interval() {
        let update = next_interval(&record(345_600, 345_600), true, 5);
        assert_eq!(update.show_after_seconds, 345_600 + 259_200);
        assert_eq!(update.previous_interval, 345_600);
    }

    #[test]
    fn test_failure_resets_regardless_of_streak() {
        for previous in [0, 86_400, 10_000_000] {
            let update = next_interval(&record(previous, 999_999), false, 7);
            assert_eq!(update.show_after_seconds, 3_600);
            assert_eq!(update.previous_interval, 0);
            assert_eq!(update.timestamp, 7);
        }
    }

    #[test]
    fn test_repeated_failure_is_idempotent() {
        let first = next_interval(&record(0, 3_600), false, 1);
        let mut again = record(first.previous_interval, first.show_after_seconds);
        again.timestamp = first.timestamp;
        let second = next_interval(&again, false, 2);
        assert_eq!(second.show_after_seconds, first.show_after_seconds);
        assert_eq!(second.previous_interval, 0);
    }

    #[test]
    fn test_custom_parameters() {
        let scheduler = IntervalScheduler {
            first_interval_secs: 60,
            increment_secs: 30,
            reset_secs: 5,
        };
        assert_eq!(scheduler.next_interval(&record(0, 0), true, 0).show_after_seconds, 90);
        assert_eq!(scheduler.next_interval(&record(60, 90), false, 0).show_after_seconds, 5);
    }

    #[test]
    fn test_update_to_patch() {
        let patch = next_interval(&record(0, 10), false, 99).to_patch();
        assert_eq!(patch.show_after_seconds, Some(3_600));
        assert_eq!(patch.previous_interval, Some(0));
        assert_eq!(patch.timestamp, Some(99));
        assert!(patch.description.is_none());
    }
}

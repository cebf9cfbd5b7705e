//! Vocabulary record types.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::error::{LexisError, LexisResult};

/// One vocabulary item under review.
///
/// Identity is the `word`: two records with the same word are the same
/// entity regardless of their other fields. Use [`VocabularyRecord::identical`]
/// to compare every field.
///
/// The serialized shape is the persisted document contract:
/// `{ word, description, showAfterSeconds, timestamp, previousInterval }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyRecord {
    /// The word as typed; unique across the collection.
    pub word: String,
    /// Prompt or definition shown while quizzing. May be empty.
    #[serde(default)]
    pub description: String,
    /// Seconds after `timestamp` at which the record becomes due.
    pub show_after_seconds: u64,
    /// Epoch milliseconds of the last scheduling event.
    pub timestamp: i64,
    /// Interval in seconds that was active before the last successful review.
    /// Zero means no prior successful interval.
    #[serde(default)]
    pub previous_interval: u64,
}

impl VocabularyRecord {
    /// Create a record stamped with the current wall-clock time.
    pub fn new(
        word: impl Into<String>,
        description: impl Into<String>,
        show_after_seconds: u64,
    ) -> LexisResult<Self> {
        let word = word.into();
        if word.trim().is_empty() {
            return Err(LexisError::missing_field("word"));
        }

        Ok(Self {
            word,
            description: description.into(),
            show_after_seconds,
            timestamp: Utc::now().timestamp_millis(),
            previous_interval: 0,
        })
    }

    /// Set the scheduling timestamp (epoch milliseconds).
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the previous interval.
    pub fn with_previous_interval(mut self, seconds: u64) -> Self {
        self.previous_interval = seconds;
        self
    }

    /// Seconds elapsed since the last scheduling event, as a fraction.
    pub fn elapsed_seconds(&self, now: i64) -> f64 {
        now.saturating_sub(self.timestamp) as f64 / 1000.0
    }

    /// Whether the record is due at `now` (epoch milliseconds).
    pub fn is_due(&self, now: i64) -> bool {
        self.elapsed_seconds(now) >= self.show_after_seconds as f64
    }

    /// Epoch milliseconds at which the record becomes due.
    pub fn next_review_at(&self) -> i64 {
        let delay = i64::try_from(self.show_after_seconds).unwrap_or(i64::MAX);
        self.timestamp.saturating_add(delay.saturating_mul(1000))
    }

    /// The due instant as a UTC datetime, if representable.
    pub fn next_review_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.next_review_at()).single()
    }

    /// Human-readable time until the record is due, e.g. "Next review in 3 days".
    ///
    /// Months are counted as 30 days.
    pub fn describe_next_review(&self, now: i64) -> String {
        let remaining = self.next_review_at().saturating_sub(now) / 1000;
        if remaining <= 0 {
            return "Due now".to_string();
        }

        let minutes = remaining / 60;
        let hours = minutes / 60;
        let days = hours / 24;
        let months = days / 30;

        let (n, unit) = if minutes < 1 {
            (remaining, "second")
        } else if hours < 1 {
            (minutes, "minute")
        } else if days < 1 {
            (hours, "hour")
        } else if months < 1 {
            (days, "day")
        } else {
            (months, "month")
        };

        format!("Next review in {} {}{}", n, unit, if n == 1 { "" } else { "s" })
    }

    /// Overwrite the fields present in `patch`. The word never changes.
    pub fn apply(&mut self, patch: &RecordPatch) {
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(show_after_seconds) = patch.show_after_seconds {
            self.show_after_seconds = show_after_seconds;
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
        if let Some(previous_interval) = patch.previous_interval {
            self.previous_interval = previous_interval;
        }
    }

    /// Field-by-field equality, unlike `==` which compares words only.
    pub fn identical(&self, other: &Self) -> bool {
        self.word == other.word
            && self.description == other.description
            && self.show_after_seconds == other.show_after_seconds
            && self.timestamp == other.timestamp
            && self.previous_interval == other.previous_interval
    }
}

impl PartialEq for VocabularyRecord {
    fn eq(&self, other: &Self) -> bool {
        self.word == other.word
    }
}

impl Eq for VocabularyRecord {}

impl Hash for VocabularyRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.word.hash(state);
    }
}

/// Partial update for a record: each present field overwrites the stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_after_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_interval: Option<u64>,
}

impl RecordPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the interval.
    pub fn show_after_seconds(mut self, seconds: u64) -> Self {
        self.show_after_seconds = Some(seconds);
        self
    }

    /// Set the timestamp.
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the previous interval.
    pub fn previous_interval(mut self, seconds: u64) -> Self {
        self.previous_interval = Some(seconds);
        self
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.show_after_seconds.is_none()
            && self.timestamp.is_none()
            && self.previous_interval.is_none()
    }
}

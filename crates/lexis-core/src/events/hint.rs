//! Parsing of the "Show in N unit" affordance text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

static SHOW_IN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bshow\s+in\s+(\d+)\s*(second|minute|hour|day)s?\b")
        .expect("show-in pattern is valid")
});

/// Unit named by a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HintUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl HintUnit {
    pub fn seconds(&self) -> u64 {
        match self {
            HintUnit::Second => 1,
            HintUnit::Minute => 60,
            HintUnit::Hour => 60 * 60,
            HintUnit::Day => 24 * 60 * 60,
        }
    }
}

/// Initial delay suggested by the review UI, e.g. "Show in 10 minutes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowAfterHint {
    pub amount: u64,
    pub unit: HintUnit,
}

impl ShowAfterHint {
    /// Find the first "Show in N unit(s)" phrase in `text`.
    ///
    /// Returns `None` when no phrase is present or the number does not fit.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = SHOW_IN.captures(text)?;
        let amount = caps.get(1)?.as_str().parse().ok()?;
        let unit = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { amount, unit })
    }

    /// The delay in seconds, saturating on overflow.
    pub fn seconds(&self) -> u64 {
        self.amount.saturating_mul(self.unit.seconds())
    }
}

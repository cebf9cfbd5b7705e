//! Inbound review events and the engine that applies them.

mod engine;
mod hint;

pub use engine::{EventOutcome, ReviewEngine, ReviewEvent};
pub use hint::{HintUnit, ShowAfterHint};

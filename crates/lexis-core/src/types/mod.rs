//! Core types for lexis.

mod record;

pub use record::*;

//! Core traits for lexis backends.

mod key_value;
mod remote_store;

pub use key_value::*;
pub use remote_store::*;

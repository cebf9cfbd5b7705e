//! Quiz sessions: one item presented, graded, and either retried or advanced.

mod coordinator;

pub use coordinator::{normalize_answer, QuizCoordinator, QuizSession, SessionState, Verdict};
